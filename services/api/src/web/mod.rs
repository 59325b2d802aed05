pub mod rest;
pub mod state;

// Re-export the pieces the binary needs to build the web server router.
pub use rest::{api_router, not_found_handler, ApiDoc};
pub use state::AppState;
