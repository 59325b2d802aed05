//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints, the route table,
//! and the master definition for the OpenAPI specification.
//!
//! The handlers are thin: they translate HTTP payloads into manager calls
//! and manager results back into the JSON shapes the frontend expects. All
//! document semantics live in the core crate.

use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use qa_checklist_core::{
    ChecklistError, CompletedEntry, Heading, Item, Note, Session, SessionInfoUpdate,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        get_session_handler,
        update_info_handler,
        toggle_item_handler,
        add_heading_handler,
        edit_heading_handler,
        delete_heading_handler,
        add_item_handler,
        edit_item_handler,
        delete_item_handler,
        add_note_handler,
        edit_note_handler,
        delete_note_handler,
        complete_session_handler,
        reset_session_handler,
        get_history_handler,
        delete_history_handler,
    ),
    components(schemas(
        UpdateInfoRequest,
        ToggleItemRequest,
        TitlePayload,
        AddItemRequest,
        TextPayload,
        CompleteRequest,
        Ack,
        ActionMessage,
        ErrorBody,
    )),
    tags(
        (name = "QA Checklist API", description = "API endpoints for the QA testing checklist tracker.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Request Payloads
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct UpdateInfoRequest {
    pub target_website: Option<String>,
    pub start_date: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct ToggleItemRequest {
    pub heading_id: u64,
    pub item_id: u64,
    pub checked: bool,
}

#[derive(Deserialize, ToSchema)]
pub struct TitlePayload {
    pub title: String,
}

#[derive(Deserialize, ToSchema)]
pub struct AddItemRequest {
    pub heading_id: u64,
    pub text: String,
}

#[derive(Deserialize, ToSchema)]
pub struct TextPayload {
    pub text: String,
}

#[derive(Deserialize, Default, ToSchema)]
pub struct CompleteRequest {
    /// End date of the test run; defaults to today when omitted.
    pub end_date: Option<String>,
}

//=========================================================================================
// API Response Payloads
//=========================================================================================

/// Bare success flag for mutations that return no created object.
#[derive(Serialize, ToSchema)]
pub struct Ack {
    pub success: bool,
}

#[derive(Serialize, ToSchema)]
pub struct SessionEnvelope {
    pub success: bool,
    #[schema(value_type = Object)]
    pub data: Session,
}

#[derive(Serialize, ToSchema)]
pub struct HeadingCreated {
    pub success: bool,
    #[schema(value_type = Object)]
    pub heading: Heading,
}

/// `item` is omitted when the addressed heading does not exist; the
/// operation is still reported as successful.
#[derive(Serialize, ToSchema)]
pub struct ItemCreated {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub item: Option<Item>,
}

#[derive(Serialize, ToSchema)]
pub struct NoteCreated {
    pub success: bool,
    #[schema(value_type = Object)]
    pub note: Note,
}

#[derive(Serialize, ToSchema)]
pub struct ActionMessage {
    pub success: bool,
    pub message: String,
}

/// JSON error body used by every failure response.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// The failure half of every handler result.
type ApiFailure = (StatusCode, Json<ErrorBody>);

/// Maps a core error onto the HTTP boundary: validation failures are the
/// caller's fault (400), everything else is a storage problem (500).
fn failure(err: ChecklistError) -> ApiFailure {
    let status = match &err {
        ChecklistError::Validation(_) => StatusCode::BAD_REQUEST,
        ChecklistError::HistoryUnavailable | ChecklistError::Store(_) => {
            error!("storage failure: {err}");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(ErrorBody { error: err.to_string() }))
}

//=========================================================================================
// Route Table
//=========================================================================================

/// Builds the `/api` route table over the shared state.
pub fn api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/session", get(get_session_handler))
        .route("/api/session/info", post(update_info_handler))
        .route("/api/session/complete", post(complete_session_handler))
        .route("/api/session/reset", post(reset_session_handler))
        .route("/api/checklist/heading", post(add_heading_handler))
        .route(
            "/api/checklist/heading/{heading_id}",
            put(edit_heading_handler).delete(delete_heading_handler),
        )
        .route(
            "/api/checklist/item",
            post(toggle_item_handler).put(add_item_handler),
        )
        .route(
            "/api/checklist/item/{heading_id}/{item_id}",
            put(edit_item_handler).delete(delete_item_handler),
        )
        .route("/api/notes", post(add_note_handler))
        .route(
            "/api/notes/{note_id}",
            put(edit_note_handler).delete(delete_note_handler),
        )
        .route("/api/history", get(get_history_handler))
        .route("/api/history/{project_id}", delete(delete_history_handler))
        .with_state(state)
}

/// Fallback for unmatched routes; mirrors the JSON error shape of the API.
pub async fn not_found_handler() -> ApiFailure {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "Not found".to_string(),
        }),
    )
}

//=========================================================================================
// Session Handlers
//=========================================================================================

/// Get the current session, rebuilding it from defaults when the stored
/// document is absent or corrupt.
#[utoipa::path(
    get,
    path = "/api/session",
    responses(
        (status = 200, description = "The current session document"),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn get_session_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Session>, ApiFailure> {
    let session = state.sessions.current().await.map_err(failure)?;
    Ok(Json(session))
}

/// Update the target website and/or start date.
#[utoipa::path(
    post,
    path = "/api/session/info",
    request_body = UpdateInfoRequest,
    responses(
        (status = 200, description = "The updated session document"),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn update_info_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateInfoRequest>,
) -> Result<Json<SessionEnvelope>, ApiFailure> {
    let session = state
        .sessions
        .update_info(SessionInfoUpdate {
            target_website: req.target_website,
            start_date: req.start_date,
        })
        .await
        .map_err(failure)?;
    Ok(Json(SessionEnvelope {
        success: true,
        data: session,
    }))
}

/// Complete the current session: archive it and start a fresh one.
#[utoipa::path(
    post,
    path = "/api/session/complete",
    request_body = CompleteRequest,
    responses(
        (status = 200, description = "Session archived and reset", body = ActionMessage),
        (status = 400, description = "Target website is missing", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn complete_session_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CompleteRequest>,
) -> Result<Json<ActionMessage>, ApiFailure> {
    let outcome = state
        .sessions
        .complete(req.end_date)
        .await
        .map_err(failure)?;
    debug!(entry_id = outcome.entry.id, "session archived");
    Ok(Json(ActionMessage {
        success: true,
        message: "Session completed successfully".to_string(),
    }))
}

/// Reset the current session without archiving it.
#[utoipa::path(
    post,
    path = "/api/session/reset",
    responses(
        (status = 200, description = "Session reset", body = ActionMessage),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn reset_session_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ActionMessage>, ApiFailure> {
    state.sessions.reset().await.map_err(failure)?;
    Ok(Json(ActionMessage {
        success: true,
        message: "Session reset successfully".to_string(),
    }))
}

//=========================================================================================
// Checklist Handlers
//=========================================================================================

/// Set the checked state of one checklist item. Unknown ids are a no-op
/// that still reports success.
#[utoipa::path(
    post,
    path = "/api/checklist/item",
    request_body = ToggleItemRequest,
    responses(
        (status = 200, description = "Checked state stored", body = Ack),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn toggle_item_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ToggleItemRequest>,
) -> Result<Json<Ack>, ApiFailure> {
    let outcome = state
        .sessions
        .toggle_item(req.heading_id, req.item_id, req.checked)
        .await
        .map_err(failure)?;
    if !outcome.applied() {
        debug!(
            heading_id = req.heading_id,
            item_id = req.item_id,
            "toggle target missing, treated as no-op"
        );
    }
    Ok(Json(Ack { success: true }))
}

/// Add a new heading to the checklist.
#[utoipa::path(
    post,
    path = "/api/checklist/heading",
    request_body = TitlePayload,
    responses(
        (status = 200, description = "The created heading"),
        (status = 400, description = "Title is empty", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn add_heading_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TitlePayload>,
) -> Result<Json<HeadingCreated>, ApiFailure> {
    let heading = state.sessions.add_heading(&req.title).await.map_err(failure)?;
    Ok(Json(HeadingCreated {
        success: true,
        heading,
    }))
}

/// Rename a heading.
#[utoipa::path(
    put,
    path = "/api/checklist/heading/{heading_id}",
    request_body = TitlePayload,
    params(("heading_id" = u64, Path, description = "Id of the heading to rename")),
    responses(
        (status = 200, description = "Title stored", body = Ack),
        (status = 400, description = "Title is empty", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn edit_heading_handler(
    State(state): State<Arc<AppState>>,
    Path(heading_id): Path<u64>,
    Json(req): Json<TitlePayload>,
) -> Result<Json<Ack>, ApiFailure> {
    let outcome = state
        .sessions
        .edit_heading(heading_id, &req.title)
        .await
        .map_err(failure)?;
    if !outcome.applied() {
        debug!(heading_id, "edit target missing, treated as no-op");
    }
    Ok(Json(Ack { success: true }))
}

/// Delete a heading and all items under it.
#[utoipa::path(
    delete,
    path = "/api/checklist/heading/{heading_id}",
    params(("heading_id" = u64, Path, description = "Id of the heading to delete")),
    responses(
        (status = 200, description = "Heading removed (or already gone)", body = Ack),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn delete_heading_handler(
    State(state): State<Arc<AppState>>,
    Path(heading_id): Path<u64>,
) -> Result<Json<Ack>, ApiFailure> {
    state
        .sessions
        .delete_heading(heading_id)
        .await
        .map_err(failure)?;
    Ok(Json(Ack { success: true }))
}

/// Add a new item to a heading.
#[utoipa::path(
    put,
    path = "/api/checklist/item",
    request_body = AddItemRequest,
    responses(
        (status = 200, description = "The created item, when the heading exists"),
        (status = 400, description = "Text is empty", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn add_item_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<ItemCreated>, ApiFailure> {
    let item = state
        .sessions
        .add_item(req.heading_id, &req.text)
        .await
        .map_err(failure)?;
    if item.is_none() {
        debug!(heading_id = req.heading_id, "add-item heading missing, treated as no-op");
    }
    Ok(Json(ItemCreated {
        success: true,
        item,
    }))
}

/// Replace an item's text.
#[utoipa::path(
    put,
    path = "/api/checklist/item/{heading_id}/{item_id}",
    request_body = TextPayload,
    params(
        ("heading_id" = u64, Path, description = "Id of the parent heading"),
        ("item_id" = u64, Path, description = "Id of the item within the heading")
    ),
    responses(
        (status = 200, description = "Text stored", body = Ack),
        (status = 400, description = "Text is empty", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn edit_item_handler(
    State(state): State<Arc<AppState>>,
    Path((heading_id, item_id)): Path<(u64, u64)>,
    Json(req): Json<TextPayload>,
) -> Result<Json<Ack>, ApiFailure> {
    let outcome = state
        .sessions
        .edit_item(heading_id, item_id, &req.text)
        .await
        .map_err(failure)?;
    if !outcome.applied() {
        debug!(heading_id, item_id, "edit target missing, treated as no-op");
    }
    Ok(Json(Ack { success: true }))
}

/// Delete an item from a heading.
#[utoipa::path(
    delete,
    path = "/api/checklist/item/{heading_id}/{item_id}",
    params(
        ("heading_id" = u64, Path, description = "Id of the parent heading"),
        ("item_id" = u64, Path, description = "Id of the item within the heading")
    ),
    responses(
        (status = 200, description = "Item removed (or already gone)", body = Ack),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn delete_item_handler(
    State(state): State<Arc<AppState>>,
    Path((heading_id, item_id)): Path<(u64, u64)>,
) -> Result<Json<Ack>, ApiFailure> {
    state
        .sessions
        .delete_item(heading_id, item_id)
        .await
        .map_err(failure)?;
    Ok(Json(Ack { success: true }))
}

//=========================================================================================
// Note Handlers
//=========================================================================================

/// Add a freeform note to the session.
#[utoipa::path(
    post,
    path = "/api/notes",
    request_body = TextPayload,
    responses(
        (status = 200, description = "The created note"),
        (status = 400, description = "Text is empty", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn add_note_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TextPayload>,
) -> Result<Json<NoteCreated>, ApiFailure> {
    let note = state.sessions.add_note(&req.text).await.map_err(failure)?;
    Ok(Json(NoteCreated {
        success: true,
        note,
    }))
}

/// Replace a note's text.
#[utoipa::path(
    put,
    path = "/api/notes/{note_id}",
    request_body = TextPayload,
    params(("note_id" = u64, Path, description = "Id of the note")),
    responses(
        (status = 200, description = "Text stored", body = Ack),
        (status = 400, description = "Text is empty", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn edit_note_handler(
    State(state): State<Arc<AppState>>,
    Path(note_id): Path<u64>,
    Json(req): Json<TextPayload>,
) -> Result<Json<Ack>, ApiFailure> {
    let outcome = state
        .sessions
        .edit_note(note_id, &req.text)
        .await
        .map_err(failure)?;
    if !outcome.applied() {
        debug!(note_id, "edit target missing, treated as no-op");
    }
    Ok(Json(Ack { success: true }))
}

/// Delete a note.
#[utoipa::path(
    delete,
    path = "/api/notes/{note_id}",
    params(("note_id" = u64, Path, description = "Id of the note")),
    responses(
        (status = 200, description = "Note removed (or already gone)", body = Ack),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn delete_note_handler(
    State(state): State<Arc<AppState>>,
    Path(note_id): Path<u64>,
) -> Result<Json<Ack>, ApiFailure> {
    state.sessions.delete_note(note_id).await.map_err(failure)?;
    Ok(Json(Ack { success: true }))
}

//=========================================================================================
// History Handlers
//=========================================================================================

/// List the completed-session archive, oldest first.
#[utoipa::path(
    get,
    path = "/api/history",
    responses(
        (status = 200, description = "All archived entries"),
        (status = 500, description = "Archive unavailable", body = ErrorBody)
    )
)]
pub async fn get_history_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CompletedEntry>>, ApiFailure> {
    let entries = state.history.list().await.map_err(failure)?;
    Ok(Json(entries))
}

/// Delete one archived entry.
#[utoipa::path(
    delete,
    path = "/api/history/{project_id}",
    params(("project_id" = u64, Path, description = "Id of the archived entry")),
    responses(
        (status = 200, description = "Entry removed (or already gone)", body = Ack),
        (status = 500, description = "Archive unavailable", body = ErrorBody)
    )
)]
pub async fn delete_history_handler(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<u64>,
) -> Result<Json<Ack>, ApiFailure> {
    let outcome = state.history.delete(project_id).await.map_err(failure)?;
    if !outcome.applied() {
        debug!(project_id, "history entry missing, treated as no-op");
    }
    Ok(Json(Ack { success: true }))
}
