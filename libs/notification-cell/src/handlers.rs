// libs/notification-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};

use shared_models::entities::Notification;
use shared_models::error::AppError;
use shared_store::AppState;

use crate::models::{MarkReadQuery, NotificationListQuery};
use crate::services::NotificationDispatchService;

#[axum::debug_handler]
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NotificationListQuery>,
) -> Result<Json<Vec<Notification>>, AppError> {
    let service = NotificationDispatchService::new(state.store.clone());
    let notifications = service.list_for_user(query.user_id).await?;
    Ok(Json(notifications))
}

#[axum::debug_handler]
pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MarkReadQuery>,
) -> Result<Json<Value>, AppError> {
    let service = NotificationDispatchService::new(state.store.clone());
    service.mark_read(query.id).await?;
    Ok(Json(json!({ "message": "marked" })))
}
