//! 宿主保存通知

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, Responder, Result as ActixResult, web};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::errors::Result;
use crate::services::{LinkSet, LinkStore};
use crate::storage::{ContentSource, SeaOrmStorage};
use crate::system::event::{Event, EventBus};

use super::error_code::ErrorCode;
use super::helpers::{api_result, error_response};
use super::types::ContentSavedRequest;

#[derive(Serialize)]
struct ContentSavedResponse {
    post_id: i64,
    links: LinkSet,
}

/// 保存内容快照并发布 ContentSaved
///
/// 自动生成由事件处理器完成，响应返回处理后的链接集合。
pub async fn content_saved(
    _req: HttpRequest,
    body: web::Json<ContentSavedRequest>,
    storage: web::Data<Arc<SeaOrmStorage>>,
    links: web::Data<Arc<LinkStore>>,
    events: web::Data<Arc<EventBus>>,
) -> ActixResult<impl Responder> {
    let request = body.into_inner();
    if request.item.id <= 0 {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidParameters,
            "Invalid post ID.",
        ));
    }

    info!(
        "Admin API: content saved id={} type={} autosave={} revision={}",
        request.item.id, request.item.content_type, request.is_autosave, request.is_revision
    );

    Ok(api_result(
        handle_save(request, &storage, &links, &events).await,
    ))
}

async fn handle_save(
    request: ContentSavedRequest,
    storage: &SeaOrmStorage,
    links: &LinkStore,
    events: &EventBus,
) -> Result<ContentSavedResponse> {
    let item = request.item;
    storage.save_item(&item).await?;

    events
        .publish(Event::content_saved(
            item.id,
            &item.content_type,
            request.is_autosave,
            request.is_revision,
            "rest",
        ))
        .await;

    Ok(ContentSavedResponse {
        post_id: item.id,
        links: links.list_for(item.id).await?,
    })
}
