//! Admin API 链接操作

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::{info, trace};

use crate::errors::Result;
use crate::services::{LinkStore, SettingsService};
use crate::storage::{ContentQuery, STATUS_PUBLISH};
use crate::system::event::{Event, EventBus};
use crate::utm::sanitize_text_field;

use super::error_code::ErrorCode;
use super::helpers::{api_result, error_response};
use super::types::{GenerateLinksRequest, GetLinksQuery, LinksResponse, UpdateLinkRequest};

const DEFAULT_PER_PAGE: u64 = 20;
const MAX_PER_PAGE: u64 = 100;

/// 获取所有链接（分页，按内容计数）
pub async fn get_links(
    _req: HttpRequest,
    query: web::Query<GetLinksQuery>,
    links: web::Data<Arc<LinkStore>>,
    settings: web::Data<Arc<SettingsService>>,
) -> ActixResult<impl Responder> {
    trace!("Admin API: request to list links with filters: {:?}", query);

    let result = list_links(&query, &links, &settings).await;
    Ok(api_result(result))
}

async fn list_links(
    query: &GetLinksQuery,
    links: &LinkStore,
    settings: &SettingsService,
) -> Result<LinksResponse> {
    let content_types = settings.load().await?.enabled_content_types();
    if content_types.is_empty() {
        return Ok(LinksResponse {
            links: Vec::new(),
            total: 0,
        });
    }

    let search = query
        .search
        .as_deref()
        .map(sanitize_text_field)
        .filter(|s| !s.is_empty());

    let content_query = ContentQuery {
        content_types,
        status: Some(STATUS_PUBLISH.to_string()),
        search,
        page: query.page.unwrap_or(1).max(1),
        per_page: query
            .per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE),
    };

    let (rows, total) = links.browse(&content_query).await?;
    trace!(
        "Admin API: returning {} link rows (total items: {})",
        rows.len(),
        total
    );
    Ok(LinksResponse { links: rows, total })
}

/// 为单条内容按全部预设生成链接
pub async fn generate_links(
    _req: HttpRequest,
    body: web::Json<GenerateLinksRequest>,
    links: web::Data<Arc<LinkStore>>,
    events: web::Data<Arc<EventBus>>,
) -> ActixResult<impl Responder> {
    let Some(post_id) = body.post_id.filter(|id| *id > 0) else {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidParameters,
            "Invalid post ID.",
        ));
    };

    info!("Admin API: generating links for item {}", post_id);
    let result = links.generate_all(post_id).await;
    if let Ok(generated) = &result
        && !generated.is_empty()
    {
        events
            .publish(Event::links_generated(
                post_id,
                generated.keys().cloned().collect(),
                "rest",
            ))
            .await;
    }

    Ok(api_result(result))
}

/// 手工覆盖单条链接
pub async fn update_link(
    _req: HttpRequest,
    path: web::Path<(i64, String)>,
    body: web::Json<UpdateLinkRequest>,
    links: web::Data<Arc<LinkStore>>,
) -> ActixResult<impl Responder> {
    let (post_id, preset_id) = path.into_inner();
    let preset_id = sanitize_text_field(&preset_id);
    let utm_url = body.utm_url.as_deref().map(str::trim).unwrap_or_default();

    if post_id <= 0 || preset_id.is_empty() || utm_url.is_empty() {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidParameters,
            "Invalid parameters.",
        ));
    }

    info!(
        "Admin API: updating link item={} preset={}",
        post_id, preset_id
    );
    Ok(api_result(links.upsert(post_id, &preset_id, utm_url).await))
}

/// 删除单条链接
pub async fn delete_link(
    _req: HttpRequest,
    path: web::Path<(i64, String)>,
    links: web::Data<Arc<LinkStore>>,
    events: web::Data<Arc<EventBus>>,
) -> ActixResult<impl Responder> {
    let (post_id, preset_id) = path.into_inner();
    let preset_id = sanitize_text_field(&preset_id);

    if post_id <= 0 || preset_id.is_empty() {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidParameters,
            "Invalid parameters.",
        ));
    }

    info!(
        "Admin API: deleting link item={} preset={}",
        post_id, preset_id
    );
    let result = links.delete(post_id, &preset_id).await;
    if result.is_ok() {
        events
            .publish(Event::links_deleted(post_id, vec![preset_id.clone()], "rest"))
            .await;
    }

    Ok(api_result(result.map(|_| {
        serde_json::json!({ "post_id": post_id, "preset": preset_id })
    })))
}
