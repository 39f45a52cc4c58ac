//! Admin API 模板管理

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::{info, trace};

use crate::services::{TemplateStore, validate_template};
use crate::storage::{ContentSource, SeaOrmStorage};
use crate::utm::UtmFields;

use super::error_code::ErrorCode;
use super::helpers::{api_result, error_response, success_response};
use super::types::TemplatePreviewResponse;

/// 获取全局模板
pub async fn get_template(
    _req: HttpRequest,
    store: web::Data<Arc<TemplateStore>>,
) -> ActixResult<impl Responder> {
    trace!("Admin API: get template");
    Ok(api_result(store.get().await))
}

/// 整体替换模板
pub async fn update_template(
    _req: HttpRequest,
    body: web::Json<UtmFields>,
    store: web::Data<Arc<TemplateStore>>,
) -> ActixResult<impl Responder> {
    if !validate_template(&body) {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::TemplateInvalid,
            "Invalid template.",
        ));
    }

    info!("Admin API: updating template");
    Ok(api_result(store.set(&body).await))
}

/// 用当前模板预览某条内容的链接
pub async fn preview_template(
    _req: HttpRequest,
    path: web::Path<i64>,
    store: web::Data<Arc<TemplateStore>>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    let post_id = path.into_inner();
    trace!("Admin API: template preview for item {}", post_id);

    let item = match storage.get_item(post_id).await {
        Ok(Some(item)) => item,
        Ok(None) => {
            return Ok(error_response(
                StatusCode::NOT_FOUND,
                ErrorCode::ItemNotFound,
                "Post not found.",
            ));
        }
        Err(e) => return Ok(api_result::<(), _>(Err(e))),
    };

    Ok(match store.preview(&item).await {
        Ok(Some(url)) => success_response(TemplatePreviewResponse { post_id, url }),
        Ok(None) => error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::PreviewUnavailable,
            "No URL could be built for this post.",
        ),
        Err(e) => api_result::<(), _>(Err(e)),
    })
}
