//! Admin API 批量处理

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::info;

use crate::services::{BulkAction, BulkProcessor};
use crate::utm::sanitize_text_field;

use super::error_code::ErrorCode;
use super::helpers::{api_result, error_response};
use super::types::BulkRequest;

/// 触发批量生成 / 刷新 / 删除
pub async fn run_bulk(
    _req: HttpRequest,
    body: web::Json<BulkRequest>,
    processor: web::Data<Arc<BulkProcessor>>,
) -> ActixResult<impl Responder> {
    let raw = body
        .action
        .as_deref()
        .map(sanitize_text_field)
        .unwrap_or_default();

    let Ok(action) = BulkAction::parse(&raw) else {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::BulkInvalidAction,
            "Invalid action.",
        ));
    };

    info!("Admin API: bulk {} requested", action.as_ref());
    Ok(api_result(processor.run(action, "rest").await))
}
