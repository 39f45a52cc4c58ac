//! 旧版 action 分发接口
//!
//! 表单提交 `{action, action_type, nonce}`，响应 `{success, data}`。
//! 只支持批量处理，nonce 必须是当前用户的 `bulk` nonce。

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::constants::{LEGACY_BULK_ACTION, NONCE_ACTION_BULK};
use crate::api::jwt::get_jwt_service;
use crate::api::middleware::CurrentUser;
use crate::errors::UtmError;
use crate::services::{BulkAction, BulkProcessor};
use crate::utm::sanitize_text_field;

use super::helpers::legacy_response;
use super::types::{LegacyActionForm, LegacyMessage};

fn legacy_error(status: StatusCode, message: &str) -> actix_web::HttpResponse {
    legacy_response(
        status,
        false,
        LegacyMessage {
            message: message.to_string(),
        },
    )
}

pub async fn legacy_action(
    req: HttpRequest,
    form: web::Form<LegacyActionForm>,
    processor: web::Data<Arc<BulkProcessor>>,
) -> ActixResult<impl Responder> {
    if form.action != LEGACY_BULK_ACTION {
        return Ok(legacy_error(StatusCode::BAD_REQUEST, "Invalid action."));
    }

    let Some(user) = CurrentUser::from_request(&req) else {
        return Ok(legacy_error(StatusCode::UNAUTHORIZED, "Unauthorized."));
    };

    // 先校验 nonce，再校验权限
    if !get_jwt_service().verify_nonce(form.nonce.trim(), &user.user, NONCE_ACTION_BULK) {
        warn!("Legacy action: nonce check failed for {}", user.user);
        return Ok(legacy_error(StatusCode::FORBIDDEN, "Security check failed."));
    }

    if !user.role.can_manage_options() {
        return Ok(legacy_error(
            StatusCode::FORBIDDEN,
            "Insufficient permissions.",
        ));
    }

    let Ok(action) = BulkAction::parse(&sanitize_text_field(&form.action_type)) else {
        return Ok(legacy_error(StatusCode::BAD_REQUEST, "Invalid action."));
    };

    info!(
        "Legacy action: bulk {} requested by {}",
        action.as_ref(),
        user.user
    );
    Ok(match processor.run(action, "legacy").await {
        Ok(result) => legacy_response(StatusCode::OK, true, result),
        Err(UtmError::BulkAborted(message)) => legacy_error(StatusCode::BAD_REQUEST, &message),
        Err(e) => legacy_error(e.http_status(), e.message()),
    })
}
