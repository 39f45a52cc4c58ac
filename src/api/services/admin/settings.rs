//! Admin API 设置管理（仅管理员）

use actix_web::{HttpRequest, Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::{info, trace};

use crate::services::{SettingsService, SettingsUpdate};

use super::helpers::{api_result, require_admin};

/// 获取设置，凭据打码
pub async fn get_settings(
    req: HttpRequest,
    settings: web::Data<Arc<SettingsService>>,
) -> ActixResult<impl Responder> {
    if let Err(resp) = require_admin(&req) {
        return Ok(resp);
    }

    trace!("Admin API: get settings");
    Ok(api_result(settings.load().await.map(|s| s.masked())))
}

/// 部分更新设置
pub async fn update_settings(
    req: HttpRequest,
    body: web::Json<SettingsUpdate>,
    settings: web::Data<Arc<SettingsService>>,
) -> ActixResult<impl Responder> {
    let user = match require_admin(&req) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    info!("Admin API: settings update by {}", user.user);
    Ok(api_result(settings.update(&body).await.map(|s| s.masked())))
}
