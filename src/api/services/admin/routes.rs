//! Admin API 路由配置
//!
//! 将 /v1 下的路由按功能模块拆分，提高可读性和可维护性。

use actix_web::web;

use super::auth::issue_nonces;
use super::bulk::run_bulk;
use super::content::content_saved;
use super::legacy::legacy_action;
use super::links::{delete_link, generate_links, get_links, update_link};
use super::presets::{create_preset, delete_preset, get_preset, get_presets, update_preset};
use super::settings::{get_settings, update_settings};
use super::templates::{get_template, preview_template, update_template};
use super::tools::{campaign_metrics, generate_qr, shorten_url};

/// 链接路由 `/links`
///
/// 包含：
/// - GET /links - 分页浏览链接
/// - POST /links - 为单条内容生成链接
/// - POST|PUT /links/{id}/{preset} - 覆盖单条链接
/// - DELETE /links/{id}/{preset} - 删除单条链接
pub fn links_routes() -> actix_web::Scope {
    web::scope("/links")
        .route("", web::get().to(get_links))
        .route("", web::post().to(generate_links))
        .route(
            "/{id:\\d+}/{preset:[a-zA-Z0-9_-]+}",
            web::post().to(update_link),
        )
        .route(
            "/{id:\\d+}/{preset:[a-zA-Z0-9_-]+}",
            web::put().to(update_link),
        )
        .route(
            "/{id:\\d+}/{preset:[a-zA-Z0-9_-]+}",
            web::delete().to(delete_link),
        )
}

/// 模板路由 `/templates`
pub fn templates_routes() -> actix_web::Scope {
    web::scope("/templates")
        .route("", web::get().to(get_template))
        .route("", web::post().to(update_template))
        .route("", web::put().to(update_template))
        .route("/preview/{post_id:\\d+}", web::get().to(preview_template))
}

/// 预设路由 `/presets`
pub fn presets_routes() -> actix_web::Scope {
    web::scope("/presets")
        .route("", web::get().to(get_presets))
        .route("", web::post().to(create_preset))
        .route("/{id:[a-zA-Z0-9_-]+}", web::get().to(get_preset))
        .route("/{id:[a-zA-Z0-9_-]+}", web::post().to(update_preset))
        .route("/{id:[a-zA-Z0-9_-]+}", web::put().to(update_preset))
        .route("/{id:[a-zA-Z0-9_-]+}", web::delete().to(delete_preset))
}

/// 设置路由 `/settings`（仅管理员）
pub fn settings_routes() -> actix_web::Scope {
    web::scope("/settings")
        .route("", web::get().to(get_settings))
        .route("", web::post().to(update_settings))
        .route("", web::put().to(update_settings))
}

/// 外部集成路由 `/tools`
pub fn tools_routes() -> actix_web::Scope {
    web::scope("/tools")
        .route("/shorten", web::post().to(shorten_url))
        .route("/qr", web::post().to(generate_qr))
}

/// 统计路由 `/analytics`
pub fn analytics_routes() -> actix_web::Scope {
    web::scope("/analytics").route("/campaigns/{campaign}", web::get().to(campaign_metrics))
}

/// 认证路由 `/auth`
pub fn auth_routes() -> actix_web::Scope {
    web::scope("/auth").route("/nonce", web::get().to(issue_nonces))
}

/// Admin API v1 路由
///
/// 组合所有子模块路由
pub fn admin_v1_routes() -> actix_web::Scope {
    web::scope("/v1")
        .service(links_routes())
        .service(templates_routes())
        .service(presets_routes())
        .service(settings_routes())
        .service(tools_routes())
        .service(analytics_routes())
        .service(auth_routes())
        .route("/bulk", web::post().to(run_bulk))
        .route("/content", web::post().to(content_saved))
}

/// 旧版 action 分发路由 `/legacy`
pub fn legacy_routes() -> actix_web::Scope {
    web::scope("/legacy").route("/action", web::post().to(legacy_action))
}
