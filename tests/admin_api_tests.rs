//! REST 接口集成测试
//!
//! 通过 actix_web::test 驱动完整的 App（AdminAuth + NonceGuard + 路由）。

use std::sync::Arc;
use std::sync::Once;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::App;
use serde_json::{Value, json};
use tempfile::TempDir;

use smart_utm::api::constants::{NONCE_ACTION_BULK, NONCE_ACTION_REST, NONCE_HEADER};
use smart_utm::api::jwt::get_jwt_service;
use smart_utm::config::init_config;
use smart_utm::runtime::lifetime::startup::StartupContext;
use smart_utm::storage::{ContentItem, ContentSource, SeaOrmStorage};

// =============================================================================
// 测试环境初始化
// =============================================================================

static INIT: Once = Once::new();

fn init_static_config() {
    INIT.call_once(|| {
        init_config();
    });
}

async fn setup(name: &str) -> (TempDir, StartupContext) {
    init_static_config();
    let temp_dir = TempDir::new().expect("创建临时目录失败");
    let db_path = temp_dir.path().join(format!("{}.db", name));
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = Arc::new(
        SeaOrmStorage::new(&db_url, "sqlite")
            .await
            .expect("创建存储失败"),
    );
    let context = StartupContext::build(storage)
        .await
        .expect("组装服务失败");
    (temp_dir, context)
}

fn bearer(user: &str, role: &str) -> (&'static str, String) {
    let token = get_jwt_service()
        .generate_access_token(user, role, None)
        .expect("签发 token 失败");
    ("Authorization", format!("Bearer {}", token))
}

fn nonce(user: &str, action: &str) -> (&'static str, String) {
    let nonce = get_jwt_service()
        .generate_nonce(user, action)
        .expect("签发 nonce 失败");
    (NONCE_HEADER, nonce)
}

fn url(ctx: &StartupContext, path: &str) -> String {
    format!("{}{}", ctx.route_config.admin_prefix, path)
}

fn post_item(id: i64, slug: &str) -> ContentItem {
    ContentItem {
        id,
        content_type: "post".to_string(),
        status: "publish".to_string(),
        title: format!("Post {}", id),
        slug: slug.to_string(),
        permalink: Some(format!("https://site.example/{}/", slug)),
        author: "jane".to_string(),
        categories: vec![],
        updated_at: chrono::Utc::now(),
    }
}

macro_rules! app {
    ($ctx:expr) => {
        test::init_service(App::new().configure(|cfg| $ctx.configure(cfg))).await
    };
}

// =============================================================================
// 认证与 nonce
// =============================================================================

#[actix_rt::test]
async fn test_missing_token_is_unauthorized() {
    let (_dir, ctx) = setup("api_no_token").await;
    let app = app!(ctx);

    let req = TestRequest::get().uri(&url(&ctx, "/v1/presets")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1001);
}

#[actix_rt::test]
async fn test_subscriber_and_unknown_roles_are_forbidden() {
    let (_dir, ctx) = setup("api_roles").await;
    let app = app!(ctx);

    for role in ["subscriber", "superhero"] {
        let req = TestRequest::get()
            .uri(&url(&ctx, "/v1/presets"))
            .insert_header(bearer("bob", role))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN, "role {}", role);
    }
}

#[actix_rt::test]
async fn test_mutation_requires_nonce_bound_to_user() {
    let (_dir, ctx) = setup("api_nonce").await;
    let app = app!(ctx);

    let req = TestRequest::post()
        .uri(&url(&ctx, "/v1/bulk"))
        .insert_header(bearer("alice", "administrator"))
        .set_json(json!({ "action": "generate_all" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 2003);

    // 其他用户的 nonce 无效
    let req = TestRequest::post()
        .uri(&url(&ctx, "/v1/bulk"))
        .insert_header(bearer("alice", "administrator"))
        .insert_header(nonce("mallory", NONCE_ACTION_REST))
        .set_json(json!({ "action": "generate_all" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn test_issue_nonces_for_current_user() {
    let (_dir, ctx) = setup("api_issue_nonce").await;
    let app = app!(ctx);

    let req = TestRequest::get()
        .uri(&url(&ctx, "/v1/auth/nonce"))
        .insert_header(bearer("erin", "editor"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["user"], "erin");
    assert_eq!(body["data"]["role"], "editor");
    let jwt = get_jwt_service();
    assert!(jwt.verify_nonce(body["data"]["rest"].as_str().unwrap(), "erin", NONCE_ACTION_REST));
    assert!(jwt.verify_nonce(body["data"]["bulk"].as_str().unwrap(), "erin", NONCE_ACTION_BULK));
}

// =============================================================================
// 预设
// =============================================================================

#[actix_rt::test]
async fn test_preset_crud_over_rest() {
    let (_dir, ctx) = setup("api_presets").await;
    let app = app!(ctx);

    let req = TestRequest::get()
        .uri(&url(&ctx, "/v1/presets"))
        .insert_header(bearer("erin", "editor"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["facebook"]["utm_source"], "facebook");

    let req = TestRequest::post()
        .uri(&url(&ctx, "/v1/presets"))
        .insert_header(bearer("erin", "editor"))
        .insert_header(nonce("erin", NONCE_ACTION_REST))
        .set_json(json!({ "id": "podcast", "preset": { "name": "Podcast", "utm_source": "pod" } }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = TestRequest::get()
        .uri(&url(&ctx, "/v1/presets/podcast"))
        .insert_header(bearer("erin", "editor"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["utm_source"], "pod");

    let req = TestRequest::post()
        .uri(&url(&ctx, "/v1/presets"))
        .insert_header(bearer("erin", "editor"))
        .insert_header(nonce("erin", NONCE_ACTION_REST))
        .set_json(json!({ "id": "empty", "preset": {} }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = TestRequest::delete()
        .uri(&url(&ctx, "/v1/presets/podcast"))
        .insert_header(bearer("erin", "editor"))
        .insert_header(nonce("erin", NONCE_ACTION_REST))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = TestRequest::get()
        .uri(&url(&ctx, "/v1/presets/podcast"))
        .insert_header(bearer("erin", "editor"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// 内容、链接、模板
// =============================================================================

#[actix_rt::test]
async fn test_content_saved_then_list_links() {
    let (_dir, ctx) = setup("api_content").await;
    let app = app!(ctx);

    let req = TestRequest::post()
        .uri(&url(&ctx, "/v1/content"))
        .insert_header(bearer("erin", "editor"))
        .insert_header(nonce("erin", NONCE_ACTION_REST))
        .set_json(json!({
            "id": 11,
            "content_type": "post",
            "status": "publish",
            "title": "Launch Day",
            "slug": "launch-day",
            "permalink": "https://site.example/launch-day/",
            "author": "jane",
            "categories": ["news"]
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["post_id"], 11);
    assert_eq!(body["data"]["links"].as_object().unwrap().len(), 4);

    let req = TestRequest::get()
        .uri(&url(&ctx, "/v1/links?per_page=10"))
        .insert_header(bearer("erin", "editor"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["links"].as_array().unwrap().len(), 4);
    assert_eq!(
        body["data"]["links"][0]["original_url"],
        "https://site.example/launch-day/"
    );
}

#[actix_rt::test]
async fn test_update_and_delete_single_link() {
    let (_dir, ctx) = setup("api_link_edit").await;
    let app = app!(ctx);

    let req = TestRequest::put()
        .uri(&url(&ctx, "/v1/links/5/facebook"))
        .insert_header(bearer("erin", "editor"))
        .insert_header(nonce("erin", NONCE_ACTION_REST))
        .set_json(json!({ "utm_url": "not a url" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = TestRequest::put()
        .uri(&url(&ctx, "/v1/links/5/facebook"))
        .insert_header(bearer("erin", "editor"))
        .insert_header(nonce("erin", NONCE_ACTION_REST))
        .set_json(json!({ "utm_url": "https://site.example/?utm_source=fb" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["url"], "https://site.example/?utm_source=fb");

    let req = TestRequest::delete()
        .uri(&url(&ctx, "/v1/links/5/facebook"))
        .insert_header(bearer("erin", "editor"))
        .insert_header(nonce("erin", NONCE_ACTION_REST))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = TestRequest::delete()
        .uri(&url(&ctx, "/v1/links/5/facebook"))
        .insert_header(bearer("erin", "editor"))
        .insert_header(nonce("erin", NONCE_ACTION_REST))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_generate_links_requires_post_id() {
    let (_dir, ctx) = setup("api_generate").await;
    let app = app!(ctx);

    let req = TestRequest::post()
        .uri(&url(&ctx, "/v1/links"))
        .insert_header(bearer("erin", "editor"))
        .insert_header(nonce("erin", NONCE_ACTION_REST))
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_template_preview() {
    let (_dir, ctx) = setup("api_template").await;
    ctx.storage
        .save_item(&post_item(21, "preview-me"))
        .await
        .unwrap();
    let app = app!(ctx);

    let req = TestRequest::get()
        .uri(&url(&ctx, "/v1/templates/preview/21"))
        .insert_header(bearer("erin", "editor"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let preview = body["data"]["url"].as_str().unwrap();
    assert!(preview.starts_with("https://site.example/preview-me/?utm_source=website"));
    assert!(preview.contains("utm_campaign=uncategorized_"));

    let req = TestRequest::get()
        .uri(&url(&ctx, "/v1/templates/preview/999"))
        .insert_header(bearer("erin", "editor"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = TestRequest::post()
        .uri(&url(&ctx, "/v1/templates"))
        .insert_header(bearer("erin", "editor"))
        .insert_header(nonce("erin", NONCE_ACTION_REST))
        .set_json(json!({ "utm_source": "x" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// 批量处理与设置
// =============================================================================

#[actix_rt::test]
async fn test_bulk_over_rest() {
    let (_dir, ctx) = setup("api_bulk").await;
    let app = app!(ctx);

    let req = TestRequest::post()
        .uri(&url(&ctx, "/v1/bulk"))
        .insert_header(bearer("alice", "administrator"))
        .insert_header(nonce("alice", NONCE_ACTION_REST))
        .set_json(json!({ "action": "generate_all" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "No posts found.");

    ctx.storage.save_item(&post_item(1, "one")).await.unwrap();
    ctx.storage.save_item(&post_item(2, "two")).await.unwrap();

    let req = TestRequest::post()
        .uri(&url(&ctx, "/v1/bulk"))
        .insert_header(bearer("alice", "administrator"))
        .insert_header(nonce("alice", NONCE_ACTION_REST))
        .set_json(json!({ "action": "refresh_all" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["processed"], 2);
    assert_eq!(body["data"]["message"], "Processed 2 of 2 posts.");

    let req = TestRequest::post()
        .uri(&url(&ctx, "/v1/bulk"))
        .insert_header(bearer("alice", "administrator"))
        .insert_header(nonce("alice", NONCE_ACTION_REST))
        .set_json(json!({ "action": "purge" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 5001);
}

#[actix_rt::test]
async fn test_settings_admin_only_and_masked() {
    let (_dir, ctx) = setup("api_settings").await;
    let app = app!(ctx);

    let req = TestRequest::get()
        .uri(&url(&ctx, "/v1/settings"))
        .insert_header(bearer("erin", "editor"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = TestRequest::put()
        .uri(&url(&ctx, "/v1/settings"))
        .insert_header(bearer("alice", "administrator"))
        .insert_header(nonce("alice", NONCE_ACTION_REST))
        .set_json(json!({ "shortener_service": "rebrandly", "rebrandly_api_key": "rb-key" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["shortener_service"], "rebrandly");
    assert_eq!(body["data"]["rebrandly_api_key"], "********");

    let req = TestRequest::get()
        .uri(&url(&ctx, "/v1/settings"))
        .insert_header(bearer("alice", "administrator"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["include_posts"], true);
    assert_eq!(body["data"]["bitly_api_key"], "");
}

// =============================================================================
// 旧版 action 接口
// =============================================================================

#[actix_rt::test]
async fn test_legacy_bulk_action() {
    let (_dir, ctx) = setup("api_legacy").await;
    ctx.storage.save_item(&post_item(1, "one")).await.unwrap();
    let app = app!(ctx);

    let bulk_nonce = |user: &str| get_jwt_service().generate_nonce(user, NONCE_ACTION_BULK).unwrap();

    // nonce 错误优先于权限检查
    let req = TestRequest::post()
        .uri(&url(&ctx, "/legacy/action"))
        .insert_header(bearer("erin", "editor"))
        .set_form([
            ("action", "smart_utm_bulk_process".to_string()),
            ("action_type", "generate_all".to_string()),
            ("nonce", "bogus".to_string()),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["data"]["message"], "Security check failed.");

    let req = TestRequest::post()
        .uri(&url(&ctx, "/legacy/action"))
        .insert_header(bearer("erin", "editor"))
        .set_form([
            ("action", "smart_utm_bulk_process".to_string()),
            ("action_type", "generate_all".to_string()),
            ("nonce", bulk_nonce("erin")),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["message"], "Insufficient permissions.");

    let req = TestRequest::post()
        .uri(&url(&ctx, "/legacy/action"))
        .insert_header(bearer("alice", "administrator"))
        .set_form([
            ("action", "smart_utm_bulk_process".to_string()),
            ("action_type", "generate_all".to_string()),
            ("nonce", bulk_nonce("alice")),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["processed"], 1);
}
