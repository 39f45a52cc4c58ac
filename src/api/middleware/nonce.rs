//! Nonce 校验中间件
//!
//! 非安全方法必须在 X-UTM-Nonce 头中携带绑定当前用户的 `rest` nonce。
//!
//! 跳过规则：
//! - 安全方法（GET, HEAD, OPTIONS）
//! - 旧版 action 接口（表单自带 bulk nonce，由 handler 校验）

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::{Method, header::CONTENT_TYPE},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{trace, warn};

use crate::api::constants::{NONCE_ACTION_REST, NONCE_HEADER};
use crate::api::jwt::get_jwt_service;
use crate::api::services::admin::{ApiResponse, ErrorCode};
use crate::config::get_config;

use super::auth::CurrentUser;

#[derive(Clone)]
pub struct NonceGuard;

impl<S, B> Transform<S, ServiceRequest> for NonceGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = NonceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        let admin_prefix = get_config().server.admin_prefix.clone();

        ready(Ok(NonceMiddleware {
            service: Rc::new(service),
            legacy_path: format!("{}/legacy/action", admin_prefix),
        }))
    }
}

pub struct NonceMiddleware<S> {
    service: Rc<S>,
    legacy_path: String,
}

impl<S, B> NonceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    /// 返回 403 Forbidden 响应
    fn handle_nonce_error(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        warn!("Nonce validation failed for {}", req.path());
        req.into_response(
            HttpResponse::Forbidden()
                .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
                .json(ApiResponse::<()> {
                    code: ErrorCode::NonceInvalid as i32,
                    message: "Cookie check failed: nonce missing or invalid".to_string(),
                    data: None,
                })
                .map_into_right_body(),
        )
    }

    /// 检查是否是安全方法（不修改资源）
    fn is_safe_method(method: &Method) -> bool {
        matches!(method, &Method::GET | &Method::HEAD | &Method::OPTIONS)
    }

    fn validate_nonce(req: &ServiceRequest) -> bool {
        let Some(user) = req.extensions().get::<CurrentUser>().map(|u| u.user.clone()) else {
            warn!("Nonce check without authenticated user");
            return false;
        };

        let Some(nonce) = req
            .headers()
            .get(NONCE_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(|s| s.trim().to_string())
        else {
            warn!("{} header not found", NONCE_HEADER);
            return false;
        };

        get_jwt_service().verify_nonce(&nonce, &user, NONCE_ACTION_REST)
    }
}

impl<S, B> Service<ServiceRequest> for NonceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let legacy_path = self.legacy_path.clone();

        Box::pin(async move {
            if Self::is_safe_method(req.method()) {
                trace!("Nonce skipped: safe method {}", req.method());
                let response = srv.call(req).await?.map_into_left_body();
                return Ok(response);
            }

            if req.path() == legacy_path {
                trace!("Nonce skipped: legacy action endpoint");
                let response = srv.call(req).await?.map_into_left_body();
                return Ok(response);
            }

            if !Self::validate_nonce(&req) {
                return Ok(Self::handle_nonce_error(req));
            }

            trace!("Nonce validation passed");
            let response = srv.call(req).await?.map_into_left_body();
            Ok(response)
        })
    }
}
