use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpRequest, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::{Method, header::CONTENT_TYPE},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::str::FromStr;
use tracing::{info, trace};

use crate::api::jwt::{Role, get_jwt_service};
use crate::api::services::admin::{ApiResponse, ErrorCode};

/// 已认证的调用者，写入 request extensions 供后续中间件和 handler 读取
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    pub user: String,
    pub role: Role,
}

impl CurrentUser {
    /// 从请求中取出调用者
    pub fn from_request(req: &HttpRequest) -> Option<Self> {
        req.extensions().get::<CurrentUser>().cloned()
    }
}

/// Admin authentication middleware
///
/// - 缺少或无效的 Bearer token 返回 401
/// - 角色无权编辑内容返回 403
#[derive(Clone)]
pub struct AdminAuth;

impl<S, B> Transform<S, ServiceRequest> for AdminAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct AdminAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> AdminAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    /// Handle OPTIONS requests for CORS preflight
    fn handle_options_request(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        req.into_response(
            HttpResponse::NoContent()
                .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
                .finish()
                .map_into_right_body(),
        )
    }

    /// Handle unauthorized requests
    fn handle_unauthorized(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        info!("Authentication failed - invalid or missing token");
        req.into_response(
            HttpResponse::Unauthorized()
                .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
                .json(ApiResponse::<()> {
                    code: ErrorCode::Unauthorized as i32,
                    message: "Unauthorized: Invalid or missing token".to_string(),
                    data: None,
                })
                .map_into_right_body(),
        )
    }

    /// Handle callers whose role cannot edit content
    fn handle_forbidden(req: ServiceRequest, role: &str) -> ServiceResponse<EitherBody<B>> {
        info!("Permission denied for role '{}'", role);
        req.into_response(
            HttpResponse::Forbidden()
                .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
                .json(ApiResponse::<()> {
                    code: ErrorCode::Forbidden as i32,
                    message: "Sorry, you are not allowed to do that.".to_string(),
                    data: None,
                })
                .map_into_right_body(),
        )
    }

    /// 从 Authorization header 提取 Bearer token
    fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
        req.headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

impl<S, B> Service<ServiceRequest> for AdminAuthMiddleware<S>
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

        Box::pin(async move {
            // Handle CORS preflight requests
            if req.method() == Method::OPTIONS {
                return Ok(Self::handle_options_request(req));
            }

            let Some(token) = Self::extract_bearer_token(&req) else {
                return Ok(Self::handle_unauthorized(req));
            };

            let claims = match get_jwt_service().validate_access_token(&token) {
                Ok(claims) => claims,
                Err(e) => {
                    info!("Bearer token validation failed: {}", e);
                    return Ok(Self::handle_unauthorized(req));
                }
            };

            let role = match Role::from_str(&claims.role) {
                Ok(role) if role.can_edit_content() => role,
                _ => return Ok(Self::handle_forbidden(req, &claims.role)),
            };

            trace!("Authenticated {} as {}", claims.sub, role.as_ref());
            req.extensions_mut().insert(CurrentUser {
                user: claims.sub,
                role,
            });

            let response = srv.call(req).await?.map_into_left_body();
            Ok(response)
        })
    }
}
