//! Admin API 认证相关端点

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, Responder, Result as ActixResult};
use tracing::{error, trace};

use crate::api::constants::{NONCE_ACTION_BULK, NONCE_ACTION_REST};
use crate::api::jwt::get_jwt_service;
use crate::api::middleware::CurrentUser;

use super::error_code::ErrorCode;
use super::helpers::{error_response, success_response};
use super::types::NonceResponse;

/// 为当前用户签发 nonce
pub async fn issue_nonces(req: HttpRequest) -> ActixResult<impl Responder> {
    let Some(user) = CurrentUser::from_request(&req) else {
        return Ok(error_response(
            StatusCode::UNAUTHORIZED,
            ErrorCode::Unauthorized,
            "Unauthorized: Invalid or missing token",
        ));
    };

    let jwt = get_jwt_service();
    let nonces = jwt
        .generate_nonce(&user.user, NONCE_ACTION_REST)
        .and_then(|rest| Ok((rest, jwt.generate_nonce(&user.user, NONCE_ACTION_BULK)?)));

    Ok(match nonces {
        Ok((rest, bulk)) => {
            trace!("Admin API: nonces issued for {}", user.user);
            success_response(NonceResponse {
                user: user.user,
                role: user.role.as_ref().to_string(),
                rest,
                bulk,
            })
        }
        Err(e) => {
            error!("Failed to sign nonce: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::TokenInvalid,
                "Failed to generate nonce",
            )
        }
    })
}
