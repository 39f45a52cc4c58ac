use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use strum::{AsRefStr, EnumIter, EnumString};
use subtle::ConstantTimeEq;

use crate::api::constants::{TOKEN_TYPE_ACCESS, TOKEN_TYPE_NONCE};

/// Global cached JwtService instance
static JWT_SERVICE: OnceLock<JwtService> = OnceLock::new();

/// Get the cached JwtService instance
///
/// Uses OnceLock for thread-safe lazy initialization.
/// The service is initialized once on first use and reused for all subsequent requests.
pub fn get_jwt_service() -> &'static JwtService {
    JWT_SERVICE.get_or_init(JwtService::from_config)
}

/// 宿主用户角色
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Administrator,
    Editor,
    Author,
    Contributor,
    Subscriber,
}

impl Role {
    /// 可以编辑内容的角色才能使用 REST 接口
    pub fn can_edit_content(&self) -> bool {
        !matches!(self, Role::Subscriber)
    }

    /// 设置和旧版 action 接口只对管理员开放
    pub fn can_manage_options(&self) -> bool {
        matches!(self, Role::Administrator)
    }
}

/// Access Token Claims
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    /// 原样保存宿主传来的角色名，未知角色在鉴权时拒绝
    pub role: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
    pub token_type: String,
}

/// Nonce Claims，绑定用户和 action
#[derive(Debug, Serialize, Deserialize)]
pub struct NonceClaims {
    pub sub: String,
    pub action: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
    pub token_type: String,
}

/// JWT Service for generating and validating tokens
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_minutes: u64,
    nonce_hours: u64,
}

impl JwtService {
    pub fn new(secret: &str, access_token_minutes: u64, nonce_hours: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_minutes,
            nonce_hours,
        }
    }

    /// Create JwtService from config
    pub fn from_config() -> Self {
        let config = crate::config::get_config();

        // 获取 JWT secret，如果为空则生成一个安全的随机值
        let jwt_secret = Some(config.auth.jwt_secret.clone())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| {
                use tracing::warn;
                warn!("JWT secret not configured or empty, generating secure random token");
                crate::utils::generate_secure_token(32)
            });

        Self::new(
            &jwt_secret,
            config.auth.access_token_minutes,
            config.auth.nonce_hours,
        )
    }

    pub fn access_token_minutes(&self) -> u64 {
        self.access_token_minutes
    }

    /// Generate Access Token
    ///
    /// `minutes` 为空时使用配置的有效期。
    pub fn generate_access_token(
        &self,
        user: &str,
        role: &str,
        minutes: Option<u64>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let minutes = minutes.unwrap_or(self.access_token_minutes);
        let claims = AccessClaims {
            sub: user.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(minutes as i64)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: TOKEN_TYPE_ACCESS.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Validate Access Token
    pub fn validate_access_token(
        &self,
        token: &str,
    ) -> Result<AccessClaims, jsonwebtoken::errors::Error> {
        let token_data = decode::<AccessClaims>(token, &self.decoding_key, &Validation::default())?;

        // Verify token type
        if token_data.claims.token_type != TOKEN_TYPE_ACCESS {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }

        Ok(token_data.claims)
    }

    /// Generate Nonce bound to user and action
    pub fn generate_nonce(
        &self,
        user: &str,
        action: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = NonceClaims {
            sub: user.to_string(),
            action: action.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.nonce_hours as i64)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: TOKEN_TYPE_NONCE.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Verify Nonce for user and action
    pub fn verify_nonce(&self, token: &str, user: &str, action: &str) -> bool {
        let Ok(token_data) =
            decode::<NonceClaims>(token, &self.decoding_key, &Validation::default())
        else {
            return false;
        };

        let claims = token_data.claims;
        if claims.token_type != TOKEN_TYPE_NONCE {
            return false;
        }

        // 常量时间比较
        let user_ok: bool = claims.sub.as_bytes().ct_eq(user.as_bytes()).into();
        let action_ok: bool = claims.action.as_bytes().ct_eq(action.as_bytes()).into();
        user_ok && action_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn create_test_service() -> JwtService {
        JwtService::new("test_secret_key_32_bytes_long!!", 15, 12)
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        let service = create_test_service();
        let token = service
            .generate_access_token("jane", "editor", None)
            .unwrap();
        let claims = service.validate_access_token(&token).unwrap();

        assert_eq!(claims.sub, "jane");
        assert_eq!(claims.role, "editor");
        assert_eq!(claims.token_type, "access");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_nonce_bound_to_user_and_action() {
        let service = create_test_service();
        let nonce = service.generate_nonce("jane", "rest").unwrap();

        assert!(service.verify_nonce(&nonce, "jane", "rest"));
        assert!(!service.verify_nonce(&nonce, "john", "rest"));
        assert!(!service.verify_nonce(&nonce, "jane", "bulk"));
    }

    #[test]
    fn test_nonce_rejected_as_access() {
        let service = create_test_service();
        let nonce = service.generate_nonce("jane", "rest").unwrap();
        assert!(service.validate_access_token(&nonce).is_err());
    }

    #[test]
    fn test_access_rejected_as_nonce() {
        let service = create_test_service();
        let token = service
            .generate_access_token("jane", "editor", None)
            .unwrap();
        assert!(!service.verify_nonce(&token, "jane", "rest"));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let service1 = create_test_service();
        let service2 = JwtService::new("different_secret_key_32_bytes!!", 15, 12);

        let token = service1
            .generate_access_token("admin", "administrator", None)
            .unwrap();
        assert!(service2.validate_access_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = create_test_service();

        // 创建一个过期时间在更久之前的 claims（超过默认 leeway）
        let now = chrono::Utc::now();
        let claims = AccessClaims {
            sub: "admin".to_string(),
            role: "administrator".to_string(),
            iat: (now - chrono::Duration::hours(2)).timestamp(),
            exp: (now - chrono::Duration::hours(1)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: "access".to_string(),
        };

        let encoding_key =
            jsonwebtoken::EncodingKey::from_secret(b"test_secret_key_32_bytes_long!!");
        let token =
            jsonwebtoken::encode(&jsonwebtoken::Header::default(), &claims, &encoding_key).unwrap();

        assert!(service.validate_access_token(&token).is_err());
    }

    #[test]
    fn test_role_capabilities() {
        assert!(Role::from_str("administrator").unwrap().can_manage_options());
        assert!(Role::from_str("contributor").unwrap().can_edit_content());
        assert!(!Role::from_str("editor").unwrap().can_manage_options());
        assert!(!Role::Subscriber.can_edit_content());
        assert!(Role::from_str("customer").is_err());
    }
}
