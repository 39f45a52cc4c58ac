pub mod auth;
pub mod nonce;

pub use auth::{AdminAuth, CurrentUser};
pub use nonce::NonceGuard;
