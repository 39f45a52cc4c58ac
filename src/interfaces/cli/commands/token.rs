//! Issue access token and nonces

use std::str::FromStr;

use colored::Colorize;

use crate::api::constants::{NONCE_ACTION_BULK, NONCE_ACTION_REST, NONCE_HEADER};
use crate::api::jwt::{Role, get_jwt_service};
use crate::interfaces::cli::CliError;

pub fn issue_token(user: &str, role: &str, minutes: Option<u64>) -> Result<(), CliError> {
    let user = user.trim();
    if user.is_empty() {
        return Err(CliError::ParseError("User must not be empty".to_string()));
    }
    let role = Role::from_str(role.trim())
        .map_err(|_| CliError::ParseError(format!("Unknown role: {}", role)))?;

    // 随机密钥签出的 token 在服务端无法验证
    if crate::config::get_config().auth.jwt_secret.is_empty() {
        return Err(CliError::CommandError(
            "auth.jwt_secret is not configured (set UTM__AUTH__JWT_SECRET)".to_string(),
        ));
    }

    let jwt = get_jwt_service();
    let sign_err = |e: jsonwebtoken::errors::Error| CliError::CommandError(e.to_string());
    let access = jwt
        .generate_access_token(user, role.as_ref(), minutes)
        .map_err(sign_err)?;
    let rest = jwt.generate_nonce(user, NONCE_ACTION_REST).map_err(sign_err)?;
    let bulk = jwt.generate_nonce(user, NONCE_ACTION_BULK).map_err(sign_err)?;

    println!(
        "{} {} ({})",
        "Issued credentials for".bold().green(),
        user.cyan(),
        role.as_ref()
    );
    println!("  {} {}", "Access token:".cyan(), access);
    println!("  {} {}", format!("{}:", NONCE_HEADER).cyan(), rest);
    println!("  {} {}", "Bulk nonce:".cyan(), bulk);
    println!(
        "  {}",
        format!(
            "Valid for {} minutes",
            minutes.unwrap_or(jwt.access_token_minutes())
        )
        .dimmed()
    );
    Ok(())
}
