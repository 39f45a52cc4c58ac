//! URL 清洗与校验
//!
//! 用于手工编辑的 UTM 链接和自定义短链服务地址，只接受 http(s)。

use url::Url;

/// URL 校验错误
#[derive(Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    UnsupportedScheme(String),
    InvalidFormat(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::UnsupportedScheme(scheme) => write!(
                f,
                "Unsupported scheme: {}. Only http:// and https:// are allowed",
                scheme
            ),
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// 清洗并校验 URL，返回可直接保存的字符串
///
/// - 去掉首尾空白，删除内部的空白和控制字符
/// - scheme 必须是 http / https（大小写不敏感）
/// - 必须能被解析且带 host
///
/// 原始查询串按原样保留，不做重新编码。
pub fn clean_url(raw: &str) -> Result<String, UrlValidationError> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();

    if cleaned.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    let scheme = cleaned
        .split_once(':')
        .map(|(s, _)| s.to_ascii_lowercase())
        .unwrap_or_default();
    if scheme != "http" && scheme != "https" {
        return Err(UrlValidationError::UnsupportedScheme(scheme));
    }

    let parsed = Url::parse(&cleaned).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::InvalidFormat("missing host".to_string()));
    }

    Ok(cleaned)
}

/// 允许为空的 URL 设置项：空串原样返回
pub fn clean_optional_url(raw: &str) -> Result<String, UrlValidationError> {
    if raw.trim().is_empty() {
        Ok(String::new())
    } else {
        clean_url(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_tagged_links() {
        assert_eq!(
            clean_url("  https://site.example/p/?utm_source=x&utm_medium=y ").unwrap(),
            "https://site.example/p/?utm_source=x&utm_medium=y"
        );
        assert!(clean_url("HTTP://site.example").is_ok());
    }

    #[test]
    fn test_removes_embedded_whitespace() {
        assert_eq!(
            clean_url("https://site.example/a b\n").unwrap(),
            "https://site.example/ab"
        );
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert_eq!(
            clean_url("javascript:alert(1)"),
            Err(UrlValidationError::UnsupportedScheme("javascript".into()))
        );
        assert!(matches!(
            clean_url("ftp://site.example"),
            Err(UrlValidationError::UnsupportedScheme(_))
        ));
        assert!(matches!(
            clean_url("site.example/path"),
            Err(UrlValidationError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_rejects_empty_and_hostless() {
        assert_eq!(clean_url("   "), Err(UrlValidationError::EmptyUrl));
        assert!(matches!(
            clean_url("https://"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_optional_url() {
        assert_eq!(clean_optional_url("").unwrap(), "");
        assert!(clean_optional_url("mailto:a@b.c").is_err());
    }
}
