//! 短链服务代理
//!
//! 支持 Bitly、Rebrandly 和自定义接口。成功结果按长链 hash 缓存，
//! 失败返回 None 且不缓存。

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use moka::future::Cache;
use serde_json::{Value, json};
use tracing::{trace, warn};
use ureq::Agent;
use xxhash_rust::xxh64::xxh64;

use super::settings::{SettingsService, ShortenerProvider, UtmSettings};
use crate::config::get_config;

const BITLY_ENDPOINT: &str = "https://api-ssl.bitly.com/v4/shorten";
const REBRANDLY_ENDPOINT: &str = "https://api.rebrandly.com/v1/links";
const SHORT_URL_CACHE_MAX_CAPACITY: u64 = 10_000;

/// 全局 HTTP Agent，短链与二维码下载共用
static HTTP_AGENT: OnceLock<Agent> = OnceLock::new();

pub(crate) fn get_agent() -> &'static Agent {
    HTTP_AGENT.get_or_init(|| {
        let timeout = get_config().integrations.http_timeout_secs;
        Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(timeout)))
            .build()
            .into()
    })
}

/// 一次待发送的短链请求
#[derive(Debug, Clone, PartialEq)]
pub struct ShortenRequest {
    pub provider: ShortenerProvider,
    pub endpoint: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Value,
}

impl ShortenRequest {
    /// 根据设置组装请求；未启用或缺少凭据时返回 None
    pub fn from_settings(settings: &UtmSettings, long_url: &str) -> Option<Self> {
        let provider = settings.shortener_service?;

        let (endpoint, headers, body) = match provider {
            ShortenerProvider::Bitly => {
                let key = non_empty(&settings.bitly_api_key)?;
                (
                    BITLY_ENDPOINT.to_string(),
                    vec![("Authorization", format!("Bearer {}", key))],
                    json!({ "long_url": long_url }),
                )
            }
            ShortenerProvider::Rebrandly => {
                let key = non_empty(&settings.rebrandly_api_key)?;
                (
                    REBRANDLY_ENDPOINT.to_string(),
                    vec![("apikey", key.to_string())],
                    json!({ "destination": long_url }),
                )
            }
            ShortenerProvider::Custom => {
                let endpoint = non_empty(&settings.custom_shortener_endpoint)?;
                let headers = non_empty(&settings.custom_shortener_api_key)
                    .map(|key| vec![("Authorization", format!("Bearer {}", key))])
                    .unwrap_or_default();
                (endpoint.to_string(), headers, json!({ "url": long_url }))
            }
        };

        Some(Self {
            provider,
            endpoint,
            headers,
            body,
        })
    }

    /// 从响应体中取出短链
    pub fn parse_response(&self, body: &Value) -> Option<String> {
        let short = match self.provider {
            ShortenerProvider::Bitly => body["link"].as_str().map(String::from),
            // Rebrandly 返回的 shortUrl 不带协议
            ShortenerProvider::Rebrandly => body["shortUrl"]
                .as_str()
                .map(|s| format!("https://{}", s)),
            ShortenerProvider::Custom => body["short_url"]
                .as_str()
                .or_else(|| body["shortUrl"].as_str())
                .map(String::from),
        };
        short.filter(|s| !s.is_empty())
    }

    /// 同步发送（在 spawn_blocking 中调用）
    fn send_sync(&self) -> Option<String> {
        let mut request = get_agent().post(&self.endpoint);
        for (name, value) in &self.headers {
            request = request.header(*name, value.as_str());
        }

        let resp = match request.send_json(&self.body) {
            Ok(r) => r,
            Err(e) => {
                warn!(
                    "Shortener request to \"{}\" failed: {}",
                    self.endpoint, e
                );
                return None;
            }
        };

        let json: Value = match resp.into_body().read_json() {
            Ok(j) => j,
            Err(e) => {
                warn!(
                    "Shortener response from \"{}\" parse failed: {}",
                    self.endpoint, e
                );
                return None;
            }
        };

        self.parse_response(&json)
    }
}

fn non_empty(value: &str) -> Option<&str> {
    Some(value.trim()).filter(|v| !v.is_empty())
}

pub struct UrlShortener {
    settings: Arc<SettingsService>,
    /// xxh64(long_url) → short_url
    cache: Cache<u64, String>,
}

impl UrlShortener {
    pub fn new(settings: Arc<SettingsService>, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .time_to_live(Duration::from_secs(ttl_secs))
            .max_capacity(SHORT_URL_CACHE_MAX_CAPACITY)
            .build();

        Self { settings, cache }
    }

    /// 缩短 URL；未配置服务或调用失败时返回 None
    pub async fn shorten(&self, long_url: &str) -> Option<String> {
        let settings = match self.settings.load().await {
            Ok(s) => s,
            Err(e) => {
                warn!("Failed to load shortener settings: {}", e);
                return None;
            }
        };
        let request = ShortenRequest::from_settings(&settings, long_url)?;

        let key = xxh64(long_url.as_bytes(), 0);

        // None 不会写入缓存，下次调用会重新请求
        self.cache
            .optionally_get_with(key, async move {
                trace!("Short URL cache miss, calling {}", request.endpoint);
                tokio::task::spawn_blocking(move || request.send_sync())
                    .await
                    .unwrap_or_else(|e| {
                        warn!("Shortener spawn_blocking failed: {}", e);
                        None
                    })
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(provider: ShortenerProvider) -> UtmSettings {
        UtmSettings {
            shortener_service: Some(provider),
            bitly_api_key: "bitly-key".into(),
            rebrandly_api_key: "rb-key".into(),
            custom_shortener_endpoint: "https://sho.rt/api".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_disabled_or_missing_credentials() {
        let url = "https://site.example/a/";
        assert!(ShortenRequest::from_settings(&UtmSettings::default(), url).is_none());

        let mut s = settings(ShortenerProvider::Bitly);
        s.bitly_api_key = "  ".into();
        assert!(ShortenRequest::from_settings(&s, url).is_none());

        let mut s = settings(ShortenerProvider::Custom);
        s.custom_shortener_endpoint.clear();
        assert!(ShortenRequest::from_settings(&s, url).is_none());
    }

    #[test]
    fn test_bitly_request_and_response() {
        let req =
            ShortenRequest::from_settings(&settings(ShortenerProvider::Bitly), "https://a.b/")
                .unwrap();
        assert_eq!(req.endpoint, BITLY_ENDPOINT);
        assert_eq!(
            req.headers,
            vec![("Authorization", "Bearer bitly-key".to_string())]
        );
        assert_eq!(req.body, json!({ "long_url": "https://a.b/" }));
        assert_eq!(
            req.parse_response(&json!({ "link": "https://bit.ly/x" })),
            Some("https://bit.ly/x".to_string())
        );
        assert_eq!(req.parse_response(&json!({ "message": "FORBIDDEN" })), None);
    }

    #[test]
    fn test_rebrandly_adds_scheme() {
        let req = ShortenRequest::from_settings(
            &settings(ShortenerProvider::Rebrandly),
            "https://a.b/",
        )
        .unwrap();
        assert_eq!(req.headers, vec![("apikey", "rb-key".to_string())]);
        assert_eq!(req.body, json!({ "destination": "https://a.b/" }));
        assert_eq!(
            req.parse_response(&json!({ "shortUrl": "rebrand.ly/x" })),
            Some("https://rebrand.ly/x".to_string())
        );
    }

    #[test]
    fn test_custom_accepts_both_field_names() {
        let req =
            ShortenRequest::from_settings(&settings(ShortenerProvider::Custom), "https://a.b/")
                .unwrap();
        assert!(req.headers.is_empty());
        assert_eq!(req.body, json!({ "url": "https://a.b/" }));
        assert_eq!(
            req.parse_response(&json!({ "short_url": "https://s/1" })),
            Some("https://s/1".to_string())
        );
        assert_eq!(
            req.parse_response(&json!({ "shortUrl": "https://s/2" })),
            Some("https://s/2".to_string())
        );
        assert_eq!(req.parse_response(&json!({ "short_url": "" })), None);
    }
}
