//! 二维码图片 URL
//!
//! 通过公共图表接口生成，可选下载到本地目录。

use std::path::PathBuf;

use tracing::{info, warn};

use super::shortener::get_agent;
use crate::config::IntegrationsConfig;
use crate::utm::sanitize_key;

/// 图片最大下载体积
const MAX_IMAGE_BYTES: u64 = 2 * 1024 * 1024;

pub struct QrGenerator {
    chart_api_url: String,
    size: u32,
    output_dir: PathBuf,
    public_base_url: String,
}

impl QrGenerator {
    pub fn new(config: &IntegrationsConfig) -> Self {
        Self {
            chart_api_url: config.chart_api_url.clone(),
            size: config.qr_size,
            output_dir: PathBuf::from(&config.qr_output_dir),
            public_base_url: config.qr_public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// 返回二维码图片地址
    pub fn generate(&self, url: &str) -> String {
        format!(
            "{}?chs={size}x{size}&cht=qr&chl={}",
            self.chart_api_url,
            urlencoding::encode(url),
            size = self.size
        )
    }

    /// 下载二维码并保存为 `qr-{item}-{preset}.png`，返回公开地址
    ///
    /// 任意一步失败都返回 None。
    pub async fn generate_and_save(&self, url: &str, item_id: i64, preset_id: &str) -> Option<String> {
        let qr_url = self.generate(url);

        // 文件名只允许安全字符
        let preset_id = sanitize_key(preset_id);
        let filename = format!("qr-{}-{}.png", item_id, preset_id);

        let image = tokio::task::spawn_blocking(move || download(&qr_url))
            .await
            .unwrap_or_else(|e| {
                warn!("QR download spawn_blocking failed: {}", e);
                None
            })?;

        if let Err(e) = tokio::fs::create_dir_all(&self.output_dir).await {
            warn!(
                "Failed to create QR directory {}: {}",
                self.output_dir.display(),
                e
            );
            return None;
        }

        let path = self.output_dir.join(&filename);
        if let Err(e) = tokio::fs::write(&path, &image).await {
            warn!("Failed to write QR image {}: {}", path.display(), e);
            return None;
        }

        info!("QR image saved: {}", path.display());
        Some(format!("{}/{}", self.public_base_url, filename))
    }
}

fn download(qr_url: &str) -> Option<Vec<u8>> {
    let resp = match get_agent().get(qr_url).call() {
        Ok(r) => r,
        Err(e) => {
            warn!("QR request to \"{}\" failed: {}", qr_url, e);
            return None;
        }
    };

    match resp
        .into_body()
        .with_config()
        .limit(MAX_IMAGE_BYTES)
        .read_to_vec()
    {
        Ok(bytes) if !bytes.is_empty() => Some(bytes),
        Ok(_) => {
            warn!("QR response from \"{}\" was empty", qr_url);
            None
        }
        Err(e) => {
            warn!("QR response from \"{}\" read failed: {}", qr_url, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_encodes_target() {
        let qr = QrGenerator::new(&IntegrationsConfig::default());
        assert_eq!(
            qr.generate("https://site.example/a/?utm_source=x&utm_medium=y"),
            "https://chart.googleapis.com/chart?chs=256x256&cht=qr&chl=https%3A%2F%2Fsite.example%2Fa%2F%3Futm_source%3Dx%26utm_medium%3Dy"
        );
    }

    #[test]
    fn test_generate_uses_configured_size() {
        let config = IntegrationsConfig {
            qr_size: 128,
            chart_api_url: "https://qr.example/chart".into(),
            ..Default::default()
        };
        let qr = QrGenerator::new(&config);
        assert!(qr.generate("x").starts_with("https://qr.example/chart?chs=128x128&cht=qr&chl="));
    }
}
