//! Admin API 外部集成：短链、二维码、活动统计

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, Responder, Result as ActixResult, web};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, trace, warn};

use crate::services::{AnalyticsService, CampaignMetrics, QrGenerator, UrlShortener};
use crate::utils::clean_url;
use crate::utm::sanitize_text_field;

use super::error_code::ErrorCode;
use super::helpers::{api_result, error_response, success_response};
use super::types::{AnalyticsQuery, QrRequest, QrResponse, ShortenUrlRequest, ShortenUrlResponse};

#[derive(Serialize)]
struct CampaignReport {
    /// GA4 凭据是否已配置
    configured: bool,
    #[serde(flatten)]
    metrics: CampaignMetrics,
}

/// 缩短 URL
pub async fn shorten_url(
    _req: HttpRequest,
    body: web::Json<ShortenUrlRequest>,
    shortener: web::Data<Arc<UrlShortener>>,
) -> ActixResult<impl Responder> {
    let url = match clean_url(&body.url) {
        Ok(url) => url,
        Err(e) => {
            return Ok(error_response(
                StatusCode::BAD_REQUEST,
                ErrorCode::LinkInvalidUrl,
                &format!("Invalid URL: {}", e),
            ));
        }
    };

    trace!("Admin API: shorten {}", url);
    Ok(match shortener.shorten(&url).await {
        Some(short_url) => success_response(ShortenUrlResponse { short_url }),
        None => {
            warn!("Admin API: shortening failed for {}", url);
            error_response(
                StatusCode::BAD_GATEWAY,
                ErrorCode::ShortenFailed,
                "Failed to shorten URL.",
            )
        }
    })
}

/// 生成二维码地址，`save` 为 true 时保存到本地
pub async fn generate_qr(
    _req: HttpRequest,
    body: web::Json<QrRequest>,
    qr: web::Data<Arc<QrGenerator>>,
) -> ActixResult<impl Responder> {
    let request = body.into_inner();
    let Ok(url) = clean_url(&request.url) else {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::LinkInvalidUrl,
            "Invalid URL.",
        ));
    };

    if !request.save {
        return Ok(success_response(QrResponse {
            qr_url: qr.generate(&url),
        }));
    }

    let post_id = request.post_id.filter(|id| *id > 0);
    let preset_id = request
        .preset_id
        .as_deref()
        .map(sanitize_text_field)
        .filter(|s| !s.is_empty());
    let (Some(post_id), Some(preset_id)) = (post_id, preset_id) else {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidParameters,
            "Invalid parameters.",
        ));
    };

    info!(
        "Admin API: saving QR code item={} preset={}",
        post_id, preset_id
    );
    Ok(match qr.generate_and_save(&url, post_id, &preset_id).await {
        Some(qr_url) => success_response(QrResponse { qr_url }),
        None => error_response(
            StatusCode::BAD_GATEWAY,
            ErrorCode::QrFailed,
            "Failed to generate QR code.",
        ),
    })
}

/// 活动指标（占位数据）
pub async fn campaign_metrics(
    _req: HttpRequest,
    path: web::Path<String>,
    query: web::Query<AnalyticsQuery>,
    analytics: web::Data<Arc<AnalyticsService>>,
) -> ActixResult<impl Responder> {
    let campaign = sanitize_text_field(&path.into_inner());
    trace!("Admin API: campaign metrics for {}", campaign);

    let configured = match analytics.campaign_data().await {
        Ok(data) => data.is_some(),
        Err(e) => return Ok(api_result::<(), _>(Err(e))),
    };

    Ok(
        match analytics.campaign_metrics(
            &campaign,
            query.start_date.as_deref(),
            query.end_date.as_deref(),
        ) {
            Ok(metrics) => success_response(CampaignReport {
                configured,
                metrics,
            }),
            Err(e) => error_response(
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidDateFormat,
                e.message(),
            ),
        },
    )
}
