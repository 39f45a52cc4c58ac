//! GA4 活动数据（占位实现）
//!
//! 只检查凭据是否配置，指标全部返回 0。

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::settings::SettingsService;
use crate::errors::{Result, UtmError};

/// 默认统计窗口（天）
const DEFAULT_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignData {
    pub sessions: u64,
    pub pageviews: u64,
    pub clicks: u64,
    pub conversions: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignMetrics {
    pub campaign: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(flatten)]
    pub data: CampaignData,
}

pub struct AnalyticsService {
    settings: Arc<SettingsService>,
}

impl AnalyticsService {
    pub fn new(settings: Arc<SettingsService>) -> Self {
        Self { settings }
    }

    /// 未配置 GA4 时返回 None
    pub async fn campaign_data(&self) -> Result<Option<CampaignData>> {
        let settings = self.settings.load().await?;
        if settings.ga4_property_id.trim().is_empty() || settings.ga4_credentials.trim().is_empty()
        {
            return Ok(None);
        }
        Ok(Some(CampaignData::default()))
    }

    /// 日期格式为 `YYYY-MM-DD`，缺省为最近 30 天
    pub fn campaign_metrics(
        &self,
        campaign: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<CampaignMetrics> {
        let today = Utc::now().date_naive();
        let start_date = match start_date.filter(|s| !s.trim().is_empty()) {
            Some(raw) => parse_date(raw)?,
            None => today - Duration::days(DEFAULT_WINDOW_DAYS),
        };
        let end_date = match end_date.filter(|s| !s.trim().is_empty()) {
            Some(raw) => parse_date(raw)?,
            None => today,
        };

        Ok(CampaignMetrics {
            campaign: campaign.to_string(),
            start_date,
            end_date,
            data: CampaignData::default(),
        })
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| UtmError::validation(format!("Invalid date: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2026-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
        );
        assert!(parse_date("03/01/2026").is_err());
    }

    #[test]
    fn test_metrics_serialize_flat() {
        let metrics = CampaignMetrics {
            campaign: "spring".into(),
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
            data: CampaignData::default(),
        };
        let value = serde_json::to_value(&metrics).unwrap();
        assert_eq!(value["start_date"], "2026-01-01");
        assert_eq!(value["sessions"], 0);
        assert_eq!(value["conversions"], 0);
    }
}
