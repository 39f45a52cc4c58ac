//! UTM 参数定义

use serde::{Deserialize, Deserializer, Serialize};
use strum::{EnumIter, IntoEnumIterator};

use super::sanitize::sanitize_text_field;

/// 五个固定的 UTM 参数，迭代顺序即 URL 中的拼接顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum UtmParam {
    Source,
    Medium,
    Campaign,
    Content,
    Term,
}

impl UtmParam {
    /// 查询参数名，如 `utm_source`
    pub fn key(&self) -> &'static str {
        match self {
            UtmParam::Source => "utm_source",
            UtmParam::Medium => "utm_medium",
            UtmParam::Campaign => "utm_campaign",
            UtmParam::Content => "utm_content",
            UtmParam::Term => "utm_term",
        }
    }
}

/// 一组 UTM 字段（预设与模板共用）
///
/// 字段值可以包含占位符，未提供的字段为 `None`。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtmFields {
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub utm_source: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub utm_medium: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub utm_campaign: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub utm_content: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub utm_term: Option<String>,
}

impl UtmFields {
    pub fn get(&self, param: UtmParam) -> Option<&str> {
        match param {
            UtmParam::Source => self.utm_source.as_deref(),
            UtmParam::Medium => self.utm_medium.as_deref(),
            UtmParam::Campaign => self.utm_campaign.as_deref(),
            UtmParam::Content => self.utm_content.as_deref(),
            UtmParam::Term => self.utm_term.as_deref(),
        }
    }

    pub fn set(&mut self, param: UtmParam, value: Option<String>) {
        match param {
            UtmParam::Source => self.utm_source = value,
            UtmParam::Medium => self.utm_medium = value,
            UtmParam::Campaign => self.utm_campaign = value,
            UtmParam::Content => self.utm_content = value,
            UtmParam::Term => self.utm_term = value,
        }
    }

    /// 对每个已提供的字段做纯文本清洗
    pub fn sanitized(&self) -> Self {
        let mut out = Self::default();
        for param in UtmParam::iter() {
            out.set(param, self.get(param).map(sanitize_text_field));
        }
        out
    }

    /// 字段是否存在且去掉空白后非空
    pub fn has_value(&self, param: UtmParam) -> bool {
        self.get(param).is_some_and(|v| !v.trim().is_empty())
    }
}

/// 接受字符串、数字、布尔值，其余类型视为未提供
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(if b { "1" } else { "" }.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_order_and_keys() {
        let keys: Vec<&str> = UtmParam::iter().map(|p| p.key()).collect();
        assert_eq!(
            keys,
            vec![
                "utm_source",
                "utm_medium",
                "utm_campaign",
                "utm_content",
                "utm_term"
            ]
        );
    }

    #[test]
    fn test_unknown_fields_are_dropped() {
        let fields: UtmFields = serde_json::from_value(serde_json::json!({
            "utm_source": "facebook",
            "utm_id": "nope",
            "utm_term": 42,
            "utm_content": ["x"]
        }))
        .unwrap();

        assert_eq!(fields.utm_source.as_deref(), Some("facebook"));
        assert_eq!(fields.utm_term.as_deref(), Some("42"));
        assert_eq!(fields.utm_content, None);

        let out = serde_json::to_value(&fields).unwrap();
        assert!(out.get("utm_id").is_none());
        assert!(out.get("utm_medium").is_none());
    }

    #[test]
    fn test_sanitized_strips_markup() {
        let fields = UtmFields {
            utm_source: Some("  <b>news</b>letter ".to_string()),
            ..Default::default()
        };
        assert_eq!(fields.sanitized().utm_source.as_deref(), Some("newsletter"));
    }
}
