//! UTM URL 构建

use chrono::Datelike;
use strum::IntoEnumIterator;
use url::form_urlencoded;

use super::params::{UtmFields, UtmParam};
use super::placeholder::{ContentSnapshot, replace_placeholders};
use crate::storage::ContentItem;

/// 基于内容快照和一组 UTM 字段构建带参数的 URL
///
/// 返回 `None` 的情况：
/// - 没有 permalink
/// - 所有参数替换后都为空
pub fn build_utm_url(snapshot: &ContentSnapshot<'_>, fields: &UtmFields) -> Option<String> {
    let permalink = snapshot.permalink.filter(|p| !p.is_empty())?;

    let mut query = form_urlencoded::Serializer::new(String::new());
    let mut appended = 0usize;

    for param in UtmParam::iter() {
        let Some(pattern) = fields.get(param).filter(|p| !p.is_empty()) else {
            continue;
        };

        let value = replace_placeholders(pattern, snapshot);
        if value.is_empty() {
            continue;
        }

        query.append_pair(param.key(), &value);
        appended += 1;
    }

    if appended == 0 {
        return None;
    }

    let separator = if permalink.contains('?') { '&' } else { '?' };
    Some(format!("{}{}{}", permalink, separator, query.finish()))
}

/// 以当前年份构建
pub fn build_for_item(item: &ContentItem, fields: &UtmFields) -> Option<String> {
    let year = chrono::Utc::now().year();
    build_utm_url(&ContentSnapshot::from_item(item, year), fields)
}
