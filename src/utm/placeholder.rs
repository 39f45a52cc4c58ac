//! 占位符替换

use strum::{EnumIter, IntoEnumIterator};

use super::sanitize::{sanitize_text_field, sanitize_title};
use crate::storage::ContentItem;

/// 没有分类时 `{category}` 的取值
pub const DEFAULT_CATEGORY: &str = "uncategorized";

/// 构建 URL 时读取的内容字段
#[derive(Debug, Clone, Copy)]
pub struct ContentSnapshot<'a> {
    pub id: i64,
    pub slug: &'a str,
    pub title: &'a str,
    pub permalink: Option<&'a str>,
    /// 主分类 slug
    pub category: Option<&'a str>,
    pub author: &'a str,
    /// `{year}` 的取值，通常为当前年份
    pub year: i32,
}

impl<'a> ContentSnapshot<'a> {
    pub fn from_item(item: &'a ContentItem, year: i32) -> Self {
        Self {
            id: item.id,
            slug: &item.slug,
            title: &item.title,
            permalink: item.permalink.as_deref(),
            category: item.categories.first().map(String::as_str),
            author: &item.author,
            year,
        }
    }
}

/// 支持的占位符，迭代顺序即替换顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum Placeholder {
    Source,
    Medium,
    Category,
    Year,
    PostSlug,
    PostTitle,
    PostId,
    Author,
}

impl Placeholder {
    pub fn token(&self) -> &'static str {
        match self {
            Placeholder::Source => "{source}",
            Placeholder::Medium => "{medium}",
            Placeholder::Category => "{category}",
            Placeholder::Year => "{year}",
            Placeholder::PostSlug => "{post_slug}",
            Placeholder::PostTitle => "{post_title}",
            Placeholder::PostId => "{post_id}",
            Placeholder::Author => "{author}",
        }
    }

    pub fn resolve(&self, snapshot: &ContentSnapshot<'_>) -> String {
        match self {
            Placeholder::Source => "website".to_string(),
            Placeholder::Medium => "organic".to_string(),
            Placeholder::Category => snapshot
                .category
                .filter(|c| !c.is_empty())
                .unwrap_or(DEFAULT_CATEGORY)
                .to_string(),
            Placeholder::Year => format!("{:04}", snapshot.year),
            Placeholder::PostSlug => snapshot.slug.to_string(),
            Placeholder::PostTitle => sanitize_title(snapshot.title),
            Placeholder::PostId => snapshot.id.to_string(),
            Placeholder::Author => snapshot.author.to_string(),
        }
    }
}

/// 替换字面占位符并清洗结果；未识别的 `{...}` 原样保留
pub fn replace_placeholders(pattern: &str, snapshot: &ContentSnapshot<'_>) -> String {
    let mut out = pattern.to_string();
    for placeholder in Placeholder::iter() {
        if out.contains(placeholder.token()) {
            out = out.replace(placeholder.token(), &placeholder.resolve(snapshot));
        }
    }
    sanitize_text_field(&out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> ContentSnapshot<'static> {
        ContentSnapshot {
            id: 42,
            slug: "hello-world",
            title: "Hello World!",
            permalink: Some("https://site.example/hello-world/"),
            category: Some("news"),
            author: "jane",
            year: 2026,
        }
    }

    #[test]
    fn test_all_tokens() {
        let snap = snapshot();
        assert_eq!(replace_placeholders("{source}", &snap), "website");
        assert_eq!(replace_placeholders("{medium}", &snap), "organic");
        assert_eq!(replace_placeholders("{category}", &snap), "news");
        assert_eq!(replace_placeholders("{year}", &snap), "2026");
        assert_eq!(replace_placeholders("{post_slug}", &snap), "hello-world");
        assert_eq!(replace_placeholders("{post_title}", &snap), "hello-world");
        assert_eq!(replace_placeholders("{post_id}", &snap), "42");
        assert_eq!(replace_placeholders("{author}", &snap), "jane");
    }

    #[test]
    fn test_composite_pattern() {
        let snap = snapshot();
        assert_eq!(
            replace_placeholders("{category}_{year}", &snap),
            "news_2026"
        );
    }

    #[test]
    fn test_missing_category_falls_back() {
        let snap = ContentSnapshot {
            category: None,
            ..snapshot()
        };
        assert_eq!(replace_placeholders("{category}", &snap), "uncategorized");
    }

    #[test]
    fn test_unknown_tokens_kept_verbatim() {
        let snap = snapshot();
        assert_eq!(replace_placeholders("{unknown}", &snap), "{unknown}");
        assert_eq!(replace_placeholders("plain_text", &snap), "plain_text");
    }

    #[test]
    fn test_every_placeholder_has_distinct_token() {
        let tokens: std::collections::HashSet<_> = Placeholder::iter().map(|p| p.token()).collect();
        assert_eq!(tokens.len(), 8);
    }
}
