//! 文本清洗
//!
//! 与内容平台的三个清洗函数行为对齐：纯文本字段、key、标题 slug。

/// 清洗为单行纯文本
///
/// 1. 删除 `<script>` / `<style>` 块及所有标签，不构成标签的 `<` 转为 `&lt;`
/// 2. 换行、制表符和连续空格折叠为单个空格，其余控制字符删除
/// 3. 去掉首尾空白
/// 4. 删除 `%xx` 形式的百分号编码八位组
pub fn sanitize_text_field(input: &str) -> String {
    let mut text = if input.contains('<') {
        strip_all_tags(input)
    } else {
        input.to_string()
    };

    text = collapse_whitespace(&text);

    let mut found_octet = false;
    loop {
        let stripped = strip_percent_octets(&text);
        if stripped == text {
            break;
        }
        found_octet = true;
        text = stripped;
    }

    if found_octet {
        text = collapse_whitespace(&text);
    }

    text
}

/// 清洗为小写 key：仅保留 `[a-z0-9_-]`
pub fn sanitize_key(input: &str) -> String {
    input
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_' || *c == '-')
        .collect()
}

/// 标题转 slug（去重音、小写、非字母数字替换为 `-`，保留 `_`）
pub fn sanitize_title(input: &str) -> String {
    input
        .split('_')
        .map(slug::slugify)
        .collect::<Vec<_>>()
        .join("_")
}

fn remove_block(input: &str, tag: &str) -> String {
    let open = format!("<{}", tag);
    let close = format!("</{}>", tag);
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    loop {
        let lower = rest.to_ascii_lowercase();
        let Some(start) = lower.find(&open) else {
            out.push_str(rest);
            break;
        };
        out.push_str(&rest[..start]);
        match lower[start..].find(&close) {
            Some(end) => rest = &rest[start + end + close.len()..],
            None => {
                // 未闭合的块只留下开标签，交给后续的标签剥离处理
                out.push_str(&rest[start..]);
                break;
            }
        }
    }

    out
}

fn strip_all_tags(input: &str) -> String {
    let without_blocks = remove_block(&remove_block(input, "script"), "style");

    let mut out = String::with_capacity(without_blocks.len());
    let mut chars = without_blocks.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '<' {
            out.push(c);
            continue;
        }

        let starts_tag = chars
            .peek()
            .is_some_and(|n| n.is_ascii_alphabetic() || matches!(n, '/' | '!' | '?'));

        if starts_tag {
            // 丢弃到 '>' 为止；没有闭合时丢弃剩余内容
            for inner in chars.by_ref() {
                if inner == '>' {
                    break;
                }
            }
        } else {
            out.push_str("&lt;");
        }
    }

    out
}

fn collapse_whitespace(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_space = false;

    for c in input.chars() {
        if matches!(c, ' ' | '\t' | '\r' | '\n') {
            pending_space = true;
            continue;
        }
        if c.is_control() {
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }

    out
}

fn strip_percent_octets(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && bytes[i + 1].is_ascii_hexdigit()
            && bytes[i + 2].is_ascii_hexdigit()
        {
            i += 3;
            continue;
        }
        out.push(bytes[i]);
        i += 1;
    }

    // 只删除了 ASCII 字节，结果仍是合法 UTF-8
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_field_plain_passthrough() {
        assert_eq!(sanitize_text_field("weekly_update"), "weekly_update");
        assert_eq!(sanitize_text_field("{post_slug}"), "{post_slug}");
    }

    #[test]
    fn test_text_field_strips_tags_and_scripts() {
        assert_eq!(sanitize_text_field("<em>spring</em> sale"), "spring sale");
        assert_eq!(sanitize_text_field("a<script>alert(1)</script>b"), "ab");
        assert_eq!(sanitize_text_field("1 < 2"), "1 &lt; 2");
    }

    #[test]
    fn test_text_field_unclosed_script_keeps_rest() {
        assert_eq!(sanitize_text_field("a<script>b"), "ab");
        assert_eq!(sanitize_text_field("x<style type=\"t\">y"), "xy");
        assert_eq!(
            sanitize_text_field("<script>bad()</script>ok<script>tail"),
            "oktail"
        );
    }

    #[test]
    fn test_text_field_collapses_whitespace() {
        assert_eq!(sanitize_text_field("  a\n\tb   c \r\n"), "a b c");
        assert_eq!(sanitize_text_field("a\u{0007}b"), "ab");
    }

    #[test]
    fn test_text_field_removes_percent_octets() {
        assert_eq!(sanitize_text_field("spring%20sale"), "springsale");
        assert_eq!(sanitize_text_field("100% off"), "100% off");
        assert_eq!(sanitize_text_field("%2%41"), "%2");
    }

    #[test]
    fn test_sanitize_key() {
        assert_eq!(sanitize_key("My Preset!"), "mypreset");
        assert_eq!(sanitize_key("news_letter-2"), "news_letter-2");
        assert_eq!(sanitize_key("   "), "");
    }

    #[test]
    fn test_sanitize_title() {
        assert_eq!(sanitize_title("Hello World!"), "hello-world");
        assert_eq!(sanitize_title("Crème Brûlée"), "creme-brulee");
        assert_eq!(sanitize_title("Spring_Sale"), "spring_sale");
        assert_eq!(sanitize_title("Big Sale_2026 Edition"), "big-sale_2026-edition");
    }
}
