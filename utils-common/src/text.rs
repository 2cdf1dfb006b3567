use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

/// 开头的整数部分：可选空白、可选符号、至少一位数字
static LEADING_INT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([+-]?\d+)").expect("leading integer pattern is valid")
});

/// 解析时长文本开头的整数，例如 "8 min read" -> 8
///
/// 没有数字开头（或数值溢出）时按 0 处理，排序不会因为个别脏数据中断。
pub fn leading_integer(text: &str) -> i64 {
    parse_leading_integer(text).unwrap_or(0)
}

/// 同 `leading_integer`，但无法解析时返回 None
pub fn parse_leading_integer(text: &str) -> Option<i64> {
    LEADING_INT
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i64>().ok())
}

/// 不区分大小写的子串匹配，needle 需已是小写
pub fn contains_lowercase(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// 解析发布日期，支持 "YYYY-MM-DD" 和 RFC3339
pub fn parse_publish_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.date_naive())
}

/// 转义插入 HTML 的文本
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_integer_reads_prefix() {
        assert_eq!(leading_integer("8 min read"), 8);
        assert_eq!(leading_integer("  45min"), 45);
        assert_eq!(leading_integer("-3 days"), -3);
    }

    #[test]
    fn leading_integer_fails_closed() {
        assert_eq!(leading_integer("about 10 min"), 0);
        assert_eq!(leading_integer(""), 0);
        assert_eq!(leading_integer("99999999999999999999999 min"), 0);
        assert_eq!(parse_leading_integer("about 10 min"), None);
        assert_eq!(parse_leading_integer(" 45 min"), Some(45));
    }

    #[test]
    fn publish_date_formats() {
        assert_eq!(
            parse_publish_date("2024-03-15"),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert_eq!(
            parse_publish_date("2024-03-15T10:00:00Z"),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert_eq!(parse_publish_date("March"), None);
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;");
    }

    #[test]
    fn lowercase_contains() {
        assert!(contains_lowercase("Fresh Basil Leaves", "basil"));
        assert!(!contains_lowercase("Tomato", "basil"));
    }
}
