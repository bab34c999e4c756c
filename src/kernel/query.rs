use std::sync::OnceLock;

use regex::Regex;

fn param_pattern() -> &'static Regex {
    static PARAM: OnceLock<Regex> = OnceLock::new();
    PARAM.get_or_init(|| Regex::new(r"[?&]([^=&#]*)(=([^&#]*))?").expect("static param pattern"))
}

/// Query-string lookups against a page location.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    href: String,
}

impl QueryParams {
    pub fn from_location(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }

    /// First `?name` / `&name` occurrence. A bare name yields `Some("")`.
    pub fn get(&self, name: &str) -> Option<String> {
        let captures = param_pattern()
            .captures_iter(&self.href)
            .find(|c| c.get(1).map(|m| m.as_str()) == Some(name))?;
        let raw = match captures.get(3) {
            Some(value) if !value.as_str().is_empty() => value.as_str(),
            _ => return Some(String::new()),
        };
        let spaced = raw.replace('+', " ");
        Some(match urlencoding::decode(&spaced) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => spaced,
        })
    }

    /// Like [`get`](Self::get), but an empty value counts as absent.
    pub fn non_empty(&self, name: &str) -> Option<String> {
        self.get(name).filter(|v| !v.is_empty())
    }

    /// The location with its query string removed.
    pub fn base(&self) -> &str {
        self.href.split('?').next().unwrap_or(&self.href)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_and_decodes_values() {
        let q = QueryParams::from_location(
            "http://host/?url=http%3A%2F%2Fa%2Fb.onnx&identifier=my+model#frag",
        );
        assert_eq!(q.get("url").as_deref(), Some("http://a/b.onnx"));
        assert_eq!(q.get("identifier").as_deref(), Some("my model"));
        assert_eq!(q.get("missing"), None);
    }

    #[test]
    fn bare_names_and_fragments() {
        let q = QueryParams::from_location("http://host/page?flag&url=x#url=y");
        assert_eq!(q.get("flag").as_deref(), Some(""));
        assert_eq!(q.non_empty("flag"), None);
        assert_eq!(q.get("url").as_deref(), Some("x"));
    }

    #[test]
    fn does_not_match_name_suffixes() {
        let q = QueryParams::from_location("http://host/?myurl=a");
        assert_eq!(q.get("url"), None);
    }

    #[test]
    fn malformed_escapes_fall_back_to_raw() {
        let q = QueryParams::from_location("http://host/?identifier=%FFabc");
        assert_eq!(q.get("identifier").as_deref(), Some("%FFabc"));
    }

    #[test]
    fn repeated_lookups_take_first_match() {
        let q = QueryParams::from_location("http://host/?url=a&identifier=one&url=b");
        for _ in 0..3 {
            assert_eq!(q.get("url").as_deref(), Some("a"));
            assert_eq!(q.get("identifier").as_deref(), Some("one"));
        }
    }

    #[test]
    fn base_strips_query() {
        let q = QueryParams::from_location("http://host/app/?url=x");
        assert_eq!(q.base(), "http://host/app/");
    }
}
