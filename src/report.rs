//! report.rs — the daily report shape returned by acquisition and cached
//! between runs, plus the global source de-duplication policy.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// At most this many citations survive de-duplication.
pub const MAX_SOURCES: usize = 5;

/// A web page the model consulted while answering. Identity is `url`
/// (case-sensitive, exact match).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub url: String,
}

/// Closed set of report categories. An out-of-set tag on the wire fails
/// deserialization, which callers surface as a parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendCategory {
    #[serde(rename = "AI")]
    Ai,
    #[serde(rename = "Material Science")]
    MaterialScience,
    #[serde(rename = "Global Economy")]
    GlobalEconomy,
    Tech,
}

impl TrendCategory {
    /// Wire/display name, identical to the serde rename.
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendCategory::Ai => "AI",
            TrendCategory::MaterialScience => "Material Science",
            TrendCategory::GlobalEconomy => "Global Economy",
            TrendCategory::Tech => "Tech",
        }
    }
}

/// One trend entry of the daily report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendItem {
    pub id: String,
    pub title: String,
    pub category: TrendCategory,
    /// Short prose summary (~100 words requested from the model).
    pub summary: String,
    /// Forward-looking impact assessment.
    pub impact: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Always the *global* deduplicated citation list after acquisition;
    /// whatever the model put here is overwritten.
    #[serde(default)]
    pub sources: Vec<Source>,
}

/// A full day's report. Created only by acquisition, immutable afterwards,
/// replaced (never merged) by the next successful acquisition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyReport {
    /// Human-readable date as the model echoed it back.
    pub date: String,
    /// 50–100 word overview of the day.
    pub summary: String,
    /// 4–6 entries expected; empty is valid but degraded.
    #[serde(default)]
    pub trends: Vec<TrendItem>,
}

/// Deduplicate citations by `url`, keeping the first occurrence of each,
/// truncated to [`MAX_SOURCES`].
pub fn dedup_sources<I>(raw: I) -> Vec<Source>
where
    I: IntoIterator<Item = Source>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();
    for src in raw {
        if seen.insert(src.url.clone()) {
            out.push(src);
            if out.len() == MAX_SOURCES {
                break;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn src(url: &str) -> Source {
        Source {
            title: format!("page {url}"),
            url: url.to_string(),
        }
    }

    #[test]
    fn dedup_keeps_first_occurrence_in_order() {
        let out = dedup_sources(vec![src("a"), src("b"), src("a"), src("c"), src("b")]);
        let urls: Vec<&str> = out.iter().map(|s| s.url.as_str()).collect();
        assert_eq!(urls, vec!["a", "b", "c"]);
    }

    #[test]
    fn dedup_truncates_to_five() {
        let out = dedup_sources((0..9).map(|i| src(&format!("u{i}"))));
        assert_eq!(out.len(), MAX_SOURCES);
        assert_eq!(out[0].url, "u0");
        assert_eq!(out[4].url, "u4");
    }

    #[test]
    fn dedup_url_is_case_sensitive() {
        let out = dedup_sources(vec![src("https://X"), src("https://x")]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn category_round_trips_wire_names() {
        for (cat, wire) in [
            (TrendCategory::Ai, "\"AI\""),
            (TrendCategory::MaterialScience, "\"Material Science\""),
            (TrendCategory::GlobalEconomy, "\"Global Economy\""),
            (TrendCategory::Tech, "\"Tech\""),
        ] {
            assert_eq!(serde_json::to_string(&cat).unwrap(), wire);
            let back: TrendCategory = serde_json::from_str(wire).unwrap();
            assert_eq!(back, cat);
        }
    }

    #[test]
    fn unknown_category_fails_deserialization() {
        let err = serde_json::from_str::<TrendCategory>("\"Biotech\"");
        assert!(err.is_err(), "out-of-set category must not deserialize");
    }
}
