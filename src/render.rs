//! render.rs — plain-text rendering of a daily report: a hero section
//! (date + overview) followed by one card per trend.

use std::fmt::Write as _;

use crate::report::{DailyReport, TrendItem};

/// Render the whole report. `cached_on` is the date key when the report
/// was served from the cache rather than freshly acquired.
pub fn render_report(report: &DailyReport, cached_on: Option<&str>) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "TrendSphere — Today's Insight • {}", report.date);
    let _ = writeln!(out, "{}", "=".repeat(60));
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", report.summary);
    let _ = writeln!(out);

    if report.trends.is_empty() {
        let _ = writeln!(out, "(no trends in today's report)");
    }
    for (idx, trend) in report.trends.iter().enumerate() {
        render_trend(&mut out, idx + 1, trend);
    }

    if let Some(day) = cached_on {
        let _ = writeln!(out, "(cached report — last updated {day})");
    }
    out
}

fn render_trend(out: &mut String, number: usize, trend: &TrendItem) {
    let _ = writeln!(
        out,
        "{number}. [{}] {}",
        trend.category.as_str(),
        trend.title
    );
    let _ = writeln!(out, "   {}", trend.summary);
    let _ = writeln!(out, "   Impact: {}", trend.impact);
    if !trend.keywords.is_empty() {
        let _ = writeln!(out, "   Keywords: {}", trend.keywords.join(", "));
    }
    if !trend.sources.is_empty() {
        let _ = writeln!(out, "   Related references:");
        for source in &trend.sources {
            let _ = writeln!(out, "     - {} <{}>", source.title, source.url);
        }
    }
    let _ = writeln!(out);
}
