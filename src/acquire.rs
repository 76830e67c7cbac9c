//! acquire.rs — request one day's report and normalize it.
//!
//! The schema is communicated to the model through prompt text only;
//! grounded calls cannot combine with a machine-validated response format,
//! so the reply is free text with a fenced JSON block that we extract and
//! parse here. Citations come from grounding metadata, never from the
//! model's own output.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::clock;
use crate::error::AcquireError;
use crate::provider::DynGenerateClient;
use crate::report::{dedup_sources, DailyReport, Source};

/// Instruction template with today's display date embedded. Categories and
/// field names are spelled out verbatim; the wire shape of [`DailyReport`]
/// must match what this asks for.
pub fn build_prompt(today: &str) -> String {
    format!(
        r#"You are a professional global technology trend analyst. Today is {today}.
Use Google Search to look up today's latest global technology news and produce a trend report.

Focus areas:
1. Artificial Intelligence - top priority; look for model releases, policy and regulation, major applications.
2. Material Science - secondary; look for breakthroughs in superconductors, battery technology, nanomaterials.
3. Other major technology or economic currents - only genuinely high-impact events.

Reply strictly in the following JSON format, with nothing outside the fenced block:
```json
{{
  "date": "{today}",
  "summary": "A 50-100 word professional, forward-looking summary of today's global trends.",
  "trends": [
    {{
      "id": "unique_id_1",
      "category": "AI" | "Material Science" | "Global Economy" | "Tech",
      "title": "Headline",
      "summary": "Detailed summary (about 100 words)",
      "impact": "Concrete assessment of the future impact",
      "keywords": ["keyword1", "keyword2", "keyword3"]
    }}
  ]
}}
```
Make sure there are at least 4-6 significant trends. If there is no major material-science news today, focus on AI and other technology."#
    )
}

// Primary pattern is intentionally strict; the bare-fence fallback absorbs
// whitespace-skewed fences, and raw text is the last resort.
static JSON_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```json\n(.*?)\n```").expect("json fence regex"));
static BARE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(.*?)```").expect("bare fence regex"));

/// Locate the JSON payload inside the model's free text.
fn extract_payload(text: &str) -> &str {
    if let Some(caps) = JSON_FENCE.captures(text) {
        return caps.get(1).map_or(text, |m| m.as_str());
    }
    if let Some(caps) = BARE_FENCE.captures(text) {
        return caps.get(1).map_or(text, |m| m.as_str());
    }
    text
}

/// Parse the model's text into a report. Any failure, including an
/// out-of-set category tag, is a parse error; never retried here.
pub fn parse_report(text: &str) -> Result<DailyReport, AcquireError> {
    serde_json::from_str(extract_payload(text)).map_err(AcquireError::Parse)
}

/// Report acquisition over an injected generation backend.
pub struct Acquirer {
    client: DynGenerateClient,
}

impl Acquirer {
    pub fn new(client: DynGenerateClient) -> Self {
        Self { client }
    }

    /// One acquisition: prompt, grounded call, citation dedup, parse, and
    /// the global-source merge into every trend item.
    pub async fn acquire(&self) -> Result<DailyReport, AcquireError> {
        let today = clock::today_display();
        let prompt = build_prompt(&today);
        debug!(backend = self.client.name(), %today, "starting acquisition");

        let generation = self.client.generate(&prompt).await?;

        let sources = dedup_sources(generation.citations.into_iter().map(|c| Source {
            title: c.title,
            url: c.uri,
        }));

        let mut report = parse_report(&generation.text)?;

        // The same global list goes on every item; per-item attribution
        // from the model is overwritten on purpose.
        for trend in &mut report.trends {
            trend.sources = sources.clone();
        }

        info!(
            trends = report.trends.len(),
            sources = sources.len(),
            "daily report acquired"
        );
        Ok(report)
    }
}
