//! One-shot bridge to the external LLM analysis service. Sends the current
//! headers, a small data sample, and the user's question; whatever comes
//! back is display text. No retry, no cancellation, no response schema
//! beyond the text field.

use serde::Deserialize;
use tracing::{debug, error};

use crate::data::{Row, Value};
use crate::domain::{MejaConfig, MejaError};
use crate::i18n::Catalog;

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: String,
}

/// Runs one analysis round trip on the calling thread. Always returns a
/// display string; failures come back as a localized error message.
pub fn analyze(
    headers: &[String],
    rows: &[Row],
    question: &str,
    config: &MejaConfig,
    catalog: &Catalog,
) -> String {
    let Some(api_key) = &config.api_key else {
        return catalog.tr("Missing api key");
    };
    let prompt = build_prompt(headers, rows, question, config.sample_rows);
    debug!("Sending analysis prompt of {} bytes", prompt.len());
    match request(&config.api_url, api_key, &prompt) {
        Ok(text) => text,
        Err(err) => {
            error!("Analysis request failed: {err:?}");
            catalog.tr_args("Analysis failed", &[("message", &format!("{err:?}"))])
        }
    }
}

/// Builds the analyst prompt from the headers, up to `sample_rows` leading
/// rows rendered as comma separated lines, the total row count, and the
/// user's question. Pure, so it is testable without a network.
pub fn build_prompt(headers: &[String], rows: &[Row], question: &str, sample_rows: usize) -> String {
    let sample = rows
        .iter()
        .take(sample_rows)
        .map(|row| {
            headers
                .iter()
                .map(|h| row.get(h).unwrap_or(&Value::Missing).render())
                .collect::<Vec<_>>()
                .join(", ")
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are an expert data analyst. Given the following CSV data, answer \
the user's question. Focus on clear, concise, actionable insights.\n\n\
Column headers:\n{}\n\n\
Data sample (up to the first {} rows):\n{}\n\n\
Total data rows: {}\n\n\
User question:\n\"{}\"\n\n\
Your analysis:",
        headers.join(", "),
        sample_rows,
        sample,
        rows.len(),
        question
    )
}

fn request(url: &str, api_key: &str, prompt: &str) -> Result<String, MejaError> {
    let body = serde_json::json!({
        "contents": [{ "parts": [{ "text": prompt }] }]
    });
    let client = reqwest::blocking::Client::new();
    let response = client
        .post(url)
        .header("x-goog-api-key", api_key)
        .json(&body)
        .send()?
        .error_for_status()?;
    let parsed: GenerateResponse = response.json()?;
    parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content.parts.into_iter().next())
        .map(|part| part.text)
        .ok_or(MejaError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Lang;

    fn srow(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::Str(v.to_string())))
            .collect()
    }

    #[test]
    fn prompt_contains_headers_sample_and_count() {
        let headers = vec!["Name".to_string(), "Age".to_string()];
        let rows = vec![
            srow(&[("Name", "Ann"), ("Age", "30")]),
            srow(&[("Name", "Bob"), ("Age", "25")]),
        ];
        let prompt = build_prompt(&headers, &rows, "Who is oldest?", 10);
        assert!(prompt.contains("Name, Age"));
        assert!(prompt.contains("Ann, 30"));
        assert!(prompt.contains("Total data rows: 2"));
        assert!(prompt.contains("\"Who is oldest?\""));
    }

    #[test]
    fn prompt_sample_is_capped() {
        let headers = vec!["N".to_string()];
        let rows: Vec<Row> = (0..50)
            .map(|i| srow(&[("N", format!("row{i}").as_str())]))
            .collect();
        let prompt = build_prompt(&headers, &rows, "q", 10);
        assert!(prompt.contains("row9"));
        assert!(!prompt.contains("row10"));
        assert!(prompt.contains("Total data rows: 50"));
    }

    #[test]
    fn missing_api_key_short_circuits() {
        let config = MejaConfig::default();
        let catalog = Catalog::new(Lang::En);
        let text = analyze(&[], &[], "q", &config, &catalog);
        assert!(text.contains("MEJA_API_KEY"));
    }
}
