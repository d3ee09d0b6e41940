use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use tracing::info;

use crate::config::Config;
use crate::error::{AnalyzeError, WeatherError};
use crate::intake::UploadCandidate;
use crate::models::{
    GeminiContent, GeminiPart, GeminiRequest, GeminiResponse, InlineData, PlantReport,
};
use crate::prompt;
use crate::weather::{self, Coordinates};

/// Run one analysis cycle over the active candidate: fresh weather fetch,
/// prompt build, inline image encode, one generateContent call, then decode
/// of the nested report. Weather strictly precedes the prompt, which
/// strictly precedes the request.
pub async fn analyze(
    client: &Client,
    config: &Config,
    candidate: &UploadCandidate,
    coords: Option<Coordinates>,
) -> Result<PlantReport, AnalyzeError> {
    let coords = coords.ok_or(WeatherError::LocationUnavailable)?;

    let snapshot = weather::fetch_forecast(client, config, coords).await?;
    let full_prompt = prompt::build_prompt(&snapshot);

    // Encode the stored bytes; the preview data URI is not reused here.
    let encoded = STANDARD.encode(&candidate.bytes);

    let request = GeminiRequest {
        contents: vec![GeminiContent {
            parts: vec![
                GeminiPart::Text { text: full_prompt },
                GeminiPart::InlineData {
                    inline_data: InlineData {
                        mime_type: candidate.mime_type.clone(),
                        data: encoded,
                    },
                },
            ],
        }],
    };

    info!(
        "Sending {} byte {} image for analysis...",
        candidate.size_bytes, candidate.mime_type
    );

    let url = format!("{}?key={}", config.gemini_endpoint, config.gemini_api_key);
    let resp = client.post(&url).json(&request).send().await?;

    let status = resp.status();
    let body = resp.text().await?;

    if !status.is_success() {
        return Err(AnalyzeError::Upstream { status, body });
    }

    decode_report(&body)
}

/// Decode the provider envelope down to a `PlantReport`. The generated text
/// is itself a JSON document, possibly wrapped in a fenced code block. A
/// report carrying `error` is a rejection, not a result.
pub fn decode_report(body: &str) -> Result<PlantReport, AnalyzeError> {
    let envelope: GeminiResponse = serde_json::from_str(body)
        .map_err(|e| AnalyzeError::Parse(format!("bad envelope: {e}")))?;

    let text = envelope
        .candidates
        .first()
        .and_then(|c| c.content.parts.first())
        .map(|p| p.text.as_str())
        .ok_or_else(|| AnalyzeError::Parse("response contained no candidates".to_string()))?;

    let report: PlantReport = serde_json::from_str(extract_json(text))
        .map_err(|e| AnalyzeError::Parse(format!("bad report JSON: {e}")))?;

    if let Some(message) = &report.error {
        return Err(AnalyzeError::Rejected(message.clone()));
    }

    Ok(report)
}

/// Strip an optional fenced-code-block wrapper around the generated JSON.
fn extract_json(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROSE_JSON: &str = r#"{"name": "Rose", "scientificName": "Rosa", "description": "A red rose", "healthAnalysis": "Healthy", "plantCare": {"watering": ["Water daily"], "forecast": ["Water sparingly"]}}"#;

    fn envelope(inner_text: &str) -> String {
        serde_json::json!({
            "candidates": [
                { "content": { "parts": [ { "text": inner_text } ] } }
            ]
        })
        .to_string()
    }

    #[test]
    fn decodes_a_plain_report() {
        let report = decode_report(&envelope(ROSE_JSON)).unwrap();
        assert_eq!(report.name.as_deref(), Some("Rose"));
        assert_eq!(report.scientific_name.as_deref(), Some("Rosa"));
        let care = report.plant_care.unwrap();
        assert_eq!(care.watering, vec!["Water daily"]);
        assert_eq!(care.forecast, vec!["Water sparingly"]);
    }

    #[test]
    fn fenced_and_unfenced_reports_decode_identically() {
        let fenced = format!("```json\n{ROSE_JSON}\n```");
        let plain = decode_report(&envelope(ROSE_JSON)).unwrap();
        let wrapped = decode_report(&envelope(&fenced)).unwrap();
        assert_eq!(plain.name, wrapped.name);
        assert_eq!(plain.health_analysis, wrapped.health_analysis);
    }

    #[test]
    fn bare_fence_without_language_tag_is_stripped() {
        let fenced = format!("```\n{ROSE_JSON}\n```");
        let report = decode_report(&envelope(&fenced)).unwrap();
        assert_eq!(report.name.as_deref(), Some("Rose"));
    }

    #[test]
    fn error_field_is_a_rejection() {
        let body = envelope(r#"{"error": "This does not look like a plant"}"#);
        let err = decode_report(&body).unwrap_err();
        assert!(matches!(err, AnalyzeError::Rejected(m) if m == "This does not look like a plant"));
    }

    #[test]
    fn missing_candidates_is_a_parse_failure() {
        let err = decode_report(r#"{"candidates": []}"#).unwrap_err();
        assert!(matches!(err, AnalyzeError::Parse(_)));
    }

    #[test]
    fn non_json_generated_text_is_a_parse_failure() {
        let err = decode_report(&envelope("Sorry, I cannot help with that.")).unwrap_err();
        assert!(matches!(err, AnalyzeError::Parse(_)));
    }

    #[test]
    fn garbage_body_is_a_parse_failure() {
        let err = decode_report("<html>502</html>").unwrap_err();
        assert!(matches!(err, AnalyzeError::Parse(_)));
    }

    #[test]
    fn partial_report_tolerates_absent_sections() {
        let report = decode_report(&envelope(r#"{"name": "Fern"}"#)).unwrap();
        assert_eq!(report.name.as_deref(), Some("Fern"));
        assert!(report.health_overview.is_none());
        assert!(report.potential_health_conditions.is_none());
    }

    #[test]
    fn extract_json_trims_surrounding_whitespace() {
        assert_eq!(extract_json("  {\"a\": 1}  "), "{\"a\": 1}");
        assert_eq!(extract_json("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }
}
