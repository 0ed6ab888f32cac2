//! Parsing structured completion output.
//!
//! Models are asked for a ` ```json` fenced block; raw JSON is accepted too.

use crate::pass::Scope;
use crate::review::{
    CodeGenerationResult, GeneratedFile, IssueSeverity, ReviewIssue, ReviewResult,
};
use serde_json::Value;

/// Pull the first fenced JSON block (or the whole text) out of a response.
pub fn extract_json_block(response: &str) -> Option<Value> {
    let mut in_block = false;
    let mut current = String::new();

    for line in response.lines() {
        let trimmed = line.trim();
        if !in_block && (trimmed == "```json" || trimmed == "```") {
            in_block = true;
            current.clear();
        } else if in_block && trimmed == "```" {
            in_block = false;
            if let Ok(parsed) = serde_json::from_str::<Value>(&current) {
                return Some(parsed);
            }
        } else if in_block {
            current.push_str(line);
            current.push('\n');
        }
    }

    serde_json::from_str::<Value>(response.trim()).ok()
}

/// Parse a generator response.
///
/// Returns `None` when no JSON is found or no file carries content.
pub fn parse_generation_response(
    response: &str,
    complexity: Scope,
    default_quality: u8,
) -> Option<CodeGenerationResult> {
    let json = extract_json_block(response)?;

    let files: Vec<GeneratedFile> = json
        .get("files")?
        .as_array()?
        .iter()
        .filter_map(|f| {
            let content = f.get("content")?.as_str()?.to_string();
            Some(GeneratedFile {
                path: string_field(f, "path").unwrap_or_else(|| "src/generated".to_string()),
                content,
                language: string_field(f, "language").unwrap_or_else(|| "text".to_string()),
            })
        })
        .collect();

    if files.is_empty() {
        return None;
    }

    let quality = json
        .get("estimated_quality")
        .and_then(Value::as_f64)
        .map(clamp_percent)
        .unwrap_or(default_quality);

    let mut result = CodeGenerationResult::from_files(files, complexity, quality);
    result.tests = string_field(&json, "tests");
    result.documentation = string_field(&json, "documentation");
    Some(result)
}

/// Parse a validator response.
///
/// Unknown severities degrade to `medium`. A missing `approved` field is
/// read as not approved.
pub fn parse_review_response(response: &str) -> Option<ReviewResult> {
    let json = extract_json_block(response)?;
    if !json.is_object() {
        return None;
    }

    let issues = json
        .get("issues")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    let message = string_field(item, "message")?;
                    let severity = item
                        .get("severity")
                        .and_then(Value::as_str)
                        .and_then(|s| s.parse::<IssueSeverity>().ok())
                        .unwrap_or(IssueSeverity::Medium);
                    Some(ReviewIssue {
                        severity,
                        category: string_field(item, "category").unwrap_or_default(),
                        message,
                        file: string_field(item, "file"),
                        suggestion: string_field(item, "suggestion"),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Some(ReviewResult {
        approved: json.get("approved").and_then(Value::as_bool).unwrap_or(false),
        score: json
            .get("score")
            .and_then(Value::as_f64)
            .map(clamp_percent)
            .unwrap_or(0),
        issues,
        next_steps: string_field(&json, "next_steps").unwrap_or_default(),
    })
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn clamp_percent(v: f64) -> u8 {
    v.round().clamp(0.0, 100.0) as u8
}
