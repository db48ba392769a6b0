use crate::ai::ClassificationResult;
use crate::error::{AppError, Result};
use crate::utils::security::validate_path_segment;
use serde::Deserialize;
use tracing::warn;

/// Shape of the model's answer before validation. Every field may be missing.
#[derive(Debug, Deserialize)]
struct RawClassification {
    filename: Option<String>,
    group: Option<String>,
    subgroup: Option<String>,
}

/// Parse the model's raw text as JSON, with a single repair pass.
///
/// The repair drops the first and last line, which unwraps a fenced
/// ```` ```json ```` block. No other repair is attempted.
pub fn parse_model_json(raw: &str) -> Result<serde_json::Value> {
    match serde_json::from_str(raw) {
        Ok(value) => return Ok(value),
        Err(e) => warn!("Model response is not valid JSON ({}), trying to repair it", e),
    }

    serde_json::from_str(&strip_outer_lines(raw)).map_err(|e| AppError::Classification {
        message: format!("Unparsable model response: {}", e),
    })
}

fn strip_outer_lines(raw: &str) -> String {
    let lines: Vec<&str> = raw.split('\n').collect();
    if lines.len() <= 2 {
        return String::new();
    }
    lines[1..lines.len() - 1].join("\n")
}

/// Strip one trailing `.ext` suffix the model may have added
pub fn strip_extension(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(idx) if idx + 1 < filename.len() && !filename[idx + 1..].contains('/') => {
            &filename[..idx]
        }
        _ => filename,
    }
}

/// Turn untrusted model JSON into a validated classification.
///
/// `group` and `subgroup` are kept verbatim; only names that cannot be a
/// single directory component are rejected.
pub fn into_classification(value: serde_json::Value) -> Result<ClassificationResult> {
    if !value.is_object() {
        return Err(AppError::Classification {
            message: "Model response is not a JSON object".to_string(),
        });
    }

    let raw: RawClassification =
        serde_json::from_value(value).map_err(|e| AppError::Classification {
            message: format!("Unexpected response shape: {}", e),
        })?;

    let filename = raw.filename.ok_or_else(|| missing_field("filename"))?;
    let group = raw.group.ok_or_else(|| missing_field("group"))?;
    let subgroup = raw.subgroup.ok_or_else(|| missing_field("subgroup"))?;

    let filename = strip_extension(&filename).to_string();

    validate_path_segment("filename", &filename)?;
    validate_path_segment("group", &group)?;
    validate_path_segment("subgroup", &subgroup)?;

    Ok(ClassificationResult {
        filename,
        group,
        subgroup,
    })
}

fn missing_field(field: &str) -> AppError {
    AppError::Classification {
        message: format!("Model response is missing '{}'", field),
    }
}
