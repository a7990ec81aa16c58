use crate::utils::error::{ReconcileError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Parses one JSON record per non-blank line.
///
/// `kind` only labels errors and log lines ("product", "listing").
pub fn parse_records<T: DeserializeOwned>(
    text: &str,
    kind: &str,
    skip_malformed: bool,
) -> Result<Vec<T>> {
    let mut records = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<T>(line) {
            Ok(record) => records.push(record),
            Err(e) if skip_malformed => {
                tracing::warn!("⚠️ Skipping malformed {} on line {}: {}", kind, index + 1, e);
            }
            Err(e) => {
                return Err(ReconcileError::MalformedRecord {
                    kind: kind.to_string(),
                    line: index + 1,
                    message: e.to_string(),
                })
            }
        }
    }

    tracing::debug!("Parsed {} {} records", records.len(), kind);
    Ok(records)
}

pub fn parse_bytes<T: DeserializeOwned>(
    data: &[u8],
    kind: &str,
    skip_malformed: bool,
) -> Result<Vec<T>> {
    let text = std::str::from_utf8(data).map_err(|e| {
        let valid = &data[..e.valid_up_to()];
        ReconcileError::MalformedRecord {
            kind: kind.to_string(),
            line: valid.iter().filter(|&&b| b == b'\n').count() + 1,
            message: format!("input is not valid UTF-8: {}", e),
        }
    })?;
    parse_records(text, kind, skip_malformed)
}

/// One compact JSON object per line, newline-terminated.
pub fn write_records<T: Serialize>(records: &[T]) -> Result<String> {
    let mut out = String::new();
    for record in records {
        out.push_str(&serde_json::to_string(record)?);
        out.push('\n');
    }
    Ok(out)
}
