//! Aggregate export of every namespaced slot.

use crate::errors::StoreResult;
use crate::storage::Storage;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use tracing::warn;

pub const EXPORT_FILE_STEM: &str = "daily-glow-data";
pub const REPORT_TITLE: &str = "Daily Glow Tracker Data";

/// Section name (slot name without the namespace prefix) to slot contents.
pub type Export = BTreeMap<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Text,
}

impl ExportFormat {
    pub fn parse(value: Option<&str>) -> Option<Self> {
        match value.map(str::trim) {
            None | Some("") | Some("json") => Some(Self::Json),
            Some("text") | Some("txt") => Some(Self::Text),
            _ => None,
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Json => "application/json; charset=utf-8",
            Self::Text => "text/plain; charset=utf-8",
        }
    }

    pub fn file_name(self) -> String {
        match self {
            Self::Json => format!("{EXPORT_FILE_STEM}.json"),
            Self::Text => format!("{EXPORT_FILE_STEM}.txt"),
        }
    }
}

/// Reads every slot whose name starts with `prefix`. Slots that are not valid
/// JSON are kept as raw strings.
pub async fn collect(storage: &Storage, prefix: &str) -> StoreResult<Export> {
    let mut export = Export::new();
    for slot in storage.list_slots(prefix).await? {
        let Some(contents) = storage.read_slot(&slot).await? else {
            continue;
        };
        let value = match serde_json::from_str(&contents) {
            Ok(value) => value,
            Err(err) => {
                warn!(slot = %slot, "exporting unparsable slot as text: {err}");
                Value::String(contents)
            }
        };
        export.insert(slot[prefix.len()..].to_string(), value);
    }
    Ok(export)
}

pub fn to_json(export: &Export) -> StoreResult<String> {
    Ok(serde_json::to_string_pretty(export)?)
}

/// Labeled plain-text dump: one heading per section, one `key: value` line per
/// top-level entry.
pub fn to_text_report(export: &Export) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{REPORT_TITLE}");

    for (section, data) in export {
        out.push('\n');
        let _ = writeln!(out, "{}", section.to_uppercase());
        match data {
            Value::Object(entries) => {
                for (key, value) in entries {
                    let _ = writeln!(out, "  {key}: {value}");
                }
            }
            Value::Array(items) => {
                for (index, value) in items.iter().enumerate() {
                    let _ = writeln!(out, "  {index}: {value}");
                }
            }
            other => {
                let _ = writeln!(out, "  {other}");
            }
        }
    }

    out
}
