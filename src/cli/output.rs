use serde_json::Value;

use crate::cli::OutputFormat;

/// Print `data` as pretty JSON or as `label: value` lines
pub fn output_data(output_format: OutputFormat, title: &str, data: &Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        OutputFormat::Text => {
            println!("{}", title);
            for line in text_lines(data) {
                println!("  {}", line);
            }
        }
    }
    Ok(())
}

/// Scalar fields and flat maps of an object, one per line. Nested lists
/// (per-zone or per-barangay breakdowns) are summarised by their length.
pub fn text_lines(data: &Value) -> Vec<String> {
    let Some(object) = data.as_object() else {
        return vec![scalar(data)];
    };

    object
        .iter()
        .map(|(key, value)| match value {
            Value::Array(items) => format!("{}: {} entries", key, items.len()),
            Value::Object(map) if map.values().all(|v| !v.is_object() && !v.is_array()) => {
                let pairs: Vec<String> = map.iter().map(|(k, v)| format!("{}={}", k, scalar(v))).collect();
                format!("{}: {}", key, pairs.join(", "))
            }
            Value::Object(map) => format!("{}: {} fields", key, map.len()),
            other => format!("{}: {}", key, scalar(other)),
        })
        .collect()
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}
