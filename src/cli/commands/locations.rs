use serde_json::{json, Value};

use crate::cli::{OutputFormat, RegistryClient};

pub async fn handle(client: &RegistryClient, fix: bool, output_format: OutputFormat) -> anyhow::Result<()> {
    let drifts = client.get("/api/residents/location-audit").await?;
    let drifts = drifts.as_array().cloned().unwrap_or_default();

    let mut resynced = Vec::new();
    if fix {
        for drift in &drifts {
            // broken household chains cannot be resynced
            if drift.get("derived").map_or(true, Value::is_null) {
                continue;
            }
            if let Some(id) = drift.get("residentId").and_then(Value::as_i64) {
                client
                    .post(&format!("/api/residents/{}/resync-location", id))
                    .await?;
                resynced.push(id);
            }
        }
    }

    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({ "drifts": drifts, "resynced": resynced }))?
            );
        }
        OutputFormat::Text => {
            if drifts.is_empty() {
                println!("All resident locations match their households");
                return Ok(());
            }
            for drift in &drifts {
                println!(
                    "resident {} (household {}): stored zone {} derived zone {}",
                    drift["residentId"],
                    drift["householdId"],
                    drift["stored"]["zoneId"],
                    drift["derived"].get("zoneId").cloned().unwrap_or(Value::Null)
                );
            }
            if fix {
                println!("✓ Resynced {} of {} residents", resynced.len(), drifts.len());
            }
        }
    }
    Ok(())
}
