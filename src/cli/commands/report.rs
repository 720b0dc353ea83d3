use serde_json::Value;

use crate::cli::output::{output_data, text_lines};
use crate::cli::{OutputFormat, RegistryClient};

pub async fn handle(client: &RegistryClient, municipality_id: i64, output_format: OutputFormat) -> anyhow::Result<()> {
    let report = client
        .get(&format!("/api/reports/municipalities/{}", municipality_id))
        .await?;

    if output_format == OutputFormat::Json {
        return output_data(output_format, "", &report);
    }

    println!("{}", report.get("summary").and_then(Value::as_str).unwrap_or("Report"));
    for section in ["municipalityStatistics", "householdStatistics", "residentStatistics"] {
        if let Some(data) = report.get(section) {
            println!("{}", section);
            for line in text_lines(data) {
                println!("  {}", line);
            }
        }
    }
    Ok(())
}
