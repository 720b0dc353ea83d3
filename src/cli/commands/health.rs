use crate::cli::output::output_data;
use crate::cli::{OutputFormat, RegistryClient};

pub async fn handle(client: &RegistryClient, output_format: OutputFormat) -> anyhow::Result<()> {
    let data = client.get("/health").await?;
    output_data(output_format, "Server health", &data)
}
