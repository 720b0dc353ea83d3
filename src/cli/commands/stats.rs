use clap::ValueEnum;

use crate::cli::output::output_data;
use crate::cli::{OutputFormat, RegistryClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LevelArg {
    System,
    Municipality,
    Barangay,
    Zone,
}

impl LevelArg {
    /// API path for this level; every level but `system` needs an id
    pub fn path(self, id: Option<i64>) -> anyhow::Result<String> {
        let collection = match self {
            LevelArg::System => {
                if id.is_some() {
                    anyhow::bail!("system statistics take no id");
                }
                return Ok("/api/statistics/system".to_string());
            }
            LevelArg::Municipality => "municipalities",
            LevelArg::Barangay => "barangays",
            LevelArg::Zone => "zones",
        };
        let id = id.ok_or_else(|| anyhow::anyhow!("{:?} statistics need an id", self))?;
        Ok(format!("/api/statistics/{}/{}", collection, id))
    }
}

pub async fn handle(
    client: &RegistryClient,
    level: LevelArg,
    id: Option<i64>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let data = client.get(&level.path(id)?).await?;
    let title = match id {
        Some(id) => format!("{:?} {} statistics", level, id),
        None => format!("{:?} statistics", level),
    };
    output_data(output_format, &title, &data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_paths_per_level() {
        assert_eq!(LevelArg::System.path(None).unwrap(), "/api/statistics/system");
        assert_eq!(LevelArg::Zone.path(Some(100)).unwrap(), "/api/statistics/zones/100");
        assert!(LevelArg::Barangay.path(None).is_err());
        assert!(LevelArg::System.path(Some(1)).is_err());
    }
}
