//! Seed file export and validation.

use std::path::Path;

use farm2hand_dashboard::store::{SeedData, SeedError};
use tokio::io::AsyncWriteExt;
use tracing::{error, info};

/// Write the built-in seed as YAML to `output`, or stdout when `None`.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub async fn export(output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let yaml = SeedData::builtin().to_yaml()?;

    match output {
        Some(path) => {
            tokio::fs::write(path, &yaml).await?;
            info!(path = %path.display(), "Seed exported");
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(yaml.as_bytes()).await?;
            stdout.flush().await?;
        }
    }

    Ok(())
}

/// Load `path` and report every problem found.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or fails
/// validation.
pub async fn check(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    info!(path = %path.display(), "Checking seed file");

    let yaml = tokio::fs::read_to_string(path).await?;
    match SeedData::from_yaml_str(&yaml) {
        Ok(seed) => {
            info!("Seed file is valid");
            info!("  Products: {}", seed.products.len());
            info!("  Orders: {}", seed.orders.len());
            info!("  Contacts: {}", seed.contacts.len());
            info!("  Messages: {}", seed.messages.len());
            info!("  Rewards: {}", seed.rewards.len());
            Ok(())
        }
        Err(SeedError::Invalid(problems)) => {
            error!("Seed validation failed:");
            for problem in &problems {
                error!("  - {problem}");
            }
            Err(format!("{} validation errors found", problems.len()).into())
        }
        Err(e) => Err(e.into()),
    }
}
