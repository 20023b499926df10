//! Show the effective configuration.

use anyhow::Result;

use archive_core::config::ArchiveConfig;

pub fn cmd_config(config: &ArchiveConfig) -> Result<()> {
    println!("# {}", ArchiveConfig::file_path().display());
    print!("{}", config.to_toml()?);
    Ok(())
}
