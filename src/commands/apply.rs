use crate::config::{load_config_auto, validate_config};
use crate::executor::{apply_plan, create_execution_plan};
use crate::system::HostSnapshot;
use anyhow::Result;
use std::path::Path;

pub fn run(
    config_path: Option<&Path>,
    host: &HostSnapshot,
    dry_run: bool,
    batch: Option<&str>,
    color: bool,
) -> Result<()> {
    // Load config
    let (path, config) = load_config_auto(config_path)?;

    log::info!("Loaded config from: {}", path.display());

    host.print(color);
    println!();

    // Validate config
    validate_config(&config)?;

    // Create execution plan
    let plan = create_execution_plan(&config, batch)?;

    // Apply plan
    apply_plan(&config, &plan, dry_run)?;

    Ok(())
}
