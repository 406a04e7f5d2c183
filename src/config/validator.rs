use super::Config;
use anyhow::Result;
use std::collections::{HashMap, HashSet};

/// Validate config for correctness
pub fn validate_config(config: &Config) -> Result<()> {
    validate_shell(config)?;

    validate_batch_names(config)?;

    // Every command must have something to launch
    validate_commands(config)?;

    // Check for dependency cycles
    check_dependency_cycles(config)?;

    Ok(())
}

fn validate_shell(config: &Config) -> Result<()> {
    let shell = config.settings.shell();
    if !crate::utils::command_exists(&shell.to_string_lossy()) {
        anyhow::bail!("Shell interpreter not found: {}", shell.display());
    }
    Ok(())
}

/// Names must be present, unique, and every dependency must name a batch
fn validate_batch_names(config: &Config) -> Result<()> {
    let mut seen = HashSet::new();
    for batch in &config.batches {
        if batch.name.trim().is_empty() {
            anyhow::bail!("Batch names must not be empty");
        }
        if !seen.insert(batch.name.as_str()) {
            anyhow::bail!("Duplicate batch name: {}", batch.name);
        }
    }

    for batch in &config.batches {
        for dep in &batch.depends_on {
            if !seen.contains(dep.as_str()) {
                anyhow::bail!("Batch '{}' depends on unknown batch '{}'", batch.name, dep);
            }
        }
    }

    Ok(())
}

fn validate_commands(config: &Config) -> Result<()> {
    for batch in &config.batches {
        if let Some(index) = batch.commands.iter().position(|c| c.is_empty()) {
            anyhow::bail!("Batch '{}' has an empty command at position {}", batch.name, index);
        }
    }
    Ok(())
}

/// Check for circular dependencies in depends_on
fn check_dependency_cycles(config: &Config) -> Result<()> {
    let deps: HashMap<&str, Vec<String>> = config
        .batches
        .iter()
        .map(|b| (b.name.as_str(), b.depends_on.clone()))
        .collect();

    // Check each node for cycles using DFS
    for &node in deps.keys() {
        let mut visited = HashSet::new();
        let mut stack = HashSet::new();
        if has_cycle(node, &deps, &mut visited, &mut stack) {
            anyhow::bail!("Dependency cycle detected involving: {}", node);
        }
    }

    Ok(())
}

fn has_cycle(
    node: &str,
    deps: &HashMap<&str, Vec<String>>,
    visited: &mut HashSet<String>,
    stack: &mut HashSet<String>,
) -> bool {
    if stack.contains(node) {
        return true;
    }
    if visited.contains(node) {
        return false;
    }

    visited.insert(node.to_string());
    stack.insert(node.to_string());

    if let Some(neighbors) = deps.get(node) {
        for neighbor in neighbors {
            if has_cycle(neighbor, deps, visited, stack) {
                return true;
            }
        }
    }

    stack.remove(node);
    false
}
