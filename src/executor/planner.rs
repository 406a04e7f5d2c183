use crate::config::Config;
use anyhow::Result;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct ExecutionPlan {
    pub phases: Vec<Phase>,
}

#[derive(Debug, Clone)]
pub struct Phase {
    pub name: String,
    pub depends_on: Vec<String>,
}

impl ExecutionPlan {
    pub fn names(&self) -> Vec<&str> {
        self.phases.iter().map(|p| p.name.as_str()).collect()
    }
}

/// Order batches so each runs after its dependencies.
///
/// Batches with no ordering constraint between them keep their config order.
/// With `target` set, only that batch and its transitive dependencies are
/// planned.
pub fn create_execution_plan(config: &Config, target: Option<&str>) -> Result<ExecutionPlan> {
    let wanted = match target {
        Some(name) => Some(collect_dependencies(config, name)?),
        None => None,
    };

    let mut remaining: Vec<&str> = config
        .batches
        .iter()
        .map(|b| b.name.as_str())
        .filter(|name| wanted.as_ref().map_or(true, |w| w.contains(*name)))
        .collect();

    // Topological sort to determine execution order
    let mut satisfied: HashSet<&str> = HashSet::new();
    let mut phases = vec![];

    while !remaining.is_empty() {
        let before_len = remaining.len();

        remaining.retain(|&name| {
            let deps = config
                .get_batch(name)
                .map(|b| b.depends_on.as_slice())
                .unwrap_or(&[]);

            if deps.iter().all(|d| satisfied.contains(d.as_str())) {
                phases.push(Phase {
                    name: name.to_string(),
                    depends_on: deps.to_vec(),
                });

                satisfied.insert(name);
                false // Remove from remaining
            } else {
                true // Keep in remaining
            }
        });

        // Check for cycles
        if remaining.len() == before_len {
            anyhow::bail!(
                "Dependency cycle or unsatisfied dependencies: {:?}",
                remaining
            );
        }
    }

    Ok(ExecutionPlan { phases })
}

fn collect_dependencies<'a>(config: &'a Config, target: &'a str) -> Result<HashSet<&'a str>> {
    let mut wanted = HashSet::new();
    let mut pending = vec![target];

    while let Some(name) = pending.pop() {
        let Some(batch) = config.get_batch(name) else {
            anyhow::bail!("Unknown batch: {}", name);
        };
        if wanted.insert(batch.name.as_str()) {
            pending.extend(batch.depends_on.iter().map(String::as_str));
        }
    }

    Ok(wanted)
}
