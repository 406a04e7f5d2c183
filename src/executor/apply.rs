use crate::config::Config;
use crate::executor::{CommandResult, CommandRunner, ExecutionPlan};
use anyhow::{anyhow, bail, Context, Result};
use colored::Colorize;
use std::collections::HashSet;

/// Tracks execution context and state
#[derive(Debug, Default)]
struct ExecutionContext {
    /// Batches whose every command met its expectation
    completed: HashSet<String>,
    skipped_phases: Vec<SkippedPhase>,
}

#[derive(Debug)]
struct SkippedPhase {
    name: String,
    reason: String,
}

/// Tracks failures during apply execution
#[derive(Debug, Default)]
struct ApplyErrors {
    batch_failures: Vec<BatchFailure>,
    command_failures: Vec<CommandFailure>,
}

/// A batch that could not run at all (launch or usage error)
#[derive(Debug)]
struct BatchFailure {
    name: String,
    reason: String,
}

#[derive(Debug)]
struct CommandFailure {
    batch: String,
    command: String,
    exit_code: i32,
}

impl ApplyErrors {
    fn has_failures(&self) -> bool {
        !self.batch_failures.is_empty() || !self.command_failures.is_empty()
    }
}

pub fn apply_plan(config: &Config, plan: &ExecutionPlan, dry_run: bool) -> Result<()> {
    let fail_fast = config.settings.fail_fast;
    let mut errors = ApplyErrors::default();
    let mut ctx = ExecutionContext::default();
    let mut halted = None;

    println!("{}", "=".repeat(50).bright_blue());
    println!("{}", "Starting bootkit apply".bright_blue().bold());
    println!("{}", "=".repeat(50).bright_blue());
    println!();

    if dry_run {
        println!("{}", "[DRY RUN MODE]".yellow().bold());
        println!();
    }

    if plan.phases.is_empty() {
        println!("  (No batches configured)");
    } else {
        println!("Plan: {}", plan.names().join(" → "));
    }
    println!();

    for phase in &plan.phases {
        // A batch only runs once everything it depends on has completed cleanly
        let missing_deps: Vec<&str> = phase
            .depends_on
            .iter()
            .filter(|dep| !ctx.completed.contains(*dep))
            .map(String::as_str)
            .collect();

        if !missing_deps.is_empty() {
            let reason = format!("Failed dependencies: {}", missing_deps.join(", "));

            println!(
                "  ⚠️  Skipping {} batch: {}",
                phase.name.yellow(),
                reason.yellow()
            );
            println!();

            ctx.skipped_phases.push(SkippedPhase {
                name: phase.name.clone(),
                reason,
            });
            continue;
        }

        let batch = config
            .get_batch(&phase.name)
            .with_context(|| format!("Batch '{}' is not in the config", phase.name))?;

        println!(
            "{}",
            format!("▶ Running {} ({} command(s))...", batch.name, batch.commands.len())
                .bright_cyan()
                .bold()
        );

        if dry_run {
            for command in &batch.commands {
                println!("  → Would run: {}", command);
            }
            ctx.completed.insert(phase.name.clone());
            println!();
            continue;
        }

        let runner = CommandRunner::new(batch.execution_options(&config.settings))
            .expect_success(batch.expect_success(&config.settings));

        match runner.run(&batch.spec(), true) {
            Ok(results) => {
                print_results(&results);

                let failed: Vec<&CommandResult> = results.iter().filter(|r| !r.success).collect();
                if failed.is_empty() {
                    ctx.completed.insert(phase.name.clone());
                } else {
                    for result in failed {
                        errors.command_failures.push(CommandFailure {
                            batch: phase.name.clone(),
                            command: result.command.clone(),
                            exit_code: result.exit_code,
                        });
                    }

                    if fail_fast {
                        halted = Some(anyhow!("Batch '{}' had failing commands", phase.name));
                        break;
                    }
                }
            }
            Err(e) => {
                println!("  ❌ {}", e.to_string().red());

                errors.batch_failures.push(BatchFailure {
                    name: phase.name.clone(),
                    reason: e.to_string(),
                });

                if fail_fast {
                    let context = format!("Batch '{}' failed", phase.name);
                    halted = Some(anyhow::Error::new(e).context(context));
                    break;
                }
            }
        }

        println!();
    }

    // Print summary
    let has_issues = errors.has_failures() || !ctx.skipped_phases.is_empty();

    if has_issues {
        print_summary(&errors, &ctx);

        // fail_fast stopped the plan early
        if let Some(err) = halted {
            return Err(err);
        }

        if errors.has_failures() {
            bail!("bootkit completed with errors");
        }
    }

    println!("{}", "=".repeat(50).bright_green());
    println!("{}", "✓ bootkit apply completed!".bright_green().bold());
    println!("{}", "=".repeat(50).bright_green());

    Ok(())
}

/// One status line per result
pub fn print_results(results: &[CommandResult]) {
    for result in results {
        if !result.success {
            println!(
                "  {} {} (exit {})",
                "✗".red(),
                result.command.red(),
                result.exit_code
            );
        } else if result.exit_code != 0 {
            println!(
                "  {} {} (exit {}, ignored)",
                "✓".green(),
                result.command,
                result.exit_code
            );
        } else {
            println!("  {} {}", "✓".green(), result.command);
        }
    }
}

/// Print comprehensive summary at end of apply
fn print_summary(errors: &ApplyErrors, ctx: &ExecutionContext) {
    println!();
    println!("{}", "=".repeat(50).yellow());
    println!("{}", "⚠️  bootkit completed with issues".yellow().bold());
    println!("{}", "=".repeat(50).yellow());
    println!();

    // Print skipped batches first
    if !ctx.skipped_phases.is_empty() {
        println!("{}", "Skipped batches:".yellow().bold());
        for skipped in &ctx.skipped_phases {
            println!("  ⊘ {}", skipped.name.yellow());
            println!("     Reason: {}", skipped.reason);
            println!();
        }
    }

    if !errors.batch_failures.is_empty() {
        println!("{}", "Batches that could not run:".red().bold());
        for failure in &errors.batch_failures {
            println!("  ❌ {}", failure.name.red());
            println!("     Reason: {}", failure.reason);
            println!();
        }
    }

    if !errors.command_failures.is_empty() {
        println!("{}", "Failed commands:".red().bold());
        for failure in &errors.command_failures {
            println!(
                "  ❌ [{}] {} (exit {})",
                failure.batch, failure.command, failure.exit_code
            );
        }
        println!();
    }

    println!(
        "💡 {}",
        "Run 'bootkit apply <BATCH>' to retry a single batch after fixing the issues."
            .bright_yellow()
    );
    println!();
}
