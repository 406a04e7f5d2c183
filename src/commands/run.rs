use crate::cli::RunArgs;
use crate::config::load_config_or_default;
use crate::executor::{
    self, print_results, CommandSpec, ExecutionOptions, Invocation, Redirect, StdinMode,
};
use anyhow::{bail, Context, Result};
use std::path::Path;

pub fn run(config_path: Option<&Path>, args: &RunArgs) -> Result<()> {
    let config = load_config_or_default(config_path)?;

    let options = build_options(config.settings.execution_options(), args);
    let expect_success = config.settings.expect_success && !args.no_check;
    let spec = build_spec(args);

    let results = match executor::run(&spec, expect_success, args.multi, options) {
        Ok(results) => results,
        Err(e) if e.is_usage() && !args.multi => {
            return Err(e).context("Pass exactly one COMMAND, or use --multi for several");
        }
        Err(e) => return Err(e.into()),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for result in &results {
            print_results(std::slice::from_ref(result));
            if let Some(stdout) = &result.stdout {
                print!("{}", stdout);
            }
            if let Some(stderr) = &result.stderr {
                eprint!("{}", stderr);
            }
        }
    }

    let failed = results.iter().filter(|r| !r.success).count();
    if failed > 0 {
        bail!("{} of {} command(s) failed", failed, results.len());
    }

    Ok(())
}

fn build_options(mut options: ExecutionOptions, args: &RunArgs) -> ExecutionOptions {
    if let Some(shell) = &args.shell {
        options = options.with_shell(shell);
    }
    if let Some(cwd) = &args.cwd {
        options = options.with_cwd(cwd);
    }
    for (key, value) in &args.env {
        options = options.with_env(key, value);
    }
    if args.no_stdin {
        options = options.with_stdin(StdinMode::Null);
    }

    if args.quiet {
        options = options
            .with_stdout(Redirect::Null)
            .with_stderr(Redirect::Null);
    } else if args.capture || args.json {
        options = options
            .with_stdout(Redirect::Capture)
            .with_stderr(Redirect::Capture);
    }

    if let Some(path) = &args.output {
        options = options.with_stdout(Redirect::File(path.clone()));
    }

    options
}

/// Shape follows the flags; a mismatch is left for the runner to reject
fn build_spec(args: &RunArgs) -> CommandSpec {
    if args.multi {
        return CommandSpec::Sequence(args.commands.iter().map(Invocation::shell).collect());
    }

    if args.argv {
        return CommandSpec::Single(Invocation::argv(&args.commands));
    }

    match args.commands.as_slice() {
        [line] => CommandSpec::Single(Invocation::shell(line)),
        lines => CommandSpec::Sequence(lines.iter().map(Invocation::shell).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;
    use std::path::PathBuf;

    fn run_args(argv: &[&str]) -> RunArgs {
        let cli = Cli::parse_from(std::iter::once("bootkit").chain(argv.iter().copied()));
        match cli.command {
            Some(Command::Run(args)) => args,
            _ => panic!("expected run subcommand"),
        }
    }

    #[test]
    fn one_line_is_a_single_shell_invocation() {
        let args = run_args(&["run", "echo hi"]);
        assert_eq!(
            build_spec(&args),
            CommandSpec::Single(Invocation::shell("echo hi"))
        );
    }

    #[test]
    fn multi_builds_a_sequence_even_for_one_line() {
        let args = run_args(&["run", "--multi", "true"]);
        assert_eq!(
            build_spec(&args),
            CommandSpec::Sequence(vec![Invocation::shell("true")])
        );
    }

    #[test]
    fn argv_builds_one_invocation_from_all_arguments() {
        let args = run_args(&["run", "--argv", "ls", "-la"]);
        assert_eq!(
            build_spec(&args),
            CommandSpec::Single(Invocation::argv(["ls", "-la"]))
        );
    }

    #[test]
    fn several_lines_without_multi_become_a_sequence() {
        let args = run_args(&["run", "true", "false"]);
        assert!(matches!(build_spec(&args), CommandSpec::Sequence(ref v) if v.len() == 2));
    }

    #[test]
    fn options_follow_flags() {
        let args = run_args(&[
            "run",
            "--shell",
            "/bin/bash",
            "--cwd",
            "/tmp",
            "-e",
            "A=1",
            "--capture",
            "--output",
            "/tmp/out.log",
            "true",
        ]);
        let options = build_options(ExecutionOptions::default(), &args);

        assert_eq!(options.shell, PathBuf::from("/bin/bash"));
        assert_eq!(options.cwd, Some(PathBuf::from("/tmp")));
        assert_eq!(options.env.get("A").map(String::as_str), Some("1"));
        assert_eq!(options.stdout, Redirect::File(PathBuf::from("/tmp/out.log")));
        assert_eq!(options.stderr, Redirect::Capture);
    }

    #[test]
    fn quiet_discards_output() {
        let args = run_args(&["run", "--quiet", "true"]);
        let options = build_options(ExecutionOptions::default(), &args);

        assert_eq!(options.stdout, Redirect::Null);
        assert_eq!(options.stderr, Redirect::Null);
    }

    #[test]
    fn no_stdin_detaches_input() {
        let args = run_args(&["run", "--no-stdin", "true"]);
        let options = build_options(ExecutionOptions::default(), &args);

        assert_eq!(options.stdin, StdinMode::Null);
        assert_eq!(options.stdout, Redirect::Inherit);
    }
}
