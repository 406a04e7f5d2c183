use crate::executor::options::OutputFiles;
use crate::executor::{CommandSpec, ExecutionOptions, Invocation, RunError, UsageError};
use serde::Serialize;
use std::process::{Command, ExitStatus};

/// Outcome of one executed invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandResult {
    pub command: String,
    pub exit_code: i32,

    /// Whether the exit code met the caller's expectation
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
}

/// Launches invocations one at a time with a fixed set of options
#[derive(Debug, Clone)]
pub struct CommandRunner {
    options: ExecutionOptions,
    expect_success: bool,
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new(ExecutionOptions::default())
    }
}

impl CommandRunner {
    pub fn new(options: ExecutionOptions) -> Self {
        Self {
            options,
            expect_success: true,
        }
    }

    /// When false, any exit code counts as success
    pub fn expect_success(mut self, expect_success: bool) -> Self {
        self.expect_success = expect_success;
        self
    }

    /// Run `spec` and collect one result per invocation, in input order.
    ///
    /// `multi` must agree with the shape of `spec`: a `Single` requires
    /// `multi == false` and a `Sequence` requires `multi == true`. Every invocation
    /// is validated before the first child is spawned, so a usage error
    /// never leaves a batch half-executed. File redirects are opened once
    /// here and shared by every invocation. A launch failure stops the call;
    /// a non-zero exit is only recorded in the result.
    pub fn run(&self, spec: &CommandSpec, multi: bool) -> Result<Vec<CommandResult>, RunError> {
        let invocations = classify(spec, multi)?;
        let files = OutputFiles::open(&self.options)?;

        let mut results = Vec::with_capacity(invocations.len());
        for (index, invocation) in invocations.iter().enumerate() {
            results.push(self.run_one(index, invocation, &files)?);
        }

        Ok(results)
    }

    fn run_one(
        &self,
        index: usize,
        invocation: &Invocation,
        files: &OutputFiles,
    ) -> Result<CommandResult, RunError> {
        let command_line = invocation.to_string();
        let launch_error = |source| RunError::Launch {
            command: command_line.clone(),
            source,
        };
        let wait_error = |source| RunError::Wait {
            command: command_line.clone(),
            source,
        };

        log::debug!("Executing [{}]: {}", index, command_line);

        let mut command = self.build_command(index, invocation)?;
        command
            .stdin(self.options.stdin.to_stdio())
            .stdout(files.stdout(&self.options.stdout).map_err(launch_error)?)
            .stderr(files.stderr(&self.options.stderr).map_err(launch_error)?);

        let mut child = command.spawn().map_err(launch_error)?;

        let (status, stdout, stderr) = if self.options.captures_output() {
            let output = child.wait_with_output().map_err(wait_error)?;
            let stdout = self
                .options
                .stdout
                .is_capture()
                .then(|| String::from_utf8_lossy(&output.stdout).into_owned());
            let stderr = self
                .options
                .stderr
                .is_capture()
                .then(|| String::from_utf8_lossy(&output.stderr).into_owned());
            (output.status, stdout, stderr)
        } else {
            (child.wait().map_err(wait_error)?, None, None)
        };

        let exit_code = exit_code(status);
        let success = !self.expect_success || exit_code == 0;

        if !success {
            log::warn!("Command failed (exit {}): {}", exit_code, command_line);
        }

        Ok(CommandResult {
            command: command_line,
            exit_code,
            success,
            stdout,
            stderr,
        })
    }

    fn build_command(&self, index: usize, invocation: &Invocation) -> Result<Command, UsageError> {
        let mut command = match invocation {
            Invocation::Shell(line) => {
                let mut command = Command::new(&self.options.shell);
                command.arg(ExecutionOptions::shell_command_flag()).arg(line);
                command
            }
            Invocation::Argv(args) => {
                let (program, rest) = args
                    .split_first()
                    .ok_or(UsageError::EmptyInvocation { index })?;
                let mut command = Command::new(program);
                command.args(rest);
                command
            }
        };

        if let Some(cwd) = &self.options.cwd {
            command.current_dir(cwd);
        }
        command.envs(&self.options.env);

        Ok(command)
    }
}

/// Run `spec` once with the given expectation and options
pub fn run(
    spec: &CommandSpec,
    expect_success: bool,
    multi: bool,
    options: ExecutionOptions,
) -> Result<Vec<CommandResult>, RunError> {
    CommandRunner::new(options)
        .expect_success(expect_success)
        .run(spec, multi)
}

/// Match the shape against `multi` and flatten it to the invocations to launch
fn classify(spec: &CommandSpec, multi: bool) -> Result<&[Invocation], UsageError> {
    let invocations = match (spec, multi) {
        (CommandSpec::Single(invocation), false) => {
            log::debug!("Input is a single {}", invocation.kind());
            std::slice::from_ref(invocation)
        }
        (CommandSpec::Sequence(invocations), true) => {
            log::debug!("Input is a sequence of {} invocation(s)", invocations.len());
            invocations.as_slice()
        }
        (found, true) => {
            return Err(UsageError::ShapeMismatch {
                expected: "sequence",
                found: found.shape(),
            })
        }
        (found, false) => {
            return Err(UsageError::ShapeMismatch {
                expected: "single invocation",
                found: found.shape(),
            })
        }
    };

    if let Some(index) = invocations.iter().position(Invocation::is_empty) {
        return Err(UsageError::EmptyInvocation { index });
    }

    Ok(invocations)
}

fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    -1
}
