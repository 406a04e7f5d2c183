use crate::executor::RunError;
use std::collections::BTreeMap;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

#[cfg(windows)]
const DEFAULT_SHELL: &str = "cmd.exe";
#[cfg(windows)]
const SHELL_COMMAND_FLAG: &str = "/C";

#[cfg(not(windows))]
const DEFAULT_SHELL: &str = "/bin/sh";
#[cfg(not(windows))]
const SHELL_COMMAND_FLAG: &str = "-c";

/// Where a child's output stream goes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Redirect {
    /// Share the parent's stream
    #[default]
    Inherit,

    /// Discard
    Null,

    /// Collect into the `CommandResult`
    Capture,

    /// Write to a file, truncated once per `run` call and shared by every
    /// invocation in it
    File(PathBuf),
}

impl Redirect {
    pub fn is_capture(&self) -> bool {
        matches!(self, Self::Capture)
    }

    fn file_path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            _ => None,
        }
    }
}

/// Output files opened for one `run` call.
///
/// Each child gets a duplicate of the same handle, so consecutive
/// invocations append after each other, and stdout/stderr pointing at the
/// same path share one file offset.
#[derive(Debug)]
pub(crate) struct OutputFiles {
    stdout: Option<File>,
    stderr: Option<File>,
}

impl OutputFiles {
    pub(crate) fn open(options: &ExecutionOptions) -> Result<Self, RunError> {
        let stdout = options.stdout.file_path().map(create_file).transpose()?;

        let stderr = match (options.stderr.file_path(), options.stdout.file_path(), &stdout) {
            (Some(err_path), Some(out_path), Some(out_file)) if err_path == out_path => {
                Some(out_file.try_clone().map_err(|source| RunError::Redirect {
                    path: err_path.to_path_buf(),
                    source,
                })?)
            }
            (Some(err_path), _, _) => Some(create_file(err_path)?),
            _ => None,
        };

        Ok(Self { stdout, stderr })
    }

    pub(crate) fn stdout(&self, redirect: &Redirect) -> io::Result<Stdio> {
        to_stdio(redirect, self.stdout.as_ref())
    }

    pub(crate) fn stderr(&self, redirect: &Redirect) -> io::Result<Stdio> {
        to_stdio(redirect, self.stderr.as_ref())
    }
}

fn create_file(path: &Path) -> Result<File, RunError> {
    File::create(path).map_err(|source| RunError::Redirect {
        path: path.to_path_buf(),
        source,
    })
}

fn to_stdio(redirect: &Redirect, file: Option<&File>) -> io::Result<Stdio> {
    Ok(match (redirect, file) {
        (Redirect::Inherit, _) => Stdio::inherit(),
        (Redirect::Null, _) => Stdio::null(),
        (Redirect::Capture, _) => Stdio::piped(),
        (Redirect::File(_), Some(file)) => Stdio::from(file.try_clone()?),
        (Redirect::File(path), None) => Stdio::from(File::options().append(true).open(path)?),
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StdinMode {
    #[default]
    Inherit,
    Null,
}

impl StdinMode {
    pub(crate) fn to_stdio(self) -> Stdio {
        match self {
            Self::Inherit => Stdio::inherit(),
            Self::Null => Stdio::null(),
        }
    }
}

/// Everything the runner may change about how a child is launched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOptions {
    /// Interpreter used for `Invocation::Shell` lines
    pub shell: PathBuf,

    /// Working directory; `None` keeps the parent's
    pub cwd: Option<PathBuf>,

    /// Variables set on top of the inherited environment
    pub env: BTreeMap<String, String>,

    pub stdin: StdinMode,
    pub stdout: Redirect,
    pub stderr: Redirect,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            shell: PathBuf::from(DEFAULT_SHELL),
            cwd: None,
            env: BTreeMap::new(),
            stdin: StdinMode::default(),
            stdout: Redirect::default(),
            stderr: Redirect::default(),
        }
    }
}

impl ExecutionOptions {
    /// Platform standard shell
    pub fn default_shell() -> PathBuf {
        PathBuf::from(DEFAULT_SHELL)
    }

    pub(crate) fn shell_command_flag() -> &'static str {
        SHELL_COMMAND_FLAG
    }

    pub fn with_shell(mut self, shell: impl Into<PathBuf>) -> Self {
        self.shell = shell.into();
        self
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn with_stdin(mut self, stdin: StdinMode) -> Self {
        self.stdin = stdin;
        self
    }

    pub fn with_stdout(mut self, stdout: Redirect) -> Self {
        self.stdout = stdout;
        self
    }

    pub fn with_stderr(mut self, stderr: Redirect) -> Self {
        self.stderr = stderr;
        self
    }

    /// True when output has to be collected after the child exits
    pub(crate) fn captures_output(&self) -> bool {
        self.stdout.is_capture() || self.stderr.is_capture()
    }
}
