// SPDX-FileCopyrightText: 2026 Sébastien Helleu <flashcode@flashtux.org>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Normalization of PO files by an external program (`msgcat`).
//!
//! The normalizer reads a whole catalog on its standard input and writes the
//! catalog in the canonical gettext format on its standard output.

use std::{
    io::{self, Write},
    path::PathBuf,
    process::{Command, Stdio},
};

use thiserror::Error;

/// Default program used to normalize PO files.
pub const DEFAULT_MSGCAT: &str = "msgcat";

/// Default wrap column.
pub const DEFAULT_WIDTH: usize = 80;

/// Wrapping of long lines; a width of 0 disables wrapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WrapOptions {
    pub width: usize,
}

impl Default for WrapOptions {
    fn default() -> Self {
        Self::with_width(DEFAULT_WIDTH)
    }
}

impl WrapOptions {
    pub fn with_width(width: usize) -> Self {
        Self { width }
    }

    pub fn no_wrap() -> Self {
        Self { width: 0 }
    }

    pub fn is_no_wrap(self) -> bool {
        self.width == 0
    }

    /// Return the `msgcat` options matching these wrap options.
    fn msgcat_args(self) -> Vec<String> {
        if self.is_no_wrap() {
            vec!["--no-wrap".to_string()]
        } else {
            vec![format!("--width={}", self.width)]
        }
    }
}

#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The program can not be started at all: no file can be normalized.
    #[error("could not run {program}: {source}")]
    Missing {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The program rejected the input (malformed catalog).
    #[error("{program} failed: {stderr}")]
    Rejected { program: String, stderr: String },

    #[error("error while running {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },
}

impl NormalizeError {
    /// Return `true` if the error prevents any other file from being normalized.
    pub fn is_fatal(&self) -> bool {
        matches!(self, NormalizeError::Missing { .. })
    }
}

/// A service turning the content of a catalog into its canonical form.
pub trait Normalizer: Sync {
    /// Return the normalized content of `input`.
    fn normalize(&self, input: &[u8], options: WrapOptions) -> Result<Vec<u8>, NormalizeError>;
}

/// Normalizer running `msgcat` (or a compatible program) as a subprocess.
#[derive(Debug, Clone)]
pub struct Msgcat {
    program: PathBuf,
}

impl Default for Msgcat {
    fn default() -> Self {
        Self::new(DEFAULT_MSGCAT)
    }
}

impl Msgcat {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Return the command line run for the given options (used in messages).
    pub fn command_line(&self, options: WrapOptions) -> String {
        let mut args = vec![self.program.display().to_string()];
        args.extend(options.msgcat_args());
        args.extend(["-".to_string(), "-o".to_string(), "-".to_string()]);
        args.join(" ")
    }
}

impl Normalizer for Msgcat {
    fn normalize(&self, input: &[u8], options: WrapOptions) -> Result<Vec<u8>, NormalizeError> {
        let program = self.command_line(options);
        let mut child = Command::new(&self.program)
            .args(options.msgcat_args())
            .args(["-", "-o", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| NormalizeError::Missing {
                program: program.clone(),
                source,
            })?;
        let Some(mut stdin) = child.stdin.take() else {
            return Err(NormalizeError::Io {
                program,
                source: io::Error::other("stdin not captured"),
            });
        };
        // Feed stdin from another thread: msgcat may fill the stdout pipe
        // before having read all its input.
        let (written, output) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || stdin.write_all(input));
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            (written, output)
        });
        let output = output.map_err(|source| NormalizeError::Io {
            program: program.clone(),
            source,
        })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim_end().to_string();
            return Err(NormalizeError::Rejected {
                program,
                stderr: if stderr.is_empty() {
                    output.status.to_string()
                } else {
                    stderr
                },
            });
        }
        // A broken pipe is expected only when the program exits early with an error.
        written.map_err(|source| NormalizeError::Io { program, source })?;
        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_options() {
        assert_eq!(WrapOptions::default().width, 80);
        assert!(!WrapOptions::default().is_no_wrap());
        assert!(WrapOptions::no_wrap().is_no_wrap());
        assert!(WrapOptions::with_width(0).is_no_wrap());
        assert_eq!(WrapOptions::no_wrap().msgcat_args(), vec!["--no-wrap"]);
        assert_eq!(
            WrapOptions::with_width(60).msgcat_args(),
            vec!["--width=60"]
        );
    }

    #[test]
    fn test_command_line() {
        let msgcat = Msgcat::default();
        assert_eq!(
            msgcat.command_line(WrapOptions::default()),
            "msgcat --width=80 - -o -"
        );
        assert_eq!(
            Msgcat::new("/opt/gettext/bin/msgcat").command_line(WrapOptions::no_wrap()),
            "/opt/gettext/bin/msgcat --no-wrap - -o -"
        );
    }

    #[test]
    fn test_missing_program() {
        let msgcat = Msgcat::new("/nonexistent/powrap-test/msgcat");
        let err = msgcat
            .normalize(b"msgid \"\"\nmsgstr \"\"\n", WrapOptions::default())
            .unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(err, NormalizeError::Missing { .. }));
        assert!(err.to_string().starts_with("could not run /nonexistent/powrap-test/msgcat"));
    }

    #[cfg(unix)]
    #[test]
    fn test_program_rejecting_input() {
        // `false` ignores its arguments and exits with status 1.
        let err = Msgcat::new("false")
            .normalize(b"not a catalog\n", WrapOptions::default())
            .unwrap_err();
        assert!(!err.is_fatal());
        assert!(matches!(err, NormalizeError::Rejected { .. }));
    }
}
