// SPDX-FileCopyrightText: 2026 Sébastien Helleu <flashcode@flashtux.org>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Result of the files processed and exit code.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Serialize;

use crate::args;

/// Exit code when files are clean or there is nothing to do.
pub const EXIT_OK: i32 = 0;

/// Exit code for invalid command-line arguments.
pub const EXIT_USAGE: i32 = 1;

/// Exit code when files would be rewrapped (check) or have been rewrapped (fix).
pub const EXIT_REWRAP: i32 = 1;

/// Exit code for errors (normalizer not found, file not readable...).
pub const EXIT_ERROR: i32 = 127;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileStatus {
    /// Already in the canonical format.
    Clean,
    /// Not in the canonical format (check mode).
    NeedsRewrap,
    /// Rewritten in the canonical format (fix mode).
    Rewrapped,
    ReadError,
    NormalizerError,
    WriteError,
}

impl FileStatus {
    pub fn is_error(self) -> bool {
        matches!(
            self,
            FileStatus::ReadError | FileStatus::NormalizerError | FileStatus::WriteError
        )
    }

    pub fn is_rewrap(self) -> bool {
        matches!(self, FileStatus::NeedsRewrap | FileStatus::Rewrapped)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FileReport {
    pub fn new(path: &Path, status: FileStatus) -> Self {
        Self {
            path: PathBuf::from(path),
            status,
            message: None,
        }
    }

    pub fn with_message(mut self, message: String) -> Self {
        self.message = Some(message);
        self
    }
}

/// Counters of file statuses.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub files: usize,
    pub clean: usize,
    pub rewrap: usize,
    pub errors: usize,
}

impl Summary {
    pub fn new(reports: &[FileReport]) -> Self {
        let mut summary = Summary {
            files: reports.len(),
            ..Default::default()
        };
        for report in reports {
            if report.status.is_error() {
                summary.errors += 1;
            } else if report.status.is_rewrap() {
                summary.rewrap += 1;
            } else {
                summary.clean += 1;
            }
        }
        summary
    }

    /// Return the exit code: errors first, then files to rewrap.
    pub fn exit_code(&self) -> i32 {
        if self.errors > 0 {
            EXIT_ERROR
        } else if self.rewrap > 0 {
            EXIT_REWRAP
        } else {
            EXIT_OK
        }
    }

    /// Return the summary line displayed at the end (human format).
    pub fn message(&self, check_only: bool, elapsed: &Duration) -> String {
        let files = if self.files == 1 { "file" } else { "files" };
        if check_only {
            format!(
                "{} {files} checked: {} clean, {} would be rewrapped, {} errors [{elapsed:?}]",
                self.files, self.clean, self.rewrap, self.errors
            )
        } else {
            format!(
                "{} {files} processed: {} clean, {} rewrapped, {} errors [{elapsed:?}]",
                self.files, self.clean, self.rewrap, self.errors
            )
        }
    }
}

/// Display the result of the files processed and return the appropriate exit code.
pub fn display_result(reports: &[FileReport], args: &args::Cli, elapsed: &Duration) -> i32 {
    let summary = Summary::new(reports);
    match args.output {
        args::OutputFormat::Human => {
            if !args.quiet {
                eprintln!("{}", summary.message(args.check_only(), elapsed));
            }
        }
        args::OutputFormat::Json => {
            println!("{}", serde_json::to_string(reports).unwrap_or_default());
        }
    }
    summary.exit_code()
}
