// SPDX-FileCopyrightText: 2026 Sébastien Helleu <flashcode@flashtux.org>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Check or fix the wrapping of PO files.

use std::{
    env, fs,
    io::{self, IsTerminal},
    path::{Path, PathBuf},
    time::Instant,
};

use clap::CommandFactory;
use colored::Colorize;
use rayon::prelude::*;

use crate::{
    args::{self, Cli},
    diff::{DEFAULT_CONTEXT, unified_diff},
    normalizer::{Msgcat, NormalizeError, Normalizer, WrapOptions},
    po::catalog::Catalog,
    progress::{NoProgress, Progress, ProgressBarDisplay},
    resolve::{FileSelection, ResolveError, resolve},
    result::{EXIT_ERROR, EXIT_OK, EXIT_USAGE, FileReport, FileStatus, display_result},
    vcs::{GitStatus, StatusSource},
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Do not write files, only report the files that would be rewrapped.
    Check { diff: bool },
    /// Rewrite the files that are not in the canonical format.
    #[default]
    Fix,
}

/// A file read and normalized, ready to be compared or written.
enum Prepared {
    Normalized { catalog: Catalog, normalized: Vec<u8> },
    Failed(FileReport),
}

/// Read and normalize a file.
///
/// Only a fatal normalizer error (program not found) is returned as error; other
/// problems are reported on the file.
fn prepare(
    normalizer: &dyn Normalizer,
    options: WrapOptions,
    path: &Path,
) -> Result<Prepared, NormalizeError> {
    let catalog = match Catalog::read(path) {
        Ok(catalog) => catalog,
        Err(err) => {
            return Ok(Prepared::Failed(
                FileReport::new(path, FileStatus::ReadError).with_message(err.to_string()),
            ));
        }
    };
    match normalizer.normalize(&catalog.data, options) {
        Ok(normalized) => Ok(Prepared::Normalized {
            catalog,
            normalized,
        }),
        Err(err) if err.is_fatal() => Err(err),
        Err(err) => Ok(Prepared::Failed(
            FileReport::new(path, FileStatus::NormalizerError).with_message(err.to_string()),
        )),
    }
}

pub struct Processor<'n, 'p> {
    normalizer: &'n dyn Normalizer,
    progress: &'p dyn Progress,
    options: WrapOptions,
    mode: Mode,
    jobs: usize,
    colors: bool,
}

impl<'n, 'p> Processor<'n, 'p> {
    /// Create a new `Processor` using the given normalizer.
    pub fn new(normalizer: &'n dyn Normalizer) -> Self {
        Self {
            normalizer,
            progress: &NoProgress,
            options: WrapOptions::default(),
            mode: Mode::default(),
            jobs: 1,
            colors: false,
        }
    }

    /// Set the wrap options given to the normalizer.
    pub fn with_options(mut self, options: WrapOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the mode: check or fix.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the observer notified for each file processed.
    pub fn with_progress(mut self, progress: &'p dyn Progress) -> Self {
        self.progress = progress;
        self
    }

    /// Set the number of files normalized in parallel.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Display diffs with colors.
    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    fn error(&self, path: &Path, message: &str) {
        self.progress.println(&format!(
            "{}: {}: {message}",
            "Error".bright_red().bold(),
            path.display().to_string().white().bold(),
        ));
    }

    /// Compare the normalized content with the file, then report or write it.
    fn complete(&self, prepared: Prepared) -> FileReport {
        let (catalog, normalized) = match prepared {
            Prepared::Normalized {
                catalog,
                normalized,
            } => (catalog, normalized),
            Prepared::Failed(report) => {
                if let Some(message) = &report.message {
                    self.error(&report.path, message);
                }
                return report;
            }
        };
        if normalized == catalog.data {
            return FileReport::new(&catalog.path, FileStatus::Clean);
        }
        match self.mode {
            Mode::Check { diff } => {
                self.progress.println(&format!(
                    "Would rewrap: {}",
                    catalog.path.display().to_string().white().bold()
                ));
                if diff {
                    let label = catalog.path.display().to_string();
                    let (old, new) = (catalog.text(), catalog.decode(&normalized));
                    let rendered = unified_diff(&old, &new, &label, &label, DEFAULT_CONTEXT)
                        .render(self.colors);
                    self.progress.println(rendered.trim_end_matches('\n'));
                }
                FileReport::new(&catalog.path, FileStatus::NeedsRewrap)
            }
            Mode::Fix => match fs::write(&catalog.path, &normalized) {
                Ok(()) => FileReport::new(&catalog.path, FileStatus::Rewrapped),
                Err(err) => {
                    let message = format!("could not write file: {err}");
                    self.error(&catalog.path, &message);
                    FileReport::new(&catalog.path, FileStatus::WriteError).with_message(message)
                }
            },
        }
    }

    fn process_sequential(&self, paths: &[PathBuf]) -> Result<Vec<FileReport>, NormalizeError> {
        let mut reports = Vec::with_capacity(paths.len());
        for path in paths {
            let prepared = prepare(self.normalizer, self.options, path)?;
            reports.push(self.complete(prepared));
            self.progress.file_done(path);
        }
        Ok(reports)
    }

    /// Normalize files in a thread pool; files are then compared, written and
    /// reported sequentially, in the same order as in sequential mode.
    fn process_parallel(&self, paths: &[PathBuf]) -> Result<Vec<FileReport>, NormalizeError> {
        let pool = match rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
        {
            Ok(pool) => pool,
            Err(err) => {
                self.progress.println(&format!(
                    "{}: could not start {} jobs ({err}), files are processed sequentially",
                    "Warning".yellow(),
                    self.jobs,
                ));
                return self.process_sequential(paths);
            }
        };
        let (normalizer, options, progress) = (self.normalizer, self.options, self.progress);
        let prepared: Vec<Result<Prepared, NormalizeError>> = pool.install(|| {
            paths
                .par_iter()
                .map(|path| {
                    let prepared = prepare(normalizer, options, path);
                    progress.file_done(path);
                    prepared
                })
                .collect()
        });
        prepared
            .into_iter()
            .map(|prepared| Ok(self.complete(prepared?)))
            .collect()
    }

    /// Process all files, in order.
    ///
    /// The processing stops on the first fatal error (normalizer not found): no other
    /// file could be normalized.
    pub fn process(&self, paths: &[PathBuf]) -> Result<Vec<FileReport>, NormalizeError> {
        self.progress.start(paths.len());
        let result = if self.jobs > 1 && paths.len() > 1 {
            self.process_parallel(paths)
        } else {
            self.process_sequential(paths)
        };
        self.progress.finish();
        result
    }
}

/// Return `true` if diffs displayed on stderr can be colored.
fn stderr_colors() -> bool {
    io::stderr().is_terminal() && env::var_os("NO_COLOR").is_none_or(|value| value.is_empty())
}

/// Display an error that occurred while resolving files, and return the exit code.
fn display_resolve_error(err: &ResolveError) -> i32 {
    eprintln!("{}: {err}", "Error".bright_red().bold());
    if err.needs_help() {
        eprintln!("\n{}", Cli::command().render_help());
    }
    if err.is_usage() { EXIT_USAGE } else { EXIT_ERROR }
}

/// Resolve, check or fix files with the given normalizer and status source.
pub fn run_with(args: &Cli, normalizer: &dyn Normalizer, status: &dyn StatusSource) -> i32 {
    let start = Instant::now();
    let paths = match FileSelection::from_args(&args.po_files, args.modified, args.all)
        .and_then(|selection| resolve(&selection, &args.git_root, status))
    {
        Ok(paths) => paths,
        Err(err) => return display_resolve_error(&err),
    };
    if paths.is_empty() {
        match args.output {
            args::OutputFormat::Human => println!("Nothing to do, exiting."),
            args::OutputFormat::Json => println!("[]"),
        }
        return EXIT_OK;
    }
    let mode = if args.check_only() {
        Mode::Check { diff: args.diff }
    } else {
        Mode::Fix
    };
    let progress: Box<dyn Progress> = if args.quiet {
        Box::new(NoProgress)
    } else {
        Box::new(ProgressBarDisplay::new(match mode {
            Mode::Check { .. } => "Checking wrapping of PO files",
            Mode::Fix => "Fixing wrapping of PO files",
        }))
    };
    let processor = Processor::new(normalizer)
        .with_options(args.wrap_options())
        .with_mode(mode)
        .with_jobs(args.jobs.into())
        .with_colors(stderr_colors())
        .with_progress(progress.as_ref());
    match processor.process(&paths) {
        Ok(reports) => display_result(&reports, args, &start.elapsed()),
        Err(err) => {
            eprintln!("{}: {err}", "Error".bright_red().bold());
            EXIT_ERROR
        }
    }
}

/// Check or fix the files given on command line, using `msgcat` and git.
pub fn run(args: &Cli) -> i32 {
    run_with(args, &Msgcat::new(&args.msgcat), &GitStatus)
}
