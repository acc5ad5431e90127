// SPDX-FileCopyrightText: 2026 Sébastien Helleu <flashcode@flashtux.org>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Progress of the files processed.

use std::path::Path;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Observer notified for each file processed; it has no effect on the result.
///
/// With parallel jobs, `file_done` is called from the worker threads.
pub trait Progress: Sync {
    /// Called once before processing, with the number of files.
    fn start(&self, _len: usize) {}

    /// Called once per file, after it has been normalized.
    fn file_done(&self, _path: &Path) {}

    /// Print a message without breaking the progress display.
    fn println(&self, message: &str) {
        eprintln!("{message}");
    }

    /// Called once all files have been processed.
    fn finish(&self) {}
}

/// No progress displayed (quiet mode).
pub struct NoProgress;

impl Progress for NoProgress {}

/// Progress bar displayed on stderr.
pub struct ProgressBarDisplay {
    bar: ProgressBar,
}

impl ProgressBarDisplay {
    pub fn new(message: &'static str) -> Self {
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        if let Ok(style) =
            ProgressStyle::with_template("{msg}: {percent:>3}% {wide_bar} {pos}/{len} [{elapsed}]")
        {
            bar.set_style(style);
        }
        bar.set_message(message);
        Self { bar }
    }
}

impl Progress for ProgressBarDisplay {
    fn start(&self, len: usize) {
        self.bar.set_length(len as u64);
    }

    fn file_done(&self, _path: &Path) {
        self.bar.inc(1);
    }

    fn println(&self, message: &str) {
        self.bar.suspend(|| eprintln!("{message}"));
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
