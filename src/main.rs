// SPDX-FileCopyrightText: 2026 Sébastien Helleu <flashcode@flashtux.org>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Powrap ensures gettext files (*.po) are using the standard gettext format.
//!
//! The formatting itself is delegated to `msgcat`: each file is given to `msgcat` and
//! its output is compared with the file content. It can be used in CI jobs or
//! pre-commit hooks.
//!
//! # Files
//!
//! Files are given on command-line, or found with git (`--modified`: files added or
//! modified in the working tree), or found in a directory (`--all`: the .gitignore
//! rules are respected).
//!
//! # Fix files
//!
//! By default, files that are not in the standard format are rewritten in place.
//!
//! # Check files
//!
//! With `--check`, files are not written: the files that would be rewrapped are
//! reported on stderr. With `--diff` (which implies `--check`), a unified diff is
//! displayed for each of these files.
//!
//! # Exit code
//!
//! - 0: nothing to do
//! - 1: files would be rewrapped (or have been rewrapped)
//! - 127: error running `msgcat`, or a file could not be processed

mod args;
mod diff;
mod dir;
mod normalizer;
mod po;
mod processor;
mod progress;
mod resolve;
mod result;
mod vcs;

use clap::Parser;

use crate::args::Cli;
use crate::processor::run;

fn main() {
    let args = Cli::parse();
    let rc = run(&args);
    std::process::exit(rc);
}
