// SPDX-FileCopyrightText: 2026 Sébastien Helleu <flashcode@flashtux.org>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::normalizer::{DEFAULT_MSGCAT, DEFAULT_WIDTH, WrapOptions};

#[derive(Debug, Parser)]
#[command(
    author,
    name = "powrap",
    about = "Ensure PO files are using the standard gettext format.",
    after_help = "Exit code:
    0: nothing to do
    1: would rewrap (or files were rewrapped)
  127: error running msgcat, or a file could not be processed"
)]
#[command(version)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// List of PO files
    pub po_files: Vec<PathBuf>,

    /// Use git to find modified files instead of passing them as arguments
    #[arg(short, long)]
    pub modified: bool,

    /// Process all PO files found in the directory given by -C (.gitignore rules are respected)
    #[arg(short, long)]
    pub all: bool,

    /// Directory of the git repository (used with --modified and --all)
    #[arg(short = 'C', value_name = "DIR", default_value = ".")]
    pub git_root: PathBuf,

    /// Do not show the progress bar
    #[arg(short, long)]
    pub quiet: bool,

    /// Don't write the files back, just output a diff for each file on stderr (implies --check)
    #[arg(short, long)]
    pub diff: bool,

    /// Don't write the files back, just return the status: 0 means nothing would change,
    /// 1 means some files would be rewrapped
    #[arg(long)]
    pub check: bool,

    /// Do not wrap long lines (see `man msgcat`)
    #[arg(long)]
    pub no_wrap: bool,

    /// Wrap column used by msgcat
    #[arg(short, long, value_name = "N", default_value_t = DEFAULT_WIDTH)]
    pub width: usize,

    /// Program used to normalize PO files
    #[arg(long, value_name = "PROGRAM", default_value = DEFAULT_MSGCAT)]
    pub msgcat: PathBuf,

    /// Number of files normalized in parallel
    #[arg(short, long, value_name = "N", default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: u16,

    /// Output format of the final report
    #[arg(short, long, value_enum, default_value_t)]
    pub output: OutputFormat,
}

impl Cli {
    /// Return `true` if files must not be written (`--check` or `--diff`).
    pub fn check_only(&self) -> bool {
        self.check || self.diff
    }

    /// Return the wrap options given to the normalizer.
    pub fn wrap_options(&self) -> WrapOptions {
        if self.no_wrap {
            WrapOptions::no_wrap()
        } else {
            WrapOptions::with_width(self.width)
        }
    }
}

/// Output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    /// Human readable text format
    Human,

    /// JSON
    Json,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_defaults() {
        let cli = Cli::parse_from(["powrap", "fr.po"]);
        assert_eq!(cli.po_files, vec![PathBuf::from("fr.po")]);
        assert!(!cli.modified);
        assert!(!cli.check_only());
        assert_eq!(cli.git_root, PathBuf::from("."));
        assert_eq!(cli.msgcat, PathBuf::from("msgcat"));
        assert_eq!(cli.jobs, 1);
        assert_eq!(cli.output, OutputFormat::Human);
        assert_eq!(cli.wrap_options(), WrapOptions::with_width(80));
    }

    #[test]
    fn diff_implies_check() {
        let cli = Cli::parse_from(["powrap", "--diff", "fr.po"]);
        assert!(cli.check_only());
        let cli = Cli::parse_from(["powrap", "-d", "fr.po"]);
        assert!(cli.check_only());
    }

    #[test]
    fn no_wrap_overrides_width() {
        let cli = Cli::parse_from(["powrap", "--no-wrap", "--width", "60", "fr.po"]);
        assert_eq!(cli.wrap_options(), WrapOptions::no_wrap());
        let cli = Cli::parse_from(["powrap", "-w", "60", "fr.po"]);
        assert_eq!(cli.wrap_options(), WrapOptions::with_width(60));
    }

    #[test]
    fn zero_jobs_rejected() {
        assert!(Cli::try_parse_from(["powrap", "-j", "0", "fr.po"]).is_err());
    }
}
