// SPDX-FileCopyrightText: 2026 Sébastien Helleu <flashcode@flashtux.org>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Modified files reported by git.

use std::{
    io,
    path::{Path, PathBuf},
    process::Command,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VcsError {
    #[error("could not run git: {0}")]
    Spawn(#[source] io::Error),

    #[error("git failed in {path}: {stderr}")]
    Status { path: PathBuf, stderr: String },
}

/// A source of working tree status records (`XY <path>`, NUL-terminated).
pub trait StatusSource {
    /// Return the raw status output for the working tree in `root`.
    fn status(&self, root: &Path) -> Result<String, VcsError>;

    /// Return the top level directory of the working tree containing `root`:
    /// paths in the status are relative to this directory.
    fn toplevel(&self, root: &Path) -> Result<PathBuf, VcsError>;
}

/// Status of the working tree given by `git status --porcelain -z --no-renames`.
pub struct GitStatus;

impl GitStatus {
    fn git(root: &Path, args: &[&str]) -> Result<Vec<u8>, VcsError> {
        let output = Command::new("git")
            .args(args)
            .current_dir(root)
            .output()
            .map_err(VcsError::Spawn)?;
        if !output.status.success() {
            return Err(VcsError::Status {
                path: root.to_path_buf(),
                stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
            });
        }
        Ok(output.stdout)
    }
}

impl StatusSource for GitStatus {
    fn status(&self, root: &Path) -> Result<String, VcsError> {
        let stdout = Self::git(root, &["status", "--porcelain", "-z", "--no-renames"])?;
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }

    fn toplevel(&self, root: &Path) -> Result<PathBuf, VcsError> {
        let stdout = Self::git(root, &["rev-parse", "--show-toplevel"])?;
        Ok(PathBuf::from(
            String::from_utf8_lossy(&stdout).trim_end_matches(['\n', '\r']),
        ))
    }
}

/// Return `true` if the status code means the file has been deleted, in the
/// index or in the working tree.
fn is_deleted(status: &str) -> bool {
    status.contains('D')
}

/// Parse the status output and return the PO files that are not deleted.
///
/// Each record is `XY <path>`: a two-letter status code, a space and the path,
/// which is not quoted (`-z` format).
pub fn parse_status(output: &str, extension: &str) -> Vec<PathBuf> {
    output
        .split('\0')
        .filter_map(|record| {
            let status = record.get(..2)?;
            let path = record.strip_prefix(status)?.strip_prefix(' ')?;
            if path.is_empty() || is_deleted(status) || !path.ends_with(extension) {
                return None;
            }
            Some(PathBuf::from(path))
        })
        .collect()
}

/// Return the modified PO files in the working tree containing `root`.
///
/// The paths are joined to the top level directory of the working tree.
pub fn modified_po_files(source: &dyn StatusSource, root: &Path) -> Result<Vec<PathBuf>, VcsError> {
    let output = source.status(root)?;
    let files = parse_status(&output, ".po");
    if files.is_empty() {
        return Ok(files);
    }
    let toplevel = source.toplevel(root)?;
    Ok(files
        .into_iter()
        .map(|path| {
            if toplevel == Path::new(".") {
                path
            } else {
                toplevel.join(path)
            }
        })
        .collect())
}
