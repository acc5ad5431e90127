// SPDX-FileCopyrightText: 2026 Sébastien Helleu <flashcode@flashtux.org>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Resolution of the PO files to process.
//!
//! Files are either given on command line (and checked before anything is done),
//! reported as modified by git (`--modified`), or found in a directory (`--all`).

use std::{
    collections::HashSet,
    fs::File,
    io,
    path::{Path, PathBuf},
};

use path_absolutize::Absolutize;
use thiserror::Error;

use crate::{
    dir::find_po_files,
    vcs::{StatusSource, VcsError, modified_po_files},
};

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no PO file given (use files, --modified or --all)")]
    NoSelection,

    #[error("PO files, --modified and --all are mutually exclusive")]
    Conflict,

    #[error("file '{0}' does not exist")]
    NotFound(PathBuf),

    #[error("'{0}' is not a file")]
    NotAFile(PathBuf),

    #[error("'{0}': permission denied")]
    PermissionDenied(PathBuf),

    #[error("'{path}': {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Vcs(#[from] VcsError),
}

impl ResolveError {
    /// Return `true` if the error comes from invalid command-line arguments.
    pub fn is_usage(&self) -> bool {
        !matches!(self, ResolveError::Vcs(_))
    }

    /// Return `true` if the help must be displayed along with the error.
    pub fn needs_help(&self) -> bool {
        matches!(self, ResolveError::NoSelection | ResolveError::Conflict)
    }
}

/// How the files to process are selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSelection {
    /// Files given on command line.
    Explicit(Vec<PathBuf>),
    /// Files added or modified in the git working tree.
    Modified,
    /// All PO files in the directory.
    All,
}

impl FileSelection {
    /// Build the selection from command-line arguments; exactly one source is allowed.
    pub fn from_args(files: &[PathBuf], modified: bool, all: bool) -> Result<Self, ResolveError> {
        match (!files.is_empty(), modified, all) {
            (false, false, false) => Err(ResolveError::NoSelection),
            (true, false, false) => Ok(FileSelection::Explicit(files.to_vec())),
            (false, true, false) => Ok(FileSelection::Modified),
            (false, false, true) => Ok(FileSelection::All),
            _ => Err(ResolveError::Conflict),
        }
    }
}

/// Check that a path given on command line is an existing, readable, regular file.
pub fn validate_po_path(path: &Path) -> Result<(), ResolveError> {
    let metadata = match path.metadata() {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(ResolveError::NotFound(path.to_path_buf()));
        }
        Err(source) => {
            return Err(ResolveError::Unreadable {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    if !metadata.is_file() {
        return Err(ResolveError::NotAFile(path.to_path_buf()));
    }
    match File::open(path) {
        Ok(_) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
            Err(ResolveError::PermissionDenied(path.to_path_buf()))
        }
        Err(source) => Err(ResolveError::Unreadable {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Remove duplicate paths (`fr.po` and `./fr.po` are the same file), keeping the
/// first occurrence of each.
fn dedup_paths(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    paths
        .into_iter()
        .filter(|path| {
            let key = path
                .absolutize()
                .map_or_else(|_| path.clone(), std::borrow::Cow::into_owned);
            seen.insert(key)
        })
        .collect()
}

/// Return the ordered list of files to process.
///
/// The directory `root` is used to get the git status (`--modified`) and to find
/// files (`--all`); explicit files are relative to the current directory.
pub fn resolve(
    selection: &FileSelection,
    root: &Path,
    status: &dyn StatusSource,
) -> Result<Vec<PathBuf>, ResolveError> {
    let paths = match selection {
        FileSelection::Explicit(files) => {
            for path in files {
                validate_po_path(path)?;
            }
            files.clone()
        }
        FileSelection::Modified => modified_po_files(status, root)?,
        FileSelection::All => find_po_files(root),
    };
    Ok(dedup_paths(paths))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    struct FakeStatus(&'static str);

    impl StatusSource for FakeStatus {
        fn status(&self, _root: &Path) -> Result<String, VcsError> {
            Ok(self.0.to_string())
        }

        fn toplevel(&self, root: &Path) -> Result<PathBuf, VcsError> {
            Ok(root.to_path_buf())
        }
    }

    struct FailingStatus;

    impl StatusSource for FailingStatus {
        fn status(&self, root: &Path) -> Result<String, VcsError> {
            Err(VcsError::Status {
                path: root.to_path_buf(),
                stderr: "fatal: not a git repository".to_string(),
            })
        }

        fn toplevel(&self, root: &Path) -> Result<PathBuf, VcsError> {
            Ok(root.to_path_buf())
        }
    }

    #[test]
    fn selection_from_args() {
        let files = vec![PathBuf::from("fr.po")];
        assert!(matches!(
            FileSelection::from_args(&[], false, false),
            Err(ResolveError::NoSelection)
        ));
        assert_eq!(
            FileSelection::from_args(&files, false, false).unwrap(),
            FileSelection::Explicit(files.clone())
        );
        assert_eq!(
            FileSelection::from_args(&[], true, false).unwrap(),
            FileSelection::Modified
        );
        assert_eq!(
            FileSelection::from_args(&[], false, true).unwrap(),
            FileSelection::All
        );
        for (files, modified, all) in [
            (files.as_slice(), true, false),
            (files.as_slice(), false, true),
            (&[][..], true, true),
        ] {
            let err = FileSelection::from_args(files, modified, all).unwrap_err();
            assert!(matches!(err, ResolveError::Conflict));
            assert!(err.is_usage());
            assert!(err.needs_help());
        }
    }

    #[test]
    fn validate_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("non_existent_file.po");
        let err = validate_po_path(&path).unwrap_err();
        assert!(matches!(err, ResolveError::NotFound(_)));
        assert!(err.to_string().contains("non_existent_file.po"));
        assert!(err.is_usage());
        assert!(!err.needs_help());
    }

    #[test]
    fn validate_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = validate_po_path(dir.path()).unwrap_err();
        assert!(matches!(err, ResolveError::NotAFile(_)));
    }

    #[test]
    fn resolve_explicit_files() {
        let dir = tempfile::tempdir().unwrap();
        let fr = dir.path().join("fr.po");
        let de = dir.path().join("de.po");
        fs::write(&fr, "").unwrap();
        fs::write(&de, "").unwrap();
        let selection = FileSelection::Explicit(vec![
            fr.clone(),
            de.clone(),
            dir.path().join(".").join("fr.po"),
        ]);
        assert_eq!(
            resolve(&selection, Path::new("."), &FakeStatus("")).unwrap(),
            vec![fr, de]
        );
    }

    #[test]
    fn resolve_explicit_fails_before_processing() {
        let dir = tempfile::tempdir().unwrap();
        let fr = dir.path().join("fr.po");
        fs::write(&fr, "").unwrap();
        let selection = FileSelection::Explicit(vec![fr, dir.path().join("missing.po")]);
        let err = resolve(&selection, Path::new("."), &FakeStatus("")).unwrap_err();
        assert!(matches!(err, ResolveError::NotFound(path) if path.ends_with("missing.po")));
    }

    #[test]
    fn resolve_modified_files() {
        let selection = FileSelection::Modified;
        let status = FakeStatus(" M fr.po\0 D de.po\0?? es.po\0 M fr.po\0 M main.rs\0");
        assert_eq!(
            resolve(&selection, Path::new("/repo"), &status).unwrap(),
            vec![PathBuf::from("/repo/fr.po"), PathBuf::from("/repo/es.po")]
        );
        assert!(
            resolve(&selection, Path::new("/repo"), &FakeStatus(""))
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn resolve_modified_git_error() {
        let err = resolve(&FileSelection::Modified, Path::new("."), &FailingStatus).unwrap_err();
        assert!(matches!(err, ResolveError::Vcs(_)));
        assert!(!err.is_usage());
    }

    #[test]
    fn resolve_all_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("fr.po"), "").unwrap();
        fs::write(dir.path().join("de.po"), "").unwrap();
        assert_eq!(
            resolve(&FileSelection::All, dir.path(), &FakeStatus("")).unwrap(),
            vec![dir.path().join("de.po"), dir.path().join("fr.po")]
        );
    }
}
