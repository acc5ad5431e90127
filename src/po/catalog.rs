// SPDX-FileCopyrightText: 2026 Sébastien Helleu <flashcode@flashtux.org>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Content of a PO file, as read from disk.

use std::{
    borrow::Cow,
    fs::File,
    io::{self, Read},
    path::{Path, PathBuf},
};

use encoding_rs::Encoding;
use thiserror::Error;

use crate::po::header::detect_encoding;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("could not open file: {0}")]
    Open(#[source] io::Error),

    #[error("could not read file: {0}")]
    Read(#[source] io::Error),

    #[error("invalid {0} data")]
    Decode(&'static str),
}

#[derive(Debug)]
pub struct Catalog {
    pub path: PathBuf,
    pub encoding: &'static Encoding,
    pub data: Vec<u8>,
}

impl Catalog {
    /// Build a catalog from raw data, detecting its encoding from the PO header.
    pub fn from_bytes(path: &Path, data: Vec<u8>) -> Result<Self, ReadError> {
        let encoding = detect_encoding(&data);
        if encoding
            .decode_without_bom_handling_and_without_replacement(&data)
            .is_none()
        {
            return Err(ReadError::Decode(encoding.name()));
        }
        Ok(Self {
            path: PathBuf::from(path),
            encoding,
            data,
        })
    }

    /// Read the PO file and check that its content is valid for its declared encoding.
    pub fn read(path: &Path) -> Result<Self, ReadError> {
        let mut file = File::open(path).map_err(ReadError::Open)?;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf).map_err(ReadError::Read)?;
        Self::from_bytes(path, buf)
    }

    /// Decode data (the catalog or its normalized form) with the catalog encoding.
    pub fn decode<'a>(&self, data: &'a [u8]) -> Cow<'a, str> {
        self.encoding.decode_without_bom_handling(data).0
    }

    /// Return the decoded content of the catalog.
    pub fn text(&self) -> Cow<'_, str> {
        self.decode(&self.data)
    }
}
