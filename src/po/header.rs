// SPDX-FileCopyrightText: 2026 Sébastien Helleu <flashcode@flashtux.org>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Probe of the PO header (first entry of the file).

use encoding_rs::Encoding;
use memchr::memmem;

/// Return the lines of the first entry of the file (the header), stopping at the
/// first blank line that follows a non-blank one.
fn header_lines(data: &[u8]) -> impl Iterator<Item = &[u8]> {
    let mut started = false;
    let mut ended = false;
    data.split(|&b| b == b'\n')
        .map(<[u8]>::trim_ascii)
        .take_while(move |line| {
            if ended {
                return false;
            }
            if line.is_empty() {
                ended = started;
            } else {
                started = true;
            }
            !ended
        })
        .filter(|line| !line.is_empty())
}

/// Extract the charset declared in the `Content-Type` header, if any.
///
/// The search is performed on the raw (still escaped) header strings, so the value
/// ends on a blank, a `;`, a backslash (escaped `\n`) or a double quote.
pub fn declared_charset(data: &[u8]) -> Option<&[u8]> {
    let finder = memmem::Finder::new(b"charset=");
    for line in header_lines(data) {
        if line.starts_with(b"#") {
            continue;
        }
        if let Some(pos) = finder.find(line) {
            let value = &line[pos + 8..];
            let end = value
                .iter()
                .position(|&b| b.is_ascii_whitespace() || matches!(b, b';' | b'\\' | b'"'))
                .unwrap_or(value.len());
            if end > 0 {
                return Some(&value[..end]);
            }
        }
    }
    None
}

/// Return the encoding declared in the PO header, UTF-8 if it is missing or unknown.
pub fn detect_encoding(data: &[u8]) -> &'static Encoding {
    declared_charset(data)
        .and_then(Encoding::for_label)
        .unwrap_or(encoding_rs::UTF_8)
}
