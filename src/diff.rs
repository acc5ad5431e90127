// SPDX-FileCopyrightText: 2026 Sébastien Helleu <flashcode@flashtux.org>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Line-based unified diff, used to display what would be rewrapped.
//!
//! The shortest edit script is computed with the Myers algorithm, then the edits
//! are grouped in hunks surrounded by `context` unchanged lines.

use colored::Colorize;

/// Default number of unchanged lines displayed around changes.
pub const DEFAULT_CONTEXT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditKind {
    Equal,
    Delete,
    Insert,
}

/// An edit with the position of the line in the old and the new text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Edit {
    kind: EditKind,
    old: usize,
    new: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Context,
    Removed,
    Added,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Hunk<'a> {
    pub old_start: usize,
    pub old_len: usize,
    pub new_start: usize,
    pub new_len: usize,
    pub lines: Vec<(LineKind, &'a str)>,
}

#[derive(Debug)]
pub struct UnifiedDiff<'a> {
    pub old_label: String,
    pub new_label: String,
    pub hunks: Vec<Hunk<'a>>,
}

/// Compute the shortest edit script between `old` and `new`.
#[allow(
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::many_single_char_names
)]
fn myers<T: PartialEq>(old: &[T], new: &[T]) -> Vec<Edit> {
    let n = old.len() as isize;
    let m = new.len() as isize;
    let max = n + m;
    if max == 0 {
        return Vec::new();
    }
    let offset = max + 1;
    let idx = |k: isize| (k + offset) as usize;
    let mut v = vec![0_isize; (2 * max + 3) as usize];
    // Snapshot of v[-d-1..=d+1] taken before each round d.
    let mut trace: Vec<Vec<isize>> = Vec::new();
    'rounds: for d in 0..=max {
        trace.push(v[idx(-d - 1)..=idx(d + 1)].to_vec());
        for k in (-d..=d).step_by(2) {
            let mut x = if k == -d || (k != d && v[idx(k - 1)] < v[idx(k + 1)]) {
                v[idx(k + 1)]
            } else {
                v[idx(k - 1)] + 1
            };
            let mut y = x - k;
            while x < n && y < m && old[x as usize] == new[y as usize] {
                x += 1;
                y += 1;
            }
            v[idx(k)] = x;
            if x >= n && y >= m {
                break 'rounds;
            }
        }
    }

    let mut edits = Vec::with_capacity((n.max(m)) as usize);
    let (mut x, mut y) = (n, m);
    for (d, snapshot) in trace.iter().enumerate().rev() {
        let d = d as isize;
        let at = |k: isize| snapshot[(k + d + 1) as usize];
        let k = x - y;
        let prev_k = if k == -d || (k != d && at(k - 1) < at(k + 1)) {
            k + 1
        } else {
            k - 1
        };
        let prev_x = at(prev_k);
        let prev_y = prev_x - prev_k;
        while x > prev_x && y > prev_y {
            x -= 1;
            y -= 1;
            edits.push(Edit {
                kind: EditKind::Equal,
                old: x as usize,
                new: y as usize,
            });
        }
        if d > 0 {
            if x == prev_x {
                edits.push(Edit {
                    kind: EditKind::Insert,
                    old: x as usize,
                    new: prev_y as usize,
                });
            } else {
                edits.push(Edit {
                    kind: EditKind::Delete,
                    old: prev_x as usize,
                    new: y as usize,
                });
            }
        }
        x = prev_x;
        y = prev_y;
    }
    edits.reverse();
    edits
}

/// Group edits in hunks: ranges of edits with at most `context` unchanged lines
/// before the first change and after the last one.
fn group_hunks(edits: &[Edit], context: usize) -> Vec<std::ops::Range<usize>> {
    let is_change = |edit: &Edit| edit.kind != EditKind::Equal;
    let next_change = |from: usize| {
        edits[from..]
            .iter()
            .position(is_change)
            .map(|pos| pos + from)
    };
    let mut hunks = Vec::new();
    let mut pos = 0;
    while let Some(first) = next_change(pos) {
        let start = first.saturating_sub(context);
        let mut end = first + 1;
        while let Some(next) = next_change(end) {
            if next - end > 2 * context {
                break;
            }
            end = next + 1;
        }
        end = (end + context).min(edits.len());
        hunks.push(start..end);
        pos = end;
    }
    hunks
}

/// Compute the unified diff of `old` and `new` (lines keep their end of line).
pub fn unified_diff<'a>(
    old: &'a str,
    new: &'a str,
    old_label: &str,
    new_label: &str,
    context: usize,
) -> UnifiedDiff<'a> {
    let old_lines: Vec<&str> = old.split_inclusive('\n').collect();
    let new_lines: Vec<&str> = new.split_inclusive('\n').collect();
    let edits = myers(&old_lines, &new_lines);
    let hunks = group_hunks(&edits, context)
        .into_iter()
        .map(|range| {
            let edits = &edits[range];
            let mut hunk = Hunk {
                old_start: edits[0].old,
                old_len: 0,
                new_start: edits[0].new,
                new_len: 0,
                lines: Vec::with_capacity(edits.len()),
            };
            for edit in edits {
                match edit.kind {
                    EditKind::Equal => {
                        hunk.old_len += 1;
                        hunk.new_len += 1;
                        hunk.lines.push((LineKind::Context, old_lines[edit.old]));
                    }
                    EditKind::Delete => {
                        hunk.old_len += 1;
                        hunk.lines.push((LineKind::Removed, old_lines[edit.old]));
                    }
                    EditKind::Insert => {
                        hunk.new_len += 1;
                        hunk.lines.push((LineKind::Added, new_lines[edit.new]));
                    }
                }
            }
            hunk
        })
        .collect();
    UnifiedDiff {
        old_label: old_label.to_string(),
        new_label: new_label.to_string(),
        hunks,
    }
}

/// Format a range of lines for a hunk header (0-based `start`).
fn format_range(start: usize, len: usize) -> String {
    match len {
        0 => format!("{start},0"),
        1 => format!("{}", start + 1),
        _ => format!("{},{len}", start + 1),
    }
}

impl Hunk<'_> {
    fn header(&self) -> String {
        format!(
            "@@ -{} +{} @@",
            format_range(self.old_start, self.old_len),
            format_range(self.new_start, self.new_len),
        )
    }
}

impl UnifiedDiff<'_> {
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    /// Return the diff, with colors if `colors` is true (removed lines in red,
    /// added lines in green).
    pub fn render(&self, colors: bool) -> String {
        let mut out = String::new();
        if self.is_empty() {
            return out;
        }
        let paint = |s: String, kind: Option<LineKind>| -> String {
            if !colors {
                return s;
            }
            match kind {
                None => s.bold().to_string(),
                Some(LineKind::Removed) => s.red().to_string(),
                Some(LineKind::Added) => s.green().to_string(),
                Some(LineKind::Context) => s,
            }
        };
        out.push_str(&paint(format!("--- {}", self.old_label), None));
        out.push('\n');
        out.push_str(&paint(format!("+++ {}", self.new_label), None));
        out.push('\n');
        for hunk in &self.hunks {
            if colors {
                out.push_str(&hunk.header().cyan().to_string());
            } else {
                out.push_str(&hunk.header());
            }
            out.push('\n');
            for (kind, line) in &hunk.lines {
                let prefix = match kind {
                    LineKind::Context => ' ',
                    LineKind::Removed => '-',
                    LineKind::Added => '+',
                };
                let text = line.strip_suffix('\n').unwrap_or(line);
                out.push_str(&paint(format!("{prefix}{text}"), Some(*kind)));
                out.push('\n');
                if !line.ends_with('\n') {
                    out.push_str("\\ No newline at end of file\n");
                }
            }
        }
        out
    }

}

impl std::fmt::Display for UnifiedDiff<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.render(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diff(old: &str, new: &str) -> String {
        unified_diff(old, new, "a.po", "a.po", DEFAULT_CONTEXT).to_string()
    }

    #[test]
    fn diff_identical() {
        assert!(unified_diff("a\nb\n", "a\nb\n", "x", "x", 3).is_empty());
        assert_eq!(diff("a\nb\n", "a\nb\n"), "");
        assert_eq!(diff("", ""), "");
    }

    #[test]
    fn diff_single_change() {
        assert_eq!(
            diff("a\nb\nc\n", "a\nB\nc\n"),
            "--- a.po\n+++ a.po\n@@ -1,3 +1,3 @@\n a\n-b\n+B\n c\n"
        );
    }

    #[test]
    fn diff_rewrap() {
        let old = "msgid \"\"\n\"hello \"\n\"world\"\nmsgstr \"\"\n";
        let new = "msgid \"hello world\"\nmsgstr \"\"\n";
        assert_eq!(
            diff(old, new),
            "--- a.po\n+++ a.po\n\
             @@ -1,4 +1,2 @@\n\
             -msgid \"\"\n\
             -\"hello \"\n\
             -\"world\"\n\
             +msgid \"hello world\"\n \
             msgstr \"\"\n"
        );
    }

    #[test]
    fn diff_insert_into_empty() {
        assert_eq!(diff("", "a\n"), "--- a.po\n+++ a.po\n@@ -0,0 +1 @@\n+a\n");
        assert_eq!(diff("a\n", ""), "--- a.po\n+++ a.po\n@@ -1 +0,0 @@\n-a\n");
    }

    #[test]
    fn diff_missing_newline() {
        assert_eq!(
            diff("a\nb", "a\nb\n"),
            "--- a.po\n+++ a.po\n@@ -1,2 +1,2 @@\n a\n-b\n\\ No newline at end of file\n+b\n"
        );
    }

    #[test]
    fn diff_separate_hunks() {
        let old: String = (1..=20).map(|i| format!("{i}\n")).collect();
        let new: String = (1..=20)
            .map(|i| match i {
                2 => "two\n".to_string(),
                19 => "nineteen\n".to_string(),
                _ => format!("{i}\n"),
            })
            .collect();
        let result = unified_diff(&old, &new, "a.po", "a.po", DEFAULT_CONTEXT);
        assert_eq!(result.hunks.len(), 2);
        assert_eq!(result.hunks[0].header(), "@@ -1,5 +1,5 @@");
        assert_eq!(result.hunks[1].header(), "@@ -16,5 +16,5 @@");
    }

    #[test]
    fn diff_merged_hunks() {
        let old: String = (1..=12).map(|i| format!("{i}\n")).collect();
        let new: String = (1..=12)
            .map(|i| match i {
                3 => "three\n".to_string(),
                9 => "nine\n".to_string(),
                _ => format!("{i}\n"),
            })
            .collect();
        let result = unified_diff(&old, &new, "a.po", "a.po", DEFAULT_CONTEXT);
        assert_eq!(result.hunks.len(), 1);
        assert_eq!(result.hunks[0].header(), "@@ -1,12 +1,12 @@");
    }

    #[test]
    fn edit_script_is_minimal() {
        let old = ["a", "b", "c", "a", "b", "b", "a"];
        let new = ["c", "b", "a", "b", "a", "c"];
        let edits = myers(&old, &new);
        let changes = edits.iter().filter(|e| e.kind != EditKind::Equal).count();
        assert_eq!(changes, 5);
        let kept: Vec<&str> = edits
            .iter()
            .filter(|e| e.kind == EditKind::Equal)
            .map(|e| old[e.old])
            .collect();
        assert_eq!(kept.len(), 4);
    }

    #[test]
    fn render_without_colors() {
        let result = unified_diff("a\nb\n", "a\nB\n", "a.po", "a.po", DEFAULT_CONTEXT);
        let plain = result.render(false);
        assert!(!plain.contains('\x1b'));
        assert_eq!(plain, result.to_string());
    }
}
