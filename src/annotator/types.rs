use std::collections::BTreeSet;

/// Line indices of the current text that differ from the previous text.
pub type ChangeSet = BTreeSet<usize>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// The block starts past the end of the previous text.
    Added,
    /// The block starts on a line that existed but differed.
    Modified,
}

/// A maximal run of consecutive changed lines, `start_line..=end_line`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeBlock {
    pub start_line: usize,
    pub end_line: usize,
    pub kind: BlockKind,
    pub label: String,
}

impl ChangeBlock {
    pub fn contains(&self, line: usize) -> bool {
        (self.start_line..=self.end_line).contains(&line)
    }
}

/// Split a program into lines the way the editor numbers them.
///
/// The empty string is an empty program, not a program with one blank line.
pub fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        Vec::new()
    } else {
        text.split('\n').collect()
    }
}
