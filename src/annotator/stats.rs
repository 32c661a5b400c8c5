use similar::{ChangeTag, TextDiff};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiffStats {
    pub added: usize,
    pub removed: usize,
}

impl DiffStats {
    pub fn is_empty(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

/// Count inserted and deleted lines with a real line diff.
///
/// Unlike the change set, a line inserted near the top does not make every
/// line below it count as changed.
pub fn summarize(previous: &str, current: &str) -> DiffStats {
    let diff = TextDiff::from_lines(previous, current);
    let mut stats = DiffStats::default();

    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => stats.added += 1,
            ChangeTag::Delete => stats.removed += 1,
            ChangeTag::Equal => {}
        }
    }

    stats
}
