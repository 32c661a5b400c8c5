use super::classify::classify_block;
use super::types::{BlockKind, ChangeBlock, ChangeSet};

/// Compare two programs line by line at equal indices.
///
/// Only indices of `current` are produced. A line past the end of `previous`
/// never equals anything, not even an empty line.
pub fn compute_change_set<P, C>(previous: &[P], current: &[C]) -> ChangeSet
where
    P: AsRef<str>,
    C: AsRef<str>,
{
    current
        .iter()
        .enumerate()
        .filter(|(i, line)| {
            previous
                .get(*i)
                .is_none_or(|old| old.as_ref() != line.as_ref())
        })
        .map(|(i, _)| i)
        .collect()
}

/// Group the change set into labeled blocks, ascending by start line.
pub fn compute_change_blocks<P, C>(previous: &[P], current: &[C]) -> Vec<ChangeBlock>
where
    P: AsRef<str>,
    C: AsRef<str>,
{
    let changed = compute_change_set(previous, current);
    let mut blocks = Vec::new();
    let mut open: Option<usize> = None;

    for i in 0..current.len() {
        if changed.contains(&i) {
            open.get_or_insert(i);
        } else if let Some(start) = open.take() {
            blocks.push(close_block(previous.len(), current, start, i - 1));
        }
    }

    if let Some(start) = open {
        blocks.push(close_block(previous.len(), current, start, current.len() - 1));
    }

    blocks
}

fn close_block<C: AsRef<str>>(
    previous_len: usize,
    current: &[C],
    start_line: usize,
    end_line: usize,
) -> ChangeBlock {
    let kind = if start_line >= previous_len {
        BlockKind::Added
    } else {
        BlockKind::Modified
    };

    ChangeBlock {
        start_line,
        end_line,
        kind,
        label: classify_block(&current[start_line..=end_line]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotator::types::split_lines;

    #[test]
    fn identical_text_has_no_changes() {
        let lines = ["function setup() {", "  createCanvas(400, 400);", "}"];
        assert!(compute_change_set(&lines, &lines).is_empty());
        assert!(compute_change_blocks(&lines, &lines).is_empty());
    }

    #[test]
    fn empty_current_has_no_changes() {
        let previous = ["a", "b"];
        let current: [&str; 0] = [];
        assert!(compute_change_set(&previous, &current).is_empty());
        assert!(compute_change_blocks(&previous, &current).is_empty());
    }

    #[test]
    fn appended_blank_line_counts_as_change() {
        let changed = compute_change_set(&split_lines("a"), &split_lines("a\n"));
        assert_eq!(changed.into_iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn shrinking_text_only_reports_current_indices() {
        let previous = ["a", "b", "c", "d"];
        let current = ["a", "x"];
        let changed = compute_change_set(&previous, &current);
        assert_eq!(changed.into_iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn separate_runs_become_separate_blocks() {
        let previous = ["a", "b", "c", "d", "e"];
        let current = ["a", "B", "C", "d", "E", "f"];
        let blocks = compute_change_blocks(&previous, &current);

        assert_eq!(blocks.len(), 2);
        assert_eq!((blocks[0].start_line, blocks[0].end_line), (1, 2));
        assert_eq!(blocks[0].kind, BlockKind::Modified);
        // Starts on an existing line, so the whole run is a modification.
        assert_eq!((blocks[1].start_line, blocks[1].end_line), (4, 5));
        assert_eq!(blocks[1].kind, BlockKind::Modified);
    }

    #[test]
    fn blocks_partition_the_change_set() {
        let previous = split_lines("let x = 0;\nlet y = 0;\n\nfunction draw() {\n}\n");
        let current = split_lines(
            "let x = 10;\nlet y = 0;\nlet speed = 2;\nfunction draw() {\n  x += speed;\n}\n// end",
        );
        let changed = compute_change_set(&previous, &current);
        let blocks = compute_change_blocks(&previous, &current);

        let mut covered = ChangeSet::new();
        for pair in blocks.windows(2) {
            assert!(pair[0].end_line + 1 < pair[1].start_line);
        }
        for block in &blocks {
            assert!(block.start_line <= block.end_line);
            for line in block.start_line..=block.end_line {
                assert!(covered.insert(line), "line {line} covered twice");
            }
        }
        assert_eq!(covered, changed);
    }

    #[test]
    fn trailing_block_closes_at_last_line() {
        let blocks = compute_change_blocks(&["a"], &["a", "b", "c"]);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].end_line, 2);
        assert_eq!(blocks[0].kind, BlockKind::Added);
    }
}
