//! Change annotation for generated sketches.
//!
//! [`compute_change_set`] and [`compute_change_blocks`] are pure functions of
//! the previous and current program. [`HighlightController`] turns their
//! output into editor highlighting, block navigation and a timed auto-clear.

mod classify;
mod diff;
mod navigation;
mod stats;
mod types;

pub use classify::{BlockText, LabelTemplate, RULES, Rule, classify_block};
pub use diff::{compute_change_blocks, compute_change_set};
pub use navigation::{EditorCommand, HighlightController, NavigationState, ScrollAnchor};
pub use stats::{DiffStats, summarize};
pub use types::{BlockKind, ChangeBlock, ChangeSet, split_lines};
