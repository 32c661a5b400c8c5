use super::diff::{compute_change_blocks, compute_change_set};
use super::types::{ChangeBlock, ChangeSet, split_lines};
use crate::config::Settings;
use crate::constant::{DEFAULT_HIGHLIGHT_TIMEOUT_SECS, DEFAULT_SCROLL_MARGIN_LINES};
use std::time::{Duration, Instant};
use xxhash_rust::xxh64::xxh64;

/// Highlight and focus state of one diff cycle.
///
/// Updated only through the consuming methods below, each returning the next
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigationState {
    pub active_block_index: usize,
    pub highlight_visible: bool,
    pub expires_at: Option<Instant>,
}

impl NavigationState {
    pub fn idle() -> Self {
        Self::default()
    }

    /// A fresh cycle: first block active, highlights shown until `now + timeout`.
    pub fn begin(now: Instant, timeout: Duration) -> Self {
        Self {
            active_block_index: 0,
            highlight_visible: true,
            expires_at: Some(now + timeout),
        }
    }

    /// Move focus to `index`, or `None` when it is not a valid block index.
    pub fn with_active(self, index: usize, block_count: usize) -> Option<Self> {
        (index < block_count).then_some(Self {
            active_block_index: index,
            ..self
        })
    }

    pub fn cleared(self) -> Self {
        Self::idle()
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAnchor {
    Center,
}

/// What the editor view has to do to reflect the controller state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorCommand {
    /// Highlight exactly these lines, replacing any previous highlight.
    Decorate(ChangeSet),
    ClearDecorations,
    /// Bring `line` into view at `anchor`, keeping `margin` lines around it.
    ScrollTo {
        line: usize,
        anchor: ScrollAnchor,
        margin: usize,
    },
}

/// The single scheduled auto-clear of a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AutoClear {
    cycle: u64,
    deadline: Instant,
}

/// Owns the highlight state of a code view and the auto-clear task.
///
/// The view feeds it `(previous, current)` pairs and the current time, then
/// drains [`EditorCommand`]s with [`take_commands`](Self::take_commands).
pub struct HighlightController {
    timeout: Duration,
    scroll_margin: usize,
    state: NavigationState,
    blocks: Vec<ChangeBlock>,
    changed: ChangeSet,
    auto_clear: Option<AutoClear>,
    cycle: u64,
    fingerprint: Option<u64>,
    commands: Vec<EditorCommand>,
}

impl Default for HighlightController {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(DEFAULT_HIGHLIGHT_TIMEOUT_SECS),
            DEFAULT_SCROLL_MARGIN_LINES,
        )
    }
}

impl HighlightController {
    pub fn new(timeout: Duration, scroll_margin: usize) -> Self {
        Self {
            timeout,
            scroll_margin,
            state: NavigationState::idle(),
            blocks: Vec::new(),
            changed: ChangeSet::new(),
            auto_clear: None,
            cycle: 0,
            fingerprint: None,
            commands: Vec::new(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            Duration::from_secs(settings.highlight_timeout_secs),
            settings.scroll_margin_lines,
        )
    }

    /// Start a diff cycle for a freshly generated program.
    ///
    /// Returns `true` when a new highlight was entered. Re-submitting the pair
    /// that is already highlighted changes nothing.
    pub fn start_cycle(&mut self, previous: &str, current: &str, now: Instant) -> bool {
        let fingerprint = xxh64(current.as_bytes(), xxh64(previous.as_bytes(), 0));
        if self.state.highlight_visible && self.fingerprint == Some(fingerprint) {
            return false;
        }

        // Cancel before anything else so a stale deadline can never clear the
        // highlight entered below.
        self.auto_clear = None;

        let changed = if previous == current {
            ChangeSet::new()
        } else {
            compute_change_set(&split_lines(previous), &split_lines(current))
        };

        if changed.is_empty() {
            self.clear();
            return false;
        }

        self.cycle += 1;
        self.blocks = compute_change_blocks(&split_lines(previous), &split_lines(current));
        self.changed = changed;
        self.fingerprint = Some(fingerprint);
        self.state = NavigationState::begin(now, self.timeout);
        self.auto_clear = self.state.expires_at.map(|deadline| AutoClear {
            cycle: self.cycle,
            deadline,
        });

        tracing::debug!(
            "Highlighting {} changed lines in {} blocks",
            self.changed.len(),
            self.blocks.len()
        );
        self.commands.push(EditorCommand::Decorate(self.changed.clone()));
        self.push_scroll();
        true
    }

    /// Focus block `index`. Out-of-range indices are ignored.
    pub fn navigate(&mut self, index: usize) {
        if let Some(next) = self.state.with_active(index, self.blocks.len()) {
            self.state = next;
            self.push_scroll();
        }
    }

    pub fn next_block(&mut self) {
        self.navigate(self.state.active_block_index.saturating_add(1));
    }

    pub fn previous_block(&mut self) {
        if let Some(index) = self.state.active_block_index.checked_sub(1) {
            self.navigate(index);
        }
    }

    /// Drop the highlight and the pending auto-clear right away.
    pub fn dismiss(&mut self) {
        self.auto_clear = None;
        self.clear();
    }

    /// Fire the auto-clear if its deadline has passed. Returns `true` if the
    /// highlight was cleared by this call.
    pub fn tick(&mut self, now: Instant) -> bool {
        let due = self
            .auto_clear
            .is_some_and(|task| task.cycle == self.cycle && now >= task.deadline);
        if !due || !self.state.is_expired(now) {
            return false;
        }
        tracing::debug!("Highlight timed out");
        self.auto_clear = None;
        self.clear();
        true
    }

    pub fn take_commands(&mut self) -> Vec<EditorCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn blocks(&self) -> &[ChangeBlock] {
        &self.blocks
    }

    pub fn active_block_index(&self) -> usize {
        self.state.active_block_index
    }

    pub fn active_block(&self) -> Option<&ChangeBlock> {
        self.blocks.get(self.state.active_block_index)
    }

    pub fn highlight_visible(&self) -> bool {
        self.state.highlight_visible
    }

    pub fn state(&self) -> NavigationState {
        self.state
    }

    pub fn changed_lines(&self) -> &ChangeSet {
        &self.changed
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn changed_line_count(&self) -> usize {
        self.changed.len()
    }

    /// Deadline of the scheduled auto-clear, if one is pending.
    pub fn pending_deadline(&self) -> Option<Instant> {
        self.auto_clear.map(|task| task.deadline)
    }

    fn clear(&mut self) {
        if self.state.highlight_visible {
            self.commands.push(EditorCommand::ClearDecorations);
        }
        self.state = self.state.cleared();
        self.blocks.clear();
        self.changed.clear();
        self.fingerprint = None;
    }

    fn push_scroll(&mut self) {
        if let Some(block) = self.active_block() {
            let line = block.start_line;
            self.commands.push(EditorCommand::ScrollTo {
                line,
                anchor: ScrollAnchor::Center,
                margin: self.scroll_margin,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREVIOUS: &str = "function setup() {\n  createCanvas(400, 400);\n}\n";
    const CURRENT: &str =
        "function setup() {\n  createCanvas(400, 400);\n}\nlet score = 0;\nfunction draw() {\n  background(0);\n}";

    fn controller() -> HighlightController {
        HighlightController::new(Duration::from_secs(8), 3)
    }

    #[test]
    fn new_cycle_highlights_and_scrolls_to_first_block() {
        let mut ctl = controller();
        let now = Instant::now();

        assert!(ctl.start_cycle(PREVIOUS, CURRENT, now));
        assert!(ctl.highlight_visible());
        assert_eq!(ctl.active_block_index(), 0);
        assert_eq!(ctl.state().expires_at, Some(now + Duration::from_secs(8)));

        let commands = ctl.take_commands();
        assert_eq!(commands.len(), 2);
        assert!(matches!(&commands[0], EditorCommand::Decorate(lines) if lines.len() == 4));
        assert_eq!(
            commands[1],
            EditorCommand::ScrollTo {
                line: 3,
                anchor: ScrollAnchor::Center,
                margin: 3
            }
        );
    }

    #[test]
    fn identical_text_stays_idle() {
        let mut ctl = controller();
        assert!(!ctl.start_cycle(CURRENT, CURRENT, Instant::now()));
        assert!(!ctl.highlight_visible());
        assert!(ctl.take_commands().is_empty());
        assert!(ctl.pending_deadline().is_none());
    }

    #[test]
    fn resubmitting_same_pair_is_ignored() {
        let mut ctl = controller();
        let now = Instant::now();
        ctl.start_cycle(PREVIOUS, CURRENT, now);
        ctl.navigate(0);
        ctl.take_commands();

        assert!(!ctl.start_cycle(PREVIOUS, CURRENT, now + Duration::from_secs(1)));
        assert!(ctl.take_commands().is_empty());
        assert_eq!(ctl.pending_deadline(), Some(now + Duration::from_secs(8)));
    }

    #[test]
    fn out_of_range_navigation_is_a_no_op() {
        let mut ctl = controller();
        ctl.start_cycle("a\nb\nc\nd", "a\nX\nc\nY", Instant::now());
        ctl.take_commands();
        let before = ctl.state();

        ctl.navigate(2);
        ctl.navigate(usize::MAX);
        ctl.previous_block();

        assert_eq!(ctl.state(), before);
        assert!(ctl.take_commands().is_empty());
    }

    #[test]
    fn next_and_previous_walk_blocks_without_wrapping() {
        let mut ctl = controller();
        ctl.start_cycle("a\nb\nc\nd", "a\nX\nc\nY", Instant::now());
        ctl.take_commands();

        ctl.next_block();
        assert_eq!(ctl.active_block_index(), 1);
        assert_eq!(
            ctl.take_commands(),
            vec![EditorCommand::ScrollTo {
                line: 3,
                anchor: ScrollAnchor::Center,
                margin: 3
            }]
        );

        ctl.next_block();
        assert_eq!(ctl.active_block_index(), 1);
        ctl.previous_block();
        assert_eq!(ctl.active_block_index(), 0);
        assert!(ctl.highlight_visible());
    }

    #[test]
    fn dismiss_is_idempotent() {
        let mut ctl = controller();
        ctl.start_cycle(PREVIOUS, CURRENT, Instant::now());
        ctl.take_commands();

        ctl.dismiss();
        assert!(!ctl.highlight_visible());
        assert!(ctl.pending_deadline().is_none());
        assert_eq!(ctl.take_commands(), vec![EditorCommand::ClearDecorations]);

        ctl.dismiss();
        assert!(ctl.take_commands().is_empty());
        assert_eq!(ctl.block_count(), 0);
    }

    #[test]
    fn highlight_clears_after_timeout() {
        let mut ctl = controller();
        let now = Instant::now();
        ctl.start_cycle(PREVIOUS, CURRENT, now);
        ctl.take_commands();

        assert!(!ctl.tick(now + Duration::from_secs(7)));
        assert!(ctl.highlight_visible());

        assert!(ctl.tick(now + Duration::from_secs(8)));
        assert!(!ctl.highlight_visible());
        assert_eq!(ctl.take_commands(), vec![EditorCommand::ClearDecorations]);
        assert!(!ctl.tick(now + Duration::from_secs(9)));
    }

    #[test]
    fn new_cycle_replaces_pending_auto_clear() {
        let mut ctl = controller();
        let t0 = Instant::now();
        ctl.start_cycle(PREVIOUS, CURRENT, t0);

        let t1 = t0 + Duration::from_secs(5);
        let newer = format!("{CURRENT}\nlet gravity = 0.5;");
        assert!(ctl.start_cycle(CURRENT, &newer, t1));
        assert_eq!(ctl.pending_deadline(), Some(t1 + Duration::from_secs(8)));

        // The first cycle's deadline passes without touching the new highlight.
        assert!(!ctl.tick(t0 + Duration::from_secs(9)));
        assert!(ctl.highlight_visible());
        assert_eq!(ctl.blocks()[0].label, "Added gravity");

        assert!(ctl.tick(t1 + Duration::from_secs(8)));
        assert!(!ctl.highlight_visible());
    }

    #[test]
    fn superseding_with_unchanged_text_clears() {
        let mut ctl = controller();
        let now = Instant::now();
        ctl.start_cycle(PREVIOUS, CURRENT, now);
        ctl.take_commands();

        assert!(!ctl.start_cycle(CURRENT, CURRENT, now));
        assert!(!ctl.highlight_visible());
        assert!(ctl.pending_deadline().is_none());
        assert_eq!(ctl.take_commands(), vec![EditorCommand::ClearDecorations]);
    }
}
