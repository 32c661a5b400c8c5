use crate::annotator::{
    BlockKind, ChangeSet, DiffStats, EditorCommand, HighlightController, summarize,
};
use crate::config::Settings;
use egui::{Align, Color32, RichText, ScrollArea, TextStyle, Ui};
use std::time::Instant;

const CHANGED_LINE_BG: Color32 = Color32::from_rgb(27, 54, 36);
const ACTIVE_BLOCK_BG: Color32 = Color32::from_rgb(34, 82, 50);
const CHANGE_ACCENT: Color32 = Color32::from_rgb(34, 197, 94);

pub enum CodePanelAction {
    /// The kid typed into the code by hand
    CodeEdited,
}

/// Shows the sketch with its latest changes highlighted
pub struct CodePanel {
    highlight: HighlightController,
    decorated: ChangeSet,
    pending_scroll: Option<(usize, usize)>, // (line, margin)
    stats: DiffStats,
    editing: bool,
}

impl CodePanel {
    pub fn new(settings: &Settings) -> Self {
        Self {
            highlight: HighlightController::from_settings(settings),
            decorated: ChangeSet::new(),
            pending_scroll: None,
            stats: DiffStats::default(),
            editing: false,
        }
    }

    /// Highlight what a generation changed. A first program has nothing to
    /// compare against, so it is shown without highlights.
    pub fn show_changes(&mut self, previous: &str, current: &str) {
        if previous.is_empty() {
            self.reset();
            return;
        }
        if self.highlight.start_cycle(previous, current, Instant::now()) {
            self.stats = summarize(previous, current);
            self.editing = false;
        }
        self.apply_commands();
    }

    /// Forget all highlights, e.g. when another project is opened
    pub fn reset(&mut self) {
        self.highlight.dismiss();
        self.apply_commands();
        self.editing = false;
    }

    fn apply_commands(&mut self) {
        for command in self.highlight.take_commands() {
            match command {
                EditorCommand::Decorate(lines) => self.decorated = lines,
                EditorCommand::ClearDecorations => {
                    self.decorated.clear();
                    self.pending_scroll = None;
                    self.stats = DiffStats::default();
                }
                EditorCommand::ScrollTo { line, margin, .. } => {
                    self.pending_scroll = Some((line, margin));
                }
            }
        }
    }

    pub fn show(&mut self, ui: &mut Ui, code: &mut String) -> Option<CodePanelAction> {
        let now = Instant::now();
        self.highlight.tick(now);
        self.apply_commands();
        if let Some(deadline) = self.highlight.pending_deadline() {
            ui.ctx()
                .request_repaint_after(deadline.saturating_duration_since(now));
        }

        let mut action = None;

        self.show_header(ui, code);
        ui.separator();

        if code.is_empty() && !self.editing {
            ui.vertical_centered(|ui| {
                ui.add_space(80.0);
                ui.label(RichText::new("Your code will appear here").weak());
                ui.label(RichText::new("Ask the AI to create something!").small().weak());
            });
            return None;
        }

        if self.editing {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    let response = ui.add(
                        egui::TextEdit::multiline(code)
                            .code_editor()
                            .desired_width(f32::INFINITY)
                            .desired_rows(30),
                    );
                    if response.changed() {
                        // Highlighted line numbers no longer match the text
                        self.highlight.dismiss();
                        action = Some(CodePanelAction::CodeEdited);
                    }
                });
            self.apply_commands();
        } else {
            self.show_lines(ui, code);
        }

        action
    }

    fn show_header(&mut self, ui: &mut Ui, code: &str) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("sketch.js").monospace());

            if self.highlight.highlight_visible() {
                let changed = self.highlight.changed_line_count();
                let plural = if changed == 1 { "" } else { "s" };
                ui.label(
                    RichText::new(format!("{} line{} changed", changed, plural))
                        .color(CHANGE_ACCENT)
                        .small(),
                );
                if !self.stats.is_empty() {
                    ui.label(
                        RichText::new(format!("+{} -{}", self.stats.added, self.stats.removed))
                            .small()
                            .weak(),
                    );
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Copy").clicked() {
                    ui.ctx().copy_text(code.to_string());
                }

                let edit_label = if self.editing { "Done" } else { "Edit" };
                if ui.button(edit_label).clicked() {
                    self.editing = !self.editing;
                }

                if self.highlight.highlight_visible() {
                    if ui.button("Clear highlights").clicked() {
                        self.highlight.dismiss();
                    }
                    self.show_block_navigation(ui);
                }
            });
        });
        self.apply_commands();
    }

    /// Laid out right to left, so widgets are added last to first
    fn show_block_navigation(&mut self, ui: &mut Ui) {
        let count = self.highlight.block_count();
        let index = self.highlight.active_block_index();

        if ui
            .add_enabled(index + 1 < count, egui::Button::new("▶"))
            .on_hover_text("Next change")
            .clicked()
        {
            self.highlight.next_block();
        }

        if let Some(block) = self.highlight.active_block() {
            let marker = match block.kind {
                BlockKind::Added => "+",
                BlockKind::Modified => "~",
            };
            ui.label(
                RichText::new(format!("{}/{} {} {}", index + 1, count, marker, block.label))
                    .small(),
            );
        }

        if ui
            .add_enabled(index > 0, egui::Button::new("◀"))
            .on_hover_text("Previous change")
            .clicked()
        {
            self.highlight.previous_block();
        }
    }

    fn show_lines(&mut self, ui: &mut Ui, code: &str) {
        let active = self
            .highlight
            .active_block()
            .filter(|_| self.highlight.highlight_visible())
            .cloned();
        let row_height = ui.text_style_height(&TextStyle::Monospace);

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.spacing_mut().item_spacing.y = 0.0;

                for (i, line) in code.split('\n').enumerate() {
                    let fill = if active.as_ref().is_some_and(|block| block.contains(i)) {
                        ACTIVE_BLOCK_BG
                    } else if self.decorated.contains(&i) {
                        CHANGED_LINE_BG
                    } else {
                        Color32::TRANSPARENT
                    };

                    let response = egui::Frame::new()
                        .fill(fill)
                        .show(ui, |ui| {
                            ui.set_width(ui.available_width());
                            ui.horizontal(|ui| {
                                let gutter = RichText::new(format!("{:>4}", i + 1)).monospace();
                                if self.decorated.contains(&i) {
                                    ui.label(gutter.color(CHANGE_ACCENT));
                                } else {
                                    ui.label(gutter.weak());
                                }
                                ui.label(RichText::new(line).monospace());
                            });
                        })
                        .response;

                    if let Some((target, margin)) = self.pending_scroll
                        && target == i
                    {
                        let padding = egui::vec2(0.0, margin as f32 * row_height);
                        ui.scroll_to_rect(response.rect.expand2(padding), Some(Align::Center));
                        self.pending_scroll = None;
                    }
                }
            });
    }
}
