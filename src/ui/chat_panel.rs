use crate::backend::project_backend::{Message, Role};
use crate::constant::STARTER_PROMPTS;
use egui::{Align, Color32, Frame, Key, Layout, RichText, ScrollArea, Ui};

const USER_BUBBLE: Color32 = Color32::from_rgb(37, 99, 235);
const ASSISTANT_BUBBLE: Color32 = Color32::from_rgb(55, 55, 60);

pub enum ChatAction {
    Send(String),
}

/// Chat transcript and the prompt box
#[derive(Default)]
pub struct ChatPanel {
    input: String,
}

impl ChatPanel {
    pub fn show(
        &mut self,
        ui: &mut Ui,
        messages: &[Message],
        is_generating: bool,
    ) -> Option<ChatAction> {
        let mut action = None;

        egui::TopBottomPanel::bottom("prompt_input").show_inside(ui, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                let can_send = !is_generating && !self.input.trim().is_empty();

                let send_clicked = ui
                    .add_enabled(can_send, egui::Button::new("Send"))
                    .clicked();

                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.input)
                        .hint_text("Ask me to make something!")
                        .desired_width(f32::INFINITY),
                );
                let enter_pressed =
                    response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));

                if can_send && (send_clicked || enter_pressed) {
                    action = Some(ChatAction::Send(self.input.trim().to_string()));
                    self.input.clear();
                    response.request_focus();
                }
            });
            ui.add_space(6.0);
        });

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                if messages.is_empty() {
                    ui.vertical_centered(|ui| {
                        ui.add_space(40.0);
                        ui.heading("What do you want to make?");
                        ui.label(RichText::new("Try saying:").small().weak());
                        for suggestion in STARTER_PROMPTS {
                            let label = format!("\u{201c}{}\u{201d}", suggestion);
                            let button = egui::Button::new(label);
                            if ui.add_enabled(!is_generating, button).clicked() {
                                action = Some(ChatAction::Send(suggestion.to_string()));
                            }
                        }
                    });
                }

                for message in messages {
                    show_bubble(ui, message);
                    ui.add_space(6.0);
                }

                if is_generating {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(RichText::new("Thinking...").weak());
                    });
                }
            });

        action
    }
}

fn show_bubble(ui: &mut Ui, message: &Message) {
    let (fill, layout) = match message.role {
        Role::User => (USER_BUBBLE, Layout::right_to_left(Align::Min)),
        Role::Assistant => (ASSISTANT_BUBBLE, Layout::left_to_right(Align::Min)),
    };

    ui.with_layout(layout, |ui| {
        let max_width = ui.available_width() * 0.85;
        Frame::new()
            .fill(fill)
            .corner_radius(10.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.set_max_width(max_width);
                ui.label(RichText::new(&message.content).color(Color32::WHITE));
                if message.code.is_some() {
                    ui.label(RichText::new("Code updated").small().color(Color32::LIGHT_GREEN));
                }
            });
    });
}
