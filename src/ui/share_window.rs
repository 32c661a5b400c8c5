use egui::{Context, RichText};

pub enum ShareAction {
    /// Import a sketch from a share code
    Import(String),
}

/// Shows the share code of the current sketch and accepts one to import
#[derive(Default)]
pub struct ShareWindow {
    open: bool,
    share_code: String,
    import_code: String,
    error: Option<String>,
}

impl ShareWindow {
    pub fn open(&mut self, share_code: String) {
        self.share_code = share_code;
        self.error = None;
        self.open = true;
    }

    pub fn set_error(&mut self, error: String) {
        self.error = Some(error);
    }

    pub fn close(&mut self) {
        self.open = false;
        self.import_code.clear();
        self.error = None;
    }

    pub fn show(&mut self, ctx: &Context) -> Option<ShareAction> {
        if !self.open {
            return None;
        }

        let mut action = None;
        let mut open = self.open;
        egui::Window::new("Share")
            .open(&mut open)
            .collapsible(false)
            .default_width(420.0)
            .show(ctx, |ui| {
                ui.label("Send this code to a friend so they can open your sketch:");
                ui.horizontal(|ui| {
                    let mut code = self.share_code.as_str();
                    ui.add(
                        egui::TextEdit::singleline(&mut code)
                            .code_editor()
                            .desired_width(300.0),
                    );
                    if ui.button("Copy").clicked() {
                        ui.ctx().copy_text(self.share_code.clone());
                    }
                });

                ui.separator();
                ui.label("Got a code from someone? Paste it here:");
                ui.horizontal(|ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut self.import_code)
                            .code_editor()
                            .desired_width(300.0),
                    );
                    let can_import = !self.import_code.trim().is_empty();
                    if ui
                        .add_enabled(can_import, egui::Button::new("Open"))
                        .clicked()
                    {
                        action = Some(ShareAction::Import(self.import_code.trim().to_string()));
                    }
                });

                if let Some(error) = &self.error {
                    ui.label(RichText::new(error).color(egui::Color32::LIGHT_RED));
                }
            });

        self.open = open;
        action
    }
}
