use egui::{Align, Layout, RichText, Ui};

pub enum TitleBarAction {
    NewProject,
    Save,
    Projects,
    Share,
    Export,
    Renamed,
}

pub struct TitleBarState<'a> {
    pub project_name: &'a mut String,
    pub status: Option<&'a str>,
    pub can_export: bool,
}

pub struct TitleBar;

impl TitleBar {
    pub fn show(ui: &mut Ui, state: TitleBarState<'_>) -> Option<TitleBarAction> {
        let TitleBarState {
            project_name,
            status,
            can_export,
        } = state;

        let mut action = None;

        ui.horizontal(|ui| {
            ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
                ui.label(RichText::new("✨ Sketch Studio").strong());
                ui.add_space(12.0);

                let response = ui.add(
                    egui::TextEdit::singleline(project_name)
                        .desired_width(200.0)
                        .hint_text("Name your sketch"),
                );
                if response.changed() {
                    action = Some(TitleBarAction::Renamed);
                }

                if let Some(status) = status {
                    ui.label(RichText::new(status).small().weak());
                }
            });

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.spacing_mut().item_spacing.x = 8.0;

                if ui
                    .add_enabled(can_export, egui::Button::new("🌐 Export"))
                    .on_hover_text("Save a web page that runs the sketch")
                    .clicked()
                {
                    action = Some(TitleBarAction::Export);
                }
                if ui.button("🔗 Share").clicked() {
                    action = Some(TitleBarAction::Share);
                }
                if ui.button("💾 Save").clicked() {
                    action = Some(TitleBarAction::Save);
                }
                if ui.button("📂 My Sketches").clicked() {
                    action = Some(TitleBarAction::Projects);
                }
                if ui.button("➕ New").clicked() {
                    action = Some(TitleBarAction::NewProject);
                }
            });
        });

        action
    }
}
