use crate::backend::project_backend::Project;
use egui::{Context, RichText, ScrollArea};

#[derive(Debug)]
pub enum ProjectsAction {
    Open(String),
    Delete(String),
}

/// Gallery of saved sketches
#[derive(Default)]
pub struct ProjectsWindow {
    open: bool,
    projects: Vec<Project>,
    pending_action: Option<ProjectsAction>,
}

impl ProjectsWindow {
    pub fn open(&mut self, projects: Vec<Project>) {
        self.projects = projects;
        self.open = true;
    }

    pub fn set_projects(&mut self, projects: Vec<Project>) {
        self.projects = projects;
    }

    pub fn take_pending_action(&mut self) -> Option<ProjectsAction> {
        self.pending_action.take()
    }

    pub fn show(&mut self, ctx: &Context, current_id: &str) {
        if !self.open {
            return;
        }

        let mut open = self.open;
        egui::Window::new("My Sketches")
            .open(&mut open)
            .resizable(true)
            .collapsible(false)
            .default_width(360.0)
            .show(ctx, |ui| {
                if self.projects.is_empty() {
                    ui.label("No saved sketches yet. Make something and it will be saved here!");
                    return;
                }

                ScrollArea::vertical().show(ui, |ui| {
                    for project in &self.projects {
                        ui.horizontal(|ui| {
                            let name = if project.id == current_id {
                                RichText::new(&project.name).strong()
                            } else {
                                RichText::new(&project.name)
                            };
                            ui.label(name);
                            ui.label(
                                RichText::new(
                                    project
                                        .updated_at
                                        .with_timezone(&chrono::Local)
                                        .format("%Y-%m-%d %H:%M")
                                        .to_string(),
                                )
                                .small()
                                .weak(),
                            );

                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui| {
                                    if ui.button("🗑").on_hover_text("Delete").clicked() {
                                        self.pending_action =
                                            Some(ProjectsAction::Delete(project.id.clone()));
                                    }
                                    if ui.button("Open").clicked() {
                                        self.pending_action =
                                            Some(ProjectsAction::Open(project.id.clone()));
                                    }
                                },
                            );
                        });
                    }
                });
            });

        if matches!(self.pending_action, Some(ProjectsAction::Open(_))) {
            open = false;
        }
        self.open = open;
    }
}
