use crate::backend::ai_backend::{AiBackend, Generation, GenerationError, GenerationRequest};
use crate::backend::project_backend::{Message, Project, ProjectBackend};
use crate::config::Config;
use crate::constant::AUTOSAVE_DELAY_MS;
use crate::messages::ResponseMessage;
use crate::share;
use crate::style::configure_style;
use crate::ui::chat_panel::{ChatAction, ChatPanel};
use crate::ui::code_panel::{CodePanel, CodePanelAction};
use crate::ui::functions_panel::FunctionsPanel;
use crate::ui::projects_window::{ProjectsAction, ProjectsWindow};
use crate::ui::share_window::{ShareAction, ShareWindow};
use crate::ui::title_bar::{TitleBar, TitleBarAction, TitleBarState};
use chrono::{DateTime, Local, Utc};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::{Duration, Instant};

/// A prompt sent for one project, waiting on its reply
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingGeneration {
    request_id: u64,
    project_id: String,
    /// Code as it was when the prompt was sent
    previous_code: String,
}

/// Hand over the pending generation if the reply is the one it waits on.
/// Stale replies, from an abandoned request or another project, leave it in place.
fn claim_reply(
    pending: &mut Option<PendingGeneration>,
    request_id: u64,
    project_id: &str,
) -> Option<PendingGeneration> {
    pending.take_if(|p| p.request_id == request_id && p.project_id == project_id)
}

pub struct StudioApp {
    config: Config,
    project: Project,
    projects: Option<ProjectBackend>,
    ai: AiBackend,

    code_panel: CodePanel,
    chat_panel: ChatPanel,
    functions_panel: FunctionsPanel,
    projects_window: ProjectsWindow,
    share_window: ShareWindow,

    response_sender: Sender<ResponseMessage>,
    response_receiver: Receiver<ResponseMessage>,

    /// The generation the open project is waiting on
    pending_generation: Option<PendingGeneration>,
    next_request_id: u64,
    dirty_since: Option<Instant>,
    last_saved: Option<DateTime<Utc>>,
    status: Option<String>,
}

impl StudioApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = Config::default();
        configure_style(&cc.egui_ctx, &config.settings.theme);

        let projects = match ProjectBackend::new() {
            Ok(backend) => Some(backend),
            Err(e) => {
                tracing::error!("Project storage unavailable: {}", e);
                None
            }
        };

        let project = projects
            .as_ref()
            .and_then(|backend| Self::restore_current_project(backend))
            .unwrap_or_default();
        let last_saved = projects.as_ref().map(|_| project.updated_at);

        let (response_sender, response_receiver) = channel();

        Self {
            ai: AiBackend::from_config(&config.settings.generation),
            code_panel: CodePanel::new(&config.settings),
            config,
            project,
            projects,
            chat_panel: ChatPanel::default(),
            functions_panel: FunctionsPanel::default(),
            projects_window: ProjectsWindow::default(),
            share_window: ShareWindow::default(),
            response_sender,
            response_receiver,
            pending_generation: None,
            next_request_id: 0,
            dirty_since: None,
            last_saved,
            status: None,
        }
    }

    fn restore_current_project(backend: &ProjectBackend) -> Option<Project> {
        let id = match backend.current_id() {
            Ok(id) => id?,
            Err(e) => {
                tracing::warn!("Failed to read current project: {}", e);
                return None;
            }
        };

        match backend.load(&id) {
            Ok(project) => {
                tracing::info!("Restored project {}", id);
                Some(project)
            }
            Err(e) => {
                tracing::warn!("Failed to restore project {}: {}", id, e);
                None
            }
        }
    }

    fn mark_dirty(&mut self) {
        self.dirty_since = Some(Instant::now());
    }

    fn send_prompt(&mut self, prompt: String) {
        // History is what came before this prompt
        let request = GenerationRequest {
            history: self.project.conversation_history(),
            current_code: self.project.current_code.clone(),
            prompt: prompt.clone(),
        };

        self.project.messages.push(Message::user(prompt));
        self.next_request_id += 1;
        let pending = PendingGeneration {
            request_id: self.next_request_id,
            project_id: self.project.id.clone(),
            previous_code: self.project.current_code.clone(),
        };
        self.ai
            .generate(pending.request_id, request, self.response_sender.clone());
        self.pending_generation = Some(pending);
        self.mark_dirty();
    }

    fn is_generating(&self) -> bool {
        self.pending_generation.is_some()
    }

    fn on_generated(&mut self, request_id: u64, result: Result<Generation, GenerationError>) {
        let Some(pending) =
            claim_reply(&mut self.pending_generation, request_id, &self.project.id)
        else {
            tracing::info!("Dropping stale generation reply {}", request_id);
            return;
        };
        let previous = pending.previous_code;

        match result {
            Ok(generation) => {
                let code = (!generation.code.is_empty()).then(|| generation.code.clone());
                self.project
                    .messages
                    .push(Message::assistant(generation.explanation, code));

                if !generation.code.is_empty() {
                    self.project.current_code = generation.code;
                    self.code_panel
                        .show_changes(&previous, &self.project.current_code);
                }
            }
            Err(e) => {
                // The last good code stays in place
                self.project.messages.push(Message::assistant(
                    format!("Oops! Something went wrong: {}", e),
                    None,
                ));
            }
        }
        self.mark_dirty();
    }

    fn open_project(&mut self, project: Project) {
        self.project = project;
        self.code_panel.reset();
        // A reply still in flight belongs to the project being left
        self.pending_generation = None;
        self.dirty_since = None;
        self.last_saved = Some(self.project.updated_at);

        if let Some(backend) = &self.projects
            && let Err(e) = backend.set_current(&self.project.id)
        {
            tracing::warn!("Failed to remember current project: {}", e);
        }
        self.config.add_recent_project(&self.project.id);
    }

    fn save_in_background(&mut self) {
        self.dirty_since = None;
        let Some(backend) = self.projects.clone() else {
            return;
        };
        if !self.project.has_content() {
            return;
        }

        let mut project = self.project.clone();
        let sender = self.response_sender.clone();
        std::thread::spawn(move || {
            let result = backend
                .save(&mut project)
                .and_then(|_| backend.set_current(&project.id))
                .map(|_| (project.id.clone(), project.updated_at))
                .map_err(|e| e.to_string());
            let _ = sender.send(ResponseMessage::ProjectSaved(result));
        });
    }

    fn refresh_project_list(&mut self) -> Vec<Project> {
        let Some(backend) = &self.projects else {
            return Vec::new();
        };
        backend.list().unwrap_or_else(|e| {
            tracing::error!("Failed to list projects: {}", e);
            Vec::new()
        })
    }

    fn handle_responses(&mut self) {
        while let Ok(response) = self.response_receiver.try_recv() {
            match response {
                ResponseMessage::Generated { request_id, result } => {
                    self.on_generated(request_id, result)
                }
                ResponseMessage::ProjectSaved(Ok((id, saved_at))) => {
                    if id == self.project.id {
                        self.project.updated_at = saved_at;
                        self.last_saved = Some(saved_at);
                    }
                }
                ResponseMessage::ProjectSaved(Err(e)) => {
                    tracing::error!("Failed to save project: {}", e);
                    self.status = Some("Could not save!".to_string());
                }
            }
        }
    }

    fn handle_title_bar(&mut self, action: TitleBarAction) {
        match action {
            TitleBarAction::NewProject => {
                if self.dirty_since.is_some() {
                    self.save_in_background();
                }
                self.open_project(Project::new());
                self.last_saved = None;
            }
            TitleBarAction::Save => self.save_in_background(),
            TitleBarAction::Projects => {
                let projects = self.refresh_project_list();
                self.projects_window.open(projects);
            }
            TitleBarAction::Share => match share::encode(&self.project) {
                Ok(code) => self.share_window.open(code),
                Err(e) => tracing::error!("Failed to encode share code: {}", e),
            },
            TitleBarAction::Export => {
                let Some(backend) = &self.projects else {
                    return;
                };
                self.status = Some(match backend.export_html(&self.project) {
                    Ok(path) => format!("Exported to {}", path.display()),
                    Err(e) => {
                        tracing::error!("Export failed: {}", e);
                        "Export failed".to_string()
                    }
                });
            }
            TitleBarAction::Renamed => self.mark_dirty(),
        }
    }

    fn handle_projects_action(&mut self, action: ProjectsAction) {
        let Some(backend) = self.projects.clone() else {
            return;
        };

        match action {
            ProjectsAction::Open(id) => match backend.load(&id) {
                Ok(project) => {
                    if self.dirty_since.is_some() {
                        self.save_in_background();
                    }
                    self.open_project(project);
                }
                Err(e) => tracing::error!("Failed to open project {}: {}", id, e),
            },
            ProjectsAction::Delete(id) => {
                if let Err(e) = backend.delete(&id) {
                    tracing::error!("Failed to delete project {}: {}", id, e);
                }
                if id == self.project.id {
                    self.open_project(Project::new());
                }
                let projects = self.refresh_project_list();
                self.projects_window.set_projects(projects);
            }
        }
    }

    fn handle_share_action(&mut self, action: ShareAction) {
        match action {
            ShareAction::Import(code) => match share::decode(&code) {
                Ok(sketch) => {
                    let mut project = Project::new();
                    project.name = sketch.name;
                    project.current_code = sketch.code;
                    self.open_project(project);
                    self.share_window.close();
                    self.mark_dirty();
                }
                Err(e) => {
                    tracing::warn!("Invalid share code: {}", e);
                    self.share_window
                        .set_error("That code doesn't look right. Check it and try again!".into());
                }
            },
        }
    }

    fn status_text(&self) -> Option<String> {
        if self.is_generating() {
            return Some("Creating...".to_string());
        }
        if let Some(status) = &self.status {
            return Some(status.clone());
        }
        self.last_saved.map(|saved| {
            format!(
                "Saved {}",
                saved.with_timezone(&Local).format("%H:%M:%S")
            )
        })
    }
}

impl eframe::App for StudioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_responses();
        if self.is_generating() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        // Autosave a moment after the last change
        if let Some(since) = self.dirty_since {
            let delay = Duration::from_millis(AUTOSAVE_DELAY_MS);
            let elapsed = since.elapsed();
            if elapsed >= delay {
                self.save_in_background();
            } else {
                ctx.request_repaint_after(delay - elapsed);
            }
        }

        // Title Bar
        egui::TopBottomPanel::top("title_bar_panel").show(ctx, |ui| {
            let status = self.status_text();
            let can_export = self.projects.is_some() && !self.project.current_code.is_empty();
            let action = TitleBar::show(
                ui,
                TitleBarState {
                    project_name: &mut self.project.name,
                    status: status.as_deref(),
                    can_export,
                },
            );
            if let Some(action) = action {
                self.handle_title_bar(action);
            }
        });

        // Chat
        egui::SidePanel::left("chat_panel")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| {
                if let Some(ChatAction::Send(prompt)) =
                    self.chat_panel
                        .show(ui, &self.project.messages, self.pending_generation.is_some())
                {
                    self.status = None;
                    self.send_prompt(prompt);
                }
            });

        // Function glossary
        egui::SidePanel::right("functions_panel")
            .resizable(true)
            .default_width(240.0)
            .show(ctx, |ui| {
                self.functions_panel.show(ui, &self.project.current_code);
            });

        // Code
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(CodePanelAction::CodeEdited) =
                self.code_panel.show(ui, &mut self.project.current_code)
            {
                self.mark_dirty();
            }
        });

        self.projects_window.show(ctx, &self.project.id);
        if let Some(action) = self.projects_window.take_pending_action() {
            self.handle_projects_action(action);
        }

        if let Some(action) = self.share_window.show(ctx) {
            self.handle_share_action(action);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        let Some(backend) = &self.projects else {
            return;
        };
        if self.project.has_content()
            && let Err(e) = backend.save(&mut self.project)
        {
            tracing::error!("Failed to save on exit: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(request_id: u64, project_id: &str) -> Option<PendingGeneration> {
        Some(PendingGeneration {
            request_id,
            project_id: project_id.to_string(),
            previous_code: "background(0);".to_string(),
        })
    }

    #[test]
    fn matching_reply_claims_the_pending_generation() {
        let mut slot = pending(3, "sketch-a");
        let claimed = claim_reply(&mut slot, 3, "sketch-a");
        assert_eq!(claimed.map(|p| p.previous_code).as_deref(), Some("background(0);"));
        assert!(slot.is_none());
    }

    #[test]
    fn reply_after_switching_project_is_dropped() {
        // Prompt sent in A, then B was opened, which abandons the request
        let mut slot: Option<PendingGeneration> = None;
        assert!(claim_reply(&mut slot, 1, "sketch-b").is_none());

        // B sends its own prompt before A's reply lands
        slot = pending(2, "sketch-b");
        assert!(claim_reply(&mut slot, 1, "sketch-b").is_none());
        assert_eq!(slot, pending(2, "sketch-b"));
    }

    #[test]
    fn reply_for_another_project_is_dropped() {
        let mut slot = pending(5, "sketch-a");
        assert!(claim_reply(&mut slot, 5, "sketch-b").is_none());
        assert!(slot.is_some());
    }
}
