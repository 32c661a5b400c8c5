pub mod chat_panel;
pub mod code_panel;
pub mod functions_panel;
pub mod projects_window;
pub mod share_window;
pub mod title_bar;
pub mod viewport;
