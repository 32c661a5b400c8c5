use egui::{Color32, Context, Stroke, Style, Visuals};

pub fn configure_style(ctx: &Context, theme: &str) {
    let mut style = Style::default();

    // Roomy spacing, easier to hit for small hands
    style.spacing.item_spacing = egui::vec2(8.0, 8.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);
    style.spacing.window_margin = egui::Margin::same(12);

    ctx.set_style(style);

    let mut visuals = if theme == "light" {
        Visuals::light()
    } else {
        Visuals::dark()
    };
    visuals.window_shadow = egui::epaint::Shadow::NONE;
    visuals.popup_shadow = egui::epaint::Shadow::NONE;

    visuals.selection.bg_fill = Color32::from_rgb(59, 130, 246);
    visuals.selection.stroke = Stroke::new(1.0, Color32::WHITE);
    visuals.hyperlink_color = Color32::from_rgb(96, 165, 250);

    ctx.set_visuals(visuals);
}
