use crate::constant::FREQUENT_FUNCTION_MIN_COUNT;
use crate::docs::{self, FunctionDoc, Preview};
use egui::{Color32, Pos2, Rect, RichText, ScrollArea, Sense, Shape, Stroke, StrokeKind, Ui, vec2};
use std::collections::HashMap;
use std::f32::consts::TAU;

const PREVIEW_BG: Color32 = Color32::from_rgb(26, 26, 46);
const PREVIEW_GRID: Color32 = Color32::from_rgba_premultiplied(25, 25, 25, 25);
const SHAPE_FILL: Color32 = Color32::from_rgba_premultiplied(30, 65, 123, 128);
const SHAPE_STROKE: Color32 = Color32::from_rgb(59, 130, 246);
const PREVIEW_UNITS: f32 = 100.0;

/// Explains the p5.js functions the current sketch leans on
#[derive(Default)]
pub struct FunctionsPanel {
    query: String,
    /// Slider values per function, kept while the panel lives
    playground: HashMap<&'static str, Vec<f32>>,
}

impl FunctionsPanel {
    pub fn show(&mut self, ui: &mut Ui, code: &str) {
        ui.heading("Functions");
        ui.add(
            egui::TextEdit::singleline(&mut self.query)
                .hint_text("Look up a function, e.g. circle"),
        );

        let query = self.query.trim().to_string();
        if !query.is_empty() {
            match docs::lookup(&query) {
                Some(doc) => self.show_doc(ui, doc, None),
                None => {
                    ui.label(RichText::new(format!("No notes for \"{}\" yet", query)).weak());
                }
            }
        }

        ui.separator();

        let frequent = docs::find_frequent_functions(code, FREQUENT_FUNCTION_MIN_COUNT);
        if frequent.is_empty() {
            ui.label(RichText::new("Functions you use a lot will show up here.").weak());
            return;
        }

        ScrollArea::vertical().show(ui, |ui| {
            for (doc, count) in frequent {
                self.show_doc(ui, doc, Some(count));
            }
        });
    }

    fn show_doc(&mut self, ui: &mut Ui, doc: &'static FunctionDoc, count: Option<usize>) {
        let title = match count {
            Some(count) => format!("{}  ×{}", doc.signature(), count),
            None => doc.signature(),
        };

        egui::CollapsingHeader::new(RichText::new(title).monospace())
            .id_salt(doc.name)
            .default_open(count.is_none())
            .show(ui, |ui| {
                ui.label(doc.description);
                if doc.is_playable() {
                    let values = self
                        .playground
                        .entry(doc.name)
                        .or_insert_with(|| doc.default_values());
                    show_playground(ui, doc, values);
                } else {
                    for arg in doc.args {
                        ui.horizontal_wrapped(|ui| {
                            ui.label(RichText::new(arg.name).monospace().strong());
                            ui.label(arg.description);
                        });
                    }
                    if let Some(example) = doc.example {
                        ui.label(RichText::new(example).monospace().weak());
                    }
                }
            });
    }
}

fn show_playground(ui: &mut Ui, doc: &FunctionDoc, values: &mut [f32]) {
    match doc.preview() {
        Preview::Shape => paint_shape(ui, doc.name, values),
        Preview::Color => paint_swatch(ui, values),
        Preview::None => {}
    }

    for (arg, value) in doc.args.iter().zip(values.iter_mut()) {
        let Some(range) = arg.range else {
            continue;
        };
        ui.horizontal(|ui| {
            ui.label(RichText::new(arg.name).monospace().strong());
            ui.add(
                egui::Slider::new(value, range.min..=range.max).step_by(f64::from(range.step)),
            );
        });
        ui.label(RichText::new(arg.description).small().weak());
    }

    ui.label(
        RichText::new(doc.call_with(values))
            .monospace()
            .color(Color32::LIGHT_GREEN),
    );
}

fn paint_swatch(ui: &mut Ui, values: &[f32]) {
    let channel = |i: usize| values.get(i).copied().unwrap_or(128.0).clamp(0.0, 255.0) as u8;
    let (response, painter) =
        ui.allocate_painter(vec2(ui.available_width(), 48.0), Sense::hover());
    painter.rect(
        response.rect,
        6.0,
        Color32::from_rgb(channel(0), channel(1), channel(2)),
        Stroke::new(2.0, Color32::GRAY),
        StrokeKind::Inside,
    );
}

/// Draws the shape on a 100x100 grid, the same units the sliders use
fn paint_shape(ui: &mut Ui, name: &str, v: &[f32]) {
    let side = ui.available_width().min(220.0);
    let (response, painter) = ui.allocate_painter(vec2(side, side), Sense::hover());
    let rect = response.rect;
    let scale = side / PREVIEW_UNITS;
    let at = |x: f32, y: f32| rect.min + vec2(x * scale, y * scale);
    let arg = |i: usize| v.get(i).copied().unwrap_or(0.0);
    let stroke = Stroke::new(2.0, SHAPE_STROKE);

    painter.rect_filled(rect, 6.0, PREVIEW_BG);
    for step in 1..4 {
        let offset = step as f32 * 25.0;
        let grid = Stroke::new(0.5, PREVIEW_GRID);
        painter.line_segment([at(offset, 0.0), at(offset, PREVIEW_UNITS)], grid);
        painter.line_segment([at(0.0, offset), at(PREVIEW_UNITS, offset)], grid);
    }

    match name {
        "circle" => {
            painter.circle(at(arg(0), arg(1)), arg(2) / 2.0 * scale, SHAPE_FILL, stroke);
        }
        "ellipse" => {
            let (rx, ry) = (arg(2) / 2.0 * scale, arg(3) / 2.0 * scale);
            let points = ellipse_points(at(arg(0), arg(1)), rx, ry, 0.0, TAU);
            painter.add(Shape::convex_polygon(points, SHAPE_FILL, stroke));
        }
        "rect" | "square" => {
            let (w, h) = if name == "square" {
                (arg(2), arg(2))
            } else {
                (arg(2), arg(3))
            };
            let shape = Rect::from_min_size(at(arg(0), arg(1)), vec2(w * scale, h * scale));
            painter.rect(shape, 0.0, SHAPE_FILL, stroke, StrokeKind::Middle);
        }
        "line" => {
            let (from, to) = (at(arg(0), arg(1)), at(arg(2), arg(3)));
            painter.line_segment([from, to], Stroke::new(3.0, SHAPE_STROKE));
            painter.circle_filled(from, 3.0, Color32::from_rgb(244, 114, 182));
            painter.circle_filled(to, 3.0, Color32::from_rgb(74, 222, 128));
        }
        "arc" => {
            let center = at(arg(0), arg(1));
            let (rx, ry) = (arg(2) / 2.0 * scale, arg(3) / 2.0 * scale);
            let outline = ellipse_points(center, rx, ry, 0.0, TAU);
            let faint = Stroke::new(1.0, SHAPE_STROKE.gamma_multiply(0.3));
            painter.add(Shape::closed_line(outline, faint));

            let (start, stop) = (arg(4), arg(5));
            if stop > start {
                let sweep = ellipse_points(center, rx, ry, start, stop);
                painter.add(Shape::line(sweep, Stroke::new(3.0, SHAPE_STROKE)));
            }
        }
        "strokeWeight" => {
            let weight = Stroke::new(arg(0) * scale, SHAPE_STROKE);
            painter.line_segment([at(20.0, 50.0), at(80.0, 50.0)], weight);
        }
        _ => {}
    }
}

/// Points along an ellipse from `start` to `stop` radians, clockwise on screen
fn ellipse_points(center: Pos2, rx: f32, ry: f32, start: f32, stop: f32) -> Vec<Pos2> {
    const SEGMENTS: usize = 48;
    (0..=SEGMENTS)
        .map(|i| {
            let angle = start + (stop - start) * i as f32 / SEGMENTS as f32;
            center + vec2(rx * angle.cos(), ry * angle.sin())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ellipse_points_span_the_requested_angles() {
        let center = Pos2::new(50.0, 50.0);
        let points = ellipse_points(center, 20.0, 10.0, 0.0, std::f32::consts::PI);
        let first = points[0];
        let last = points[points.len() - 1];
        assert!((first.x - 70.0).abs() < 1e-3 && (first.y - 50.0).abs() < 1e-3);
        assert!((last.x - 30.0).abs() < 1e-3 && (last.y - 50.0).abs() < 1e-3);
        assert!(points.iter().all(|p| p.y >= 50.0 - 1e-3));
    }

    #[test]
    fn playground_values_start_from_defaults() {
        let mut panel = FunctionsPanel::default();
        let circle = docs::lookup("circle").unwrap();
        let values = panel
            .playground
            .entry(circle.name)
            .or_insert_with(|| circle.default_values());
        values[2] = 70.0;
        assert_eq!(circle.call_with(&panel.playground["circle"]), "circle(50, 50, 70)");
    }
}
