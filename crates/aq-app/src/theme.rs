//! Dark theme for the dashboard, applied once before the first frame

use egui::{Color32, Context, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};
use std::collections::BTreeMap;

const BG_COLOR: Color32 = Color32::from_rgb(24, 26, 27);
const PANEL_BG: Color32 = Color32::from_rgb(32, 34, 36);
const WIDGET_BG: Color32 = Color32::from_rgb(42, 44, 46);
const HOVER_COLOR: Color32 = Color32::from_rgb(52, 55, 58);
const ACCENT_COLOR: Color32 = Color32::from_rgb(86, 180, 160);
const TEXT_COLOR: Color32 = Color32::from_rgb(218, 220, 222);

/// Apply the application theme. Page-level configuration: runs exactly once,
/// before any view renders.
pub fn apply_theme(ctx: &Context) {
    let mut style = Style::default();
    let mut visuals = Visuals::dark();

    visuals.window_fill = PANEL_BG;
    visuals.panel_fill = PANEL_BG;
    visuals.extreme_bg_color = BG_COLOR;
    visuals.faint_bg_color = WIDGET_BG;

    visuals.widgets.noninteractive.bg_fill = WIDGET_BG;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, TEXT_COLOR);
    visuals.widgets.noninteractive.rounding = Rounding::same(4.0);

    visuals.widgets.inactive.bg_fill = WIDGET_BG;
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, TEXT_COLOR);
    visuals.widgets.inactive.rounding = Rounding::same(4.0);

    visuals.widgets.hovered.bg_fill = HOVER_COLOR;
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, TEXT_COLOR);
    visuals.widgets.hovered.rounding = Rounding::same(4.0);

    visuals.widgets.active.bg_fill = HOVER_COLOR;
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, ACCENT_COLOR);
    visuals.widgets.active.rounding = Rounding::same(4.0);

    visuals.selection.bg_fill = ACCENT_COLOR.linear_multiply(0.3);
    visuals.selection.stroke = Stroke::new(1.0, ACCENT_COLOR);
    visuals.hyperlink_color = ACCENT_COLOR;

    let mut font_sizes = BTreeMap::new();
    font_sizes.insert(TextStyle::Small, FontId::new(11.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Body, FontId::new(14.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Button, FontId::new(14.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Heading, FontId::new(19.0, FontFamily::Proportional));
    font_sizes.insert(
        TextStyle::Monospace,
        FontId::new(12.0, FontFamily::Monospace),
    );
    style.text_styles = font_sizes;

    style.spacing.item_spacing = egui::vec2(8.0, 4.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);

    ctx.set_style(style);
    ctx.set_visuals(visuals);
}
