//! Correlation matrix view

use egui::{Align2, Color32, FontId, Pos2, Rect, Stroke, Ui, Vec2};
use tracing::debug;

use aq_data::{stats, Field};

use crate::{DashboardView, UiState, ViewContext};

const CAPTION: &str = "Cette matrice montre les corrélations entre PM10, température et \
humidité. Une valeur proche de 1 indique une forte corrélation positive, proche de -1 une \
corrélation négative. Une forte corrélation positive entre la température et PM10 suggère \
que les journées plus chaudes tendent à être associées à une pollution plus élevée. \
L'humidité a une influence moins marquée sur PM10.";

/// Cached correlation data, rebuilt when the table generation changes
struct CorrelationData {
    matrix: Vec<Vec<f64>>,
    labels: Vec<&'static str>,
}

/// Annotated heatmap of the pairwise Pearson coefficients
pub struct CorrelationView {
    title: String,
    cached: Option<CorrelationData>,
    cached_generation: Option<u64>,
}

impl CorrelationView {
    pub fn new() -> Self {
        Self {
            title: "Matrice de corrélation".to_string(),
            cached: None,
            cached_generation: None,
        }
    }

    fn compute(ctx: &ViewContext<'_>) -> CorrelationData {
        let columns: Vec<Vec<f64>> = Field::ALL
            .iter()
            .map(|field| ctx.dataset.values(*field))
            .collect();
        CorrelationData {
            matrix: stats::correlation_matrix(&columns),
            labels: Field::ALL.iter().map(|field| field.label()).collect(),
        }
    }

    fn draw_heatmap(&self, ui: &mut Ui, data: &CorrelationData) {
        let n = data.labels.len();
        let available = ui.available_rect_before_wrap();
        let size = available.size();

        // Space for the row/column labels on the top and left edges
        let margin = 70.0;
        let cell_size = ((size.x.min(size.y) - margin - 60.0) / n as f32).clamp(40.0, 110.0);

        let painter = ui.painter();
        let grid = Rect::from_min_size(
            available.min + Vec2::new(margin, margin),
            Vec2::splat(cell_size * n as f32),
        );

        for i in 0..n {
            for j in 0..n {
                let value = data.matrix[i][j];
                let cell = Rect::from_min_size(
                    grid.min + Vec2::new(j as f32 * cell_size, i as f32 * cell_size),
                    Vec2::splat(cell_size),
                );

                painter.rect_filled(cell, 0.0, correlation_color(value));
                painter.rect_stroke(cell, 0.0, Stroke::new(1.0, Color32::from_gray(60)));

                let text_color = if value.abs() > 0.5 {
                    Color32::WHITE
                } else {
                    Color32::BLACK
                };
                painter.text(
                    cell.center(),
                    Align2::CENTER_CENTER,
                    format!("{value:.2}"),
                    FontId::proportional(14.0),
                    text_color,
                );
            }
        }

        for (i, label) in data.labels.iter().enumerate() {
            // Column labels (top)
            painter.text(
                Pos2::new(grid.min.x + (i as f32 + 0.5) * cell_size, grid.min.y - 6.0),
                Align2::CENTER_BOTTOM,
                *label,
                FontId::proportional(13.0),
                Color32::GRAY,
            );
            // Row labels (left)
            painter.text(
                Pos2::new(grid.min.x - 6.0, grid.min.y + (i as f32 + 0.5) * cell_size),
                Align2::RIGHT_CENTER,
                *label,
                FontId::proportional(13.0),
                Color32::GRAY,
            );
        }

        // Vertical color-scale legend
        let legend = Rect::from_min_size(
            Pos2::new(grid.max.x + 20.0, grid.min.y),
            Vec2::new(18.0, grid.height()),
        );
        for step in 0..100 {
            let t = step as f32 / 99.0;
            let value = 1.0 - 2.0 * t as f64;
            let y = legend.min.y + t * legend.height();
            painter.line_segment(
                [Pos2::new(legend.min.x, y), Pos2::new(legend.max.x, y)],
                Stroke::new(2.0, correlation_color(value)),
            );
        }
        for (anchor_y, align, text) in [
            (legend.min.y, Align2::LEFT_TOP, "1.0"),
            (legend.center().y, Align2::LEFT_CENTER, "0.0"),
            (legend.max.y, Align2::LEFT_BOTTOM, "-1.0"),
        ] {
            painter.text(
                Pos2::new(legend.max.x + 5.0, anchor_y),
                align,
                text,
                FontId::proportional(11.0),
                Color32::GRAY,
            );
        }

        ui.allocate_space(Vec2::new(0.0, grid.max.y - available.min.y + 16.0));
    }
}

impl Default for CorrelationView {
    fn default() -> Self {
        Self::new()
    }
}

/// Diverging scale centered at zero: red for negative, blue for positive,
/// white for no correlation.
fn correlation_color(value: f64) -> Color32 {
    let value = value.clamp(-1.0, 1.0);
    if value >= 0.0 {
        let intensity = (value * 255.0) as u8;
        Color32::from_rgb(255 - intensity, 255 - intensity, 255)
    } else {
        let intensity = (-value * 255.0) as u8;
        Color32::from_rgb(255, 255 - intensity, 255 - intensity)
    }
}

impl DashboardView for CorrelationView {
    fn title(&self) -> &str {
        &self.title
    }

    fn ui(&mut self, ctx: &ViewContext<'_>, _state: &mut UiState, ui: &mut Ui) {
        if self.cached_generation != Some(ctx.generation) {
            debug!("Recomputing correlation matrix");
            self.cached = Some(Self::compute(ctx));
            self.cached_generation = Some(ctx.generation);
        }

        ui.heading("Matrice de corrélation");
        ui.add_space(4.0);

        if let Some(data) = &self.cached {
            self.draw_heatmap(ui, data);
            ui.separator();
            ui.label(CAPTION);
        } else {
            ui.centered_and_justified(|ui| {
                ui.label("No data to display");
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture_dataset;

    #[test]
    fn color_scale_hits_both_extremes_and_the_center() {
        assert_eq!(correlation_color(1.0), Color32::from_rgb(0, 0, 255));
        assert_eq!(correlation_color(-1.0), Color32::from_rgb(255, 0, 0));
        assert_eq!(correlation_color(0.0), Color32::from_rgb(255, 255, 255));
    }

    #[test]
    fn color_scale_tolerates_out_of_range_values() {
        assert_eq!(correlation_color(2.5), correlation_color(1.0));
        assert_eq!(correlation_color(-7.0), correlation_color(-1.0));
    }

    #[test]
    fn computed_matrix_covers_the_three_fields() {
        let dataset = fixture_dataset();
        let ctx = ViewContext {
            dataset: &dataset,
            generation: 0,
        };
        let data = CorrelationView::compute(&ctx);

        assert_eq!(data.labels, vec!["PM10", "TEMP", "HUMI"]);
        assert_eq!(data.matrix.len(), 3);
        // PM10 and TEMP are perfectly linear in the fixture
        assert!((data.matrix[0][1] - 1.0).abs() < 1e-12);
        // Constant humidity has no defined correlation; rendered as 0
        assert_eq!(data.matrix[0][2], 0.0);
    }
}
