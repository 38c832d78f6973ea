//! KPI view: four indicators plus the distribution of the selected field

use egui::{Color32, ComboBox, RichText, Stroke, Ui};
use egui_plot::{Line, MarkerShape, Plot, PlotPoints, Points, Polygon};
use tracing::debug;

use aq_data::{stats, Field, FieldSummary};

use crate::{DashboardView, UiState, ViewContext};

const BOX_COLOR: Color32 = Color32::from_rgb(86, 180, 160);
const BOX_HALF_WIDTH: f64 = 0.25;

/// Box-and-whisker geometry for the selected field
struct BoxStats {
    whisker_min: f64,
    q1: f64,
    median: f64,
    q3: f64,
    whisker_max: f64,
    mean: f64,
}

/// Everything the tab needs for one (field, table) pair
struct FieldData {
    values: Vec<f64>,
    summary: FieldSummary,
    box_stats: BoxStats,
}

pub struct KpiView {
    title: String,
    cached: Option<FieldData>,
    cached_key: Option<(Field, u64)>,
}

impl KpiView {
    pub fn new() -> Self {
        Self {
            title: "KPI".to_string(),
            cached: None,
            cached_key: None,
        }
    }

    fn compute(ctx: &ViewContext<'_>, field: Field) -> Option<FieldData> {
        let values = ctx.dataset.values(field);
        let summary = FieldSummary::compute(&values)?;
        let box_stats = box_stats(&values, &summary);
        Some(FieldData {
            values,
            summary,
            box_stats,
        })
    }

    fn metric(ui: &mut Ui, label: String, value: String) {
        ui.vertical(|ui| {
            ui.label(RichText::new(label).size(13.0).color(Color32::from_gray(160)));
            ui.label(RichText::new(value).size(26.0).strong());
        });
    }

    fn draw_box(plot_ui: &mut egui_plot::PlotUi, x: f64, stats: &BoxStats) {
        let half_width = BOX_HALF_WIDTH;

        // Box (Q1 to Q3)
        let box_points = vec![
            [x - half_width, stats.q1],
            [x + half_width, stats.q1],
            [x + half_width, stats.q3],
            [x - half_width, stats.q3],
        ];
        plot_ui.polygon(
            Polygon::new(PlotPoints::new(box_points))
                .fill_color(BOX_COLOR.linear_multiply(0.3))
                .stroke(Stroke::new(2.0, BOX_COLOR)),
        );

        // Median line
        plot_ui.line(
            Line::new(vec![
                [x - half_width, stats.median],
                [x + half_width, stats.median],
            ])
            .color(BOX_COLOR)
            .width(3.0),
        );

        // Whiskers
        plot_ui.line(
            Line::new(vec![[x, stats.q3], [x, stats.whisker_max]])
                .color(BOX_COLOR)
                .width(1.5),
        );
        plot_ui.line(
            Line::new(vec![[x, stats.q1], [x, stats.whisker_min]])
                .color(BOX_COLOR)
                .width(1.5),
        );

        // Whisker caps
        let cap_width = half_width * 0.5;
        for y in [stats.whisker_min, stats.whisker_max] {
            plot_ui.line(
                Line::new(vec![[x - cap_width, y], [x + cap_width, y]])
                    .color(BOX_COLOR)
                    .width(1.5),
            );
        }

        // Mean marker
        plot_ui.points(
            Points::new(vec![[x, stats.mean]])
                .color(BOX_COLOR)
                .radius(4.0)
                .shape(MarkerShape::Diamond),
        );
    }
}

impl Default for KpiView {
    fn default() -> Self {
        Self::new()
    }
}

fn box_stats(values: &[f64], summary: &FieldSummary) -> BoxStats {
    let (q1, median, q3) = stats::quartiles(values);
    let iqr = q3 - q1;
    let lower_fence = q1 - 1.5 * iqr;
    let upper_fence = q3 + 1.5 * iqr;

    let whisker_min = values
        .iter()
        .copied()
        .filter(|v| *v >= lower_fence)
        .fold(f64::INFINITY, f64::min);
    let whisker_max = values
        .iter()
        .copied()
        .filter(|v| *v <= upper_fence)
        .fold(f64::NEG_INFINITY, f64::max);

    BoxStats {
        whisker_min: if whisker_min.is_finite() { whisker_min } else { summary.min },
        q1,
        median,
        q3,
        whisker_max: if whisker_max.is_finite() { whisker_max } else { summary.max },
        mean: summary.mean,
    }
}

/// Deterministic horizontal spread for the raw-point column beside the box
fn jitter(index: usize) -> f64 {
    ((index * 7) % 13) as f64 / 13.0 * 0.3 - 0.15
}

impl DashboardView for KpiView {
    fn title(&self) -> &str {
        &self.title
    }

    fn ui(&mut self, ctx: &ViewContext<'_>, state: &mut UiState, ui: &mut Ui) {
        ui.heading("Indicateurs clés (KPI) interactifs");
        ui.add_space(4.0);

        ComboBox::from_label("Choisissez la variable à analyser :")
            .selected_text(state.field.label())
            .show_ui(ui, |ui| {
                for field in Field::ALL {
                    ui.selectable_value(&mut state.field, field, field.label());
                }
            });

        let key = (state.field, ctx.generation);
        if self.cached_key != Some(key) {
            debug!("Recomputing KPI data for {}", state.field.label());
            self.cached = Self::compute(ctx, state.field);
            self.cached_key = Some(key);
        }

        if let Some(data) = &self.cached {
            let unit = state.field.unit();

            ui.add_space(8.0);
            ui.columns(4, |columns| {
                Self::metric(
                    &mut columns[0],
                    format!("Moyenne ({unit})"),
                    format!("{:.1}", data.summary.mean),
                );
                Self::metric(
                    &mut columns[1],
                    format!("Médiane ({unit})"),
                    format!("{:.1}", data.summary.median),
                );
                Self::metric(
                    &mut columns[2],
                    format!("Min ({unit})"),
                    format!("{:.1}", data.summary.min),
                );
                Self::metric(
                    &mut columns[3],
                    format!("Max ({unit})"),
                    format!("{:.1}", data.summary.max),
                );
            });

            ui.add_space(8.0);
            ui.label(format!("Distribution de {} ({unit}) :", state.field.label()));

            let plot = Plot::new("kpi_box_plot")
                .y_axis_label(format!("{} ({unit})", state.field.label()))
                .include_x(-1.5)
                .include_x(1.0)
                .show_grid(true)
                .allow_zoom(true)
                .allow_drag(true)
                .allow_boxed_zoom(true);

            plot.show(ui, |plot_ui| {
                Self::draw_box(plot_ui, 0.0, &data.box_stats);

                // Every raw observation, spread beside the box
                let raw: Vec<[f64; 2]> = data
                    .values
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| [-0.9 + jitter(i), v])
                    .collect();
                plot_ui.points(
                    Points::new(PlotPoints::new(raw))
                        .color(BOX_COLOR.linear_multiply(0.7))
                        .radius(2.0)
                        .shape(MarkerShape::Circle),
                );
            });
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
    fn computed_summary_matches_the_fixture() {
        let dataset = fixture_dataset();
        let ctx = ViewContext {
            dataset: &dataset,
            generation: 0,
        };
        let data = KpiView::compute(&ctx, Field::Pm10).unwrap();

        assert_eq!(data.summary.mean, 20.0);
        assert_eq!(data.summary.median, 20.0);
        assert_eq!(data.summary.min, 10.0);
        assert_eq!(data.summary.max, 30.0);
        assert_eq!(data.values.len(), dataset.len());
    }

    #[test]
    fn box_geometry_is_ordered() {
        let dataset = fixture_dataset();
        let ctx = ViewContext {
            dataset: &dataset,
            generation: 0,
        };
        let stats = KpiView::compute(&ctx, Field::Temp).unwrap().box_stats;

        assert!(stats.whisker_min <= stats.q1);
        assert!(stats.q1 <= stats.median);
        assert!(stats.median <= stats.q3);
        assert!(stats.q3 <= stats.whisker_max);
    }

    #[test]
    fn summary_is_ordered_for_every_selectable_field() {
        let dataset = fixture_dataset();
        let ctx = ViewContext {
            dataset: &dataset,
            generation: 0,
        };
        for field in Field::ALL {
            let summary = KpiView::compute(&ctx, field).unwrap().summary;
            assert!(summary.min <= summary.median && summary.median <= summary.max);
            assert!(summary.min <= summary.mean && summary.mean <= summary.max);
        }
    }

    #[test]
    fn jitter_stays_inside_the_point_column() {
        for i in 0..500 {
            let j = jitter(i);
            assert!((-0.15..=0.15).contains(&j));
        }
    }
}
