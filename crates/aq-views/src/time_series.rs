//! Time series view: daily PM10 over the year

use chrono::{Datelike, NaiveDate};
use egui::{Color32, Ui};
use egui_plot::{Line, MarkerShape, Plot, PlotPoints, Points};
use tracing::debug;

use crate::{DashboardView, UiState, ViewContext};

const SERIES_COLOR: Color32 = Color32::from_rgb(31, 119, 180);

const DESCRIPTION: &str = "Cette série temporelle montre l'évolution quotidienne des \
particules fines PM10 tout au long de l'année 2025. On observe globalement des variations \
régulières, mais un pic notable apparaît le 5 août, correspondant à une journée où la \
concentration de PM10 est particulièrement élevée.";

/// Cached plot data, rebuilt when the table generation changes
struct PlotData {
    points: Vec<[f64; 2]>,
}

/// Line chart of PM10 against date, one marker per record
pub struct TimeSeriesView {
    title: String,
    cached: Option<PlotData>,
    cached_generation: Option<u64>,
}

impl TimeSeriesView {
    pub fn new() -> Self {
        Self {
            title: "Série temporelle".to_string(),
            cached: None,
            cached_generation: None,
        }
    }

    fn build_plot_data(ctx: &ViewContext<'_>) -> PlotData {
        // Table order is date order, so the x values come out non-decreasing.
        let points = ctx
            .dataset
            .records()
            .iter()
            .map(|obs| [date_to_axis(obs.date), obs.pm10])
            .collect();
        PlotData { points }
    }
}

impl Default for TimeSeriesView {
    fn default() -> Self {
        Self::new()
    }
}

/// Calendar date to plot-axis value (whole days from the Common Era)
fn date_to_axis(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn axis_to_date(value: f64) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(value.round() as i32)
}

impl DashboardView for TimeSeriesView {
    fn title(&self) -> &str {
        &self.title
    }

    fn ui(&mut self, ctx: &ViewContext<'_>, _state: &mut UiState, ui: &mut Ui) {
        if self.cached_generation != Some(ctx.generation) {
            debug!("Rebuilding time series plot data");
            self.cached = Some(Self::build_plot_data(ctx));
            self.cached_generation = Some(ctx.generation);
        }

        ui.heading("Évolution quotidienne de PM10");
        ui.add_space(4.0);

        if let Some(plot_data) = &self.cached {
            let plot_height = (ui.available_height() - 110.0).max(220.0);

            let plot = Plot::new("pm10_time_series")
                .height(plot_height)
                .x_axis_label("Date")
                .y_axis_label("PM10 (µg/m³)")
                .x_axis_formatter(|value, _max_chars, _range| {
                    axis_to_date(value)
                        .map(|date| date.format("%d/%m").to_string())
                        .unwrap_or_default()
                })
                .label_formatter(|name, point| match axis_to_date(point.x) {
                    Some(date) => {
                        let series = if name.is_empty() { "PM10" } else { name };
                        format!("{}\n{}: {:.1} µg/m³", date.format("%d/%m/%Y"), series, point.y)
                    }
                    None => String::new(),
                })
                .allow_zoom(true)
                .allow_drag(true)
                .allow_boxed_zoom(true);

            plot.show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::new(plot_data.points.clone()))
                        .color(SERIES_COLOR)
                        .width(2.0)
                        .name("PM10"),
                );
                plot_ui.points(
                    Points::new(PlotPoints::new(plot_data.points.clone()))
                        .color(SERIES_COLOR)
                        .radius(2.5)
                        .shape(MarkerShape::Circle)
                        .name("PM10"),
                );
            });

            ui.add_space(8.0);
            ui.label(DESCRIPTION);
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
    fn axis_value_round_trips_to_the_same_date() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 5).unwrap();
        assert_eq!(axis_to_date(date_to_axis(date)), Some(date));
    }

    #[test]
    fn one_point_per_record_in_date_order() {
        let dataset = fixture_dataset();
        let ctx = ViewContext {
            dataset: &dataset,
            generation: 0,
        };
        let data = TimeSeriesView::build_plot_data(&ctx);

        assert_eq!(data.points.len(), dataset.len());
        assert!(data.points.windows(2).all(|w| w[0][0] <= w[1][0]));
        assert_eq!(data.points[0][1], 10.0);
        assert_eq!(data.points[2][1], 30.0);
    }
}
