//! The four dashboard views and the seams they share

mod correlation;
mod kpi;
mod table;
mod time_series;

pub use correlation::CorrelationView;
pub use kpi::KpiView;
pub use table::FilteredTableView;
pub use time_series::TimeSeriesView;

use chrono::NaiveDate;
use egui::Ui;

use aq_data::{Dataset, Field};

/// Read-only context handed to every view on each frame
pub struct ViewContext<'a> {
    pub dataset: &'a Dataset,
    /// Bumped by the dataset cache on reload; views key their caches on it.
    pub generation: u64,
}

/// Widget values that survive across frames.
///
/// Owned by the application and passed into the views that read or edit
/// them; the views themselves hold no widget state.
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    /// Field analysed in the KPI tab
    pub field: Field,
    /// Lower bound of the filtered-table range
    pub start_date: NaiveDate,
    /// Upper bound of the filtered-table range
    pub end_date: NaiveDate,
}

impl UiState {
    /// Defaults: first selectable field, the table's full date range.
    pub fn new(dataset: &Dataset) -> Self {
        let (min, max) = dataset.date_range();
        Self {
            field: Field::Pm10,
            start_date: min,
            end_date: max,
        }
    }

    /// Pull both dates back inside the table's range after a reload.
    pub fn clamp_to(&mut self, dataset: &Dataset) {
        let (min, max) = dataset.date_range();
        self.start_date = self.start_date.clamp(min, max);
        self.end_date = self.end_date.clamp(min, max);
    }
}

/// One tab's rendering routine
pub trait DashboardView {
    /// Tab label
    fn title(&self) -> &str;

    /// Render this view into its tab region.
    fn ui(&mut self, ctx: &ViewContext<'_>, state: &mut UiState, ui: &mut Ui);
}
