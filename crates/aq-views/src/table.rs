//! Date-filtered data table view

use egui::Ui;
use egui_extras::{Column, DatePickerButton, TableBuilder};

use aq_data::{Field, Observation};

use crate::{DashboardView, UiState, ViewContext};

/// Keys the table can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortKey {
    Date,
    Field(Field),
}

impl SortKey {
    const ALL: [SortKey; 4] = [
        SortKey::Date,
        SortKey::Field(Field::Pm10),
        SortKey::Field(Field::Temp),
        SortKey::Field(Field::Humi),
    ];

    fn label(&self) -> &'static str {
        match self {
            SortKey::Date => "Date",
            SortKey::Field(field) => field.label(),
        }
    }
}

/// Scrollable, sortable table over the records inside the selected range
pub struct FilteredTableView {
    title: String,
    sort: Option<(SortKey, bool)>,
}

impl FilteredTableView {
    pub fn new() -> Self {
        Self {
            title: "Tableau filtré".to_string(),
            sort: None,
        }
    }

    fn header_label(&self, key: SortKey) -> String {
        match self.sort {
            Some((current, ascending)) if current == key => {
                format!("{} {}", key.label(), if ascending { "⏶" } else { "⏷" })
            }
            _ => key.label().to_string(),
        }
    }

    fn toggle_sort(&mut self, key: SortKey) {
        self.sort = match self.sort {
            Some((current, ascending)) if current == key => Some((key, !ascending)),
            _ => Some((key, true)),
        };
    }
}

impl Default for FilteredTableView {
    fn default() -> Self {
        Self::new()
    }
}

/// Order a filtered snapshot without touching the underlying table
fn apply_sort(rows: &mut [Observation], sort: Option<(SortKey, bool)>) {
    let Some((key, ascending)) = sort else {
        return;
    };

    match key {
        SortKey::Date => rows.sort_by_key(|obs| obs.date),
        SortKey::Field(field) => {
            rows.sort_by(|a, b| field.value(a).partial_cmp(&field.value(b)).unwrap())
        }
    }
    if !ascending {
        rows.reverse();
    }
}

impl DashboardView for FilteredTableView {
    fn title(&self) -> &str {
        &self.title
    }

    fn ui(&mut self, ctx: &ViewContext<'_>, state: &mut UiState, ui: &mut Ui) {
        ui.heading("Tableau de données filtrées");
        ui.add_space(4.0);

        ui.horizontal(|ui| {
            ui.label("Date de début :");
            ui.add(DatePickerButton::new(&mut state.start_date).id_source("start_date"));
            ui.separator();
            ui.label("Date de fin :");
            ui.add(DatePickerButton::new(&mut state.end_date).id_source("end_date"));
        });

        let mut rows = ctx.dataset.filter_by_date(state.start_date, state.end_date);
        apply_sort(&mut rows, self.sort);

        ui.add_space(4.0);
        ui.label(format!(
            "Affichage des données du {} au {} : {} ligne(s)",
            state.start_date.format("%d/%m/%Y"),
            state.end_date.format("%d/%m/%Y"),
            rows.len()
        ));
        ui.add_space(4.0);

        let text_height = egui::TextStyle::Body.resolve(ui.style()).size * 1.5;
        let mut clicked: Option<SortKey> = None;

        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::initial(110.0).at_least(90.0))
            .column(Column::initial(60.0).at_least(50.0))
            .column(Column::initial(60.0).at_least(50.0))
            .column(Column::initial(60.0).at_least(50.0))
            .column(Column::initial(110.0).at_least(80.0))
            .column(Column::initial(110.0).at_least(80.0))
            .column(Column::initial(110.0).at_least(80.0))
            .min_scrolled_height(0.0)
            .vscroll(true)
            .header(20.0, |mut header| {
                header.col(|ui| {
                    if ui.button(self.header_label(SortKey::Date)).clicked() {
                        clicked = Some(SortKey::Date);
                    }
                });
                header.col(|ui| {
                    ui.strong("day");
                });
                header.col(|ui| {
                    ui.strong("month");
                });
                header.col(|ui| {
                    ui.strong("year");
                });
                for key in &SortKey::ALL[1..] {
                    header.col(|ui| {
                        if ui.button(self.header_label(*key)).clicked() {
                            clicked = Some(*key);
                        }
                    });
                }
            })
            .body(|body| {
                body.rows(text_height, rows.len(), |row_index, mut row| {
                    let obs = &rows[row_index];
                    row.col(|ui| {
                        ui.label(obs.date.format("%d/%m/%Y").to_string());
                    });
                    row.col(|ui| {
                        ui.label(obs.day.to_string());
                    });
                    row.col(|ui| {
                        ui.label(obs.month.to_string());
                    });
                    row.col(|ui| {
                        ui.label(obs.year.to_string());
                    });
                    row.col(|ui| {
                        ui.label(format!("{:.1}", obs.pm10));
                    });
                    row.col(|ui| {
                        ui.label(format!("{:.1}", obs.temp));
                    });
                    row.col(|ui| {
                        ui.label(format!("{:.1}", obs.humi));
                    });
                });
            });

        if let Some(key) = clicked {
            self.toggle_sort(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture_dataset;

    #[test]
    fn sort_by_field_orders_both_directions() {
        let dataset = fixture_dataset();
        let (min, max) = dataset.date_range();

        let mut rows = dataset.filter_by_date(min, max);
        apply_sort(&mut rows, Some((SortKey::Field(Field::Pm10), false)));
        assert_eq!(rows[0].pm10, 30.0);
        assert_eq!(rows[2].pm10, 10.0);

        apply_sort(&mut rows, Some((SortKey::Field(Field::Pm10), true)));
        assert_eq!(rows[0].pm10, 10.0);
        assert_eq!(rows[2].pm10, 30.0);
    }

    #[test]
    fn sort_by_date_descending_reverses_the_table() {
        let dataset = fixture_dataset();
        let (min, max) = dataset.date_range();

        let mut rows = dataset.filter_by_date(min, max);
        apply_sort(&mut rows, Some((SortKey::Date, false)));
        assert!(rows.windows(2).all(|w| w[0].date >= w[1].date));
    }

    #[test]
    fn no_sort_keeps_table_order() {
        let dataset = fixture_dataset();
        let (min, max) = dataset.date_range();

        let mut rows = dataset.filter_by_date(min, max);
        apply_sort(&mut rows, None);
        assert_eq!(rows, dataset.records());
    }
}
