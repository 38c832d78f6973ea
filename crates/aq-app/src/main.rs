//! Main application entry point

use std::time::{Duration, Instant};

use anyhow::{Context as _, Result};
use eframe::egui::{self, Context, Ui};
use tracing::{info, warn};

use aq_data::DatasetCache;
use aq_views::{
    CorrelationView, DashboardView, FilteredTableView, KpiView, TimeSeriesView, UiState,
    ViewContext,
};

mod theme;

/// Fixed relative path of the daily observation file
const DATA_FILE: &str = "air_qualite.csv";

/// How often the source file's modification time is checked
const REFRESH_INTERVAL: Duration = Duration::from_secs(1);

const INTRO_TEXT: &str = "Cette analyse porte sur la qualité de l'air en 2025 dans la \
station située à la gare Saint-Germain-des-Prés, à Paris. La base de données contient des \
mesures quotidiennes comprenant :\n\
  • PM10 : particules fines de diamètre inférieur ou égal à 10 µm, exprimées en µg/m³.\n\
  • TEMP : température en degrés Celsius, qui peut influencer la dispersion des polluants.\n\
  • HUMI : humidité relative en pourcentage, un facteur pouvant moduler la concentration \
de particules fines.\n\
  • day, month, year : informations permettant de situer chaque mesure dans le temps.\n\
Les données sont représentées sous forme de séries temporelles, indicateurs statistiques, \
matrices de corrélation et tableaux filtrés.";

/// Main application state
struct DashboardApp {
    /// Memoized table, reloaded when the source file changes
    cache: DatasetCache,

    /// One view per tab, in tab order
    views: Vec<Box<dyn DashboardView>>,

    /// Index of the active tab
    selected_tab: usize,

    /// Widget values shared with the views
    ui_state: UiState,

    last_refresh_check: Instant,
}

impl DashboardApp {
    fn new(cc: &eframe::CreationContext<'_>, cache: DatasetCache) -> Self {
        theme::apply_theme(&cc.egui_ctx);

        let ui_state = UiState::new(cache.dataset());
        let views: Vec<Box<dyn DashboardView>> = vec![
            Box::new(TimeSeriesView::new()),
            Box::new(KpiView::new()),
            Box::new(CorrelationView::new()),
            Box::new(FilteredTableView::new()),
        ];

        Self {
            cache,
            views,
            selected_tab: 0,
            ui_state,
            last_refresh_check: Instant::now(),
        }
    }

    /// Swap in a fresh table when the source file changed on disk.
    fn refresh_dataset(&mut self) {
        if self.last_refresh_check.elapsed() < REFRESH_INTERVAL {
            return;
        }
        self.last_refresh_check = Instant::now();

        match self.cache.refresh() {
            Ok(true) => self.ui_state.clamp_to(self.cache.dataset()),
            Ok(false) => {}
            Err(e) => warn!("Refresh of {} failed: {}", DATA_FILE, e),
        }
    }

    fn show_header(&mut self, ui: &mut Ui) {
        ui.add_space(8.0);
        ui.heading(
            egui::RichText::new("Analyse de la qualité de l'air en 2025")
                .size(26.0)
                .strong(),
        );
        ui.label(
            egui::RichText::new("Étude des particules fines PM10 et facteurs associés")
                .size(16.0)
                .color(egui::Color32::from_gray(180)),
        );
        ui.add_space(6.0);
        ui.label(egui::RichText::new(INTRO_TEXT).size(12.5));
        ui.add_space(8.0);

        // Tab bar: four mutually exclusive regions
        ui.horizontal(|ui| {
            for (idx, view) in self.views.iter().enumerate() {
                if ui
                    .selectable_label(self.selected_tab == idx, view.title())
                    .clicked()
                {
                    self.selected_tab = idx;
                }
            }
        });
        ui.add_space(4.0);
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.refresh_dataset();
        ctx.request_repaint_after(REFRESH_INTERVAL);

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            self.show_header(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let view_ctx = ViewContext {
                dataset: self.cache.dataset(),
                generation: self.cache.generation(),
            };
            if let Some(view) = self.views.get_mut(self.selected_tab) {
                view.ui(&view_ctx, &mut self.ui_state, ui);
            }
        });
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cache = DatasetCache::open(DATA_FILE)
        .with_context(|| format!("failed to load {DATA_FILE}"))?;
    info!(
        "Starting air quality dashboard ({} daily records)",
        cache.dataset().len()
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0]),
        default_theme: eframe::Theme::Dark,
        persist_window: false,
        ..Default::default()
    };

    eframe::run_native(
        "Analyse Qualité de l'air 2025 - Saint-Germain-des-Prés",
        options,
        Box::new(move |cc| Box::new(DashboardApp::new(cc, cache))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
