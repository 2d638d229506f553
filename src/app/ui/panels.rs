use eframe::egui::{self, Align, Context, Layout};
use tracing::warn;

use crate::chart::{BubbleChart, Transition, ViewCommand};

use super::super::{ChartSource, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(chart: BubbleChart) -> Self {
        Self {
            chart,
            search: String::new(),
            search_matches: Vec::new(),
            search_cache_query: String::new(),
            hovered: None,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        source: &ChartSource,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("toolbar")
            .resizable(false)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::TopBottomPanel::bottom("status_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(format!("data: {}", source.data.display()));
                    ui.label(format!("lines: {}", self.chart.node_set().len()));
                    let year = self.chart.state().year_index;
                    ui.label(format!("year: {}", self.chart.node_set().axis.tag(year)));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload data"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let simulation = self.chart.simulation();
                        if simulation.is_running() {
                            ui.label(format!("settling (alpha {:.3})", simulation.alpha()));
                        } else {
                            ui.label("settled");
                        }
                    });
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading budget data...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else if self.chart.state().is_detail_open() {
                self.draw_details(ui);
            } else {
                self.draw_chart(ui);
            }
        });
    }

    /// Routes a command through the state machine; the shell never mutates view state directly.
    pub(in crate::app) fn apply_command(&mut self, command: ViewCommand) {
        match self.chart.apply(command) {
            Ok(Transition::Applied { .. }) => {
                self.hovered = None;
                if self.chart.state().is_detail_open() {
                    self.clear_search();
                }
            }
            Ok(Transition::Locked | Transition::Unchanged) => {}
            Err(error) => warn!("{error}"),
        }
    }
}
