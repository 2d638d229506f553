use eframe::egui::{RichText, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::budget::NodeSet;
use crate::chart::{ColorScheme, LayoutMode, ScaleVariable, ViewCommand};
use crate::util::short_name;

use super::super::ViewModel;

const SEARCH_RESULT_LIMIT: usize = 8;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

/// Best-scoring node indices for `query` over names and ids.
pub(in crate::app) fn search_nodes(set: &NodeSet, query: &str, limit: usize) -> Vec<usize> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default();
    let mut scored = set
        .nodes
        .iter()
        .enumerate()
        .filter_map(|(index, node)| {
            let by_name = fuzzy_match_score(&matcher, &node.name, query);
            let by_id = fuzzy_match_score(&matcher, &node.id, query);
            by_name.max(by_id).map(|score| (index, score))
        })
        .collect::<Vec<_>>();

    scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    scored.truncate(limit);
    scored.into_iter().map(|(index, _)| index).collect()
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        let enabled = self.chart.toggles_enabled();
        let mut commands = Vec::new();

        ui.horizontal_wrapped(|ui| {
            ui.heading("Budget bubbles");
            ui.separator();

            ui.add_enabled_ui(enabled, |ui| {
                let state = self.chart.state().clone();

                ui.label(RichText::new("Group").strong());
                let mut layout = state.layout;
                for mode in LayoutMode::ALL {
                    ui.selectable_value(&mut layout, mode, mode.label());
                }
                if layout != state.layout {
                    commands.push(ViewCommand::SetLayout(layout));
                }
                ui.separator();

                ui.label(RichText::new("Color").strong());
                let mut scheme = state.color_scheme;
                for option in ColorScheme::ALL {
                    ui.selectable_value(&mut scheme, option, option.label());
                }
                if scheme != state.color_scheme {
                    commands.push(ViewCommand::SetColorScheme(scheme));
                }
                ui.separator();

                ui.label(RichText::new("Size").strong());
                let mut variable = state.scale_variable;
                for option in ScaleVariable::ALL {
                    ui.selectable_value(&mut variable, option, option.label());
                }
                if variable != state.scale_variable {
                    commands.push(ViewCommand::SetScaleVariable(variable));
                }
                ui.separator();

                ui.label(RichText::new("Year").strong());
                let axis = &self.chart.node_set().axis;
                let mut year_index = state.year_index;
                for index in 0..axis.len() {
                    let label = axis.calendar_year(index).to_string();
                    ui.selectable_value(&mut year_index, index, label)
                        .on_hover_text(axis.tag(index));
                }
                if year_index != state.year_index {
                    commands.push(ViewCommand::SetYear(year_index));
                }
            });
        });

        ui.add_enabled_ui(enabled, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.label("Search");
                ui.text_edit_singleline(&mut self.search)
                    .on_hover_text("Fuzzy match on budget line names; click a result to open it.");

                if self.search_cache_query != self.search {
                    self.search_matches =
                        search_nodes(self.chart.node_set(), &self.search, SEARCH_RESULT_LIMIT);
                    self.search_cache_query = self.search.clone();
                }

                if !self.search.trim().is_empty() && self.search_matches.is_empty() {
                    ui.weak("no matches");
                }
                for &index in &self.search_matches {
                    let node = &self.chart.node_set().nodes[index];
                    if ui
                        .link(short_name(&node.name, 32))
                        .on_hover_text(node.category.as_str())
                        .clicked()
                    {
                        commands.push(ViewCommand::Select(node.id.clone()));
                    }
                }
            });
        });
        ui.add_space(2.0);

        for command in commands {
            self.apply_command(command);
        }
    }

    pub(in crate::app) fn clear_search(&mut self) {
        self.search.clear();
        self.search_matches.clear();
        self.search_cache_query.clear();
    }
}
