use clap::ValueEnum;
use serde::Serialize;

use crate::budget::BudgetNode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    Grouped,
    Split,
}

impl LayoutMode {
    pub const ALL: [Self; 2] = [Self::Grouped, Self::Split];

    pub fn label(self) -> &'static str {
        match self {
            Self::Grouped => "All together",
            Self::Split => "By category",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    Category,
    Growth,
}

impl ColorScheme {
    pub const ALL: [Self; 2] = [Self::Category, Self::Growth];

    pub fn label(self) -> &'static str {
        match self {
            Self::Category => "Category",
            Self::Growth => "Annual growth",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ScaleVariable {
    Total,
    Salaries,
    Other,
}

impl ScaleVariable {
    pub const ALL: [Self; 3] = [Self::Total, Self::Salaries, Self::Other];

    pub fn label(self) -> &'static str {
        match self {
            Self::Total => "Total",
            Self::Salaries => "Salaries",
            Self::Other => "Other",
        }
    }

    pub fn series(self, node: &BudgetNode) -> &[f64] {
        match self {
            Self::Total => &node.expenditures,
            Self::Salaries => &node.salaries,
            Self::Other => &node.other,
        }
    }

    pub fn value(self, node: &BudgetNode, year_index: usize) -> f64 {
        self.series(node)[year_index]
    }
}

/// The four toggle axes plus the detail selection. One value per axis is always active.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub layout: LayoutMode,
    pub color_scheme: ColorScheme,
    pub scale_variable: ScaleVariable,
    pub year_index: usize,
    /// Index into the node set of the bubble whose detail view is open.
    pub detail_selection: Option<usize>,
}

impl ViewState {
    pub fn initial(year_count: usize) -> Self {
        Self {
            layout: LayoutMode::Grouped,
            color_scheme: ColorScheme::Category,
            scale_variable: ScaleVariable::Total,
            year_index: year_count.saturating_sub(1),
            detail_selection: None,
        }
    }

    pub fn is_detail_open(&self) -> bool {
        self.detail_selection.is_some()
    }
}

/// A single command from the toolbar or the canvas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewCommand {
    SetLayout(LayoutMode),
    SetColorScheme(ColorScheme),
    SetScaleVariable(ScaleVariable),
    SetYear(usize),
    Select(String),
    Deselect,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::fixtures::two_node_set;

    #[test]
    fn initial_state_uses_the_latest_year() {
        let state = ViewState::initial(9);
        assert_eq!(state.layout, LayoutMode::Grouped);
        assert_eq!(state.color_scheme, ColorScheme::Category);
        assert_eq!(state.scale_variable, ScaleVariable::Total);
        assert_eq!(state.year_index, 8);
        assert!(!state.is_detail_open());
    }

    #[test]
    fn scale_variable_reads_the_matching_series() {
        let set = two_node_set();
        let node = &set.nodes[0];
        assert_eq!(ScaleVariable::Total.value(node, 1), 120.0);
        assert_eq!(ScaleVariable::Salaries.value(node, 1), 110.0);
        assert_eq!(ScaleVariable::Other.value(node, 0), 10.0);
    }
}
