use eframe::egui::{Vec2, vec2};
use serde::Serialize;
use tracing::{debug, info};

use super::color::{BubblePaint, CategoryPalette, LegendEntry, growth_legend, growth_paint};
use super::detail::{DetailController, DetailView};
use super::error::ChartError;
use super::geometry::ChartGeometry;
use super::physics::{Simulation, SimulationConfig, TargetForce};
use super::radius::RadiusScale;
use super::tooltip::Tooltip;
use super::view_state::{ColorScheme, LayoutMode, ScaleVariable, ViewCommand, ViewState};
use crate::budget::{BudgetNode, NodeSet};
use crate::util::stable_pair;

/// Outcome of one command against the view state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Ignored: toggles are disabled while the detail view is open.
    Locked,
    /// The requested value was already active.
    Unchanged,
    Applied { restarted: bool },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryTitle {
    pub label: String,
    pub x: f32,
    pub y: f32,
}

/// Per-node render data for the current frame.
#[derive(Clone, Copy, Debug)]
pub struct Bubble<'a> {
    pub index: usize,
    pub node: &'a BudgetNode,
    pub position: Vec2,
    pub radius: f32,
    pub paint: BubblePaint,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BubbleVisual {
    radius: f32,
    paint: BubblePaint,
}

/// The bubble chart engine: owns the node set, the force layout and the view state,
/// and applies toolbar and canvas commands atomically between ticks.
pub struct BubbleChart {
    set: NodeSet,
    geometry: ChartGeometry,
    config: SimulationConfig,
    radius_scale: RadiusScale,
    palette: CategoryPalette,
    state: ViewState,
    visuals: Vec<BubbleVisual>,
    simulation: Simulation,
    detail: DetailController,
}

impl BubbleChart {
    pub fn new(set: NodeSet, geometry: ChartGeometry, config: SimulationConfig) -> Self {
        let radius_scale = RadiusScale::new(set.max_latest_expenditures(), geometry.height);
        let palette = CategoryPalette::new(&set.categories());
        let state = ViewState::initial(set.axis.len());

        let size = geometry.size();
        let positions = set
            .nodes
            .iter()
            .map(|node| {
                let (x, y) = stable_pair(&node.id);
                vec2(x * size.x, y * size.y)
            })
            .collect::<Vec<_>>();

        let mut chart = Self {
            simulation: Simulation::new(
                config,
                geometry.canvas_center(),
                positions,
                vec![0.0; set.len()],
                TargetForce::Shared(geometry.shared_center()),
            ),
            set,
            geometry,
            config,
            radius_scale,
            palette,
            state,
            visuals: Vec::new(),
            detail: DetailController::default(),
        };

        chart.visuals = chart.compute_visuals();
        let charges = chart.charges();
        chart.simulation.set_charges(charges);
        info!(
            nodes = chart.set.len(),
            years = chart.set.axis.len(),
            categories = chart.palette.categories().len(),
            domain_max = chart.radius_scale.domain_max(),
            radius_range = ?chart.radius_scale.range(),
            "bubble chart ready"
        );
        chart
    }

    pub fn node_set(&self) -> &NodeSet {
        &self.set
    }

    pub fn geometry(&self) -> ChartGeometry {
        self.geometry
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn radius_scale(&self) -> RadiusScale {
        self.radius_scale
    }

    pub fn detail(&self) -> Option<&DetailView> {
        self.detail.current()
    }

    /// One layout step. The layout holds still while the detail view is open.
    pub fn tick(&mut self) -> bool {
        if self.state.is_detail_open() {
            return false;
        }
        self.simulation.tick()
    }

    pub fn run_to_convergence(&mut self, max_ticks: usize) -> usize {
        if self.state.is_detail_open() {
            return 0;
        }
        let ticks = self.simulation.run_to_convergence(max_ticks);
        info!(ticks, alpha = self.simulation.alpha(), "layout settled");
        ticks
    }

    pub fn apply(&mut self, command: ViewCommand) -> Result<Transition, ChartError> {
        Ok(match command {
            ViewCommand::SetLayout(layout) => self.set_layout(layout),
            ViewCommand::SetColorScheme(scheme) => self.set_color_scheme(scheme),
            ViewCommand::SetScaleVariable(variable) => self.set_scale_variable(variable),
            ViewCommand::SetYear(year_index) => self.set_year(year_index),
            ViewCommand::Select(id) => return self.select(&id),
            ViewCommand::Deselect => self.deselect(),
        })
    }

    pub fn set_layout(&mut self, layout: LayoutMode) -> Transition {
        if let Some(locked) = self.guard("layout") {
            return locked;
        }
        if self.state.layout == layout {
            return Transition::Unchanged;
        }

        let previous = self.state.layout;
        self.state.layout = layout;
        let target = self.target_force();
        self.simulation.set_target(target);
        info!(from = ?previous, to = ?layout, "layout changed");
        Transition::Applied { restarted: true }
    }

    pub fn set_color_scheme(&mut self, scheme: ColorScheme) -> Transition {
        if let Some(locked) = self.guard("color scheme") {
            return locked;
        }
        if self.state.color_scheme == scheme {
            return Transition::Unchanged;
        }

        let previous = self.state.color_scheme;
        self.state.color_scheme = scheme;
        self.visuals = self.compute_visuals();
        info!(from = ?previous, to = ?scheme, "color scheme changed");
        Transition::Applied { restarted: false }
    }

    pub fn set_scale_variable(&mut self, variable: ScaleVariable) -> Transition {
        if let Some(locked) = self.guard("scale variable") {
            return locked;
        }
        if self.state.scale_variable == variable {
            return Transition::Unchanged;
        }

        let previous = self.state.scale_variable;
        self.state.scale_variable = variable;
        self.resize();
        info!(from = ?previous, to = ?variable, "scale variable changed");
        Transition::Applied { restarted: true }
    }

    /// Panics if `year_index` is outside the fiscal-year axis.
    pub fn set_year(&mut self, year_index: usize) -> Transition {
        assert!(
            year_index < self.set.axis.len(),
            "year index {year_index} out of range for {} fiscal years",
            self.set.axis.len()
        );
        if let Some(locked) = self.guard("year") {
            return locked;
        }
        if self.state.year_index == year_index {
            return Transition::Unchanged;
        }

        let previous = self.state.year_index;
        self.state.year_index = year_index;
        self.resize();
        info!(
            from = self.set.axis.tag(previous),
            to = self.set.axis.tag(year_index),
            "year changed"
        );
        Transition::Applied { restarted: true }
    }

    /// Opens the detail view for `id`, replacing any detail already shown.
    pub fn select(&mut self, id: &str) -> Result<Transition, ChartError> {
        let index = self
            .set
            .index_of(id)
            .ok_or_else(|| ChartError::UnknownNode { id: id.to_owned() })?;
        if self.state.detail_selection == Some(index) {
            return Ok(Transition::Unchanged);
        }

        self.state.detail_selection = Some(index);
        self.detail.show(&self.set.nodes[index], &self.set.axis);
        info!(id, alpha = self.simulation.alpha(), "detail view opened");
        Ok(Transition::Applied { restarted: false })
    }

    pub fn deselect(&mut self) -> Transition {
        let Some(index) = self.state.detail_selection.take() else {
            return Transition::Unchanged;
        };

        self.detail.clear();
        info!(id = %self.set.nodes[index].id, "detail view closed");
        Transition::Applied { restarted: false }
    }

    pub fn toggles_enabled(&self) -> bool {
        !self.state.is_detail_open()
    }

    pub fn tooltip_enabled(&self) -> bool {
        !self.state.is_detail_open()
    }

    pub fn tooltip(&self, index: usize) -> Option<Tooltip> {
        (self.tooltip_enabled() && index < self.set.len())
            .then(|| Tooltip::build(&self.set, index, self.state.year_index))
    }

    /// Bubbles in draw order: largest first, so smaller ones paint on top.
    pub fn bubbles(&self) -> impl Iterator<Item = Bubble<'_>> + '_ {
        self.set
            .nodes
            .iter()
            .zip(self.simulation.positions())
            .zip(&self.visuals)
            .enumerate()
            .map(|(index, ((node, position), visual))| Bubble {
                index,
                node,
                position: *position,
                radius: visual.radius,
                paint: visual.paint,
            })
    }

    /// Topmost bubble under `point` in canvas coordinates.
    pub fn bubble_at(&self, point: Vec2) -> Option<usize> {
        self.bubbles()
            .filter(|bubble| (bubble.position - point).length() <= bubble.radius)
            .last()
            .map(|bubble| bubble.index)
    }

    pub fn legend(&self) -> Vec<LegendEntry> {
        match self.state.color_scheme {
            ColorScheme::Category => self.palette.legend(),
            ColorScheme::Growth => growth_legend(),
        }
    }

    pub fn category_titles(&self) -> Vec<CategoryTitle> {
        if self.state.layout == LayoutMode::Grouped {
            return Vec::new();
        }

        let slots = self.palette.categories().len();
        self.palette
            .categories()
            .iter()
            .enumerate()
            .map(|(slot, label)| {
                let anchor = self.geometry.category_title(slot, slots);
                CategoryTitle {
                    label: label.clone(),
                    x: anchor.x,
                    y: anchor.y,
                }
            })
            .collect()
    }

    /// Current charge per node, derived from the displayed radii.
    pub fn charges(&self) -> Vec<f32> {
        self.visuals
            .iter()
            .map(|visual| RadiusScale::charge(visual.radius))
            .collect()
    }

    fn guard(&self, axis: &'static str) -> Option<Transition> {
        if self.state.is_detail_open() {
            debug!(axis, "toggle ignored while the detail view is open");
            return Some(Transition::Locked);
        }
        None
    }

    fn resize(&mut self) {
        self.visuals = self.compute_visuals();
        let charges = self.charges();
        self.simulation.set_charges(charges);
    }

    fn compute_visuals(&self) -> Vec<BubbleVisual> {
        let year = self.state.year_index;
        self.set
            .nodes
            .iter()
            .map(|node| BubbleVisual {
                radius: self
                    .radius_scale
                    .radius(self.state.scale_variable.value(node, year)),
                paint: match self.state.color_scheme {
                    ColorScheme::Category => self.palette.paint(&node.category),
                    ColorScheme::Growth => growth_paint(node.pct_growth[year]),
                },
            })
            .collect()
    }

    fn target_force(&self) -> TargetForce {
        match self.state.layout {
            LayoutMode::Grouped => TargetForce::Shared(self.geometry.shared_center()),
            LayoutMode::Split => {
                let slots = self.palette.categories().len();
                let anchors = self
                    .set
                    .nodes
                    .iter()
                    .map(|node| {
                        let slot = self.palette.slot(&node.category).unwrap_or_default();
                        self.geometry.category_center(slot, slots)
                    })
                    .collect();
                TargetForce::PerNode {
                    anchors,
                    boost: self.config.split_boost,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::Color32;

    use super::*;
    use crate::budget::fixtures::{
        DEPARTMENT, NON_DEPARTMENTAL, axis_for, four_node_set, row, two_node_set,
    };
    use crate::budget::{FiscalYearAxis, build_node_set};

    fn build_chart(set: NodeSet) -> BubbleChart {
        BubbleChart::new(set, ChartGeometry::from_width(1200.0), SimulationConfig::default())
    }

    fn centroid(chart: &BubbleChart, category: Option<&str>) -> Vec2 {
        let points = chart
            .bubbles()
            .filter(|bubble| category.is_none_or(|category| bubble.node.category == category))
            .map(|bubble| bubble.position)
            .collect::<Vec<_>>();
        points.iter().fold(Vec2::ZERO, |sum, point| sum + *point) / points.len() as f32
    }

    fn assert_charges_track_radii(chart: &BubbleChart) {
        let year = chart.state().year_index;
        let variable = chart.state().scale_variable;
        for (bubble, charge) in chart.bubbles().zip(chart.simulation().charges()) {
            let expected_radius = chart.radius_scale().radius(variable.value(bubble.node, year));
            assert_eq!(bubble.radius, expected_radius);
            assert_eq!(*charge, -(expected_radius * expected_radius) / 8.0);
        }
    }

    #[test]
    fn growth_colors_follow_the_worked_example() {
        let mut chart = build_chart(two_node_set());
        assert_eq!(chart.state().year_index, 1);

        assert_eq!(
            chart.set_color_scheme(ColorScheme::Growth),
            Transition::Applied { restarted: false }
        );
        let paints = chart.bubbles().map(|bubble| bubble.paint).collect::<Vec<_>>();
        let (a, b) = (paints[0].fill, paints[1].fill);
        assert!(a.g() > a.r() && a.g() > a.b(), "A should be green-tinted: {a:?}");
        assert!(b.r() > b.g() && b.r() > b.b(), "B should be red-tinted: {b:?}");

        chart.set_year(0);
        for bubble in chart.bubbles() {
            assert_eq!(bubble.paint.fill, Color32::BLACK);
            assert_eq!(bubble.paint.stroke, Color32::BLACK);
        }
        assert_eq!(chart.legend().last().map(|entry| entry.label.as_str()), Some("Undefined"));
    }

    #[test]
    fn color_scheme_change_does_not_restart_the_layout() {
        let mut chart = build_chart(two_node_set());
        chart.run_to_convergence(2000);
        let restarts = chart.simulation().restarts();
        let positions = chart.simulation().positions().to_vec();

        chart.set_color_scheme(ColorScheme::Growth);
        assert_eq!(chart.simulation().restarts(), restarts);
        assert!(!chart.simulation().is_running());
        assert_eq!(chart.simulation().positions(), positions.as_slice());
    }

    #[test]
    fn charges_are_recomputed_for_year_and_scale_changes() {
        let mut chart = build_chart(two_node_set());
        assert_charges_track_radii(&chart);
        chart.run_to_convergence(2000);

        assert_eq!(chart.set_year(0), Transition::Applied { restarted: true });
        assert_eq!(chart.simulation().alpha(), 1.0);
        assert_charges_track_radii(&chart);

        let before = chart.charges();
        chart.set_scale_variable(ScaleVariable::Other);
        assert_charges_track_radii(&chart);
        assert_ne!(chart.charges(), before);

        // A: salaries 100 of a 120 domain in the first year.
        chart.set_scale_variable(ScaleVariable::Salaries);
        let radius = chart.bubbles().next().map(|bubble| bubble.radius).unwrap();
        let expected = 3.0 + (chart.geometry().height / 7.5 - 3.0) * (100.0f32 / 120.0).sqrt();
        assert!((radius - expected).abs() < 1e-3);
    }

    #[test]
    fn reapplying_the_active_value_is_a_no_op() {
        let mut chart = build_chart(two_node_set());
        let restarts = chart.simulation().restarts();

        assert_eq!(chart.set_layout(LayoutMode::Grouped), Transition::Unchanged);
        assert_eq!(chart.set_year(1), Transition::Unchanged);
        assert_eq!(chart.set_scale_variable(ScaleVariable::Total), Transition::Unchanged);
        assert_eq!(chart.deselect(), Transition::Unchanged);
        assert_eq!(chart.simulation().restarts(), restarts);
    }

    #[test]
    fn selection_locks_every_toggle_until_exit() {
        let mut chart = build_chart(two_node_set());
        assert_eq!(
            chart.apply(ViewCommand::Select("B".to_owned())),
            Ok(Transition::Applied { restarted: false })
        );
        assert!(!chart.toggles_enabled());
        assert!(chart.tooltip(0).is_none());
        assert_eq!(chart.detail().map(|view| view.node_id.as_str()), Some("B"));

        let before = chart.state().clone();
        let restarts = chart.simulation().restarts();
        for command in [
            ViewCommand::SetLayout(LayoutMode::Split),
            ViewCommand::SetColorScheme(ColorScheme::Growth),
            ViewCommand::SetScaleVariable(ScaleVariable::Other),
            ViewCommand::SetYear(0),
        ] {
            assert_eq!(chart.apply(command), Ok(Transition::Locked));
        }
        assert_eq!(chart.state(), &before);
        assert_eq!(chart.simulation().restarts(), restarts);
        assert!(!chart.tick());

        assert_eq!(
            chart.apply(ViewCommand::Deselect),
            Ok(Transition::Applied { restarted: false })
        );
        assert!(chart.detail().is_none());
        assert!(chart.tooltip(0).is_some());
        assert_eq!(
            chart.set_layout(LayoutMode::Split),
            Transition::Applied { restarted: true }
        );
    }

    #[test]
    fn selecting_an_unknown_id_fails() {
        let mut chart = build_chart(two_node_set());
        assert_eq!(
            chart.select("missing"),
            Err(ChartError::UnknownNode { id: "missing".to_owned() })
        );
        assert!(!chart.state().is_detail_open());
    }

    #[test]
    fn selecting_another_node_replaces_the_detail() {
        let mut chart = build_chart(two_node_set());
        chart.select("A").unwrap();
        assert_eq!(chart.select("A"), Ok(Transition::Unchanged));
        chart.select("B").unwrap();
        assert_eq!(chart.detail().map(|view| view.name.as_str()), Some("Beta"));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_year_is_a_contract_violation() {
        let mut chart = build_chart(two_node_set());
        chart.set_year(2);
    }

    #[test]
    fn layout_toggles_converge_on_their_anchors() {
        let mut chart = build_chart(four_node_set());
        let geometry = chart.geometry();

        chart.run_to_convergence(2000);
        assert!(!chart.simulation().is_running());
        let grouped = centroid(&chart, None);
        assert!(
            (grouped - geometry.shared_center()).length() < 60.0,
            "grouped at {grouped:?}"
        );
        assert!(chart.category_titles().is_empty());

        chart.set_layout(LayoutMode::Split);
        chart.run_to_convergence(2000);
        let department = centroid(&chart, Some(DEPARTMENT));
        let other = centroid(&chart, Some(NON_DEPARTMENTAL));
        assert!(
            (department - geometry.category_center(0, 2)).length() < 80.0,
            "department at {department:?}"
        );
        assert!(
            (other - geometry.category_center(1, 2)).length() < 80.0,
            "non-departmental at {other:?}"
        );
        assert!(other.x - department.x > 200.0);

        let titles = chart.category_titles();
        assert_eq!(titles.len(), 2);
        assert_eq!(titles[0].label, DEPARTMENT);

        chart.set_layout(LayoutMode::Grouped);
        chart.run_to_convergence(2000);
        let regrouped = centroid(&chart, None);
        assert!((regrouped - geometry.shared_center()).length() < 60.0);
    }

    #[test]
    fn lone_category_keeps_its_own_anchor() {
        let rows = vec![row(&[
            ("id", "debt"),
            ("category", NON_DEPARTMENTAL),
            ("fy16budget", "100"),
            ("fy16salaries", "10"),
            ("fy16other", "80"),
            ("fy17budget", "100"),
            ("fy17salaries", "10"),
            ("fy17other", "85"),
        ])];
        let axis = axis_for(&rows);
        let mut chart = build_chart(build_node_set(&rows, axis).unwrap());
        let width = chart.geometry().width;

        chart.set_layout(LayoutMode::Split);
        chart.run_to_convergence(2000);
        let position = chart.bubbles().next().unwrap().position;
        assert!((position.x - width * 0.47).abs() < 40.0, "settled at {position:?}");

        let titles = chart.category_titles();
        assert_eq!(titles.len(), 2);
        assert_eq!(titles[1].label, NON_DEPARTMENTAL);
        assert!((titles[1].x - width * 0.52).abs() < 1e-3);
    }

    #[test]
    fn hit_testing_prefers_the_topmost_bubble() {
        let mut chart = build_chart(four_node_set());
        chart.run_to_convergence(2000);

        let last = chart.bubbles().last().unwrap();
        assert_eq!(chart.bubble_at(last.position), Some(last.index));
        assert_eq!(chart.bubble_at(vec2(-500.0, -500.0)), None);
    }

    #[test]
    fn empty_dataset_is_a_valid_chart() {
        let axis = FiscalYearAxis::from_columns(["fy16budget", "fy17budget"]).unwrap();
        let mut chart = build_chart(build_node_set(&[], axis).unwrap());

        assert!(!chart.tick());
        assert_eq!(chart.run_to_convergence(100), 0);
        let labels = chart
            .legend()
            .into_iter()
            .map(|entry| entry.label)
            .collect::<Vec<_>>();
        assert_eq!(labels, [DEPARTMENT, NON_DEPARTMENTAL]);
        assert_eq!(
            chart.set_layout(LayoutMode::Split),
            Transition::Applied { restarted: true }
        );
        assert_eq!(chart.category_titles().len(), 2);
        assert_eq!(
            chart.set_color_scheme(ColorScheme::Growth),
            Transition::Applied { restarted: false }
        );
        assert_eq!(chart.legend().len(), 10);
    }
}
