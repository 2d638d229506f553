use std::ops::RangeInclusive;

use serde::Serialize;

use crate::budget::{BudgetNode, FiscalYearAxis};

const MILLIONS: f64 = 1_000_000.0;

/// One year of the trend chart, amounts in millions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TrendPoint {
    pub year: i32,
    pub budget: f64,
    pub salaries: f64,
    pub other: f64,
}

/// Everything the detail panel draws for one node.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DetailView {
    pub node_id: String,
    pub name: String,
    pub description: String,
    pub points: Vec<TrendPoint>,
    /// Chronological year range; `None` when the window is empty.
    pub x_domain: Option<RangeInclusive<i32>>,
    /// Min and max over salaries and other only.
    pub y_domain: Option<RangeInclusive<f64>>,
}

impl DetailView {
    pub fn build(node: &BudgetNode, axis: &FiscalYearAxis) -> Self {
        // The first year has no year-over-year context and is left out.
        let points = (1..axis.len())
            .map(|year| TrendPoint {
                year: axis.calendar_year(year),
                budget: node.budget[year] / MILLIONS,
                salaries: node.salaries[year] / MILLIONS,
                other: node.other[year] / MILLIONS,
            })
            .collect::<Vec<_>>();

        let x_domain = match (points.first(), points.last()) {
            (Some(first), Some(last)) => Some(first.year..=last.year),
            _ => None,
        };

        let y_domain = points
            .iter()
            .flat_map(|point| [point.salaries, point.other])
            .fold(None, |domain: Option<(f64, f64)>, value| match domain {
                Some((low, high)) => Some((low.min(value), high.max(value))),
                None => Some((value, value)),
            })
            .map(|(low, high)| low..=high);

        Self {
            node_id: node.id.clone(),
            name: node.name.clone(),
            description: node.description.clone(),
            points,
            x_domain,
            y_domain,
        }
    }
}

/// Holds at most one detail view; showing a node replaces whatever was shown before.
#[derive(Clone, Debug, Default)]
pub struct DetailController {
    current: Option<DetailView>,
}

impl DetailController {
    pub fn show(&mut self, node: &BudgetNode, axis: &FiscalYearAxis) -> &DetailView {
        self.current.insert(DetailView::build(node, axis))
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&DetailView> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::fixtures::{row, two_node_set};
    use crate::budget::{FiscalYearAxis, build_node_set};

    #[test]
    fn window_skips_the_first_year() {
        let set = two_node_set();
        let view = DetailView::build(&set.nodes[0], &set.axis);

        assert_eq!(view.node_id, "A");
        assert_eq!(view.points.len(), 1);
        assert_eq!(view.points[0].year, 2017);
        assert!((view.points[0].salaries - 110.0 / MILLIONS).abs() < 1e-12);
        assert_eq!(view.x_domain, Some(2017..=2017));
    }

    #[test]
    fn y_domain_ignores_the_budget_series() {
        let rows = vec![row(&[
            ("id", "parks"),
            ("category", "X"),
            ("fy15budget", "1"),
            ("fy15salaries", "1"),
            ("fy15other", "1"),
            ("fy16budget", "90000000"),
            ("fy16salaries", "3000000"),
            ("fy16other", "1000000"),
            ("fy17budget", "95000000"),
            ("fy17salaries", "4000000"),
            ("fy17other", "2000000"),
        ])];
        let axis = FiscalYearAxis::from_columns(rows[0].keys().map(String::as_str)).unwrap();
        let set = build_node_set(&rows, axis).unwrap();

        let view = DetailView::build(&set.nodes[0], &set.axis);
        assert_eq!(view.x_domain, Some(2016..=2017));
        assert_eq!(view.y_domain, Some(1.0..=4.0));
        assert_eq!(view.points[1].budget, 95.0);
    }

    #[test]
    fn single_year_has_an_empty_window() {
        let rows = vec![row(&[
            ("id", "solo"),
            ("category", "X"),
            ("fy17budget", "5"),
            ("fy17salaries", "3"),
            ("fy17other", "2"),
        ])];
        let axis = FiscalYearAxis::from_columns(rows[0].keys().map(String::as_str)).unwrap();
        let set = build_node_set(&rows, axis).unwrap();

        let view = DetailView::build(&set.nodes[0], &set.axis);
        assert!(view.points.is_empty());
        assert_eq!(view.x_domain, None);
        assert_eq!(view.y_domain, None);
    }

    #[test]
    fn showing_another_node_replaces_the_previous_view() {
        let set = two_node_set();
        let mut controller = DetailController::default();

        controller.show(&set.nodes[0], &set.axis);
        let view = controller.show(&set.nodes[1], &set.axis);
        assert_eq!(view.node_id, "B");
        assert_eq!(view.points.len(), 1);

        controller.clear();
        assert!(controller.current().is_none());
    }
}
