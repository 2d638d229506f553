use serde::Serialize;

use super::color::{LegendEntry, hex};
use super::machine::{BubbleChart, CategoryTitle};
use super::view_state::ViewState;

#[derive(Debug, Serialize)]
pub struct BubbleSnapshot {
    pub id: String,
    pub category: String,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub fill: String,
    pub stroke: String,
}

/// Serializable picture of the chart after the layout has settled.
#[derive(Debug, Serialize)]
pub struct ChartSnapshot {
    pub width: f32,
    pub height: f32,
    pub fiscal_year: String,
    pub view: ViewState,
    pub alpha: f32,
    pub ticks: usize,
    pub legend: Vec<LegendEntry>,
    pub category_titles: Vec<CategoryTitle>,
    pub bubbles: Vec<BubbleSnapshot>,
}

impl ChartSnapshot {
    pub fn capture(chart: &BubbleChart, ticks: usize) -> Self {
        let geometry = chart.geometry();
        let state = chart.state();
        let axis = &chart.node_set().axis;

        Self {
            width: geometry.width,
            height: geometry.height,
            fiscal_year: axis.tag(state.year_index).to_owned(),
            view: state.clone(),
            alpha: chart.simulation().alpha(),
            ticks,
            legend: chart.legend(),
            category_titles: chart.category_titles(),
            bubbles: chart
                .bubbles()
                .map(|bubble| BubbleSnapshot {
                    id: bubble.node.id.clone(),
                    category: bubble.node.category.clone(),
                    x: bubble.position.x,
                    y: bubble.position.y,
                    radius: bubble.radius,
                    fill: hex(bubble.paint.fill),
                    stroke: hex(bubble.paint.stroke),
                })
                .collect(),
        }
    }
}
