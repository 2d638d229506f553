use crate::budget::NodeSet;
use crate::util::{format_amount, format_percent};

/// Hover card for one bubble in one fiscal year.
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    pub title: String,
    pub rows: Vec<(&'static str, String)>,
}

impl Tooltip {
    pub fn build(set: &NodeSet, index: usize, year_index: usize) -> Self {
        let node = &set.nodes[index];
        Self {
            title: node.name.clone(),
            rows: vec![
                ("Year", set.axis.calendar_year(year_index).to_string()),
                ("Salaries", format_amount(node.salaries[year_index])),
                ("Other", format_amount(node.other[year_index])),
                ("Total expenditures", format_amount(node.expenditures[year_index])),
                ("Annual growth", format_percent(node.pct_growth[year_index].percent())),
                ("Budget", format_amount(node.budget[year_index])),
                ("Share of total budget", format_percent(node.budget_pct[year_index])),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::fixtures::two_node_set;

    #[test]
    fn first_year_growth_reads_undefined() {
        let set = two_node_set();
        let tooltip = Tooltip::build(&set, 0, 0);

        assert_eq!(tooltip.title, "Alpha");
        assert_eq!(tooltip.rows[0], ("Year", "2016".to_owned()));
        assert_eq!(tooltip.rows[3], ("Total expenditures", "$110".to_owned()));
        assert_eq!(tooltip.rows[4], ("Annual growth", "Undefined".to_owned()));
    }

    #[test]
    fn later_years_show_growth_and_budget_share() {
        let set = two_node_set();
        let tooltip = Tooltip::build(&set, 1, 1);

        assert_eq!(tooltip.title, "Beta");
        assert_eq!(tooltip.rows[4], ("Annual growth", "-18.2%".to_owned()));
        assert_eq!(tooltip.rows[5], ("Budget", "$50".to_owned()));
        assert_eq!(tooltip.rows[6], ("Share of total budget", "27.8%".to_owned()));
    }
}
