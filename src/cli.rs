use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Args as ClapArgs, Parser};
use tracing::info;

use crate::budget::{FiscalYearAxis, load_node_set};
use crate::chart::{
    BubbleChart, ChartGeometry, ChartSnapshot, ColorScheme, LayoutMode, ScaleVariable,
    SimulationConfig, ViewCommand,
};

pub const DEFAULT_WIDTH: f32 = 1200.0;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Budget rows as CSV (with a header row) or a JSON array of objects.
    #[arg(long)]
    pub data: PathBuf,

    /// Canvas width in pixels; the height is 5/9 of it.
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: f32,

    /// Settle the layout without a window and print a JSON snapshot.
    #[arg(long)]
    pub headless: bool,

    /// Tick cap for the headless layout.
    #[arg(long, default_value_t = 2000)]
    pub max_ticks: usize,

    #[command(flatten)]
    pub view: ViewArgs,
}

/// Initial toggle values, applied through the view state machine after loading.
#[derive(Clone, Debug, Default, ClapArgs)]
pub struct ViewArgs {
    #[arg(long, value_enum)]
    pub layout: Option<LayoutMode>,

    #[arg(long = "color", value_enum)]
    pub color_scheme: Option<ColorScheme>,

    #[arg(long = "scale", value_enum)]
    pub scale_variable: Option<ScaleVariable>,

    /// Fiscal-year tag such as `fy17`; defaults to the latest year.
    #[arg(long)]
    pub year: Option<String>,
}

impl ViewArgs {
    pub fn commands(&self, axis: &FiscalYearAxis) -> Result<Vec<ViewCommand>> {
        let mut commands = Vec::new();
        if let Some(layout) = self.layout {
            commands.push(ViewCommand::SetLayout(layout));
        }
        if let Some(scheme) = self.color_scheme {
            commands.push(ViewCommand::SetColorScheme(scheme));
        }
        if let Some(variable) = self.scale_variable {
            commands.push(ViewCommand::SetScaleVariable(variable));
        }
        if let Some(tag) = &self.year {
            let index = axis.position(tag).ok_or_else(|| {
                anyhow!(
                    "unknown fiscal year {tag:?}; available: {}",
                    axis.tags().join(", ")
                )
            })?;
            commands.push(ViewCommand::SetYear(index));
        }
        Ok(commands)
    }
}

/// Loads the data file and returns a chart with the requested view applied.
pub fn build_chart(path: &Path, width: f32, view: &ViewArgs) -> Result<BubbleChart> {
    if !(width.is_finite() && width > 0.0) {
        return Err(anyhow!("canvas width must be positive, got {width}"));
    }

    let set = load_node_set(path)?;
    let commands = view.commands(&set.axis)?;
    let mut chart = BubbleChart::new(
        set,
        ChartGeometry::from_width(width),
        SimulationConfig::default(),
    );
    for command in commands {
        chart
            .apply(command)
            .context("failed to apply the initial view")?;
    }
    Ok(chart)
}

pub fn run_headless(args: &Args) -> Result<()> {
    let mut chart = build_chart(&args.data, args.width, &args.view)?;
    let ticks = chart.run_to_convergence(args.max_ticks);
    info!(ticks, "headless layout finished");

    let snapshot = ChartSnapshot::capture(&chart, ticks);
    let json = serde_json::to_string_pretty(&snapshot).context("failed to serialize snapshot")?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn axis() -> FiscalYearAxis {
        FiscalYearAxis::from_columns(["fy16budget", "fy17budget"]).unwrap()
    }

    #[test]
    fn arguments_parse_into_view_commands() {
        let args = Args::try_parse_from([
            "budget-bubbles",
            "--data",
            "rows.csv",
            "--layout",
            "split",
            "--color",
            "growth",
            "--scale",
            "salaries",
            "--year",
            "fy16",
        ])
        .unwrap();

        assert_eq!(args.width, DEFAULT_WIDTH);
        assert!(!args.headless);
        assert_eq!(
            args.view.commands(&axis()).unwrap(),
            vec![
                ViewCommand::SetLayout(LayoutMode::Split),
                ViewCommand::SetColorScheme(ColorScheme::Growth),
                ViewCommand::SetScaleVariable(ScaleVariable::Salaries),
                ViewCommand::SetYear(0),
            ]
        );
    }

    #[test]
    fn unknown_year_is_reported() {
        let view = ViewArgs {
            year: Some("fy99".to_owned()),
            ..ViewArgs::default()
        };
        let error = view.commands(&axis()).unwrap_err();
        assert!(error.to_string().contains("fy16, fy17"));
    }

    #[test]
    fn chart_is_built_from_a_csv_file() {
        let path =
            std::env::temp_dir().join(format!("budget-bubbles-{}.csv", std::process::id()));
        fs::write(
            &path,
            "id,category,name,description,fy16budget,fy16salaries,fy16other,fy17budget,fy17salaries,fy17other\n\
             A,X,Alpha,,120,100,10,130,110,10\n\
             B,Y,Beta,,60,50,5,50,40,5\n",
        )
        .unwrap();

        let view = ViewArgs {
            color_scheme: Some(ColorScheme::Growth),
            ..ViewArgs::default()
        };
        let chart = build_chart(&path, 900.0, &view);
        fs::remove_file(&path).unwrap();

        let chart = chart.unwrap();
        assert_eq!(chart.node_set().len(), 2);
        assert_eq!(chart.state().color_scheme, ColorScheme::Growth);
        assert_eq!(chart.geometry().height, 500.0);
    }

    #[test]
    fn non_positive_width_is_rejected() {
        assert!(build_chart(Path::new("unused.csv"), 0.0, &ViewArgs::default()).is_err());
    }
}
