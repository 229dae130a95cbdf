//! One pass from a decoded sheet to renderer-ready data.
//!
//! ```text
//! Sheet ─▶ classify ─▶ transform ─┬─▶ chart rows ─────────────────▶ ChartOutput
//!                                 └─▶ graph rows ─▶ build ─▶ layout ▶ GraphOutput
//! ```
//!
//! Every run is independent; nothing is cached between runs.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::classify::{classify_columns, ColumnClassification};
use crate::errors::{PipelineError, PipelineResult, PlanResult};
use crate::graph::{build_graph, fold_edges, Edge, WeightedEdge};
use crate::layout::{circle_layout, PositionedNode};
use crate::plan::{Palette, Plan};
use crate::table::{is_empty_row, Sheet};
use crate::transform::{
    series_keys, transform_entity, transform_line, CellParseFailure, ChartRow, ViewMode,
};

/// The user's current selection: which view and which palette.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewState {
    pub view: ViewMode,
    pub palette_index: usize,
}

impl ViewState {
    pub fn new(view: ViewMode, palette_index: usize) -> Self {
        Self {
            view,
            palette_index,
        }
    }

    pub fn from_plan(plan: &Plan) -> PlanResult<Self> {
        Ok(Self::new(plan.view, plan.palette_index()?))
    }

    pub fn with_view(self, view: ViewMode) -> Self {
        Self { view, ..self }
    }

    pub fn with_palette(self, palette_index: usize) -> Self {
        Self {
            palette_index,
            ..self
        }
    }

    /// The colours of the selected palette. A missing or empty palette is
    /// [`PipelineError::InvalidPalette`].
    pub fn palette<'a>(&self, palettes: &'a [Palette]) -> PipelineResult<&'a [String]> {
        match palettes.get(self.palette_index) {
            Some(palette) if !palette.colors.is_empty() => Ok(&palette.colors),
            _ => Err(PipelineError::InvalidPalette),
        }
    }
}

/// Line colour for one numerical column.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ChartSeries {
    pub column: String,
    pub color: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ChartOutput {
    pub rows: Vec<ChartRow>,
    pub numerical_columns: Vec<String>,
    pub series: Vec<ChartSeries>,
    pub palette: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub failures: Vec<CellParseFailure>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GraphOutput {
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<Edge>,
}

impl GraphOutput {
    pub fn edge_weights(&self) -> Vec<WeightedEdge> {
        fold_edges(&self.edges)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum PipelineOutput {
    Line(ChartOutput),
    Entity(GraphOutput),
}

impl PipelineOutput {
    pub fn view(&self) -> ViewMode {
        match self {
            PipelineOutput::Line(_) => ViewMode::Line,
            PipelineOutput::Entity(_) => ViewMode::Entity,
        }
    }
}

/// Runs classification, transformation and, for the entity view, graph
/// building and layout.
pub fn run_pipeline(sheet: &Sheet, plan: &Plan, state: &ViewState) -> PipelineResult<PipelineOutput> {
    if sheet.rows.iter().all(is_empty_row) {
        return Err(PipelineError::EmptySheet);
    }
    let palette = state.palette(&plan.palettes)?;

    let classification = classify_columns(sheet, &plan.classification);
    info!(
        "Classified {} columns: {} numerical, {} date, {} categorical",
        classification.len(),
        classification.numerical().len(),
        classification.dates().len(),
        classification.categorical().len()
    );

    match state.view {
        ViewMode::Line => run_line(sheet, &classification, plan, palette).map(PipelineOutput::Line),
        ViewMode::Entity => {
            run_entity(sheet, &classification, plan, palette).map(PipelineOutput::Entity)
        }
    }
}

fn run_line(
    sheet: &Sheet,
    classification: &ColumnClassification,
    plan: &Plan,
    palette: &[String],
) -> PipelineResult<ChartOutput> {
    let transformed = transform_line(sheet, classification, &plan.transform)?;
    let numerical_columns = series_keys(&classification.numerical());
    let series = numerical_columns
        .iter()
        .enumerate()
        .map(|(i, column)| ChartSeries {
            column: column.clone(),
            color: palette[i % palette.len()].clone(),
        })
        .collect();

    if !transformed.failures.is_empty() {
        warn!(
            "{} cells could not be read as numbers ({:?} fallback)",
            transformed.failures.len(),
            plan.transform.cell_fallback
        );
    }
    info!(
        "Line chart ready: {} rows, {} series",
        transformed.rows.len(),
        numerical_columns.len()
    );

    Ok(ChartOutput {
        rows: transformed.rows,
        numerical_columns,
        series,
        palette: palette.to_vec(),
        failures: transformed.failures,
    })
}

fn run_entity(
    sheet: &Sheet,
    classification: &ColumnClassification,
    plan: &Plan,
    palette: &[String],
) -> PipelineResult<GraphOutput> {
    let transformed = transform_entity(sheet, classification)?;
    let graph = build_graph(&transformed.rows, palette)?;

    if let Err(errors) = graph.verify_graph_integrity() {
        warn!("Identified {} graph integrity error(s)", errors.len());
        errors.iter().for_each(|e| warn!("{}", e));
    }

    let nodes = circle_layout(&graph.nodes, plan.layout.radius);
    info!("Entity graph ready: {}", graph.stats());

    Ok(GraphOutput {
        nodes,
        edges: graph.edges,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::CellValue;

    fn sales_sheet() -> Sheet {
        Sheet::from_records(
            vec!["Region".to_string(), "Rep".to_string(), "Sales".to_string()],
            vec![
                vec![Some("East".into()), Some("Alice".into()), Some(CellValue::Number(10.0))],
                vec![Some("East".into()), Some("Bob".into()), Some(CellValue::Number(20.0))],
                vec![Some("West".into()), Some("Alice".into()), Some(CellValue::Number(5.0))],
            ],
        )
    }

    fn plan() -> Plan {
        let mut plan = Plan::default();
        plan.fill_defaults();
        plan
    }

    #[test]
    fn test_entity_pipeline() {
        let state = ViewState::new(ViewMode::Entity, 0);
        let output = run_pipeline(&sales_sheet(), &plan(), &state).unwrap();
        let PipelineOutput::Entity(graph) = output else {
            panic!("expected an entity graph");
        };
        assert_eq!(graph.nodes.len(), 4);
        assert_eq!(graph.edges.len(), 3);
        assert_eq!(graph.nodes[0].x, 200.0);
    }

    #[test]
    fn test_line_pipeline_series_colours() {
        let mut plan = plan();
        plan.palettes = vec![Palette::new("duo", &["#1", "#2"])];
        let output = run_pipeline(&sales_sheet(), &plan, &ViewState::default()).unwrap();
        assert_eq!(output.view(), ViewMode::Line);
        let PipelineOutput::Line(chart) = output else {
            panic!("expected a line chart");
        };
        assert_eq!(chart.numerical_columns, vec!["Sales"]);
        assert_eq!(
            chart.series,
            vec![ChartSeries {
                column: "Sales".to_string(),
                color: "#1".to_string(),
            }]
        );
        assert_eq!(chart.rows[0].name, "East");
        assert!(chart.failures.is_empty());
    }

    #[test]
    fn test_series_named_like_row_label() {
        let sheet = Sheet::from_records(
            vec!["Month".to_string(), "name".to_string()],
            vec![
                vec![Some("Jan".into()), Some(CellValue::Number(3.0))],
                vec![Some("Feb".into()), Some(CellValue::Number(5.0))],
            ],
        );
        let output = run_pipeline(&sheet, &plan(), &ViewState::default()).unwrap();
        let PipelineOutput::Line(chart) = output else {
            panic!("expected a line chart");
        };
        assert_eq!(chart.numerical_columns, vec!["name_1"]);
        assert_eq!(chart.series[0].column, "name_1");
        assert_eq!(chart.rows[1].name, "Feb");
        assert_eq!(chart.rows[1].values.get("name_1"), Some(&5.0));

        let csv = crate::export::to_csv_chart::render(&PipelineOutput::Line(chart)).unwrap();
        assert_eq!(csv, "name,name_1\nJan,3\nFeb,5\n");
    }

    #[test]
    fn test_palette_out_of_range() {
        let state = ViewState::default().with_palette(99);
        let err = run_pipeline(&sales_sheet(), &plan(), &state).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidPalette));
    }

    #[test]
    fn test_empty_sheet_for_both_views() {
        let sheet = Sheet::new(vec!["Region".to_string()], vec![]);
        for view in [ViewMode::Line, ViewMode::Entity] {
            let state = ViewState::default().with_view(view);
            let err = run_pipeline(&sheet, &plan(), &state).unwrap_err();
            assert!(matches!(err, PipelineError::EmptySheet));
        }
    }

    #[test]
    fn test_view_state_from_plan() {
        let mut plan = plan();
        plan.view = ViewMode::Entity;
        plan.palette = Some("earth".to_string());
        let state = ViewState::from_plan(&plan).unwrap();
        assert_eq!(state.view, ViewMode::Entity);
        assert_eq!(state.palette_index, 2);
        assert_eq!(state.palette(&plan.palettes).unwrap()[0], "#78716c");
    }

    #[test]
    fn test_output_serializes_with_view_tag() {
        let state = ViewState::new(ViewMode::Entity, 0);
        let output = run_pipeline(&sales_sheet(), &plan(), &state).unwrap();
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["view"], "entity");
        assert_eq!(json["nodes"][0]["id"], "East");
    }
}
