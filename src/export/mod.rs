mod csv_common;
pub mod to_csv_chart;
pub mod to_csv_edges;
pub mod to_csv_nodes;
pub mod to_custom;
pub mod to_dot;
pub mod to_json;
pub mod to_svg;

use crate::errors::{ExportError, ExportResult};
use crate::pipeline::{ChartOutput, GraphOutput, PipelineOutput};
use crate::plan::ExportFileType;

/// Renders the pipeline output with the given exporter.
pub fn render(output: &PipelineOutput, exporter: &ExportFileType) -> ExportResult<String> {
    match exporter {
        ExportFileType::JSON => to_json::render(output),
        ExportFileType::CSVNodes => to_csv_nodes::render(output),
        ExportFileType::CSVEdges => to_csv_edges::render(output),
        ExportFileType::CSVChart => to_csv_chart::render(output),
        ExportFileType::DOT => to_dot::render(output),
        ExportFileType::SVG => to_svg::render(output),
        ExportFileType::Custom(params) => to_custom::render(output, params),
    }
}

/// The entity graph, or [`ExportError::UnsupportedExport`] in line view.
pub(crate) fn require_graph<'a>(
    output: &'a PipelineOutput,
    exporter: &str,
) -> ExportResult<&'a GraphOutput> {
    match output {
        PipelineOutput::Entity(graph) => Ok(graph),
        PipelineOutput::Line(_) => Err(unsupported(exporter, output)),
    }
}

/// The chart rows, or [`ExportError::UnsupportedExport`] in entity view.
pub(crate) fn require_chart<'a>(
    output: &'a PipelineOutput,
    exporter: &str,
) -> ExportResult<&'a ChartOutput> {
    match output {
        PipelineOutput::Line(chart) => Ok(chart),
        PipelineOutput::Entity(_) => Err(unsupported(exporter, output)),
    }
}

fn unsupported(exporter: &str, output: &PipelineOutput) -> ExportError {
    ExportError::UnsupportedExport {
        exporter: exporter.to_string(),
        view: output.view().to_string(),
    }
}
