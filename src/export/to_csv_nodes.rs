use crate::common::format_fixed;
use crate::errors::ExportResult;
use crate::pipeline::PipelineOutput;

use super::csv_common::export_to_csv_sorted;

/// Export positioned nodes to CSV format
///
/// Nodes are sorted by id for consistent output.
pub fn render(output: &PipelineOutput) -> ExportResult<String> {
    let graph = super::require_graph(output, "CSVNodes")?;
    export_to_csv_sorted(
        &graph.nodes,
        &["id", "column", "color", "x", "y"],
        |positioned| positioned.node.id.clone(),
        |positioned| {
            vec![
                positioned.node.id.clone(),
                positioned.node.column.clone(),
                positioned.node.color.clone(),
                format_fixed(positioned.x),
                format_fixed(positioned.y),
            ]
        },
    )
}
