use crate::errors::ExportResult;
use crate::pipeline::PipelineOutput;

use super::csv_common::export_to_csv;

/// Export co-occurrence edges to CSV format
///
/// Repeated pairs are folded into one record whose `weight` counts the rows
/// they appeared in.
pub fn render(output: &PipelineOutput) -> ExportResult<String> {
    let graph = super::require_graph(output, "CSVEdges")?;
    export_to_csv(
        graph.edge_weights(),
        &["source", "target", "weight"],
        |edge| vec![edge.source, edge.target, edge.weight.to_string()],
    )
}
