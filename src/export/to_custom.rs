use serde_json::{json, Value};
use std::fs;
use tracing::error;

use crate::errors::{ExportError, ExportResult};
use crate::pipeline::PipelineOutput;
use crate::plan::CustomExportProfile;

/// Renders a user template against either view.
///
/// Entity view templates see `nodes`, `edges` and `weighted_edges`; line
/// view templates see `rows`, `numerical_columns`, `series` and `palette`.
/// Both see `view`.
pub fn render(output: &PipelineOutput, params: &CustomExportProfile) -> ExportResult<String> {
    let mut handlebars = crate::common::get_handlebars();

    if let Some(partials) = &params.partials {
        for (name, partial) in partials {
            let partial_content = fs::read_to_string(partial).map_err(|err| {
                error!("Failed to read partial file '{}': {}", partial, err);
                ExportError::Template(format!(
                    "Failed to read partial file '{}': {}",
                    partial, err
                ))
            })?;
            if let Err(err) = handlebars.register_partial(name, partial_content) {
                error!("Failed to register partial '{}': {}", name, err);
            }
        }
    }

    let template_content = fs::read_to_string(&params.template).map_err(|err| {
        ExportError::Template(format!(
            "Failed to read template file '{}': {}",
            params.template, err
        ))
    })?;

    let res = handlebars.render_template(&template_content, &template_context(output))?;
    Ok(res)
}

fn template_context(output: &PipelineOutput) -> Value {
    match output {
        PipelineOutput::Entity(graph) => json!({
            "view": output.view(),
            "nodes": graph.nodes,
            "edges": graph.edges,
            "weighted_edges": graph.edge_weights(),
        }),
        PipelineOutput::Line(chart) => json!({
            "view": output.view(),
            "rows": chart.rows,
            "numerical_columns": chart.numerical_columns,
            "series": chart.series,
            "palette": chart.palette,
        }),
    }
}
