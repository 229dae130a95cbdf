use serde_json::json;

use crate::errors::ExportResult;
use crate::pipeline::PipelineOutput;

/// Graphviz document for `neato -n`: nodes pinned at their circle
/// positions, one undirected edge per distinct pair with the pen width set
/// to the pair's weight.
pub fn render(output: &PipelineOutput) -> ExportResult<String> {
    let graph = super::require_graph(output, "DOT")?;

    let mut handlebars = crate::common::get_handlebars();
    handlebars.register_escape_fn(escape_dot);

    let res = handlebars.render_template(
        &get_template(),
        &json!({
            "name": "sheetgraph",
            "nodes": graph.nodes,
            "edges": graph.edge_weights(),
        }),
    )?;
    Ok(res)
}

pub fn get_template() -> String {
    include_str!("to_dot.hbs").to_string()
}

fn escape_dot(data: &str) -> String {
    data.replace('\\', "\\\\").replace('"', "\\\"")
}
