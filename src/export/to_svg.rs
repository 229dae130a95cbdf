use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;

use crate::errors::ExportResult;
use crate::pipeline::PipelineOutput;
use crate::table::format_number;

pub const CANVAS_WIDTH: f64 = 860.0;
pub const CANVAS_HEIGHT: f64 = 487.0;
pub const NODE_RADIUS: f64 = 25.0;

#[derive(Serialize)]
struct EdgeLine<'a> {
    source: &'a str,
    target: &'a str,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

/// Static drawing of the circle layout, centred on the canvas. Every edge
/// is drawn, so repeated pairs show up as darker lines.
pub fn render(output: &PipelineOutput) -> ExportResult<String> {
    let graph = super::require_graph(output, "SVG")?;

    let positions: HashMap<&str, (f64, f64)> = graph
        .nodes
        .iter()
        .map(|p| (p.node.id.as_str(), (p.x, p.y)))
        .collect();

    let edges: Vec<EdgeLine> = graph
        .edges
        .iter()
        .filter_map(|edge| {
            let (x1, y1) = positions.get(edge.source.as_str())?;
            let (x2, y2) = positions.get(edge.target.as_str())?;
            Some(EdgeLine {
                source: &edge.source,
                target: &edge.target,
                x1: *x1,
                y1: *y1,
                x2: *x2,
                y2: *y2,
            })
        })
        .collect();

    let handlebars = crate::common::get_handlebars();
    let res = handlebars.render_template(
        &get_template(),
        &json!({
            "width": format_number(CANVAS_WIDTH),
            "height": format_number(CANVAS_HEIGHT),
            "center_x": format_number(CANVAS_WIDTH / 2.0),
            "center_y": format_number(CANVAS_HEIGHT / 2.0),
            "node_radius": format_number(NODE_RADIUS),
            "nodes": graph.nodes,
            "edges": edges,
        }),
    )?;
    Ok(res)
}

pub fn get_template() -> String {
    include_str!("to_svg.hbs").to_string()
}
