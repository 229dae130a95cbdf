use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::graph::Node;

/// A node with its place on the circle.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PositionedNode {
    #[serde(flatten)]
    pub node: Node,
    pub x: f64,
    pub y: f64,
}

/// Spaces the nodes evenly around a circle centred on the origin, node `i`
/// at angle `i * 2π / n`, in the order given.
pub fn circle_layout(nodes: &[Node], radius: f64) -> Vec<PositionedNode> {
    if nodes.is_empty() {
        return Vec::new();
    }

    let step = 2.0 * PI / nodes.len() as f64;
    nodes
        .iter()
        .enumerate()
        .map(|(i, node)| {
            let theta = i as f64 * step;
            PositionedNode {
                node: node.clone(),
                x: radius * theta.cos(),
                y: radius * theta.sin(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(ids: &[&str]) -> Vec<Node> {
        ids.iter()
            .map(|id| Node {
                id: id.to_string(),
                color: "#111".to_string(),
                column: "A".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_empty() {
        assert!(circle_layout(&[], 200.0).is_empty());
    }

    #[test]
    fn test_single_node_sits_at_angle_zero() {
        let positioned = circle_layout(&nodes(&["a"]), 200.0);
        assert_eq!(positioned.len(), 1);
        assert_eq!(positioned[0].x, 200.0);
        assert_eq!(positioned[0].y, 0.0);
    }

    #[test]
    fn test_four_nodes_on_the_axes() {
        let positioned = circle_layout(&nodes(&["a", "b", "c", "d"]), 100.0);
        let expected = [(100.0, 0.0), (0.0, 100.0), (-100.0, 0.0), (0.0, -100.0)];
        for (p, (x, y)) in positioned.iter().zip(expected) {
            assert!((p.x - x).abs() < 1e-9, "{} x = {}", p.node.id, p.x);
            assert!((p.y - y).abs() < 1e-9, "{} y = {}", p.node.id, p.y);
        }
        let ids: Vec<&str> = positioned.iter().map(|p| p.node.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_positioned_node_serializes_flat() {
        let positioned = circle_layout(&nodes(&["a"]), 10.0);
        let json = serde_json::to_value(&positioned[0]).unwrap();
        assert_eq!(json["id"], "a");
        assert_eq!(json["color"], "#111");
        assert_eq!(json["x"], 10.0);
    }
}
