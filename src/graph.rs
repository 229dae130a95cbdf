use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::errors::{PipelineError, PipelineResult};
use crate::transform::GraphRow;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// A distinct categorical value. `column` is where the value was first
/// seen; the colour follows that column.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    pub color: String,
    pub column: String,
}

/// Two values that appeared in the same row.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    pub source: String,
    pub target: String,
}

/// An unordered value pair with the number of rows it appeared in.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct WeightedEdge {
    pub source: String,
    pub target: String,
    pub weight: usize,
}

impl Graph {
    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn stats(&self) -> String {
        format!(
            "Nodes: {}, Edges: {}, Distinct pairs: {}",
            self.nodes.len(),
            self.edges.len(),
            self.edge_weights().len()
        )
    }

    pub fn edge_weights(&self) -> Vec<WeightedEdge> {
        fold_edges(&self.edges)
    }

    pub fn verify_graph_integrity(&self) -> Result<(), Vec<String>> {
        let mut node_ids: HashSet<&str> = HashSet::new();
        let mut errors = Vec::new();

        for node in &self.nodes {
            if !node_ids.insert(node.id.as_str()) {
                errors.push(format!("Node id {:?} is not unique", node.id));
            }
        }

        for (i, edge) in self.edges.iter().enumerate() {
            if !node_ids.contains(edge.source.as_str()) {
                errors.push(format!(
                    "Edge {} source {:?} not found in nodes",
                    i, edge.source
                ));
            }
            if !node_ids.contains(edge.target.as_str()) {
                errors.push(format!(
                    "Edge {} target {:?} not found in nodes",
                    i, edge.target
                ));
            }
            if edge.source == edge.target {
                errors.push(format!("Edge {} is a self-edge on {:?}", i, edge.source));
            }
        }

        if errors.is_empty() {
            debug!("All edges have valid source and target nodes");
            Ok(())
        } else {
            warn!("Graph integrity check found {} problems", errors.len());
            Err(errors)
        }
    }
}

/// Folds repeated pairs, in either direction, into one weighted edge
/// keeping the orientation of the first occurrence. The input is untouched.
pub fn fold_edges(edges: &[Edge]) -> Vec<WeightedEdge> {
    let mut pairs: IndexMap<(&str, &str), WeightedEdge> = IndexMap::new();
    for edge in edges {
        let key = if edge.source <= edge.target {
            (edge.source.as_str(), edge.target.as_str())
        } else {
            (edge.target.as_str(), edge.source.as_str())
        };
        pairs
            .entry(key)
            .and_modify(|weighted| weighted.weight += 1)
            .or_insert_with(|| WeightedEdge {
                source: edge.source.clone(),
                target: edge.target.clone(),
                weight: 1,
            });
    }
    pairs.into_values().collect()
}

/// Builds the co-occurrence graph.
///
/// The first pass records, for every distinct trimmed value, the column it
/// was first seen in. The second pass creates nodes in that order, coloured
/// by the ordinal of their first-seen column among all such columns, and
/// joins every pair of distinct values within each row with an edge.
/// Repeated pairs across rows are kept.
pub fn build_graph(rows: &[GraphRow], palette: &[String]) -> PipelineResult<Graph> {
    if palette.is_empty() {
        return Err(PipelineError::InvalidPalette);
    }

    // value -> first-seen column
    let mut first_seen: IndexMap<&str, &str> = IndexMap::new();
    for row in rows {
        for (column, value) in row_values(row) {
            first_seen.entry(value).or_insert(column);
        }
    }

    let mut column_index: IndexMap<&str, usize> = IndexMap::new();
    for column in first_seen.values() {
        let next = column_index.len();
        column_index.entry(*column).or_insert(next);
    }

    let mut graph = Graph::default();
    let mut created: HashSet<&str> = HashSet::new();

    for row in rows {
        let distinct: IndexSet<&str> = row_values(row).map(|(_, value)| value).collect();

        for &value in &distinct {
            if created.insert(value) {
                let column = first_seen.get(value).copied().unwrap_or_default();
                let ordinal = column_index.get(column).copied().unwrap_or_default();
                graph.nodes.push(Node {
                    id: value.to_string(),
                    color: palette[ordinal % palette.len()].clone(),
                    column: column.to_string(),
                });
            }
        }

        let values: Vec<&str> = distinct.into_iter().collect();
        for (i, source) in values.iter().enumerate() {
            for target in &values[i + 1..] {
                graph.edges.push(Edge {
                    source: source.to_string(),
                    target: target.to_string(),
                });
            }
        }
    }

    debug!(
        "Built graph from {} rows over {} columns: {}",
        rows.len(),
        column_index.len(),
        graph.stats()
    );
    Ok(graph)
}

fn row_values(row: &GraphRow) -> impl Iterator<Item = (&str, &str)> {
    row.fields.iter().filter_map(|(column, value)| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some((column.as_str(), trimmed))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[(&str, &str)]) -> GraphRow {
        GraphRow {
            name: fields.first().map(|(_, v)| v.to_string()).unwrap_or_default(),
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn palette(colors: &[&str]) -> Vec<String> {
        colors.iter().map(|c| c.to_string()).collect()
    }

    fn region_rep_rows() -> Vec<GraphRow> {
        vec![
            row(&[("Region", "East"), ("Rep", "Alice")]),
            row(&[("Region", "East"), ("Rep", "Bob")]),
            row(&[("Region", "West"), ("Rep", "Alice")]),
        ]
    }

    #[test]
    fn test_region_rep_graph() {
        let graph = build_graph(&region_rep_rows(), &palette(&["#a", "#b"])).unwrap();

        let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["East", "Alice", "Bob", "West"]);
        assert_eq!(
            graph.edges,
            vec![
                Edge { source: "East".into(), target: "Alice".into() },
                Edge { source: "East".into(), target: "Bob".into() },
                Edge { source: "West".into(), target: "Alice".into() },
            ]
        );
        assert_eq!(graph.get_node("East").unwrap().color, "#a");
        assert_eq!(graph.get_node("Bob").unwrap().color, "#b");
        assert_eq!(graph.get_node("West").unwrap().column, "Region");
        assert!(graph.verify_graph_integrity().is_ok());
    }

    #[test]
    fn test_single_colour_palette_wraps() {
        let rows = vec![row(&[("A", "x"), ("B", "y"), ("C", "z")])];
        let graph = build_graph(&rows, &palette(&["#111"])).unwrap();
        assert_eq!(graph.nodes.len(), 3);
        assert!(graph.nodes.iter().all(|n| n.color == "#111"));
    }

    #[test]
    fn test_empty_palette() {
        let err = build_graph(&region_rep_rows(), &[]).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidPalette));
    }

    #[test]
    fn test_value_in_two_columns_keeps_first_column() {
        let rows = vec![
            row(&[("Buyer", "Acme"), ("Seller", "Globex")]),
            row(&[("Buyer", "Initech"), ("Seller", "Acme")]),
        ];
        let graph = build_graph(&rows, &palette(&["#1", "#2"])).unwrap();
        let acme = graph.get_node("Acme").unwrap();
        assert_eq!(acme.column, "Buyer");
        assert_eq!(acme.color, "#1");
        assert_eq!(graph.nodes.len(), 3);
    }

    #[test]
    fn test_values_are_trimmed_and_deduplicated_within_row() {
        let rows = vec![row(&[("A", " x "), ("B", "x"), ("C", "y"), ("D", "  ")])];
        let graph = build_graph(&rows, &palette(&["#1"])).unwrap();
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].source, "x");
    }

    #[test]
    fn test_edge_count_per_row() {
        let rows = vec![
            row(&[("A", "a")]),
            row(&[("A", "a"), ("B", "b"), ("C", "c"), ("D", "d")]),
        ];
        let graph = build_graph(&rows, &palette(&["#1"])).unwrap();
        assert_eq!(graph.edges.len(), 6);
    }

    #[test]
    fn test_edge_weights_fold_repeated_pairs() {
        let rows = vec![
            row(&[("A", "p"), ("B", "q")]),
            row(&[("A", "q"), ("B", "p")]),
            row(&[("A", "p"), ("B", "r")]),
        ];
        let graph = build_graph(&rows, &palette(&["#1"])).unwrap();
        assert_eq!(graph.edges.len(), 3);
        assert_eq!(
            graph.edge_weights(),
            vec![
                WeightedEdge { source: "p".into(), target: "q".into(), weight: 2 },
                WeightedEdge { source: "p".into(), target: "r".into(), weight: 1 },
            ]
        );
    }

    #[test]
    fn test_verify_graph_integrity_reports_dangling_edges() {
        let graph = Graph {
            nodes: vec![
                Node { id: "a".into(), color: "#1".into(), column: "A".into() },
                Node { id: "a".into(), color: "#1".into(), column: "A".into() },
            ],
            edges: vec![Edge { source: "a".into(), target: "missing".into() }],
        };
        let errors = graph.verify_graph_integrity().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("not unique"));
        assert!(errors[1].contains("\"missing\""));
    }

    #[test]
    fn test_no_rows_gives_empty_graph() {
        let graph = build_graph(&[], &palette(&["#1"])).unwrap();
        assert!(graph.nodes.is_empty());
        assert!(graph.edges.is_empty());
        assert_eq!(graph.stats(), "Nodes: 0, Edges: 0, Distinct pairs: 0");
    }
}
