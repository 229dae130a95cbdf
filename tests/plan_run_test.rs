mod common;

use std::fs;
use std::path::Path;

use common::{line_chart_sample, region_rep_sample};
use sheetgraph::plan_execution::execute_plan;

fn write_plan(dir: &Path, body: &str) -> String {
    let plan_path = dir.join("plan.yaml");
    fs::write(&plan_path, body).unwrap();
    plan_path.to_str().unwrap().to_string()
}

#[test]
fn test_entity_plan_writes_every_export() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("sales.xlsx"), region_rep_sample()).unwrap();
    let out = dir.path().join("out");

    let plan = write_plan(
        dir.path(),
        &format!(
            r#"
meta:
  name: Regions
input:
  filename: sales.xlsx
view: entity
export:
  profiles:
    - filename: {out}/graph.json
      exporter: JSON
    - filename: {out}/nodes.csv
      exporter: CSVNodes
    - filename: {out}/edges.csv
      exporter: CSVEdges
    - filename: {out}/graph.dot
      exporter: DOT
    - filename: {out}/graph.svg
      exporter: SVG
"#,
            out = out.display()
        ),
    );

    execute_plan(plan, false).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("graph.json")).unwrap()).unwrap();
    assert_eq!(json["view"], "entity");
    assert_eq!(json["nodes"].as_array().unwrap().len(), 4);
    assert_eq!(json["edges"].as_array().unwrap().len(), 3);

    let nodes = fs::read_to_string(out.join("nodes.csv")).unwrap();
    assert_eq!(nodes.lines().count(), 5);

    let edges = fs::read_to_string(out.join("edges.csv")).unwrap();
    assert_eq!(
        edges,
        "source,target,weight\nEast,Alice,1\nEast,Bob,1\nWest,Alice,1\n"
    );

    let dot = fs::read_to_string(out.join("graph.dot")).unwrap();
    assert!(dot.contains("\"East\" -- \"Bob\""));

    let svg = fs::read_to_string(out.join("graph.svg")).unwrap();
    assert_eq!(svg.matches("<circle ").count(), 4);
}

#[test]
fn test_line_plan_writes_chart_csv() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("daily.xlsx"), line_chart_sample()).unwrap();
    let chart = dir.path().join("chart.csv");

    let plan = write_plan(
        dir.path(),
        &format!(
            r#"
input:
  filename: daily.xlsx
export:
  profiles:
    - filename: {chart}
      exporter: CSVChart
"#,
            chart = chart.display()
        ),
    );

    execute_plan(plan, false).unwrap();

    let csv = fs::read_to_string(chart).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "name,Value1,Value2");
    assert_eq!(lines[1], "2024-01-01,120,600");
    assert_eq!(lines.len(), 11);
}

#[test]
fn test_graph_exporter_in_line_view_fails() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("daily.xlsx"), line_chart_sample()).unwrap();
    let svg = dir.path().join("graph.svg");
    let json = dir.path().join("chart.json");

    let plan = write_plan(
        dir.path(),
        &format!(
            r#"
input:
  filename: daily.xlsx
view: line
export:
  profiles:
    - filename: {svg}
      exporter: SVG
    - filename: {json}
      exporter: JSON
"#,
            svg = svg.display(),
            json = json.display()
        ),
    );

    let err = execute_plan(plan, false).unwrap_err();
    assert_eq!(err.to_string(), "1 of 2 exports failed");
    assert!(!svg.exists());
    assert!(json.exists());
}

#[test]
fn test_empty_sheet_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("empty.csv"), "Region,Rep\n").unwrap();
    let out = dir.path().join("graph.json");

    let plan = write_plan(
        dir.path(),
        &format!(
            r#"
input:
  filename: empty.csv
view: entity
export:
  profiles:
    - filename: {out}
      exporter: JSON
"#,
            out = out.display()
        ),
    );

    execute_plan(plan, false).unwrap();
    assert!(!out.exists());
}

#[test]
fn test_unknown_palette_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let plan = write_plan(
        dir.path(),
        r#"
input:
  filename: sales.xlsx
palette: neon
"#,
    );

    let err = execute_plan(plan, false).unwrap_err();
    assert!(format!("{:#}", err).contains("Palette 'neon' not found"));
}

#[test]
fn test_unsupported_input_extension() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("notes.txt"), "hello").unwrap();
    let plan = write_plan(
        dir.path(),
        r#"
input:
  filename: notes.txt
"#,
    );

    let err = execute_plan(plan, false).unwrap_err();
    assert!(format!("{:#}", err).contains("Unsupported format"));
}
