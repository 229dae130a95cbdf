use crate::errors::ExportResult;
use crate::pipeline::PipelineOutput;
use crate::table::format_number;

use super::csv_common::export_to_csv;

/// Export chart rows to CSV: `name` followed by one column per series.
pub fn render(output: &PipelineOutput) -> ExportResult<String> {
    let chart = super::require_chart(output, "CSVChart")?;

    let mut headers = vec!["name"];
    headers.extend(chart.numerical_columns.iter().map(String::as_str));

    export_to_csv(chart.rows.iter(), &headers, |row| {
        let mut record = vec![row.name.clone()];
        record.extend(chart.numerical_columns.iter().map(|column| {
            row.values
                .get(column)
                .map(|v| format_number(*v))
                .unwrap_or_default()
        }));
        record
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::fixtures::{chart_output, graph_output};

    #[test]
    fn test_chart_csv() {
        let csv = render(&chart_output()).unwrap();
        assert_eq!(
            csv,
            "name,Sales,Cost\n2024-01-01,10,3\n2024-01-02,12.5,4\n"
        );
    }

    #[test]
    fn test_chart_csv_needs_line_view() {
        let err = render(&graph_output()).unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_EXPORT");
    }
}
