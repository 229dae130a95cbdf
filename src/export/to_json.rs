use crate::errors::ExportResult;
use crate::pipeline::PipelineOutput;

/// The renderer payload of either view, tagged with its `view`.
pub fn render(output: &PipelineOutput) -> ExportResult<String> {
    Ok(serde_json::to_string_pretty(output)?)
}
