use crate::classify::classify_columns;
use crate::data_loader;
use crate::errors::PipelineError;
use crate::export;
use crate::pipeline::{run_pipeline, PipelineOutput, ViewState};
use crate::plan::{ExportProfileItem, Plan};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use tracing::{debug, error, info, warn};

use anyhow::{anyhow, Context, Result};

/// Input spreadsheet path, relative paths resolved against the plan file.
fn input_path(plan: &Plan, plan_file_path: &Path) -> Result<PathBuf> {
    if plan.input.filename.is_empty() {
        return Err(anyhow!("Plan has no input.filename"));
    }
    let parent_dir = plan_file_path
        .parent()
        .ok_or_else(|| anyhow!("Plan file has no parent directory"))?;
    Ok(parent_dir.join(&plan.input.filename))
}

/// Renders one export profile and writes it to disk
fn export_output(output: &PipelineOutput, profile: &ExportProfileItem) -> Result<()> {
    info!(
        "Starting export to file: {} using exporter {}",
        profile.filename,
        profile.exporter.name()
    );

    let rendered = export::render(output, &profile.exporter)
        .with_context(|| format!("Failed to export file {}", profile.filename))?;
    crate::common::write_string_to_file(&profile.filename, &rendered)
        .with_context(|| format!("Failed to write to file {}", profile.filename))?;
    Ok(())
}

/// Executes a single run of the plan. Empty states (no rows, no usable
/// columns for the view) are reported and produce no exports.
pub fn run_plan(plan: &Plan, plan_file_path: &Path) -> Result<()> {
    let input = input_path(plan, plan_file_path)?;
    let sheet = data_loader::load_sheet(&input)
        .with_context(|| format!("Failed to load {}", input.display()))?;
    let state = ViewState::from_plan(plan)?;

    let output = match run_pipeline(&sheet, plan, &state) {
        Ok(output) => output,
        Err(e) if e.is_empty_state() => {
            warn!("Nothing to show in the {} view: {}", state.view, e);
            return Ok(());
        }
        Err(e) => return Err(e).context("Pipeline failed"),
    };

    let mut failed = 0;
    for profile in &plan.export.profiles {
        if let Err(e) = export_output(&output, profile) {
            error!("{:#}", e);
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(anyhow!(
            "{} of {} exports failed",
            failed,
            plan.export.profiles.len()
        ));
    }
    info!(
        "Plan '{}' finished: {} exports written",
        plan.name(),
        plan.export.profiles.len()
    );
    Ok(())
}

/// Main function to execute a plan, with optional file watching
pub fn execute_plan(plan: String, watch: bool) -> Result<()> {
    info!("Executing plan {}", plan);

    let plan_file_path = Path::new(&plan);
    let plan = Plan::load(plan_file_path)
        .with_context(|| format!("Failed to load plan {}", plan_file_path.display()))?;

    debug!("Executing plan: {:?}", plan);

    if watch {
        if let Err(e) = run_plan(&plan, plan_file_path) {
            error!("{:#}", e);
        }
        watch_for_changes(&plan, plan_file_path)?;
    } else {
        run_plan(&plan, plan_file_path)?;
    }

    Ok(())
}

/// Sets up file watching for the input spreadsheet to re-run the plan on
/// changes. Each run replaces the previous run's exports.
///
/// The parent directory is watched so the input is still seen after an
/// editor replaces it with a rename.
fn watch_for_changes(plan: &Plan, plan_file_path: &Path) -> Result<()> {
    let input = input_path(plan, plan_file_path)?;
    let file_name = input
        .file_name()
        .ok_or_else(|| anyhow!("Input path {} has no file name", input.display()))?;
    let watch_dir = match input.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    info!(
        "Watching {} for changes to {}",
        watch_dir.display(),
        input.display()
    );

    let (tx, rx) = channel();
    let mut watcher = RecommendedWatcher::new(tx, Config::default())?;
    watcher.watch(watch_dir, RecursiveMode::NonRecursive)?;

    loop {
        match rx.recv() {
            Ok(Ok(event)) => {
                if touches_input(&event, file_name) {
                    debug!("File modified {:?}", event.paths);
                    info!("Change detected, re-executing plan");
                    if let Err(e) = run_plan(plan, plan_file_path) {
                        error!("{:#}", e);
                    }
                }
            }
            Ok(Err(e)) => error!("Watch error: {:?}", e),
            Err(e) => return Err(anyhow!("Watch channel closed: {}", e)),
        }
    }
}

/// A write, create or rename that lands on the watched input file.
fn touches_input(event: &Event, file_name: &OsStr) -> bool {
    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
        && event
            .paths
            .iter()
            .any(|path| path.file_name() == Some(file_name))
}

/// Column classification table for a spreadsheet, using the plan's
/// classification settings when a plan is given.
pub fn inspect_file(file: &str, plan: Option<&str>) -> Result<String> {
    let plan = match plan {
        Some(path) => Plan::load(Path::new(path))
            .with_context(|| format!("Failed to load plan {}", path))?,
        None => Plan::default(),
    };

    let sheet = data_loader::load_sheet(Path::new(file))
        .with_context(|| format!("Failed to load {}", file))?;
    if sheet.is_empty() {
        return Err(PipelineError::EmptySheet.into());
    }

    let classification = classify_columns(&sheet, &plan.classification);
    let width = classification
        .iter()
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(0)
        .max("column".len());

    let mut table = format!("{:<width$}  kind\n", "column", width = width);
    for (name, kind) in classification.iter() {
        let padding = width - name.chars().count();
        table.push_str(&format!("{}{}  {}\n", name, " ".repeat(padding), kind));
    }
    table.push_str(&format!("\n{}\n", sheet.stats()));
    Ok(table)
}
