use anyhow::Result;
use clap::{Parser, Subcommand};
use sheetgraph::{common, plan, plan_execution};
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the plan's spreadsheet and write every export
    Run {
        #[clap(short, long)]
        plan: String,
        /// Re-run whenever the spreadsheet changes
        #[clap(short, long)]
        watch: bool,
    },
    /// Write a starter plan file
    Init {
        #[clap(short, long)]
        plan: String,
    },
    /// Print how each column of a spreadsheet is classified
    Inspect {
        file: String,
        #[clap(short, long)]
        plan: Option<String>,
    },
}

fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    match args.command {
        Commands::Run { plan, watch } => {
            info!("Running plan: {}", plan);
            plan_execution::execute_plan(plan, watch)?;
        }
        Commands::Init { plan } => {
            info!("Initializing plan: {}", plan);
            let plan_file_path = plan;
            let plan = plan::Plan::sample();
            let serialized_plan = serde_yaml::to_string(&plan)?;
            common::write_string_to_file(&plan_file_path, &serialized_plan)?;
        }
        Commands::Inspect { file, plan } => {
            info!("Inspecting: {}", file);
            let table = plan_execution::inspect_file(&file, plan.as_deref())?;
            print!("{}", table);
        }
    }

    Ok(())
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("handlebars=off,{}", log_level)))
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
