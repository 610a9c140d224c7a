mod case;
mod error;
mod report;

use case::Case;
use clap::{Parser, Subcommand};
use error::{CliError, CliResult};
use ff_network::{LegBalance, calc_fluxes_parallel};
use ff_thermo::ThermoSystem;
use report::{NodeReport, RunReport};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ff-cli")]
#[command(about = "filmflow CLI - two-phase pipe legs with interphase transfer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a case file and build its leg without solving
    Validate {
        /// Path to the case YAML file
        case_path: PathBuf,
    },
    /// Solve every node of the case's leg
    Run {
        /// Path to the case YAML file
        case_path: PathBuf,
        /// Print results as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { case_path } => cmd_validate(&case_path),
        Commands::Run { case_path, json } => cmd_run(&case_path, json),
    }
}

fn cmd_validate(case_path: &Path) -> CliResult<()> {
    println!("Validating case: {}", case_path.display());
    let case = Case::load(case_path)?;
    let mut prepared = case.prepare()?;
    let nodes = prepared.leg.create_flow_nodes()?.len();
    println!(
        "✓ Case '{}' is valid ({} components, {} nodes, {} boundary)",
        case.name,
        prepared.model.num_components(),
        nodes,
        prepared.leg.boundary_template().kind()
    );
    Ok(())
}

fn cmd_run(case_path: &Path, json: bool) -> CliResult<()> {
    let case = Case::load(case_path)?;
    let mut prepared = case.prepare()?;
    let model = &prepared.model;
    let leg = &mut prepared.leg;
    leg.create_flow_nodes()?;

    if case.equilibrate {
        for node in leg.nodes_mut() {
            node.equilibrate(model)?;
        }
    }

    let results = calc_fluxes_parallel(leg.nodes_mut(), model);
    let total = results.len();
    let mut errors = results.into_iter().filter_map(Result::err);
    if let Some(first) = errors.next() {
        return Err(CliError::NodesFailed {
            failed: 1 + errors.count(),
            total,
            first,
        });
    }

    let balance = LegBalance::from_nodes(leg.nodes())?;
    info!(case = %case.name, nodes = total, "leg solved");

    let report = RunReport {
        case: case.name.clone(),
        boundary: leg.boundary_template().kind().to_string(),
        phase: leg.boundary_template().phase(),
        components: model.components().iter().map(|c| c.name.clone()).collect(),
        nodes: leg.nodes().iter().filter_map(NodeReport::from_node).collect(),
        balance,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.to_table());
    }
    Ok(())
}
