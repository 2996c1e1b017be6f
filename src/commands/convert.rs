//! Convert command implementation
//!
//! Converts a Postman collection (and optional environment) to a Gatling
//! scenario, its feeder and its body files.

use crate::config::OutputPaths;
use crate::error::Result;
use crate::pending::PendingWork;
use crate::simulation::Simulation;
use crate::warnings::Warnings;
use colored::Colorize;
use std::path::PathBuf;

/// Arguments of the convert command
#[derive(Debug, Clone)]
pub struct ConvertCommandArgs {
    pub collection: PathBuf,
    pub environment: Option<PathBuf>,
    pub output: Option<String>,
    pub paths: OutputPaths,
    pub template: Option<PathBuf>,
}

/// Execute the convert command
pub async fn execute_convert(args: &ConvertCommandArgs) -> Result<()> {
    let warnings = Warnings::new();
    let mut simulation = Simulation::new(warnings.clone(), PendingWork::new())
        .with_output_name(args.output.clone());

    let result = run(&mut simulation, args).await;

    // Warnings collected before a failure are still worth reporting
    print_warnings(&warnings);
    result
}

async fn run(simulation: &mut Simulation, args: &ConvertCommandArgs) -> Result<()> {
    simulation
        .load_environment(args.environment.as_deref())
        .await?;
    if let Some(ref path) = args.environment {
        println!("{} Loaded environment: {}", "✓".green(), path.display());
    }

    simulation.load_collection(&args.collection).await?;
    println!(
        "{} Loaded collection: {}",
        "✓".green(),
        args.collection.display()
    );

    simulation.build_feeder()?;
    simulation.build_requests()?;

    let report = simulation
        .generate(&args.paths, args.template.as_deref())
        .await?;

    println!(
        "{} Generated Gatling scenario: {}",
        "✓".green(),
        report.scenario_path.display()
    );
    if let Some(ref feeder) = report.feeder_path {
        println!("{} Generated feeder: {}", "✓".green(), feeder.display());
    }
    println!(
        "  Simulation: {} ({} request(s))",
        report.simulation_name.bold(),
        report.request_count
    );
    println!(
        "  Bodies: {}",
        args.paths.bodies_dir(&report.simulation_name).display()
    );

    Ok(())
}

/// Print and log collected warnings, oldest first
pub fn print_warnings(warnings: &Warnings) {
    if warnings.is_empty() {
        return;
    }

    println!();
    println!("{}", "! Warnings:".yellow());
    warnings.drain(|message| {
        tracing::warn!("{}", message);
        println!("  - {}", message.yellow());
    });
}
