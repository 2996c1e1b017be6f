use crate::models::{Capture, RequestModel};
use crate::pending::PendingWork;
use crate::simulation::Simulation;
use crate::warnings::Warnings;
use crate::Result;
use colored::*;
use std::path::Path;

use super::convert::print_warnings;

pub async fn execute_list(collection_path: &Path, environment_path: Option<&Path>) -> Result<()> {
    println!("{}", "Loading Postman collection...".bright_blue());
    println!("  Path: {}", collection_path.display());

    let warnings = Warnings::new();
    let mut simulation = Simulation::new(warnings.clone(), PendingWork::new());
    simulation.load_environment(environment_path).await?;
    simulation.load_collection(collection_path).await?;
    simulation.build_feeder()?;
    simulation.build_requests()?;

    println!("\n{}", "✓ Collection loaded successfully".green());
    if let Some(name) = simulation.name() {
        println!("  Simulation: {}", name.bold());
    }
    println!("  Variables: {}", simulation.feeder().len());
    for (key, value) in simulation.feeder().iter() {
        println!("    {} = {}", key.cyan(), value);
    }
    println!();

    let requests = simulation.requests();
    if requests.is_empty() {
        println!("{}", "No requests found".yellow());
        print_warnings(&warnings);
        return Ok(());
    }

    println!("{}", format!("Requests ({}):", requests.len()).bold());
    for (idx, request) in requests.iter().enumerate() {
        println!();
        print_request(idx + 1, request);
    }

    print_warnings(&warnings);
    Ok(())
}

fn print_request(position: usize, request: &RequestModel) {
    println!(
        "  {}. {} {}",
        position,
        request.method.to_uppercase().bright_cyan(),
        request.name.bold()
    );
    println!("     URL: {}", request.url);

    if let Some(ref auth) = request.auth {
        println!("     Auth: {} ({})", auth.kind, auth.user);
    }

    if !request.headers.is_empty() {
        println!("     Headers: {}", request.headers.len());
    }

    if let Some(ref body) = request.body {
        println!("     Body: {}", body.filename.bright_yellow());
    }

    let checks = &request.checks;
    if checks.is_empty() {
        return;
    }

    println!("     Checks: {}", checks.len());
    if !checks.status.is_empty() {
        let codes: Vec<String> = checks.status.iter().map(|c| c.to_string()).collect();
        println!("       status in {}", codes.join(", "));
    }
    for code in &checks.not_status {
        println!("       status not {}", code);
    }
    for pattern in &checks.body_has {
        println!("       body matches {}", pattern);
    }
    for capture in &checks.captures {
        let source = match capture {
            Capture::Literal { value, .. } => format!("\"{}\"", value),
            Capture::Json { path, .. } => format!("$.{}", path),
        };
        println!("       save {} from {}", capture.name().cyan(), source);
    }
}
