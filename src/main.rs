use anyhow::Context;
use clap::Parser;
use postman2gatling::{
    cli::{Cli, Commands},
    commands::{self, ConvertCommandArgs},
    config::OutputPaths,
    telemetry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env values act as defaults for the GATLING_* variables
    dotenv::dotenv().ok();
    telemetry::init_telemetry();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            collection,
            environment,
            output,
            home,
            bodies,
            data,
            simulations,
            template,
        } => {
            let args = ConvertCommandArgs {
                collection,
                environment,
                output,
                paths: OutputPaths::resolve(&home, bodies, data, simulations),
                template,
            };
            commands::execute_convert(&args)
                .await
                .with_context(|| format!("Conversion of {} failed", args.collection.display()))?;
        }
        Commands::List {
            collection,
            environment,
        } => {
            commands::execute_list(&collection, environment.as_deref())
                .await
                .with_context(|| format!("Listing of {} failed", collection.display()))?;
        }
    }

    Ok(())
}
