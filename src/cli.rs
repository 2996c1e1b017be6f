use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_GATLING_HOME;

#[derive(Parser)]
#[command(name = "postman2gatling")]
#[command(version)]
#[command(about = "Convert Postman collections into Gatling simulations", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a Gatling simulation from a Postman collection
    Convert {
        /// Export of a Postman collection in JSON format
        #[arg(short, long)]
        collection: PathBuf,

        /// Export of a Postman environment in JSON format
        #[arg(short, long)]
        environment: Option<PathBuf>,

        /// Simulation name (defaults to the collection name)
        #[arg(short, long)]
        output: Option<String>,

        /// Gatling home directory, base of the bodies, data and simulations paths
        #[arg(short = 'H', long, env = "GATLING_HOME", default_value = DEFAULT_GATLING_HOME)]
        home: PathBuf,

        /// Directory where request bodies are written
        #[arg(short, long, env = "GATLING_BODIES")]
        bodies: Option<PathBuf>,

        /// Directory where the feeder file is written
        #[arg(short, long, env = "GATLING_DATA")]
        data: Option<PathBuf>,

        /// Directory where the scenario is written
        #[arg(short, long, env = "GATLING_SIMULATIONS")]
        simulations: Option<PathBuf>,

        /// Scala template of the scenario (built-in template if not specified)
        #[arg(short, long, env = "GATLING_TEMPLATE")]
        template: Option<PathBuf>,
    },

    /// List the requests of a collection as they would be generated
    List {
        /// Export of a Postman collection in JSON format
        #[arg(short, long)]
        collection: PathBuf,

        /// Export of a Postman environment in JSON format
        #[arg(short, long)]
        environment: Option<PathBuf>,
    },
}
