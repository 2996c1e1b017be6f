use std::path::{Path, PathBuf};

/// Default Gatling home when neither `--home` nor `GATLING_HOME` is set
pub const DEFAULT_GATLING_HOME: &str = "./gatling";

/// Built-in scenario template, used when no template file is given
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/simulation.scala");

/// Output directories of a conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// Root of request body files; each simulation gets a sub-directory
    pub bodies: PathBuf,
    /// Directory of feeder documents
    pub data: PathBuf,
    /// Directory of generated scenarios
    pub simulations: PathBuf,
}

impl OutputPaths {
    /// Standard Gatling layout under `home`
    pub fn from_home(home: impl AsRef<Path>) -> Self {
        let user_files = home.as_ref().join("user-files");
        Self {
            bodies: user_files.join("bodies"),
            data: user_files.join("data"),
            simulations: user_files.join("simulations"),
        }
    }

    /// Layout under `home`, with explicit directories taking precedence
    pub fn resolve(
        home: impl AsRef<Path>,
        bodies: Option<PathBuf>,
        data: Option<PathBuf>,
        simulations: Option<PathBuf>,
    ) -> Self {
        let defaults = Self::from_home(home);
        Self {
            bodies: bodies.unwrap_or(defaults.bodies),
            data: data.unwrap_or(defaults.data),
            simulations: simulations.unwrap_or(defaults.simulations),
        }
    }

    /// Scenario file for the simulation
    pub fn scenario_file(&self, simulation_name: &str) -> PathBuf {
        self.simulations.join(format!("{}.scala", simulation_name))
    }

    /// Feeder document for the simulation
    pub fn feeder_file(&self, simulation_name: &str) -> PathBuf {
        self.data.join(format!("{}.json", simulation_name))
    }

    /// Directory holding the simulation's body files
    pub fn bodies_dir(&self, simulation_name: &str) -> PathBuf {
        self.bodies.join(simulation_name)
    }
}
