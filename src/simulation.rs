//! Conversion pipeline of one Postman collection
//!
//! A [`Simulation`] moves through its states strictly in order: inputs are
//! loaded, the feeder is built, requests are analyzed, and finally the
//! scenario, feeder and body files are generated.

use crate::analyzer::{RequestAnalyzer, safe_filename};
use crate::config::{DEFAULT_TEMPLATE, OutputPaths};
use crate::converters::{Converter, GatlingConverter, RenderContext};
use crate::error::{ConvertError, Result};
use crate::loader;
use crate::models::{Collection, EnvironmentEntry, RequestModel};
use crate::pending::PendingWork;
use crate::variable::{Feeder, build_feeder};
use crate::warnings::Warnings;
use std::path::{Path, PathBuf};

/// Indentation depth of request blocks inside the scenario template
const REQUEST_INDENT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationState {
    Empty,
    Loaded,
    FeederBuilt,
    RequestsBuilt,
    Generated,
}

impl std::fmt::Display for SimulationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulationState::Empty => write!(f, "empty"),
            SimulationState::Loaded => write!(f, "loaded"),
            SimulationState::FeederBuilt => write!(f, "feeder built"),
            SimulationState::RequestsBuilt => write!(f, "requests built"),
            SimulationState::Generated => write!(f, "generated"),
        }
    }
}

/// Files produced by [`Simulation::generate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub simulation_name: String,
    pub scenario_path: PathBuf,
    /// Only set when the environment had enabled entries
    pub feeder_path: Option<PathBuf>,
    pub request_count: usize,
}

pub struct Simulation {
    output_name: Option<String>,
    environment: Vec<EnvironmentEntry>,
    collection: Option<Collection>,
    feeder: Feeder,
    requests: Vec<RequestModel>,
    state: SimulationState,
    warnings: Warnings,
    pending: PendingWork,
}

impl Simulation {
    pub fn new(warnings: Warnings, pending: PendingWork) -> Self {
        Self {
            output_name: None,
            environment: Vec::new(),
            collection: None,
            feeder: Feeder::default(),
            requests: Vec::new(),
            state: SimulationState::Empty,
            warnings,
            pending,
        }
    }

    /// Use `name` instead of the collection name for the generated files
    pub fn with_output_name(mut self, name: Option<String>) -> Self {
        self.output_name = name;
        self
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    /// Simulation name: the explicit output name or the collection name,
    /// made safe for file and class names
    pub fn name(&self) -> Option<String> {
        self.output_name
            .as_deref()
            .or_else(|| self.collection.as_ref().map(|c| c.name.as_str()))
            .map(simulation_name)
    }

    pub fn feeder(&self) -> &Feeder {
        &self.feeder
    }

    /// Analyzed requests in generation order
    pub fn requests(&self) -> &[RequestModel] {
        &self.requests
    }

    pub fn warnings(&self) -> &Warnings {
        &self.warnings
    }

    /// Load environment entries, before or after the collection. Without a
    /// path the feeder stays empty.
    pub async fn load_environment(&mut self, path: Option<&Path>) -> Result<()> {
        if self.state != SimulationState::Loaded {
            self.expect_state(SimulationState::Empty, "load the environment")?;
        }

        if let Some(path) = path {
            self.environment = loader::load_environment(path).await?;
        }
        Ok(())
    }

    pub async fn load_collection(&mut self, path: &Path) -> Result<()> {
        self.expect_state(SimulationState::Empty, "load the collection")?;

        self.collection = Some(loader::load_collection(path).await?);
        self.state = SimulationState::Loaded;
        Ok(())
    }

    pub fn build_feeder(&mut self) -> Result<()> {
        self.expect_state(SimulationState::Loaded, "build the feeder")?;

        self.feeder = build_feeder(&self.environment)?;
        tracing::info!("Feeder built with {} variable(s)", self.feeder.len());

        self.state = SimulationState::FeederBuilt;
        Ok(())
    }

    /// Analyze every request: folders sorted by name first, then the
    /// collection root
    pub fn build_requests(&mut self) -> Result<()> {
        self.expect_state(SimulationState::FeederBuilt, "build the requests")?;

        let collection = self
            .collection
            .as_ref()
            .ok_or_else(|| ConvertError::InvalidState("no collection loaded".to_string()))?;

        let mut folders: Vec<_> = collection.folders.iter().collect();
        folders.sort_by(|a, b| a.name.cmp(&b.name));

        let orders = folders
            .iter()
            .map(|folder| (folder.name.as_str(), folder.order.as_slice()))
            .chain(std::iter::once((
                collection.name.as_str(),
                collection.order.as_slice(),
            )));

        let analyzer = RequestAnalyzer::new(&self.warnings);
        let mut requests = Vec::new();
        for (container, order) in orders {
            for id in order {
                let raw = collection.find_request(id).ok_or_else(|| {
                    ConvertError::RequestNotFound(format!(
                        "'{}' referenced by '{}'",
                        id, container
                    ))
                })?;
                requests.push(analyzer.analyze(raw));
            }
        }

        tracing::info!("Built {} request(s)", requests.len());
        self.requests = requests;
        self.state = SimulationState::RequestsBuilt;
        Ok(())
    }

    /// Write the scenario, the feeder and the body files, then wait for
    /// every deferred file operation.
    ///
    /// Uses the built-in template when `template` is `None`.
    pub async fn generate(
        &mut self,
        paths: &OutputPaths,
        template: Option<&Path>,
    ) -> Result<GenerationReport> {
        self.expect_state(SimulationState::RequestsBuilt, "generate")?;

        let name = self
            .name()
            .ok_or_else(|| ConvertError::InvalidState("no collection loaded".to_string()))?;

        let bodies_dir = paths.bodies_dir(&name);
        tokio::fs::create_dir_all(&bodies_dir).await.map_err(|e| {
            ConvertError::OutputError(format!(
                "Failed to create directory {}: {}",
                bodies_dir.display(),
                e
            ))
        })?;

        let template = match template {
            Some(path) => tokio::fs::read_to_string(path).await.map_err(|e| {
                ConvertError::TemplateLoadError(format!(
                    "Failed to read file {}: {}",
                    path.display(),
                    e
                ))
            })?,
            None => DEFAULT_TEMPLATE.to_string(),
        };

        let feeder_path = (!self.feeder.is_empty()).then(|| paths.feeder_file(&name));

        let ctx = RenderContext {
            simulation_name: &name,
            bodies_path: &paths.bodies,
            indent: REQUEST_INDENT,
            pending: &self.pending,
            warnings: &self.warnings,
        };
        let converter = GatlingConverter::new();
        let feed = feeder_path
            .as_ref()
            .map(|_| converter.feed_step(&name, REQUEST_INDENT))
            .unwrap_or_default();
        let requests = converter.convert_requests(&self.requests, &ctx);
        let scenario = fill_template(&template, &name, &feed, &requests);

        let scenario_path = paths.scenario_file(&name);

        tracing::info!("Generating Gatling scenario for {}", name);
        let written = tokio::try_join!(
            write_output(&scenario_path, scenario),
            self.write_feeder(feeder_path.as_deref()),
        );

        // Body checks still report into the warnings when an output write failed
        self.pending.join().await;
        written?;
        self.state = SimulationState::Generated;

        Ok(GenerationReport {
            simulation_name: name,
            scenario_path,
            feeder_path,
            request_count: self.requests.len(),
        })
    }

    async fn write_feeder(&self, path: Option<&Path>) -> Result<()> {
        let Some(path) = path else {
            return Ok(());
        };

        tracing::info!("Generating Gatling environment file {}", path.display());
        let document = self.feeder.to_document()?;
        write_output(path, document).await
    }

    fn expect_state(&self, expected: SimulationState, action: &str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ConvertError::InvalidState(format!(
                "cannot {} while the simulation is {}",
                action, self.state
            )))
        }
    }
}

/// Substitute every `{{outputName}}`, then the first `{{feeder}}` and the
/// first `{{requests}}`
pub fn fill_template(
    template: &str,
    simulation_name: &str,
    feeder: &str,
    requests: &str,
) -> String {
    template
        .replace("{{outputName}}", simulation_name)
        .replacen("{{feeder}}", feeder, 1)
        .replacen("{{requests}}", requests, 1)
}

/// Simulation name usable as a Scala class name and as a file name
fn simulation_name(name: &str) -> String {
    let name = safe_filename(name);
    match name.chars().next() {
        Some(first) if !first.is_ascii_digit() => name,
        _ => format!("_{}", name),
    }
}

/// Write `content` to `path`, creating the parent directory when missing
async fn write_output(path: &Path, content: String) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            ConvertError::OutputError(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    tokio::fs::write(path, content).await.map_err(|e| {
        ConvertError::OutputError(format!("Failed to write file {}: {}", path.display(), e))
    })
}
