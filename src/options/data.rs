use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Systems simulated by the stock analysis pipeline.
const DEFAULT_SIMULATIONS: [&str; 6] = [
    "wt",
    "wt_lig",
    "asp84glu",
    "asp84glu_lig",
    "asp294his",
    "asp294his_lig",
];

/// Correlation window sizes (frames per slice) written per replica.
const DEFAULT_WINDOWS: [u32; 7] = [25, 50, 100, 200, 400, 800, 1600];

const DEFAULT_REPLICAS: usize = 5;

/// Identifies one dataset file.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema,
)]
#[schemars(title = "Dataset", inline)]
#[serde(default)]
pub struct DatasetKey {
    /// Simulated system.
    #[schemars(title = "Simulation")]
    pub simulation: String,
    /// Replica within the system.
    #[schemars(title = "Replica")]
    pub replica: String,
    /// File variant (correlation window size).
    #[schemars(title = "Window Size")]
    pub file_variant: String,
}

impl Default for DatasetKey {
    fn default() -> Self {
        Self {
            simulation: DEFAULT_SIMULATIONS[0].to_owned(),
            replica: "1".to_owned(),
            file_variant: DEFAULT_WINDOWS[0].to_string(),
        }
    }
}

impl DatasetKey {
    /// Key from its three parts.
    pub fn new(
        simulation: impl Into<String>,
        replica: impl Into<String>,
        file_variant: impl Into<String>,
    ) -> Self {
        Self {
            simulation: simulation.into(),
            replica: replica.into(),
            file_variant: file_variant.into(),
        }
    }

    /// Expand `{simulation}`, `{replica}` and `{variant}` in `template`.
    #[must_use]
    pub fn expand(&self, template: &str) -> String {
        template
            .replace("{simulation}", &self.simulation)
            .replace("{replica}", &self.replica)
            .replace("{variant}", &self.file_variant)
    }
}

impl std::fmt::Display for DatasetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/rep {}/window {}",
            self.simulation, self.replica, self.file_variant
        )
    }
}

/// One replica and the file variants available for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReplicaEntry {
    /// Replica name.
    pub name: String,
    /// Available file variants.
    pub variants: Vec<String>,
}

/// One simulated system and its replicas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationEntry {
    /// System name.
    pub name: String,
    /// Replicas of this system.
    pub replicas: Vec<ReplicaEntry>,
}

/// Choice tree backing the three dependent dataset selectors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetCatalog {
    /// Available systems.
    pub simulations: Vec<SimulationEntry>,
}

impl Default for DatasetCatalog {
    fn default() -> Self {
        let variants: Vec<String> =
            DEFAULT_WINDOWS.iter().map(ToString::to_string).collect();
        let simulations = DEFAULT_SIMULATIONS
            .iter()
            .map(|name| SimulationEntry {
                name: (*name).to_owned(),
                replicas: (1..=DEFAULT_REPLICAS)
                    .map(|r| ReplicaEntry {
                        name: r.to_string(),
                        variants: variants.clone(),
                    })
                    .collect(),
            })
            .collect();
        Self { simulations }
    }
}

impl DatasetCatalog {
    /// System names in catalog order.
    #[must_use]
    pub fn simulations(&self) -> Vec<&str> {
        self.simulations.iter().map(|s| s.name.as_str()).collect()
    }

    /// Replica names offered for `simulation`.
    #[must_use]
    pub fn replicas(&self, simulation: &str) -> Vec<&str> {
        self.simulation(simulation)
            .map(|s| s.replicas.iter().map(|r| r.name.as_str()).collect())
            .unwrap_or_default()
    }

    /// File variants offered for `simulation` / `replica`.
    #[must_use]
    pub fn variants(&self, simulation: &str, replica: &str) -> Vec<&str> {
        self.replica(simulation, replica)
            .map(|r| r.variants.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Whether every part of `key` is offered.
    #[must_use]
    pub fn contains(&self, key: &DatasetKey) -> bool {
        self.replica(&key.simulation, &key.replica)
            .is_some_and(|r| r.variants.contains(&key.file_variant))
    }

    /// Closest offered key: each part is kept when still offered under the
    /// parts before it and otherwise replaced by the first option.
    ///
    /// Returns `None` when a level has no options at all.
    #[must_use]
    pub fn normalize(&self, key: &DatasetKey) -> Option<DatasetKey> {
        let sim = self
            .simulation(&key.simulation)
            .or_else(|| self.simulations.first())?;
        let rep = sim
            .replicas
            .iter()
            .find(|r| r.name == key.replica)
            .or_else(|| sim.replicas.first())?;
        let variant = rep
            .variants
            .iter()
            .find(|v| **v == key.file_variant)
            .or_else(|| rep.variants.first())?;
        Some(DatasetKey::new(
            sim.name.clone(),
            rep.name.clone(),
            variant.clone(),
        ))
    }

    fn simulation(&self, name: &str) -> Option<&SimulationEntry> {
        self.simulations.iter().find(|s| s.name == name)
    }

    fn replica(&self, simulation: &str, replica: &str) -> Option<&ReplicaEntry> {
        self.simulation(simulation)?
            .replicas
            .iter()
            .find(|r| r.name == replica)
    }
}

/// Where dataset files come from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Data", inline)]
#[serde(default)]
pub struct DataOptions {
    /// Base URL or directory prepended to every dataset path.
    #[schemars(skip)]
    pub base_url: String,
    /// Relative path pattern with `{simulation}`, `{replica}` and
    /// `{variant}` placeholders.
    #[schemars(skip)]
    pub path_template: String,
    /// Active dataset.
    pub dataset: DatasetKey,
    /// Choices offered by the dataset selectors.
    #[schemars(skip)]
    pub catalog: DatasetCatalog,
}

impl Default for DataOptions {
    fn default() -> Self {
        Self {
            base_url: "data".to_owned(),
            path_template: "{simulation}/Rep_{replica}/dccm_data_{variant}.bin"
                .to_owned(),
            dataset: DatasetKey::default(),
            catalog: DatasetCatalog::default(),
        }
    }
}

impl DataOptions {
    /// Location (URL or path) of the file identified by `key`.
    #[must_use]
    pub fn location(&self, key: &DatasetKey) -> String {
        let path = key.expand(&self.path_template);
        let base = self.base_url.trim_end_matches('/');
        if base.is_empty() {
            path
        } else {
            format!("{base}/{path}")
        }
    }

    /// Location of the active dataset.
    #[must_use]
    pub fn active_location(&self) -> String {
        self.location(&self.dataset)
    }
}
