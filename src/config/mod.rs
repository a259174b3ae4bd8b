use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error;

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::headers::{AliasTable, Field};

pub mod error;
pub use error::ConfigError;

pub mod season_policy;
pub use season_policy::SeasonPolicy;

const DEFAULT_EXECUTABLE: &str = "smarts295bat";
const DEFAULT_INPUT_DIR: &str = "data/smarts_inp";
const DEFAULT_OUTPUT_DIR: &str = "data/smarts_out";
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Physical-model parameters written into every input document.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ModelSettings {
    pub co2_ppm: f64,
    pub aerosol_model: String,
    pub tau550: f64,
    pub albedo: f64,
    /// Daily mean temperature (°C) of card 3a.
    pub daytime_temperature: f64,
    pub comment_tag: String,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            co2_ppm: 427.0,
            aerosol_model: "S&F_RURAL".to_string(),
            tau550: 0.2,
            albedo: 0.25,
            daytime_temperature: 25.0,
            comment_tag: "allbirds".to_string(),
        }
    }
}

impl ModelSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.tau550.is_nan() || self.tau550 < 0.0 {
            return Err(ConfigError::Tau550(self.tau550));
        }
        if !(0.0..=1.0).contains(&self.albedo) {
            return Err(ConfigError::Albedo(self.albedo));
        }
        for label in [&self.aerosol_model, &self.comment_tag] {
            if label.is_empty() || label.contains(|c: char| c.is_whitespace() || c == '\'') {
                return Err(ConfigError::Label(label.clone()));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    smarts_dir: PathBuf,
    executable: String,
    input_dir: PathBuf,
    output_dir: PathBuf,
    results_file: Option<PathBuf>,
    timeout: Duration,
    season_policy: SeasonPolicy,
    model: ModelSettings,
    aliases: AliasTable,
}

// Deserializes a Config, checking the timeout, the model settings and the
// field names used in extra_aliases.
impl<'de> Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ConfigHelper {
            smarts_dir: PathBuf,
            executable: Option<String>,
            input_dir: Option<PathBuf>,
            output_dir: Option<PathBuf>,
            results_file: Option<PathBuf>,
            timeout_secs: Option<u64>,
            #[serde(default)]
            season_policy: SeasonPolicy,
            #[serde(default)]
            model: ModelSettings,
            #[serde(default)]
            extra_aliases: HashMap<String, Vec<String>>,
        }

        let helper = ConfigHelper::deserialize(deserializer)?;

        let executable = helper
            .executable
            .unwrap_or_else(|| DEFAULT_EXECUTABLE.to_string());
        if executable.trim().is_empty() {
            return Err(D::Error::custom(ConfigError::Executable));
        }

        let timeout_secs = helper.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(D::Error::custom(ConfigError::Timeout));
        }

        helper.model.validate().map_err(D::Error::custom)?;

        let mut aliases = AliasTable::default();
        for (name, extra) in &helper.extra_aliases {
            let field = name
                .parse::<Field>()
                .map_err(|e| D::Error::custom(ConfigError::from(e)))?;
            aliases.extend(field, extra);
        }

        Ok(Config {
            smarts_dir: helper.smarts_dir,
            executable,
            input_dir: helper
                .input_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_DIR)),
            output_dir: helper
                .output_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            results_file: helper.results_file,
            timeout: Duration::from_secs(timeout_secs),
            season_policy: helper.season_policy,
            model: helper.model,
            aliases,
        })
    }
}

impl Config {
    pub fn new<P: Into<PathBuf>>(smarts_dir: P) -> Self {
        Self {
            smarts_dir: smarts_dir.into(),
            executable: DEFAULT_EXECUTABLE.to_string(),
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            results_file: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            season_policy: SeasonPolicy::default(),
            model: ModelSettings::default(),
            aliases: AliasTable::default(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let config: Config = serde_json::from_reader(reader).map_err(ConfigError::from)?;

        Ok(config)
    }

    pub fn with_smarts_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.smarts_dir = dir.into();
        self
    }

    pub fn with_executable(mut self, executable: &str) -> Self {
        self.executable = executable.to_string();
        self
    }

    pub fn with_input_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.input_dir = dir.into();
        self
    }

    pub fn with_output_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_results_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.results_file = Some(path.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_season_policy(mut self, policy: SeasonPolicy) -> Self {
        self.season_policy = policy;
        self
    }

    pub fn smarts_dir(&self) -> &Path {
        &self.smarts_dir
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn results_file(&self, run_id: &str) -> PathBuf {
        self.results_file
            .clone()
            .unwrap_or_else(|| self.output_dir.join(format!("{}_results.csv", run_id)))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn season_policy(&self) -> SeasonPolicy {
        self.season_policy
    }

    pub fn model(&self) -> &ModelSettings {
        &self.model
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }
}
