use std::time::Duration;

use config::ConfigError;
use serde::Deserialize;
use serde_aux::prelude::deserialize_number_from_string;

#[derive(Deserialize, Clone)]
pub struct Config {
    pub application: ApplicationSettings,
    pub allow_cors: bool,
    pub round: RoundSettings,
    pub session: SessionSettings,
    pub data: DataSettings,
    pub store: StoreSettings,
    pub image: ImageSettings,
}

#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct RoundSettings {
    pub countdown_seconds: u32,
    pub hold_off_millis: u64,
    pub default_duration_seconds: u32,
}

impl RoundSettings {
    pub fn hold_off(&self) -> Duration {
        Duration::from_millis(self.hold_off_millis)
    }
}

impl Default for RoundSettings {
    fn default() -> Self {
        RoundSettings {
            countdown_seconds: 3,
            hold_off_millis: 230,
            default_duration_seconds: 60,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct SessionSettings {
    pub inactivity_timeout_seconds: u64,
}

impl SessionSettings {
    pub fn inactivity_timeout(&self) -> Duration {
        Duration::from_secs(self.inactivity_timeout_seconds)
    }
}

#[derive(Deserialize, Clone)]
pub struct DataSettings {
    pub categories_path: String,
}

#[derive(Deserialize, Clone)]
pub struct StoreSettings {
    /// When absent the documents only live in memory.
    pub path: Option<String>,
}

#[derive(Deserialize, Clone)]
pub struct ImageSettings {
    pub enabled: bool,
    pub search_url: String,
    pub image_base_url: String,
    #[serde(default)]
    pub api_key: String,
    pub timeout_seconds: u64,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl ImageSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Config {
    pub fn get() -> Result<Config, ConfigError> {
        let base_path = std::env::current_dir().map_err(|error| {
            ConfigError::Message(format!(
                "Failed to determine the current directory. Error: '{error}'."
            ))
        })?;
        let configuration_directory = base_path.join("config");

        let environment: Environment = std::env::var("ENVIRONMENT")
            .map_err(|_| ConfigError::Message("ENVIRONMENT variable is not set.".to_string()))?
            .try_into()
            .map_err(ConfigError::Message)?;

        let environment_filename = format!("{}.yaml", environment.as_str());

        let config = config::Config::builder()
            .add_source(config::File::from(
                configuration_directory.join("base.yaml"),
            ))
            .add_source(config::File::from(
                configuration_directory.join(environment_filename),
            ))
            .add_source(
                config::Environment::with_prefix("HEADSUP")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        config.try_deserialize::<Config>()
    }
}

enum Environment {
    Dev,
    Prod,
}

const DEV: &str = "dev";
const PROD: &str = "prod";

impl Environment {
    fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => DEV,
            Environment::Prod => PROD,
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(string: String) -> Result<Self, Self::Error> {
        match string.to_lowercase().as_str() {
            DEV => Ok(Self::Dev),
            PROD => Ok(Self::Prod),
            other => Err(format!(
                "{other} is not a supported environment. Use either `{DEV}` or `{PROD}`.",
            )),
        }
    }
}
