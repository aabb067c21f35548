use std::path::{Path, PathBuf};

use rentix_shared::const_config::client::{
    CLIENT_DEFAULT_REQUEST_TIMEOUT_SECS, CLIENT_DEFAULT_SERVER_ADDRESS, CLIENT_DEFAULT_TOKEN_FILE,
};
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ClientConfiguration {
    pub client: ClientSettings,
    pub storage: StorageSettings,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ClientSettings {
    /// Base address of the REST backend, without a trailing slash
    pub server_address: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub request_timeout_secs: u64,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct StorageSettings {
    /// Where a file backed token store keeps the session between runs
    pub token_file: PathBuf,
}

/// Loads the settings from `configuration_directory`. Every setting has a
/// default so both files are optional. Later sources win:
/// 1. `base.toml`
/// 2. `<environment>.toml` (environment from `RENTIX_ENVIRONMENT`, default `local`)
/// 3. Environment variables with a prefix of RENTIX and '__' as separator. E.g.
///    `RENTIX_CLIENT__SERVER_ADDRESS=http://api:3000` sets
///    `ClientConfiguration.client.server_address`
pub fn get_configuration(
    configuration_directory: &Path,
) -> Result<ClientConfiguration, config::ConfigError> {
    let environment: Environment = std::env::var("RENTIX_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    load(configuration_directory, environment)
}

fn load(
    configuration_directory: &Path,
    environment: Environment,
) -> Result<ClientConfiguration, config::ConfigError> {
    let environment_filename = format!("{}.toml", environment.as_str());
    let settings = config::Config::builder()
        .set_default("client.server_address", CLIENT_DEFAULT_SERVER_ADDRESS)?
        .set_default(
            "client.request_timeout_secs",
            CLIENT_DEFAULT_REQUEST_TIMEOUT_SECS.to_string(),
        )?
        .set_default("storage.token_file", CLIENT_DEFAULT_TOKEN_FILE)?
        .add_source(config::File::from(configuration_directory.join("base.toml")).required(false))
        .add_source(
            config::File::from(configuration_directory.join(environment_filename)).required(false),
        )
        .add_source(
            config::Environment::with_prefix("RENTIX")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let mut result = settings.try_deserialize::<ClientConfiguration>()?;
    result.client.server_address = result
        .client
        .server_address
        .trim_end_matches('/')
        .to_string();
    Ok(result)
}

/// The possible runtime environment for the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{other} is not a supported environment. Use either `local` or `production`."
            )),
        }
    }
}
