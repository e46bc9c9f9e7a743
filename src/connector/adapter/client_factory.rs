use std::sync::{Arc, OnceLock};

use tracing::{error, info, warn};

use crate::application::GenerativeClient;
use crate::connector::adapter::GeminiClient;
use crate::domain::{AdvisorError, ProviderConfig, API_KEY_VAR};

type ConfigSource = Box<dyn Fn() -> Option<ProviderConfig> + Send + Sync>;
type ClientBuilder =
    Box<dyn Fn(&ProviderConfig) -> Result<Arc<dyn GenerativeClient>, AdvisorError> + Send + Sync>;

/// Lazily builds and memoizes the provider client.
///
/// Configuration is read on the first [`Self::try_client`] call, not at
/// construction. The outcome of that first call, a client or the reason there
/// is none, is kept for the factory's lifetime: the client is never rebuilt
/// and a missing credential is never re-read.
pub struct ClientFactory {
    source: ConfigSource,
    builder: ClientBuilder,
    client: OnceLock<Result<Arc<dyn GenerativeClient>, AdvisorError>>,
}

impl ClientFactory {
    /// Factory reading its config from `source` and building [`GeminiClient`]s.
    pub fn new(source: impl Fn() -> Option<ProviderConfig> + Send + Sync + 'static) -> Self {
        Self {
            source: Box::new(source),
            builder: Box::new(|config: &ProviderConfig| {
                GeminiClient::new(config).map(|c| Arc::new(c) as Arc<dyn GenerativeClient>)
            }),
            client: OnceLock::new(),
        }
    }

    /// Factory reading `API_KEY` and friends from the environment.
    pub fn from_env() -> Self {
        Self::new(ProviderConfig::from_env)
    }

    /// Factory over a fixed config (`None` = no credential).
    pub fn with_config(config: Option<ProviderConfig>) -> Self {
        Self::new(move || config.clone())
    }

    /// Replace how the client is built from a config.
    pub fn with_builder(
        mut self,
        builder: impl Fn(&ProviderConfig) -> Result<Arc<dyn GenerativeClient>, AdvisorError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.builder = Box::new(builder);
        self
    }

    /// The process-wide factory, backed by the environment.
    pub fn global() -> &'static ClientFactory {
        static GLOBAL: OnceLock<ClientFactory> = OnceLock::new();
        GLOBAL.get_or_init(ClientFactory::from_env)
    }

    /// The memoized client, or why there is none.
    pub fn try_client(&self) -> Result<Arc<dyn GenerativeClient>, AdvisorError> {
        self.client.get_or_init(|| self.initialize()).clone()
    }

    /// The memoized client, or `None` when AI features are unavailable.
    pub fn get_client(&self) -> Option<Arc<dyn GenerativeClient>> {
        self.try_client().ok()
    }

    #[cfg(test)]
    fn is_initialized(&self) -> bool {
        self.client.get().is_some()
    }

    fn initialize(&self) -> Result<Arc<dyn GenerativeClient>, AdvisorError> {
        let Some(config) = (self.source)() else {
            warn!("{API_KEY_VAR} is not set; AI features are disabled");
            return Err(AdvisorError::ConfigurationAbsent);
        };

        match (self.builder)(&config) {
            Ok(client) => {
                info!("Initialized AI provider client (model {})", client.model());
                Ok(client)
            }
            Err(e) => {
                error!("Failed to initialize AI provider client: {e}");
                Err(match e {
                    AdvisorError::ClientConstructionFailed(_) => e,
                    other => AdvisorError::construction(other.to_string()),
                })
            }
        }
    }
}
