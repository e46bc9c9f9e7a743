pub const API_KEY_VAR: &str = "API_KEY";
pub const FALLBACK_API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const MODEL_VAR: &str = "GEMINI_MODEL";
pub const BASE_URL_VAR: &str = "GEMINI_BASE_URL";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Settings needed to build a provider client.
///
/// | Variable          | Default                                      |
/// |-------------------|----------------------------------------------|
/// | `API_KEY`         | none (falls back to `GEMINI_API_KEY`)        |
/// | `GEMINI_MODEL`    | `gemini-2.5-flash`                           |
/// | `GEMINI_BASE_URL` | `https://generativelanguage.googleapis.com`  |
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    api_key: String,
    model: String,
    base_url: String,
}

impl ProviderConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Read from the process environment. `None` when no non-blank credential
    /// is set; that is a valid state, not an error.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Self::from_env`] over an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let key = non_blank(API_KEY_VAR).or_else(|| non_blank(FALLBACK_API_KEY_VAR))?;
        let mut config = Self::new(key.trim());
        if let Some(model) = non_blank(MODEL_VAR) {
            config = config.with_model(model);
        }
        if let Some(base) = non_blank(BASE_URL_VAR) {
            config = config.with_base_url(base);
        }
        Some(config)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

// Keeps the credential out of logs.
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}
