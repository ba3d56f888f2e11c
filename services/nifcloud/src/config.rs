use std::fmt::{Debug, Formatter};

use nifsign_core::utils::Redact;

use crate::constants::*;

/// Config carries everything a [`Client`](crate::Client) needs to reach one NIFCLOUD service.
///
/// A config is fixed once handed to a client.
#[derive(Clone)]
pub struct Config {
    /// Service name, the first label of the endpoint host, e.g. `computing`.
    pub service_name: String,
    /// Region name, e.g. `jp-east-1`. Omitted from the host when absent.
    pub region_name: Option<String>,
    /// API version path segment.
    pub api_version: Option<String>,
    /// Base path segment placed before the API version.
    pub base_path: Option<String>,
    /// Use `https` when true (the default), `http` otherwise.
    pub use_ssl: bool,
    /// Domain appended after service and region, defaults to [`API_DOMAIN`].
    pub api_domain: String,
    /// `access_key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ACCESS_KEY_ID`]
    /// - `ACCESS_KEY_ID` in the config file
    pub access_key_id: Option<String>,
    /// `secret_access_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`SECRET_ACCESS_KEY`]
    /// - `SECRET_ACCESS_KEY` in the config file
    pub secret_access_key: Option<String>,
    /// YAML credential file, defaults to [`DEFAULT_CONFIG_FILE`].
    pub config_file: String,
}

impl Config {
    /// Create a new Config for the given service.
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            region_name: None,
            api_version: None,
            base_path: None,
            use_ssl: true,
            api_domain: API_DOMAIN.to_string(),
            access_key_id: None,
            secret_access_key: None,
            config_file: DEFAULT_CONFIG_FILE.to_string(),
        }
    }

    /// Set region_name
    pub fn with_region_name(mut self, region_name: impl Into<String>) -> Self {
        self.region_name = Some(region_name.into());
        self
    }

    /// Set api_version
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }

    /// Set base_path
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    /// Set use_ssl
    pub fn with_use_ssl(mut self, use_ssl: bool) -> Self {
        self.use_ssl = use_ssl;
        self
    }

    /// Set api_domain
    pub fn with_api_domain(mut self, api_domain: impl Into<String>) -> Self {
        self.api_domain = api_domain.into();
        self
    }

    /// Set access_key_id
    pub fn with_access_key_id(mut self, access_key_id: impl Into<String>) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self
    }

    /// Set secret_access_key
    pub fn with_secret_access_key(mut self, secret_access_key: impl Into<String>) -> Self {
        self.secret_access_key = Some(secret_access_key.into());
        self
    }

    /// Set config_file
    pub fn with_config_file(mut self, config_file: impl Into<String>) -> Self {
        self.config_file = config_file.into();
        self
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("service_name", &self.service_name)
            .field("region_name", &self.region_name)
            .field("api_version", &self.api_version)
            .field("base_path", &self.base_path)
            .field("use_ssl", &self.use_ssl)
            .field("api_domain", &self.api_domain)
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("config_file", &self.config_file)
            .finish()
    }
}
