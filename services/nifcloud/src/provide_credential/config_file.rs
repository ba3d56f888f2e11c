use crate::{constants::*, credential::CredentialSource, Credential};
use async_trait::async_trait;
use log::debug;
use nifsign_core::{Context, Error, ProvideCredential, Result};
use serde_yaml::Value;

/// ConfigFileCredentialProvider loads credentials from a YAML file.
///
/// The file is a flat mapping:
///
/// ```yaml
/// ACCESS_KEY_ID: <access key id>
/// SECRET_ACCESS_KEY: <secret access key>
/// ```
///
/// A missing or unreadable file yields nothing. A file that is not a YAML
/// mapping is a configuration error.
#[derive(Debug, Clone)]
pub struct ConfigFileCredentialProvider {
    path: String,
}

impl Default for ConfigFileCredentialProvider {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_FILE)
    }
}

impl ConfigFileCredentialProvider {
    /// Create a provider reading the given path, `~` is expanded to the home dir.
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Read whatever credential values the file holds.
    pub async fn load_source(&self, ctx: &Context) -> Result<CredentialSource> {
        let Some(path) = ctx.expand_home_dir(&self.path) else {
            debug!("home dir not found, skip loading config file {}", self.path);
            return Ok(CredentialSource::default());
        };

        let content = match ctx.file_read(&path).await {
            Ok(content) => content,
            Err(err) => {
                debug!("config file {path} is not readable, skip it: {err}");
                return Ok(CredentialSource::default());
            }
        };

        parse_config_file(&content).map_err(|e| {
            Error::config_invalid(format!("failed to load config file {path}")).with_source(e)
        })
    }
}

fn parse_config_file(content: &[u8]) -> Result<CredentialSource> {
    if content.iter().all(u8::is_ascii_whitespace) {
        return Ok(CredentialSource::default());
    }

    let value: Value = serde_yaml::from_slice(content).map_err(|e| {
        Error::config_invalid("config file is not valid yaml").with_source(e)
    })?;

    match value {
        Value::Null => Ok(CredentialSource::default()),
        Value::Mapping(_) => Ok(CredentialSource::new(
            value.get(ACCESS_KEY_ID).and_then(scalar_to_string),
            value.get(SECRET_ACCESS_KEY).and_then(scalar_to_string),
        )),
        _ => Err(Error::config_invalid(
            "config file must be a mapping of credential keys",
        )),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[async_trait]
impl ProvideCredential for ConfigFileCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        Ok(self.load_source(ctx).await?.into_credential())
    }
}
