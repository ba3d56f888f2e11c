use async_trait::async_trait;
use log::debug;
use nifsign_core::{Context, ProvideCredential, Result};

use crate::config::Config;
use crate::credential::{resolve_credential, Credential, CredentialSource};
use crate::provide_credential::{
    ConfigFileCredentialProvider, EnvCredentialProvider, StaticCredentialProvider,
};

/// DefaultCredentialProvider merges every credential source NIFCLOUD clients know.
///
/// Precedence, lowest to highest:
///
/// 1. Config file (`~/.nifcloud.yml` unless configured otherwise)
/// 2. Environment variables
/// 3. Explicit values
///
/// Values are merged per field, see [`resolve_credential`].
#[derive(Debug, Clone, Default)]
pub struct DefaultCredentialProvider {
    file: ConfigFileCredentialProvider,
    env: EnvCredentialProvider,
    args: StaticCredentialProvider,
}

impl DefaultCredentialProvider {
    /// Create a new DefaultCredentialProvider reading the default config file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider from the credential related fields of [`Config`].
    pub fn from_config(config: &Config) -> Self {
        Self {
            file: ConfigFileCredentialProvider::new(config.config_file.clone()),
            env: EnvCredentialProvider::new(),
            args: StaticCredentialProvider::from_source(CredentialSource::new(
                config.access_key_id.clone(),
                config.secret_access_key.clone(),
            )),
        }
    }

    /// Read the config file from the given path instead.
    pub fn with_config_file(mut self, path: impl Into<String>) -> Self {
        self.file = ConfigFileCredentialProvider::new(path);
        self
    }

    /// Set the explicit values, they win over file and environment.
    pub fn with_explicit(mut self, source: CredentialSource) -> Self {
        self.args = StaticCredentialProvider::from_source(source);
        self
    }
}

#[async_trait]
impl ProvideCredential for DefaultCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let file = self.file.load_source(ctx).await?;
        let env = self.env.load_source(ctx);
        debug!("credential sources: file={file:?}, env={env:?}");

        Ok(resolve_credential(file, env, self.args.source().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use nifsign_core::StaticEnv;
    use nifsign_file_read_tokio::TokioFileRead;
    use std::collections::HashMap;
    use std::io::Write;

    fn ctx(home: &tempfile::TempDir, envs: &[(&str, &str)]) -> Context {
        Context::new()
            .with_file_read(TokioFileRead)
            .with_env(StaticEnv {
                home_dir: Some(home.path().to_path_buf()),
                envs: envs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect::<HashMap<_, _>>(),
            })
    }

    fn write_home_config(home: &tempfile::TempDir, content: &str) {
        let mut f = std::fs::File::create(home.path().join(".nifcloud.yml")).unwrap();
        f.write_all(content.as_bytes()).unwrap();
    }

    #[tokio::test]
    async fn test_default_loader_without_anything() {
        let home = tempfile::tempdir().unwrap();

        let cred = DefaultCredentialProvider::new()
            .provide_credential(&ctx(&home, &[]))
            .await
            .unwrap();
        assert!(cred.is_none());
    }

    #[tokio::test]
    async fn test_env_overrides_file() {
        let home = tempfile::tempdir().unwrap();
        write_home_config(&home, "ACCESS_KEY_ID: file_ak\nSECRET_ACCESS_KEY: file_sk\n");

        let cred = DefaultCredentialProvider::new()
            .provide_credential(&ctx(&home, &[(ACCESS_KEY_ID, "env_ak")]))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cred.access_key_id, "env_ak");
        assert_eq!(cred.secret_access_key, "file_sk");
    }

    #[tokio::test]
    async fn test_explicit_overrides_env_and_file() {
        let home = tempfile::tempdir().unwrap();
        write_home_config(&home, "ACCESS_KEY_ID: file_ak\nSECRET_ACCESS_KEY: file_sk\n");

        let config = Config::new("computing").with_secret_access_key("arg_sk");
        let cred = DefaultCredentialProvider::from_config(&config)
            .provide_credential(&ctx(
                &home,
                &[(ACCESS_KEY_ID, "env_ak"), (SECRET_ACCESS_KEY, "env_sk")],
            ))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cred.access_key_id, "env_ak");
        assert_eq!(cred.secret_access_key, "arg_sk");
    }

    #[tokio::test]
    async fn test_custom_config_file() {
        let home = tempfile::tempdir().unwrap();
        let path = home.path().join("custom.yml");
        std::fs::write(&path, "ACCESS_KEY_ID: custom_ak\nSECRET_ACCESS_KEY: custom_sk\n").unwrap();

        let cred = DefaultCredentialProvider::new()
            .with_config_file(path.to_string_lossy())
            .provide_credential(&ctx(&home, &[]))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cred, Credential::new("custom_ak", "custom_sk"));
    }
}
