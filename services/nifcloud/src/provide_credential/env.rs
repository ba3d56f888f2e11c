use crate::{constants::*, credential::CredentialSource, Credential};
use async_trait::async_trait;
use nifsign_core::{Context, ProvideCredential, Result};

/// EnvCredentialProvider loads NIFCLOUD credentials from environment variables.
///
/// This provider looks for the following environment variables:
/// - `ACCESS_KEY_ID`: The access key ID
/// - `SECRET_ACCESS_KEY`: The secret access key
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Create a new EnvCredentialProvider.
    pub fn new() -> Self {
        Self
    }

    /// Read whatever credential values the environment holds.
    pub fn load_source(&self, ctx: &Context) -> CredentialSource {
        CredentialSource::new(ctx.env_var(ACCESS_KEY_ID), ctx.env_var(SECRET_ACCESS_KEY))
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        Ok(self.load_source(ctx).into_credential())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nifsign_core::StaticEnv;
    use std::collections::HashMap;

    fn ctx_with_envs(envs: &[(&str, &str)]) -> Context {
        Context::new().with_env(StaticEnv {
            home_dir: None,
            envs: envs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        })
    }

    #[tokio::test]
    async fn test_env_credential_provider() -> anyhow::Result<()> {
        let ctx = ctx_with_envs(&[
            (ACCESS_KEY_ID, "test_access_key"),
            (SECRET_ACCESS_KEY, "test_secret_key"),
        ]);

        let cred = EnvCredentialProvider::new()
            .provide_credential(&ctx)
            .await?
            .expect("credential must be loaded");
        assert_eq!(cred.access_key_id, "test_access_key");
        assert_eq!(cred.secret_access_key, "test_secret_key");

        Ok(())
    }

    #[tokio::test]
    async fn test_env_credential_provider_missing_credentials() -> anyhow::Result<()> {
        let ctx = Context::new();

        let cred = EnvCredentialProvider::new().provide_credential(&ctx).await?;
        assert!(cred.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_env_credential_provider_partial_credentials() -> anyhow::Result<()> {
        let ctx = ctx_with_envs(&[(ACCESS_KEY_ID, "test_access_key")]);

        let provider = EnvCredentialProvider::new();
        assert!(provider.provide_credential(&ctx).await?.is_none());

        let source = provider.load_source(&ctx);
        assert_eq!(source.access_key_id.as_deref(), Some("test_access_key"));
        assert_eq!(source.secret_access_key, None);

        Ok(())
    }
}
