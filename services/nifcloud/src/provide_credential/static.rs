use crate::credential::CredentialSource;
use crate::Credential;
use async_trait::async_trait;
use nifsign_core::{Context, ProvideCredential, Result};

/// StaticCredentialProvider provides credentials given explicitly at initialization time.
///
/// Either value may be missing; in that case this provider yields nothing on
/// its own but still contributes the value it has to
/// [`DefaultCredentialProvider`](crate::DefaultCredentialProvider).
#[derive(Debug, Clone, Default)]
pub struct StaticCredentialProvider {
    source: CredentialSource,
}

impl StaticCredentialProvider {
    /// Create a new StaticCredentialProvider with both values.
    pub fn new(access_key_id: &str, secret_access_key: &str) -> Self {
        Self {
            source: CredentialSource::new(
                Some(access_key_id.to_string()),
                Some(secret_access_key.to_string()),
            ),
        }
    }

    /// Create a new StaticCredentialProvider from optional values.
    pub fn from_source(source: CredentialSource) -> Self {
        Self { source }
    }

    /// The explicit values held by this provider.
    pub fn source(&self) -> &CredentialSource {
        &self.source
    }
}

#[async_trait]
impl ProvideCredential for StaticCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _ctx: &Context) -> Result<Option<Self::Credential>> {
        Ok(self.source.clone().into_credential())
    }
}
