use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use log::debug;
use nifsign_core::Result;

use crate::request::Request;
use crate::signature_version::SignatureVersion;
use crate::{Config, Credential};

mod v0;
pub use v0::SignerV0;
mod v1;
pub use v1::SignerV1;
mod v2;
pub use v2::SignerV2;
mod v4;
pub use v4::SignerV4;

/// SignRequest is implemented by every signature algorithm.
///
/// A signer receives the request by value and returns the signed one, either
/// with signature parameters added to the query (GET) or body (POST), or with
/// signature headers.
pub trait SignRequest: Debug + Send + Sync + 'static {
    /// Sign the request with the given credential.
    fn sign_request(&self, req: Request, cred: &Credential, config: &Config) -> Result<Request>;
}

/// A request carrying a signature, ready to be dispatched.
///
/// Only [`RequestSigner`] creates it, so holding one proves the request went
/// through signing.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    req: Request,
    version: SignatureVersion,
}

impl SignedRequest {
    /// The signed request.
    pub fn request(&self) -> &Request {
        &self.req
    }

    /// The signature version the request was signed with.
    pub fn version(&self) -> &SignatureVersion {
        &self.version
    }

    /// Consume self and return the signed request.
    pub fn into_inner(self) -> Request {
        self.req
    }
}

/// RequestSigner picks the signer registered for a signature version.
///
/// Versions without a registered signer are signed by the fallback, which
/// is [`SignerV2`] by default.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    signers: HashMap<SignatureVersion, Arc<dyn SignRequest>>,
    fallback: Arc<dyn SignRequest>,
}

impl Default for RequestSigner {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestSigner {
    /// Create a RequestSigner with signers for versions 0, 1, 2 and 4.
    pub fn new() -> Self {
        let v2: Arc<dyn SignRequest> = Arc::new(SignerV2::new());

        let mut signers: HashMap<SignatureVersion, Arc<dyn SignRequest>> = HashMap::new();
        signers.insert(SignatureVersion::V0, Arc::new(SignerV0::new()));
        signers.insert(SignatureVersion::V1, Arc::new(SignerV1::new()));
        signers.insert(SignatureVersion::V2, v2.clone());
        signers.insert(SignatureVersion::V4, Arc::new(SignerV4::new()));

        Self {
            signers,
            fallback: v2,
        }
    }

    /// Register a signer for the given version, replacing the existing one.
    pub fn with_signer(mut self, version: SignatureVersion, signer: impl SignRequest) -> Self {
        self.signers.insert(version, Arc::new(signer));
        self
    }

    /// Use another signer for versions without a registered one.
    pub fn with_fallback(mut self, signer: impl SignRequest) -> Self {
        self.fallback = Arc::new(signer);
        self
    }

    /// Fix the signing time of the built-in signers.
    #[cfg(test)]
    pub fn with_time(time: nifsign_core::time::DateTime) -> Self {
        let v2: Arc<dyn SignRequest> = Arc::new(SignerV2::new().with_time(time));

        let mut signers: HashMap<SignatureVersion, Arc<dyn SignRequest>> = HashMap::new();
        signers.insert(SignatureVersion::V0, Arc::new(SignerV0::new().with_time(time)));
        signers.insert(SignatureVersion::V1, Arc::new(SignerV1::new().with_time(time)));
        signers.insert(SignatureVersion::V2, v2.clone());
        signers.insert(SignatureVersion::V4, Arc::new(SignerV4::new().with_time(time)));

        Self {
            signers,
            fallback: v2,
        }
    }

    /// Sign the request with the signer registered for `version`.
    ///
    /// The returned request keeps the version it was asked for, even when
    /// the fallback signed it.
    pub fn sign(
        &self,
        version: SignatureVersion,
        req: Request,
        cred: &Credential,
        config: &Config,
    ) -> Result<SignedRequest> {
        let signer = match self.signers.get(&version) {
            Some(signer) => signer,
            None => {
                debug!("no signer registered for signature version {version}, use fallback");
                &self.fallback
            }
        };

        let req = signer.sign_request(req, cred, config)?;
        Ok(SignedRequest { req, version })
    }
}
