//! Signed HTTP client for NIFCLOUD APIs.
//!
//! A request goes through a fixed pipeline:
//!
//! 1. [`build_endpoint`] derives the url from [`Config`] and the call's path.
//! 2. [`normalize`] puts the parameters in the sorted url query (GET) or the body (POST).
//! 3. [`resolve_signature_version`] picks the signature version.
//! 4. [`RequestSigner`] signs with the matching [`SignRequest`] implementation.
//! 5. [`dispatch`] sends the [`SignedRequest`] through the context transport.
//!
//! [`Client`] wires them together and loads credentials with
//! [`DefaultCredentialProvider`].

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod config;
pub use config::Config;

mod credential;
pub use credential::{resolve_credential, Credential, CredentialSource};

mod provide_credential;
pub use provide_credential::{
    ConfigFileCredentialProvider, DefaultCredentialProvider, EnvCredentialProvider,
    StaticCredentialProvider,
};

mod request;
pub use request::{encode_form_body, Method, Request};

mod endpoint;
pub use endpoint::build_endpoint;

mod query;
pub use query::normalize;

mod signature_version;
pub use signature_version::{resolve_signature_version, SignatureVersion};

mod sign_request;
pub use sign_request::{
    RequestSigner, SignRequest, SignedRequest, SignerV0, SignerV1, SignerV2, SignerV4,
};

mod dispatch;
pub use dispatch::dispatch;

mod client;
pub use client::Client;

/// Constants used by NIFCLOUD signing.
pub mod constants;
