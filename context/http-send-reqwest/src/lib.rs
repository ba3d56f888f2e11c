//! Reqwest-based HTTP transport for nifsign.
//!
//! ```no_run
//! use nifsign_core::Context;
//! use nifsign_http_send_reqwest::ReqwestHttpSend;
//! use std::time::Duration;
//!
//! let client = reqwest::Client::builder()
//!     .pool_max_idle_per_host(10)
//!     .build()
//!     .unwrap();
//! let ctx = Context::new().with_http_send(ReqwestHttpSend::new(client));
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::BodyExt;
use log::debug;
use nifsign_core::{Error, HttpSend, RequestOptions, Result};
use reqwest::{Client, Request};

/// HttpSend implementation backed by [`reqwest::Client`].
///
/// [`RequestOptions::timeout`] found in the request extensions is applied to
/// the outgoing request.
#[derive(Debug, Default, Clone)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let timeout = req
            .extensions()
            .get::<RequestOptions>()
            .and_then(|opts| opts.timeout);

        let mut req = Request::try_from(req).map_err(|e| {
            Error::request_invalid("failed to convert request for reqwest").with_source(e)
        })?;
        if let Some(timeout) = timeout {
            *req.timeout_mut() = Some(timeout);
        }
        debug!("sending {} request to {}", req.method(), req.url().path());

        let resp: http::Response<_> = self
            .client
            .execute(req)
            .await
            .map_err(|e| Error::transport("failed to send request").with_source(e))?
            .into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(|e| Error::transport("failed to read response body").with_source(e))?;
        Ok(http::Response::from_parts(parts, bs))
    }
}
