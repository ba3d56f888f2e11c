use std::sync::{Arc, Mutex};

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue};
use log::debug;
use nifsign_core::{Context, Error, ProvideCredential, RequestOptions, Result, SigningCredential};

use crate::constants::FORM_CONTENT_TYPE;
use crate::dispatch::dispatch;
use crate::endpoint::build_endpoint;
use crate::query::normalize;
use crate::request::{Method, Request};
use crate::sign_request::{RequestSigner, SignedRequest};
use crate::signature_version::resolve_signature_version;
use crate::{Config, Credential, DefaultCredentialProvider};

/// Client sends signed requests to one NIFCLOUD service.
///
/// Every call runs the same pipeline: build the endpoint, shape the
/// parameters for the method, pick the signature version, sign and send.
///
/// Credentials are loaded on the first request and reused afterwards.
///
/// ```no_run
/// use nifsign_core::{Context, OsEnv};
/// use nifsign_nifcloud::{Client, Config};
///
/// # async fn example() -> nifsign_core::Result<()> {
/// let ctx = Context::new().with_env(OsEnv);
/// let client = Client::new(ctx, Config::new("computing").with_region_name("jp-east-1"));
///
/// let resp = client
///     .get(
///         Some("DescribeInstances"),
///         [("Action", "DescribeInstances"), ("Version", "1")],
///         Default::default(),
///     )
///     .await?;
/// println!("{}", resp.status());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Client {
    ctx: Context,
    config: Arc<Config>,
    provider: Arc<dyn ProvideCredential<Credential = Credential>>,
    signer: Arc<RequestSigner>,
    credential: Arc<Mutex<Option<Credential>>>,
}

impl Client {
    /// Create a client loading credentials with [`DefaultCredentialProvider`].
    pub fn new(ctx: Context, config: Config) -> Self {
        let provider = DefaultCredentialProvider::from_config(&config);
        Self {
            ctx,
            config: Arc::new(config),
            provider: Arc::new(provider),
            signer: Arc::new(RequestSigner::new()),
            credential: Arc::new(Mutex::new(None)),
        }
    }

    /// Replace the credential provider.
    pub fn with_credential_provider(
        mut self,
        provider: impl ProvideCredential<Credential = Credential>,
    ) -> Self {
        self.provider = Arc::new(provider);
        self.credential = Arc::new(Mutex::new(None));
        self
    }

    /// Replace the request signer.
    pub fn with_request_signer(mut self, signer: RequestSigner) -> Self {
        self.signer = Arc::new(signer);
        self
    }

    /// The config of this client.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Send a GET request.
    pub async fn get<K, V>(
        &self,
        path: Option<&str>,
        query: impl IntoIterator<Item = (K, V)>,
        headers: HeaderMap,
    ) -> Result<http::Response<Bytes>>
    where
        K: Into<String>,
        V: ToString,
    {
        self.request(http::Method::GET, path, query, headers).await
    }

    /// Send a POST request.
    pub async fn post<K, V>(
        &self,
        path: Option<&str>,
        query: impl IntoIterator<Item = (K, V)>,
        headers: HeaderMap,
    ) -> Result<http::Response<Bytes>>
    where
        K: Into<String>,
        V: ToString,
    {
        self.request(http::Method::POST, path, query, headers).await
    }

    /// Send a request, only `GET` and `POST` are supported.
    pub async fn request<K, V>(
        &self,
        method: http::Method,
        path: Option<&str>,
        query: impl IntoIterator<Item = (K, V)>,
        headers: HeaderMap,
    ) -> Result<http::Response<Bytes>>
    where
        K: Into<String>,
        V: ToString,
    {
        self.request_with_options(method, path, query, headers, &RequestOptions::default())
            .await
    }

    /// Send a request with transport options such as a timeout.
    pub async fn request_with_options<K, V>(
        &self,
        method: http::Method,
        path: Option<&str>,
        query: impl IntoIterator<Item = (K, V)>,
        headers: HeaderMap,
        options: &RequestOptions,
    ) -> Result<http::Response<Bytes>>
    where
        K: Into<String>,
        V: ToString,
    {
        let method = Method::try_from(method)?;
        let query = query
            .into_iter()
            .map(|(k, v)| (k.into(), v.to_string()))
            .collect();

        let req = self.prepare(method, path, query, headers);
        let req = self.sign(req).await?;
        dispatch(&self.ctx, req, options).await
    }

    /// Build the unsigned request: endpoint, query and body.
    ///
    /// POST requests get a form `content-type` unless one is set so that
    /// header signatures cover it.
    pub fn prepare(
        &self,
        method: Method,
        path: Option<&str>,
        query: Vec<(String, String)>,
        mut headers: HeaderMap,
    ) -> Request {
        let endpoint = build_endpoint(&self.config, path);
        debug!("built endpoint: {endpoint}");

        let (url_query, body) = normalize(method, query);
        if method == Method::Post && !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
        }

        Request::new(method, format!("{endpoint}{url_query}"))
            .with_body(body)
            .with_headers(headers)
    }

    /// Sign the request with the version it asks for.
    pub async fn sign(&self, req: Request) -> Result<SignedRequest> {
        let version = resolve_signature_version(&req, &self.config.service_name);
        debug!("resolved signature version: {version}");

        let cred = self.credential().await?;
        self.signer.sign(version, req, &cred, &self.config)
    }

    async fn credential(&self) -> Result<Credential> {
        let cached = self.credential.lock().expect("lock poisoned").clone();
        if let Some(cred) = cached.filter(|c| c.is_valid()) {
            return Ok(cred);
        }

        let cred = match self.provider.provide_credential(&self.ctx).await? {
            Some(cred) if cred.is_valid() => cred,
            Some(_) => {
                return Err(Error::credential_invalid(
                    "access key id and secret access key must both be non-empty",
                ))
            }
            None => return Err(Error::config_invalid("no usable credentials found")),
        };
        *self.credential.lock().expect("lock poisoned") = Some(cred.clone());
        Ok(cred)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticCredentialProvider;
    use async_trait::async_trait;
    use nifsign_core::{ErrorKind, HttpSend};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default, Clone)]
    struct CountHttpSend {
        sent: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl HttpSend for CountHttpSend {
        async fn http_send(&self, _: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
            self.sent.fetch_add(1, Ordering::SeqCst);
            Ok(http::Response::new(Bytes::new()))
        }
    }

    #[derive(Debug, Default, Clone)]
    struct CountProvider {
        loaded: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ProvideCredential for CountProvider {
        type Credential = Credential;

        async fn provide_credential(&self, _: &Context) -> Result<Option<Credential>> {
            self.loaded.fetch_add(1, Ordering::SeqCst);
            Ok(Some(Credential::new("ak", "sk")))
        }
    }

    fn client(http: CountHttpSend) -> Client {
        Client::new(
            Context::new().with_http_send(http),
            Config::new("computing").with_region_name("jp-east-1"),
        )
    }

    fn pairs(v: &[(&str, &str)]) -> Vec<(String, String)> {
        v.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_prepare_get() {
        let req = client(CountHttpSend::default()).prepare(
            Method::Get,
            Some("DescribeInstances"),
            pairs(&[("Version", "1"), ("Action", "DescribeInstances")]),
            HeaderMap::new(),
        );

        assert_eq!(
            req.url,
            "https://computing.jp-east-1.api.cloud.nifty.com/DescribeInstances/?Action=DescribeInstances&Version=1"
        );
        assert!(req.body.is_empty());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn test_prepare_post() {
        let body = pairs(&[("Version", "1"), ("Action", "DescribeInstances")]);
        let req = client(CountHttpSend::default()).prepare(
            Method::Post,
            None,
            body.clone(),
            HeaderMap::new(),
        );

        assert_eq!(req.url, "https://computing.jp-east-1.api.cloud.nifty.com/");
        assert_eq!(req.body, body);
        assert_eq!(req.headers[CONTENT_TYPE], FORM_CONTENT_TYPE);
    }

    #[tokio::test]
    async fn test_credential_is_loaded_once() -> anyhow::Result<()> {
        let http = CountHttpSend::default();
        let provider = CountProvider::default();
        let client = client(http.clone()).with_credential_provider(provider.clone());

        for _ in 0..3 {
            client
                .get(None, [("Action", "DescribeInstances")], HeaderMap::new())
                .await?;
        }

        assert_eq!(provider.loaded.load(Ordering::SeqCst), 1);
        assert_eq!(http.sent.load(Ordering::SeqCst), 3);
        Ok(())
    }

    #[derive(Debug)]
    struct EmptyProvider;

    #[async_trait]
    impl ProvideCredential for EmptyProvider {
        type Credential = Credential;

        async fn provide_credential(&self, _: &Context) -> Result<Option<Credential>> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_invalid_credential_sends_nothing() {
        let http = CountHttpSend::default();
        let client = client(http.clone())
            .with_credential_provider(StaticCredentialProvider::new("ak", ""));

        let err = client
            .get(None, [("Action", "DescribeInstances")], HeaderMap::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
        assert_eq!(http.sent.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_credential_sends_nothing() {
        let http = CountHttpSend::default();
        let client = client(http.clone()).with_credential_provider(EmptyProvider);

        let err = client
            .get(None, [("Action", "DescribeInstances")], HeaderMap::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert_eq!(http.sent.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unsupported_method_sends_nothing() {
        let http = CountHttpSend::default();
        let provider = CountProvider::default();
        let client = client(http.clone()).with_credential_provider(provider.clone());

        let err = client
            .request(
                http::Method::PUT,
                None,
                [("Action", "DescribeInstances")],
                HeaderMap::new(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UnsupportedMethod);
        assert_eq!(provider.loaded.load(Ordering::SeqCst), 0);
        assert_eq!(http.sent.load(Ordering::SeqCst), 0);
    }
}
