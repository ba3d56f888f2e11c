use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::HeaderValue;
use log::debug;
use nifsign_core::{Context, RequestOptions, Result};

use crate::constants::FORM_CONTENT_TYPE;
use crate::request::{encode_form_body, Method};
use crate::sign_request::SignedRequest;

/// Send a signed request through the context's transport.
///
/// GET requests go out with an empty body. POST requests carry the form
/// encoded parameters, with a form `content-type` unless the caller set one.
/// `options` rides in the request extensions for the transport to apply.
///
/// The response is returned as is, whatever its status. Transport failures
/// are not retried.
pub async fn dispatch(
    ctx: &Context,
    req: SignedRequest,
    options: &RequestOptions,
) -> Result<http::Response<Bytes>> {
    let version = req.version().clone();
    let req = req.into_inner();
    let uri = req.uri()?;

    let body = match req.method {
        Method::Get => Bytes::new(),
        Method::Post => Bytes::from(encode_form_body(&req.body)),
    };

    let mut builder = http::Request::builder()
        .method(http::Method::from(req.method))
        .uri(uri);
    if let Some(headers) = builder.headers_mut() {
        headers.extend(req.headers);
        if req.method == Method::Post && !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
        }
    }
    let mut http_req = builder.body(body)?;
    http_req.extensions_mut().insert(options.clone());

    debug!(
        "dispatching {} request signed with version {version}",
        http_req.method()
    );
    ctx.http_send(http_req).await
}
