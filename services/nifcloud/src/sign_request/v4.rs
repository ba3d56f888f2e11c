use std::fmt::Write;

use http::header::{AUTHORIZATION, HOST};
use http::{HeaderMap, HeaderValue};
use log::debug;
use nifsign_core::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256};
use nifsign_core::time::{format_date, format_iso8601, now, DateTime};
use nifsign_core::{Error, Result};
use percent_encoding::{percent_decode_str, utf8_percent_encode};

use super::SignRequest;
use crate::constants::*;
use crate::request::{encode_form_body, Method, Request};
use crate::{Config, Credential};

/// SignerV4 implements the header based signature version 4.
///
/// The algorithm follows AWS SigV4 with the NIFCLOUD service name and region
/// as scope. Signed requests carry `host`, `x-amz-date` and `authorization`
/// headers, query and body are left untouched.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
#[derive(Debug, Default)]
pub struct SignerV4 {
    time: Option<DateTime>,
}

impl SignerV4 {
    /// Create a new SignerV4.
    pub fn new() -> Self {
        Self::default()
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }
}

impl SignRequest for SignerV4 {
    fn sign_request(&self, mut req: Request, cred: &Credential, config: &Config) -> Result<Request> {
        let region = match config.region_name.as_deref() {
            Some(v) if !v.is_empty() => v,
            _ => {
                return Err(Error::config_invalid(
                    "signature version 4 requires region_name",
                ))
            }
        };
        let service = config.service_name.as_str();
        let now = self.time.unwrap_or_else(now);

        let uri = req.uri()?;

        // Insert HOST header if not present.
        if req.headers.get(HOST).is_none() {
            let authority = uri.authority().ok_or_else(|| {
                Error::request_invalid(format!("url {} has no host", req.url))
            })?;
            req.headers
                .insert(HOST, HeaderValue::from_str(authority.as_str())?);
        }
        req.headers
            .insert(X_AMZ_DATE, HeaderValue::try_from(format_iso8601(now))?);

        let payload_hash = match req.method {
            Method::Get => hex_sha256(b""),
            Method::Post => hex_sha256(encode_form_body(&req.body).as_bytes()),
        };

        // build canonical request and string to sign.
        let signed_headers = signed_header_names(&req.headers);
        let creq = canonical_request_string(&req, &uri, &signed_headers, &payload_hash)?;
        debug!("calculated canonical request: {creq}");

        // Scope: "20220313/<region>/<service>/aws4_request"
        let scope = format!("{}/{}/{}/aws4_request", format_date(now), region, service);
        debug!("calculated scope: {scope}");

        // StringToSign:
        //
        // AWS4-HMAC-SHA256
        // 20220313T072004Z
        // 20220313/<region>/<service>/aws4_request
        // <hashed_canonical_request>
        let string_to_sign = {
            let mut f = String::new();
            writeln!(f, "{V4_ALGORITHM}")?;
            writeln!(f, "{}", format_iso8601(now))?;
            writeln!(f, "{}", &scope)?;
            write!(f, "{}", hex_sha256(creq.as_bytes()))?;
            f
        };
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key = generate_signing_key(&cred.secret_access_key, now, region, service);
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

        let mut authorization = HeaderValue::from_str(&format!(
            "{V4_ALGORITHM} Credential={}/{}, SignedHeaders={}, Signature={}",
            cred.access_key_id,
            scope,
            signed_headers.join(";"),
            signature
        ))?;
        authorization.set_sensitive(true);
        req.headers.insert(AUTHORIZATION, authorization);

        Ok(req)
    }
}

fn signed_header_names(headers: &HeaderMap) -> Vec<String> {
    let mut names: Vec<String> = headers
        .keys()
        .map(|k| k.as_str().to_string())
        .filter(|k| k != AUTHORIZATION.as_str())
        .collect();
    names.sort();
    names
}

fn canonical_request_string(
    req: &Request,
    uri: &http::Uri,
    signed_headers: &[String],
    payload_hash: &str,
) -> Result<String> {
    // 256 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(256);

    // Insert method
    writeln!(f, "{}", req.method)?;
    // Insert encoded path
    let path = percent_decode_str(uri.path())
        .decode_utf8()
        .map_err(|e| Error::request_invalid("failed to decode path").with_source(e))?;
    writeln!(f, "{}", utf8_percent_encode(&path, &URI_ENCODE_SET))?;
    // Insert query
    let mut query: Vec<(String, String)> =
        form_urlencoded::parse(uri.query().unwrap_or_default().as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
    query.sort();
    writeln!(
        f,
        "{}",
        query
            .iter()
            .map(|(k, v)| format!(
                "{}={}",
                utf8_percent_encode(k, &QUERY_ENCODE_SET),
                utf8_percent_encode(v, &QUERY_ENCODE_SET)
            ))
            .collect::<Vec<_>>()
            .join("&")
    )?;
    // Insert signed headers
    for name in signed_headers {
        let values = req
            .headers
            .get_all(name.as_str())
            .iter()
            .map(|v| v.to_str().map(normalize_header_value))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        writeln!(f, "{}:{}", name, values.join(","))?;
    }
    writeln!(f)?;
    writeln!(f, "{}", signed_headers.join(";"))?;
    write!(f, "{payload_hash}")?;

    Ok(f)
}

/// Trim the value and collapse sequential spaces into one.
fn normalize_header_value(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn generate_signing_key(secret: &str, time: DateTime, region: &str, service: &str) -> Vec<u8> {
    // Sign secret
    let secret = format!("AWS4{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), format_date(time).as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), service.as_bytes());
    // Sign request
    hmac_sha256(sign_service.as_slice(), "aws4_request".as_bytes())
}
