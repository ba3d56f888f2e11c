use log::debug;
use nifsign_core::hash::{base64_hmac_sha1, base64_hmac_sha256};
use nifsign_core::time::{format_iso8601_with_separator, now, DateTime};
use nifsign_core::Result;
use percent_encoding::utf8_percent_encode;

use super::SignRequest;
use crate::constants::*;
use crate::request::Request;
use crate::{Config, Credential};

/// SignerV2 implements the query signature version 2.
///
/// The string to sign is
///
/// ```text
/// <METHOD>\n<host>\n<path>\n<canonical query>
/// ```
///
/// `HmacSHA256` is used unless the caller asked for `HmacSHA1` through the
/// `SignatureMethod` parameter.
#[derive(Debug, Default)]
pub struct SignerV2 {
    time: Option<DateTime>,
}

impl SignerV2 {
    /// Create a new SignerV2.
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

impl SignRequest for SignerV2 {
    fn sign_request(&self, mut req: Request, cred: &Credential, _: &Config) -> Result<Request> {
        let signature_method = match req.param_get(PARAM_SIGNATURE_METHOD).as_deref() {
            Some(HMAC_SHA1) => HMAC_SHA1,
            _ => HMAC_SHA256,
        };
        let timestamp = format_iso8601_with_separator(self.time.unwrap_or_else(now));

        req.set_param(PARAM_ACCESS_KEY_ID, &cred.access_key_id);
        req.set_param(PARAM_SIGNATURE_VERSION, "2");
        req.set_param(PARAM_SIGNATURE_METHOD, signature_method);
        req.set_param(PARAM_TIMESTAMP, &timestamp);

        let uri = req.uri()?;
        let host = uri
            .authority()
            .map(|v| v.as_str().to_lowercase())
            .unwrap_or_default();
        let path = match uri.path() {
            "" => "/",
            v => v,
        };

        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            req.method,
            host,
            path,
            canonical_query(&req)
        );
        debug!("calculated string to sign: {string_to_sign}");

        let key = cred.secret_access_key.as_bytes();
        let signature = if signature_method == HMAC_SHA1 {
            base64_hmac_sha1(key, string_to_sign.as_bytes())
        } else {
            base64_hmac_sha256(key, string_to_sign.as_bytes())
        };
        req.set_param(PARAM_SIGNATURE, &signature);

        Ok(req)
    }
}

fn canonical_query(req: &Request) -> String {
    let mut params: Vec<_> = req
        .params()
        .into_iter()
        .filter(|(k, _)| k != PARAM_SIGNATURE)
        .collect();
    params.sort();

    params
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                utf8_percent_encode(k, &QUERY_ENCODE_SET),
                utf8_percent_encode(v, &QUERY_ENCODE_SET)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}
