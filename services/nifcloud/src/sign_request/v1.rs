use log::debug;
use nifsign_core::hash::base64_hmac_sha1;
use nifsign_core::time::{format_iso8601_with_separator, now, DateTime};
use nifsign_core::Result;

use super::SignRequest;
use crate::constants::*;
use crate::request::Request;
use crate::{Config, Credential};

/// SignerV1 signs every parameter, concatenated in case-insensitive key order,
/// with HMAC-SHA1.
#[derive(Debug, Default)]
pub struct SignerV1 {
    time: Option<DateTime>,
}

impl SignerV1 {
    /// Create a new SignerV1.
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

impl SignRequest for SignerV1 {
    fn sign_request(&self, mut req: Request, cred: &Credential, _: &Config) -> Result<Request> {
        let timestamp = format_iso8601_with_separator(self.time.unwrap_or_else(now));

        req.set_param(PARAM_ACCESS_KEY_ID, &cred.access_key_id);
        req.set_param(PARAM_SIGNATURE_VERSION, "1");
        req.set_param(PARAM_TIMESTAMP, &timestamp);

        let mut params: Vec<_> = req
            .params()
            .into_iter()
            .filter(|(k, _)| k != PARAM_SIGNATURE)
            .collect();
        params.sort_by_key(|(k, _)| k.to_lowercase());

        let string_to_sign: String = params.iter().map(|(k, v)| format!("{k}{v}")).collect();
        debug!("calculated string to sign: {string_to_sign}");

        let signature = base64_hmac_sha1(
            cred.secret_access_key.as_bytes(),
            string_to_sign.as_bytes(),
        );
        req.set_param(PARAM_SIGNATURE, &signature);

        Ok(req)
    }
}
