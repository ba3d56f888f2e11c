use log::debug;
use nifsign_core::hash::base64_hmac_sha1;
use nifsign_core::time::{format_iso8601_with_separator, now, DateTime};
use nifsign_core::{Error, Result};

use super::SignRequest;
use crate::constants::*;
use crate::request::Request;
use crate::{Config, Credential};

/// SignerV0 signs the `Action` and `Timestamp` parameters with HMAC-SHA1.
#[derive(Debug, Default)]
pub struct SignerV0 {
    time: Option<DateTime>,
}

impl SignerV0 {
    /// Create a new SignerV0.
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

impl SignRequest for SignerV0 {
    fn sign_request(&self, mut req: Request, cred: &Credential, _: &Config) -> Result<Request> {
        let action = req.param_get(PARAM_ACTION).ok_or_else(|| {
            Error::request_invalid("signature version 0 requires the Action parameter")
        })?;
        let timestamp = format_iso8601_with_separator(self.time.unwrap_or_else(now));

        req.set_param(PARAM_ACCESS_KEY_ID, &cred.access_key_id);
        req.set_param(PARAM_SIGNATURE_VERSION, "0");
        req.set_param(PARAM_TIMESTAMP, &timestamp);

        let string_to_sign = format!("{action}{timestamp}");
        debug!("calculated string to sign: {string_to_sign}");

        let signature = base64_hmac_sha1(
            cred.secret_access_key.as_bytes(),
            string_to_sign.as_bytes(),
        );
        req.set_param(PARAM_SIGNATURE, &signature);

        Ok(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Method;
    use chrono::{TimeZone, Utc};
    use nifsign_core::ErrorKind;
    use pretty_assertions::assert_eq;

    fn signer() -> SignerV0 {
        SignerV0::new().with_time(Utc.with_ymd_and_hms(2022, 3, 1, 8, 12, 34).unwrap())
    }

    #[test]
    fn test_sign_get() -> anyhow::Result<()> {
        let req = Request::new(
            Method::Get,
            "https://computing.jp-east-1.api.cloud.nifty.com/?Action=DescribeInstances&Version=1",
        );

        let req = signer().sign_request(
            req,
            &Credential::new("ACCESSKEY", "SECRETKEY"),
            &Config::new("computing"),
        )?;

        assert_eq!(
            req.url,
            "https://computing.jp-east-1.api.cloud.nifty.com/?Action=DescribeInstances&Version=1\
             &AccessKeyId=ACCESSKEY&SignatureVersion=0&Timestamp=2022-03-01T08%3A12%3A34Z\
             &Signature=vYc%2FeS%2FNHEfJR2PmXa07HJ6QzK0%3D"
        );
        assert!(req.body.is_empty());
        Ok(())
    }

    #[test]
    fn test_sign_post() -> anyhow::Result<()> {
        let req = Request::new(Method::Post, "https://computing.api.cloud.nifty.com/")
            .with_body(vec![("Action".to_string(), "DescribeInstances".to_string())]);

        let req = signer().sign_request(
            req,
            &Credential::new("ACCESSKEY", "SECRETKEY"),
            &Config::new("computing"),
        )?;

        assert_eq!(req.url, "https://computing.api.cloud.nifty.com/");
        assert_eq!(
            req.body_get("Signature").as_deref(),
            Some("vYc/eS/NHEfJR2PmXa07HJ6QzK0=")
        );
        assert_eq!(req.body_get("SignatureVersion").as_deref(), Some("0"));
        Ok(())
    }

    #[test]
    fn test_missing_action() {
        let req = Request::new(Method::Get, "https://computing.api.cloud.nifty.com/");

        let err = signer()
            .sign_request(
                req,
                &Credential::new("ACCESSKEY", "SECRETKEY"),
                &Config::new("computing"),
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    }
}
