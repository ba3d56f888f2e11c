use std::fmt::{Display, Formatter};

use http::HeaderMap;
use nifsign_core::{Error, Result};
use percent_encoding::utf8_percent_encode;

use crate::constants::{QUERY_ENCODE_SET, REQUOTE_ENCODE_SET};

/// HTTP methods accepted by NIFCLOUD APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Parameters travel in the URL query.
    Get,
    /// Parameters travel in a form encoded body.
    Post,
}

impl Method {
    /// The method name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<http::Method> for Method {
    type Error = Error;

    fn try_from(method: http::Method) -> Result<Self> {
        match method {
            http::Method::GET => Ok(Method::Get),
            http::Method::POST => Ok(Method::Post),
            m => Err(Error::unsupported_method(format!(
                "method {m} is not supported, only GET and POST are"
            ))),
        }
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => http::Method::GET,
            Method::Post => http::Method::POST,
        }
    }
}

/// A request flowing through the signing pipeline.
///
/// For GET the parameters live in the query of `url` and `body` is empty,
/// for POST they live in `body`.
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// Fully qualified url, including the query for GET.
    pub url: String,
    /// Form parameters sent as the POST body.
    pub body: Vec<(String, String)>,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl Request {
    /// Create a request without body and headers.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: Vec::new(),
            headers: HeaderMap::new(),
        }
    }

    /// Set the body parameters.
    pub fn with_body(mut self, body: Vec<(String, String)>) -> Self {
        self.body = body;
        self
    }

    /// Set the headers.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Raw query part of the url, without `?`.
    pub fn raw_query(&self) -> &str {
        self.url.split_once('?').map(|(_, q)| q).unwrap_or_default()
    }

    /// Decoded query pairs of the url, in order.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        form_urlencoded::parse(self.raw_query().as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    /// Value of `key` in the url query, the last occurrence wins.
    pub fn query_get(&self, key: &str) -> Option<String> {
        last_value(self.query_pairs().into_iter(), key)
    }

    /// Value of `key` in the body, the last occurrence wins.
    pub fn body_get(&self, key: &str) -> Option<String> {
        last_value(self.body.iter().cloned(), key)
    }

    /// The parameters subject to query signatures: url query for GET, body for POST.
    pub fn params(&self) -> Vec<(String, String)> {
        match self.method {
            Method::Get => self.query_pairs(),
            Method::Post => self.body.clone(),
        }
    }

    /// Value of `key` among [`Request::params`], the last occurrence wins.
    pub fn param_get(&self, key: &str) -> Option<String> {
        match self.method {
            Method::Get => self.query_get(key),
            Method::Post => self.body_get(key),
        }
    }

    /// Parse the url, percent encoding characters a URI can't carry.
    ///
    /// Values are copied into the GET query as they are, so a space or a
    /// control character becomes `%XX` here. Existing escapes are kept.
    pub fn uri(&self) -> Result<http::Uri> {
        let url = utf8_percent_encode(&self.url, &REQUOTE_ENCODE_SET).to_string();
        Ok(url.parse()?)
    }

    /// Set a parameter, replacing every existing occurrence of `key`.
    ///
    /// For GET the pair is appended to the url query percent encoded, the
    /// other query segments are kept as they are.
    pub fn set_param(&mut self, key: &str, value: &str) {
        match self.method {
            Method::Get => {
                let (base, query) = match self.url.split_once('?') {
                    Some((base, query)) => (base, query),
                    None => (self.url.as_str(), ""),
                };

                let mut segments: Vec<String> = query
                    .split('&')
                    .filter(|seg| !seg.is_empty())
                    .filter(|seg| segment_key(seg) != key)
                    .map(str::to_string)
                    .collect();
                segments.push(format!(
                    "{}={}",
                    utf8_percent_encode(key, &QUERY_ENCODE_SET),
                    utf8_percent_encode(value, &QUERY_ENCODE_SET)
                ));

                self.url = format!("{base}?{}", segments.join("&"));
            }
            Method::Post => {
                self.body.retain(|(k, _)| k != key);
                self.body.push((key.to_string(), value.to_string()));
            }
        }
    }
}

/// Form encode body parameters as sent on the wire.
pub fn encode_form_body(body: &[(String, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(body)
        .finish()
}

fn segment_key(segment: &str) -> String {
    form_urlencoded::parse(segment.as_bytes())
        .next()
        .map(|(k, _)| k.into_owned())
        .unwrap_or_default()
}

fn last_value(pairs: impl Iterator<Item = (String, String)>, key: &str) -> Option<String> {
    pairs.filter(|(k, _)| k == key).map(|(_, v)| v).last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nifsign_core::ErrorKind;
    use pretty_assertions::assert_eq;

    fn pairs(v: &[(&str, &str)]) -> Vec<(String, String)> {
        v.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_method_conversion() {
        assert_eq!(Method::try_from(http::Method::GET).unwrap(), Method::Get);
        assert_eq!(Method::try_from(http::Method::POST).unwrap(), Method::Post);
        assert_eq!(http::Method::from(Method::Post), http::Method::POST);

        let err = Method::try_from(http::Method::PUT).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedMethod);
    }

    #[test]
    fn test_query_pairs() {
        let req = Request::new(
            Method::Get,
            "https://computing.api.cloud.nifty.com/?Action=DescribeInstances&Version=1",
        );
        assert_eq!(
            req.query_pairs(),
            pairs(&[("Action", "DescribeInstances"), ("Version", "1")])
        );
        assert_eq!(req.query_get("Version").as_deref(), Some("1"));
        assert_eq!(req.query_get("Missing"), None);
    }

    #[test]
    fn test_last_occurrence_wins() {
        let req = Request::new(Method::Get, "https://x/?SignatureVersion=1&SignatureVersion=0");
        assert_eq!(req.query_get("SignatureVersion").as_deref(), Some("0"));

        let req = Request::new(Method::Post, "https://x/")
            .with_body(pairs(&[("A", "1"), ("A", "2")]));
        assert_eq!(req.body_get("A").as_deref(), Some("2"));
    }

    #[test]
    fn test_set_param_get_keeps_other_segments() {
        let mut req = Request::new(Method::Get, "https://x/path/?b=2&a=1&Signature=old");
        req.set_param("Signature", "a+b/c=");
        req.set_param("Timestamp", "2022-03-01T08:12:34Z");

        assert_eq!(
            req.url,
            "https://x/path/?b=2&a=1&Signature=a%2Bb%2Fc%3D&Timestamp=2022-03-01T08%3A12%3A34Z"
        );
        assert_eq!(req.query_get("Signature").as_deref(), Some("a+b/c="));
    }

    #[test]
    fn test_set_param_get_without_query() {
        let mut req = Request::new(Method::Get, "https://x/");
        req.set_param("AccessKeyId", "ak");
        assert_eq!(req.url, "https://x/?AccessKeyId=ak");
    }

    #[test]
    fn test_set_param_post() {
        let mut req = Request::new(Method::Post, "https://x/")
            .with_body(pairs(&[("Action", "Run"), ("SignatureVersion", "9")]));
        req.set_param("SignatureVersion", "2");

        assert_eq!(req.url, "https://x/");
        assert_eq!(req.body, pairs(&[("Action", "Run"), ("SignatureVersion", "2")]));
    }

    #[test]
    fn test_uri_requotes_illegal_characters() -> anyhow::Result<()> {
        let req = Request::new(
            Method::Get,
            "https://x/a b/?Description=my server&Name=\u{30b5}\u{30fc}\u{30d0}\u{30fc}&Tab=a\tb&Sig=a%2Bb%3D",
        );

        let uri = req.uri()?;
        assert_eq!(
            uri.to_string(),
            "https://x/a%20b/?Description=my%20server\
             &Name=%E3%82%B5%E3%83%BC%E3%83%90%E3%83%BC&Tab=a%09b&Sig=a%2Bb%3D"
        );
        // The raw url is left as is for signing.
        assert_eq!(req.query_get("Description").as_deref(), Some("my server"));
        Ok(())
    }

    #[test]
    fn test_uri_keeps_valid_url() -> anyhow::Result<()> {
        let url = "https://x/path/?Action=Run&Timestamp=2022-03-01T08%3A12%3A34Z";
        assert_eq!(Request::new(Method::Get, url).uri()?.to_string(), url);
        Ok(())
    }

    #[test]
    fn test_encode_form_body() {
        let body = pairs(&[("Action", "Run Script"), ("Sig", "a+b=")]);
        assert_eq!(encode_form_body(&body), "Action=Run+Script&Sig=a%2Bb%3D");
    }
}
