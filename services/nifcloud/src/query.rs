use crate::request::Method;

/// Shape the caller's parameters for the given method.
///
/// Returns `(url_query, body)`:
///
/// - GET: keys are sorted byte-wise (stable for duplicated keys) and rendered
///   as `?key=value&...`, ready to be appended to the endpoint. The body is
///   empty. No parameter at all renders as an empty string.
/// - POST: the url query is empty and the parameters become the body as is.
///
/// Values are used verbatim, encoding is left to the caller.
pub fn normalize(
    method: Method,
    query: Vec<(String, String)>,
) -> (String, Vec<(String, String)>) {
    match method {
        Method::Get => {
            let mut query = query;
            query.sort_by(|(a, _), (b, _)| a.as_bytes().cmp(b.as_bytes()));

            if query.is_empty() {
                return (String::new(), Vec::new());
            }

            let rendered = query
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("&");
            (format!("?{rendered}"), Vec::new())
        }
        Method::Post => (String::new(), query),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pairs(v: &[(&str, &str)]) -> Vec<(String, String)> {
        v.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_get_sorts_keys() {
        let (query, body) = normalize(Method::Get, pairs(&[("b", "2"), ("a", "1")]));
        assert_eq!(query, "?a=1&b=2");
        assert!(body.is_empty());
    }

    #[test]
    fn test_get_sorts_byte_wise() {
        // Upper case sorts before lower case, not locale aware.
        let (query, _) = normalize(
            Method::Get,
            pairs(&[("action", "x"), ("Version", "1"), ("Action", "y"), ("_z", "0")]),
        );
        assert_eq!(query, "?Action=y&Version=1&_z=0&action=x");
    }

    #[test]
    fn test_get_empty_query() {
        let (query, body) = normalize(Method::Get, Vec::new());
        assert_eq!(query, "");
        assert!(body.is_empty());
    }

    #[test]
    fn test_post_keeps_body_unchanged() {
        let params = pairs(&[("b", "2"), ("a", "1")]);
        let (query, body) = normalize(Method::Post, params.clone());
        assert_eq!(query, "");
        assert_eq!(body, params);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let params = pairs(&[("Version", "1"), ("Action", "DescribeInstances")]);
        assert_eq!(
            normalize(Method::Get, params.clone()),
            normalize(Method::Get, params)
        );
    }
}
