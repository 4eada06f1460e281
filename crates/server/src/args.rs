//! Lookup argument parsing.
//!
//! Arguments arrive either as a JSON body (`Content-Type: application/json`)
//! or as form values from the query string and an urlencoded body.

use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderMap;
use serde::Deserialize;

use crate::error::ServerError;

/// Parsed `key`, `min` and `max` for a service lookup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LookupArgs {
    #[serde(default)]
    pub key: String,
    pub min: usize,
    pub max: usize,
}

impl LookupArgs {
    /// Parse arguments from the request parts.
    pub fn parse(headers: &HeaderMap, query: Option<&str>, body: &[u8]) -> Result<Self, ServerError> {
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        if content_type.starts_with("application/json") {
            return serde_json::from_slice(body)
                .map_err(|e| ServerError::BadRequest(format!("invalid JSON body: {e}")));
        }

        let mut pairs: Vec<(String, String)> = Vec::new();
        if content_type.starts_with("application/x-www-form-urlencoded") {
            pairs.extend(form_urlencoded::parse(body).into_owned());
        }
        if let Some(query) = query {
            pairs.extend(form_urlencoded::parse(query.as_bytes()).into_owned());
        }

        let value = |name: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
        };

        Ok(Self {
            key: value("key").unwrap_or_default().to_owned(),
            min: parse_count(value("min"), "min")?,
            max: parse_count(value("max"), "max")?,
        })
    }
}

fn parse_count(raw: Option<&str>, name: &str) -> Result<usize, ServerError> {
    let raw = raw.ok_or_else(|| ServerError::BadRequest(format!("missing argument: {name}")))?;
    raw.trim()
        .parse()
        .map_err(|e| ServerError::BadRequest(format!("invalid {name} {raw:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    #[test]
    fn test_parse_form_body() {
        let args = LookupArgs::parse(
            &headers("application/x-www-form-urlencoded"),
            None,
            b"key=k&min=2&max=3",
        )
        .unwrap();
        assert_eq!(args, LookupArgs { key: "k".into(), min: 2, max: 3 });
    }

    #[test]
    fn test_parse_query_string() {
        let args = LookupArgs::parse(&HeaderMap::new(), Some("key=a%2Fb&min=1&max=1"), b"").unwrap();
        assert_eq!(args.key, "a/b");
        assert_eq!((args.min, args.max), (1, 1));
    }

    #[test]
    fn test_body_takes_precedence_over_query() {
        let args = LookupArgs::parse(
            &headers("application/x-www-form-urlencoded"),
            Some("min=9"),
            b"key=k&min=1&max=2",
        )
        .unwrap();
        assert_eq!(args.min, 1);
    }

    #[test]
    fn test_parse_json() {
        let args = LookupArgs::parse(
            &headers("application/json"),
            None,
            br#"{"key":"k","min":1,"max":1}"#,
        )
        .unwrap();
        assert_eq!(args, LookupArgs { key: "k".into(), min: 1, max: 1 });
    }

    #[test]
    fn test_missing_and_invalid_arguments() {
        let form = headers("application/x-www-form-urlencoded");
        let err = LookupArgs::parse(&form, None, b"").unwrap_err();
        assert_eq!(err.to_string(), "missing argument: min");

        let err = LookupArgs::parse(&form, None, b"min=1&max=x").unwrap_err();
        assert!(err.to_string().starts_with("invalid max"));

        let err = LookupArgs::parse(&form, None, b"min=-1&max=1").unwrap_err();
        assert!(err.to_string().starts_with("invalid min"));

        let json = headers("application/json");
        assert!(LookupArgs::parse(&json, None, b"{").is_err());
    }
}
