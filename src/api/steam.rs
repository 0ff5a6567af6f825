use std::time::Duration;

use reqwest::redirect::Policy;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::debug;

use crate::error::FetchError;

const USER_AGENT: &str =
    "Mozilla/5.0 (compatible; Dota2WebApi/1.0; +https://github.com/dota2-match-info)";
const MAX_REDIRECTS: usize = 10;

/// Client for Steam Web API endpoints returning JSON
#[derive(Clone)]
pub struct SteamWebClient {
    client: Client,
}

impl SteamWebClient {
    /// Create a new client with the given per-request timeout
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let redirect = Policy::custom(|attempt| {
            if attempt.previous().len() >= MAX_REDIRECTS {
                attempt.error("too many redirects")
            } else if is_http(attempt.url()) {
                attempt.follow()
            } else {
                attempt.stop()
            }
        });

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .gzip(true)
            .deflate(true)
            .redirect(redirect)
            .build()?;

        Ok(Self { client })
    }

    /// GET `base_url` with the given query parameters and parse the body as JSON.
    ///
    /// Parameter values are appended verbatim; callers escape them first.
    pub async fn fetch_json(
        &self,
        base_url: &str,
        params: &[(&str, &str)],
    ) -> Result<Value, FetchError> {
        let url = request_url(base_url, params);

        let parsed = match Url::parse(&url) {
            Ok(parsed) if is_http(&parsed) => parsed,
            _ => return Err(FetchError::UnsupportedScheme(redact_key(&url))),
        };

        debug!("Requesting {}", redact_key(&url));

        let response = self.client.get(parsed).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        let body = response.bytes().await?;
        let json: Value = serde_json::from_slice(&body)?;

        Ok(json)
    }
}

/// Build `base?k1=v1&k2=v2` without escaping the values
pub fn request_url(base_url: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return base_url.to_string();
    }

    let query: Vec<String> = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect();

    format!("{}?{}", base_url, query.join("&"))
}

fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// Hide the API key when a URL ends up in logs or errors
fn redact_key(url: &str) -> String {
    match url.split_once('?') {
        Some((base, query)) => {
            let pairs: Vec<&str> = query
                .split('&')
                .map(|pair| {
                    if pair.starts_with("key=") {
                        "key=REDACTED"
                    } else {
                        pair
                    }
                })
                .collect();
            format!("{}?{}", base, pairs.join("&"))
        }
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_url_joins_params_in_order() {
        let url = request_url(
            "https://api.example.com/GetMatchDetails/v001/",
            &[("key", "abc"), ("match_id", "42")],
        );
        assert_eq!(url, "https://api.example.com/GetMatchDetails/v001/?key=abc&match_id=42");
    }

    #[test]
    fn test_request_url_leaves_values_unescaped() {
        let url = request_url("http://host/p", &[("steamids", "1,2,3")]);
        assert_eq!(url, "http://host/p?steamids=1,2,3");
    }

    #[test]
    fn test_request_url_without_params() {
        assert_eq!(request_url("http://host/p", &[]), "http://host/p");
    }

    #[test]
    fn test_redact_key() {
        assert_eq!(
            redact_key("http://host/p?key=secret&match_id=7"),
            "http://host/p?key=REDACTED&match_id=7"
        );
        assert_eq!(redact_key("http://host/p"), "http://host/p");
    }

    #[tokio::test]
    async fn test_rejects_non_http_scheme() {
        let client = SteamWebClient::new(Duration::from_secs(5)).unwrap();
        let err = client
            .fetch_json("ftp://example.com/data", &[("key", "secret")])
            .await
            .unwrap_err();

        match err {
            FetchError::UnsupportedScheme(url) => assert!(!url.contains("secret")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_json_parses_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api")
            .match_query(mockito::Matcher::UrlEncoded("key".into(), "k".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"result":{"match_id":5}}"#)
            .create_async()
            .await;

        let client = SteamWebClient::new(Duration::from_secs(5)).unwrap();
        let json = client
            .fetch_json(&format!("{}/api", server.url()), &[("key", "k")])
            .await
            .unwrap();

        assert_eq!(json["result"]["match_id"], 5);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_json_rejects_non_json_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api")
            .with_status(200)
            .with_body("<html>Forbidden</html>")
            .create_async()
            .await;

        let client = SteamWebClient::new(Duration::from_secs(5)).unwrap();
        let err = client
            .fetch_json(&format!("{}/api", server.url()), &[])
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn test_fetch_json_reports_http_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api")
            .with_status(403)
            .create_async()
            .await;

        let client = SteamWebClient::new(Duration::from_secs(5)).unwrap();
        let err = client
            .fetch_json(&format!("{}/api", server.url()), &[])
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Status(status) if status.as_u16() == 403));
    }
}
