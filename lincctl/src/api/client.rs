//! Generic JSON-over-HTTP client for the LINC REST API.

use reqwest::{Client, Method, RequestBuilder, header};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::ApiConfig;
use crate::errors::{Error, Result};

/// Thin wrapper around [`reqwest::Client`] that knows the API root and the bearer token.
///
/// Every helper returns the decoded JSON body on success. Non-success responses are turned into
/// [`Error`] via [`Error::from_response`], which pulls the message out of `detail` when present.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    api_root: Url,
    token: Option<String>,
}

/// Makes sure a url has a trailing slash.
///
/// `Url::join` replaces the last path segment unless the base ends in a slash, so
/// `/api/v1` + `users/` would give `/api/users/`.
fn ensure_slash(url: &Url) -> Url {
    if url.path().ends_with('/') {
        url.clone()
    } else {
        let mut new_url = url.clone();
        let mut path = new_url.path().to_string();
        path.push('/');
        new_url.set_path(&path);
        new_url
    }
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        let api_root = ensure_slash(&config.base_url)
            .join(config.prefix.trim_start_matches('/'))
            .map(|url| ensure_slash(&url))
            .map_err(|e| Error::Internal {
                operation: format!("construct API root from {} and {}: {e}", config.base_url, config.prefix),
            })?;

        Ok(Self {
            client,
            api_root,
            token: config.token.clone(),
        })
    }

    /// Replace the bearer token, e.g. after the operator logs in elsewhere.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn api_root(&self) -> &Url {
        &self.api_root
    }

    /// Resolve an endpoint path relative to the API root.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.api_root.join(path.trim_start_matches('/')).map_err(|e| Error::Internal {
            operation: format!("construct URL for {path}: {e}"),
        })
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let mut builder = self.client.request(method, url).header(header::ACCEPT, "application/json");
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        self.send(Method::GET, self.request(Method::GET, url)).await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        self.send(Method::GET, self.request(Method::GET, url).query(query)).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        self.send(Method::POST, self.request(Method::POST, url).json(body)).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        self.send(Method::PUT, self.request(Method::PUT, url).json(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        self.send(Method::DELETE, self.request(Method::DELETE, url)).await
    }

    #[instrument(skip(self, builder), err)]
    async fn send<T: DeserializeOwned>(&self, method: Method, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await?;
        let status = response.status();
        let url = response.url().clone();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(%status, %url, "API request failed");
            return Err(Error::from_response(status, &body));
        }

        debug!(%status, %url, bytes = body.len(), "API request succeeded");

        serde_json::from_str::<T>(&body).map_err(|e| {
            tracing::error!("Failed to parse response body as JSON. Error: {}", e);
            tracing::debug!("Response body was: {}", body);
            Error::Internal {
                operation: format!("decode response from {method} {url}: {e}"),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{test_api_config, test_client};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_endpoint_joins_prefix() {
        let mut config = ApiConfig::default();
        config.base_url = Url::parse("https://linc.example.gov.za/console").unwrap();
        let client = ApiClient::new(&config).unwrap();

        assert_eq!(client.api_root().as_str(), "https://linc.example.gov.za/console/api/v1/");
        assert_eq!(
            client.endpoint("/user-groups/").unwrap().as_str(),
            "https://linc.example.gov.za/console/api/v1/user-groups/"
        );
    }

    #[tokio::test]
    async fn test_bearer_token_is_attached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/ping"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let body: serde_json::Value = client.get("ping").await.unwrap();
        assert_eq!(body, json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_no_token_means_no_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/ping"))
            .respond_with(|req: &wiremock::Request| {
                if req.headers.contains_key("authorization") {
                    ResponseTemplate::new(400)
                } else {
                    ResponseTemplate::new(200).set_body_json(json!([]))
                }
            })
            .mount(&server)
            .await;

        let mut config = test_api_config(&server);
        config.token = None;
        let client = ApiClient::new(&config).unwrap();
        let body: Vec<serde_json::Value> = client.get("ping").await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_query_and_body_are_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/items/"))
            .and(query_param("skip", "0"))
            .and(query_param("limit", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/items/"))
            .and(body_json(json!({"name": "x"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"name": "x", "id": 1})))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let items: Vec<i32> = client.get_with_query("items/", &[("skip", 0), ("limit", 5)]).await.unwrap();
        assert_eq!(items, vec![1, 2]);

        let created: serde_json::Value = client.post("items/", &json!({"name": "x"})).await.unwrap();
        assert_eq!(created["id"], 1);
    }

    #[tokio::test]
    async fn test_error_detail_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/v1/items/1"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"detail": "Invalid province"})))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client.put::<_, serde_json::Value>("items/1", &json!({})).await.unwrap_err();
        assert_eq!(err.user_message(), "Invalid province");
    }

    #[tokio::test]
    async fn test_undecodable_body_is_internal_error() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/items/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client.delete::<serde_json::Value>("items/1").await.unwrap_err();
        assert!(matches!(err, Error::Internal { .. }));
    }
}
