//! HTTP request wrapper for the blog API.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace};

use blogdesk_core::error::{ApiError, InvalidInputError, SUCCESS_CODE, TransportError};
use blogdesk_core::{ApiConfig, Envelope, Error, Result, TokenStore};

/// HTTP client bound to one API origin.
///
/// Every request goes to the configured origin with the configured timeout,
/// carries `Authorization: Bearer <token>` when the token store holds a
/// token, and resolves to the payload of the `{code, message, data}`
/// envelope.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    config: ApiConfig,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// Create a new client from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: ApiConfig, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("blogdesk/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()
            .map_err(|e| TransportError::Http {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            config,
            tokens,
        })
    }

    /// Returns the configuration this client was built with.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Returns the token store consulted before every request.
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// GET `path` and return the envelope payload.
    #[instrument(skip(self), fields(origin = %self.config.base_origin()))]
    pub async fn get<R>(&self, path: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        debug!("API GET");
        let request = self.client.get(self.url(path));
        self.send(request).await
    }

    /// GET `path` with query parameters.
    #[instrument(skip(self), fields(origin = %self.config.base_origin()))]
    pub async fn get_with_query<Q, R>(&self, path: &str, query: &Q) -> Result<R>
    where
        Q: Serialize + std::fmt::Debug,
        R: DeserializeOwned,
    {
        debug!("API GET");
        trace!(?query, "query parameters");
        let request = self.client.get(self.url(path)).query(query);
        self.send(request).await
    }

    /// POST a JSON body to `path`.
    #[instrument(skip(self, body), fields(origin = %self.config.base_origin()))]
    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        debug!("API POST");
        let request = self.client.post(self.url(path)).json(body);
        self.send(request).await
    }

    /// POST to `path` without a body.
    #[instrument(skip(self), fields(origin = %self.config.base_origin()))]
    pub async fn post_empty<R>(&self, path: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        debug!("API POST (no body)");
        let request = self.client.post(self.url(path));
        self.send(request).await
    }

    /// POST to `path` with query parameters and no body.
    #[instrument(skip(self, query), fields(origin = %self.config.base_origin()))]
    pub async fn post_with_query<Q, R>(&self, path: &str, query: &Q) -> Result<R>
    where
        Q: Serialize,
        R: DeserializeOwned,
    {
        debug!("API POST (query)");
        let request = self.client.post(self.url(path)).query(query);
        self.send(request).await
    }

    /// PUT a JSON body to `path`.
    #[instrument(skip(self, body), fields(origin = %self.config.base_origin()))]
    pub async fn put<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        debug!("API PUT");
        let request = self.client.put(self.url(path)).json(body);
        self.send(request).await
    }

    /// DELETE `path`.
    #[instrument(skip(self), fields(origin = %self.config.base_origin()))]
    pub async fn delete<R>(&self, path: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        debug!("API DELETE");
        let request = self.client.delete(self.url(path));
        self.send(request).await
    }

    fn url(&self, path: &str) -> String {
        self.config.base_origin().endpoint(path)
    }

    async fn send<R: DeserializeOwned>(&self, request: RequestBuilder) -> Result<R> {
        let request = self.authorize(request)?;
        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        self.handle_response(response).await
    }

    /// Attach the bearer header when a token is stored.
    fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let Some(token) = self.tokens.load()? else {
            return Ok(request);
        };

        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.as_str())).map_err(
            |_| InvalidInputError::Token {
                reason: "not representable as a header value".to_string(),
            },
        )?;
        value.set_sensitive(true);
        trace!("Attaching bearer token");

        Ok(request.header(AUTHORIZATION, value))
    }

    /// Unwrap the response envelope into the payload or an error.
    async fn handle_response<R: DeserializeOwned>(&self, response: Response) -> Result<R> {
        let status = response.status();
        trace!(status = %status, "API response");

        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;

        match serde_json::from_slice::<Envelope>(&body) {
            Ok(envelope) if status.is_success() => envelope.into_data(),
            Ok(envelope) => {
                let mut error = envelope.into_api_error();
                if error.code == SUCCESS_CODE {
                    error.code = i32::from(status.as_u16());
                }
                Err(error.into())
            }
            Err(e) if status.is_success() => Err(TransportError::Decode {
                message: e.to_string(),
            }
            .into()),
            Err(_) => Err(ApiError::new(i32::from(status.as_u16()), None).into()),
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        let error = if err.is_timeout() {
            TransportError::Timeout {
                duration_ms: u64::try_from(self.config.timeout().as_millis()).unwrap_or(u64::MAX),
            }
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else if err.is_decode() {
            TransportError::Decode {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        };
        debug!(error = %error, "API transport failure");
        error.into()
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
