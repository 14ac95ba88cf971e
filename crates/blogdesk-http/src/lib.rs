//! blogdesk-http - HTTP client and session store for the blog API
//!
//! All requests flow through one [`ApiClient`], which attaches the stored
//! bearer token and unwraps the `{code, message, data}` envelope. The
//! [`SessionStore`] layers the signed-in identity on top of it.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use blogdesk_core::model::ArticleQuery;
//! use blogdesk_core::{ApiConfig, Environment, MemoryTokenStore};
//! use blogdesk_http::BlogClient;
//!
//! # async fn example() -> Result<(), blogdesk_core::Error> {
//! let config = ApiConfig::for_env(Environment::Development);
//! let client = BlogClient::new(config, Arc::new(MemoryTokenStore::new()))?;
//!
//! let page = client.articles().list(&ArticleQuery::default()).await?;
//! for article in page.content {
//!     println!("{}: {}", article.id, article.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod endpoints;
pub mod session;

use std::sync::Arc;

use blogdesk_core::{ApiConfig, Result, TokenStore};

pub use api::{ArticleApi, CommentApi, UserApi};
pub use client::ApiClient;
pub use session::{BootstrapOutcome, Session, SessionStore};

/// Everything a front end needs, sharing one HTTP client and token store.
#[derive(Debug, Clone)]
pub struct BlogClient {
    session: SessionStore,
    articles: ArticleApi,
    comments: CommentApi,
}

impl BlogClient {
    /// Build the client and a logged-out session store.
    ///
    /// Call [`SessionStore::bootstrap`] afterwards to restore a stored token.
    pub fn new(config: ApiConfig, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        let client = ApiClient::new(config, tokens)?;
        Ok(Self {
            session: SessionStore::new(UserApi::new(client.clone())),
            articles: ArticleApi::new(client.clone()),
            comments: CommentApi::new(client),
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn users(&self) -> &UserApi {
        self.session.users()
    }

    pub fn articles(&self) -> &ArticleApi {
        &self.articles
    }

    pub fn comments(&self) -> &CommentApi {
        &self.comments
    }

    pub fn config(&self) -> &ApiConfig {
        self.users().client().config()
    }
}
