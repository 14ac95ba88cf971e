//! Article endpoints.

use tracing::{debug, instrument};

use blogdesk_core::Result;
use blogdesk_core::model::{Article, ArticleQuery, NewArticle, Page};

use crate::client::ApiClient;
use crate::endpoints::*;

/// Typed wrappers for `/api/articles`.
#[derive(Debug, Clone)]
pub struct ArticleApi {
    client: ApiClient,
}

impl ArticleApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List articles, optionally filtered by status.
    #[instrument(skip(self))]
    pub async fn list(&self, query: &ArticleQuery) -> Result<Page<Article>> {
        debug!("Listing articles");
        self.client.get_with_query(ARTICLES, query).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Article> {
        self.client.get(&article(id)?).await
    }

    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create(&self, draft: &NewArticle) -> Result<Article> {
        debug!("Creating article");
        self.client.post(ARTICLES, draft).await
    }

    /// Replace an article; the path is taken from `updated.id`.
    #[instrument(skip(self, updated), fields(id = %updated.id))]
    pub async fn update(&self, updated: &Article) -> Result<Article> {
        debug!("Updating article");
        self.client.put(&article(&updated.id)?, updated).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<()> {
        debug!("Deleting article");
        self.client
            .delete::<serde_json::Value>(&article(id)?)
            .await
            .map(drop)
    }

    #[instrument(skip(self))]
    pub async fn search(&self, query: &ArticleQuery) -> Result<Page<Article>> {
        self.client.get_with_query(ARTICLES_SEARCH, query).await
    }
}
