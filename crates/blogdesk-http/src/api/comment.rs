//! Comment endpoints.

use serde::Serialize;
use tracing::{instrument, warn};

use blogdesk_core::model::{Comment, NewComment, Page};
use blogdesk_core::{Error, Result};

use crate::client::ApiClient;
use crate::endpoints::*;

/// Default page size for comment listings.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Serialize)]
struct PageQuery {
    page: u32,
    size: u32,
}

/// Typed wrappers for `/api/comments`.
#[derive(Debug, Clone)]
pub struct CommentApi {
    client: ApiClient,
}

impl CommentApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self, comment), fields(article_id = %comment.article_id))]
    pub async fn create(&self, comment: &NewComment) -> Result<Comment> {
        self.client
            .post(COMMENTS, comment)
            .await
            .inspect_err(|e| log_failure("Posting comment failed", e))
    }

    /// One page of top-level comments; `page` is zero-based.
    #[instrument(skip(self))]
    pub async fn list_for_article(
        &self,
        article_id: &str,
        page: Option<u32>,
        size: Option<u32>,
    ) -> Result<Page<Comment>> {
        let query = PageQuery {
            page: page.unwrap_or(0),
            size: size.unwrap_or(DEFAULT_PAGE_SIZE),
        };
        self.client
            .get_with_query(&article_comments(article_id)?, &query)
            .await
            .inspect_err(|e| log_failure("Fetching article comments failed", e))
    }

    /// Replies to a top-level comment.
    #[instrument(skip(self))]
    pub async fn children(&self, parent_id: &str) -> Result<Vec<Comment>> {
        self.client
            .get(&comment_children(parent_id)?)
            .await
            .inspect_err(|e| log_failure("Fetching replies failed", e))
    }
}

fn log_failure(what: &str, error: &Error) {
    warn!(error = %error, "{}", what);
}
