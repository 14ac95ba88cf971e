//! Comment types.

use serde::{Deserialize, Serialize};

/// The account shown next to a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentAuthor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
}

/// A comment on an article.
///
/// Replies carry the id of the top-level comment they belong to; top-level
/// comments have no `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,

    pub article_key: String,

    pub content: String,

    #[serde(alias = "user")]
    pub author: CommentAuthor,

    pub created_at: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl Comment {
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Request body for posting a comment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub content: String,

    pub article_id: String,

    pub user_id: String,

    /// Top-level comment being replied to; `None` posts a top-level comment.
    pub parent_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_user_id: Option<String>,
}
