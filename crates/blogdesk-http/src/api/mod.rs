//! Endpoint wrappers grouped by resource.

mod article;
mod comment;
mod user;

pub use article::ArticleApi;
pub use comment::{CommentApi, DEFAULT_PAGE_SIZE};
pub use user::UserApi;
