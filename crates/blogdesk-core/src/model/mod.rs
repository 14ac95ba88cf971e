//! Wire types for articles, comments and accounts.

mod article;
mod comment;
mod user;

pub use article::{Article, ArticleQuery, NewArticle, Page};
pub use comment::{Comment, CommentAuthor, NewComment};
pub use user::{
    LoginResponse, PasswordChange, PasswordReset, ProfileUpdate, Registration, User,
    VerifyCodeRequest,
};
