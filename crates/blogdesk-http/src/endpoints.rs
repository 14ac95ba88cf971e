//! Endpoint paths of the blog backend.
//!
//! Builders that embed an id return the path with the id percent-encoded
//! as one segment.

use blogdesk_core::{PathSegment, Result};

// ============================================================================
// Users
// ============================================================================

pub const USERS_REGISTER: &str = "/api/users/register";

pub const USERS_VERIFY_CODE: &str = "/api/users/verify-code";

pub const USERS_LOGIN: &str = "/api/users/login";

pub const USERS_LOGOUT: &str = "/api/users/logout";

/// Takes the address as an `email` query parameter.
pub const USERS_FORGOT_PASSWORD: &str = "/api/users/forgot-password";

pub const USERS_RESET_PASSWORD: &str = "/api/users/reset-password";

pub const USERS_CHANGE_PASSWORD: &str = "/api/users/change-password";

pub const USERS_ME: &str = "/api/users/me";

pub const USERS_PROFILE: &str = "/api/users/profile";

pub fn user(user_id: &str) -> Result<String> {
    Ok(format!("/api/users/{}", PathSegment::new(user_id)?))
}

// ============================================================================
// Articles
// ============================================================================

pub const ARTICLES: &str = "/api/articles";

pub const ARTICLES_SEARCH: &str = "/api/articles/search";

pub fn article(id: &str) -> Result<String> {
    Ok(format!("{}/{}", ARTICLES, PathSegment::new(id)?))
}

// ============================================================================
// Comments
// ============================================================================

pub const COMMENTS: &str = "/api/comments";

pub fn article_comments(article_id: &str) -> Result<String> {
    Ok(format!("{}/article/{}", COMMENTS, PathSegment::new(article_id)?))
}

pub fn comment_children(parent_id: &str) -> Result<String> {
    Ok(format!("{}/{}/children", COMMENTS, PathSegment::new(parent_id)?))
}
