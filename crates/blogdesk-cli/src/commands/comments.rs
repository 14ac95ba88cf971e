//! Comment commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use blogdesk_core::model::NewComment;

use crate::output;
use crate::session::CliContext;

#[derive(Args, Debug)]
pub struct CommentsCommand {
    #[command(subcommand)]
    pub command: CommentsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum CommentsSubcommand {
    /// List top-level comments of an article
    List {
        article_id: String,

        /// Zero-based page index
        #[arg(long)]
        page: Option<u32>,

        /// Page size
        #[arg(long)]
        size: Option<u32>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Post a comment as the signed-in user
    Create {
        article_id: String,

        content: String,

        /// Top-level comment to reply to
        #[arg(long)]
        parent_id: Option<String>,

        /// User being replied to
        #[arg(long, requires = "parent_id")]
        reply_user_id: Option<String>,
    },

    /// List replies to a comment
    Children {
        parent_id: String,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

pub async fn handle(cmd: CommentsCommand, ctx: &CliContext) -> Result<()> {
    let comments = ctx.client.comments();

    match cmd.command {
        CommentsSubcommand::List {
            article_id,
            page,
            size,
            pretty,
        } => {
            let page = comments
                .list_for_article(&article_id, page, size)
                .await
                .context("Failed to list comments")?;
            output::page(&page, pretty)
        }
        CommentsSubcommand::Create {
            article_id,
            content,
            parent_id,
            reply_user_id,
        } => {
            let user_id = ctx.require_login()?;
            let comment = NewComment {
                content,
                article_id,
                user_id,
                parent_id,
                reply_user_id,
            };
            let created = comments
                .create(&comment)
                .await
                .context("Failed to post comment")?;
            output::success("Comment posted");
            output::field("ID", &created.id);
            Ok(())
        }
        CommentsSubcommand::Children { parent_id, pretty } => {
            let replies = comments
                .children(&parent_id)
                .await
                .context("Failed to fetch replies")?;
            if replies.is_empty() {
                output::note("No replies.");
            }
            for reply in &replies {
                output::json(reply, pretty)?;
            }
            Ok(())
        }
    }
}
