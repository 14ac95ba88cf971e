//! Article commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use blogdesk_core::model::{ArticleQuery, NewArticle};

use crate::output;
use crate::session::CliContext;

#[derive(Args, Debug)]
pub struct ArticlesCommand {
    #[command(subcommand)]
    pub command: ArticlesSubcommand,
}

#[derive(Args, Debug)]
pub struct PageArgs {
    /// Zero-based page index
    #[arg(long)]
    pub page: Option<u32>,

    /// Page size
    #[arg(long)]
    pub size: Option<u32>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
pub struct ArticleFields {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub content: Option<String>,

    #[arg(long)]
    pub summary: Option<String>,

    #[arg(long)]
    pub cover_url: Option<String>,

    /// Publication state, e.g. DRAFT or PUBLISHED
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ArticlesSubcommand {
    /// List articles
    List {
        /// Only articles in this state
        #[arg(long)]
        status: Option<String>,

        #[command(flatten)]
        paging: PageArgs,
    },

    /// Fetch one article
    Get {
        id: String,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Search articles by keyword
    Search {
        keyword: String,

        #[command(flatten)]
        paging: PageArgs,
    },

    /// Create an article
    Create {
        #[arg(long)]
        title: String,

        #[arg(long)]
        content: String,

        #[arg(long)]
        summary: Option<String>,

        #[arg(long)]
        cover_url: Option<String>,

        #[arg(long)]
        status: Option<String>,
    },

    /// Update fields of an existing article
    Update {
        id: String,

        #[command(flatten)]
        fields: ArticleFields,
    },

    /// Delete an article
    Delete { id: String },
}

pub async fn handle(cmd: ArticlesCommand, ctx: &CliContext) -> Result<()> {
    let articles = ctx.client.articles();

    match cmd.command {
        ArticlesSubcommand::List { status, paging } => {
            let query = ArticleQuery {
                page: paging.page,
                size: paging.size,
                status,
                keyword: None,
            };
            let page = articles
                .list(&query)
                .await
                .context("Failed to list articles")?;
            output::page(&page, paging.pretty)
        }
        ArticlesSubcommand::Get { id, pretty } => {
            let article = articles.get(&id).await.context("Failed to fetch article")?;
            output::json(&article, pretty)
        }
        ArticlesSubcommand::Search { keyword, paging } => {
            let query = ArticleQuery {
                page: paging.page,
                size: paging.size,
                status: None,
                keyword: Some(keyword),
            };
            let page = articles
                .search(&query)
                .await
                .context("Failed to search articles")?;
            output::page(&page, paging.pretty)
        }
        ArticlesSubcommand::Create {
            title,
            content,
            summary,
            cover_url,
            status,
        } => {
            ctx.require_login()?;
            let draft = NewArticle {
                title,
                content,
                summary,
                cover_url,
                status,
            };
            let article = articles
                .create(&draft)
                .await
                .context("Failed to create article")?;
            output::success("Article created");
            output::field("ID", &article.id);
            Ok(())
        }
        ArticlesSubcommand::Update { id, fields } => {
            ctx.require_login()?;
            let mut article = articles.get(&id).await.context("Failed to fetch article")?;

            if let Some(title) = fields.title {
                article.title = title;
            }
            if let Some(content) = fields.content {
                article.content = content;
            }
            article.summary = fields.summary.or(article.summary);
            article.cover_url = fields.cover_url.or(article.cover_url);
            article.status = fields.status.or(article.status);

            articles
                .update(&article)
                .await
                .context("Failed to update article")?;
            output::success("Article updated");
            Ok(())
        }
        ArticlesSubcommand::Delete { id } => {
            ctx.require_login()?;
            articles
                .delete(&id)
                .await
                .context("Failed to delete article")?;
            output::success(&format!("Deleted article {id}"));
            Ok(())
        }
    }
}
