//! Articles Page
//!
//! Read-only article browser. The full list is loaded once and filtered on the
//! client by category and search term.

use std::cell::RefCell;

use super::ActionResult;
use crate::host::Host;
use crate::http::Transport;
use crate::models::{Article, ArticleCategory};
use crate::render::{self, escape_html, truncate_chars};
use crate::sync::{report_failure, Container, LoadKind, LoadOutcome, PageContext};

pub const ARTICLES_PATH: &str = "/api/articles/";
pub const CATEGORIES_PATH: &str = "/api/article-categories/";

const PREVIEW_CHARS: usize = 100;

pub mod ids {
    pub const LIST: &str = "article-list";
    pub const EMPTY: &str = "empty-state";
    pub const CATEGORIES: &str = "category-filter";
    pub const SEARCH: &str = "search-input";
    pub const MODAL: &str = "articleDetailModal";
    pub const DETAIL_TITLE: &str = "articleDetailModalLabel";
    pub const DETAIL_CATEGORY: &str = "detail-category";
    pub const DETAIL_AUTHOR: &str = "detail-author";
    pub const DETAIL_DATE: &str = "detail-date";
    pub const DETAIL_VIEWS: &str = "detail-views";
    pub const DETAIL_CONTENT: &str = "article-content";
}

/// Client-side list filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleFilter {
    pub category: Option<u64>,
    /// Lowercased search term
    pub term: String,
}

impl ArticleFilter {
    /// From the raw select value and search box; an empty select means all
    pub fn new(category: &str, term: &str) -> Self {
        Self {
            category: category.trim().parse().ok(),
            term: term.trim().to_lowercase(),
        }
    }

    pub fn matches(&self, article: &Article) -> bool {
        if let Some(category) = self.category {
            if article.category != Some(category) {
                return false;
            }
        }
        self.term.is_empty()
            || article.title.to_lowercase().contains(&self.term)
            || article.content.to_lowercase().contains(&self.term)
    }

    pub fn apply<'a>(&self, articles: &'a [Article]) -> Vec<&'a Article> {
        articles.iter().filter(|a| self.matches(a)).collect()
    }
}

fn category_label(article: &Article) -> &str {
    article.category_name.as_deref().filter(|n| !n.is_empty()).unwrap_or("未分类")
}

fn author_label(article: &Article) -> &str {
    article.author_name.as_deref().filter(|n| !n.is_empty()).unwrap_or("匿名")
}

/// First 100 characters followed by `...`
pub fn preview(content: &str) -> String {
    if content.is_empty() {
        String::new()
    } else {
        format!("{}...", truncate_chars(content, PREVIEW_CHARS))
    }
}

pub fn render_cards(articles: &[&Article]) -> String {
    articles
        .iter()
        .map(|a| {
            format!(
                r#"<div class="col-md-6 col-lg-4 mb-4"><div class="card article-card h-100" data-action="view" data-id="{id}"><div class="card-body"><div class="mb-2"><span class="badge bg-primary">{category}</span></div><h5 class="card-title">{title}</h5><p class="card-text text-muted">{preview}</p></div><div class="card-footer bg-transparent border-top-0"><small class="text-muted"><i class="bi bi-person me-1"></i>{author}<span class="float-end"><i class="bi bi-eye me-1"></i>{views}</span></small></div></div></div>"#,
                id = a.id,
                category = escape_html(category_label(a)),
                title = escape_html(&a.title),
                preview = escape_html(&preview(&a.content)),
                author = escape_html(author_label(a)),
                views = a.views,
            )
        })
        .collect()
}

pub fn render_categories(categories: &[ArticleCategory]) -> String {
    let mut html = String::from(r#"<option value="">全部分类</option>"#);
    for c in categories {
        html.push_str(&format!(
            r#"<option value="{}">{} ({})</option>"#,
            c.id,
            escape_html(&c.name),
            c.article_count
        ));
    }
    html
}

/// Non-blank lines as escaped paragraphs
pub fn render_paragraphs(content: &str) -> String {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| format!("<p>{}</p>", escape_html(line)))
        .collect()
}

fn error_column(message: &str) -> String {
    format!(r#"<div class="col-12">{}</div>"#, render::error_state(message))
}

pub struct ArticlesPage<T, H> {
    ctx: PageContext<T, H>,
    articles: Container<Vec<Article>>,
    categories: Container<Vec<ArticleCategory>>,
    filter: RefCell<ArticleFilter>,
}

impl<T: Transport, H: Host> ArticlesPage<T, H> {
    pub fn new(ctx: PageContext<T, H>) -> Self {
        Self {
            ctx,
            articles: Container::new(ids::LIST).with_error_markup(error_column),
            categories: Container::new(ids::CATEGORIES),
            filter: RefCell::new(ArticleFilter::default()),
        }
    }

    pub async fn load_categories(&self) -> LoadOutcome<Vec<ArticleCategory>> {
        let fetch = self.ctx.client.get(CATEGORIES_PATH, &[]);
        let outcome = self.categories.load(&self.ctx, LoadKind::Secondary, fetch).await;
        if let LoadOutcome::Applied(categories) = &outcome {
            self.ctx.host.render(ids::CATEGORIES, render_categories(categories));
        }
        outcome
    }

    pub async fn reconcile(&self) -> LoadOutcome<Vec<Article>> {
        let fetch = self.ctx.client.get(ARTICLES_PATH, &[]);
        let outcome = self.articles.load(&self.ctx, LoadKind::Primary, fetch).await;
        if let LoadOutcome::Applied(articles) = &outcome {
            self.render_filtered(articles);
        } else if let LoadOutcome::Failed(_) = &outcome {
            self.ctx.host.set_hidden(ids::EMPTY, true);
        }
        outcome
    }

    /// Re-filter the cached list; never issues a request
    pub fn set_filter(&self, filter: ArticleFilter) {
        *self.filter.borrow_mut() = filter;
        self.articles.with_view(|articles| self.render_filtered(articles));
    }

    fn render_filtered(&self, articles: &[Article]) {
        let visible = self.filter.borrow().apply(articles);
        self.ctx.host.set_hidden(ids::EMPTY, !visible.is_empty());
        self.ctx.host.render(ids::LIST, render_cards(&visible));
    }

    /// Open the detail modal. The returned view count replaces the cached one.
    pub async fn view(&self, id: u64) -> ActionResult {
        let path = format!("{}{}/", ARTICLES_PATH, id);
        let article: Article = match self.ctx.client.get(&path, &[]).await {
            Ok(article) => article,
            Err(e) => {
                report_failure(&self.ctx, &e, "加载文章详情失败: ");
                return Err(e.into());
            }
        };

        let host = &self.ctx.host;
        host.set_text(ids::DETAIL_TITLE, &article.title);
        host.set_text(ids::DETAIL_CATEGORY, category_label(&article));
        host.set_text(ids::DETAIL_AUTHOR, author_label(&article));
        host.set_text(
            ids::DETAIL_DATE,
            article.publish_date.as_deref().and_then(|d| d.get(..10)).unwrap_or("--"),
        );
        host.set_text(ids::DETAIL_VIEWS, &article.views.to_string());
        host.render(ids::DETAIL_CONTENT, render_paragraphs(&article.content));
        host.show_modal(ids::MODAL, true);

        let patched = self.articles.patch_view(|articles| {
            if let Some(cached) = articles.iter_mut().find(|a| a.id == id) {
                cached.views = article.views;
            }
        });
        if patched {
            self.articles.with_view(|articles| self.render_filtered(articles));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Method;
    use crate::testing::Harness;
    use serde_json::json;

    fn seed(harness: &Harness) {
        harness.backend.seed(
            "articles",
            json!({"title": "Sleep Hygiene", "content": "Go to bed early.\n\nAvoid screens.", "category": 1, "category_name": "睡眠", "author_name": "王医生", "views": 5, "publish_date": "2024-04-01T08:00:00Z"}),
        );
        harness.backend.seed(
            "articles",
            json!({"title": "跑步入门", "content": "循序渐进", "category": 2, "views": 0}),
        );
    }

    #[test]
    fn test_filter_category_and_case_insensitive_term() {
        let articles: Vec<Article> = serde_json::from_value(json!([
            {"id": 1, "title": "Sleep Hygiene", "content": "bed", "category": 1},
            {"id": 2, "title": "Running", "content": "Better SLEEP after runs", "category": 2},
            {"id": 3, "title": "Diet", "content": "", "category": 2}
        ]))
        .unwrap();

        let ids = |f: &ArticleFilter| f.apply(&articles).iter().map(|a| a.id).collect::<Vec<_>>();
        assert_eq!(ids(&ArticleFilter::new("", "sleep")), vec![1, 2]);
        assert_eq!(ids(&ArticleFilter::new("2", " SLEEP ")), vec![2]);
        assert_eq!(ids(&ArticleFilter::new("2", "")), vec![2, 3]);
        assert_eq!(ids(&ArticleFilter::new("", "")), vec![1, 2, 3]);
    }

    #[test]
    fn test_preview_truncates_by_chars() {
        let long = "健".repeat(150);
        let p = preview(&long);
        assert_eq!(p.chars().count(), 103);
        assert!(p.ends_with("..."));
        assert_eq!(preview(""), "");
    }

    #[test]
    fn test_paragraphs_skip_blank_lines_and_escape() {
        assert_eq!(render_paragraphs("a\n\n  \n<b>"), "<p>a</p><p>&lt;b&gt;</p>");
    }

    #[tokio::test]
    async fn test_list_filter_and_empty_state() {
        let harness = Harness::new();
        seed(&harness);
        let page = ArticlesPage::new(harness.ctx.clone());

        page.reconcile().await;
        let html = harness.host.rendered(ids::LIST).unwrap();
        assert_eq!(html.matches("article-card").count(), 2);
        assert!(html.contains("未分类"));
        assert!(html.contains("匿名"));
        assert_eq!(harness.host.hidden(ids::EMPTY), Some(true));

        let requests = harness.backend.requests().len();
        page.set_filter(ArticleFilter::new("", "不存在"));
        assert_eq!(harness.host.hidden(ids::EMPTY), Some(false));
        assert_eq!(harness.host.rendered(ids::LIST).as_deref(), Some(""));
        assert_eq!(harness.backend.requests().len(), requests);
    }

    #[tokio::test]
    async fn test_categories_select() {
        let harness = Harness::new();
        harness.backend.seed("article-categories", json!({"name": "睡眠", "article_count": 3}));
        let page = ArticlesPage::new(harness.ctx.clone());

        page.load_categories().await;
        let html = harness.host.rendered(ids::CATEGORIES).unwrap();
        assert!(html.starts_with(r#"<option value="">全部分类</option>"#));
        assert!(html.contains(r#"<option value="1">睡眠 (3)</option>"#));
    }

    #[tokio::test]
    async fn test_view_updates_cached_count() {
        let harness = Harness::new();
        seed(&harness);
        let page = ArticlesPage::new(harness.ctx.clone());
        page.reconcile().await;

        harness.backend.respond(
            Method::Get,
            "/api/articles/1/",
            200,
            r#"{"id": 1, "title": "Sleep Hygiene", "content": "Go to bed early.\n\nAvoid screens.", "category": 1, "category_name": "睡眠", "views": 6, "publish_date": "2024-04-01T08:00:00Z"}"#,
        );
        page.view(1).await.unwrap();

        assert_eq!(harness.host.text(ids::DETAIL_DATE).as_deref(), Some("2024-04-01"));
        assert_eq!(harness.host.text(ids::DETAIL_VIEWS).as_deref(), Some("6"));
        assert_eq!(
            harness.host.rendered(ids::DETAIL_CONTENT).as_deref(),
            Some("<p>Go to bed early.</p><p>Avoid screens.</p>")
        );
        assert_eq!(harness.host.modal(ids::MODAL), Some(true));
        assert_eq!(page.articles.with_view(|a| a[0].views), Some(6));
    }
}
