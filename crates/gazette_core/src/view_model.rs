use crate::{Article, ExplorationSession, Failure, Stage};

/// Number of summary keywords offered as filter chips.
pub const KEYWORD_CHIP_LIMIT: usize = 12;
const PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Polling,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: Phase,
    pub job_id: Option<String>,
    pub stage: Option<Stage>,
    pub step: String,
    pub progress: u32,
    pub error: Option<Failure>,
    /// Why the last picked file was refused locally.
    pub rejection: Option<String>,
    pub exploration: Option<ExplorationView>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorationView {
    pub pages: u32,
    pub total_articles: usize,
    pub search_query: String,
    pub selected_keyword: Option<String>,
    pub keyword_chips: Vec<KeywordChipView>,
    pub articles: Vec<ArticleCardView>,
    pub modal: Option<KeywordModalView>,
    pub active_article: Option<ArticleDetailView>,
}

impl ExplorationView {
    pub(crate) fn of(session: &ExplorationSession) -> Self {
        let index = session.index();
        let keyword_chips = index
            .keywords_summary()
            .iter()
            .take(KEYWORD_CHIP_LIMIT)
            .map(|summary| KeywordChipView {
                keyword: summary.keyword.clone(),
                count: summary.count,
                selected: session.is_keyword_selected(&summary.keyword),
            })
            .collect();

        let modal = session
            .active_modal_keyword()
            .map(|keyword| KeywordModalView {
                keyword: keyword.to_string(),
                articles: cards(session.modal_articles()),
            });

        let active_article = session.active_article().map(|article| ArticleDetailView {
            article: article.clone(),
            related: cards(index.related_articles(&article.article_id)),
        });

        Self {
            pages: index.pages(),
            total_articles: index.len(),
            search_query: session.search_query().to_string(),
            selected_keyword: session.selected_keyword().map(ToOwned::to_owned),
            keyword_chips,
            articles: cards(session.visible_articles()),
            modal,
            active_article,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordChipView {
    pub keyword: String,
    pub count: u32,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleCardView {
    pub article_id: String,
    pub page: u32,
    pub title: String,
    pub preview: String,
    pub keywords: Vec<String>,
    pub has_image: bool,
}

impl ArticleCardView {
    pub fn of(article: &Article) -> Self {
        Self {
            article_id: article.article_id.clone(),
            page: article.page,
            title: article.title.clone(),
            preview: preview(article),
            keywords: article.keywords.clone(),
            has_image: article.crop_image.is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordModalView {
    pub keyword: String,
    pub articles: Vec<ArticleCardView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDetailView {
    pub article: Article,
    pub related: Vec<ArticleCardView>,
}

fn cards(articles: Vec<&Article>) -> Vec<ArticleCardView> {
    articles.into_iter().map(ArticleCardView::of).collect()
}

/// Summary when the backend wrote one, otherwise the start of the content.
fn preview(article: &Article) -> String {
    let source = if article.summary.trim().is_empty() {
        article.content.trim()
    } else {
        article.summary.trim()
    };
    match source.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", source[..cut].trim_end()),
        None => source.to_string(),
    }
}
