use crate::index::keyword_key;
use crate::{Article, ArticleIndex};

/// Selection state layered over a finished result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorationSession {
    index: ArticleIndex,
    search_query: String,
    selected_keyword: Option<String>,
    active_modal_keyword: Option<String>,
    active_article: Option<String>,
}

impl ExplorationSession {
    pub fn new(index: ArticleIndex) -> Self {
        Self {
            index,
            search_query: String::new(),
            selected_keyword: None,
            active_modal_keyword: None,
            active_article: None,
        }
    }

    pub fn index(&self) -> &ArticleIndex {
        &self.index
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn selected_keyword(&self) -> Option<&str> {
        self.selected_keyword.as_deref()
    }

    pub fn active_modal_keyword(&self) -> Option<&str> {
        self.active_modal_keyword.as_deref()
    }

    /// Returns true if the query changed.
    pub fn search(&mut self, query: impl Into<String>) -> bool {
        let query = query.into();
        if self.search_query == query {
            return false;
        }
        self.search_query = query;
        true
    }

    /// Selects `keyword`, or clears the selection when it is already selected.
    pub fn select_keyword(&mut self, keyword: &str) {
        if self.is_keyword_selected(keyword) {
            self.selected_keyword = None;
        } else if keyword.trim().is_empty() {
            self.selected_keyword = None;
        } else {
            self.selected_keyword = Some(keyword.trim().to_string());
        }
    }

    pub fn is_keyword_selected(&self, keyword: &str) -> bool {
        self.selected_keyword
            .as_deref()
            .is_some_and(|selected| keyword_key(selected) == keyword_key(keyword))
    }

    /// Opens the keyword list for `keyword`; a blank keyword closes it.
    pub fn open_keyword_modal(&mut self, keyword: &str) {
        let keyword = keyword.trim();
        self.active_modal_keyword = (!keyword.is_empty()).then(|| keyword.to_string());
    }

    pub fn close_keyword_modal(&mut self) {
        self.active_modal_keyword = None;
    }

    /// Opens the detail view for `article_id`. Unknown ids are ignored and
    /// reported by returning false.
    pub fn open_article_detail(&mut self, article_id: &str) -> bool {
        if self.index.article(article_id).is_none() {
            return false;
        }
        self.active_article = Some(article_id.to_string());
        true
    }

    pub fn close_article_detail(&mut self) {
        self.active_article = None;
    }

    pub fn active_article(&self) -> Option<&Article> {
        self.active_article
            .as_deref()
            .and_then(|id| self.index.article(id))
    }

    /// Articles passing the current search and keyword selection.
    pub fn visible_articles(&self) -> Vec<&Article> {
        self.index
            .combined_filter(&self.search_query, self.selected_keyword.as_deref())
    }

    /// Articles for the open keyword modal; empty when no modal is open.
    pub fn modal_articles(&self) -> Vec<&Article> {
        match self.active_modal_keyword.as_deref() {
            Some(keyword) => self.index.articles_for_keyword(keyword),
            None => Vec::new(),
        }
    }
}
