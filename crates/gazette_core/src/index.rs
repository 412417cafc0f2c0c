//! Read-only search and keyword lookups over a finished result set.
//!
//! The index is built once per [`ProcessResult`]. Lowercased search text and
//! the keyword-to-article map are computed at build time; the query methods
//! only scan or look up and never allocate per article.

use std::collections::{BTreeMap, HashMap};

use crate::{Article, KeywordSummary, ProcessResult};

#[derive(Debug, Clone, PartialEq, Eq)]
struct SearchText {
    title: String,
    content: String,
    keywords: Vec<String>,
}

impl SearchText {
    fn of(article: &Article) -> Self {
        Self {
            title: article.title.to_lowercase(),
            content: article.content.to_lowercase(),
            keywords: article.keywords.iter().map(|kw| kw.to_lowercase()).collect(),
        }
    }

    fn contains(&self, needle: &str) -> bool {
        self.title.contains(needle)
            || self.content.contains(needle)
            || self.keywords.iter().any(|kw| kw.contains(needle))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleIndex {
    result: ProcessResult,
    search_text: Vec<SearchText>,
    /// Lowercased keyword -> positions in `result.articles`, ascending.
    by_keyword: BTreeMap<String, Vec<usize>>,
    by_id: HashMap<String, usize>,
}

impl ArticleIndex {
    pub fn build(result: ProcessResult) -> Self {
        let search_text = result.articles.iter().map(SearchText::of).collect();

        let mut by_keyword: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        let mut by_id = HashMap::with_capacity(result.articles.len());
        for (position, article) in result.articles.iter().enumerate() {
            if by_id.insert(article.article_id.clone(), position).is_some() {
                gazette_logging::gazette_warn!(
                    "Duplicate article_id {} in result; lookups use the last one",
                    article.article_id
                );
            }
            for keyword in &article.keywords {
                let key = keyword_key(keyword);
                if key.is_empty() {
                    continue;
                }
                let positions = by_keyword.entry(key).or_default();
                // Keywords differing only in case must not list an article twice.
                if positions.last() != Some(&position) {
                    positions.push(position);
                }
            }
        }

        Self {
            result,
            search_text,
            by_keyword,
            by_id,
        }
    }

    pub fn result(&self) -> &ProcessResult {
        &self.result
    }

    pub fn articles(&self) -> &[Article] {
        &self.result.articles
    }

    pub fn len(&self) -> usize {
        self.result.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.result.articles.is_empty()
    }

    pub fn pages(&self) -> u32 {
        self.result.pages
    }

    pub fn keywords_summary(&self) -> &[KeywordSummary] {
        &self.result.keywords_summary
    }

    pub fn article(&self, article_id: &str) -> Option<&Article> {
        self.by_id
            .get(article_id)
            .map(|&position| &self.result.articles[position])
    }

    /// Articles whose title, content or any keyword contains `query`,
    /// ignoring case. An empty query matches everything.
    pub fn text_search(&self, query: &str) -> Vec<&Article> {
        self.search_positions(query)
            .into_iter()
            .map(|position| &self.result.articles[position])
            .collect()
    }

    /// Articles with a keyword equal to `keyword`, ignoring case and
    /// surrounding whitespace. A blank keyword filters nothing out.
    pub fn keyword_filter(&self, keyword: &str) -> Vec<&Article> {
        if keyword.trim().is_empty() {
            return self.result.articles.iter().collect();
        }
        self.keyword_positions(keyword)
            .iter()
            .map(|&position| &self.result.articles[position])
            .collect()
    }

    /// Text search narrowed by the keyword filter. Either side may be
    /// inactive; with neither active the full set is returned.
    pub fn combined_filter(&self, query: &str, keyword: Option<&str>) -> Vec<&Article> {
        let keyword = keyword.filter(|kw| !kw.trim().is_empty());
        let matched = self.search_positions(query);
        match keyword {
            None => matched
                .into_iter()
                .map(|position| &self.result.articles[position])
                .collect(),
            Some(keyword) => {
                let with_keyword = self.keyword_positions(keyword);
                matched
                    .into_iter()
                    .filter(|position| with_keyword.binary_search(position).is_ok())
                    .map(|position| &self.result.articles[position])
                    .collect()
            }
        }
    }

    /// Same predicate as [`ArticleIndex::keyword_filter`], used by the keyword
    /// modal independently of the active filter.
    pub fn articles_for_keyword(&self, keyword: &str) -> Vec<&Article> {
        self.keyword_filter(keyword)
    }

    /// Number of loaded articles carrying `keyword`. May disagree with the
    /// backend's summary count.
    pub fn live_keyword_count(&self, keyword: &str) -> usize {
        self.keyword_positions(keyword).len()
    }

    /// Resolves an article's related ids, skipping ids not in this result.
    pub fn related_articles(&self, article_id: &str) -> Vec<&Article> {
        let Some(article) = self.article(article_id) else {
            return Vec::new();
        };
        article
            .related_articles
            .iter()
            .filter_map(|related| self.article(related))
            .collect()
    }

    fn search_positions(&self, query: &str) -> Vec<usize> {
        if query.is_empty() {
            return (0..self.result.articles.len()).collect();
        }
        let needle = query.to_lowercase();
        self.search_text
            .iter()
            .enumerate()
            .filter(|(_, text)| text.contains(&needle))
            .map(|(position, _)| position)
            .collect()
    }

    fn keyword_positions(&self, keyword: &str) -> &[usize] {
        self.by_keyword
            .get(&keyword_key(keyword))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Lookup key shared by the index and the session: trimmed and lowercased.
pub(crate) fn keyword_key(keyword: &str) -> String {
    keyword.trim().to_lowercase()
}
