use gazette_core::{
    AppViewModel, Article, ArticleCardView, ArticleDetailView, ExplorationView, SearchHit, Stage,
};

const BAR_WIDTH: usize = 24;

/// One status line: stage ladder position, progress bar and backend step.
pub fn progress_line(view: &AppViewModel) -> String {
    let stage = view.stage.unwrap_or_default();
    let progress = view.progress.min(100) as usize;
    let filled = progress * BAR_WIDTH / 100;
    let mut line = format!(
        "[{}{}] {:>3}% {}/{} {}",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        progress,
        stage.index() + 1,
        Stage::ALL.len(),
        stage.label()
    );
    let step = view.step.trim();
    if !step.is_empty() && step != stage.label() {
        line.push_str(&format!(" ({step})"));
    }
    line
}

pub fn failure(view: &AppViewModel) -> Option<String> {
    view.error.as_ref().map(|failure| match &view.job_id {
        Some(job_id) => format!("Job {job_id}: {} ({})", failure.message, failure.kind),
        None => format!("{} ({})", failure.message, failure.kind),
    })
}

pub fn exploration(view: &ExplorationView) -> String {
    let mut lines = vec![format!(
        "{} articles across {} pages",
        view.total_articles, view.pages
    )];

    if !view.keyword_chips.is_empty() {
        let chips: Vec<String> = view
            .keyword_chips
            .iter()
            .map(|chip| {
                let mark = if chip.selected { "*" } else { "" };
                format!("{mark}{} ({}){mark}", chip.keyword, chip.count)
            })
            .collect();
        lines.push(format!("Keywords: {}", chips.join("  ")));
    }

    let mut filters = Vec::new();
    if !view.search_query.trim().is_empty() {
        filters.push(format!("search \"{}\"", view.search_query));
    }
    if let Some(keyword) = &view.selected_keyword {
        filters.push(format!("keyword \"{keyword}\""));
    }
    if !filters.is_empty() {
        lines.push(format!(
            "Showing {} of {} ({})",
            view.articles.len(),
            view.total_articles,
            filters.join(", ")
        ));
    }

    lines.push(String::new());
    if view.articles.is_empty() {
        lines.push("No articles match the current filters.".to_string());
    }
    for card in &view.articles {
        lines.extend(card_lines(card));
    }

    if let Some(modal) = &view.modal {
        lines.push(String::new());
        lines.push(format!(
            "== Articles tagged \"{}\" ({}) ==",
            modal.keyword,
            modal.articles.len()
        ));
        for card in &modal.articles {
            lines.extend(card_lines(card));
        }
    }

    if let Some(detail) = &view.active_article {
        lines.push(String::new());
        lines.push(article_detail(detail));
    }

    lines.join("\n")
}

pub fn article_detail(detail: &ArticleDetailView) -> String {
    let mut text = article(&detail.article);
    if !detail.related.is_empty() {
        text.push_str("\nRelated:");
        for card in &detail.related {
            text.push_str(&format!("\n  [{}] {}", card.article_id, card.title));
        }
    }
    text
}

pub fn article(article: &Article) -> String {
    let mut lines = vec![
        format!("== {} ==", article.title),
        format!("Page {} | id {}", article.page, article.article_id),
    ];
    if let Some(created_at) = article.created_at {
        lines.push(format!("Stored {}", created_at.format("%Y-%m-%d %H:%M UTC")));
    }
    if !article.keywords.is_empty() {
        lines.push(format!("Keywords: {}", article.keywords.join(", ")));
    }
    if !article.hashtags.is_empty() {
        lines.push(format!("Hashtags: {}", article.hashtags.join(" ")));
    }
    if article.crop_image.is_some() {
        lines.push("Page crop available".to_string());
    }
    if !article.summary.trim().is_empty() {
        lines.push(String::new());
        lines.push(format!("Summary: {}", article.summary.trim()));
    }
    lines.push(String::new());
    lines.push(article.content.trim().to_string());
    lines.join("\n")
}

/// Cards for articles looked up directly on the backend.
pub fn article_list(articles: &[Article]) -> String {
    if articles.is_empty() {
        return "No articles found.".to_string();
    }
    articles
        .iter()
        .map(ArticleCardView::of)
        .flat_map(|card| card_lines(&card))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Backend search results, best match first as the backend ranked them.
pub fn search_hits(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return "No articles found.".to_string();
    }
    let mut lines = Vec::new();
    for hit in hits {
        let image = if hit.crop_image.is_some() { " [img]" } else { "" };
        lines.push(format!(
            "[{}] p.{} {}{image} (score {:.2})",
            hit.article_id, hit.page, hit.title, hit.relevance_score
        ));
        if !hit.snippet.trim().is_empty() {
            lines.push(format!("    {}", hit.snippet.trim()));
        }
        if !hit.keywords.is_empty() {
            lines.push(format!("    #{}", hit.keywords.join(" #")));
        }
    }
    lines.join("\n")
}

fn card_lines(card: &ArticleCardView) -> Vec<String> {
    let image = if card.has_image { " [img]" } else { "" };
    let mut lines = vec![format!(
        "[{}] p.{} {}{image}",
        card.article_id, card.page, card.title
    )];
    if !card.preview.is_empty() {
        lines.push(format!("    {}", card.preview));
    }
    if !card.keywords.is_empty() {
        lines.push(format!("    #{}", card.keywords.join(" #")));
    }
    lines
}
