//! Content and link presentation.

use crate::cli::presentation::{format_section_heading, to_pretty_json};
use crate::content::{Article, Faq};
use crate::links::LinkSuggestion;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use serde_json::json;

pub fn format_article_list_text(articles: &[Article]) -> String {
    if articles.is_empty() {
        return "No articles found.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Id", "Stage", "Title", "Slug", "Status", "Minutes"]);
    for article in articles {
        table.add_row(vec![
            article.id.clone(),
            article.stage.to_string(),
            article.title.clone(),
            article.slug.clone(),
            article.status.to_string(),
            article.reading_time.to_string(),
        ]);
    }
    format!("{}\n\nTotal: {} article(s)", table, articles.len())
}

pub fn format_article_list_json(articles: &[Article]) -> String {
    to_pretty_json(&json!({ "articles": articles, "total": articles.len() }))
}

pub fn format_article_text(article: &Article, faqs: &[Faq]) -> String {
    let mut out = format!("{}\n\n", format_section_heading(&article.title));
    out.push_str(&format!("Id:           {}\n", article.id));
    out.push_str(&format!("Cluster:      {}\n", article.group_id));
    out.push_str(&format!("Stage:        {}\n", article.stage));
    out.push_str(&format!("Slug:         {}\n", article.slug));
    out.push_str(&format!("Status:       {}\n", article.status));
    out.push_str(&format!("Reading time: {} min\n", article.reading_time));
    if let Some(category) = &article.category {
        out.push_str(&format!("Category:     {}\n", category));
    }
    if !article.tags.is_empty() {
        out.push_str(&format!("Tags:         {}\n", article.tags.join(", ")));
    }
    out.push_str(&format!("Meta:         {}\n", article.meta_description));
    out.push_str(&format!("\n{}\n\n{}\n", article.excerpt, article.content));
    if !faqs.is_empty() {
        out.push_str(&format!("\n{}\n", format_section_heading("FAQs")));
        for faq in faqs {
            out.push_str(&format!("\nQ: {}\nA: {}\n", faq.question, faq.answer));
        }
    }
    out
}

pub fn format_article_json(article: &Article, faqs: &[Faq]) -> String {
    to_pretty_json(&json!({ "article": article, "faqs": faqs }))
}

pub fn format_link_suggestions_text(article: &Article, suggestions: &[LinkSuggestion]) -> String {
    if suggestions.is_empty() {
        return format!(
            "No published articles to link from '{}'. Publish articles with 'clusterwright content publish'.",
            article.title
        );
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Score", "Title", "Slug", "Stage"]);
    for suggestion in suggestions {
        let candidate = &suggestion.candidate;
        table.add_row(vec![
            suggestion.score.to_string(),
            candidate.title.clone(),
            candidate.slug.clone(),
            candidate
                .stage
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    format!(
        "{}\n\n{}",
        format_section_heading(&format!("Link targets for {}", article.title)),
        table
    )
}

pub fn format_link_suggestions_json(article: &Article, suggestions: &[LinkSuggestion]) -> String {
    to_pretty_json(&json!({ "article_id": article.id, "suggestions": suggestions }))
}
