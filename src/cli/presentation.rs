//! CLI presentation: text and json formatters per command family.

mod cluster;
mod content;
mod settings;

pub use cluster::{
    format_cluster_json, format_cluster_list_json, format_cluster_list_text,
    format_cluster_text, format_outcome_text,
};
pub use content::{
    format_article_json, format_article_list_json, format_article_list_text,
    format_article_text, format_link_suggestions_json, format_link_suggestions_text,
};
pub use settings::{format_settings_json, format_settings_text};

use owo_colors::OwoColorize;

/// Format a section heading with bold/underline.
pub(crate) fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

pub(crate) fn to_pretty_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}
