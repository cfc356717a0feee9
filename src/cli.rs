//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to domain services.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{
    Cli, ClusterCommands, Commands, ContentCommands, LinksCommands, SettingsCommands,
};
pub use presentation::{
    format_article_json, format_article_list_json, format_article_list_text,
    format_article_text, format_cluster_json, format_cluster_list_json,
    format_cluster_list_text, format_cluster_text, format_link_suggestions_json,
    format_link_suggestions_text, format_outcome_text, format_settings_json,
    format_settings_text,
};
pub use route::RunContext;
