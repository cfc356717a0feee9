//! CLI command-name contract for logging and routing.

use crate::cli::parse::{
    ClusterCommands, Commands, ContentCommands, LinksCommands, SettingsCommands,
};

/// Dotted command name (e.g. "cluster.generate", "settings.set").
pub fn command_name(command: &Commands) -> String {
    match command {
        Commands::Cluster { command } => format!("cluster.{}", cluster_command_name(command)),
        Commands::Content { command } => format!("content.{}", content_command_name(command)),
        Commands::Links { command } => format!("links.{}", links_command_name(command)),
        Commands::Settings { command } => format!("settings.{}", settings_command_name(command)),
    }
}

pub fn cluster_command_name(command: &ClusterCommands) -> &'static str {
    match command {
        ClusterCommands::Create { .. } => "create",
        ClusterCommands::Generate { .. } => "generate",
        ClusterCommands::Retry { .. } => "retry",
        ClusterCommands::Show { .. } => "show",
        ClusterCommands::List { .. } => "list",
    }
}

pub fn content_command_name(command: &ContentCommands) -> &'static str {
    match command {
        ContentCommands::List { .. } => "list",
        ContentCommands::Show { .. } => "show",
        ContentCommands::Publish { .. } => "publish",
    }
}

pub fn links_command_name(command: &LinksCommands) -> &'static str {
    match command {
        LinksCommands::Suggest { .. } => "suggest",
    }
}

pub fn settings_command_name(command: &SettingsCommands) -> &'static str {
    match command {
        SettingsCommands::Show { .. } => "show",
        SettingsCommands::Set { .. } => "set",
    }
}
