//! Cluster command presentation: show, list and batch outcome.

use crate::cli::presentation::{format_section_heading, to_pretty_json};
use crate::cluster::{ClusterJob, ClusterStatus, ItemStatus};
use crate::generation::GenerationOutcome;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;

fn colored_status(status: ClusterStatus) -> String {
    match status {
        ClusterStatus::Draft => format!("{}", status.dimmed()),
        ClusterStatus::Generating => format!("{}", status.yellow()),
        ClusterStatus::Complete => format!("{}", status.green()),
        ClusterStatus::Error => format!("{}", status.red()),
    }
}

/// Per-slot rows in plan order; unattempted slots show as "pending".
fn progress_table(job: &ClusterJob) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Item", "Stage", "Status", "Error"]);
    for slot in job.stage_plan.slots() {
        let status = job
            .progress
            .get(&slot.key)
            .map(|s| s.as_str())
            .unwrap_or("pending");
        let error = job
            .item_errors
            .get(&slot.key)
            .map(|f| format!("{}: {}", f.kind, f.message))
            .unwrap_or_default();
        table.add_row(vec![
            slot.key.clone(),
            slot.stage.to_string(),
            status.to_string(),
            error,
        ]);
    }
    table
}

pub fn format_cluster_text(job: &ClusterJob) -> String {
    let mut out = format!("{}\n\n", format_section_heading(&format!("Cluster {}", job.id)));
    out.push_str(&format!("Topic:           {}\n", job.topic));
    out.push_str(&format!("Primary keyword: {}\n", job.primary_keyword));
    if !job.target_audience.is_empty() {
        out.push_str(&format!("Audience:        {}\n", job.target_audience));
    }
    if let Some(category) = &job.category {
        out.push_str(&format!("Category:        {}\n", category));
    }
    out.push_str(&format!("Status:          {}\n", colored_status(job.status)));
    let done = job
        .progress
        .values()
        .filter(|s| s.is_terminal())
        .count();
    out.push_str(&format!(
        "Progress:        {}/{}\n\n",
        done,
        job.stage_plan.total_items()
    ));
    out.push_str(&progress_table(job).to_string());
    out
}

pub fn format_cluster_json(job: &ClusterJob) -> String {
    to_pretty_json(job)
}

pub fn format_cluster_list_text(jobs: &[ClusterJob]) -> String {
    if jobs.is_empty() {
        return "No clusters found.\n\nUse 'clusterwright cluster create' to add one.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Id", "Topic", "Status", "Complete", "Failed", "Created"]);
    for job in jobs {
        let complete = job
            .progress
            .values()
            .filter(|s| **s == ItemStatus::Complete)
            .count();
        let failed = job
            .progress
            .values()
            .filter(|s| **s == ItemStatus::Error)
            .count();
        table.add_row(vec![
            job.id.clone(),
            job.topic.clone(),
            job.status.to_string(),
            format!("{}/{}", complete, job.stage_plan.total_items()),
            failed.to_string(),
            job.created_at.format("%Y-%m-%d %H:%M").to_string(),
        ]);
    }
    format!("{}\n\nTotal: {} cluster(s)", table, jobs.len())
}

pub fn format_cluster_list_json(jobs: &[ClusterJob]) -> String {
    to_pretty_json(&json!({ "clusters": jobs, "total": jobs.len() }))
}

pub fn format_outcome_text(outcome: &GenerationOutcome) -> String {
    let mut out = format!(
        "Cluster {} finished with status {}\n\n",
        outcome.cluster_id,
        colored_status(outcome.status)
    );
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Item", "Status", "Article / Error"]);
    for (key, status) in &outcome.progress {
        let detail = match (outcome.articles.get(key), outcome.failures.get(key)) {
            (Some(article_id), _) => article_id.clone(),
            (None, Some(failure)) => format!("{}: {}", failure.kind, failure.message),
            (None, None) => String::new(),
        };
        table.add_row(vec![key.clone(), status.to_string(), detail]);
    }
    out.push_str(&table.to_string());
    if !outcome.success {
        out.push_str(&format!(
            "\n\n{} item(s) failed. Run 'clusterwright cluster retry {}' to re-attempt them.",
            outcome.failures.len(),
            outcome.cluster_id
        ));
    }
    out
}
