//! Prompt construction for one article slot.

use crate::cluster::FunnelStage;
use crate::settings::StyleSettings;

const BASE_SYSTEM_PROMPT: &str = "You are an expert SEO content writer producing one article \
of a topic cluster. Write original, accurate, people-first content. Use Markdown headings \
(## and ###) for structure, short paragraphs, and concrete examples. Never invent statistics \
or quotes. Return only the requested JSON object.";

const OUTPUT_RULES: &str = "Output rules:\n\
- title: under 65 characters and contains the primary keyword naturally\n\
- slug: lowercase words joined by hyphens\n\
- content: 1200 to 1800 words of Markdown\n\
- excerpt: one or two sentences\n\
- metaDescription: 150 to 160 characters\n\
- tags: 3 to 6 short topical tags\n\
- faqs: 3 to 5 questions a reader at this stage would ask, each with a concise answer";

const USER_PROMPT_TEMPLATE: &str = "Write article {slot} of the \"{topic}\" content cluster.\n\n\
Funnel stage: {stage_label} ({stage_phase})\n\
Stage angle: {stage_description}\n\
Primary keyword: {keyword}\n\
Target audience: {audience}\n\
{category_line}\
\nThe article must stand on its own while fitting the {stage_phase} stage of the reader's \
journey; do not repeat angles typical of other stages.";

/// Per-slot inputs to the user prompt.
#[derive(Debug, Clone)]
pub struct StageRequest<'a> {
    pub slot: usize,
    pub stage: FunnelStage,
    pub stage_description: &'a str,
    pub topic: &'a str,
    pub primary_keyword: &'a str,
    pub target_audience: &'a str,
    pub category: Option<&'a str>,
}

/// System instructions shared by every slot of a batch.
pub fn system_prompt(settings: &StyleSettings) -> String {
    let mut sections = vec![BASE_SYSTEM_PROMPT.to_string()];
    if !settings.site_name.trim().is_empty() {
        sections.push(format!("You write for {}.", settings.site_name.trim()));
    }
    if !settings.brand_voice.trim().is_empty() {
        sections.push(format!("Brand voice:\n{}", settings.brand_voice.trim()));
    }
    if !settings.authority_block.trim().is_empty() {
        sections.push(format!(
            "Authority and credentials to weave in where relevant:\n{}",
            settings.authority_block.trim()
        ));
    }
    if !settings.extra_instructions.trim().is_empty() {
        sections.push(format!(
            "Additional instructions:\n{}",
            settings.extra_instructions.trim()
        ));
    }
    sections.push(OUTPUT_RULES.to_string());
    sections.join("\n\n")
}

pub fn user_prompt(request: &StageRequest<'_>) -> String {
    let audience = if request.target_audience.trim().is_empty() {
        "general readers"
    } else {
        request.target_audience
    };
    let category_line = request
        .category
        .map(|c| format!("Category: {}\n", c))
        .unwrap_or_default();

    USER_PROMPT_TEMPLATE
        .replace("{slot}", &request.slot.to_string())
        .replace("{topic}", request.topic)
        .replace("{stage_label}", request.stage.label())
        .replace("{stage_phase}", request.stage.phase())
        .replace("{stage_description}", request.stage_description)
        .replace("{keyword}", request.primary_keyword)
        .replace("{audience}", audience)
        .replace("{category_line}", &category_line)
}
