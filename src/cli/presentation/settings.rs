//! Settings presentation.

use crate::cli::presentation::to_pretty_json;
use crate::settings::StyleSettings;

fn or_unset(value: &str) -> &str {
    if value.trim().is_empty() {
        "(not set)"
    } else {
        value
    }
}

pub fn format_settings_text(settings: &StyleSettings) -> String {
    format!(
        "Site name:          {}\nBrand voice:        {}\nAuthority block:    {}\nExtra instructions: {}",
        or_unset(&settings.site_name),
        or_unset(&settings.brand_voice),
        or_unset(&settings.authority_block),
        or_unset(&settings.extra_instructions)
    )
}

pub fn format_settings_json(settings: &StyleSettings) -> String {
    to_pretty_json(settings)
}
