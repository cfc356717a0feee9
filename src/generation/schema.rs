//! Response schema for one generated article, and eager validation of generator output.
//!
//! Nothing unvalidated crosses into persistence: [`validate_payload`] turns a raw
//! generator object into a [`GeneratedArticle`] or a schema error.

use crate::error::PipelineError;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedArticle {
    pub title: String,
    /// URL slug suggestion; a uniqueness token is appended before storing.
    pub slug: String,
    /// Full article body in Markdown.
    pub content: String,
    pub excerpt: String,
    pub meta_description: String,
    pub tags: Vec<String>,
    pub faqs: Vec<GeneratedFaq>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GeneratedFaq {
    pub question: String,
    pub answer: String,
}

/// Strict-mode JSON schema for [`GeneratedArticle`]: every object closed, every
/// property required, no `$ref`.
pub fn response_schema() -> Value {
    let schema = schema_for!(GeneratedArticle);
    let mut value = serde_json::to_value(schema).unwrap_or_default();
    close_object_schemas(&mut value);
    let definitions = value.get("definitions").cloned();
    if let Some(defs) = definitions {
        inline_refs(&mut value, &defs);
    }
    if let Value::Object(map) = &mut value {
        map.remove("definitions");
        map.remove("$schema");
    }
    value
}

fn close_object_schemas(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if map.get("type") == Some(&Value::String("object".to_string())) {
                map.insert("additionalProperties".to_string(), Value::Bool(false));
                if let Some(Value::Object(props)) = map.get("properties") {
                    let keys: Vec<Value> = props.keys().map(|k| Value::String(k.clone())).collect();
                    map.insert("required".to_string(), Value::Array(keys));
                }
            }
            for (_, v) in map.iter_mut() {
                close_object_schemas(v);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                close_object_schemas(item);
            }
        }
        _ => {}
    }
}

fn inline_refs(value: &mut Value, definitions: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(path)) = map.get("$ref").cloned() {
                if let Some(name) = path.strip_prefix("#/definitions/") {
                    if let Some(def) = definitions.get(name) {
                        *value = def.clone();
                        inline_refs(value, definitions);
                        return;
                    }
                }
            }
            for (_, v) in map.iter_mut() {
                inline_refs(v, definitions);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                inline_refs(item, definitions);
            }
        }
        _ => {}
    }
}

/// Deserialize and check a generator payload. Missing or blank required fields fail;
/// nothing is coerced. Blank tags are dropped.
pub fn validate_payload(payload: Value) -> Result<GeneratedArticle, PipelineError> {
    let mut article: GeneratedArticle =
        serde_json::from_value(payload).map_err(|e| PipelineError::Schema(e.to_string()))?;

    let required = [
        ("title", &article.title),
        ("slug", &article.slug),
        ("content", &article.content),
        ("excerpt", &article.excerpt),
        ("metaDescription", &article.meta_description),
    ];
    for (field, text) in required {
        if text.trim().is_empty() {
            return Err(PipelineError::Schema(format!("field '{}' is blank", field)));
        }
    }
    for (position, faq) in article.faqs.iter().enumerate() {
        if faq.question.trim().is_empty() || faq.answer.trim().is_empty() {
            return Err(PipelineError::Schema(format!(
                "faq {} is missing a question or answer",
                position + 1
            )));
        }
    }

    article.tags = article
        .tags
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    Ok(article)
}
