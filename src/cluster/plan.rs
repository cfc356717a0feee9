use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Funnel phase a generated article is written for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FunnelStage {
    /// Awareness
    #[serde(rename = "TOFU")]
    Tofu,
    /// Consideration
    #[serde(rename = "MOFU")]
    Mofu,
    /// Decision
    #[serde(rename = "BOFU")]
    Bofu,
}

impl FunnelStage {
    pub fn label(self) -> &'static str {
        match self {
            FunnelStage::Tofu => "TOFU",
            FunnelStage::Mofu => "MOFU",
            FunnelStage::Bofu => "BOFU",
        }
    }

    pub fn phase(self) -> &'static str {
        match self {
            FunnelStage::Tofu => "awareness",
            FunnelStage::Mofu => "consideration",
            FunnelStage::Bofu => "decision",
        }
    }
}

impl fmt::Display for FunnelStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FunnelStage {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tofu" | "awareness" => Ok(FunnelStage::Tofu),
            "mofu" | "consideration" => Ok(FunnelStage::Mofu),
            "bofu" | "decision" => Ok(FunnelStage::Bofu),
            other => Err(ApiError::InvalidPlan(format!("Unknown funnel stage '{}'", other))),
        }
    }
}

/// One stage of a plan: which funnel phase, how many articles, and the angle to write from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StageDescriptor {
    pub stage: FunnelStage,
    pub count: usize,
    pub description: String,
}

/// Ordered batch plan. Slots are numbered continuously across stages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StagePlan {
    pub stages: Vec<StageDescriptor>,
}

/// A single slot of a plan, resolved to its key and stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSlot<'a> {
    pub index: usize,
    pub key: String,
    pub stage: FunnelStage,
    pub description: &'a str,
}

/// Progress-map key for the 1-based slot `index`.
pub fn item_key(index: usize) -> String {
    format!("article_{}", index)
}

impl StagePlan {
    /// The standard 3 awareness / 2 consideration / 1 decision funnel.
    pub fn funnel() -> Self {
        Self {
            stages: vec![
                StageDescriptor {
                    stage: FunnelStage::Tofu,
                    count: 3,
                    description: "Educational awareness content that introduces the topic, \
                                  answers broad questions and builds trust"
                        .to_string(),
                },
                StageDescriptor {
                    stage: FunnelStage::Mofu,
                    count: 2,
                    description: "Consideration content comparing approaches and options, \
                                  helping readers evaluate solutions"
                        .to_string(),
                },
                StageDescriptor {
                    stage: FunnelStage::Bofu,
                    count: 1,
                    description: "Decision content that addresses objections and guides the \
                                  reader towards choosing a provider"
                        .to_string(),
                },
            ],
        }
    }

    pub fn total_items(&self) -> usize {
        self.stages.iter().map(|s| s.count).sum()
    }

    /// Every slot in attempt order: stage order, then slot order within the stage.
    pub fn slots(&self) -> impl Iterator<Item = PlanSlot<'_>> {
        self.stages
            .iter()
            .flat_map(|stage| std::iter::repeat(stage).take(stage.count))
            .enumerate()
            .map(|(offset, stage)| PlanSlot {
                index: offset + 1,
                key: item_key(offset + 1),
                stage: stage.stage,
                description: stage.description.as_str(),
            })
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.stages.is_empty() {
            return Err(ApiError::InvalidPlan(
                "Stage plan must contain at least one stage".to_string(),
            ));
        }
        for (position, stage) in self.stages.iter().enumerate() {
            if stage.count == 0 {
                return Err(ApiError::InvalidPlan(format!(
                    "Stage {} ({}) has no items",
                    position + 1,
                    stage.stage
                )));
            }
            if stage.description.trim().is_empty() {
                return Err(ApiError::InvalidPlan(format!(
                    "Stage {} ({}) is missing a description",
                    position + 1,
                    stage.stage
                )));
            }
        }
        Ok(())
    }
}

impl Default for StagePlan {
    fn default() -> Self {
        Self::funnel()
    }
}
