//! Static solution catalog and progress heuristic.

use serde::Serialize;

use crate::context::{ExtractedContext, UseCase};

/// A catalog entry suggested for a use case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub id: &'static str,
    pub solution: &'static str,
    /// Confidence score, 0–100.
    pub confidence: u8,
    pub reasoning: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended: Option<bool>,
}

const MIGRATION: &[Recommendation] = &[
    Recommendation {
        id: "ecs",
        solution: "ECS",
        confidence: 95,
        reasoning: "ECS is our enterprise-grade OpenShift platform, perfect for PCF migrations with proven success rates.",
        recommended: Some(true),
    },
    Recommendation {
        id: "dolly",
        solution: "Dolly",
        confidence: 90,
        reasoning: "Dolly automates PCF to ECS migrations with minimal code changes and comprehensive rollback capabilities.",
        recommended: None,
    },
];

const CONTAINERIZATION: &[Recommendation] = &[Recommendation {
    id: "andromeda",
    solution: "Cloud@cx: Andromeda",
    confidence: 88,
    reasoning: "Andromeda provides cost-effective containerization with usage-based pricing and enterprise security.",
    recommended: None,
}];

const AI_ML: &[Recommendation] = &[Recommendation {
    id: "innovation-lab",
    solution: "Innovation Lab",
    confidence: 85,
    reasoning: "Innovation Lab offers rapid prototyping capabilities for AI/ML experimentation and development.",
    recommended: None,
}];

fn catalog(use_case: UseCase) -> &'static [Recommendation] {
    match use_case {
        UseCase::PlatformMigration => MIGRATION,
        UseCase::Containerization => CONTAINERIZATION,
        UseCase::AiMlIntegration => AI_ML,
        UseCase::CloudNativeDevelopment | UseCase::TestingEnvironment => &[],
    }
}

/// Catalog entries for the context's use case, in catalog order.
///
/// Only `use_case` drives the lookup; sector and priority are carried in the
/// context but do not influence ranking yet.
pub fn recommend(context: &ExtractedContext) -> Vec<Recommendation> {
    context
        .use_case
        .map(|use_case| catalog(use_case).to_vec())
        .unwrap_or_default()
}

/// Progress step (1–4) for a number of populated context fields.
pub fn next_step_for(populated: usize) -> u8 {
    match populated {
        0 => 1,
        1..=2 => 2,
        3 => 3,
        _ => 4,
    }
}

/// Progress step (1–4) reached by a context.
pub fn next_step(context: &ExtractedContext) -> u8 {
    next_step_for(context.populated_fields())
}
