//! Keyword-based context extraction from free text.
//!
//! Each field is filled by the first keyword group that matches, checked in
//! table order. Matching is a case-insensitive substring test, so short
//! keywords such as `ai` also fire inside longer words.

use serde::{Deserialize, Serialize};

/// Business sector a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sector {
    #[serde(rename = "CTI")]
    Cti,
    #[serde(rename = "ICG")]
    Icg,
    #[serde(rename = "PBWM")]
    Pbwm,
    #[serde(rename = "GFTS")]
    Gfts,
}

/// What the caller is trying to achieve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UseCase {
    #[serde(rename = "Platform Migration")]
    PlatformMigration,
    #[serde(rename = "Containerization")]
    Containerization,
    #[serde(rename = "Cloud-Native Development")]
    CloudNativeDevelopment,
    #[serde(rename = "Testing Environment")]
    TestingEnvironment,
    #[serde(rename = "AI/ML Integration")]
    AiMlIntegration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Critical,
    High,
}

impl std::fmt::Display for Sector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sector::Cti => write!(f, "CTI"),
            Sector::Icg => write!(f, "ICG"),
            Sector::Pbwm => write!(f, "PBWM"),
            Sector::Gfts => write!(f, "GFTS"),
        }
    }
}

impl std::fmt::Display for UseCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UseCase::PlatformMigration => write!(f, "Platform Migration"),
            UseCase::Containerization => write!(f, "Containerization"),
            UseCase::CloudNativeDevelopment => write!(f, "Cloud-Native Development"),
            UseCase::TestingEnvironment => write!(f, "Testing Environment"),
            UseCase::AiMlIntegration => write!(f, "AI/ML Integration"),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Critical => write!(f, "Critical"),
            Priority::High => write!(f, "High"),
        }
    }
}

/// Tags detected in a piece of text. A missing field means "not detected".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<Sector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_case: Option<UseCase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl ExtractedContext {
    /// Number of detected fields.
    pub fn populated_fields(&self) -> usize {
        usize::from(self.sector.is_some())
            + usize::from(self.use_case.is_some())
            + usize::from(self.priority.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.populated_fields() == 0
    }
}

/// Sector keyword → sector, in priority order.
const SECTOR_KEYWORDS: &[(&[&str], Sector)] = &[
    (&["cti"], Sector::Cti),
    (&["icg"], Sector::Icg),
    (&["pbwm"], Sector::Pbwm),
    (&["gfts"], Sector::Gfts),
];

/// Use-case keywords → use case, in priority order.
pub(crate) const USE_CASE_KEYWORDS: &[(&[&str], UseCase)] = &[
    (&["migrate", "migration"], UseCase::PlatformMigration),
    (&["container"], UseCase::Containerization),
    (&["cloud-native", "microservices"], UseCase::CloudNativeDevelopment),
    (&["test"], UseCase::TestingEnvironment),
    (&["ai", "machine learning"], UseCase::AiMlIntegration),
];

const PRIORITY_KEYWORDS: &[(&[&str], Priority)] = &[
    (&["urgent", "critical"], Priority::Critical),
    (&["important", "high priority"], Priority::High),
];

fn first_match<T: Copy>(lower: &str, table: &[(&[&str], T)]) -> Option<T> {
    table
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|kw| lower.contains(kw)))
        .map(|(_, value)| *value)
}

/// Extract sector, use case and priority tags from `text`.
pub fn extract(text: &str) -> ExtractedContext {
    let lower = text.to_lowercase();
    ExtractedContext {
        sector: first_match(&lower, SECTOR_KEYWORDS),
        use_case: first_match(&lower, USE_CASE_KEYWORDS),
        priority: first_match(&lower, PRIORITY_KEYWORDS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_yields_empty_context() {
        let ctx = extract("");
        assert!(ctx.is_empty());
        assert_eq!(serde_json::to_value(ctx).unwrap(), serde_json::json!({}));
    }

    #[test]
    fn test_migration_use_case() {
        let ctx = extract("I need to migrate our apps from PCF");
        assert_eq!(ctx.use_case, Some(UseCase::PlatformMigration));
        assert_eq!(ctx.priority, None);
    }

    #[test]
    fn test_all_fields_case_insensitive() {
        let ctx = extract("PBWM has an URGENT Containerization backlog");
        assert_eq!(ctx.sector, Some(Sector::Pbwm));
        assert_eq!(ctx.use_case, Some(UseCase::Containerization));
        assert_eq!(ctx.priority, Some(Priority::Critical));
        assert_eq!(ctx.populated_fields(), 3);
    }

    #[test]
    fn test_first_match_wins_in_table_order() {
        // Mentions both ICG and CTI; CTI is checked first.
        let ctx = extract("ICG and CTI teams");
        assert_eq!(ctx.sector, Some(Sector::Cti));

        // Migration outranks testing even when testing appears first.
        let ctx = extract("test harness for the migration");
        assert_eq!(ctx.use_case, Some(UseCase::PlatformMigration));

        let ctx = extract("important but also critical");
        assert_eq!(ctx.priority, Some(Priority::Critical));
    }

    #[test]
    fn test_substring_matching_is_literal() {
        // "maintain" contains "ai".
        let ctx = extract("we maintain a monolith");
        assert_eq!(ctx.use_case, Some(UseCase::AiMlIntegration));
    }

    #[test]
    fn test_high_priority_phrase() {
        let ctx = extract("This is high priority for GFTS");
        assert_eq!(ctx.priority, Some(Priority::High));
        assert_eq!(ctx.sector, Some(Sector::Gfts));
    }

    #[test]
    fn test_extract_is_deterministic() {
        let text = "Urgent: ICG wants cloud-native microservices";
        assert_eq!(extract(text), extract(text));
    }

    #[test]
    fn test_serialized_labels() {
        let ctx = extract("cti migration, critical");
        let json = serde_json::to_value(ctx).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "sector": "CTI",
                "useCase": "Platform Migration",
                "priority": "Critical",
            })
        );
    }

    #[test]
    fn test_display_matches_wire_label() {
        for use_case in USE_CASE_KEYWORDS.iter().map(|(_, u)| *u) {
            let wire = serde_json::to_value(use_case).unwrap();
            assert_eq!(wire, serde_json::json!(use_case.to_string()));
        }
    }
}
