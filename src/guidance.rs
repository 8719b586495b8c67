//! Keyword-triggered guidance over recognised text
//!
//! Rules are checked in order against the lowercased text; the first keyword
//! found as a substring decides the message. No match yields the default.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guidance {
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidanceRule {
    pub keyword: String,
    pub message: String,
    pub severity: Severity,
}

impl GuidanceRule {
    /// Builds a rule; a blank `keyword` yields a rule that never fires.
    pub fn new(keyword: &str, message: &str, severity: Severity) -> Self {
        Self {
            keyword: keyword.to_lowercase(),
            message: message.to_string(),
            severity,
        }
    }

    /// Case-insensitive on both sides. A blank keyword never matches.
    fn matches(&self, lowered_text: &str) -> bool {
        let keyword = self.keyword.trim();
        !keyword.is_empty() && lowered_text.contains(&keyword.to_lowercase())
    }

    fn guidance(&self) -> Guidance {
        Guidance {
            message: self.message.clone(),
            severity: self.severity,
        }
    }
}

/// Ordered rule list plus the fallback used when nothing matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidanceRules {
    pub rules: Vec<GuidanceRule>,
    pub default: Guidance,
}

impl Default for GuidanceRules {
    fn default() -> Self {
        Self {
            rules: vec![
                GuidanceRule::new(
                    "expiry",
                    "The image contains expiry information. Check the dates carefully.",
                    Severity::Warning,
                ),
                GuidanceRule::new(
                    "warning",
                    "The image contains a warning label. Exercise caution.",
                    Severity::Warning,
                ),
                GuidanceRule::new(
                    "ingredient",
                    "The image contains ingredient information. Review for dietary preferences.",
                    Severity::Info,
                ),
            ],
            default: Guidance {
                message: "No specific guidance detected.".to_string(),
                severity: Severity::Info,
            },
        }
    }
}

impl GuidanceRules {
    pub fn new(rules: Vec<GuidanceRule>, default: Guidance) -> Self {
        Self { rules, default }
    }

    /// Parses a rule set from JSON. Keywords are lowercased; empty ones are rejected.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut parsed: GuidanceRules = serde_json::from_str(json)?;

        for rule in &mut parsed.rules {
            if rule.keyword.trim().is_empty() {
                return Err(Error::Config(format!(
                    "Guidance rule with message '{}' has an empty keyword",
                    rule.message
                )));
            }
            rule.keyword = rule.keyword.to_lowercase();
        }

        Ok(parsed)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let rules = Self::from_json(&json)?;
        tracing::info!(
            "Loaded {} guidance rules from {}",
            rules.rules.len(),
            path.display()
        );
        Ok(rules)
    }

    pub fn classify(&self, text: &str) -> Guidance {
        classify_guidance(text, self)
    }
}

/// Case-insensitive, first-match-wins keyword classification.
pub fn classify_guidance(text: &str, rules: &GuidanceRules) -> Guidance {
    let lowered = text.to_lowercase();

    rules
        .rules
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map(GuidanceRule::guidance)
        .unwrap_or_else(|| rules.default.clone())
}
