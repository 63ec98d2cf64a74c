//! Challenge definitions.
//!
//! The built-in catalog ships inside the binary as JSON. A catalog is
//! read-only once built and never empty, so a random pick always lands on a
//! real challenge.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

const BUILTIN_CATALOG: &str = include_str!("challenges.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeType {
    Body,
    Eye,
}

impl ChallengeType {
    pub fn label(&self) -> &'static str {
        match self {
            ChallengeType::Body => "body",
            ChallengeType::Eye => "eye",
        }
    }
}

/// A single challenge. Compared by content; it has no identity of its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Challenge {
    #[serde(rename = "type")]
    pub challenge_type: ChallengeType,
    pub description: String,
    /// Experience awarded on completion.
    pub amount: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    challenges: Vec<Challenge>,
}

impl Catalog {
    /// Build a catalog from explicit definitions.
    ///
    /// # Errors
    /// Returns a validation error if the list is empty or any challenge
    /// awards zero experience.
    pub fn new(challenges: Vec<Challenge>) -> Result<Self> {
        if challenges.is_empty() {
            return Err(ValidationError::EmptyCollection("challenge catalog".into()).into());
        }
        if let Some(bad) = challenges.iter().find(|c| c.amount == 0) {
            return Err(ValidationError::InvalidValue {
                field: "amount".into(),
                message: format!("challenge '{}' awards no experience", bad.description),
            }
            .into());
        }
        Ok(Self { challenges })
    }

    /// Parse a catalog from a JSON array of challenges.
    pub fn from_json(json: &str) -> Result<Self> {
        let challenges: Vec<Challenge> = serde_json::from_str(json)?;
        Self::new(challenges)
    }

    /// The catalog bundled with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn len(&self) -> usize {
        self.challenges.len()
    }

    /// Always false for a constructed catalog.
    pub fn is_empty(&self) -> bool {
        self.challenges.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Challenge> {
        self.challenges.get(index)
    }

    /// Challenge at `index`, clamped to the last entry when out of range.
    pub fn pick(&self, index: usize) -> &Challenge {
        // Non-empty by construction.
        &self.challenges[index.min(self.challenges.len() - 1)]
    }

    pub fn contains(&self, challenge: &Challenge) -> bool {
        self.challenges.contains(challenge)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Challenge> {
        self.challenges.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_parses() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.len(), 12);
        assert!(catalog.iter().any(|c| c.challenge_type == ChallengeType::Eye));
        assert!(catalog.iter().all(|c| c.amount > 0));
    }

    #[test]
    fn pick_clamps_out_of_range() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.pick(99), catalog.get(11).unwrap());
    }

    #[test]
    fn empty_catalog_is_rejected() {
        assert!(Catalog::new(Vec::new()).is_err());
    }

    #[test]
    fn zero_amount_is_rejected() {
        let result = Catalog::from_json(r#"[{"type": "eye", "description": "blink", "amount": 0}]"#);
        assert!(result.is_err());
    }

    #[test]
    fn type_field_uses_wire_name() {
        let json = serde_json::to_value(Challenge {
            challenge_type: ChallengeType::Body,
            description: "stretch".into(),
            amount: 10,
        })
        .unwrap();
        assert_eq!(json["type"], "body");
        assert_eq!(json["amount"], 10);
    }
}
