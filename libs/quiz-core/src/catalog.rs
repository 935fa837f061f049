//! Content catalog: loading, validation and lookup.
//!
//! The catalog is loaded once per session by the caller and passed into
//! assembly calls as an immutable handle. Malformed entries are rejected
//! here and never reach the matchers or assemblers.

use crate::error::{CatalogError, Result};
use crate::types::Unit;
use std::collections::HashSet;

/// Immutable, validated collection of units.
#[derive(Debug, Clone)]
pub struct Catalog {
    units: Vec<Unit>,
}

impl Catalog {
    /// Validate and wrap a set of units.
    pub fn new(units: Vec<Unit>) -> Result<Self> {
        let mut seen = HashSet::new();
        for unit in &units {
            if unit.unit_number == 0 {
                return Err(CatalogError::InvalidUnitNumber);
            }
            if !seen.insert(unit.unit_number) {
                return Err(CatalogError::DuplicateUnit {
                    number: unit.unit_number,
                });
            }
            validate_unit(unit)?;
        }
        log::debug!("catalog loaded: {} units", units.len());
        Ok(Self { units })
    }

    /// Parse a JSON array of units and validate it.
    pub fn from_json(content: &str) -> Result<Self> {
        let units: Vec<Unit> = serde_json::from_str(content)?;
        Self::new(units)
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Look up a unit by its number.
    pub fn unit(&self, number: u32) -> Option<&Unit> {
        self.units.iter().find(|u| u.unit_number == number)
    }

    /// Every vocabulary definition across all units (distractor pool).
    pub fn all_definitions(&self) -> Vec<&str> {
        self.units
            .iter()
            .flat_map(|u| u.vocabulary.iter().map(|v| v.definition.as_str()))
            .collect()
    }
}

fn validate_unit(unit: &Unit) -> Result<()> {
    let n = unit.unit_number;
    let empty = |s: &str| s.trim().is_empty();

    for v in &unit.vocabulary {
        if empty(&v.word) {
            return Err(CatalogError::EmptyField { unit: n, field: "vocabulary word" });
        }
        if empty(&v.answer) {
            return Err(CatalogError::EmptyField { unit: n, field: "vocabulary answer" });
        }
    }
    for e in &unit.expressions {
        if empty(&e.expression) {
            return Err(CatalogError::EmptyField { unit: n, field: "expression" });
        }
    }
    for c in &unit.conjugations {
        if empty(&c.verb) {
            return Err(CatalogError::EmptyField { unit: n, field: "conjugation verb" });
        }
        if empty(&c.answer) {
            return Err(CatalogError::EmptyField { unit: n, field: "conjugation answer" });
        }
    }
    for t in &unit.transforms {
        if empty(&t.source) {
            return Err(CatalogError::EmptyField { unit: n, field: "transform source" });
        }
        if empty(&t.answer) {
            return Err(CatalogError::EmptyField { unit: n, field: "transform answer" });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VocabEntry;

    fn unit(number: u32) -> Unit {
        Unit {
            unit_number: number,
            theme: format!("Thème {number}"),
            grammar_focus: vec![],
            vocabulary: vec![VocabEntry {
                word: "gaspillage".to_string(),
                definition: "action de gaspiller".to_string(),
                answer: "gaspillage".to_string(),
                article: Some("le".to_string()),
            }],
            expressions: vec![],
            conjugations: vec![],
            transforms: vec![],
        }
    }

    #[test]
    fn accepts_valid_units() {
        let catalog = Catalog::new(vec![unit(1), unit(2)]).unwrap();
        assert_eq!(catalog.units().len(), 2);
        assert_eq!(catalog.unit(2).unwrap().unit_number, 2);
        assert!(catalog.unit(3).is_none());
    }

    #[test]
    fn rejects_zero_unit_number() {
        let result = Catalog::new(vec![unit(0)]);
        assert!(matches!(result, Err(CatalogError::InvalidUnitNumber)));
    }

    #[test]
    fn rejects_duplicate_unit_numbers() {
        let result = Catalog::new(vec![unit(1), unit(1)]);
        assert!(matches!(
            result,
            Err(CatalogError::DuplicateUnit { number: 1 })
        ));
    }

    #[test]
    fn rejects_blank_answer() {
        let mut bad = unit(1);
        bad.vocabulary[0].answer = "   ".to_string();
        let result = Catalog::new(vec![bad]);
        assert!(matches!(result, Err(CatalogError::EmptyField { unit: 1, .. })));
    }

    #[test]
    fn parses_catalog_json() {
        let json = r#"[
            {
                "unit_number": 1,
                "theme": "Environnement",
                "vocabulary": [
                    {"word": "tri", "definition": "séparation des déchets", "answer": "tri", "article": "le"}
                ],
                "expressions": [
                    {"expression": "malgré tout", "usage": "concession"}
                ],
                "conjugations": [
                    {"verb": "protéger", "tense": "présent", "person": "il", "answer": "protège"}
                ],
                "transforms": [
                    {"kind": "voix passive", "source": "On recycle le verre.", "answer": "Le verre est recyclé."}
                ]
            }
        ]"#;
        let catalog = Catalog::from_json(json).unwrap();
        let unit = catalog.unit(1).unwrap();
        assert_eq!(unit.total_items(), 4);
        assert_eq!(catalog.all_definitions(), vec!["séparation des déchets"]);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            Catalog::from_json("{not json"),
            Err(CatalogError::Json(_))
        ));
    }
}
