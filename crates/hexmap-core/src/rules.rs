//! Edge matching rules.
//!
//! Two sides match when they carry the same type or when the pair appears in
//! the configured pair table (in either order). Exclusive types such as
//! rivers and railways cannot be laid against a side they do not match.

use crate::tile::TileType;
use serde::{Deserialize, Serialize};

/// Outcome of laying one of our sides against a placed neighbor's side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// The sides match
    Match,
    /// The sides differ; lowers the quality of the placement
    Mismatch,
    /// The sides differ and one of them is exclusive; the placement is impossible
    Conflict,
}

/// Pair table and exclusive types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchRules {
    /// Unordered pairs of distinct types that match each other
    pub pairs: Vec<(TileType, TileType)>,
    /// Types whose mismatch blocks a placement
    pub exclusive: Vec<TileType>,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            pairs: vec![
                (TileType::River, TileType::Lake),
                (TileType::River, TileType::WaterStation),
                (TileType::Lake, TileType::WaterStation),
                (TileType::Railway, TileType::WaterStation),
            ],
            exclusive: vec![TileType::River, TileType::Railway],
        }
    }
}

impl MatchRules {
    /// The default table plus the lakeshore pairs used by some editions
    pub fn extended() -> Self {
        let mut rules = Self::default();
        rules.pairs.push((TileType::Lake, TileType::Grassland));
        rules.pairs.push((TileType::Grassland, TileType::WaterStation));
        rules
    }

    /// Whether two sides match, in either order
    pub fn does_match(&self, a: TileType, b: TileType) -> bool {
        a == b
            || self
                .pairs
                .iter()
                .any(|&(from, to)| (from == a && to == b) || (from == b && to == a))
    }

    pub fn is_exclusive(&self, tile_type: TileType) -> bool {
        self.exclusive.contains(&tile_type)
    }

    /// Classify laying side `ours` against side `theirs`
    pub fn contact(&self, ours: TileType, theirs: TileType) -> Contact {
        if self.does_match(ours, theirs) {
            Contact::Match
        } else if self.is_exclusive(ours) || self.is_exclusive(theirs) {
            Contact::Conflict
        } else {
            Contact::Mismatch
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_type_matches() {
        let rules = MatchRules::default();
        for t in TileType::ALL {
            assert!(rules.does_match(t, t));
        }
    }

    #[test]
    fn test_pairs_are_order_independent() {
        let rules = MatchRules::default();
        assert!(rules.does_match(TileType::River, TileType::Lake));
        assert!(rules.does_match(TileType::Lake, TileType::River));
        assert!(rules.does_match(TileType::WaterStation, TileType::Railway));
        assert!(!rules.does_match(TileType::River, TileType::Railway));
        assert!(!rules.does_match(TileType::Lake, TileType::Grassland));
    }

    #[test]
    fn test_extended_pairs() {
        let rules = MatchRules::extended();
        assert!(rules.does_match(TileType::Grassland, TileType::Lake));
        assert!(rules.does_match(TileType::WaterStation, TileType::Grassland));
    }

    #[test]
    fn test_contact() {
        let rules = MatchRules::default();
        assert_eq!(rules.contact(TileType::River, TileType::Lake), Contact::Match);
        assert_eq!(
            rules.contact(TileType::Forest, TileType::Grassland),
            Contact::Mismatch
        );
        assert_eq!(
            rules.contact(TileType::River, TileType::Grassland),
            Contact::Conflict
        );
        assert_eq!(
            rules.contact(TileType::Field, TileType::Railway),
            Contact::Conflict
        );
        // Lake is not exclusive
        assert_eq!(
            rules.contact(TileType::Lake, TileType::Forest),
            Contact::Mismatch
        );
    }

    #[test]
    fn test_rules_from_json() {
        let rules: MatchRules =
            serde_json::from_str(r#"{"pairs": [["Town", "Field"]]}"#).unwrap();
        assert!(rules.does_match(TileType::Field, TileType::Town));
        // Missing fields fall back to the defaults
        assert_eq!(rules.exclusive, MatchRules::default().exclusive);
    }
}
