use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StructureError;

/// A dotted path into a structure: `section.item` for item-level data, or
/// `section.item.leaf` where the leaf is a question id or a measure id.
///
/// An item-level reference never equals a leaf-level reference under the
/// same item, so evaluations stored at one are invisible at the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Reference {
    pub section_id: u32,
    pub item_id: u32,
    pub leaf_id: Option<u32>,
}

impl Reference {
    pub fn item(section_id: u32, item_id: u32) -> Self {
        Self {
            section_id,
            item_id,
            leaf_id: None,
        }
    }

    pub fn leaf(section_id: u32, item_id: u32, leaf_id: u32) -> Self {
        Self {
            section_id,
            item_id,
            leaf_id: Some(leaf_id),
        }
    }

    /// The item-level reference this path belongs to.
    pub fn item_ref(&self) -> Self {
        Self::item(self.section_id, self.item_id)
    }

    pub fn is_item_level(&self) -> bool {
        self.leaf_id.is_none()
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.leaf_id {
            Some(leaf) => write!(f, "{}.{}.{}", self.section_id, self.item_id, leaf),
            None => write!(f, "{}.{}", self.section_id, self.item_id),
        }
    }
}

impl FromStr for Reference {
    type Err = StructureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || StructureError::InvalidReference(s.to_string());
        let parts = s
            .split('.')
            .map(|p| p.parse::<u32>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;

        match parts.as_slice() {
            [section, item] => Ok(Self::item(*section, *item)),
            [section, item, leaf] => Ok(Self::leaf(*section, *item, *leaf)),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Reference {
    type Error = StructureError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Reference> for String {
    fn from(reference: Reference) -> Self {
        reference.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_item_and_leaf_paths() {
        assert_eq!("1.2".parse::<Reference>().unwrap(), Reference::item(1, 2));
        assert_eq!(
            "3.1.14".parse::<Reference>().unwrap(),
            Reference::leaf(3, 1, 14)
        );
    }

    #[test]
    fn rejects_malformed_paths() {
        for raw in ["", "1", "1.2.3.4", "a.b", "1..2", "-1.2"] {
            assert!(raw.parse::<Reference>().is_err(), "accepted {raw:?}");
        }
    }

    #[test]
    fn item_and_leaf_references_differ() {
        let leaf = Reference::leaf(1, 2, 3);
        assert_ne!(leaf, Reference::item(1, 2));
        assert_eq!(leaf.item_ref(), Reference::item(1, 2));
    }

    #[test]
    fn serializes_as_dotted_string() {
        let json = serde_json::to_string(&Reference::leaf(1, 2, 3)).unwrap();
        assert_eq!(json, "\"1.2.3\"");
        let back: Reference = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Reference::leaf(1, 2, 3));
    }
}
