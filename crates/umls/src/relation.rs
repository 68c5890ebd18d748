use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Relation path segment appended to a SNOMEDCT_US source concept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationType {
    #[default]
    Children,
    Parents,
    Ancestors,
    Descendants,
    Relations,
    Attributes,
}

impl RelationType {
    /// Selection order shown to the user.
    pub const ALL: [RelationType; 6] = [
        RelationType::Children,
        RelationType::Parents,
        RelationType::Ancestors,
        RelationType::Descendants,
        RelationType::Relations,
        RelationType::Attributes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::Children => "children",
            RelationType::Parents => "parents",
            RelationType::Ancestors => "ancestors",
            RelationType::Descendants => "descendants",
            RelationType::Relations => "relations",
            RelationType::Attributes => "attributes",
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown relation type: {0}")]
pub struct UnknownRelationType(pub String);

impl FromStr for RelationType {
    type Err = UnknownRelationType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RelationType::ALL
            .into_iter()
            .find(|r| r.as_str() == s.trim())
            .ok_or_else(|| UnknownRelationType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literals_parse_back() {
        for relation in RelationType::ALL {
            assert_eq!(relation.as_str().parse::<RelationType>(), Ok(relation));
        }
        assert!("siblings".parse::<RelationType>().is_err());
    }

    #[test]
    fn test_serde_uses_path_literals() {
        let json = serde_json::to_string(&RelationType::Descendants).unwrap();
        assert_eq!(json, "\"descendants\"");

        let parsed: RelationType = serde_json::from_str("\"attributes\"").unwrap();
        assert_eq!(parsed, RelationType::Attributes);
    }
}
