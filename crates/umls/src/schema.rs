use serde::{Deserialize, Serialize};

pub const SNOMEDCT_US: &str = "SNOMEDCT_US";

/// One term-to-source mapping of a concept, as returned by `/CUI/{cui}/atoms`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Atom {
    #[serde(default)]
    pub root_source: Option<String>,
    /// URL-like; the last path segment is the source-specific identifier.
    #[serde(default)]
    pub code: Option<String>,
}

impl Atom {
    pub fn source_code(&self) -> Option<&str> {
        self.code
            .as_deref()
            .and_then(|code| code.rsplit('/').next())
            .filter(|segment| !segment.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AtomsResponse {
    #[serde(default)]
    pub result: Vec<Atom>,
}

/// Code of the first SNOMEDCT_US atom in response order. Order is significant.
pub fn source_code_from_atoms(atoms: &[Atom]) -> Option<String> {
    atoms
        .iter()
        .find(|atom| atom.root_source.as_deref() == Some(SNOMEDCT_US))
        .and_then(Atom::source_code)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(root_source: &str, code: &str) -> Atom {
        Atom {
            root_source: Some(root_source.to_string()),
            code: Some(code.to_string()),
        }
    }

    #[test]
    fn test_first_snomed_atom_wins() {
        let atoms = vec![
            atom("X", "https://uts-ws.nlm.nih.gov/rest/content/current/source/X/1"),
            atom("SNOMEDCT_US", "https://uts-ws.nlm.nih.gov/rest/content/current/source/SNOMEDCT_US/42"),
            atom("SNOMEDCT_US", "https://uts-ws.nlm.nih.gov/rest/content/current/source/SNOMEDCT_US/99"),
        ];

        assert_eq!(source_code_from_atoms(&atoms), Some("42".to_string()));
    }

    #[test]
    fn test_no_snomed_atom() {
        let atoms = vec![atom("MSH", ".../D003920"), atom("MTH", ".../NOCODE")];
        assert_eq!(source_code_from_atoms(&atoms), None);
        assert_eq!(source_code_from_atoms(&[]), None);
    }

    #[test]
    fn test_atoms_response_tolerates_missing_fields() {
        let body = r#"{"result":[{"rootSource":"SNOMEDCT_US","code":"a/b/73211009","name":"Diabetes mellitus"},{"name":"no source"}]}"#;
        let parsed: AtomsResponse = serde_json::from_str(body).unwrap();

        assert_eq!(parsed.result.len(), 2);
        assert_eq!(parsed.result[1].root_source, None);
        assert_eq!(source_code_from_atoms(&parsed.result), Some("73211009".to_string()));

        let empty: AtomsResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.result.is_empty());
    }

    #[test]
    fn test_trailing_slash_has_no_code() {
        assert_eq!(atom("SNOMEDCT_US", "a/b/").source_code(), None);
        assert_eq!(atom("SNOMEDCT_US", "73211009").source_code(), Some("73211009"));
    }
}
