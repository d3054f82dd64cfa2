use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Built-in alias table, shipped with the binary
const BUILTIN_ALIASES: &str = include_str!("../../assets/breed_aliases.json");

/// Errors that can occur when loading a breed alias table
#[derive(Debug, Error)]
pub enum AliasError {
    #[error("Failed to read alias table: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse alias table: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct AliasFile {
    classes: Vec<Vec<String>>,
}

/// Breed alias lookup table
///
/// Equivalence classes of breed spellings ("lab" ≈ "labrador retriever"),
/// kept as a data asset rather than comparator branching so deployments can
/// extend it without a rebuild. Lookups are keyed by the normalized
/// (lowercased, trimmed) breed string.
#[derive(Debug, Clone)]
pub struct BreedAliases {
    classes: HashMap<String, usize>,
}

impl BreedAliases {
    /// Load the table shipped in the binary
    pub fn builtin() -> Self {
        Self::from_json(BUILTIN_ALIASES).expect("builtin breed alias table is valid JSON")
    }

    /// Parse an alias table from JSON
    pub fn from_json(json: &str) -> Result<Self, AliasError> {
        let file: AliasFile = serde_json::from_str(json)?;

        let mut classes = HashMap::new();
        for (class_id, members) in file.classes.iter().enumerate() {
            for member in members {
                classes.insert(normalize_breed(member), class_id);
            }
        }

        Ok(Self { classes })
    }

    /// Load an alias table from a file, for deployment-specific overrides
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, AliasError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Whether two breed strings belong to the same equivalence class
    ///
    /// Both breeds must be present in the table; unlisted breeds never
    /// alias-match anything.
    pub fn same_class(&self, a: &str, b: &str) -> bool {
        match (
            self.classes.get(&normalize_breed(a)),
            self.classes.get(&normalize_breed(b)),
        ) {
            (Some(class_a), Some(class_b)) => class_a == class_b,
            _ => false,
        }
    }

    /// Number of known breed spellings
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl Default for BreedAliases {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Normalize a breed string for lookup and comparison
#[inline]
pub fn normalize_breed(breed: &str) -> String {
    breed.trim().to_lowercase()
}
