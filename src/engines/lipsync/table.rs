use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;

#[derive(thiserror::Error, Debug)]
pub enum LipSyncError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid viseme table: {0}")]
    Config(String),
}

static STANDARD_TABLE: Lazy<VisemeTable> = Lazy::new(VisemeTable::hardcoded);

/// One letter's mouth pose and how long it is held.
#[derive(Debug, Clone, PartialEq)]
pub struct VisemeEntry {
    pub character: char,
    pub viseme_id: String,
    /// Unscaled display time in seconds
    pub base_duration: f64,
}

/// Immutable mapping from uppercase letters to viseme entries.
#[derive(Debug, Clone, PartialEq)]
pub struct VisemeTable {
    entries: HashMap<char, VisemeEntry>,
}

impl VisemeTable {
    /// The built-in table, shared for the lifetime of the process.
    pub fn standard() -> &'static VisemeTable {
        &STANDARD_TABLE
    }

    /// Look up an uppercase letter. Letters outside the table have no entry.
    pub fn lookup(&self, ch: char) -> Option<&VisemeEntry> {
        self.entries.get(&ch)
    }

    /// All entries, sorted by letter.
    pub fn entries(&self) -> Vec<(char, &VisemeEntry)> {
        let mut entries: Vec<(char, &VisemeEntry)> =
            self.entries.iter().map(|(&ch, e)| (ch, e)).collect();
        entries.sort_unstable_by_key(|(ch, _)| *ch);
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn hardcoded() -> Self {
        let rows: &[(char, &str, f64)] = &[
            ('A', "WideOpen", 0.15),
            ('E', "Open", 0.12),
            ('I', "Open", 0.12),
            ('Y', "Open", 0.12),
            ('O', "Rounded", 0.15),
            ('R', "Rounded", 0.12),
            ('U', "Pucker", 0.15),
            ('W', "Pucker", 0.12),
            ('M', "Closed", 0.08),
            ('N', "Closed", 0.08),
            ('B', "Closed", 0.06),
            ('P', "Closed", 0.06),
            ('L', "LTongue", 0.1),
            ('F', "TeethOnLip", 0.12),
            ('V', "TeethOnLip", 0.12),
            ('S', "Clenched", 0.1),
            ('T', "Clenched", 0.08),
            ('H', "Idle", 0.08),
        ];
        rows.iter()
            .map(|&(character, viseme_id, base_duration)| VisemeEntry {
                character,
                viseme_id: viseme_id.to_string(),
                base_duration,
            })
            .collect()
    }
}

impl FromIterator<VisemeEntry> for VisemeTable {
    fn from_iter<I: IntoIterator<Item = VisemeEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|e| (e.character, e)).collect(),
        }
    }
}

/// Load a viseme table from a JSON file.
///
/// The file must contain a `"visemes"` object mapping single-character keys
/// to `{ "viseme": <string>, "duration": <positive number> }`. Keys are
/// uppercased so lookups match normalized input.
pub fn load_table(path: &Path) -> Result<VisemeTable, LipSyncError> {
    let content = std::fs::read_to_string(path)?;
    let table = parse_table(&content)?;
    log::info!("Loaded {} visemes from {}", table.len(), path.display());
    Ok(table)
}

fn parse_table(content: &str) -> Result<VisemeTable, LipSyncError> {
    let json: serde_json::Value = serde_json::from_str(content)
        .map_err(|e| LipSyncError::Config(format!("Failed to parse JSON: {e}")))?;

    let visemes = json
        .get("visemes")
        .ok_or_else(|| LipSyncError::Config("Missing 'visemes' field".to_string()))?
        .as_object()
        .ok_or_else(|| LipSyncError::Config("'visemes' must be an object".to_string()))?;

    let mut entries = HashMap::new();
    for (k, v) in visemes {
        let mut chars = k.chars();
        let ch = match (chars.next(), chars.next()) {
            (Some(ch), None) => ch,
            _ => {
                return Err(LipSyncError::Config(format!(
                    "Key must be a single character: {k:?}"
                )))
            }
        };
        let mut upper = ch.to_uppercase();
        let character = match (upper.next(), upper.next()) {
            (Some(c), None) => c,
            _ => {
                return Err(LipSyncError::Config(format!(
                    "Key {k:?} has no single-character uppercase form"
                )))
            }
        };

        let viseme_id = v
            .get("viseme")
            .and_then(|v| v.as_str())
            .ok_or_else(|| LipSyncError::Config(format!("Missing 'viseme' string for key {k:?}")))?;
        let base_duration = v
            .get("duration")
            .and_then(|d| d.as_f64())
            .ok_or_else(|| LipSyncError::Config(format!("Non-numeric duration for key {k:?}")))?;
        if !base_duration.is_finite() || base_duration <= 0.0 {
            return Err(LipSyncError::Config(format!(
                "Duration for key {k:?} must be positive, got {base_duration}"
            )));
        }

        let entry = VisemeEntry {
            character,
            viseme_id: viseme_id.to_string(),
            base_duration,
        };
        if entries.insert(character, entry).is_some() {
            return Err(LipSyncError::Config(format!(
                "Duplicate entry for {character:?}"
            )));
        }
    }

    Ok(VisemeTable { entries })
}
