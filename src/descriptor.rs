//! Descriptor Parsing - JSON Document to Categorized Collections
//!
//! Element-level anomalies are never errors. Broken image entries are dropped,
//! quotes with an unknown `type` are kept under `default`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::category::{parse_category, OutcomeCategory, ParsedCategory};
use crate::persona::PersonaError;

/// Raw persona document as it sits on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaDocument {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub images: Vec<ImageElement>,
    #[serde(default)]
    pub quotes: Vec<QuoteElement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageElement {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteElement {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl PersonaDocument {
    /// Read and parse a descriptor file.
    pub fn read(path: &Path) -> Result<Self, PersonaError> {
        let content = fs::read_to_string(path).map_err(|source| PersonaError::Io {
            document: path.display().to_string(),
            source,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parse descriptor content. `document` only labels errors.
    pub fn parse(content: &str, document: &str) -> Result<Self, PersonaError> {
        serde_json::from_str(content).map_err(|e| PersonaError::Parse {
            document: document.to_string(),
            message: e.to_string(),
        })
    }

    /// The required `id` attribute, trimmed.
    pub fn required_id(&self, document: &str) -> Result<String, PersonaError> {
        match self.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Ok(id.to_string()),
            _ => Err(PersonaError::Parse {
                document: document.to_string(),
                message: "missing required attribute 'id'".to_string(),
            }),
        }
    }
}

/// Image paths per outcome category, already prefixed with the image base path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedImages {
    pub success: Vec<String>,
    pub failure: Vec<String>,
    pub other: Vec<String>,
}

impl CategorizedImages {
    pub fn classify(elements: &[ImageElement], image_base_path: &str) -> Self {
        let mut images = Self::default();

        for element in elements {
            let (Some(kind), Some(path)) = (element.kind.as_deref(), element.path.as_deref()) else {
                log::debug!("Skipping image without type or path: {:?}", element);
                continue;
            };
            let path = path.trim();
            if path.is_empty() {
                log::debug!("Skipping image with empty path (type '{}')", kind);
                continue;
            }

            let Some(category) = parse_category(kind).category() else {
                log::debug!("Dropping image '{}' with unrecognized type '{}'", path, kind);
                continue;
            };

            let full = format!("{}/{}", image_base_path, path);
            match category {
                OutcomeCategory::Success => images.success.push(full),
                OutcomeCategory::Failure => images.failure.push(full),
                OutcomeCategory::Other => images.other.push(full),
            }
        }

        images
    }

    pub fn get(&self, category: OutcomeCategory) -> &[String] {
        match category {
            OutcomeCategory::Success => &self.success,
            OutcomeCategory::Failure => &self.failure,
            OutcomeCategory::Other => &self.other,
        }
    }

    pub fn len(&self) -> usize {
        self.success.len() + self.failure.len() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Quotes per outcome category plus the uncategorized `default` bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedQuotes {
    pub success: Vec<String>,
    pub failure: Vec<String>,
    pub other: Vec<String>,
    pub default: Vec<String>,
}

impl CategorizedQuotes {
    pub fn classify(elements: &[QuoteElement]) -> Self {
        let mut quotes = Self::default();

        for element in elements {
            let text = element.text.as_deref().map(str::trim).unwrap_or_default();
            if text.is_empty() {
                continue;
            }
            let text = text.to_string();

            let parsed = element
                .kind
                .as_deref()
                .map(parse_category)
                .unwrap_or(ParsedCategory::Unrecognized);

            match parsed {
                ParsedCategory::Success => quotes.success.push(text),
                ParsedCategory::Failure => quotes.failure.push(text),
                ParsedCategory::Other => quotes.other.push(text),
                ParsedCategory::Unrecognized => quotes.default.push(text),
            }
        }

        quotes
    }

    pub fn get(&self, category: OutcomeCategory) -> &[String] {
        match category {
            OutcomeCategory::Success => &self.success,
            OutcomeCategory::Failure => &self.failure,
            OutcomeCategory::Other => &self.other,
        }
    }

    pub fn len(&self) -> usize {
        self.success.len() + self.failure.len() + self.other.len() + self.default.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
