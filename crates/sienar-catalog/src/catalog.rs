use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::request::HELPER_PREFIX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    #[serde(alias = "Ship")]
    Ship,
    #[serde(alias = "Pilot")]
    Pilot,
    #[serde(alias = "Upgrade")]
    Upgrade,
}

/// Something packed in a bundle, `count` times
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(rename = "type", alias = "Type")]
    pub kind: ContentKind,
    #[serde(alias = "Count")]
    pub count: u32,
}

/// A purchasable bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "Price")]
    pub price: Decimal,
    #[serde(default, alias = "Contents")]
    pub contents: Vec<Content>,
}

impl Bundle {
    /// How many of `item` one copy of this bundle provides
    pub fn count_of(&self, item: &str) -> u32 {
        self.contents
            .iter()
            .filter(|c| c.name == item)
            .map(|c| c.count)
            .sum()
    }
}

/// The bundles on offer, in a fixed order. That order becomes the column
/// order of every constraint built from the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    bundles: Vec<Bundle>,
}

impl Catalog {
    pub fn new(bundles: Vec<Bundle>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for bundle in &bundles {
            if bundle.name.starts_with(HELPER_PREFIX) {
                return Err(CatalogError::ReservedName(bundle.name.clone()));
            }
            if !seen.insert(bundle.name.as_str()) {
                return Err(CatalogError::DuplicateBundle(bundle.name.clone()));
            }
        }
        Ok(Self { bundles })
    }

    /// Parse a JSON array of bundles
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let bundles: Vec<Bundle> = serde_json::from_str(json)?;
        Self::new(bundles)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&json)?;
        log::info!("loaded {} bundles from {}", catalog.bundles.len(), path.display());
        Ok(catalog)
    }

    /// The two starter bundles used when no catalog file is given
    pub fn builtin() -> Self {
        let content = |name: &str, kind, count| Content {
            name: name.to_string(),
            kind,
            count,
        };
        Self {
            bundles: vec![
                Bundle {
                    name: "CoreBox".to_string(),
                    price: Decimal::from(39),
                    contents: vec![
                        content("X-Wing", ContentKind::Ship, 1),
                        content("LukeSkywalker", ContentKind::Pilot, 1),
                        content("RedSquadronExpert", ContentKind::Pilot, 2),
                        content("IonTorpedo", ContentKind::Upgrade, 2),
                    ],
                },
                Bundle {
                    name: "Xwing".to_string(),
                    price: Decimal::from(12),
                    contents: vec![
                        content("X-Wing", ContentKind::Ship, 1),
                        content("WedgeAntilles", ContentKind::Pilot, 1),
                        content("RedSquadronExpert", ContentKind::Pilot, 1),
                        content("IonTorpedo", ContentKind::Upgrade, 1),
                    ],
                },
            ],
        }
    }

    pub fn bundles(&self) -> &[Bundle] {
        &self.bundles
    }

    pub fn bundle(&self, name: &str) -> Option<&Bundle> {
        self.bundles.iter().find(|b| b.name == name)
    }

    pub fn contains_item(&self, item: &str) -> bool {
        self.bundles.iter().any(|b| b.count_of(item) > 0)
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}
