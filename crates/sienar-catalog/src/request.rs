use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sienar_simplex::Constraint;

use crate::catalog::Catalog;
use crate::error::CatalogError;

/// Prefix of the per-requirement identity columns added by [`build_constraints`]
pub const HELPER_PREFIX: &str = "helper";

/// "I need `quantity` of `item`"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub item: String,
    pub quantity: u32,
}

impl Requirement {
    pub fn new(item: impl Into<String>, quantity: u32) -> Self {
        Self {
            item: item.into(),
            quantity,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Request {
    pub requirements: Vec<Requirement>,
}

impl Request {
    pub fn new(requirements: Vec<Requirement>) -> Self {
        Self { requirements }
    }

    /// Parse a JSON array of `{ "item": ..., "quantity": ... }`
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// A squadron of five X-Wings led by Luke and Wedge
    pub fn builtin() -> Self {
        Self::new(vec![
            Requirement::new("X-Wing", 5),
            Requirement::new("LukeSkywalker", 1),
            Requirement::new("WedgeAntilles", 1),
            Requirement::new("RedSquadronExpert", 3),
            Requirement::new("IonTorpedo", 3),
        ])
    }
}

/// One `<=` row per requirement.
///
/// "at least `q` of item" is negated into
/// `-count_1 * bundle_1 - ... - count_n * bundle_n + helper_i <= -q`,
/// with bundle columns in catalog order followed by one helper column per
/// requirement (1 on its own row, 0 elsewhere).
pub fn build_constraints(catalog: &Catalog, request: &Request) -> Result<Vec<Constraint>, CatalogError> {
    let n = request.requirements.len();
    request
        .requirements
        .iter()
        .enumerate()
        .map(|(i, requirement)| {
            if !catalog.contains_item(&requirement.item) {
                return Err(CatalogError::UnknownItem(requirement.item.clone()));
            }
            let mut constraint = Constraint::new(-i64::from(requirement.quantity));
            for bundle in catalog.bundles() {
                constraint.set(
                    bundle.name.clone(),
                    -Decimal::from(bundle.count_of(&requirement.item)),
                );
            }
            for helper in 0..n {
                let value = if helper == i { Decimal::ONE } else { Decimal::ZERO };
                constraint.set(format!("{}{}", HELPER_PREFIX, helper), value);
            }
            Ok(constraint)
        })
        .collect()
}

/// The cost row: each bundle's negated price
pub fn build_cost_row(catalog: &Catalog) -> Constraint {
    catalog
        .bundles()
        .iter()
        .fold(Constraint::new(0), |row, bundle| row.with(bundle.name.clone(), -bundle.price))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_constraint_shape() {
        let constraints = build_constraints(&Catalog::builtin(), &Request::builtin()).unwrap();
        assert_eq!(constraints.len(), 5);
        for (i, c) in constraints.iter().enumerate() {
            let names: Vec<_> = c.names().collect();
            assert_eq!(
                names,
                vec!["CoreBox", "Xwing", "helper0", "helper1", "helper2", "helper3", "helper4"]
            );
            for h in 0..5 {
                let expected = if h == i { dec!(1) } else { dec!(0) };
                assert_eq!(c.get(&format!("helper{}", h)), Some(expected));
            }
        }
    }

    #[test]
    fn test_constraint_values_are_negated() {
        let constraints = build_constraints(&Catalog::builtin(), &Request::builtin()).unwrap();
        let red = &constraints[3];
        assert_eq!(red.rhs(), -3);
        assert_eq!(red.get("CoreBox"), Some(dec!(-2)));
        assert_eq!(red.get("Xwing"), Some(dec!(-1)));
        let luke = &constraints[1];
        assert_eq!(luke.get("Xwing"), Some(dec!(0)));
    }

    #[test]
    fn test_unknown_item() {
        let request = Request::new(vec![Requirement::new("Falcon", 1)]);
        let err = build_constraints(&Catalog::builtin(), &request).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownItem(item) if item == "Falcon"));
    }

    #[test]
    fn test_cost_row() {
        let cost = build_cost_row(&Catalog::builtin());
        assert_eq!(cost.rhs(), 0);
        assert_eq!(cost.get("CoreBox"), Some(dec!(-39)));
        assert_eq!(cost.get("Xwing"), Some(dec!(-12)));
        assert_eq!(cost.len(), 2);
    }

    #[test]
    fn test_parse_request() {
        let request = Request::from_json_str(
            r#"[{ "item": "X-Wing", "quantity": 2 }, { "item": "IonTorpedo", "quantity": 1 }]"#,
        )
        .unwrap();
        assert_eq!(
            request.requirements,
            vec![Requirement::new("X-Wing", 2), Requirement::new("IonTorpedo", 1)]
        );
    }
}
