use rust_decimal::Decimal;
use serde::Serialize;
use sienar_simplex::{SimplexError, Tableau, TableauSnapshot, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};

use crate::catalog::{Bundle, Catalog};
use crate::error::CatalogError;
use crate::request::{build_constraints, build_cost_row, Request};

/// Decimal places kept in reported quantities, costs and coverage.
/// Division by a count of 3 or 7 carries 28 digits; the last few are noise.
pub const REPORT_SCALE: u32 = 18;

/// How many copies of a bundle to buy. Quantities come from the LP
/// relaxation and may be fractional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Purchase {
    pub bundle: String,
    pub quantity: Decimal,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Coverage {
    pub item: String,
    pub required: u32,
    pub provided: Decimal,
}

impl Coverage {
    pub fn is_met(&self) -> bool {
        self.provided >= Decimal::from(self.required)
    }
}

/// The cheapest bundle mix found for a request
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub purchases: Vec<Purchase>,
    pub total_cost: Decimal,
    pub coverage: Vec<Coverage>,
    pub iterations: usize,
    pub tableau: TableauSnapshot,
}

/// Builds, solves and reads back the tableau for a request
pub struct Planner {
    max_iterations: usize,
    tolerance: Decimal,
}

impl Default for Planner {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl Planner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// See [`Tableau::with_tolerance`]
    pub fn with_tolerance(mut self, tolerance: Decimal) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn plan(&self, catalog: &Catalog, request: &Request) -> Result<Plan, CatalogError> {
        let constraints = build_constraints(catalog, request)?;
        let cost = build_cost_row(catalog);
        let mut tableau = Tableau::new(&constraints, &cost)?
            .with_max_iterations(self.max_iterations)
            .with_tolerance(self.tolerance);
        let iterations = tableau.solve()?;

        let solution = tableau.basic_solution();
        // unrounded, so coverage sums the exact tableau values
        let bought: Vec<(&Bundle, Decimal)> = catalog
            .bundles()
            .iter()
            .filter_map(|bundle| {
                let quantity = solution.value(&bundle.name)?;
                (!quantity.is_zero()).then_some((bundle, quantity))
            })
            .collect();

        let mut coverage = Vec::with_capacity(request.requirements.len());
        for requirement in &request.requirements {
            let mut provided = Decimal::ZERO;
            for (bundle, quantity) in &bought {
                let count = Decimal::from(bundle.count_of(&requirement.item));
                provided = quantity
                    .checked_mul(count)
                    .and_then(|d| provided.checked_add(d))
                    .ok_or(SimplexError::Overflow)?;
            }
            coverage.push(Coverage {
                item: requirement.item.clone(),
                required: requirement.quantity,
                provided: provided.round_dp(REPORT_SCALE),
            });
        }

        let purchases: Vec<Purchase> = bought
            .into_iter()
            .map(|(bundle, quantity)| Purchase {
                bundle: bundle.name.clone(),
                quantity: quantity.round_dp(REPORT_SCALE),
                price: bundle.price,
            })
            .collect();

        log::info!(
            "planned {} bundle kinds for {} requirements in {} iterations",
            purchases.len(),
            request.requirements.len(),
            iterations
        );

        Ok(Plan {
            purchases,
            total_cost: solution.objective.round_dp(REPORT_SCALE),
            coverage,
            iterations,
            tableau: tableau.snapshot(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Requirement;
    use rust_decimal_macros::dec;

    #[test]
    fn test_squadron_plan() {
        let plan = Planner::new()
            .plan(&Catalog::builtin(), &Request::builtin())
            .unwrap();

        assert_eq!(
            plan.purchases,
            vec![
                Purchase {
                    bundle: "CoreBox".to_string(),
                    quantity: dec!(1),
                    price: dec!(39),
                },
                Purchase {
                    bundle: "Xwing".to_string(),
                    quantity: dec!(4),
                    price: dec!(12),
                },
            ]
        );
        assert_eq!(plan.total_cost, dec!(87));
        let spent: Decimal = plan.purchases.iter().map(|p| p.price * p.quantity).sum();
        assert_eq!(spent, plan.total_cost);
        assert_eq!(plan.iterations, 2);
        assert!(plan.coverage.iter().all(Coverage::is_met), "{:?}", plan.coverage);
        // ship and luke bind, the rest have slack
        let provided: Vec<_> = plan.coverage.iter().map(|c| c.provided).collect();
        assert_eq!(provided, vec![dec!(5), dec!(1), dec!(4), dec!(6), dec!(6)]);
    }

    #[test]
    fn test_plan_tableau_is_feasible() {
        let plan = Planner::new()
            .plan(&Catalog::builtin(), &Request::builtin())
            .unwrap();
        assert!(plan.tableau.rows.iter().all(|r| r.rhs >= Decimal::ZERO));
        assert_eq!(plan.tableau.target.rhs, dec!(87));
    }

    #[test]
    fn test_empty_request_buys_nothing() {
        let plan = Planner::new()
            .plan(&Catalog::builtin(), &Request::default())
            .unwrap();
        assert!(plan.purchases.is_empty());
        assert_eq!(plan.total_cost, dec!(0));
        assert_eq!(plan.iterations, 0);
    }

    #[test]
    fn test_only_wedge() {
        let request = Request::new(vec![Requirement::new("WedgeAntilles", 2)]);
        let plan = Planner::new().plan(&Catalog::builtin(), &request).unwrap();
        assert_eq!(plan.purchases.len(), 1);
        assert_eq!(plan.purchases[0].bundle, "Xwing");
        assert_eq!(plan.purchases[0].quantity, dec!(2));
        assert_eq!(plan.total_cost, dec!(24));
    }

    #[test]
    fn test_identical_bundles_buy_the_cheaper() {
        let catalog = Catalog::from_json_str(
            r#"[
                { "name": "Expensive", "price": 10, "contents": [{ "name": "X", "type": "ship", "count": 1 }] },
                { "name": "Cheap", "price": 5, "contents": [{ "name": "X", "type": "ship", "count": 1 }] }
            ]"#,
        )
        .unwrap();
        let request = Request::new(vec![Requirement::new("X", 2)]);
        let plan = Planner::new().plan(&catalog, &request).unwrap();

        assert_eq!(
            plan.purchases,
            vec![Purchase {
                bundle: "Cheap".to_string(),
                quantity: dec!(2),
                price: dec!(5),
            }]
        );
        assert_eq!(plan.total_cost, dec!(10));
        let spent: Decimal = plan.purchases.iter().map(|p| p.price * p.quantity).sum();
        assert_eq!(spent, plan.total_cost);
    }

    #[test]
    fn test_bundle_count_of_three() {
        let catalog = Catalog::from_json_str(
            r#"[{ "name": "Box", "price": 9, "contents": [
                { "name": "X", "type": "ship", "count": 3 },
                { "name": "Y", "type": "pilot", "count": 3 }
            ] }]"#,
        )
        .unwrap();
        let request = Request::new(vec![Requirement::new("X", 1), Requirement::new("Y", 1)]);
        let plan = Planner::new().plan(&catalog, &request).unwrap();

        assert_eq!(plan.iterations, 1);
        assert!(plan.coverage.iter().all(Coverage::is_met), "{:?}", plan.coverage);
        for c in &plan.coverage {
            assert_eq!(c.provided, dec!(1));
        }
        assert_eq!(plan.purchases[0].quantity, dec!(0.333333333333333333));
        assert_eq!(plan.total_cost, dec!(3));
    }

    #[test]
    fn test_price_overflow_is_an_error() {
        let catalog = Catalog::from_json_str(
            r#"[{ "name": "Gold", "price": "79228162514264337593543950335",
                  "contents": [{ "name": "X", "type": "upgrade", "count": 1 }] }]"#,
        )
        .unwrap();
        let request = Request::new(vec![Requirement::new("X", 2)]);
        let err = Planner::new().plan(&catalog, &request).unwrap_err();
        assert!(matches!(err, CatalogError::Simplex(SimplexError::Overflow)));
    }

    #[test]
    fn test_budget_surfaces_as_error() {
        let err = Planner::new()
            .with_max_iterations(1)
            .plan(&Catalog::builtin(), &Request::builtin())
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Simplex(SimplexError::DidNotConverge { iterations: 1 })
        ));
    }
}
