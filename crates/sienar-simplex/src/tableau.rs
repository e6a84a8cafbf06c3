use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::error::SimplexError;
use crate::problem::Constraint;
use crate::row::Row;

/// Pivots allowed per solve unless overridden with [`Tableau::with_max_iterations`]
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

/// Values closer to zero than this (1e-20) are cleared after every pivot.
/// Decimal division rounds at 28 digits, so `3 * (1 / 3)` leaves a residue of 1e-28.
pub const DEFAULT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 20);

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pivot {
    pub row: usize,
    pub column: usize,
}

/// Constraint rows plus a target (cost) row over one shared list of columns.
///
/// The loop drives every constraint row's right-hand side to be
/// non-negative. Each iteration takes the row with the most negative rhs,
/// picks the column with the smallest `|target / entry|` among that row's
/// negative entries, and eliminates it from every other row.
#[derive(Debug, Clone)]
pub struct Tableau {
    columns: Vec<String>,
    rows: Vec<Row>,
    target: Row,
    /// Column each row currently solves for
    basis: Vec<Option<usize>>,
    pivot: Option<Pivot>,
    iterations: usize,
    max_iterations: usize,
    tolerance: Decimal,
}

impl Tableau {
    /// Build a tableau from constraint rows and a target function.
    ///
    /// The first constraint fixes the column order; every other constraint
    /// must list the same number of columns and is placed by name. The target
    /// may leave columns out, they count as zero.
    pub fn new(constraints: &[Constraint], target: &Constraint) -> Result<Self, SimplexError> {
        let columns: Vec<String> = constraints
            .first()
            .unwrap_or(target)
            .names()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::with_capacity(constraints.len());
        for (i, constraint) in constraints.iter().enumerate() {
            if constraint.len() != columns.len() {
                return Err(SimplexError::ShapeMismatch {
                    row: i,
                    expected: columns.len(),
                    found: constraint.len(),
                });
            }
            let values = align(&columns, constraint).map_err(|e| match e {
                Misaligned::Duplicate(name) => SimplexError::DuplicateColumn { name },
                Misaligned::Unknown(name) => SimplexError::UnknownColumn { row: i, name },
            })?;
            rows.push(Row::new(values, Decimal::from(constraint.rhs())));
        }

        let target_values = align(&columns, target).map_err(|e| match e {
            Misaligned::Duplicate(name) => SimplexError::DuplicateColumn { name },
            Misaligned::Unknown(name) => SimplexError::UnknownTargetColumn { name },
        })?;

        log::debug!(
            "built tableau: {} rows x {} columns",
            rows.len(),
            columns.len()
        );

        Ok(Self {
            basis: initial_basis(&rows, columns.len()),
            columns,
            rows,
            target: Row::new(target_values, Decimal::from(target.rhs())),
            pivot: None,
            iterations: 0,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        })
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Zero disables clearing
    pub fn with_tolerance(mut self, tolerance: Decimal) -> Self {
        self.tolerance = tolerance.abs();
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn target(&self) -> &Row {
        &self.target
    }

    /// The pivot used by the most recent step
    pub fn pivot(&self) -> Option<Pivot> {
        self.pivot
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn tolerance(&self) -> Decimal {
        self.tolerance
    }

    /// For each constraint row, the column that is basic in it. Starts from
    /// the identity columns present at construction and follows every pivot.
    pub fn basis(&self) -> &[Option<usize>] {
        &self.basis
    }

    /// Every constraint row has a non-negative right-hand side.
    /// The target row is not checked.
    pub fn is_solved(&self) -> bool {
        self.rows.iter().all(|r| r.rhs() >= Decimal::ZERO)
    }

    /// The pivot the next step would use, or `None` once solved
    pub fn calculate_pivot(&self) -> Result<Option<Pivot>, SimplexError> {
        let Some(row) = self.pivot_row() else {
            return Ok(None);
        };
        let pivot_row = &self.rows[row];

        let mut best: Option<(usize, Decimal)> = None;
        let pairs = self.target.values().iter().zip(pivot_row.values());
        for (column, (&t, &p)) in pairs.enumerate() {
            if p >= Decimal::ZERO {
                continue;
            }
            let ratio = t.checked_div(p).ok_or(SimplexError::Overflow)?.abs();
            log::trace!("row {} column {}: ratio {}", row, column, ratio);
            if best.is_none_or(|(_, min)| ratio < min) {
                best = Some((column, ratio));
            }
        }

        match best {
            Some((column, _)) => Ok(Some(Pivot { row, column })),
            None => Err(SimplexError::NoEligibleColumn { row }),
        }
    }

    /// Row with the most negative rhs; the earliest wins a tie
    fn pivot_row(&self) -> Option<usize> {
        let mut min: Option<(usize, Decimal)> = None;
        for (i, row) in self.rows.iter().enumerate() {
            if row.rhs() < Decimal::ZERO && min.is_none_or(|(_, m)| row.rhs() < m) {
                min = Some((i, row.rhs()));
            }
        }
        min.map(|(i, _)| i)
    }

    /// Perform one pivot. Returns the pivot used, or `None` if already solved.
    pub fn step(&mut self) -> Result<Option<Pivot>, SimplexError> {
        let Some(pivot) = self.calculate_pivot()? else {
            return Ok(None);
        };
        log::debug!(
            "iteration {}: pivot row {} on column {} ({})",
            self.iterations + 1,
            pivot.row,
            pivot.column,
            self.columns[pivot.column]
        );

        let (before, rest) = self.rows.split_at_mut(pivot.row);
        let Some((pivot_row, after)) = rest.split_first_mut() else {
            unreachable!("pivot row {} comes from the row list", pivot.row);
        };

        pivot_row.normalize_with_pivot(pivot.column)?;
        for row in before.iter_mut().chain(after.iter_mut()) {
            row.zeroing_by_pivot_row(pivot.column, pivot_row)?;
        }
        self.target.zeroing_by_pivot_row(pivot.column, pivot_row)?;

        for row in self.rows.iter_mut().chain(std::iter::once(&mut self.target)) {
            row.clear_below(self.tolerance);
        }

        self.basis[pivot.row] = Some(pivot.column);
        self.pivot = Some(pivot);
        self.iterations += 1;
        Ok(Some(pivot))
    }

    /// Pivot until every constraint row's rhs is non-negative.
    ///
    /// Returns the number of pivots this call made.
    pub fn solve(&mut self) -> Result<usize, SimplexError> {
        let start = self.iterations;
        while !self.is_solved() {
            if self.iterations - start >= self.max_iterations {
                log::warn!("giving up after {} iterations", self.max_iterations);
                return Err(SimplexError::DidNotConverge {
                    iterations: self.max_iterations,
                });
            }
            self.step()?;
        }
        log::debug!("solved in {} iterations", self.iterations - start);
        Ok(self.iterations - start)
    }
}

/// Give each row the leftmost column that is 1 there and 0 in every other row
fn initial_basis(rows: &[Row], n_columns: usize) -> Vec<Option<usize>> {
    let mut basis = vec![None; rows.len()];
    for column in 0..n_columns {
        if let Some(row) = unit_row(rows, column) {
            if basis[row].is_none() {
                basis[row] = Some(column);
            }
        }
    }
    basis
}

fn unit_row(rows: &[Row], column: usize) -> Option<usize> {
    let mut found = None;
    for (i, row) in rows.iter().enumerate() {
        let value = row.value(column);
        if value == Decimal::ONE && found.is_none() {
            found = Some(i);
        } else if !value.is_zero() {
            return None;
        }
    }
    found
}

enum Misaligned {
    Duplicate(String),
    Unknown(String),
}

/// Lay out a constraint's values in column order; absent columns are zero
fn align(columns: &[String], constraint: &Constraint) -> Result<Vec<Decimal>, Misaligned> {
    let mut values = vec![Decimal::ZERO; columns.len()];
    let mut seen = HashSet::with_capacity(constraint.len());
    for entry in constraint.entries() {
        if !seen.insert(entry.name()) {
            return Err(Misaligned::Duplicate(entry.name().to_string()));
        }
        let Some(index) = columns.iter().position(|c| c == entry.name()) else {
            return Err(Misaligned::Unknown(entry.name().to_string()));
        };
        values[index] = entry.value();
    }
    Ok(values)
}
