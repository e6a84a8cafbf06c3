use rust_decimal::Decimal;

use crate::error::SimplexError;

/// Whether a row has been scaled so its entry in some column is 1
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowState {
    Raw,
    Normalized { column: usize },
}

/// A tableau row: values indexed against the tableau's column list, plus the right-hand side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    values: Vec<Decimal>,
    rhs: Decimal,
    state: RowState,
}

impl Row {
    pub fn new(values: Vec<Decimal>, rhs: Decimal) -> Self {
        Self {
            values,
            rhs,
            state: RowState::Raw,
        }
    }

    pub fn values(&self) -> &[Decimal] {
        &self.values
    }

    /// # Panics
    /// If `column` is out of range.
    pub fn value(&self, column: usize) -> Decimal {
        self.values[column]
    }

    pub fn rhs(&self) -> Decimal {
        self.rhs
    }

    pub fn state(&self) -> RowState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Divide the whole row (rhs included) by the value at `pivot`.
    ///
    /// A zero pivot value cannot be divided by; the row is zeroed instead.
    /// Pivot selection never picks a zero entry, so this only happens when
    /// the row is driven by hand.
    pub fn normalize_with_pivot(&mut self, pivot: usize) -> Result<(), SimplexError> {
        let pivot_value = self.values[pivot];
        if pivot_value.is_zero() {
            log::warn!("normalizing on a zero pivot in column {}, zeroing the row", pivot);
            self.values.iter_mut().for_each(|v| *v = Decimal::ZERO);
            self.rhs = Decimal::ZERO;
        } else {
            for v in self.values.iter_mut() {
                *v = v.checked_div(pivot_value).ok_or(SimplexError::Overflow)?;
            }
            self.rhs = self.rhs.checked_div(pivot_value).ok_or(SimplexError::Overflow)?;
        }
        self.state = RowState::Normalized { column: pivot };
        Ok(())
    }

    pub fn is_pivot_element_normalized(&self, pivot: usize) -> bool {
        self.state == RowState::Normalized { column: pivot }
    }

    /// Gauss-Jordan step: subtract a multiple of `pivot_row` so that this
    /// row's entry at `pivot` becomes zero.
    ///
    /// `pivot_row` is normalized at `pivot` first if it has not been already,
    /// so the first elimination against a fresh pivot row pays for scaling it
    /// and later ones reuse it.
    pub fn zeroing_by_pivot_row(&mut self, pivot: usize, pivot_row: &mut Row) -> Result<(), SimplexError> {
        debug_assert_eq!(self.len(), pivot_row.len(), "rows must share the column list");

        if !pivot_row.is_pivot_element_normalized(pivot) {
            pivot_row.normalize_with_pivot(pivot)?;
        }

        let k = -self.values[pivot];
        for (value, pivot_value) in self.values.iter_mut().zip(&pivot_row.values) {
            *value = multiply_add(*value, *pivot_value, k)?;
        }
        self.rhs = multiply_add(self.rhs, pivot_row.rhs, k)?;
        self.state = RowState::Raw;
        Ok(())
    }

    /// Set every value (rhs included) smaller in magnitude than `tolerance` to zero
    pub fn clear_below(&mut self, tolerance: Decimal) {
        for v in self.values.iter_mut().chain(std::iter::once(&mut self.rhs)) {
            if !v.is_zero() && v.abs() < tolerance {
                *v = Decimal::ZERO;
            }
        }
    }
}

/// `value + pivot_value * k`
fn multiply_add(value: Decimal, pivot_value: Decimal, k: Decimal) -> Result<Decimal, SimplexError> {
    pivot_value
        .checked_mul(k)
        .and_then(|d| value.checked_add(d))
        .ok_or(SimplexError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_normalize_divides_row_and_rhs() {
        let mut row = Row::new(vec![dec!(-1), dec!(-2), dec!(4)], dec!(-6));
        row.normalize_with_pivot(1).unwrap();
        assert_eq!(row.values(), &[dec!(0.5), dec!(1), dec!(-2)]);
        assert_eq!(row.rhs(), dec!(3));
        assert_eq!(row.state(), RowState::Normalized { column: 1 });
        assert!(row.is_pivot_element_normalized(1));
        assert!(!row.is_pivot_element_normalized(0));
    }

    #[test]
    fn test_normalize_is_idempotent_when_pivot_is_one() {
        let mut row = Row::new(vec![dec!(3), dec!(1), dec!(-7.25)], dec!(11));
        let before = row.values().to_vec();
        row.normalize_with_pivot(1).unwrap();
        assert_eq!(row.values(), before.as_slice());
        assert_eq!(row.rhs(), dec!(11));
        row.normalize_with_pivot(1).unwrap();
        assert_eq!(row.values(), before.as_slice());
    }

    #[test]
    fn test_normalize_zero_pivot_zeroes_row() {
        let mut row = Row::new(vec![dec!(2), dec!(0), dec!(5)], dec!(-3));
        row.normalize_with_pivot(1).unwrap();
        assert!(row.values().iter().all(|v| v.is_zero()));
        assert!(row.rhs().is_zero());
    }

    #[test]
    fn test_zeroing_eliminates_column_exactly() {
        let mut pivot_row = Row::new(vec![dec!(-1), dec!(-3), dec!(1), dec!(0)], dec!(-5));
        let mut row = Row::new(vec![dec!(-2), dec!(-1), dec!(0), dec!(1)], dec!(-3));

        row.zeroing_by_pivot_row(1, &mut pivot_row).unwrap();

        // pivot row was scaled by -1/3 on the way
        assert!(pivot_row.is_pivot_element_normalized(1));
        assert_eq!(pivot_row.value(1), dec!(1));
        assert_eq!(row.value(1), Decimal::ZERO, "entry at pivot column must vanish exactly");
        assert_eq!(row.state(), RowState::Raw);
    }

    #[test]
    fn test_zeroing_normalizes_pivot_row_once() {
        let mut pivot_row = Row::new(vec![dec!(-2), dec!(4)], dec!(-8));
        let mut a = Row::new(vec![dec!(1), dec!(1)], dec!(1));
        let mut b = Row::new(vec![dec!(3), dec!(0)], dec!(2));

        a.zeroing_by_pivot_row(0, &mut pivot_row).unwrap();
        let scaled = pivot_row.clone();
        b.zeroing_by_pivot_row(0, &mut pivot_row).unwrap();

        assert_eq!(pivot_row, scaled, "second elimination must not rescale the pivot row");
        assert_eq!(pivot_row.values(), &[dec!(1), dec!(-2)]);
        assert_eq!(pivot_row.rhs(), dec!(4));
        // a = a - 1 * pivot
        assert_eq!(a.values(), &[dec!(0), dec!(3)]);
        assert_eq!(a.rhs(), dec!(-3));
        // b = b - 3 * pivot
        assert_eq!(b.values(), &[dec!(0), dec!(6)]);
        assert_eq!(b.rhs(), dec!(-10));
    }

    #[test]
    fn test_overflow_is_an_error() {
        let mut row = Row::new(vec![Decimal::MAX, dec!(0.5)], dec!(1));
        assert_eq!(row.normalize_with_pivot(1), Err(SimplexError::Overflow));

        let mut pivot_row = Row::new(vec![dec!(1), Decimal::MAX], dec!(1));
        let mut row = Row::new(vec![dec!(-2), dec!(1)], dec!(0));
        assert_eq!(
            row.zeroing_by_pivot_row(0, &mut pivot_row),
            Err(SimplexError::Overflow)
        );
    }

    #[test]
    fn test_clear_below_snaps_rounding_residue() {
        let mut row = Row::new(
            vec![dec!(0.0000000000000000000000000001), dec!(-1)],
            dec!(-0.0000000000000000000000000001),
        );
        row.clear_below(dec!(0.00000000000000000001));
        assert_eq!(row.values(), &[dec!(0), dec!(-1)]);
        assert_eq!(row.rhs(), dec!(0));
    }

    #[test]
    fn test_zeroing_with_zero_local_value_is_noop() {
        let mut pivot_row = Row::new(vec![dec!(-1), dec!(2)], dec!(-1));
        let mut row = Row::new(vec![dec!(0), dec!(5)], dec!(9));
        row.zeroing_by_pivot_row(0, &mut pivot_row).unwrap();
        assert_eq!(row.values(), &[dec!(0), dec!(5)]);
        assert_eq!(row.rhs(), dec!(9));
    }
}
