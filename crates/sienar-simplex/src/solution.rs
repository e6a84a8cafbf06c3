use rust_decimal::Decimal;

use crate::entry::Entry;
use crate::row::Row;
use crate::tableau::Tableau;

/// Named view of a tableau's current numbers
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableauSnapshot {
    pub columns: Vec<String>,
    pub rows: Vec<RowSnapshot>,
    pub target: RowSnapshot,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSnapshot {
    pub entries: Vec<Entry>,
    pub rhs: Decimal,
}

/// Values of every column at the tableau's current basic solution
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicSolution {
    /// One entry per column, in column order
    pub values: Vec<Entry>,
    /// Right-hand side of the target row
    pub objective: Decimal,
}

impl BasicSolution {
    pub fn value(&self, name: &str) -> Option<Decimal> {
        self.values.iter().find(|e| e.name() == name).map(Entry::value)
    }
}

impl Tableau {
    pub fn snapshot(&self) -> TableauSnapshot {
        TableauSnapshot {
            columns: self.columns().to_vec(),
            rows: self.rows().iter().map(|r| self.row_snapshot(r)).collect(),
            target: self.row_snapshot(self.target()),
        }
    }

    fn row_snapshot(&self, row: &Row) -> RowSnapshot {
        RowSnapshot {
            entries: self
                .columns()
                .iter()
                .zip(row.values())
                .map(|(name, &value)| Entry::new(name.clone(), value))
                .collect(),
            rhs: row.rhs(),
        }
    }

    /// Read the basic solution off the constraint rows.
    ///
    /// Each row's basic column takes that row's rhs; every other column is 0.
    pub fn basic_solution(&self) -> BasicSolution {
        let mut values: Vec<Entry> = self
            .columns()
            .iter()
            .map(|name| Entry::new(name.clone(), Decimal::ZERO))
            .collect();
        for (row, column) in self.rows().iter().zip(self.basis()) {
            if let Some(column) = *column {
                values[column].set_value(row.rhs());
            }
        }

        BasicSolution {
            values,
            objective: self.target().rhs(),
        }
    }
}
