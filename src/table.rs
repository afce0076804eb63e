use crate::error::{Error, Result};
use crate::utils::sort_permutation;
use ndarray::prelude::*;
use serde_derive::{Deserialize, Serialize};
use std::convert::TryFrom;

/// Named numeric columns sharing one row count.
///
/// Values are stored row-major as `rows × columns`. Every reordering is
/// applied to whole rows, and the position each row had when the table was
/// built travels with it in `index`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTable")]
pub struct Table {
    names: Vec<String>,
    values: Array2<f64>,
    index: Vec<usize>,
}

/// Serialized form of a [`Table`], checked before it becomes one.
#[derive(Deserialize)]
struct RawTable {
    names: Vec<String>,
    values: Array2<f64>,
    index: Vec<usize>,
}

impl TryFrom<RawTable> for Table {
    type Error = Error;

    fn try_from(raw: RawTable) -> Result<Self> {
        let mut table = Table::new(raw.names, raw.values)?;
        if raw.index.len() != table.n_rows() {
            return Err(Error::InvalidTable(format!(
                "row index has {} entries for {} rows",
                raw.index.len(),
                table.n_rows()
            )));
        }

        let mut seen = vec![false; raw.index.len()];
        for &row in &raw.index {
            match seen.get_mut(row) {
                Some(slot) if !*slot => *slot = true,
                _ => {
                    return Err(Error::InvalidTable(format!(
                        "row index entry {} is out of range or repeated",
                        row
                    )))
                }
            }
        }

        table.index = raw.index;
        Ok(table)
    }
}

impl Table {
    pub fn new(names: Vec<String>, values: Array2<f64>) -> Result<Self> {
        if names.len() != values.ncols() {
            return Err(Error::InvalidTable(format!(
                "{} column names for {} columns",
                names.len(),
                values.ncols()
            )));
        }
        let index = (0..values.nrows()).collect();
        Ok(Table {
            names,
            values,
            index,
        })
    }

    /// Build a table from `(name, values)` pairs of equal length.
    pub fn from_columns<N, I>(columns: I) -> Result<Self>
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, Vec<f64>)>,
    {
        let (names, columns): (Vec<String>, Vec<Vec<f64>>) = columns
            .into_iter()
            .map(|(name, values)| (name.into(), values))
            .unzip();

        let n_rows = columns.first().map_or(0, Vec::len);
        if let Some(ragged) = columns.iter().position(|c| c.len() != n_rows) {
            return Err(Error::InvalidTable(format!(
                "column `{}` has {} rows, expected {}",
                names[ragged],
                columns[ragged].len(),
                n_rows
            )));
        }

        let values = Array2::from_shape_fn((n_rows, columns.len()), |(row, col)| columns[col][row]);
        Table::new(names, values)
    }

    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_columns(&self) -> usize {
        self.values.ncols()
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    pub fn column(&self, index: usize) -> ArrayView1<'_, f64> {
        self.values.column(index)
    }

    pub fn column_mut(&mut self, index: usize) -> ArrayViewMut1<'_, f64> {
        self.values.column_mut(index)
    }

    pub fn column_by_name(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|index| self.column(index))
    }

    /// Input position of each current row.
    pub fn row_index(&self) -> &[usize] {
        &self.index
    }

    /// Stable ascending sort of all rows by one column.
    pub fn sort_by_column(&mut self, column: usize) {
        let order = sort_permutation(&self.values.column(column));
        self.permute_rows(&order);
    }

    /// Owned copy of every column except `column`, rows aligned with the table.
    pub fn covariates(&self, column: usize) -> Array2<f64> {
        let others: Vec<usize> = (0..self.n_columns()).filter(|&c| c != column).collect();
        self.values.select(Axis(1), &others)
    }

    /// Rows back in the order the table was built with.
    pub fn into_input_order(mut self) -> Self {
        let mut order: Vec<usize> = (0..self.n_rows()).collect();
        order.sort_by_key(|&row| self.index[row]);
        self.permute_rows(&order);
        self
    }

    fn permute_rows(&mut self, order: &[usize]) {
        self.values = self.values.select(Axis(0), order);
        self.index = order.iter().map(|&row| self.index[row]).collect();
    }
}
