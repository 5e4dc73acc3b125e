use super::error::CompileError;

/// A decision table in its raw tabular form.
///
/// The header names the columns, the operator row assigns one operator token
/// per column, and every data row holds one raw cell string per column. A
/// blank cell means the rule places no condition on that column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecisionTable {
    pub(crate) header: Vec<String>,
    pub(crate) operators: Vec<String>,
    pub(crate) rows: Vec<Vec<String>>,
}

impl DecisionTable {
    /// # Example
    ///
    /// ```
    /// use kisoku::DecisionTable;
    ///
    /// let table = DecisionTable::new(
    ///     ["RULE_ID", "AGE", "DISCOUNT"],
    ///     ["RULE_ID", "GTE", "SET"],
    ///     [["R1", "18", "0.05"]],
    /// );
    /// assert_eq!(table.row_count(), 1);
    /// ```
    #[must_use]
    pub fn new<H, O, R, C>(
        header: impl IntoIterator<Item = H>,
        operators: impl IntoIterator<Item = O>,
        rows: impl IntoIterator<Item = R>,
    ) -> Self
    where
        H: Into<String>,
        O: Into<String>,
        R: IntoIterator<Item = C>,
        C: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            operators: operators.into_iter().map(Into::into).collect(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// Build a table from rows shaped like a CSV file: header first, operator
    /// row second, data rows after.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::MissingHeader`] or
    /// [`CompileError::MissingOperatorRow`] when those rows are absent.
    pub fn from_rows<R, C>(rows: impl IntoIterator<Item = R>) -> Result<Self, CompileError>
    where
        R: IntoIterator<Item = C>,
        C: Into<String>,
    {
        let mut rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect::<Vec<String>>());
        let header = rows.next().ok_or(CompileError::MissingHeader)?;
        let operators = rows.next().ok_or(CompileError::MissingOperatorRow)?;
        Ok(Self {
            header,
            operators,
            rows: rows.collect(),
        })
    }

    #[must_use]
    pub fn header(&self) -> &[String] {
        &self.header
    }

    #[must_use]
    pub fn operators(&self) -> &[String] {
        &self.operators
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.header.len()
    }
}
