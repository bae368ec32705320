//! In-memory result table: a header plus one row per benchmark invocation.

use crate::error::BenchError;
use crate::harness::Aggregate;
use crate::Algorithm;

pub const RUN_LABEL: &str = "Run #";
pub const AVERAGE_LABEL: &str = "Average (ns)";

/// Header for a table whose rows come from `run_count` timed runs.
///
/// The first run is trimmed, so sample columns are numbered `0..run_count - 1`.
pub fn build_header(run_count: usize) -> Vec<String> {
    let mut header = Vec::with_capacity(run_count + 1);
    header.push(RUN_LABEL.to_string());
    header.extend((0..run_count.saturating_sub(1)).map(|i| i.to_string()));
    header.push(AVERAGE_LABEL.to_string());
    header
}

/// Plain decimal float text that always keeps a fractional part (`20.0`, `-1.0`).
///
/// Never switches to exponent form, however large the value.
fn format_average(average: f64) -> String {
    if average.is_finite() && average.fract() == 0.0 {
        format!("{average:.1}")
    } else {
        format!("{average}")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultRow {
    fields: Vec<String>,
}

impl ResultRow {
    pub fn new(algorithm: Algorithm, stats: &Aggregate) -> Self {
        let mut fields = Vec::with_capacity(stats.trimmed.len() + 2);
        fields.push(algorithm.name().to_string());
        fields.extend(stats.trimmed.iter().map(|ns| ns.to_string()));
        fields.push(format_average(stats.average));
        Self { fields }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Runs this row was measured over, trimmed sample included.
    pub fn run_count(&self) -> usize {
        self.fields.len() - 1
    }
}

#[derive(Clone, Debug, Default)]
pub struct ResultTable {
    header: Option<Vec<String>>,
    run_count: usize,
    rows: Vec<ResultRow>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `row`, fixing the header from the first row's run count.
    ///
    /// Rows with a different run count are rejected and the table is left as is.
    pub fn append_row(&mut self, row: ResultRow) -> Result<&mut Self, BenchError> {
        match self.header {
            None => {
                self.run_count = row.run_count();
                self.header = Some(build_header(self.run_count));
            }
            Some(_) if row.run_count() != self.run_count => {
                return Err(BenchError::RunCountMismatch {
                    expected: self.run_count,
                    actual: row.run_count(),
                });
            }
            Some(_) => {}
        }
        self.rows.push(row);
        Ok(self)
    }

    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    /// Run count the header was built for, once a row has been appended.
    pub fn run_count(&self) -> Option<usize> {
        self.header.as_ref().map(|_| self.run_count)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header first, then data rows in append order.
    pub fn rows(&self) -> impl Iterator<Item = &[String]> + '_ {
        self.header
            .as_deref()
            .into_iter()
            .chain(self.rows.iter().map(ResultRow::fields))
    }
}
