//! Grouping of raw dataset rows by circle.
//!
//! [`aggregate`] is a pure transform. Rows that cannot be used are turned
//! into [`RowDiagnostic`]s on the returned [`Aggregation`] and contribute
//! nothing to any circle; the caller decides whether to log them.

use globetrotter_catalog_models::{
    CircleAggregate, RawRow, RowDiagnostic, RowDiagnosticKind, TOTAL_ROW_MARKER,
};
use indexmap::IndexMap;
use serde_json::Value;

/// Result of aggregating a dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    /// Circles keyed by name, in order of first appearance.
    pub circles: IndexMap<String, CircleAggregate>,
    /// Rejected rows in dataset order.
    pub diagnostics: Vec<RowDiagnostic>,
    /// Number of grand-total rows excluded.
    pub excluded_totals: usize,
}

impl Aggregation {
    /// Number of rows rejected as invalid.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count_of(RowDiagnosticKind::SkippedInvalid)
    }

    /// Number of rows rejected due to processing errors.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.count_of(RowDiagnosticKind::ProcessingError)
    }

    fn count_of(&self, kind: RowDiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }
}

/// A usable row.
struct ValidRow {
    circle: String,
    monument: String,
    domestic_visitors: f64,
}

/// Why a row was rejected.
enum Rejection {
    Invalid(String),
    Fault(String),
}

/// Groups `rows` by circle, summing visitors and collecting monument names.
///
/// Rows whose circle is `"Total"` are excluded before any validation.
#[must_use]
pub fn aggregate(rows: &[RawRow]) -> Aggregation {
    let mut aggregation = Aggregation::default();

    for (index, row) in rows.iter().enumerate() {
        let rejection = match parse_row(row) {
            Ok(Some(valid)) => add_to_circle(&mut aggregation.circles, valid).err(),
            Ok(None) => {
                aggregation.excluded_totals += 1;
                None
            }
            Err(rejection) => Some(rejection),
        };

        if let Some(rejection) = rejection {
            let (kind, detail) = match rejection {
                Rejection::Invalid(detail) => (RowDiagnosticKind::SkippedInvalid, detail),
                Rejection::Fault(detail) => (RowDiagnosticKind::ProcessingError, detail),
            };
            aggregation.diagnostics.push(RowDiagnostic {
                index,
                kind,
                row: row.to_string(),
                detail,
            });
        }
    }

    aggregation
}

/// Adds `valid` to its circle. A row that would push the circle's total
/// past `f64::MAX` is rejected and leaves the circle untouched.
fn add_to_circle(
    circles: &mut IndexMap<String, CircleAggregate>,
    valid: ValidRow,
) -> Result<(), Rejection> {
    let circle = circles
        .entry(valid.circle.clone())
        .or_insert_with(|| CircleAggregate::new(valid.circle));

    let total = circle.domestic_visitors_total + valid.domestic_visitors;
    if !total.is_finite() {
        return Err(Rejection::Invalid(format!(
            "domestic visitor count {} overflows the {} total",
            valid.domestic_visitors, circle.name
        )));
    }

    circle.push(valid.monument, valid.domestic_visitors);
    Ok(())
}

/// Returns `Ok(None)` for the grand-total row.
fn parse_row(row: &RawRow) -> Result<Option<ValidRow>, Rejection> {
    let Some(cells) = row.cells() else {
        return Err(Rejection::Fault(format!(
            "row is not an array: {}",
            value_kind(&row.0)
        )));
    };

    if let Some(Value::String(circle)) = cells.first()
        && circle.trim() == TOTAL_ROW_MARKER
    {
        return Ok(None);
    }

    let circle = text_cell(cells.first(), "circle")?;
    let monument = text_cell(cells.get(1), "monument")?;
    let domestic_visitors = count_cell(cells.get(2))?;

    Ok(Some(ValidRow {
        circle,
        monument,
        domestic_visitors,
    }))
}

fn text_cell(cell: Option<&Value>, field: &str) -> Result<String, Rejection> {
    match cell {
        None | Some(Value::Null) => Err(Rejection::Invalid(format!("missing {field}"))),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                Err(Rejection::Invalid(format!("empty {field}")))
            } else {
                Ok(s.to_string())
            }
        }
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(Rejection::Fault(format!(
            "unexpected {} in {field} cell",
            value_kind(other)
        ))),
    }
}

fn count_cell(cell: Option<&Value>) -> Result<f64, Rejection> {
    let count = match cell {
        None | Some(Value::Null) => {
            return Err(Rejection::Invalid(
                "missing domestic visitor count".to_string(),
            ));
        }
        Some(Value::Number(n)) => n.as_f64().ok_or_else(|| {
            Rejection::Invalid(format!("domestic visitor count {n} is out of range"))
        })?,
        Some(Value::String(s)) => s.trim().parse::<f64>().map_err(|_| {
            Rejection::Invalid(format!("domestic visitor count {s:?} is not a number"))
        })?,
        Some(other) => {
            return Err(Rejection::Fault(format!(
                "unexpected {} in domestic visitor count cell",
                value_kind(other)
            )));
        }
    };

    if count.is_finite() && count >= 0.0 {
        Ok(count)
    } else {
        Err(Rejection::Invalid(format!(
            "domestic visitor count {count} must be a non-negative finite number"
        )))
    }
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
