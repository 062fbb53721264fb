use std::cmp::Ordering;
use std::collections::HashMap;

/// A single cell. Ingested CSV cells are always `Str`; seeded business
/// collections may carry numbers. `Missing` stands for an absent cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Num(f64),
    Missing,
}

impl Value {
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Textual form used for rendering and filter matching.
    pub fn render(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            Value::Num(n) => n.to_string(),
            Value::Missing => String::new(),
        }
    }

    /// Natural ordering of cell values: numbers numerically, strings
    /// lexicographically, no coercion across types. A missing value orders
    /// after everything else.
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Missing, Value::Missing) => Ordering::Equal,
            (Value::Missing, _) => Ordering::Greater,
            (_, Value::Missing) => Ordering::Less,
            (Value::Num(a), Value::Num(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::Num(_), Value::Str(_)) => Ordering::Less,
            (Value::Str(_), Value::Num(_)) => Ordering::Greater,
        }
    }
}

/// One record as a mapping from column name to cell value. The key set is a
/// subset of the owning dataset's header list; key order carries no meaning.
pub type Row = HashMap<String, Value>;

/// Headers plus rows as produced by ingestion or the seed collections.
/// Header order is the display order; row order is ingestion order.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl Dataset {
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Row>) -> Self {
        Dataset {
            name: name.into(),
            headers,
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_render_without_trailing_zeroes() {
        assert_eq!(Value::Num(30.0).render(), "30");
        assert_eq!(Value::Num(30.5).render(), "30.5");
        assert_eq!(Value::Missing.render(), "");
    }

    #[test]
    fn compare_orders_numbers_numerically() {
        assert_eq!(Value::Num(9.0).compare(&Value::Num(10.0)), Ordering::Less);
        // Lexicographic ordering of the same digits flips the result.
        assert_eq!(
            Value::Str("9".into()).compare(&Value::Str("10".into())),
            Ordering::Greater
        );
    }

    #[test]
    fn missing_orders_last() {
        assert_eq!(Value::Missing.compare(&Value::Str("z".into())), Ordering::Greater);
        assert_eq!(Value::Num(1.0).compare(&Value::Missing), Ordering::Less);
        assert_eq!(Value::Missing.compare(&Value::Missing), Ordering::Equal);
    }
}
