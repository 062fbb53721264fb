use std::cmp::Ordering;
use std::collections::HashMap;

use rayon::prelude::*;
use tracing::trace;

use crate::data::{Row, Value};

/// Column name to filter text. Empty or absent entries mean no filter on
/// that column. The engine never mutates a filter set.
pub type FilterSet = HashMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        }
    }
}

/// The single active sort: one column, one direction.
#[derive(Debug, Clone, PartialEq)]
pub struct SortSpec {
    pub column: String,
    pub direction: Direction,
}

impl SortSpec {
    pub fn ascending(column: impl Into<String>) -> Self {
        SortSpec {
            column: column.into(),
            direction: Direction::Ascending,
        }
    }

    /// Requesting a sort on the already sorted column flips the direction;
    /// any other column starts over ascending.
    pub fn toggle(current: Option<&SortSpec>, column: &str) -> SortSpec {
        match current {
            Some(spec) if spec.column == column => SortSpec {
                column: column.to_string(),
                direction: match spec.direction {
                    Direction::Ascending => Direction::Descending,
                    Direction::Descending => Direction::Ascending,
                },
            },
            _ => SortSpec::ascending(column),
        }
    }
}

/// Derives the display order for `rows`: filters first, then a stable sort.
///
/// A row survives filtering when, for every non-empty filter, the case folded
/// text of its cell in that column contains the case folded filter text;
/// filters on different columns compose with AND. A sort directive naming a
/// column outside the header list is ignored. Pure function of its inputs,
/// identical inputs always derive the identical order.
pub fn view_order(
    headers: &[String],
    rows: &[Row],
    filters: &FilterSet,
    sort: Option<&SortSpec>,
) -> Vec<usize> {
    let active: Vec<(&String, String)> = filters
        .iter()
        .filter(|(_, text)| !text.is_empty())
        .map(|(column, text)| (column, text.to_lowercase()))
        .collect();

    let mut order: Vec<usize> = if active.is_empty() {
        (0..rows.len()).collect()
    } else {
        // One pass per filtered column, columns scanned in parallel.
        let masks: Vec<Vec<bool>> = active
            .par_iter()
            .map(|(column, needle)| {
                rows.iter()
                    .map(|row| cell_text(row, column).to_lowercase().contains(needle.as_str()))
                    .collect()
            })
            .collect();
        (0..rows.len())
            .filter(|&idx| masks.iter().all(|mask| mask[idx]))
            .collect()
    };

    if let Some(spec) = sort
        && headers.iter().any(|h| h == &spec.column)
    {
        order.sort_by(|&a, &b| compare_rows(&rows[a], &rows[b], spec));
    }

    trace!(
        "Derived order: {} of {} rows, {} active filters",
        order.len(),
        rows.len(),
        active.len()
    );
    order
}

/// Same derivation, materialized as owned rows for callers that do not keep
/// the source sequence around.
pub fn apply(
    headers: &[String],
    rows: &[Row],
    filters: &FilterSet,
    sort: Option<&SortSpec>,
) -> Vec<Row> {
    view_order(headers, rows, filters, sort)
        .into_iter()
        .map(|idx| rows[idx].clone())
        .collect()
}

fn cell_text(row: &Row, column: &str) -> String {
    row.get(column).unwrap_or(&Value::Missing).render()
}

fn compare_rows(a: &Row, b: &Row, spec: &SortSpec) -> Ordering {
    let missing = Value::Missing;
    let va = a.get(&spec.column).unwrap_or(&missing);
    let vb = b.get(&spec.column).unwrap_or(&missing);
    match (va.is_missing(), vb.is_missing()) {
        (true, true) => Ordering::Equal,
        // Rows with a missing sort cell stay at the end of the display in
        // both directions; only present values follow the direction.
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => match spec.direction {
            Direction::Ascending => va.compare(vb),
            Direction::Descending => va.compare(vb).reverse(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn srow(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::Str(v.to_string())))
            .collect()
    }

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn filters(pairs: &[(&str, &str)]) -> FilterSet {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn people() -> (Vec<String>, Vec<Row>) {
        (
            headers(&["Name", "Age"]),
            vec![
                srow(&[("Name", "Ann"), ("Age", "30")]),
                srow(&[("Name", "Bob"), ("Age", "25")]),
                srow(&[("Name", "Smith, Jr"), ("Age", "40")]),
            ],
        )
    }

    #[test]
    fn no_filter_and_no_sort_keeps_source_order() {
        let (h, rows) = people();
        assert_eq!(view_order(&h, &rows, &FilterSet::new(), None), vec![0, 1, 2]);
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let h = headers(&["C"]);
        let rows = vec![srow(&[("C", "xabcx")]), srow(&[("C", "abx")])];
        let order = view_order(&h, &rows, &filters(&[("C", "ABC")]), None);
        assert_eq!(order, vec![0]);
    }

    #[test]
    fn filters_compose_with_and() {
        let h = headers(&["A", "B"]);
        let rows = vec![
            srow(&[("A", "red"), ("B", "small")]),
            srow(&[("A", "red"), ("B", "large")]),
            srow(&[("A", "blue"), ("B", "small")]),
            srow(&[("A", "blue"), ("B", "large")]),
        ];
        let both = view_order(&h, &rows, &filters(&[("A", "red"), ("B", "small")]), None);
        let only_a = view_order(&h, &rows, &filters(&[("A", "red")]), None);
        let only_b = view_order(&h, &rows, &filters(&[("B", "small")]), None);
        let intersection: Vec<usize> = only_a
            .iter()
            .copied()
            .filter(|idx| only_b.contains(idx))
            .collect();
        assert_eq!(both, intersection);
        assert_eq!(both, vec![0]);
    }

    #[test]
    fn empty_filter_text_matches_everything() {
        let (h, rows) = people();
        let order = view_order(&h, &rows, &filters(&[("Name", "")]), None);
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn missing_cell_filters_as_empty_string() {
        let h = headers(&["A", "B"]);
        let mut sparse = srow(&[("A", "x")]);
        sparse.insert("B".to_string(), Value::Missing);
        let rows = vec![sparse, srow(&[("A", "y"), ("B", "hit")])];
        let order = view_order(&h, &rows, &filters(&[("B", "hit")]), None);
        assert_eq!(order, vec![1]);
    }

    #[test]
    fn sort_is_stable_in_both_directions() {
        let h = headers(&["K", "V"]);
        let rows = vec![
            srow(&[("K", "A"), ("V", "1")]),
            srow(&[("K", "B"), ("V", "1")]),
            srow(&[("K", "C"), ("V", "2")]),
        ];
        let asc = view_order(
            &h,
            &rows,
            &FilterSet::new(),
            Some(&SortSpec::ascending("V")),
        );
        assert_eq!(asc, vec![0, 1, 2]);
        let desc = view_order(
            &h,
            &rows,
            &FilterSet::new(),
            Some(&SortSpec {
                column: "V".to_string(),
                direction: Direction::Descending,
            }),
        );
        assert_eq!(desc, vec![2, 0, 1]);
    }

    #[test]
    fn numeric_cells_sort_numerically() {
        let h = headers(&["N"]);
        let rows = vec![
            Row::from([("N".to_string(), Value::Num(10.0))]),
            Row::from([("N".to_string(), Value::Num(2.0))]),
        ];
        let asc = view_order(&h, &rows, &FilterSet::new(), Some(&SortSpec::ascending("N")));
        assert_eq!(asc, vec![1, 0]);
    }

    #[test]
    fn missing_sorts_last_regardless_of_direction() {
        let h = headers(&["V"]);
        let mut gap = Row::new();
        gap.insert("V".to_string(), Value::Missing);
        let rows = vec![
            srow(&[("V", "b")]),
            gap,
            srow(&[("V", "a")]),
        ];
        let asc = view_order(&h, &rows, &FilterSet::new(), Some(&SortSpec::ascending("V")));
        assert_eq!(asc, vec![2, 0, 1]);
        let desc = view_order(
            &h,
            &rows,
            &FilterSet::new(),
            Some(&SortSpec {
                column: "V".to_string(),
                direction: Direction::Descending,
            }),
        );
        assert_eq!(desc, vec![0, 2, 1]);
    }

    #[test]
    fn unknown_sort_column_is_a_noop() {
        let (h, rows) = people();
        let order = view_order(
            &h,
            &rows,
            &FilterSet::new(),
            Some(&SortSpec::ascending("Salary")),
        );
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn toggle_flips_and_resets() {
        let first = SortSpec::toggle(None, "X");
        assert_eq!(first, SortSpec::ascending("X"));
        let second = SortSpec::toggle(Some(&first), "X");
        assert_eq!(second.direction, Direction::Descending);
        let third = SortSpec::toggle(Some(&second), "X");
        assert_eq!(third.direction, Direction::Ascending);
        let other = SortSpec::toggle(Some(&second), "Y");
        assert_eq!(other, SortSpec::ascending("Y"));
    }

    #[test]
    fn identical_inputs_derive_identical_output() {
        let (h, rows) = people();
        let f = filters(&[("Name", "n")]);
        let sort = SortSpec::ascending("Age");
        let first = view_order(&h, &rows, &f, Some(&sort));
        let second = view_order(&h, &rows, &f, Some(&sort));
        assert_eq!(first, second);
    }

    #[test]
    fn inputs_are_not_mutated() {
        let (h, rows) = people();
        let f = filters(&[("Name", "ann")]);
        let sort = SortSpec::ascending("Age");
        let rows_before = rows.clone();
        let f_before = f.clone();
        let _ = apply(&h, &rows, &f, Some(&sort));
        assert_eq!(rows, rows_before);
        assert_eq!(f, f_before);
    }

    #[test]
    fn end_to_end_scenario() {
        let (headers, rows) =
            crate::ingest::parse_csv("Name,Age\nAnn,30\nBob,25\n\"Smith, Jr\",40").unwrap();
        assert_eq!(headers, vec!["Name", "Age"]);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].get("Name"), Some(&Value::Str("Smith, Jr".into())));

        let filtered = view_order(&headers, &rows, &filters(&[("Name", "an")]), None);
        assert_eq!(filtered, vec![0]);

        let sorted = view_order(
            &headers,
            &rows,
            &FilterSet::new(),
            Some(&SortSpec {
                column: "Age".to_string(),
                direction: Direction::Descending,
            }),
        );
        assert_eq!(sorted, vec![2, 0, 1]);
    }
}
