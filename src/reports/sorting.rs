use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Column plus direction, as picked in a report header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortSpec<C> {
    pub column: C,
    pub direction: SortDirection,
}

impl<C: PartialEq + Copy> SortSpec<C> {
    pub fn new(column: C, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Header click: same column flips direction, another column starts
    /// descending.
    #[must_use]
    pub fn clicked(self, column: C) -> Self {
        if self.column == column {
            Self { column, direction: self.direction.toggled() }
        } else {
            Self { column, direction: SortDirection::Descending }
        }
    }
}

/// Cell value used for ordering.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue<'a> {
    Text(&'a str),
    Number(Option<f64>),
    Date(Option<DateTime<Utc>>),
}

pub trait Sortable {
    type Column: Copy;

    fn sort_value(&self, column: Self::Column) -> SortValue<'_>;
}

/// Stable sort of report rows. Missing values go last in both directions.
pub fn sort_rows<R: Sortable>(rows: &mut [R], spec: SortSpec<R::Column>) {
    rows.sort_by(|a, b| compare(&a.sort_value(spec.column), &b.sort_value(spec.column), spec.direction));
}

fn compare(a: &SortValue<'_>, b: &SortValue<'_>, direction: SortDirection) -> Ordering {
    let directed = |ordering: Ordering| match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    };
    match (a, b) {
        (SortValue::Text(a), SortValue::Text(b)) => directed(a.cmp(b)),
        (SortValue::Number(a), SortValue::Number(b)) => {
            missing_last(*a, *b, |a, b| directed(a.partial_cmp(&b).unwrap_or(Ordering::Equal)))
        }
        (SortValue::Date(a), SortValue::Date(b)) => missing_last(*a, *b, |a, b| directed(a.cmp(&b))),
        _ => Ordering::Equal,
    }
}

fn missing_last<T>(a: Option<T>, b: Option<T>, present: impl FnOnce(T, T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => present(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
