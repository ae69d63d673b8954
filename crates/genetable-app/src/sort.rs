// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::{Column, ColumnKind, Dataset, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: Column,
    pub direction: SortDirection,
}

impl SortSpec {
    pub const fn ascending(column: Column) -> Self {
        Self {
            column,
            direction: SortDirection::Asc,
        }
    }

    /// Activating the current column flips it; any other column starts ascending.
    pub fn toggled(current: Option<Self>, column: Column) -> Self {
        match current {
            Some(spec) if spec.column == column => Self {
                column,
                direction: spec.direction.flipped(),
            },
            _ => Self::ascending(column),
        }
    }
}

pub fn compare_records(left: &Record, right: &Record, column: Column) -> Ordering {
    match column.kind() {
        ColumnKind::Number => {
            let left = left.number(column).unwrap_or_default();
            let right = right.number(column).unwrap_or_default();
            left.total_cmp(&right)
        }
        ColumnKind::Text => {
            let left = left.text(column).unwrap_or_default();
            let right = right.text(column).unwrap_or_default();
            left.cmp(right)
        }
    }
}

/// Stable in-place sort of `view`; `None` keeps filter order.
pub fn sort_view(dataset: &Dataset, view: &mut [usize], sort: Option<SortSpec>) {
    let Some(spec) = sort else {
        return;
    };
    let records = dataset.records();
    view.sort_by(|left, right| {
        let order = compare_records(&records[*left], &records[*right], spec.column);
        match spec.direction {
            SortDirection::Asc => order,
            SortDirection::Desc => order.reverse(),
        }
    });
}
