// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{ALL_GROUPS, Column, Dataset, Record};

pub fn matches_group(record: &Record, active_group: &str) -> bool {
    active_group == ALL_GROUPS || record.chromosome == active_group
}

/// `needle` must already be lowercased; empty matches everything.
pub fn matches_search(record: &Record, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    Column::SEARCHABLE.into_iter().any(|column| {
        record
            .text(column)
            .is_some_and(|value| value.to_lowercase().contains(needle))
    })
}

/// Indices of matching records, in dataset order.
pub fn filter_records(dataset: &Dataset, active_group: &str, search: &str) -> Vec<usize> {
    let needle = search.to_lowercase();
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, record)| matches_group(record, active_group) && matches_search(record, &needle))
        .map(|(index, _)| index)
        .collect()
}
