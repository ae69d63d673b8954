// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::{ALL_GROUPS, Record};

/// The loaded record set. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    records: Vec<Record>,
    groups: Vec<String>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        let groups = ordered_groups(&records);
        Self { records, groups }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct group keys plus the `All` sentinel, in display order.
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn contains_group(&self, group: &str) -> bool {
        self.groups.iter().any(|candidate| candidate == group)
    }

    pub fn group_len(&self, group: &str) -> usize {
        if group == ALL_GROUPS {
            return self.records.len();
        }
        self.records
            .iter()
            .filter(|record| record.chromosome == group)
            .count()
    }

    /// Startup selection: `preferred` when present, else the first real group.
    pub fn default_group(&self, preferred: Option<&str>) -> &str {
        if let Some(preferred) = preferred
            && let Some(group) = self.groups.iter().find(|group| *group == preferred)
        {
            return group;
        }
        self.groups
            .iter()
            .find(|group| *group != ALL_GROUPS)
            .map_or(ALL_GROUPS, String::as_str)
    }
}

fn ordered_groups(records: &[Record]) -> Vec<String> {
    let distinct: BTreeSet<&str> = records
        .iter()
        .map(|record| record.chromosome.as_str())
        .chain(std::iter::once(ALL_GROUPS))
        .collect();
    let mut groups: Vec<String> = distinct.into_iter().map(str::to_owned).collect();
    groups.sort_by(|left, right| compare_group_keys(left, right));
    groups
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum GroupClass {
    Numeric(u64),
    Other,
    X,
    Y,
    Mitochondrial,
    Sentinel,
}

fn strip_chr_prefix(key: &str) -> &str {
    match key.get(..3) {
        Some(prefix) if key.len() > 3 && prefix.eq_ignore_ascii_case("chr") => &key[3..],
        _ => key,
    }
}

fn classify(key: &str) -> (GroupClass, &str) {
    if key == ALL_GROUPS {
        return (GroupClass::Sentinel, key);
    }
    let bare = strip_chr_prefix(key);
    let class = if !bare.is_empty() && bare.bytes().all(|byte| byte.is_ascii_digit()) {
        bare.parse().map_or(GroupClass::Other, GroupClass::Numeric)
    } else if bare == "X" {
        GroupClass::X
    } else if bare == "Y" {
        GroupClass::Y
    } else if bare.to_uppercase().starts_with('M') {
        GroupClass::Mitochondrial
    } else {
        GroupClass::Other
    };
    (class, bare)
}

fn case_folded(key: &str) -> impl Iterator<Item = char> + '_ {
    key.chars().flat_map(char::to_lowercase)
}

/// Chromosome-aware key order: numeric keys by value, then other names
/// ignoring case, then X, Y, mitochondrial keys, and the `All` sentinel last.
pub fn compare_group_keys(left: &str, right: &str) -> Ordering {
    let (left_class, left_bare) = classify(left);
    let (right_class, right_bare) = classify(right);
    left_class
        .cmp(&right_class)
        .then_with(|| case_folded(left_bare).cmp(case_folded(right_bare)))
        .then_with(|| left_bare.cmp(right_bare))
        .then_with(|| left.cmp(right))
}

#[cfg(test)]
mod tests {
    use super::{Dataset, compare_group_keys};
    use crate::ALL_GROUPS;
    use crate::fixtures::{gene, small_dataset};

    fn sorted(keys: &[&str]) -> Vec<String> {
        let mut keys: Vec<String> = keys.iter().map(|key| (*key).to_owned()).collect();
        keys.sort_by(|left, right| compare_group_keys(left, right));
        keys
    }

    #[test]
    fn bare_keys_sort_numerically_then_sex_then_mito_then_all() {
        assert_eq!(
            sorted(&["10", "2", "X", "Y", "M", "All"]),
            vec!["2", "10", "X", "Y", "M", "All"]
        );
    }

    #[test]
    fn chr_prefixed_keys_sort_by_numeric_suffix() {
        assert_eq!(
            sorted(&["chrM", "All", "chrY", "chr10", "chrX", "chr2"]),
            vec!["chr2", "chr10", "chrX", "chrY", "chrM", "All"]
        );
    }

    #[test]
    fn other_names_ignore_case_with_byte_order_tiebreak() {
        assert_eq!(
            sorted(&["Un", "alt", "KI270728", "gl000220", "ALT"]),
            vec!["ALT", "alt", "gl000220", "KI270728", "Un"]
        );
    }

    #[test]
    fn unplaced_names_sit_between_numbers_and_x() {
        assert_eq!(
            sorted(&["MT", "Un", "X", "1", "GL000220", "All", "22"]),
            vec!["1", "22", "GL000220", "Un", "X", "MT", "All"]
        );
    }

    #[test]
    fn sex_chromosome_match_is_case_sensitive() {
        assert_eq!(sorted(&["x", "X", "3"]), vec!["3", "x", "X"]);
    }

    #[test]
    fn groups_are_distinct_and_end_with_sentinel() {
        let dataset = small_dataset();
        assert_eq!(
            dataset.groups(),
            ["chr1", "chr2", "chr17", "chrX", "chrM", "All"]
        );
    }

    #[test]
    fn empty_dataset_only_offers_sentinel() {
        let dataset = Dataset::new(Vec::new());
        assert_eq!(dataset.groups(), [ALL_GROUPS]);
        assert_eq!(dataset.default_group(None), ALL_GROUPS);
    }

    #[test]
    fn default_group_prefers_configured_value_when_present() {
        let dataset = small_dataset();
        assert_eq!(dataset.default_group(Some("chr17")), "chr17");
        assert_eq!(dataset.default_group(Some("chr99")), "chr1");
        assert_eq!(dataset.default_group(None), "chr1");
    }

    #[test]
    fn group_len_counts_members() {
        let dataset = small_dataset();
        assert_eq!(dataset.group_len("chr1"), 3);
        assert_eq!(dataset.group_len("chr9"), 0);
        assert_eq!(dataset.group_len(ALL_GROUPS), dataset.len());
    }

    #[test]
    fn records_keep_input_order() {
        let dataset = Dataset::new(vec![
            gene("2", "B", "b", 1.0),
            gene("1", "A", "a", 1.0),
        ]);
        assert_eq!(dataset.records()[0].gene_id, "B");
        assert_eq!(dataset.get(1).map(|record| record.gene_id.as_str()), Some("A"));
        assert!(dataset.contains_group("1"));
        assert!(!dataset.contains_group("3"));
    }
}
