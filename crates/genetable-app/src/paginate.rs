// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::Serialize;
use std::ops::Range;

use crate::{Dataset, Record};

pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Pages kept on each side of the current page in the window.
const WINDOW_RADIUS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageWindowEntry {
    Page(usize),
    Ellipsis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    First,
    Prev,
    Next,
    Last,
    Goto(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a> {
    pub page: usize,
    pub total_pages: usize,
    pub total_rows: usize,
    /// Zero-based position of the first row within the whole view.
    pub offset: usize,
    pub rows: Vec<&'a Record>,
    pub window: Vec<PageWindowEntry>,
}

impl Page<'_> {
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Never less than one, so an empty view still has a page to show.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

pub fn page_bounds(len: usize, page_size: usize, page: usize) -> Range<usize> {
    let page_size = page_size.max(1);
    if page == 0 || page > total_pages(len, page_size) {
        return 0..0;
    }
    let start = ((page - 1) * page_size).min(len);
    let end = (start + page_size).min(len);
    start..end
}

pub fn page_window(current: usize, total: usize) -> Vec<PageWindowEntry> {
    let total = total.max(1);
    let current = current.clamp(1, total);

    let mut entries = vec![PageWindowEntry::Page(1)];
    if current > 5 {
        push_ellipsis(&mut entries);
    }
    let low = current.saturating_sub(WINDOW_RADIUS).max(2);
    let high = (current + WINDOW_RADIUS).min(total - 1);
    entries.extend((low..=high).map(PageWindowEntry::Page));
    if current + 4 < total {
        push_ellipsis(&mut entries);
    }
    if total > 1 {
        entries.push(PageWindowEntry::Page(total));
    }

    drop_gapless_ellipses(entries)
}

fn push_ellipsis(entries: &mut Vec<PageWindowEntry>) {
    if entries.last() != Some(&PageWindowEntry::Ellipsis) {
        entries.push(PageWindowEntry::Ellipsis);
    }
}

fn drop_gapless_ellipses(entries: Vec<PageWindowEntry>) -> Vec<PageWindowEntry> {
    let mut kept: Vec<PageWindowEntry> = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        if *entry == PageWindowEntry::Ellipsis {
            let before = match kept.last() {
                Some(PageWindowEntry::Page(page)) => Some(*page),
                _ => None,
            };
            let after = match entries.get(index + 1) {
                Some(PageWindowEntry::Page(page)) => Some(*page),
                _ => None,
            };
            match (before, after) {
                (Some(before), Some(after)) if after > before + 1 => kept.push(*entry),
                _ => {}
            }
            continue;
        }
        kept.push(*entry);
    }
    kept
}

/// Target page for `request`, or `None` when it would not move.
pub fn resolve_page_request(current: usize, total: usize, request: PageRequest) -> Option<usize> {
    let total = total.max(1);
    let current = current.clamp(1, total);
    let target = match request {
        PageRequest::First => 1,
        PageRequest::Prev => current.saturating_sub(1).max(1),
        PageRequest::Next => (current + 1).min(total),
        PageRequest::Last => total,
        PageRequest::Goto(page) => page.clamp(1, total),
    };
    (target != current).then_some(target)
}

pub fn paginate<'a>(
    dataset: &'a Dataset,
    view: &[usize],
    page_size: usize,
    page: usize,
) -> Page<'a> {
    let total_pages = total_pages(view.len(), page_size);
    let bounds = page_bounds(view.len(), page_size, page);
    let offset = bounds.start;
    let rows = view[bounds]
        .iter()
        .filter_map(|index| dataset.get(*index))
        .collect();
    Page {
        page,
        total_pages,
        total_rows: view.len(),
        offset,
        rows,
        window: page_window(page, total_pages),
    }
}
