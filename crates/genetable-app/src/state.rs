// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{ALL_GROUPS, Column, PageRequest, SortSpec, resolve_page_request};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub active_group: String,
    pub search: String,
    pub sort: Option<SortSpec>,
    pub page: usize,
}

impl ViewState {
    pub fn new(active_group: impl Into<String>) -> Self {
        Self {
            active_group: active_group.into(),
            search: String::new(),
            sort: None,
            page: 1,
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(ALL_GROUPS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCommand {
    SelectGroup(String),
    SetSearch(String),
    ActivateSort(Column),
    ClearSort,
    Page(PageRequest),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    GroupChanged(String),
    SearchChanged(String),
    SortChanged(Option<SortSpec>),
    PageChanged(usize),
}

impl ViewEvent {
    /// Whether the derived view must be rebuilt, not just re-paginated.
    pub fn invalidates_view(&self) -> bool {
        !matches!(self, Self::PageChanged(_))
    }
}

impl ViewState {
    /// `total_pages` describes the current derived view and only bounds page moves.
    pub fn dispatch(&mut self, command: ViewCommand, total_pages: usize) -> Vec<ViewEvent> {
        match command {
            ViewCommand::SelectGroup(group) => {
                if group == self.active_group {
                    return Vec::new();
                }
                self.active_group = group;
                self.with_page_reset(ViewEvent::GroupChanged(self.active_group.clone()))
            }
            ViewCommand::SetSearch(search) => {
                if search == self.search {
                    return Vec::new();
                }
                self.search = search;
                self.with_page_reset(ViewEvent::SearchChanged(self.search.clone()))
            }
            ViewCommand::ActivateSort(column) => {
                self.sort = Some(SortSpec::toggled(self.sort, column));
                self.with_page_reset(ViewEvent::SortChanged(self.sort))
            }
            ViewCommand::ClearSort => {
                if self.sort.is_none() {
                    return Vec::new();
                }
                self.sort = None;
                self.with_page_reset(ViewEvent::SortChanged(None))
            }
            ViewCommand::Page(request) => {
                match resolve_page_request(self.page, total_pages, request) {
                    Some(page) => {
                        self.page = page;
                        vec![ViewEvent::PageChanged(page)]
                    }
                    None => Vec::new(),
                }
            }
        }
    }

    fn with_page_reset(&mut self, event: ViewEvent) -> Vec<ViewEvent> {
        let mut events = vec![event];
        if self.page != 1 {
            self.page = 1;
            events.push(ViewEvent::PageChanged(1));
        }
        events
    }
}
