// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use tracing::debug;

use crate::{
    Dataset, Page, Record, ViewCommand, ViewEvent, ViewState, filter_records, paginate, sort_view,
    total_pages,
};

/// Dataset plus the view state driving filter, sort, and pagination.
#[derive(Debug, Clone)]
pub struct Session {
    dataset: Dataset,
    state: ViewState,
    view: Vec<usize>,
    page_size: usize,
}

impl Session {
    pub fn new(dataset: Dataset, page_size: usize, preferred_group: Option<&str>) -> Self {
        let state = ViewState::new(dataset.default_group(preferred_group));
        let mut session = Self {
            dataset,
            state,
            view: Vec::new(),
            page_size: page_size.max(1),
        };
        session.rebuild_view();
        session
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn view_len(&self) -> usize {
        self.view.len()
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.view.len(), self.page_size)
    }

    pub fn view_records(&self) -> impl Iterator<Item = &Record> {
        self.view.iter().filter_map(|index| self.dataset.get(*index))
    }

    pub fn dispatch(&mut self, command: ViewCommand) -> Vec<ViewEvent> {
        let events = self.state.dispatch(command, self.total_pages());
        if events.iter().any(ViewEvent::invalidates_view) {
            self.rebuild_view();
        }
        events
    }

    /// Moves the group selection through `groups()` with wraparound.
    pub fn cycle_group(&mut self, delta: isize) -> Vec<ViewEvent> {
        let groups = self.dataset.groups();
        let current = groups
            .iter()
            .position(|group| *group == self.state.active_group)
            .unwrap_or(0) as isize;
        let len = groups.len() as isize;
        let next = (current + delta).rem_euclid(len.max(1)) as usize;
        match groups.get(next) {
            Some(group) => {
                let group = group.clone();
                self.dispatch(ViewCommand::SelectGroup(group))
            }
            None => Vec::new(),
        }
    }

    pub fn page(&self) -> Page<'_> {
        paginate(&self.dataset, &self.view, self.page_size, self.state.page)
    }

    fn rebuild_view(&mut self) {
        let mut view = filter_records(&self.dataset, &self.state.active_group, &self.state.search);
        sort_view(&self.dataset, &mut view, self.state.sort);
        debug!(
            group = %self.state.active_group,
            search = %self.state.search,
            sort = ?self.state.sort,
            rows = view.len(),
            "rebuilt view"
        );
        self.view = view;
    }
}

/// Outcome of acquiring the dataset. A failed load never yields a table.
#[derive(Debug)]
pub enum LoadState {
    Ready(Box<Session>),
    Failed(String),
}

impl LoadState {
    pub fn from_result(result: Result<Session>) -> Self {
        match result {
            Ok(session) => Self::Ready(Box::new(session)),
            Err(error) => Self::Failed(format!("{error:#}")),
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Ready(session) => Some(session.as_ref()),
            Self::Failed(_) => None,
        }
    }

    pub fn into_session(self) -> Result<Session> {
        match self {
            Self::Ready(session) => Ok(*session),
            Self::Failed(message) => Err(anyhow!("dataset unavailable: {message}")),
        }
    }
}
