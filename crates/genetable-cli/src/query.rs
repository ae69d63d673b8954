// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use genetable_app::{
    Column, PageRequest, PageWindowEntry, Record, Session, SortSpec, ViewCommand,
};
use serde::Serialize;

/// View selection given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    pub group: Option<String>,
    pub search: Option<String>,
    pub sort: Option<Column>,
    pub descending: bool,
    pub page: Option<usize>,
}

impl QueryOptions {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Serialize)]
pub struct QueryOutput<'a> {
    pub group: &'a str,
    pub search: &'a str,
    pub sort: Option<SortSpec>,
    pub page: usize,
    pub total_pages: usize,
    pub total_rows: usize,
    pub page_size: usize,
    pub window: Vec<PageWindowEntry>,
    pub groups: &'a [String],
    pub rows: Vec<&'a Record>,
}

pub fn apply_query(session: &mut Session, query: &QueryOptions) -> Result<()> {
    if let Some(group) = &query.group {
        if !session.dataset().contains_group(group) {
            bail!(
                "unknown group {group:?}; available groups: {}",
                session.dataset().groups().join(", ")
            );
        }
        session.dispatch(ViewCommand::SelectGroup(group.clone()));
    }

    if let Some(search) = &query.search {
        session.dispatch(ViewCommand::SetSearch(search.clone()));
    }

    if let Some(column) = query.sort {
        session.dispatch(ViewCommand::ActivateSort(column));
        if query.descending {
            session.dispatch(ViewCommand::ActivateSort(column));
        }
    }

    if let Some(page) = query.page {
        session.dispatch(ViewCommand::Page(PageRequest::Goto(page)));
    }
    Ok(())
}

pub fn query_output(session: &Session) -> QueryOutput<'_> {
    let state = session.state();
    let page = session.page();
    QueryOutput {
        group: &state.active_group,
        search: &state.search,
        sort: state.sort,
        page: page.page,
        total_pages: page.total_pages,
        total_rows: page.total_rows,
        page_size: session.page_size(),
        window: page.window,
        groups: session.dataset().groups(),
        rows: page.rows,
    }
}
