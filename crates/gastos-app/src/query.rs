// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::model::{SortDirection, SortField};

pub const PER_PAGE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Ascend,
    Descend,
}

impl SortOrder {
    pub const fn direction(self) -> SortDirection {
        match self {
            Self::Ascend => SortDirection::Asc,
            Self::Descend => SortDirection::Desc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortChange {
    pub field: SortField,
    pub order: SortOrder,
}

// The complete widget state for one combined interaction, not a delta; an
// absent sort means cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableChange {
    pub page: u32,
    pub sort: Option<SortChange>,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryModel {
    pub sort: SortField,
    pub direction: SortDirection,
    pub page: u32,
    pub per_page: u32,
    pub search: String,
    pub category: Vec<String>,
    pub group_id: String,
}

impl Default for QueryModel {
    fn default() -> Self {
        Self {
            sort: SortField::Date,
            direction: SortDirection::Desc,
            page: 1,
            per_page: PER_PAGE,
            search: String::new(),
            category: Vec::new(),
            group_id: String::new(),
        }
    }
}

impl QueryModel {
    pub fn for_group(group_id: &str) -> Self {
        Self {
            group_id: group_id.to_owned(),
            ..Self::default()
        }
    }

    pub fn set_sort(&mut self, change: Option<SortChange>) {
        match change {
            Some(change) => {
                self.sort = change.field;
                self.direction = change.order.direction();
            }
            None => {
                self.sort = SortField::Date;
                self.direction = SortDirection::Desc;
            }
        }
    }

    pub fn set_category_filter(&mut self, values: Vec<String>) {
        self.category = values;
        self.page = 1;
    }

    pub fn set_search(&mut self, text: &str) {
        self.search = text.to_owned();
        self.page = 1;
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub fn apply_table_change(&mut self, change: &TableChange) {
        self.set_sort(change.sort);
        self.set_category_filter(change.categories.clone());
        // The page requested by the pagination control lands after the
        // filter reset.
        self.set_page(change.page);
    }
}
