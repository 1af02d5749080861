// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::model::{Expense, ExpenseId, ExpensePage};
use crate::query::{QueryModel, SortChange, TableChange};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayState {
    pub loading: bool,
    pub expenses: Vec<Expense>,
    pub total: u64,
    pub expanded_id: Option<ExpenseId>,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            loading: true,
            expenses: Vec::new(),
            // A total of 1 keeps the footer at one page before the first
            // fetch resolves.
            total: 1,
            expanded_id: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseTable {
    pub query: QueryModel,
    pub display: DisplayState,
}

impl ExpenseTable {
    pub fn for_group(group_id: &str) -> Self {
        Self {
            query: QueryModel::for_group(group_id),
            display: DisplayState::default(),
        }
    }

    pub fn apply_sort(&mut self, change: Option<SortChange>) -> QueryModel {
        self.display.expanded_id = None;
        self.query.set_sort(change);
        self.query.clone()
    }

    pub fn apply_category_filter(&mut self, values: Vec<String>) -> QueryModel {
        self.display.expanded_id = None;
        self.query.set_category_filter(values);
        self.query.clone()
    }

    // Refetches on every change with no debounce; callers wanting one wrap
    // this call.
    pub fn apply_search(&mut self, text: &str) -> QueryModel {
        self.query.set_search(text);
        self.query.clone()
    }

    pub fn apply_page(&mut self, page: u32) -> QueryModel {
        self.query.set_page(page);
        self.query.clone()
    }

    pub fn apply_table_change(&mut self, change: &TableChange) -> QueryModel {
        self.display.expanded_id = None;
        self.query.apply_table_change(change);
        self.query.clone()
    }

    pub fn toggle_expanded(&mut self, id: Option<&ExpenseId>) {
        match id {
            Some(id) if self.display.expanded_id.as_ref() != Some(id) => {
                self.display.expanded_id = Some(id.clone());
            }
            _ => self.display.expanded_id = None,
        }
    }

    pub fn expanded_expense(&self) -> Option<&Expense> {
        let id = self.display.expanded_id.as_ref()?;
        self.display.expenses.iter().find(|expense| &expense.id == id)
    }

    pub fn begin_fetch(&mut self) {
        self.display.loading = true;
    }

    pub fn complete_fetch(&mut self, page: ExpensePage) {
        self.display.loading = false;
        self.display.expenses = page.expenses;
        self.display.total = page.total;
    }
}

// Detaching cancels nothing; continuations read false and drop their writes.
#[derive(Debug, Clone)]
pub struct AttachmentToken {
    attached: Arc<AtomicBool>,
}

impl AttachmentToken {
    pub fn attached() -> Self {
        Self {
            attached: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }

    pub fn detach(&self) {
        self.attached.store(false, Ordering::SeqCst);
    }
}

impl Default for AttachmentToken {
    fn default() -> Self {
        Self::attached()
    }
}

// Nothing is cached at first, so the first token published counts as a
// change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateWatcher {
    seen: Option<String>,
}

impl UpdateWatcher {
    pub fn observe(&mut self, token: &str) -> bool {
        if self.seen.as_deref() == Some(token) {
            return false;
        }
        self.seen = Some(token.to_owned());
        true
    }

    pub fn last(&self) -> Option<&str> {
        self.seen.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::{AttachmentToken, DisplayState, ExpenseTable, UpdateWatcher};
    use crate::model::{Expense, ExpenseId, ExpensePage, SortField};
    use crate::query::{QueryModel, SortChange, SortOrder};
    use time::{Date, Month};

    fn expense(id: &str) -> Expense {
        Expense {
            id: ExpenseId::new(id),
            title: format!("Expense {id}"),
            amount_cents: 1_250,
            category: "Food".to_owned(),
            date: Date::from_calendar_date(2026, Month::June, 1).expect("valid date"),
        }
    }

    fn page_of(ids: &[&str]) -> ExpensePage {
        ExpensePage {
            expenses: ids.iter().map(|id| expense(id)).collect(),
            total: ids.len() as u64,
        }
    }

    #[test]
    fn display_defaults_to_a_loading_single_page() {
        let display = DisplayState::default();
        assert!(display.loading);
        assert!(display.expenses.is_empty());
        assert_eq!(display.total, 1);
        assert_eq!(display.expanded_id, None);
    }

    #[test]
    fn sort_and_filter_changes_collapse_the_detail_row() {
        let mut table = ExpenseTable::default();
        table.complete_fetch(page_of(&["a", "b"]));

        table.toggle_expanded(Some(&ExpenseId::new("a")));
        table.apply_sort(Some(SortChange {
            field: SortField::Amount,
            order: SortOrder::Ascend,
        }));
        assert_eq!(table.display.expanded_id, None);

        table.toggle_expanded(Some(&ExpenseId::new("b")));
        table.apply_category_filter(vec!["Food".to_owned()]);
        assert_eq!(table.display.expanded_id, None);
    }

    #[test]
    fn search_and_page_changes_keep_the_detail_row() {
        let mut table = ExpenseTable::default();
        table.complete_fetch(page_of(&["a"]));
        table.toggle_expanded(Some(&ExpenseId::new("a")));

        table.apply_search("coffee");
        assert_eq!(table.display.expanded_id, Some(ExpenseId::new("a")));

        table.apply_page(2);
        assert_eq!(table.display.expanded_id, Some(ExpenseId::new("a")));
    }

    #[test]
    fn expanding_a_second_row_collapses_the_first() {
        let mut table = ExpenseTable::default();
        table.toggle_expanded(Some(&ExpenseId::new("x")));
        table.toggle_expanded(Some(&ExpenseId::new("y")));
        assert_eq!(table.display.expanded_id, Some(ExpenseId::new("y")));
    }

    #[test]
    fn toggling_the_expanded_row_collapses_it() {
        let mut table = ExpenseTable::default();
        table.toggle_expanded(Some(&ExpenseId::new("x")));
        table.toggle_expanded(Some(&ExpenseId::new("x")));
        assert_eq!(table.display.expanded_id, None);

        table.toggle_expanded(Some(&ExpenseId::new("x")));
        table.toggle_expanded(None);
        assert_eq!(table.display.expanded_id, None);
    }

    #[test]
    fn search_after_paging_lands_on_the_first_page() {
        let mut table = ExpenseTable::default();
        table.apply_page(3);
        let query = table.apply_search("coffee");
        assert_eq!(
            query,
            QueryModel {
                search: "coffee".to_owned(),
                ..QueryModel::default()
            }
        );
    }

    #[test]
    fn complete_fetch_replaces_the_page_wholesale() {
        let mut table = ExpenseTable::default();
        table.complete_fetch(page_of(&["a"]));
        table.toggle_expanded(Some(&ExpenseId::new("a")));

        table.begin_fetch();
        assert!(table.display.loading);

        let mut page = page_of(&["b", "c"]);
        page.total = 240;
        table.complete_fetch(page);
        assert!(!table.display.loading);
        assert_eq!(table.display.expenses.len(), 2);
        assert_eq!(table.display.total, 240);
        // The expanded id survives even though the row is gone.
        assert_eq!(table.display.expanded_id, Some(ExpenseId::new("a")));
        assert!(table.expanded_expense().is_none());
    }

    #[test]
    fn expanded_expense_reads_from_the_fetched_rows() {
        let mut table = ExpenseTable::default();
        table.complete_fetch(page_of(&["a", "b"]));
        table.toggle_expanded(Some(&ExpenseId::new("b")));
        let expanded = table.expanded_expense().expect("row present");
        assert_eq!(expanded.id, ExpenseId::new("b"));
    }

    #[test]
    fn detaching_one_clone_detaches_them_all() {
        let token = AttachmentToken::attached();
        let continuation = token.clone();
        assert!(continuation.is_attached());

        token.detach();
        assert!(!continuation.is_attached());

        token.detach();
        assert!(!token.is_attached());
    }

    #[test]
    fn first_published_token_counts_as_a_change() {
        let mut watcher = UpdateWatcher::default();
        assert!(watcher.observe("a"));
        assert!(!watcher.observe("a"));
        assert!(watcher.observe("b"));
        assert_eq!(watcher.last(), Some("b"));
    }
}
