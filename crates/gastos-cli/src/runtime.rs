// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use gastos_app::{Expense, ExpensePage, QueryModel, SortDirection, SortField};
use gastos_client::Client;
use gastos_testkit::{ExpenseFaker, expense_categories};
use gastos_tui::{ExpenseSource, FetchEvent, FetchTicket, InternalEvent};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

const DEMO_SEED: u64 = 7;
const DEMO_WRITER_SEED: u64 = 99;
const DEMO_EXPENSE_COUNT: usize = 180;
const DEMO_WRITER_INTERVAL: Duration = Duration::from_secs(6);

pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ExpenseSource for HttpSource {
    fn fetch_page(&mut self, query: &QueryModel) -> Result<ExpensePage> {
        self.client.fetch_page(query)
    }

    fn categories(&mut self) -> Result<Vec<String>> {
        self.client.list_categories()
    }

    fn spawn_fetch(&mut self, ticket: FetchTicket, query: QueryModel, tx: Sender<InternalEvent>) {
        let client = self.client.clone();
        thread::spawn(move || {
            let event = match client.fetch_page(&query) {
                Ok(page) => FetchEvent::Completed {
                    ticket,
                    query,
                    page,
                },
                Err(error) => FetchEvent::Failed {
                    ticket,
                    query,
                    error: format!("{error:#}"),
                },
            };
            let _ = tx.send(InternalEvent::Fetch(event));
        });
    }
}

// In-memory ledger behind --demo; a writer thread keeps appending expenses
// and announcing new store versions.
pub struct MemorySource {
    store: Arc<Mutex<Vec<Expense>>>,
}

impl MemorySource {
    pub fn demo() -> Self {
        let mut faker = ExpenseFaker::new(DEMO_SEED);
        Self::with_expenses(faker.expenses(DEMO_EXPENSE_COUNT))
    }

    pub fn with_expenses(expenses: Vec<Expense>) -> Self {
        Self {
            store: Arc::new(Mutex::new(expenses)),
        }
    }
}

impl ExpenseSource for MemorySource {
    fn fetch_page(&mut self, query: &QueryModel) -> Result<ExpensePage> {
        let expenses = self
            .store
            .lock()
            .map_err(|_| anyhow!("demo store lock poisoned"))?;
        Ok(query_page(&expenses, query))
    }

    fn categories(&mut self) -> Result<Vec<String>> {
        Ok(expense_categories()
            .iter()
            .map(|category| (*category).to_owned())
            .collect())
    }

    fn register_invalidation_feed(&mut self, tx: Sender<InternalEvent>) {
        let store = Arc::clone(&self.store);
        thread::spawn(move || {
            let mut faker = ExpenseFaker::new(DEMO_WRITER_SEED);
            for version in 1_u64.. {
                thread::sleep(DEMO_WRITER_INTERVAL);
                let expense = faker.expense();
                if let Ok(mut expenses) = store.lock() {
                    expenses.push(expense);
                }
                let token = format!("v{version}");
                if tx.send(InternalEvent::StoreInvalidated { token }).is_err() {
                    break;
                }
            }
        });
    }
}

// Demo data is one shared ledger; the group filter has nothing to scope.
fn query_page(expenses: &[Expense], query: &QueryModel) -> ExpensePage {
    let needle = query.search.to_lowercase();
    let mut matched: Vec<&Expense> = expenses
        .iter()
        .filter(|expense| {
            (query.category.is_empty() || query.category.contains(&expense.category))
                && (needle.is_empty() || expense.title.to_lowercase().contains(&needle))
        })
        .collect();

    matched.sort_by(|a, b| {
        let ordering = match query.sort {
            SortField::Title => a.title.cmp(&b.title),
            SortField::Amount => a.amount_cents.cmp(&b.amount_cents),
            SortField::Category => a.category.cmp(&b.category),
            SortField::Date => a.date.cmp(&b.date),
        }
        .then_with(|| a.id.cmp(&b.id));
        match query.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    let total = matched.len() as u64;
    let per_page = query.per_page.max(1) as usize;
    let start = (query.page.max(1) as usize - 1).saturating_mul(per_page);
    let expenses = matched
        .into_iter()
        .skip(start)
        .take(per_page)
        .cloned()
        .collect();
    ExpensePage { expenses, total }
}
