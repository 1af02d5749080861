// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use gastos_app::{
    AttachmentToken, ColumnDescriptor, Expense, ExpenseId, ExpensePage, ExpenseTable, QueryModel,
    SortChange, SortDirection, SortField, SortOrder, TableChange, UpdateWatcher, column_schema,
};
use log::{debug, warn};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::Date;

const FILTER_MARK_ACTIVE: &str = "▼";
const SORT_ARROW_ASC: &str = " ↑";
const SORT_ARROW_DESC: &str = " ↓";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionOptions {
    pub group_id: String,
    // Off by default: whichever result resolves last wins.
    pub discard_stale: bool,
}

#[derive(Debug, Clone)]
pub struct FetchTicket {
    request_id: u64,
    lifecycle: AttachmentToken,
}

impl FetchTicket {
    pub fn new(request_id: u64, lifecycle: AttachmentToken) -> Self {
        Self {
            request_id,
            lifecycle,
        }
    }

    pub const fn request_id(&self) -> u64 {
        self.request_id
    }

    pub fn is_attached(&self) -> bool {
        self.lifecycle.is_attached()
    }
}

#[derive(Debug, Clone)]
pub enum FetchEvent {
    Completed {
        ticket: FetchTicket,
        query: QueryModel,
        page: ExpensePage,
    },
    Failed {
        ticket: FetchTicket,
        query: QueryModel,
        error: String,
    },
}

impl FetchEvent {
    pub const fn request_id(&self) -> u64 {
        match self {
            Self::Completed { ticket, .. } | Self::Failed { ticket, .. } => ticket.request_id,
        }
    }
}

#[derive(Debug, Clone)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
    Fetch(FetchEvent),
    StoreInvalidated { token: String },
}

pub trait ExpenseSource {
    fn fetch_page(&mut self, query: &QueryModel) -> Result<ExpensePage>;

    // Fetched once at attachment by the caller; the view never asks again.
    fn categories(&mut self) -> Result<Vec<String>>;

    // Sources that can observe writes made elsewhere keep `tx` and publish a
    // fresh token per write.
    fn register_invalidation_feed(&mut self, tx: Sender<InternalEvent>) {
        let _ = tx;
    }

    fn spawn_fetch(&mut self, ticket: FetchTicket, query: QueryModel, tx: Sender<InternalEvent>) {
        let event = match self.fetch_page(&query) {
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
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct SearchUiState {
    active: bool,
    text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct FilterUiState {
    visible: bool,
    cursor: usize,
    picked: Vec<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct EditFormState {
    visible: bool,
    target: Option<ExpenseId>,
}

#[derive(Debug, Clone)]
struct ViewData {
    options: SessionOptions,
    table: ExpenseTable,
    lifecycle: AttachmentToken,
    watcher: UpdateWatcher,
    categories: Vec<String>,
    sort_ui: Option<SortChange>,
    selected_row: usize,
    selected_col: usize,
    search: SearchUiState,
    filter: FilterUiState,
    edit_form: EditFormState,
    help_visible: bool,
    status_line: Option<String>,
    status_token: u64,
    next_request_id: u64,
    newest_request_id: u64,
}

impl ViewData {
    fn new(options: SessionOptions, categories: Vec<String>) -> Self {
        Self {
            table: ExpenseTable::for_group(&options.group_id),
            options,
            lifecycle: AttachmentToken::attached(),
            watcher: UpdateWatcher::default(),
            categories,
            sort_ui: None,
            selected_row: 0,
            selected_col: 0,
            search: SearchUiState::default(),
            filter: FilterUiState::default(),
            edit_form: EditFormState::default(),
            help_visible: false,
            status_line: None,
            status_token: 0,
            next_request_id: 0,
            newest_request_id: 0,
        }
    }
}

pub fn run_app<S: ExpenseSource>(
    options: SessionOptions,
    categories: Vec<String>,
    source: &mut S,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::new(options, categories);
    let (internal_tx, internal_rx) = mpsc::channel();

    source.register_invalidation_feed(internal_tx.clone());

    let initial = view_data.table.query.clone();
    debug!("attached expenses view for group {:?}", initial.group_id);
    issue_fetch(&mut view_data, source, &internal_tx, initial);

    let mut result = Ok(());
    loop {
        process_internal_events(&mut view_data, source, &internal_tx, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(&mut view_data, source, &internal_tx, key) {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    // Outstanding fetches keep running; the detached token makes their
    // continuations drop the results.
    view_data.lifecycle.detach();
    debug!("detached expenses view");

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events<S: ExpenseSource>(
    view_data: &mut ViewData,
    source: &mut S,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                view_data.status_line = None;
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::Fetch(event) => apply_fetch_event(view_data, event),
            InternalEvent::StoreInvalidated { token } => {
                if !view_data.lifecycle.is_attached() {
                    continue;
                }
                if view_data.watcher.observe(&token) {
                    let query = view_data.table.query.clone();
                    issue_fetch(view_data, source, tx, query);
                }
            }
        }
    }
}

fn issue_fetch<S: ExpenseSource>(
    view_data: &mut ViewData,
    source: &mut S,
    tx: &Sender<InternalEvent>,
    query: QueryModel,
) {
    view_data.table.begin_fetch();
    let request_id = allocate_request_id(view_data);
    view_data.newest_request_id = request_id;
    debug!(
        "fetch {request_id}: page {} sort {} {} search {:?}",
        query.page,
        query.sort.as_str(),
        query.direction.as_str(),
        query.search,
    );
    let ticket = FetchTicket::new(request_id, view_data.lifecycle.clone());
    source.spawn_fetch(ticket, query, tx.clone());
}

fn allocate_request_id(view_data: &mut ViewData) -> u64 {
    view_data.next_request_id = view_data.next_request_id.saturating_add(1);
    if view_data.next_request_id == 0 {
        view_data.next_request_id = 1;
    }
    view_data.next_request_id
}

fn apply_fetch_event(view_data: &mut ViewData, event: FetchEvent) {
    match event {
        FetchEvent::Completed {
            ticket,
            query,
            page,
        } => {
            if !ticket.is_attached() {
                debug!("fetch {} resolved after detach", ticket.request_id());
                return;
            }
            if view_data.options.discard_stale && ticket.request_id() != view_data.newest_request_id
            {
                debug!(
                    "fetch {} discarded: newest is {}",
                    ticket.request_id(),
                    view_data.newest_request_id,
                );
                return;
            }
            debug!(
                "fetch {} resolved: {} rows of {} (page {})",
                ticket.request_id(),
                page.expenses.len(),
                page.total,
                query.page,
            );
            view_data.table.complete_fetch(page);
            clamp_selection(view_data);
        }
        FetchEvent::Failed {
            ticket,
            query,
            error,
        } => {
            if !ticket.is_attached() {
                return;
            }
            // The failure path does not clear the loading flag and surfaces
            // no error state; the attempt is only logged.
            warn!(
                "fetch {} failed (page {}): {error}",
                ticket.request_id(),
                query.page,
            );
        }
    }
}

fn clamp_selection(view_data: &mut ViewData) {
    let rows = view_data.table.display.expenses.len();
    view_data.selected_row = view_data.selected_row.min(rows.saturating_sub(1));
}

fn handle_key_event<S: ExpenseSource>(
    view_data: &mut ViewData,
    source: &mut S,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }
    if view_data.help_visible {
        view_data.help_visible = false;
        return false;
    }
    if view_data.search.active {
        handle_search_key(view_data, source, internal_tx, key);
        return false;
    }
    if view_data.filter.visible {
        handle_filter_key(view_data, source, internal_tx, key);
        return false;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) => return true,
        (KeyCode::Char('?'), _) => view_data.help_visible = true,
        (KeyCode::Char('e'), KeyModifiers::NONE) => remember_edit_target(view_data),
        _ => {
            if let Some(command) = table_command_for_key(key) {
                match apply_table_command(view_data, command) {
                    TableEvent::CursorUpdated => {}
                    TableEvent::Status(status) => {
                        emit_status(view_data, internal_tx, status.message());
                    }
                    TableEvent::QueryChanged { query, status } => {
                        emit_status(view_data, internal_tx, status.message());
                        issue_fetch(view_data, source, internal_tx, query);
                    }
                }
            }
        }
    }
    false
}

fn handle_search_key<S: ExpenseSource>(
    view_data: &mut ViewData,
    source: &mut S,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => view_data.search.active = false,
        KeyCode::Backspace => {
            if view_data.search.text.pop().is_some() {
                let query = view_data.table.apply_search(&view_data.search.text);
                issue_fetch(view_data, source, internal_tx, query);
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            view_data.search.text.push(c);
            // Every keystroke refetches; there is no debounce here. Callers
            // wanting one must wrap the search transition.
            let query = view_data.table.apply_search(&view_data.search.text);
            issue_fetch(view_data, source, internal_tx, query);
        }
        _ => {}
    }
}

fn handle_filter_key<S: ExpenseSource>(
    view_data: &mut ViewData,
    source: &mut S,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc => view_data.filter.visible = false,
        KeyCode::Char('j') | KeyCode::Down => {
            let last = view_data.categories.len().saturating_sub(1);
            view_data.filter.cursor = (view_data.filter.cursor + 1).min(last);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            view_data.filter.cursor = view_data.filter.cursor.saturating_sub(1);
        }
        KeyCode::Char(' ') => {
            let cursor = view_data.filter.cursor;
            if let Some(flag) = view_data.filter.picked.get_mut(cursor) {
                *flag = !*flag;
            }
        }
        KeyCode::Enter => apply_filter_picker(view_data, source, internal_tx),
        _ => {}
    }
}

fn remember_edit_target(view_data: &mut ViewData) {
    // TODO: surface the edit form once an update flow exists; today only the
    // target row is tracked and the form stays closed.
    view_data.edit_form.target = view_data
        .table
        .display
        .expenses
        .get(view_data.selected_row)
        .map(|expense| expense.id.clone());
}

fn open_filter_picker(view_data: &mut ViewData) {
    view_data.filter.picked = view_data
        .categories
        .iter()
        .map(|category| view_data.table.query.category.contains(category))
        .collect();
    view_data.filter.cursor = 0;
    view_data.filter.visible = true;
}

fn apply_filter_picker<S: ExpenseSource>(
    view_data: &mut ViewData,
    source: &mut S,
    internal_tx: &Sender<InternalEvent>,
) {
    let selected: Vec<String> = view_data
        .categories
        .iter()
        .zip(&view_data.filter.picked)
        .filter(|(_, picked)| **picked)
        .map(|(category, _)| category.clone())
        .collect();
    view_data.filter.visible = false;

    // The picker reports the whole widget state in one combined event, the
    // same shape a pagination/sort/filter callback would deliver.
    let count = selected.len();
    let change = TableChange {
        page: 1,
        sort: view_data.sort_ui,
        categories: selected,
    };
    let query = view_data.table.apply_table_change(&change);
    let status = if count == 0 {
        TableStatus::FilterCleared
    } else {
        TableStatus::FilterApplied(count)
    };
    emit_status(view_data, internal_tx, status.message());
    issue_fetch(view_data, source, internal_tx, query);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableCommand {
    MoveRow(isize),
    MoveColumn(isize),
    JumpFirstRow,
    JumpLastRow,
    CycleSort,
    ClearSort,
    NextPage,
    PreviousPage,
    ToggleExpand,
    OpenFilter,
    OpenSearch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TableStatus {
    SortAsc(&'static str),
    SortDesc(&'static str),
    SortCleared,
    PageChanged { page: u32, pages: u32 },
    AlreadyFirstPage,
    AlreadyLastPage,
    FilterApplied(usize),
    FilterCleared,
    FilterOpen,
    SearchOpen,
}

impl TableStatus {
    fn message(self) -> String {
        match self {
            Self::SortAsc(column) => format!("sort {column} asc"),
            Self::SortDesc(column) => format!("sort {column} desc"),
            Self::SortCleared => "sort cleared".to_owned(),
            Self::PageChanged { page, pages } => format!("page {page} of {pages}"),
            Self::AlreadyFirstPage => "already on the first page".to_owned(),
            Self::AlreadyLastPage => "already on the last page".to_owned(),
            Self::FilterApplied(count) => format!("category filter: {count} selected"),
            Self::FilterCleared => "category filter cleared".to_owned(),
            Self::FilterOpen => "category picker open".to_owned(),
            Self::SearchOpen => "search open".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum TableEvent {
    CursorUpdated,
    Status(TableStatus),
    QueryChanged {
        query: QueryModel,
        status: TableStatus,
    },
}

fn table_command_for_key(key: KeyEvent) -> Option<TableCommand> {
    match (key.code, key.modifiers) {
        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(TableCommand::MoveRow(1)),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(TableCommand::MoveRow(-1)),
        (KeyCode::Char('h'), _) | (KeyCode::Left, _) => Some(TableCommand::MoveColumn(-1)),
        (KeyCode::Char('l'), _) | (KeyCode::Right, _) => Some(TableCommand::MoveColumn(1)),
        (KeyCode::Char('g'), _) => Some(TableCommand::JumpFirstRow),
        (KeyCode::Char('G'), _) => Some(TableCommand::JumpLastRow),
        (KeyCode::Char('s'), KeyModifiers::NONE) => Some(TableCommand::CycleSort),
        (KeyCode::Char('S'), _) => Some(TableCommand::ClearSort),
        (KeyCode::Char('n'), KeyModifiers::NONE) | (KeyCode::Char(']'), _) => {
            Some(TableCommand::NextPage)
        }
        (KeyCode::Char('p'), KeyModifiers::NONE) | (KeyCode::Char('['), _) => {
            Some(TableCommand::PreviousPage)
        }
        (KeyCode::Char('f'), KeyModifiers::NONE) => Some(TableCommand::OpenFilter),
        (KeyCode::Char('/'), _) => Some(TableCommand::OpenSearch),
        (KeyCode::Enter, _) => Some(TableCommand::ToggleExpand),
        _ => None,
    }
}

fn apply_table_command(view_data: &mut ViewData, command: TableCommand) -> TableEvent {
    match command {
        TableCommand::MoveRow(delta) => {
            move_row(view_data, delta);
            TableEvent::CursorUpdated
        }
        TableCommand::MoveColumn(delta) => {
            move_col(view_data, delta);
            TableEvent::CursorUpdated
        }
        TableCommand::JumpFirstRow => {
            view_data.selected_row = 0;
            TableEvent::CursorUpdated
        }
        TableCommand::JumpLastRow => {
            view_data.selected_row = view_data.table.display.expenses.len().saturating_sub(1);
            TableEvent::CursorUpdated
        }
        TableCommand::CycleSort => cycle_sort(view_data),
        TableCommand::ClearSort => {
            if view_data.sort_ui.is_none() {
                return TableEvent::Status(TableStatus::SortCleared);
            }
            view_data.sort_ui = None;
            let query = view_data.table.apply_sort(None);
            TableEvent::QueryChanged {
                query,
                status: TableStatus::SortCleared,
            }
        }
        TableCommand::NextPage => change_page(view_data, 1),
        TableCommand::PreviousPage => change_page(view_data, -1),
        TableCommand::ToggleExpand => {
            toggle_expansion(view_data);
            TableEvent::CursorUpdated
        }
        TableCommand::OpenFilter => {
            open_filter_picker(view_data);
            TableEvent::Status(TableStatus::FilterOpen)
        }
        TableCommand::OpenSearch => {
            view_data.search.active = true;
            TableEvent::Status(TableStatus::SearchOpen)
        }
    }
}

fn cycle_sort(view_data: &mut ViewData) -> TableEvent {
    let Some(&field) = SortField::ALL.get(view_data.selected_col) else {
        return TableEvent::CursorUpdated;
    };
    let next = match view_data.sort_ui {
        Some(current) if current.field == field => match current.order {
            SortOrder::Ascend => Some(SortChange {
                field,
                order: SortOrder::Descend,
            }),
            SortOrder::Descend => None,
        },
        _ => Some(SortChange {
            field,
            order: SortOrder::Ascend,
        }),
    };
    view_data.sort_ui = next;
    let query = view_data.table.apply_sort(next);
    let status = match next {
        Some(SortChange {
            order: SortOrder::Ascend,
            ..
        }) => TableStatus::SortAsc(field.label()),
        Some(SortChange {
            order: SortOrder::Descend,
            ..
        }) => TableStatus::SortDesc(field.label()),
        None => TableStatus::SortCleared,
    };
    TableEvent::QueryChanged { query, status }
}

fn change_page(view_data: &mut ViewData, delta: i32) -> TableEvent {
    let pages = page_count(
        view_data.table.display.total,
        view_data.table.query.per_page,
    );
    let current = view_data.table.query.page;
    if delta > 0 && current >= pages {
        return TableEvent::Status(TableStatus::AlreadyLastPage);
    }
    if delta < 0 && current <= 1 {
        return TableEvent::Status(TableStatus::AlreadyFirstPage);
    }
    let target = if delta > 0 {
        current.saturating_add(1)
    } else {
        current.saturating_sub(1)
    };
    let query = view_data.table.apply_page(target);
    TableEvent::QueryChanged {
        query,
        status: TableStatus::PageChanged {
            page: target,
            pages,
        },
    }
}

fn toggle_expansion(view_data: &mut ViewData) {
    let id = view_data
        .table
        .display
        .expenses
        .get(view_data.selected_row)
        .map(|expense| expense.id.clone());
    view_data.table.toggle_expanded(id.as_ref());
}

fn move_row(view_data: &mut ViewData, delta: isize) {
    let rows = view_data.table.display.expenses.len();
    if rows == 0 {
        view_data.selected_row = 0;
        return;
    }
    let current = view_data.selected_row as isize;
    let last = rows as isize - 1;
    view_data.selected_row = (current + delta).clamp(0, last) as usize;
}

fn move_col(view_data: &mut ViewData, delta: isize) {
    let last = SortField::ALL.len() as isize - 1;
    let current = view_data.selected_col as isize;
    view_data.selected_col = (current + delta).clamp(0, last) as usize;
}

fn page_count(total: u64, per_page: u32) -> u32 {
    let per_page = u64::from(per_page.max(1));
    let pages = total.div_ceil(per_page).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

fn emit_status(
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    view_data.status_line = Some(message.into());
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn render(frame: &mut ratatui::Frame<'_>, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.area());

    let header = Paragraph::new(header_text(view_data))
        .block(Block::default().title("gastos").borders(Borders::ALL));
    frame.render_widget(header, layout[0]);

    render_table(frame, layout[1], view_data);

    let status = Paragraph::new(status_text(view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);

    if let Some(expense) = view_data.table.expanded_expense() {
        let area = centered_rect(62, 42, frame.area());
        frame.render_widget(Clear, area);
        let detail = Paragraph::new(detail_text(expense))
            .block(Block::default().title("expense").borders(Borders::ALL));
        frame.render_widget(detail, area);
    }

    if view_data.filter.visible {
        let area = centered_rect(48, 50, frame.area());
        frame.render_widget(Clear, area);
        let picker = Paragraph::new(filter_overlay_text(view_data))
            .block(Block::default().title("categories").borders(Borders::ALL));
        frame.render_widget(picker, area);
    }

    // Dormant until an update flow sets `visible`; `e` only records a target.
    if view_data.edit_form.visible {
        let area = centered_rect(50, 30, frame.area());
        frame.render_widget(Clear, area);
        let target = view_data
            .edit_form
            .target
            .as_ref()
            .map(ExpenseId::as_str)
            .unwrap_or("none");
        let form = Paragraph::new(format!("editing: {target}"))
            .block(Block::default().title("edit").borders(Borders::ALL));
        frame.render_widget(form, area);
    }

    if view_data.help_visible {
        let area = centered_rect(70, 55, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_table(frame: &mut ratatui::Frame<'_>, area: Rect, view_data: &ViewData) {
    let columns = column_schema(&view_data.categories);
    let widths = vec![Constraint::Min(10); columns.len().max(1)];

    let header_cells = columns.iter().map(|column| {
        Cell::from(header_label_for_column(view_data, column)).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    });
    let header = Row::new(header_cells);

    let rows = view_data
        .table
        .display
        .expenses
        .iter()
        .enumerate()
        .map(|(row_index, expense)| {
            let selected_row = row_index == view_data.selected_row;
            let expanded = view_data.table.display.expanded_id.as_ref() == Some(&expense.id);
            let cells = [
                expense.title.clone(),
                format_money(expense.amount_cents),
                expense.category.clone(),
                format_short_date(expense.date),
            ]
            .into_iter()
            .enumerate()
            .map(|(column_index, text)| {
                let mut style = Style::default();
                if expanded {
                    style = style.add_modifier(Modifier::BOLD);
                }
                if selected_row {
                    style = style.bg(Color::DarkGray);
                }
                if selected_row && column_index == view_data.selected_col {
                    style = Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD);
                }
                Cell::from(text).style(style)
            })
            .collect::<Vec<_>>();
            Row::new(cells)
        });

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .title(table_title(view_data))
                .borders(Borders::ALL),
        );
    frame.render_widget(table, area);
}

fn header_label_for_column(view_data: &ViewData, column: &ColumnDescriptor) -> String {
    let mut label = column.label.clone();
    if column.field == SortField::Amount {
        label.push_str(" $");
    }
    if !column.filter_options.is_empty() && !view_data.table.query.category.is_empty() {
        label.push(' ');
        label.push_str(FILTER_MARK_ACTIVE);
    }
    let indicator = match view_data.sort_ui {
        Some(change) if change.field == column.field => Some(change.order.direction()),
        Some(_) => None,
        None => column.default_sort,
    };
    if let Some(direction) = indicator {
        label.push_str(match direction {
            SortDirection::Asc => SORT_ARROW_ASC,
            SortDirection::Desc => SORT_ARROW_DESC,
        });
    }
    label
}

fn table_title(view_data: &ViewData) -> String {
    let display = &view_data.table.display;
    let pages = page_count(display.total, view_data.table.query.per_page);
    let mut title = format!(
        "expenses p:{}/{} r:{} t:{}",
        view_data.table.query.page,
        pages,
        display.expenses.len(),
        display.total,
    );
    if display.loading {
        title.push_str(" (loading)");
    }
    title
}

fn header_text(view_data: &ViewData) -> String {
    let query = &view_data.table.query;
    let mut parts = vec![format!(
        "sort: {} {}",
        query.sort.as_str(),
        query.direction.label()
    )];
    if view_data.search.active {
        parts.push(format!("search: {}_", query.search));
    } else if !query.search.is_empty() {
        parts.push(format!("search: {}", query.search));
    }
    if !query.category.is_empty() {
        parts.push(format!("categories: {}", query.category.join(", ")));
    }
    if !query.group_id.is_empty() {
        parts.push(format!("group: {}", query.group_id));
    }
    parts.join(" | ")
}

fn status_text(view_data: &ViewData) -> String {
    if view_data.help_visible || view_data.filter.visible {
        return String::new();
    }
    let default =
        "j/k/h/l move | s/S sort | f filter | / search | n/p page | enter expand | ? help | q quit";
    match &view_data.status_line {
        Some(status) => format!("{status} | {default}"),
        None => default.to_owned(),
    }
}

fn detail_text(expense: &Expense) -> String {
    [
        format!("title: {}", expense.title),
        format!("amount: {}", format_money(expense.amount_cents)),
        format!("category: {}", expense.category),
        format!("date: {}", format_short_date(expense.date)),
        format!("id: {}", expense.id.as_str()),
    ]
    .join("\n")
}

fn filter_overlay_text(view_data: &ViewData) -> String {
    if view_data.categories.is_empty() {
        return "no categories loaded".to_owned();
    }
    let mut lines: Vec<String> = view_data
        .categories
        .iter()
        .zip(&view_data.filter.picked)
        .enumerate()
        .map(|(index, (category, picked))| {
            let cursor = if index == view_data.filter.cursor {
                ">"
            } else {
                " "
            };
            let mark = if *picked { "x" } else { " " };
            format!("{cursor} [{mark}] {category}")
        })
        .collect();
    lines.push(String::new());
    lines.push("space toggle | enter apply | esc cancel".to_owned());
    lines.join("\n")
}

fn help_overlay_text() -> &'static str {
    "nav: j/k/h/l or arrows | g/G first/last row\n\
table: s cycle sort | S clear sort | f categories | / search | n/p or ]/[ page\n\
row: enter expand/collapse | e edit\n\
search: type to filter | enter/esc done\n\
categories: j/k move | space toggle | enter apply | esc cancel\n\
other: ? help | q or ctrl+c quit"
}

fn format_money(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let absolute = cents.unsigned_abs();
    let dollars = absolute / 100;
    let cents_component = absolute % 100;
    format!("{sign}${dollars}.{cents_component:02}")
}

fn format_short_date(date: Date) -> String {
    date.format(&time::macros::format_description!(
        "[month]/[day]/[year repr:last_two]"
    ))
    .unwrap_or_else(|_| date.to_string())
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
