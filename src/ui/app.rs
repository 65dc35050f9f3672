use std::time::Instant;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info};
use tui::widgets::TableState;

use super::form::{ClientForm, Submission};
use super::ledger::ClientSnapshot;
use super::notify::{Notification, Notifier};
use super::search::Debouncer;
use super::view::{self, TableView};
use crate::models::Client;
use crate::remote::ApiClient;

// Which pane receives key presses
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Focus {
    Search,
    Table,
    Form,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Search => Focus::Table,
            Focus::Table => Focus::Form,
            Focus::Form => Focus::Search,
        }
    }

    fn previous(self) -> Self {
        match self {
            Focus::Search => Focus::Form,
            Focus::Table => Focus::Search,
            Focus::Form => Focus::Table,
        }
    }
}

/// State of the ledger screen and the controller for every user action.
pub struct App {
    api: ApiClient,
    snapshot: ClientSnapshot,
    view: TableView,
    table_state: TableState,
    form: ClientForm,
    notifier: Notifier,
    search: String,
    debouncer: Debouncer,
    focus: Focus,
    pending_delete: Option<i64>,
}

impl App {
    pub fn new(api: ApiClient, debouncer: Debouncer) -> Self {
        Self {
            api,
            snapshot: ClientSnapshot::default(),
            view: TableView::default(),
            table_state: TableState::default(),
            form: ClientForm::default(),
            notifier: Notifier::default(),
            search: String::new(),
            debouncer,
            focus: Focus::Table,
            pending_delete: None,
        }
    }

    pub fn view(&self) -> &TableView {
        &self.view
    }

    pub fn table_parts(&mut self) -> (&TableView, &mut TableState) {
        (&self.view, &mut self.table_state)
    }

    pub fn form(&self) -> &ClientForm {
        &self.form
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notifier.current()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn pending_delete(&self) -> Option<i64> {
        self.pending_delete
    }

    pub fn tick(&mut self, now: Instant) {
        self.notifier.tick(now);
    }

    /// Replace the snapshot with the server's list and show all of it.
    /// On failure the previous snapshot stays in place.
    pub async fn fetch_clients(&mut self) {
        match self.api.list_clients().await {
            Ok(clients) => {
                debug!(count = clients.len(), "fetched clients");
                self.replace_clients(clients);
            }
            Err(e) => self.notifier.error(e.to_string()),
        }
    }

    /// Swap in a new snapshot and show all of it.
    pub fn replace_clients(&mut self, clients: Vec<Client>) {
        self.snapshot = ClientSnapshot::new(clients);
        self.show(view::render(self.snapshot.clients()));
    }

    /// Show the snapshot narrowed to `query`.
    pub fn apply_search(&mut self, query: &str) {
        let filtered = self.snapshot.filter(query);
        self.show(view::render(&filtered));
    }

    fn show(&mut self, view: TableView) {
        let selected = match self.table_state.selected() {
            _ if view.is_empty() => None,
            Some(i) if i < view.count() => Some(i),
            _ => Some(0),
        };

        self.view = view;
        self.table_state.select(selected);
    }

    pub fn selected_id(&self) -> Option<i64> {
        self.table_state
            .selected()
            .and_then(|i| self.view.rows().get(i))
            .map(|row| row.id)
    }

    fn select_next(&mut self) {
        if self.view.is_empty() {
            return;
        }

        let i = match self.table_state.selected() {
            Some(i) if i + 1 < self.view.count() => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    fn select_previous(&mut self) {
        if self.view.is_empty() {
            return;
        }

        let i = match self.table_state.selected() {
            Some(0) | None => self.view.count() - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    /// Load a cached client into the form for editing.
    pub fn edit_client(&mut self, id: i64) {
        let Some(client) = self.snapshot.find(id) else {
            return;
        };

        self.form.load(client);
        self.focus = Focus::Form;
        self.notifier.success("Editing client...");
    }

    pub fn reset_form(&mut self) {
        self.form.reset();
    }

    /// Send the form as a create or update. The form keeps its contents
    /// unless the request succeeds.
    pub async fn submit(&mut self) {
        let submission = match self.form.submission() {
            Ok(submission) => submission,
            Err(e) => {
                self.notifier.error(e.to_string());
                return;
            }
        };

        let (result, done) = match &submission {
            Submission::Create(client) => (
                self.api.create_client(client).await,
                "Client added successfully",
            ),
            Submission::Update(id, client) => (
                self.api.update_client(*id, client).await,
                "Client updated successfully",
            ),
        };

        match result {
            Ok(()) => {
                info!("{done}");
                self.fetch_clients().await;
                self.form.reset();
                self.notifier.success(done);
            }
            Err(e) => self.notifier.error(e.to_string()),
        }
    }

    /// Ask for confirmation before deleting `id`.
    pub fn request_delete(&mut self, id: i64) {
        self.pending_delete = Some(id);
    }

    pub fn decline_delete(&mut self) {
        self.pending_delete = None;
    }

    pub async fn confirm_delete(&mut self) {
        let Some(id) = self.pending_delete.take() else {
            return;
        };

        match self.api.delete_client(id).await {
            Ok(()) => {
                info!(id, "client deleted");
                self.notifier.success("Client deleted successfully");
                self.fetch_clients().await;
            }
            Err(e) => self.notifier.error(e.to_string()),
        }
    }

    fn search_changed(&mut self) {
        self.debouncer.push(self.search.to_lowercase());
    }

    /// Handle one key press. Returns `true` when the user asked to quit.
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(true);
        }

        // The confirmation prompt swallows every other key until answered.
        if self.pending_delete.is_some() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    self.confirm_delete().await
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.decline_delete(),
                _ => {}
            }
            return Ok(false);
        }

        match key.code {
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return Ok(false);
            }
            KeyCode::BackTab => {
                self.focus = self.focus.previous();
                return Ok(false);
            }
            _ => {}
        }

        match self.focus {
            Focus::Search => match key.code {
                KeyCode::Char(c) => {
                    self.search.push(c);
                    self.search_changed();
                }
                KeyCode::Backspace => {
                    self.search.pop();
                    self.search_changed();
                }
                KeyCode::Esc => {
                    self.search.clear();
                    self.search_changed();
                }
                KeyCode::Enter | KeyCode::Down => self.focus = Focus::Table,
                _ => {}
            },
            Focus::Table => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
                KeyCode::Down => self.select_next(),
                KeyCode::Up => self.select_previous(),
                KeyCode::Char('e') | KeyCode::Enter => {
                    if let Some(id) = self.selected_id() {
                        self.edit_client(id);
                    }
                }
                KeyCode::Char('d') | KeyCode::Delete => {
                    if let Some(id) = self.selected_id() {
                        self.request_delete(id);
                    }
                }
                KeyCode::Char('n') => {
                    self.reset_form();
                    self.focus = Focus::Form;
                }
                KeyCode::Char('r') => self.fetch_clients().await,
                KeyCode::Char('/') => self.focus = Focus::Search,
                _ => {}
            },
            Focus::Form => match key.code {
                KeyCode::Enter => self.submit().await,
                KeyCode::Esc => self.reset_form(),
                KeyCode::Up => self.form.previous_field(),
                KeyCode::Down => self.form.next_field(),
                code => self.form.edit_current_field(code),
            },
        }

        Ok(false)
    }
}
