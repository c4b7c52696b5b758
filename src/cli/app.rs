use super::form::ProductForm;
use super::{Resource, ui};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use nexstock::core::{DashboardError, Record, RecordId};
use nexstock::{AuthSession, Customer, Dashboard, Order, Product, TableView, ThemeMode};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
    widgets::{Block, Borders},
};
use std::{io, sync::Arc, time::Duration};
use tokio::sync::mpsc;
use tracing::debug;
use tui_textarea::TextArea;

/// Input poll interval; also the redraw rate while background work runs.
const TICK: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Overview,
    Products,
    Orders,
    Customers,
}

impl Screen {
    pub const TABS: [Screen; 4] = [
        Self::Overview,
        Self::Products,
        Self::Orders,
        Self::Customers,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::Login => "Sign in",
            Self::Overview => "Dashboard",
            Self::Products => "Products",
            Self::Orders => "Orders",
            Self::Customers => "Customers",
        }
    }

    pub fn tab_index(self) -> Option<usize> {
        Self::TABS.iter().position(|s| *s == self)
    }

    fn step(self, delta: isize) -> Self {
        let len = Self::TABS.len() as isize;
        let current = self.tab_index().unwrap_or(0) as isize;
        Self::TABS[(current + delta).rem_euclid(len) as usize]
    }
}

/// The view mounted for the current screen. Switching screens disposes it.
pub enum ActiveView {
    Overview(Arc<TableView<Product>>),
    Products(Arc<TableView<Product>>),
    Orders(Arc<TableView<Order>>),
    Customers(Arc<TableView<Customer>>),
}

/// Runs `$body` with `$view` bound to the mounted `Arc<TableView<_>>`,
/// whatever its record type.
macro_rules! with_view {
    ($active:expr, $view:ident => $body:expr) => {
        match $active {
            ActiveView::Overview($view) | ActiveView::Products($view) => $body,
            ActiveView::Orders($view) => $body,
            ActiveView::Customers($view) => $body,
        }
    };
}
pub(crate) use with_view;

impl ActiveView {
    pub fn dispose(&self) {
        with_view!(self, view => view.dispose())
    }
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Results reported back by spawned mutation tasks.
enum AppEvent {
    Notice(Notice),
    FormSaved(String),
    FormFailed(String),
}

pub struct App<'a> {
    pub dashboard: Dashboard,
    pub page_size: Option<usize>,
    pub session: AuthSession,
    pub theme: ThemeMode,
    pub screen: Screen,
    pub view: Option<ActiveView>,
    pub selected: usize,
    pub search: TextArea<'a>,
    pub search_focused: bool,
    pub login: TextArea<'a>,
    pub login_error: Option<String>,
    pub form: Option<ProductForm<'a>>,
    /// Row awaiting a y/N answer: id and display name
    pub confirm_delete: Option<(RecordId, String)>,
    pub notice: Option<Notice>,
    pub exit: bool,

    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl<'a> App<'a> {
    pub fn new(dashboard: Dashboard, page_size: Option<usize>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            dashboard,
            page_size,
            session: AuthSession::new(),
            theme: ThemeMode::default(),
            screen: Screen::Login,
            view: None,
            selected: 0,
            search: Self::search_input(),
            search_focused: false,
            login: Self::login_input(),
            login_error: None,
            form: None,
            confirm_delete: None,
            notice: None,
            exit: false,
            events_tx,
            events_rx,
        }
    }

    fn search_input() -> TextArea<'static> {
        let mut textarea = TextArea::default();
        textarea.set_placeholder_text("Press '/' to search (at least 3 characters)");
        textarea.set_block(Block::default().borders(Borders::ALL).title(" Search "));
        textarea
    }

    fn login_input() -> TextArea<'static> {
        let mut textarea = TextArea::default();
        textarea.set_placeholder_text("you@company.com");
        textarea.set_block(Block::default().borders(Borders::ALL).title(" Email "));
        textarea
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let res = self.run_loop(&mut terminal).await;

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        if let Some(view) = self.view.take() {
            view.dispose();
        }
        res?;
        Ok(())
    }

    async fn run_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            self.drain_events();
            terminal.draw(|f| ui::draw(f, self))?;

            if event::poll(TICK)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
            if self.exit {
                return Ok(());
            }
        }
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                AppEvent::Notice(notice) => self.notice = Some(notice),
                AppEvent::FormSaved(message) => {
                    self.form = None;
                    self.notice = Some(Notice::info(message));
                }
                AppEvent::FormFailed(message) => match self.form.as_mut() {
                    Some(form) => {
                        form.submitting = false;
                        form.failure = Some(message);
                    }
                    None => self.notice = Some(Notice::error(message)),
                },
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.exit = true;
            return;
        }

        let result = if self.screen == Screen::Login {
            self.on_login_key(key);
            Ok(())
        } else if self.form.is_some() {
            self.on_form_key(key);
            Ok(())
        } else if self.confirm_delete.is_some() {
            self.on_confirm_key(key);
            Ok(())
        } else if self.search_focused {
            self.on_search_key(key)
        } else {
            self.on_key(key)
        };

        if let Err(err) = result {
            self.notice = Some(Notice::error(err.to_string()));
        }
    }

    // ========================================================================
    // Screens
    // ========================================================================

    fn on_login_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.exit = true,
            KeyCode::Enter => {
                let email = self.login.lines().join("");
                match self.session.login(&email) {
                    Ok(()) => {
                        self.login = Self::login_input();
                        self.login_error = None;
                        self.switch_to(Screen::Overview);
                    }
                    Err(DashboardError::Validation(errors)) => {
                        self.login_error = errors.message_for("email").map(str::to_string);
                    }
                    Err(err) => self.login_error = Some(err.to_string()),
                }
            }
            _ => {
                self.login.input(key);
            }
        }
    }

    fn logout(&mut self) {
        if let Some(view) = self.view.take() {
            view.dispose();
        }
        self.session.logout();
        self.screen = Screen::Login;
        self.notice = None;
    }

    /// Disposes the current view and mounts a fresh one with default query
    /// state, then starts its first load.
    fn switch_to(&mut self, screen: Screen) {
        if let Some(view) = self.view.take() {
            view.dispose();
        }
        self.screen = screen;
        self.selected = 0;
        self.search = Self::search_input();
        self.search_focused = false;
        self.confirm_delete = None;
        self.form = None;

        let base = self.dashboard.view_config();
        let config = |resource: Resource| resource.view_config(base, self.page_size);
        let active = match screen {
            Screen::Login => None,
            Screen::Overview => Some(ActiveView::Overview(Arc::new(
                self.dashboard.view_with(&config(Resource::Products)),
            ))),
            Screen::Products => Some(ActiveView::Products(Arc::new(
                self.dashboard.view_with(&config(Resource::Products)),
            ))),
            Screen::Orders => Some(ActiveView::Orders(Arc::new(
                self.dashboard.view_with(&config(Resource::Orders)),
            ))),
            Screen::Customers => Some(ActiveView::Customers(Arc::new(
                self.dashboard.view_with(&config(Resource::Customers)),
            ))),
        };
        if let Some(active) = &active {
            with_view!(active, view => self.spawn_load(view));
        }
        self.view = active;
    }

    fn spawn_load<R: Record>(&self, view: &Arc<TableView<R>>) {
        let view = Arc::clone(view);
        tokio::spawn(async move {
            // failures land in the view's fetch status
            if let Err(err) = view.load().await {
                debug!(resource = R::RESOURCE, error = %err, "background load failed");
            }
        });
    }

    fn on_key(&mut self, key: KeyEvent) -> nexstock::Result<()> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.exit = true,
            KeyCode::Tab => self.switch_to(self.screen.step(1)),
            KeyCode::BackTab => self.switch_to(self.screen.step(-1)),
            KeyCode::Char('t') => self.theme.toggle(),
            KeyCode::Char('L') => self.logout(),
            _ => match &self.view {
                Some(ActiveView::Overview(view)) => {
                    if key.code == KeyCode::Char('r') {
                        self.spawn_load(view);
                    }
                }
                Some(ActiveView::Products(view)) => {
                    let view = Arc::clone(view);
                    if !self.on_product_key(&view, key)? {
                        self.on_table_key(&view, key)?;
                    }
                }
                Some(ActiveView::Orders(view)) => {
                    let view = Arc::clone(view);
                    self.on_table_key(&view, key)?;
                }
                Some(ActiveView::Customers(view)) => {
                    let view = Arc::clone(view);
                    self.on_table_key(&view, key)?;
                }
                None => {}
            },
        }
        Ok(())
    }

    /// Selection, paging, sorting and reload; shared by every table screen.
    fn on_table_key<R: Record>(
        &mut self,
        view: &Arc<TableView<R>>,
        key: KeyEvent,
    ) -> nexstock::Result<()> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                let rows = view.derived_page()?.row_count();
                if self.selected + 1 < rows {
                    self.selected += 1;
                }
            }
            KeyCode::Right | KeyCode::Char('n') | KeyCode::PageDown => {
                view.next_page()?;
                self.selected = 0;
            }
            KeyCode::Left | KeyCode::Char('p') | KeyCode::PageUp => {
                view.previous_page()?;
                self.selected = 0;
            }
            KeyCode::Char('/') => self.search_focused = true,
            KeyCode::Char('r') => self.spawn_load(view),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if let Some(column) = view.columns().columns().get(index) {
                    if column.sortable {
                        view.set_sort(column.key)?;
                    } else {
                        self.notice = Some(Notice::info(format!(
                            "{} cannot be sorted",
                            column.label
                        )));
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Product-only actions. Returns false when the key was not one of them.
    fn on_product_key(
        &mut self,
        view: &Arc<TableView<Product>>,
        key: KeyEvent,
    ) -> nexstock::Result<bool> {
        match key.code {
            KeyCode::Char('a') => self.form = Some(ProductForm::add()),
            KeyCode::Char('e') => {
                if let Some(product) = self.selected_record(view)? {
                    self.form = Some(ProductForm::edit(&product));
                }
            }
            KeyCode::Char('d') => {
                if let Some(product) = self.selected_record(view)? {
                    if view.is_row_pending(&product.id) {
                        self.notice = Some(Notice::info(format!(
                            "\"{}\" is already being updated",
                            product.name
                        )));
                    } else {
                        self.confirm_delete = Some((product.id, product.name));
                    }
                }
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn selected_record<R: Record>(&self, view: &TableView<R>) -> nexstock::Result<Option<R>> {
        Ok(view.derived_page()?.rows.into_iter().nth(self.selected))
    }

    fn on_search_key(&mut self, key: KeyEvent) -> nexstock::Result<()> {
        let Some(active) = &self.view else {
            self.search_focused = false;
            return Ok(());
        };
        match key.code {
            KeyCode::Esc => self.search_focused = false,
            KeyCode::Enter => {
                self.search_focused = false;
                let term = self.search.lines().join("");
                with_view!(active, view => view.commit_search_term(&term))?;
                self.selected = 0;
            }
            _ => {
                if self.search.input(key) {
                    let term = self.search.lines().join("");
                    with_view!(active, view => view.set_search_term(&term))?;
                    self.selected = 0;
                }
            }
        }
        Ok(())
    }

    fn on_confirm_key(&mut self, key: KeyEvent) {
        let Some((id, name)) = self.confirm_delete.take() else {
            return;
        };
        if !matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
            return;
        }
        let Some(ActiveView::Products(view)) = &self.view else {
            return;
        };
        let view = Arc::clone(view);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let notice = match view.delete(id).await {
                Ok(()) => Notice::info(format!("Deleted \"{name}\"")),
                Err(err) => Notice::error(format!("Could not delete \"{name}\": {err}")),
            };
            let _ = tx.send(AppEvent::Notice(notice));
        });
    }

    fn on_form_key(&mut self, key: KeyEvent) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        if form.submitting {
            return;
        }
        match key.code {
            KeyCode::Esc => self.form = None,
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_previous(),
            KeyCode::Enter => self.submit_form(),
            _ => form.input_key(key.into()),
        }
    }

    fn submit_form(&mut self) {
        let Some(ActiveView::Products(view)) = &self.view else {
            return;
        };
        let view = Arc::clone(view);
        let Some(form) = self.form.as_mut() else {
            return;
        };
        // field errors are rendered inside the form
        let Ok(draft) = form.draft() else {
            return;
        };
        form.submitting = true;
        form.failure = None;

        let editing = form.editing.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = match editing {
                Some(id) => view.update(id, draft).await,
                None => view.create(draft).await,
            };
            let event = match result {
                Ok(product) => AppEvent::FormSaved(format!("Saved \"{}\"", product.name)),
                Err(err) => AppEvent::FormFailed(err.to_string()),
            };
            let _ = tx.send(event);
        });
    }
}
