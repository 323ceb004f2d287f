//! Main dashboard state and event loop

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::Config;
use crate::dashboard::{
    components::StatusDisplay,
    screens::{ApiConfigScreen, RecordsScreen, TemplatesScreen},
    traits::{Screen, ScreenAction},
    ui::{centered_rect, Styles},
};
use crate::supplier::{DataSupplier, SampleSupplier};
use crate::views::RecordView;

const SIDEBAR_WIDTH: u16 = 24;
const STATUS_TIMEOUT: Duration = Duration::from_secs(5);

/// Sidebar pages, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Templates,
    ApiConfig,
    Donors,
    Recipients,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Templates, Page::ApiConfig, Page::Donors, Page::Recipients];

    pub fn title(&self) -> &'static str {
        match self {
            Page::Templates => "Templates",
            Page::ApiConfig => "API Configuration",
            Page::Donors => RecordView::Donors.title(),
            Page::Recipients => RecordView::Recipients.title(),
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|p| p == self).unwrap_or(0)
    }

    pub fn next(&self) -> Page {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Page {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Main dashboard application state
pub struct App {
    pub config: Config,
    pub current_page: Page,

    pub templates: TemplatesScreen,
    pub api_config: ApiConfigScreen,
    pub donors: RecordsScreen,
    pub recipients: RecordsScreen,

    pub status: StatusDisplay,
    pub should_quit: bool,
    pub show_help_popup: bool,
}

impl App {
    /// Dashboard backed by the built-in sample records
    pub fn new(config: Config) -> Self {
        Self::with_suppliers(
            config,
            Arc::new(SampleSupplier::donors()),
            Arc::new(SampleSupplier::recipients()),
        )
    }

    pub fn with_suppliers(
        config: Config,
        donors: Arc<dyn DataSupplier>,
        recipients: Arc<dyn DataSupplier>,
    ) -> Self {
        Self {
            api_config: ApiConfigScreen::new(&config),
            templates: TemplatesScreen::new(),
            donors: RecordsScreen::new(RecordView::Donors, donors),
            recipients: RecordsScreen::new(RecordView::Recipients, recipients),
            current_page: Page::Templates,
            status: StatusDisplay::new()
                .with_timestamps()
                .with_auto_clear(STATUS_TIMEOUT),
            should_quit: false,
            show_help_popup: false,
            config,
        }
    }

    /// Run the main application loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        info!("Dashboard started on {}", self.current_page.title());
        self.current_screen_mut().on_enter();

        loop {
            terminal.draw(|f| self.draw(f))?;

            if event::poll(self.config.tick_rate())? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
            self.on_tick().await;

            if self.should_quit {
                break;
            }
        }

        info!("Dashboard closed");
        Ok(())
    }

    /// Collect finished loads and advance animations
    pub async fn on_tick(&mut self) {
        if let Some(action) = self.donors.poll_load().await {
            self.apply(action);
        }
        if let Some(action) = self.recipients.poll_load().await {
            self.apply(action);
        }
        self.current_screen_mut().tick();

        if self.status.should_auto_clear() {
            self.status.clear();
        }
    }

    pub fn current_screen(&self) -> &dyn Screen {
        match self.current_page {
            Page::Templates => &self.templates,
            Page::ApiConfig => &self.api_config,
            Page::Donors => &self.donors,
            Page::Recipients => &self.recipients,
        }
    }

    pub fn current_screen_mut(&mut self) -> &mut dyn Screen {
        match self.current_page {
            Page::Templates => &mut self.templates,
            Page::ApiConfig => &mut self.api_config,
            Page::Donors => &mut self.donors,
            Page::Recipients => &mut self.recipients,
        }
    }

    /// Handle keyboard input events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.show_help_popup {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.show_help_popup = false;
            }
            return;
        }

        // Function keys work even while a screen is taking text input
        match key.code {
            KeyCode::F(1) => {
                self.show_help_popup = true;
                return;
            }
            KeyCode::F(n @ 2..=5) => {
                self.navigate_to(Page::ALL[(n - 2) as usize]);
                return;
            }
            _ => {}
        }

        if !self.current_screen().is_capturing_input() {
            match key.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Char('?') => {
                    self.show_help_popup = true;
                    return;
                }
                KeyCode::Tab => {
                    self.navigate_to(self.current_page.next());
                    return;
                }
                KeyCode::BackTab => {
                    self.navigate_to(self.current_page.prev());
                    return;
                }
                KeyCode::Char(c @ '1'..='4') => {
                    self.navigate_to(Page::ALL[c as usize - '1' as usize]);
                    return;
                }
                _ => {}
            }
        }

        let action = self.current_screen_mut().handle_key_event(key);
        self.apply(action);
    }

    /// Apply an action returned by a screen
    pub fn apply(&mut self, action: ScreenAction) {
        match action {
            ScreenAction::SetStatus(message) => self.status.set_info(message),
            ScreenAction::SetSuccess(message) => self.status.set_success(message),
            ScreenAction::SetError(message) => self.status.set_error(message),
            ScreenAction::None => {}
        }
    }

    /// Switch pages; record pages start loading the first time they are shown
    pub fn navigate_to(&mut self, page: Page) {
        if page == self.current_page {
            return;
        }
        debug!("Navigating from {:?} to {:?}", self.current_page, page);
        self.current_page = page;
        self.status.clear();
        self.current_screen_mut().on_enter();
    }

    /// Draw the UI
    pub fn draw(&mut self, f: &mut Frame) {
        let size = f.size();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(rows[0]);

        self.draw_sidebar(f, columns[0]);
        self.current_screen_mut().draw(f, columns[1]);

        let hint = format!(
            "{} | Tab/1-4: Switch page | ?/F1: Help | q: Quit",
            self.current_page.title()
        );
        self.status.render(f, rows[1], &hint);

        if self.show_help_popup {
            self.draw_help_popup(f, size);
        }
    }

    fn draw_sidebar(&self, f: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = Page::ALL
            .iter()
            .enumerate()
            .map(|(i, page)| ListItem::new(format!("{}. {}", i + 1, page.title())))
            .collect();

        let mut state = ListState::default();
        state.select(Some(self.current_page.index()));

        let sidebar = List::new(items)
            .block(
                Block::default()
                    .title("NGO Portal")
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            )
            .highlight_style(Styles::selected())
            .highlight_symbol("> ");

        f.render_stateful_widget(sidebar, area, &mut state);
    }

    /// Draw help popup with context-sensitive shortcuts
    fn draw_help_popup(&self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(70, 70, area);
        f.render_widget(Clear, popup_area);

        let help_popup = Paragraph::new(self.context_help())
            .block(
                Block::default()
                    .title("Help - Context Shortcuts")
                    .borders(Borders::ALL)
                    .border_style(Styles::warning()),
            )
            .style(Styles::default())
            .wrap(Wrap { trim: false });

        f.render_widget(help_popup, popup_area);
    }

    pub fn context_help(&self) -> String {
        let global_help = "Global Shortcuts:\n\
            Tab / Shift+Tab - Next/previous page\n\
            1-4 or F2-F5 - Jump to page\n\
            q / Ctrl+C - Quit\n\
            F1 / ? - Toggle this help\n\n";

        format!("{}{}", global_help, self.current_screen().help())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_page_cycle_wraps() {
        assert_eq!(Page::Recipients.next(), Page::Templates);
        assert_eq!(Page::Templates.prev(), Page::Recipients);
        assert_eq!(Page::ApiConfig.next(), Page::Donors);
    }

    #[tokio::test]
    async fn test_number_keys_switch_pages_and_start_loading() {
        let mut app = App::new(Config::default());
        assert_eq!(app.current_page, Page::Templates);

        app.handle_key_event(key(KeyCode::Char('4')));
        assert_eq!(app.current_page, Page::Recipients);
        assert!(app.recipients.is_loading());
        assert!(!app.donors.is_loading());

        let action = app.recipients.wait_for_load().await.unwrap();
        app.apply(action);
        assert_eq!(app.recipients.table.rows.len(), 4);
        assert_eq!(app.status.get_current().unwrap().message, "Loaded 4 recipient records");
    }

    #[test]
    fn test_typing_in_form_does_not_trigger_shortcuts() {
        let mut app = App::new(Config::default());
        app.handle_key_event(key(KeyCode::Enter));
        assert!(app.current_screen().is_capturing_input());

        app.handle_key_event(key(KeyCode::Char('q')));
        app.handle_key_event(key(KeyCode::Char('2')));
        assert!(!app.should_quit);
        assert_eq!(app.current_page, Page::Templates);
        assert_eq!(app.templates.form.value(0), "q2");

        app.handle_key_event(key(KeyCode::F(3)));
        assert_eq!(app.current_page, Page::ApiConfig);
    }

    #[test]
    fn test_help_popup_and_quit() {
        let mut app = App::new(Config::default());
        app.handle_key_event(key(KeyCode::Char('?')));
        assert!(app.show_help_popup);
        assert!(app.context_help().contains("Templates:"));

        app.handle_key_event(key(KeyCode::Char('q')));
        assert!(!app.show_help_popup);
        assert!(!app.should_quit);

        app.handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_draw_shows_sidebar_and_loaded_donors() {
        let mut app = App::new(Config::default());
        app.navigate_to(Page::Donors);
        if let Some(action) = app.donors.wait_for_load().await {
            app.apply(action);
        }

        let mut terminal = Terminal::new(TestBackend::new(160, 30)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("NGO Portal"));
        assert!(text.contains("API Configuration"));
        assert!(text.contains("Emily Carter"));
        assert!(text.contains("Click to know"));
    }
}
