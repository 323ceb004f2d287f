//! Record list screen, shared by the donor and recipient pages

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::{
    dashboard::{
        components::{FormField, FormFieldType},
        traits::{Navigable, Screen, ScreenAction},
        ui::{centered_rect, Styles},
    },
    errors::PortalResult,
    models::{FieldDescriptor, Record},
    supplier::{self, DataSupplier},
    table::RecordTable,
    views::RecordView,
};

type LoadResult = PortalResult<(Vec<FieldDescriptor>, Vec<Record>)>;

/// Label/value pairs for the record behind an activated row
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDetail {
    pub index: usize,
    pub lines: Vec<(String, String)>,
}

impl RecordDetail {
    /// Described fields first, in column order, then any extra keys the record carries
    pub fn new(index: usize, record: &Record, fields: &[FieldDescriptor]) -> Self {
        let mut lines: Vec<(String, String)> = fields
            .iter()
            .map(|field| {
                (
                    field.label.clone(),
                    record.get(&field.key).unwrap_or_default().to_string(),
                )
            })
            .collect();

        lines.extend(
            record
                .iter()
                .filter(|(key, _)| !fields.iter().any(|f| f.key == *key))
                .map(|(key, value)| (key.to_string(), value.to_string())),
        );

        Self { index, lines }
    }
}

pub struct RecordsScreen {
    pub view: RecordView,
    pub table: RecordTable,
    pub detail: Option<RecordDetail>,
    pub filter_input: Option<FormField>,
    supplier: Arc<dyn DataSupplier>,
    pending: Option<JoinHandle<LoadResult>>,
    loaded: bool,
}

impl RecordsScreen {
    pub fn new(view: RecordView, supplier: Arc<dyn DataSupplier>) -> Self {
        Self {
            view,
            table: RecordTable::new(view.table_config()),
            detail: None,
            filter_input: None,
            supplier,
            pending: None,
            loaded: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Spawn a fetch of fields and rows; returns false while one is already in flight
    pub fn start_load(&mut self) -> bool {
        if self.pending.is_some() {
            return false;
        }
        info!("Loading {} records from {}", self.view.noun(), self.supplier.name());
        self.table.set_loading(true);
        self.detail = None;

        let source = Arc::clone(&self.supplier);
        self.pending = Some(tokio::spawn(async move {
            supplier::load(source.as_ref()).await
        }));
        true
    }

    /// Collect a finished fetch, if any
    pub async fn poll_load(&mut self) -> Option<ScreenAction> {
        if !self.pending.as_ref().is_some_and(|handle| handle.is_finished()) {
            return None;
        }
        let handle = self.pending.take()?;
        Some(self.finish_load(handle.await))
    }

    /// Wait for the in-flight fetch to complete
    pub async fn wait_for_load(&mut self) -> Option<ScreenAction> {
        let handle = self.pending.take()?;
        Some(self.finish_load(handle.await))
    }

    fn finish_load(&mut self, joined: Result<LoadResult, tokio::task::JoinError>) -> ScreenAction {
        self.loaded = true;
        match joined {
            Ok(Ok((fields, rows))) => {
                let count = rows.len();
                self.table.set_data(fields, rows);
                ScreenAction::SetStatus(format!("Loaded {} {} records", count, self.view.noun()))
            }
            Ok(Err(e)) => {
                error!("Failed to load {} records: {}", self.view.noun(), e);
                self.table.set_loading(false);
                ScreenAction::SetError(format!(
                    "Failed to load {} records. Please try again.",
                    self.view.noun()
                ))
            }
            Err(e) => {
                error!("{} load task failed: {}", self.view.noun(), e);
                self.table.set_loading(false);
                ScreenAction::SetError(format!(
                    "Failed to load {} records. Please try again.",
                    self.view.noun()
                ))
            }
        }
    }

    /// Row action: open the detail popup for the selected record
    pub fn open_selected(&mut self) -> bool {
        let fields = &self.table.fields;
        let mut detail = None;
        let mut show_detail = |index: usize, record: &Record| {
            detail = Some(RecordDetail::new(index, record, fields));
        };
        let activated = self.table.activate_selected(&mut show_detail);
        self.detail = detail;
        activated
    }

    fn handle_filter_key(&mut self, key: KeyEvent) -> ScreenAction {
        let Some(input) = self.filter_input.as_mut() else {
            return ScreenAction::None;
        };

        match key.code {
            KeyCode::Enter => {
                let filter = input.value.clone();
                self.filter_input = None;
                self.table.set_filter(&filter);
                return ScreenAction::SetStatus(format!(
                    "{} of {} {} records match",
                    self.table.visible_count(),
                    self.table.rows.len(),
                    self.view.noun()
                ));
            }
            KeyCode::Esc => self.filter_input = None,
            KeyCode::Char(c) => input.insert_char(c),
            KeyCode::Backspace => input.delete_char(),
            KeyCode::Delete => input.delete_char_forward(),
            KeyCode::Left => input.move_cursor_left(),
            KeyCode::Right => input.move_cursor_right(),
            KeyCode::Home => input.move_cursor_to_start(),
            KeyCode::End => input.move_cursor_to_end(),
            _ => {}
        }
        ScreenAction::None
    }

    fn draw_detail(&self, f: &mut Frame, area: Rect, detail: &RecordDetail) {
        let popup_area = centered_rect(60, 60, area);
        f.render_widget(Clear, popup_area);

        let lines: Vec<Line> = detail
            .lines
            .iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(format!("{}: ", label), Styles::title()),
                    Span::raw(value.clone()),
                ])
            })
            .collect();

        let popup = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(format!("Additional Info - record {} (Esc to close)", detail.index + 1))
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            );

        f.render_widget(popup, popup_area);
    }
}

impl Screen for RecordsScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        match &self.filter_input {
            Some(input) => input.render(f, chunks[0]),
            None => {
                let filter = self.table.config.filter.clone().unwrap_or_default();
                let search = FormField::new("Search (/)", FormFieldType::Text)
                    .with_placeholder("Press / to search, Esc to clear")
                    .with_value(&filter);
                search.render(f, chunks[0]);
            }
        }

        self.table.render(f, chunks[1]);

        if let Some(detail) = &self.detail {
            self.draw_detail(f, area, detail);
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction {
        if self.detail.is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ')) {
                self.detail = None;
            }
            return ScreenAction::None;
        }

        if self.filter_input.is_some() {
            return self.handle_filter_key(key);
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.table.navigate_up(),
            KeyCode::Down | KeyCode::Char('j') => self.table.navigate_down(),
            KeyCode::Home => self.table.navigate_to_first(),
            KeyCode::End => self.table.navigate_to_last(),
            KeyCode::Enter => {
                if !self.open_selected() {
                    return ScreenAction::SetStatus("No record selected".to_string());
                }
            }
            KeyCode::Char('/') => {
                let current = self.table.config.filter.clone().unwrap_or_default();
                let mut input = FormField::new("Search", FormFieldType::Text).with_value(&current);
                input.set_focus(true);
                self.filter_input = Some(input);
            }
            KeyCode::Esc => {
                if self.table.config.filter.is_some() {
                    self.table.set_filter("");
                    return ScreenAction::SetStatus("Search cleared".to_string());
                }
            }
            KeyCode::Char('r') => {
                if self.start_load() {
                    return ScreenAction::SetStatus(format!("Reloading {} records...", self.view.noun()));
                }
                return ScreenAction::SetStatus(format!("Already loading {} records", self.view.noun()));
            }
            _ => {}
        }
        ScreenAction::None
    }

    fn is_capturing_input(&self) -> bool {
        self.filter_input.is_some()
    }

    fn on_enter(&mut self) {
        if !self.loaded {
            self.start_load();
        }
    }

    fn tick(&mut self) {
        self.table.tick();
    }

    fn help(&self) -> &'static str {
        "Records:\n\
        ↑/↓ or j/k - Select record\n\
        Home/End - First/last record\n\
        Enter - Show additional info\n\
        / - Search displayed fields\n\
        Esc - Clear search / close details\n\
        r - Reload records"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PortalError;
    use crate::supplier::SampleSupplier;
    use async_trait::async_trait;
    use crossterm::event::KeyModifiers;

    struct FailingSupplier;

    #[async_trait]
    impl DataSupplier for FailingSupplier {
        fn name(&self) -> &str {
            "failing"
        }

        async fn fetch_fields(&self) -> PortalResult<Vec<FieldDescriptor>> {
            Err(PortalError::Rejected {
                endpoint: "/api/donors/fields".to_string(),
                status: 500,
            })
        }

        async fn fetch_rows(&self) -> PortalResult<Vec<Record>> {
            Ok(Vec::new())
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    async fn loaded_recipients() -> RecordsScreen {
        let mut screen = RecordsScreen::new(
            RecordView::Recipients,
            Arc::new(SampleSupplier::recipients()),
        );
        screen.on_enter();
        assert!(screen.is_loading());
        assert!(screen.table.loading);
        screen.wait_for_load().await;
        screen
    }

    #[tokio::test]
    async fn test_load_fills_table() {
        let screen = loaded_recipients().await;
        assert!(!screen.is_loading());
        assert!(!screen.table.loading);
        assert_eq!(screen.table.rows.len(), 4);
        assert_eq!(screen.table.grid().header().len(), 6);
    }

    #[tokio::test]
    async fn test_enter_opens_detail_for_selected_row() {
        let mut screen = loaded_recipients().await;
        screen.handle_key_event(key(KeyCode::Down));
        screen.handle_key_event(key(KeyCode::Enter));

        let detail = screen.detail.clone().unwrap();
        assert_eq!(detail.index, 1);
        assert_eq!(detail.lines[0], ("Recipient Name".to_string(), "Robert Chen".to_string()));

        screen.handle_key_event(key(KeyCode::Esc));
        assert!(screen.detail.is_none());
    }

    #[tokio::test]
    async fn test_search_filters_rows() {
        let mut screen = loaded_recipients().await;
        screen.handle_key_event(key(KeyCode::Char('/')));
        assert!(screen.is_capturing_input());
        for c in "urgent".chars() {
            screen.handle_key_event(key(KeyCode::Char(c)));
        }
        let action = screen.handle_key_event(key(KeyCode::Enter));

        assert_eq!(action, ScreenAction::SetStatus("1 of 4 recipient records match".to_string()));
        assert!(!screen.is_capturing_input());
        assert_eq!(screen.table.selected_record().map(|(i, _)| i), Some(3));

        screen.handle_key_event(key(KeyCode::Esc));
        assert_eq!(screen.table.visible_count(), 4);
    }

    #[tokio::test]
    async fn test_failed_load_reports_generic_error() {
        let mut screen = RecordsScreen::new(RecordView::Donors, Arc::new(FailingSupplier));
        screen.on_enter();
        let action = screen.wait_for_load().await.unwrap();

        assert_eq!(
            action,
            ScreenAction::SetError("Failed to load donor records. Please try again.".to_string())
        );
        assert!(!screen.table.loading);
        assert!(screen.table.rows.is_empty());

        // entering again does not refetch; `r` does
        screen.on_enter();
        assert!(!screen.is_loading());
        let action = screen.handle_key_event(key(KeyCode::Char('r')));
        assert_eq!(action, ScreenAction::SetStatus("Reloading donor records...".to_string()));
        assert!(screen.is_loading());

        let action = screen.handle_key_event(key(KeyCode::Char('r')));
        assert_eq!(action, ScreenAction::SetStatus("Already loading donor records".to_string()));
        screen.wait_for_load().await;
    }

    #[test]
    fn test_detail_includes_undescribed_keys() {
        let fields = vec![FieldDescriptor::new("name", "Name")];
        let record = Record::new().with("name", "A").with("notes", "call back");
        let detail = RecordDetail::new(0, &record, &fields);
        assert_eq!(
            detail.lines,
            vec![
                ("Name".to_string(), "A".to_string()),
                ("notes".to_string(), "call back".to_string()),
            ]
        );
    }
}
