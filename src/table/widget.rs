//! Record table component

use ratatui::{
    layout::{Alignment, Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use tracing::debug;
use unicode_width::UnicodeWidthStr;

use super::grid::{build_grid, visible_rows, GridRow, GridView, TableConfig};
use super::priority::CellStyle;
use crate::dashboard::ui::Styles;
use crate::models::{FieldDescriptor, Record};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Receives the record behind a row when its action is activated
pub trait RowActionHandler {
    fn on_row_action(&mut self, index: usize, record: &Record);
}

impl<F> RowActionHandler for F
where
    F: FnMut(usize, &Record),
{
    fn on_row_action(&mut self, index: usize, record: &Record) {
        self(index, record)
    }
}

/// Generic table over supplied fields and records
pub struct RecordTable {
    pub fields: Vec<FieldDescriptor>,
    pub rows: Vec<Record>,
    pub loading: bool,
    pub config: TableConfig,
    pub state: TableState,
    spinner_frame: usize,
}

impl RecordTable {
    pub fn new(config: TableConfig) -> Self {
        Self {
            fields: Vec::new(),
            rows: Vec::new(),
            loading: false,
            config,
            state: TableState::default(),
            spinner_frame: 0,
        }
    }

    /// Replace fields and records wholesale and reset selection
    pub fn set_data(&mut self, fields: Vec<FieldDescriptor>, rows: Vec<Record>) {
        debug!("{}: {} fields, {} rows", self.config.title, fields.len(), rows.len());
        self.fields = fields;
        self.rows = rows;
        self.loading = false;
        self.reset_selection();
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        if loading {
            self.spinner_frame = 0;
        }
    }

    /// Apply a search filter; blank text shows every record
    pub fn set_filter(&mut self, filter: &str) {
        self.config.set_filter(filter);
        self.reset_selection();
    }

    /// Advance the loading spinner
    pub fn tick(&mut self) {
        if self.loading {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        }
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame]
    }

    pub fn grid(&self) -> GridView {
        build_grid(&self.fields, &self.rows, self.loading, &self.config)
    }

    /// Positions of the records currently shown, in display order
    fn visible_indices(&self) -> Vec<usize> {
        visible_rows(&self.fields, &self.rows, self.config.filter.as_deref())
            .map(|(index, _)| index)
            .collect()
    }

    pub fn visible_count(&self) -> usize {
        if self.loading {
            0
        } else {
            self.visible_indices().len()
        }
    }

    fn reset_selection(&mut self) {
        let has_rows = self.visible_count() > 0;
        self.state.select(if has_rows { Some(0) } else { None });
    }

    pub fn navigate_up(&mut self) {
        let count = self.visible_count();
        if count == 0 {
            return;
        }
        let selected = self.state.selected().unwrap_or(0);
        let new_selected = if selected == 0 { count - 1 } else { selected - 1 };
        self.state.select(Some(new_selected));
    }

    pub fn navigate_down(&mut self) {
        let count = self.visible_count();
        if count == 0 {
            return;
        }
        let new_selected = match self.state.selected() {
            Some(selected) => (selected + 1) % count,
            None => 0,
        };
        self.state.select(Some(new_selected));
    }

    /// Selected record and its position in the supplied rows
    pub fn selected_record(&self) -> Option<(usize, &Record)> {
        if self.loading {
            return None;
        }
        let position = self.state.selected()?;
        let index = *self.visible_indices().get(position)?;
        self.rows.get(index).map(|record| (index, record))
    }

    /// Run the row action for the selected record; false when nothing is selected
    pub fn activate_selected<H: RowActionHandler + ?Sized>(&self, handler: &mut H) -> bool {
        match self.selected_record() {
            Some((index, record)) => {
                handler.on_row_action(index, record);
                true
            }
            None => false,
        }
    }

    fn title(&self) -> String {
        if self.loading {
            return format!("{} (Loading)", self.config.title);
        }
        let shown = self.visible_count();
        let filter = self
            .config
            .filter
            .as_ref()
            .map(|f| format!(" - filter: {}", f))
            .unwrap_or_default();
        if self.rows.is_empty() {
            format!("{} (Empty){}", self.config.title, filter)
        } else if shown == self.rows.len() {
            format!("{} ({}){}", self.config.title, shown, filter)
        } else {
            format!("{} ({}/{}){}", self.config.title, shown, self.rows.len(), filter)
        }
    }

    /// Render the table, or a spinner while loading
    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(self.title())
            .borders(Borders::ALL)
            .border_style(Styles::active_border());

        let (header, rows) = match self.grid() {
            GridView::Loading => {
                let spinner = Paragraph::new(Line::from(vec![
                    Span::styled(self.spinner(), Styles::info()),
                    Span::raw(" Loading..."),
                ]))
                .alignment(Alignment::Center)
                .block(block);
                f.render_widget(spinner, area);
                return;
            }
            GridView::Ready { header, rows } => (header, rows),
        };

        let constraints: Vec<Constraint> = column_widths(&header, &rows)
            .into_iter()
            .map(Constraint::Length)
            .collect();

        let header_row = Row::new(
            header
                .iter()
                .map(|h| Cell::from(Span::styled(h.clone(), Styles::title()))),
        );

        let body = rows.into_iter().map(|row| {
            Row::new(row.cells.into_iter().map(|cell| {
                let text = match cell.style {
                    CellStyle::Severity(_) => format!(" {} ", cell.text),
                    _ => cell.text,
                };
                Cell::from(Span::styled(text, cell.style.style()))
            }))
        });

        let table = Table::new(body, constraints)
            .header(header_row.bottom_margin(1))
            .block(block)
            .column_spacing(2)
            .highlight_style(Styles::selected())
            .highlight_symbol("> ");

        f.render_stateful_widget(table, area, &mut self.state);
    }
}

/// Widest cell per column in display columns; severity badges carry a space each side
fn column_widths(header: &[String], rows: &[GridRow]) -> Vec<u16> {
    let mut widths: Vec<usize> = header.iter().map(|h| h.width()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(&row.cells) {
            let padding = if matches!(cell.style, CellStyle::Severity(_)) { 2 } else { 0 };
            *width = (*width).max(cell.text.width() + padding);
        }
    }
    widths
        .into_iter()
        .map(|w| u16::try_from(w).unwrap_or(u16::MAX))
        .collect()
}
