//! Document templates screen

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use std::path::Path;
use tracing::info;

use crate::{
    dashboard::{
        components::{Form, FormField, FormFieldType},
        traits::{FormHandler, Screen, ScreenAction},
        ui::Styles,
    },
    models::TemplateEntry,
};

const NAME_FIELD: usize = 0;
const DESCRIPTION_FIELD: usize = 1;
const FILE_FIELD: usize = 2;

pub struct TemplatesScreen {
    pub form: Form,
    pub templates: Vec<TemplateEntry>,
    pub editing: bool,
}

impl TemplatesScreen {
    pub fn new() -> Self {
        let mut form = Form::new(vec![
            FormField::new("Template Name", FormFieldType::Text)
                .required()
                .with_placeholder("e.g. Donation acknowledgment"),
            FormField::new("Description", FormFieldType::Text)
                .with_placeholder("What this template is used for"),
            FormField::new("Template File", FormFieldType::FilePath)
                .required()
                .with_placeholder("Path to the template document"),
        ]);
        form.set_active(false);

        Self {
            form,
            templates: Vec::new(),
            editing: false,
        }
    }

    fn set_editing(&mut self, editing: bool) {
        self.editing = editing;
        self.form.set_active(editing);
    }

    /// Add the template described by the form and reset it
    pub fn submit(&mut self) -> ScreenAction {
        if let Err(error) = self.form.validate() {
            if self.form.has_missing_required() {
                return ScreenAction::SetError(
                    "Please select a file and enter a template name".to_string(),
                );
            }
            return ScreenAction::SetError(error);
        }

        let name = self.form.value(NAME_FIELD).to_string();
        let file = self.form.value(FILE_FIELD).to_string();

        let file_name = Path::new(&file)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or(file);

        let entry = TemplateEntry {
            name,
            description: self.form.value(DESCRIPTION_FIELD).to_string(),
            file_name,
            upload_date: chrono::Local::now().date_naive(),
        };
        info!("Added template '{}' ({})", entry.name, entry.file_name);

        let message = format!("Template '{}' added", entry.name);
        self.templates.push(entry);
        self.form.reset();
        ScreenAction::SetSuccess(message)
    }

    fn draw_templates(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!("Templates ({})", self.templates.len()))
            .borders(Borders::ALL)
            .border_style(Styles::inactive_border());

        if self.templates.is_empty() {
            let empty = Paragraph::new("No templates uploaded yet")
                .style(Styles::inactive())
                .block(block);
            f.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = self
            .templates
            .iter()
            .map(|template| {
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(template.name.clone(), Styles::title()),
                        Span::raw(format!("  {}", template.file_name)),
                        Span::styled(
                            format!("  uploaded {}", template.upload_date.format("%Y-%m-%d")),
                            Styles::inactive(),
                        ),
                    ]),
                    Line::from(Span::raw(format!("  {}", template.description))),
                ])
            })
            .collect();

        f.render_widget(List::new(items).block(block), area);
    }
}

impl Default for TemplatesScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for TemplatesScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(area);

        let heading = if self.editing {
            "Upload New Template - Tab: next field | Enter: upload | Esc: done"
        } else {
            "Upload New Template - press Enter or i to edit"
        };
        f.render_widget(Paragraph::new(heading).style(Styles::title()), chunks[0]);

        for (i, field) in self.form.fields.iter().enumerate() {
            field.render(f, chunks[i + 1]);
        }

        self.draw_templates(f, chunks[4]);
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction {
        if !self.editing {
            if matches!(key.code, KeyCode::Enter | KeyCode::Char('i') | KeyCode::Char('n')) {
                self.set_editing(true);
            }
            return ScreenAction::None;
        }

        match key.code {
            KeyCode::Esc => self.set_editing(false),
            KeyCode::Tab | KeyCode::Down => self.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.form.previous_field(),
            KeyCode::Enter => return self.submit(),
            KeyCode::Char(c) => self.form.handle_char_input(c),
            KeyCode::Backspace => self.form.handle_backspace(),
            KeyCode::Delete => self.form.handle_delete(),
            KeyCode::Left => {
                if let Some(field) = self.form.get_current_field_mut() {
                    field.move_cursor_left();
                }
            }
            KeyCode::Right => {
                if let Some(field) = self.form.get_current_field_mut() {
                    field.move_cursor_right();
                }
            }
            _ => {}
        }
        ScreenAction::None
    }

    fn is_capturing_input(&self) -> bool {
        self.editing
    }

    fn help(&self) -> &'static str {
        "Templates:\n\
        Enter / i - Start editing the upload form\n\
        Tab / Shift+Tab - Next/previous field\n\
        Enter (while editing) - Add template\n\
        Esc - Stop editing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(screen: &mut TemplatesScreen, text: &str) {
        for c in text.chars() {
            screen.handle_key_event(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_requires_name_and_file() {
        let mut screen = TemplatesScreen::new();
        screen.handle_key_event(key(KeyCode::Enter));
        assert!(screen.is_capturing_input());

        type_text(&mut screen, "Receipt");
        let action = screen.handle_key_event(key(KeyCode::Enter));
        assert_eq!(
            action,
            ScreenAction::SetError("Please select a file and enter a template name".to_string())
        );
        assert!(screen.templates.is_empty());
        assert_eq!(
            screen.form.fields[FILE_FIELD].validation_error.as_deref(),
            Some("Required")
        );
        assert!(screen.form.fields[NAME_FIELD].validation_error.is_none());
    }

    #[test]
    fn test_adds_template_and_resets_form() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receipt.docx");
        std::fs::write(&path, b"template").unwrap();

        let mut screen = TemplatesScreen::new();
        screen.handle_key_event(key(KeyCode::Char('i')));
        type_text(&mut screen, "Receipt");
        screen.handle_key_event(key(KeyCode::Tab));
        type_text(&mut screen, "Donation acknowledgment");
        screen.handle_key_event(key(KeyCode::Tab));
        type_text(&mut screen, &path.display().to_string());

        let action = screen.handle_key_event(key(KeyCode::Enter));
        assert_eq!(action, ScreenAction::SetSuccess("Template 'Receipt' added".to_string()));

        let template = &screen.templates[0];
        assert_eq!(template.file_name, "receipt.docx");
        assert_eq!(template.description, "Donation acknowledgment");
        assert_eq!(template.upload_date, chrono::Local::now().date_naive());
        assert!(screen.form.fields.iter().all(|f| f.value.is_empty()));
    }

    #[test]
    fn test_missing_file_is_rejected() {
        let mut screen = TemplatesScreen::new();
        screen.handle_key_event(key(KeyCode::Enter));
        type_text(&mut screen, "Receipt");
        screen.handle_key_event(key(KeyCode::Tab));
        screen.handle_key_event(key(KeyCode::Tab));
        type_text(&mut screen, "/nonexistent/receipt.docx");

        let action = screen.handle_key_event(key(KeyCode::Enter));
        assert_eq!(
            action,
            ScreenAction::SetError("Template File: File not found".to_string())
        );
    }

    #[test]
    fn test_escape_stops_editing() {
        let mut screen = TemplatesScreen::new();
        screen.handle_key_event(key(KeyCode::Enter));
        screen.handle_key_event(key(KeyCode::Esc));
        assert!(!screen.is_capturing_input());
        assert!(screen.form.fields.iter().all(|f| !f.is_focused));
    }
}
