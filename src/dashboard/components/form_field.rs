//! Form field component for user input

use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::path::Path;
use unicode_width::UnicodeWidthStr;

use crate::dashboard::{traits::FormHandler, ui::Styles};

/// Type of form field
#[derive(Debug, Clone, PartialEq)]
pub enum FormFieldType {
    Text,
    FilePath,
}

/// Individual form field
#[derive(Debug, Clone)]
pub struct FormField {
    pub label: String,
    pub value: String,
    pub placeholder: String,
    pub field_type: FormFieldType,
    pub required: bool,
    pub is_focused: bool,
    /// Cursor position in characters
    pub cursor_position: usize,
    pub validation_error: Option<String>,
}

impl FormField {
    pub fn new(label: &str, field_type: FormFieldType) -> Self {
        Self {
            label: label.to_string(),
            value: String::new(),
            placeholder: String::new(),
            field_type,
            required: false,
            is_focused: false,
            cursor_position: 0,
            validation_error: None,
        }
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self.cursor_position = value.chars().count();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.is_focused = focused;
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    /// Display columns between the start of the value and the cursor
    pub fn cursor_offset(&self) -> u16 {
        u16::try_from(self.value[..self.byte_index()].width()).unwrap_or(u16::MAX)
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    pub fn insert_char(&mut self, c: char) {
        let index = self.byte_index();
        self.value.insert(index, c);
        self.cursor_position += 1;
        self.validation_error = None;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let index = self.byte_index();
            self.value.remove(index);
            self.validation_error = None;
        }
    }

    pub fn delete_char_forward(&mut self) {
        if self.cursor_position < self.char_count() {
            let index = self.byte_index();
            self.value.remove(index);
            self.validation_error = None;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.char_count() {
            self.cursor_position += 1;
        }
    }

    pub fn move_cursor_to_start(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_to_end(&mut self) {
        self.cursor_position = self.char_count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor_position = 0;
        self.validation_error = None;
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// Render the form field
    pub fn render(&self, f: &mut Frame, area: Rect) {
        let display_text = if self.value.is_empty() && !self.placeholder.is_empty() {
            &self.placeholder
        } else {
            &self.value
        };

        let border_style = if self.is_focused {
            Styles::active_border()
        } else if self.validation_error.is_some() {
            Styles::error()
        } else {
            Styles::inactive_border()
        };

        let title = if let Some(ref error) = self.validation_error {
            format!("{} - Error: {}", self.label, error)
        } else if self.required {
            format!("{} *", self.label)
        } else {
            self.label.clone()
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style);

        let text_style = if self.value.is_empty() && !self.placeholder.is_empty() {
            Styles::inactive()
        } else {
            Styles::default()
        };

        let paragraph = Paragraph::new(display_text.to_string())
            .style(text_style)
            .block(block);

        f.render_widget(paragraph, area);

        if self.is_focused {
            let cursor_x = (area.x + 1).saturating_add(self.cursor_offset());
            let cursor_y = area.y + 1;
            if cursor_x < area.x + area.width.saturating_sub(1) {
                f.set_cursor(cursor_x, cursor_y);
            }
        }
    }

    /// Validate field value
    pub fn validate(&mut self) -> bool {
        self.validation_error = None;

        if self.required && self.is_empty() {
            self.validation_error = Some("Required".to_string());
            return false;
        }

        if self.field_type == FormFieldType::FilePath && !self.is_empty() {
            if !Path::new(self.value.trim()).is_file() {
                self.validation_error = Some("File not found".to_string());
                return false;
            }
        }

        true
    }
}

/// Form container that manages multiple fields
pub struct Form {
    pub fields: Vec<FormField>,
    pub current_field: usize,
}

impl Form {
    pub fn new(fields: Vec<FormField>) -> Self {
        let mut form = Self {
            fields,
            current_field: 0,
        };
        form.update_focus();
        form
    }

    fn update_focus(&mut self) {
        for (i, field) in self.fields.iter_mut().enumerate() {
            field.set_focus(i == self.current_field);
        }
    }

    /// Drop focus from every field, or restore it to the current one
    pub fn set_active(&mut self, active: bool) {
        if active {
            self.update_focus();
        } else {
            for field in &mut self.fields {
                field.set_focus(false);
            }
        }
    }

    pub fn get_field(&self, index: usize) -> Option<&FormField> {
        self.fields.get(index)
    }

    pub fn get_current_field_mut(&mut self) -> Option<&mut FormField> {
        self.fields.get_mut(self.current_field)
    }

    /// Trimmed value of the field at `index`
    pub fn value(&self, index: usize) -> &str {
        self.get_field(index).map(|f| f.value.trim()).unwrap_or_default()
    }

    /// Clear every field and focus the first
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.clear();
        }
        self.current_field = 0;
        self.update_focus();
    }

    /// Whether a required field is still blank
    pub fn has_missing_required(&self) -> bool {
        self.fields.iter().any(|f| f.required && f.is_empty())
    }

    /// Validate all fields
    pub fn validate_all(&mut self) -> bool {
        let mut all_valid = true;
        for field in &mut self.fields {
            if !field.validate() {
                all_valid = false;
            }
        }
        all_valid
    }
}

impl FormHandler for Form {
    fn get_current_field(&self) -> usize {
        self.current_field
    }

    fn set_current_field(&mut self, field: usize) {
        if field < self.fields.len() {
            self.current_field = field;
            self.update_focus();
        }
    }

    fn get_field_count(&self) -> usize {
        self.fields.len()
    }

    fn handle_char_input(&mut self, c: char) {
        if let Some(field) = self.get_current_field_mut() {
            field.insert_char(c);
        }
    }

    fn handle_backspace(&mut self) {
        if let Some(field) = self.get_current_field_mut() {
            field.delete_char();
        }
    }

    fn handle_delete(&mut self) {
        if let Some(field) = self.get_current_field_mut() {
            field.delete_char_forward();
        }
    }

    fn validate(&mut self) -> Result<(), String> {
        self.validate_all();
        for field in &self.fields {
            if let Some(ref error) = field.validation_error {
                return Err(format!("{}: {}", field.label, error));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editing_handles_multibyte_input() {
        let mut field = FormField::new("Name", FormFieldType::Text).with_value("Jose");
        field.move_cursor_left();
        field.delete_char_forward();
        field.insert_char('é');
        assert_eq!(field.value, "José");

        field.delete_char();
        field.insert_char('e');
        field.move_cursor_to_start();
        field.insert_char('¡');
        assert_eq!(field.value, "¡Jose");
    }

    #[test]
    fn test_cursor_offset_counts_display_width() {
        let mut field = FormField::new("Name", FormFieldType::Text).with_value("日本a");
        assert_eq!(field.cursor_offset(), 5);
        field.move_cursor_left();
        assert_eq!(field.cursor_offset(), 4);
        field.move_cursor_to_start();
        assert_eq!(field.cursor_offset(), 0);
    }

    #[test]
    fn test_required_and_file_validation() {
        let mut form = Form::new(vec![
            FormField::new("Template Name", FormFieldType::Text).required(),
            FormField::new("File", FormFieldType::FilePath).with_value("/nonexistent/template.docx"),
        ]);

        let error = form.validate().unwrap_err();
        assert!(error.starts_with("Template Name"));
        assert!(form.has_missing_required());
        assert_eq!(form.fields[1].validation_error.as_deref(), Some("File not found"));

        let file = tempfile::NamedTempFile::new().unwrap();
        form.set_current_field(1);
        form.get_current_field_mut().unwrap().clear();
        for c in file.path().display().to_string().chars() {
            form.handle_char_input(c);
        }
        form.set_current_field(0);
        form.handle_char_input('A');
        assert!(form.validate().is_ok());
        assert!(!form.has_missing_required());
    }

    #[test]
    fn test_field_navigation_wraps() {
        let mut form = Form::new(vec![
            FormField::new("A", FormFieldType::Text),
            FormField::new("B", FormFieldType::Text),
        ]);
        form.previous_field();
        assert_eq!(form.get_current_field(), 1);
        assert!(form.fields[1].is_focused);
        form.next_field();
        assert_eq!(form.get_current_field(), 0);

        form.set_active(false);
        assert!(form.fields.iter().all(|f| !f.is_focused));
    }
}
