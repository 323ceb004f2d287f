//! Core traits for the dashboard screens

use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use crate::table::RecordTable;

/// Actions that can be returned from screen event handling
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenAction {
    /// Set status message
    SetStatus(String),
    /// Set success message
    SetSuccess(String),
    /// Set error message
    SetError(String),
    /// No action taken
    None,
}

/// Core trait for all dashboard screens
pub trait Screen {
    /// Draw the screen content
    fn draw(&mut self, f: &mut Frame, area: Rect);

    /// Handle keyboard input and return an action for the app
    fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction;

    /// Whether typed characters belong to the screen rather than global shortcuts
    fn is_capturing_input(&self) -> bool {
        false
    }

    /// Called when screen becomes active
    fn on_enter(&mut self) {}

    /// Called on every refresh tick
    fn tick(&mut self) {}

    /// Context help for the help popup
    fn help(&self) -> &'static str;
}

/// Trait for screens with navigable lists
pub trait Navigable {
    /// Move selection up
    fn navigate_up(&mut self);

    /// Move selection down
    fn navigate_down(&mut self);

    /// Get currently selected index
    fn get_selected_index(&self) -> Option<usize>;

    /// Set selected index
    fn set_selected_index(&mut self, index: Option<usize>);

    /// Get total number of items
    fn get_item_count(&self) -> usize;

    /// Navigate to first item
    fn navigate_to_first(&mut self) {
        if self.get_item_count() > 0 {
            self.set_selected_index(Some(0));
        }
    }

    /// Navigate to last item
    fn navigate_to_last(&mut self) {
        let count = self.get_item_count();
        if count > 0 {
            self.set_selected_index(Some(count - 1));
        }
    }
}

impl Navigable for RecordTable {
    fn navigate_up(&mut self) {
        RecordTable::navigate_up(self);
    }

    fn navigate_down(&mut self) {
        RecordTable::navigate_down(self);
    }

    fn get_selected_index(&self) -> Option<usize> {
        self.state.selected()
    }

    fn set_selected_index(&mut self, index: Option<usize>) {
        let count = self.visible_count();
        self.state.select(index.filter(|i| *i < count));
    }

    fn get_item_count(&self) -> usize {
        self.visible_count()
    }
}

/// Trait for form handling
pub trait FormHandler {
    /// Get current field index
    fn get_current_field(&self) -> usize;

    /// Set current field
    fn set_current_field(&mut self, field: usize);

    /// Get total number of fields
    fn get_field_count(&self) -> usize;

    /// Move to next field
    fn next_field(&mut self) {
        let total = self.get_field_count();
        if total == 0 {
            return;
        }
        let current = self.get_current_field();
        self.set_current_field((current + 1) % total);
    }

    /// Move to previous field
    fn previous_field(&mut self) {
        let total = self.get_field_count();
        if total == 0 {
            return;
        }
        let current = self.get_current_field();
        self.set_current_field(if current == 0 { total - 1 } else { current - 1 });
    }

    /// Handle character input for current field
    fn handle_char_input(&mut self, c: char);

    /// Handle backspace for current field
    fn handle_backspace(&mut self);

    /// Handle delete for current field
    fn handle_delete(&mut self);

    /// Validate form data
    fn validate(&mut self) -> Result<(), String>;
}
