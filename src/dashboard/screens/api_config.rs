//! API configuration screen

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use crate::{
    api::integration_endpoints,
    config::Config,
    dashboard::{
        traits::{Screen, ScreenAction},
        ui::{mask_secret, Styles},
    },
    models::{ApiEndpoint, ApiKeyEntry},
};

const NOT_CONFIGURED: &str = "not configured";

pub struct ApiConfigScreen {
    pub keys: Vec<ApiKeyEntry>,
    pub endpoints: Vec<ApiEndpoint>,
    pub reveal_keys: bool,
}

impl ApiConfigScreen {
    pub fn new(config: &Config) -> Self {
        let keys = [
            ("Primary API Key", &config.api_key),
            ("Secondary API Key", &config.secondary_api_key),
        ]
        .into_iter()
        .map(|(label, value)| ApiKeyEntry {
            label: label.to_string(),
            value: value.clone().unwrap_or_else(|| NOT_CONFIGURED.to_string()),
        })
        .collect();

        Self {
            keys,
            endpoints: integration_endpoints(config),
            reveal_keys: false,
        }
    }

    /// Text shown for a key, masked unless revealed
    pub fn display_key(&self, entry: &ApiKeyEntry) -> String {
        if self.reveal_keys || entry.value == NOT_CONFIGURED {
            entry.value.clone()
        } else {
            mask_secret(&entry.value)
        }
    }
}

impl Screen for ApiConfigScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(self.keys.len() as u16 * 2 + 2),
                Constraint::Min(0),
            ])
            .split(area);

        let key_items: Vec<ListItem> = self
            .keys
            .iter()
            .map(|entry| {
                ListItem::new(vec![
                    Line::from(Span::styled(entry.label.clone(), Styles::title())),
                    Line::from(Span::raw(format!("  {}", self.display_key(entry)))),
                ])
            })
            .collect();

        let keys_title = if self.reveal_keys {
            "API Keys (v: hide)"
        } else {
            "API Keys (v: reveal)"
        };
        let keys = List::new(key_items).block(
            Block::default()
                .title(keys_title)
                .borders(Borders::ALL)
                .border_style(Styles::active_border()),
        );
        f.render_widget(keys, chunks[0]);

        let endpoint_items: Vec<ListItem> = self
            .endpoints
            .iter()
            .map(|api| {
                ListItem::new(vec![
                    Line::from(Span::styled(api.name.clone(), Styles::title())),
                    Line::from(Span::styled(format!("  {}", api.endpoint), Styles::info())),
                ])
            })
            .collect();

        let endpoints = List::new(endpoint_items).block(
            Block::default()
                .title("API Endpoints")
                .borders(Borders::ALL)
                .border_style(Styles::inactive_border()),
        );
        f.render_widget(endpoints, chunks[1]);
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction {
        if let KeyCode::Char('v') = key.code {
            self.reveal_keys = !self.reveal_keys;
            let state = if self.reveal_keys { "revealed" } else { "hidden" };
            return ScreenAction::SetStatus(format!("API keys {}", state));
        }
        ScreenAction::None
    }

    fn help(&self) -> &'static str {
        "API Configuration:\n\
        v - Reveal/hide API keys"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_keys_masked_until_revealed() {
        let config = Config {
            api_key: Some("ngo_0123456789abcdef".to_string()),
            ..Default::default()
        };
        let mut screen = ApiConfigScreen::new(&config);

        let primary = screen.keys[0].clone();
        assert!(screen.display_key(&primary).ends_with("cdef"));
        assert!(!screen.display_key(&primary).contains("ngo_"));
        assert_eq!(screen.display_key(&screen.keys[1].clone()), "not configured");

        let action = screen.handle_key_event(KeyEvent::new(KeyCode::Char('v'), KeyModifiers::NONE));
        assert_eq!(action, ScreenAction::SetStatus("API keys revealed".to_string()));
        assert_eq!(screen.display_key(&primary), "ngo_0123456789abcdef");
    }

    #[test]
    fn test_endpoints_follow_configured_base() {
        let config = Config {
            api_url: "https://portal.example.org".to_string(),
            ..Default::default()
        };
        let screen = ApiConfigScreen::new(&config);
        assert_eq!(screen.endpoints[1].endpoint, "https://portal.example.org/api/v1/recipient");
    }
}
