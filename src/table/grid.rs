//! Grid model for the record table
//!
//! `build_grid` turns field descriptors and records into the cells a table
//! shows. It owns no state, so every render starts from the inputs.

use std::collections::HashSet;

use super::priority::{classify, CellStyle};
use crate::models::{FieldDescriptor, Record};

/// Display configuration for a record table
#[derive(Debug, Clone)]
pub struct TableConfig {
    pub title: String,
    pub action_header: String,
    pub action_label: String,
    pub priority_columns: HashSet<String>,
    pub filter: Option<String>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            title: "Records".to_string(),
            action_header: "Additional Info".to_string(),
            action_label: "Click to know".to_string(),
            priority_columns: HashSet::new(),
            filter: None,
        }
    }
}

impl TableConfig {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Default::default()
        }
    }

    pub fn with_priority_column(mut self, key: &str) -> Self {
        self.priority_columns.insert(key.to_string());
        self
    }

    pub fn with_filter(mut self, filter: &str) -> Self {
        self.set_filter(filter);
        self
    }

    /// Set the search filter; blank text clears it
    pub fn set_filter(&mut self, filter: &str) {
        let filter = filter.trim();
        self.filter = if filter.is_empty() {
            None
        } else {
            Some(filter.to_lowercase())
        };
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub text: String,
    pub style: CellStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridRow {
    /// Position of the record in the supplied rows
    pub index: usize,
    pub cells: Vec<GridCell>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GridView {
    Loading,
    Ready {
        header: Vec<String>,
        rows: Vec<GridRow>,
    },
}

impl GridView {
    pub fn header(&self) -> &[String] {
        match self {
            GridView::Loading => &[],
            GridView::Ready { header, .. } => header,
        }
    }

    pub fn rows(&self) -> &[GridRow] {
        match self {
            GridView::Loading => &[],
            GridView::Ready { rows, .. } => rows,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, GridView::Loading)
    }
}

/// Build the grid for `fields` and `rows`.
///
/// Each body row holds one cell per field followed by the action cell.
/// Keys missing from a record give empty cells.
pub fn build_grid(
    fields: &[FieldDescriptor],
    rows: &[Record],
    loading: bool,
    config: &TableConfig,
) -> GridView {
    if loading {
        return GridView::Loading;
    }

    let mut header: Vec<String> = fields.iter().map(|f| f.label.clone()).collect();
    header.push(config.action_header.clone());

    let rows = visible_rows(fields, rows, config.filter.as_deref())
        .map(|(index, record)| {
            let mut cells: Vec<GridCell> = fields
                .iter()
                .map(|field| {
                    let text = record.get(&field.key).unwrap_or_default().to_string();
                    let style = if config.priority_columns.contains(&field.key) {
                        classify(&text)
                    } else {
                        CellStyle::Plain
                    };
                    GridCell { text, style }
                })
                .collect();
            cells.push(GridCell {
                text: config.action_label.clone(),
                style: CellStyle::Action,
            });
            GridRow { index, cells }
        })
        .collect();

    GridView::Ready { header, rows }
}

/// Records matching the lowercase `filter` on any displayed field, with their positions
pub fn visible_rows<'a>(
    fields: &'a [FieldDescriptor],
    rows: &'a [Record],
    filter: Option<&'a str>,
) -> impl Iterator<Item = (usize, &'a Record)> + 'a {
    rows.iter().enumerate().filter(move |(_, record)| match filter {
        None => true,
        Some(needle) => fields.iter().any(|field| {
            record
                .get(&field.key)
                .map(|value| value.to_lowercase().contains(needle))
                .unwrap_or(false)
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriorityTier;

    fn recipient_fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("name", "Recipient Name"),
            FieldDescriptor::new("email", "Email"),
            FieldDescriptor::new("priority", "Priority"),
        ]
    }

    fn recipient_rows() -> Vec<Record> {
        vec![
            Record::new()
                .with("name", "Maria Garcia")
                .with("email", "maria.g@email.com")
                .with("priority", "High"),
            Record::new()
                .with("name", "Sarah Johnson")
                .with("email", "sarah.j@email.com")
                .with("priority", "low"),
            Record::new().with("name", "Ahmed Hassan").with("priority", "someday"),
        ]
    }

    #[test]
    fn test_single_column_scenario() {
        let fields = vec![FieldDescriptor::new("name", "Name")];
        let rows = vec![Record::new().with("name", "A"), Record::new().with("name", "B")];

        let grid = build_grid(&fields, &rows, false, &TableConfig::default());

        assert_eq!(grid.header(), ["Name", "Additional Info"]);
        assert_eq!(grid.rows().len(), 2);
        assert_eq!(grid.rows()[0].cells[0].text, "A");
        assert_eq!(grid.rows()[1].cells[0].text, "B");
        assert_eq!(grid.rows()[1].cells[1].text, "Click to know");
        assert_eq!(grid.rows()[1].cells[1].style, CellStyle::Action);
    }

    #[test]
    fn test_dimensions_follow_inputs() {
        let fields = recipient_fields();
        let rows = recipient_rows();
        let grid = build_grid(&fields, &rows, false, &TableConfig::default());

        assert_eq!(grid.header().len(), fields.len() + 1);
        assert_eq!(grid.rows().len(), rows.len());
        for row in grid.rows() {
            assert_eq!(row.cells.len(), fields.len() + 1);
        }
    }

    #[test]
    fn test_header_follows_field_order() {
        let mut fields = recipient_fields();
        fields.reverse();
        let grid = build_grid(&fields, &[], false, &TableConfig::default());
        assert_eq!(grid.header(), ["Priority", "Email", "Recipient Name", "Additional Info"]);
    }

    #[test]
    fn test_missing_keys_render_empty() {
        let grid = build_grid(&recipient_fields(), &recipient_rows(), false, &TableConfig::default());
        let ahmed = &grid.rows()[2];
        assert_eq!(ahmed.cells[1].text, "");
        assert_eq!(ahmed.cells[1].style, CellStyle::Plain);
    }

    #[test]
    fn test_empty_rows_keep_header() {
        let grid = build_grid(&recipient_fields(), &[], false, &TableConfig::default());
        assert!(!grid.is_loading());
        assert_eq!(grid.header().len(), 4);
        assert!(grid.rows().is_empty());
    }

    #[test]
    fn test_loading_hides_rows() {
        let grid = build_grid(&recipient_fields(), &recipient_rows(), true, &TableConfig::default());
        assert_eq!(grid, GridView::Loading);
        assert!(grid.rows().is_empty());
        assert!(grid.header().is_empty());
    }

    #[test]
    fn test_priority_column_styling() {
        let config = TableConfig::new("Recipients").with_priority_column("priority");
        let grid = build_grid(&recipient_fields(), &recipient_rows(), false, &config);

        assert_eq!(grid.rows()[0].cells[2].style, CellStyle::Severity(PriorityTier::High));
        assert_eq!(grid.rows()[1].cells[2].style, CellStyle::Severity(PriorityTier::Low));
        assert_eq!(grid.rows()[2].cells[2].style, CellStyle::Plain);
        assert_eq!(grid.rows()[0].cells[2].text, "High");
    }

    #[test]
    fn test_priority_ignored_without_designation() {
        let grid = build_grid(&recipient_fields(), &recipient_rows(), false, &TableConfig::default());
        assert!(grid.rows().iter().all(|row| row.cells[2].style == CellStyle::Plain));
    }

    #[test]
    fn test_filter_keeps_original_positions() {
        let config = TableConfig::default().with_filter("  SARAH ");
        let grid = build_grid(&recipient_fields(), &recipient_rows(), false, &config);

        assert_eq!(grid.rows().len(), 1);
        assert_eq!(grid.rows()[0].index, 1);
        assert_eq!(grid.rows()[0].cells[0].text, "Sarah Johnson");
    }

    #[test]
    fn test_filter_only_matches_displayed_fields() {
        let fields = vec![FieldDescriptor::new("name", "Name")];
        let rows = vec![Record::new().with("name", "A").with("secret", "needle")];
        let config = TableConfig::default().with_filter("needle");
        let grid = build_grid(&fields, &rows, false, &config);
        assert!(grid.rows().is_empty());
    }

    #[test]
    fn test_blank_filter_clears() {
        let mut config = TableConfig::default().with_filter("maria");
        config.set_filter("   ");
        assert!(config.filter.is_none());
    }
}
