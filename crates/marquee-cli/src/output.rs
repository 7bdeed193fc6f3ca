//! Output formatting for CLI

use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Table,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "table" => OutputFormat::Table,
            _ => OutputFormat::Text,
        }
    }
}

/// Pretty JSON for `--format json`
pub fn to_json<T: Serialize + ?Sized>(data: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Rounded table of rows
pub fn to_table<T: Tabled>(rows: &[T]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Print rows in the selected format; `text` renders each row on its own
pub fn print_rows<T, F>(rows: &[T], format: OutputFormat, text: F) -> anyhow::Result<()>
where
    T: Serialize + Tabled,
    F: Fn(&T) -> String,
{
    match format {
        OutputFormat::Json => println!("{}", to_json(rows)?),
        OutputFormat::Table => println!("{}", to_table(rows)),
        OutputFormat::Text => {
            for row in rows {
                println!("{}", text(row));
            }
        }
    }
    Ok(())
}

/// `-` for missing optional cells
pub fn display_option<T: std::fmt::Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Tabled)]
    struct Row {
        name: String,
        kind: String,
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::from("JSON"), OutputFormat::Json);
        assert_eq!(OutputFormat::from("table"), OutputFormat::Table);
        assert_eq!(OutputFormat::from("anything"), OutputFormat::Text);
    }

    #[test]
    fn test_table_has_headers_and_cells() {
        let rows = vec![Row {
            name: "News 24".to_string(),
            kind: "hls".to_string(),
        }];
        let table = to_table(&rows);
        assert!(table.contains("name"));
        assert!(table.contains("News 24"));
        assert!(table.contains("hls"));
    }

    #[test]
    fn test_json_rows() {
        let rows = vec![Row {
            name: "Film".to_string(),
            kind: "mp4".to_string(),
        }];
        let json = to_json(&rows).unwrap();
        assert!(json.contains("\"kind\": \"mp4\""));
    }

    #[test]
    fn test_display_option() {
        assert_eq!(display_option::<u32>(&None), "-");
        assert_eq!(display_option(&Some(3)), "3");
    }
}
