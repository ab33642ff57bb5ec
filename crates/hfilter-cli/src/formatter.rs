//! Output formatters for parsed filters.

use clap::ValueEnum;
use comfy_table::{Cell, Table};
use hfilter_proto::{CompareFilter, Filter};
use serde_json::json;

/// Output format for parsed filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Indented tree
    Tree,
    /// JSON document
    Json,
    /// Canonical filter expression
    Text,
    /// Table of leaf filters
    Table,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Tree => write!(f, "tree"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Table => write!(f, "table"),
        }
    }
}

impl OutputFormat {
    /// Parse a format name as typed in the REPL.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "tree" => Some(OutputFormat::Tree),
            "json" => Some(OutputFormat::Json),
            "text" => Some(OutputFormat::Text),
            "table" => Some(OutputFormat::Table),
            _ => None,
        }
    }
}

/// Trait for formatting output.
pub trait Formatter: Send + Sync {
    /// Format a parsed filter.
    fn format_filter(&self, filter: &Filter) -> String;

    /// Format an error message.
    fn format_error(&self, error: &str) -> String;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Tree => Box::new(TreeFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Table => Box::new(TableFormatter),
    }
}

/// Indented tree formatter.
pub struct TreeFormatter;

impl Formatter for TreeFormatter {
    fn format_filter(&self, filter: &Filter) -> String {
        let mut output = String::new();
        write_tree(filter, "", "", &mut output);
        output.trim_end().to_string()
    }

    fn format_error(&self, error: &str) -> String {
        error.to_string()
    }
}

fn write_tree(filter: &Filter, first: &str, rest: &str, out: &mut String) {
    out.push_str(first);
    out.push_str(&describe(filter));
    out.push('\n');

    if let Filter::Composite(list) = filter {
        let last = list.members().len().saturating_sub(1);
        for (i, member) in list.members().iter().enumerate() {
            let (branch, indent) = if i == last {
                ("└── ", "    ")
            } else {
                ("├── ", "│   ")
            };
            write_tree(
                member,
                &format!("{}{}", rest, branch),
                &format!("{}{}", rest, indent),
                out,
            );
        }
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_filter(&self, filter: &Filter) -> String {
        serde_json::to_string_pretty(&filter_to_json(filter)).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_error(&self, error: &str) -> String {
        json!({ "error": error }).to_string()
    }
}

/// Canonical filter text formatter.
pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format_filter(&self, filter: &Filter) -> String {
        filter.to_string()
    }

    fn format_error(&self, error: &str) -> String {
        error.to_string()
    }
}

/// Table formatter using comfy-table, one row per leaf.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_filter(&self, filter: &Filter) -> String {
        let mut table = Table::new();
        table.set_header(vec!["path", "filter", "column", "op", "comparator"]);

        let mut rows = Vec::new();
        collect_rows(filter, &mut Vec::new(), &mut rows);
        let leaf_count = rows.len();
        for row in rows {
            table.add_row(row.into_iter().map(Cell::new).collect::<Vec<_>>());
        }

        format!("{}\n{} leaf filter(s)", table, leaf_count)
    }

    fn format_error(&self, error: &str) -> String {
        format!("Error: {}", error)
    }
}

fn collect_rows(filter: &Filter, path: &mut Vec<usize>, rows: &mut Vec<Vec<String>>) {
    match filter {
        Filter::Composite(list) => {
            for (i, member) in list.members().iter().enumerate() {
                path.push(i);
                collect_rows(member, path, rows);
                path.pop();
            }
        }
        Filter::RowPrefix(p) => rows.push(vec![
            format_path(path),
            "PrefixFilter".to_string(),
            String::new(),
            String::new(),
            format!("prefix:{}", text(&p.prefix)),
        ]),
        Filter::Value(v) => rows.push(vec![
            format_path(path),
            "ValueFilter".to_string(),
            String::new(),
            v.compare.op.token().to_string(),
            v.compare.comparator.to_string(),
        ]),
        Filter::SingleColumnValue(s) => rows.push(vec![
            format_path(path),
            "SingleColumnValueFilter".to_string(),
            format!("{}:{}", text(&s.family), text(&s.qualifier)),
            s.compare.op.token().to_string(),
            s.compare.comparator.to_string(),
        ]),
    }
}

/// Dotted member indices from the root; `-` for the root itself.
fn format_path(path: &[usize]) -> String {
    if path.is_empty() {
        "-".to_string()
    } else {
        path.iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// One-line description of a filter node.
fn describe(filter: &Filter) -> String {
    match filter {
        Filter::RowPrefix(p) => format!("PrefixFilter '{}'", text(&p.prefix)),
        Filter::Value(v) => format!("ValueFilter {}", describe_compare(&v.compare)),
        Filter::SingleColumnValue(s) => format!(
            "SingleColumnValueFilter {}:{} {} (filterIfMissing={}, latestVersionOnly={})",
            text(&s.family),
            text(&s.qualifier),
            describe_compare(&s.compare),
            s.filter_if_missing,
            s.latest_version_only
        ),
        Filter::Composite(list) => format!("FilterList {}", list.operator().name()),
    }
}

fn describe_compare(compare: &CompareFilter) -> String {
    format!("{} '{}'", compare.op.name(), compare.comparator)
}

/// Convert a filter to JSON with byte payloads shown as text.
fn filter_to_json(filter: &Filter) -> serde_json::Value {
    match filter {
        Filter::RowPrefix(p) => json!({
            "type": "PrefixFilter",
            "name": filter.name(),
            "prefix": text(&p.prefix),
        }),
        Filter::Value(v) => json!({
            "type": "ValueFilter",
            "name": filter.name(),
            "compare": compare_to_json(&v.compare),
        }),
        Filter::SingleColumnValue(s) => json!({
            "type": "SingleColumnValueFilter",
            "name": filter.name(),
            "family": text(&s.family),
            "qualifier": text(&s.qualifier),
            "compare": compare_to_json(&s.compare),
            "filterIfMissing": s.filter_if_missing,
            "latestVersionOnly": s.latest_version_only,
        }),
        Filter::Composite(list) => json!({
            "type": "FilterList",
            "name": filter.name(),
            "operator": list.operator().name(),
            "filters": list.members().iter().map(filter_to_json).collect::<Vec<_>>(),
        }),
    }
}

fn compare_to_json(compare: &CompareFilter) -> serde_json::Value {
    let comparator = &compare.comparator;
    json!({
        "op": compare.op.name(),
        "comparator": comparator.name(),
        "value": comparator.payload().map(text),
    })
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hfilter_proto::{CompareType, Comparator, ListOperator};

    fn sample() -> Filter {
        Filter::composite(
            ListOperator::MustPassOne,
            vec![
                Filter::row_prefix("age"),
                Filter::row_prefix("age")
                    .and(Filter::value(CompareType::Equal, Comparator::substring("18"))),
            ],
        )
    }

    #[test]
    fn test_tree_format() {
        let output = TreeFormatter.format_filter(&sample());
        let expected = "\
FilterList MUST_PASS_ONE
├── PrefixFilter 'age'
└── FilterList MUST_PASS_ALL
    ├── PrefixFilter 'age'
    └── ValueFilter EQUAL 'substring:18'";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_json_format() {
        let output = JsonFormatter.format_filter(&sample());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["operator"], "MUST_PASS_ONE");
        assert_eq!(value["filters"][0]["prefix"], "age");
        assert_eq!(value["filters"][1]["filters"][1]["compare"]["value"], "18");
        assert_eq!(
            value["filters"][1]["filters"][1]["compare"]["comparator"],
            "org.apache.hadoop.hbase.filter.SubstringComparator"
        );
    }

    #[test]
    fn test_json_null_comparator_has_no_value() {
        let filter = Filter::value(CompareType::NotEqual, Comparator::Null);
        let value: serde_json::Value =
            serde_json::from_str(&JsonFormatter.format_filter(&filter)).unwrap();
        assert!(value["compare"]["value"].is_null());
    }

    #[test]
    fn test_text_format() {
        assert_eq!(
            TextFormatter.format_filter(&sample()),
            "PrefixFilter('age') OR (PrefixFilter('age') AND ValueFilter(=, 'substring:18'))"
        );
    }

    #[test]
    fn test_table_format() {
        let output = TableFormatter.format_filter(&sample());
        assert!(output.contains("1.1"));
        assert!(output.contains("substring:18"));
        assert!(output.ends_with("3 leaf filter(s)"));
    }

    #[test]
    fn test_format_path() {
        assert_eq!(format_path(&[]), "-");
        assert_eq!(format_path(&[1, 0, 2]), "1.0.2");
    }

    #[test]
    fn test_format_names() {
        assert_eq!(OutputFormat::from_name("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_name("csv"), None);
        assert_eq!(OutputFormat::Table.to_string(), "table");
    }
}
