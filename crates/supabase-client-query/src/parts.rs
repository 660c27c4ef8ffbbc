use serde_json::Value as JsonValue;

use crate::count::CountMode;
use crate::filter::FilterPredicate;
use crate::modifier::OrderClause;

/// Which PostgREST verb a builder will issue.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Select,
    Insert(JsonValue),
    Upsert(JsonValue),
    Update(JsonValue),
    Delete,
}

/// Whether write operations return the affected rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Returning {
    #[default]
    Representation,
    Minimal,
}

impl Returning {
    pub(crate) fn prefer_value(self) -> &'static str {
        match self {
            Self::Representation => "return=representation",
            Self::Minimal => "return=minimal",
        }
    }
}

/// Column projection and count options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectSpec {
    /// Projected columns; empty means the server default (`*`).
    pub columns: Vec<String>,
    pub count: CountMode,
    /// Issue a HEAD request and only report the count.
    pub head: bool,
}

/// Accumulated request state of a query builder.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParts {
    pub table: String,
    pub operation: Operation,
    pub select: SelectSpec,
    pub filters: Vec<FilterPredicate>,
    pub orders: Vec<OrderClause>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub returning: Returning,
    pub on_conflict: Vec<String>,
    pub ignore_duplicates: bool,
    pub schema_override: Option<String>,
}

impl QueryParts {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            operation: Operation::Select,
            select: SelectSpec::default(),
            filters: Vec::new(),
            orders: Vec::new(),
            limit: None,
            offset: None,
            returning: Returning::default(),
            on_conflict: Vec::new(),
            ignore_duplicates: false,
            schema_override: None,
        }
    }

    pub fn is_read(&self) -> bool {
        matches!(self.operation, Operation::Select)
    }
}

/// Split a select string into columns.
///
/// Commas inside parentheses (embedded resources such as
/// `cities(name,id)`) do not split. Whitespace outside quotes and the
/// quotes themselves are removed. Returns `None` when the string holds no
/// column or an empty entry.
pub fn split_columns(columns: &str) -> Option<Vec<String>> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quoted = false;

    for ch in columns.chars() {
        match ch {
            '"' => quoted = !quoted,
            c if c.is_whitespace() && !quoted => {}
            '(' if !quoted => {
                depth += 1;
                current.push(ch);
            }
            ')' if !quoted => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ',' if !quoted && depth == 0 => {
                if current.is_empty() {
                    return None;
                }
                out.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }

    if current.is_empty() {
        return None;
    }
    out.push(current);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_simple() {
        assert_eq!(split_columns("*"), Some(vec!["*".to_string()]));
        assert_eq!(
            split_columns("id, name"),
            Some(vec!["id".to_string(), "name".to_string()])
        );
    }

    #[test]
    fn split_strips_quotes() {
        assert_eq!(
            split_columns("\"name\", \"country_id\""),
            Some(vec!["name".to_string(), "country_id".to_string()])
        );
    }

    #[test]
    fn split_keeps_embedded_resources() {
        assert_eq!(
            split_columns("name, cities ( id, name )"),
            Some(vec!["name".to_string(), "cities(id,name)".to_string()])
        );
    }

    #[test]
    fn split_rejects_empty() {
        assert_eq!(split_columns(""), None);
        assert_eq!(split_columns("   "), None);
        assert_eq!(split_columns("id,,name"), None);
        assert_eq!(split_columns("id,"), None);
    }

    #[test]
    fn new_parts_defaults() {
        let parts = QueryParts::new("countries");
        assert!(parts.is_read());
        assert!(parts.filters.is_empty());
        assert_eq!(parts.select.count, CountMode::None);
        assert_eq!(parts.returning, Returning::Representation);
    }
}
