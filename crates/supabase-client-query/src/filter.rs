use std::fmt;

/// PostgREST filter operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    ILike,
    In,
    Is,
    /// `@>`
    Contains,
    /// `<@`
    ContainedBy,
    /// `&&`
    Overlaps,
    /// `<<`
    RangeLt,
    /// `>>`
    RangeGt,
    /// `&<`
    RangeLte,
    /// `&>`
    RangeGte,
    /// `-|-`
    RangeAdjacent,
    Fts,
    Plfts,
    Phfts,
    Wfts,
}

impl FilterOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Like => "like",
            Self::ILike => "ilike",
            Self::In => "in",
            Self::Is => "is",
            Self::Contains => "cs",
            Self::ContainedBy => "cd",
            Self::Overlaps => "ov",
            Self::RangeLt => "sl",
            Self::RangeGt => "sr",
            Self::RangeLte => "nxr",
            Self::RangeGte => "nxl",
            Self::RangeAdjacent => "adj",
            Self::Fts => "fts",
            Self::Plfts => "plfts",
            Self::Phfts => "phfts",
            Self::Wfts => "wfts",
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values accepted by [`Filterable::is`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsValue {
    Null,
    NotNull,
    True,
    False,
    Unknown,
}

impl IsValue {
    fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::NotNull => "not.null",
            Self::True => "true",
            Self::False => "false",
            Self::Unknown => "unknown",
        }
    }
}

/// Full-text search flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSearchType {
    /// `to_tsquery`
    Default,
    /// `plainto_tsquery`
    Plain,
    /// `phraseto_tsquery`
    Phrase,
    /// `websearch_to_tsquery`
    Websearch,
}

impl TextSearchType {
    fn operator(self) -> FilterOperator {
        match self {
            Self::Default => FilterOperator::Fts,
            Self::Plain => FilterOperator::Plfts,
            Self::Phrase => FilterOperator::Phfts,
            Self::Websearch => FilterOperator::Wfts,
        }
    }
}

/// One filter condition, rendered as `column=operator.value`.
///
/// Logical groups (`or`) have an empty operator and render as
/// `or=<value>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPredicate {
    pub column: String,
    pub operator: String,
    pub value: String,
}

impl FilterPredicate {
    pub fn new(
        column: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }

    /// The `(key, value)` query pair for this predicate.
    pub fn to_query_pair(&self) -> (String, String) {
        if self.operator.is_empty() {
            (self.column.clone(), self.value.clone())
        } else {
            (
                self.column.clone(),
                format!("{}.{}", self.operator, self.value),
            )
        }
    }
}

/// Trait providing all filter methods for query builders.
///
/// Every call appends one predicate; nothing is replaced or reordered, so
/// multiple filters on the same column are AND-combined.
pub trait Filterable: Sized {
    /// Get a mutable reference to the filter list.
    fn filters_mut(&mut self) -> &mut Vec<FilterPredicate>;

    /// Generic filter. `operator` is emitted verbatim, e.g. `"eq"`, `"not.in"`.
    fn filter(mut self, column: &str, operator: &str, value: impl fmt::Display) -> Self {
        self.filters_mut()
            .push(FilterPredicate::new(column, operator, value.to_string()));
        self
    }

    /// Filter: column = value
    fn eq(self, column: &str, value: impl fmt::Display) -> Self {
        self.filter(column, FilterOperator::Eq.as_str(), value)
    }

    /// Filter: column != value
    fn neq(self, column: &str, value: impl fmt::Display) -> Self {
        self.filter(column, FilterOperator::Neq.as_str(), value)
    }

    /// Filter: column > value
    fn gt(self, column: &str, value: impl fmt::Display) -> Self {
        self.filter(column, FilterOperator::Gt.as_str(), value)
    }

    /// Filter: column >= value
    fn gte(self, column: &str, value: impl fmt::Display) -> Self {
        self.filter(column, FilterOperator::Gte.as_str(), value)
    }

    /// Filter: column < value
    fn lt(self, column: &str, value: impl fmt::Display) -> Self {
        self.filter(column, FilterOperator::Lt.as_str(), value)
    }

    /// Filter: column <= value
    fn lte(self, column: &str, value: impl fmt::Display) -> Self {
        self.filter(column, FilterOperator::Lte.as_str(), value)
    }

    /// Filter: column LIKE pattern (`*` may be used as the wildcard)
    fn like(self, column: &str, pattern: impl fmt::Display) -> Self {
        self.filter(column, FilterOperator::Like.as_str(), pattern)
    }

    /// Filter: column ILIKE pattern (case-insensitive)
    fn ilike(self, column: &str, pattern: impl fmt::Display) -> Self {
        self.filter(column, FilterOperator::ILike.as_str(), pattern)
    }

    /// Filter: column IS NULL / IS NOT NULL / IS TRUE / IS FALSE
    fn is(self, column: &str, value: IsValue) -> Self {
        self.filter(column, FilterOperator::Is.as_str(), value.as_str())
    }

    /// Filter: column IN (val1, val2, ...)
    fn in_<I, V>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: fmt::Display,
    {
        let list = values
            .into_iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.filter(column, FilterOperator::In.as_str(), format!("({list})"))
    }

    /// Filter: column @> value. Arrays use PostgreSQL literal syntax, e.g. `{a,b}`.
    fn contains(self, column: &str, value: impl fmt::Display) -> Self {
        self.filter(column, FilterOperator::Contains.as_str(), value)
    }

    /// Filter: column <@ value
    fn contained_by(self, column: &str, value: impl fmt::Display) -> Self {
        self.filter(column, FilterOperator::ContainedBy.as_str(), value)
    }

    /// Filter: column && value
    fn overlaps(self, column: &str, value: impl fmt::Display) -> Self {
        self.filter(column, FilterOperator::Overlaps.as_str(), value)
    }

    /// Full-text search filter, optionally with a text search configuration.
    fn text_search(
        self,
        column: &str,
        query: impl fmt::Display,
        search_type: TextSearchType,
        config: Option<&str>,
    ) -> Self {
        let op = search_type.operator();
        match config {
            Some(cfg) => self.filter(column, &format!("{op}({cfg})"), query),
            None => self.filter(column, op.as_str(), query),
        }
    }

    /// Negated filter: `column=not.operator.value`.
    fn not(self, column: &str, operator: &str, value: impl fmt::Display) -> Self {
        self.filter(column, &format!("not.{operator}"), value)
    }

    /// OR group in raw PostgREST syntax, e.g. `"id.eq.1,name.eq.Oslo"`.
    fn or(mut self, filters: &str) -> Self {
        self.filters_mut()
            .push(FilterPredicate::new("or", "", format!("({filters})")));
        self
    }

    /// Match every `column = value` pair.
    fn match_filter<V: fmt::Display>(mut self, pairs: Vec<(&str, V)>) -> Self {
        for (column, value) in pairs {
            self = self.eq(column, value);
        }
        self
    }
}
