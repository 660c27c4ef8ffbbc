use crate::parts::QueryParts;

/// Sort direction for [`Modifiable::order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    #[default]
    Ascending,
    Descending,
}

/// Where NULLs sort relative to other values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullsPosition {
    First,
    Last,
}

/// One `order=` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderClause {
    pub column: String,
    pub direction: OrderDirection,
    pub nulls: Option<NullsPosition>,
}

impl OrderClause {
    /// Render as `column.asc[.nullsfirst]`.
    pub fn render(&self) -> String {
        let dir = match self.direction {
            OrderDirection::Ascending => "asc",
            OrderDirection::Descending => "desc",
        };
        let nulls = match self.nulls {
            Some(NullsPosition::First) => ".nullsfirst",
            Some(NullsPosition::Last) => ".nullslast",
            None => "",
        };
        format!("{}.{}{}", self.column, dir, nulls)
    }
}

/// Trait providing modifier methods (order, limit, offset, range).
pub trait Modifiable: Sized {
    /// Get a mutable reference to the query parts.
    fn parts_mut(&mut self) -> &mut QueryParts;

    /// Order by a column. Repeated calls add secondary sort keys.
    fn order(mut self, column: &str, direction: OrderDirection) -> Self {
        self.parts_mut().orders.push(OrderClause {
            column: column.to_string(),
            direction,
            nulls: None,
        });
        self
    }

    /// Order by a column with explicit nulls positioning.
    fn order_with_nulls(
        mut self,
        column: &str,
        direction: OrderDirection,
        nulls: NullsPosition,
    ) -> Self {
        self.parts_mut().orders.push(OrderClause {
            column: column.to_string(),
            direction,
            nulls: Some(nulls),
        });
        self
    }

    /// Limit the number of rows returned.
    fn limit(mut self, count: u64) -> Self {
        self.parts_mut().limit = Some(count);
        self
    }

    /// Skip the first `count` rows.
    fn offset(mut self, count: u64) -> Self {
        self.parts_mut().offset = Some(count);
        self
    }

    /// Rows `from..=to` (zero-based, inclusive).
    fn range(mut self, from: u64, to: u64) -> Self {
        self.parts_mut().offset = Some(from);
        self.parts_mut().limit = Some(to.saturating_add(1).saturating_sub(from));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Parts(QueryParts);

    impl Modifiable for Parts {
        fn parts_mut(&mut self) -> &mut QueryParts {
            &mut self.0
        }
    }

    #[test]
    fn order_render() {
        let clause = OrderClause {
            column: "name".into(),
            direction: OrderDirection::Descending,
            nulls: Some(NullsPosition::Last),
        };
        assert_eq!(clause.render(), "name.desc.nullslast");
    }

    #[test]
    fn order_accumulates() {
        let p = Parts(QueryParts::new("cities"))
            .order("country_id", OrderDirection::Ascending)
            .order_with_nulls("name", OrderDirection::Descending, NullsPosition::First);
        let rendered: Vec<String> = p.0.orders.iter().map(OrderClause::render).collect();
        assert_eq!(rendered, vec!["country_id.asc", "name.desc.nullsfirst"]);
    }

    #[test]
    fn limit_offset_range() {
        let p = Parts(QueryParts::new("cities")).limit(10).offset(20);
        assert_eq!(p.0.limit, Some(10));
        assert_eq!(p.0.offset, Some(20));

        let p = Parts(QueryParts::new("cities")).range(5, 9);
        assert_eq!(p.0.offset, Some(5));
        assert_eq!(p.0.limit, Some(5));

        let p = Parts(QueryParts::new("cities")).range(9, 5);
        assert_eq!(p.0.limit, Some(0));
    }

    #[test]
    fn range_to_max_saturates() {
        let p = Parts(QueryParts::new("cities")).range(0, u64::MAX);
        assert_eq!(p.0.offset, Some(0));
        assert_eq!(p.0.limit, Some(u64::MAX));

        let p = Parts(QueryParts::new("cities")).range(10, u64::MAX);
        assert_eq!(p.0.limit, Some(u64::MAX - 10));
    }
}
