//! Typed query description
//!
//! Queries are built programmatically instead of as SQL text. A query names a
//! base relation, a chain of inner equi-joins, comparison filters, an optional
//! single grouping column, the select list (plain columns and aggregates, each
//! under an output alias), an optional ordering and an optional limit.
//!
//! ```ignore
//! let query = Query::from("directors")
//!     .inner_join("movie_directors", "directors.id", "movie_directors.director_id")
//!     .inner_join("movies", "movie_directors.movie_id", "movies.id")
//!     .group_by("full_name")
//!     .select_as("full_name", "director")
//!     .aggregate(Aggregate::sum("budget_adjusted").rounded(2), "total_budget")
//!     .order_by_desc("total_budget")
//!     .limit(3)
//!     .build();
//! ```

use std::cmp::Ordering;
use std::fmt;

use crate::catalog::DataType;

/// Reference to a column, optionally qualified by its table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    /// Table name, if qualified
    pub table: Option<String>,
    /// Column name
    pub column: String,
}

impl ColumnRef {
    /// Parse `table.column` or a bare `column`
    pub fn parse(s: &str) -> Self {
        match s.split_once('.') {
            Some((table, column)) => ColumnRef::qualified(table, column),
            None => ColumnRef::bare(s),
        }
    }

    /// A column qualified by table name
    pub fn qualified(table: impl Into<String>, column: impl Into<String>) -> Self {
        ColumnRef {
            table: Some(table.into()),
            column: column.into(),
        }
    }

    /// An unqualified column
    pub fn bare(column: impl Into<String>) -> Self {
        ColumnRef {
            table: None,
            column: column.into(),
        }
    }
}

impl From<&str> for ColumnRef {
    fn from(s: &str) -> Self {
        ColumnRef::parse(s)
    }
}

impl From<String> for ColumnRef {
    fn from(s: String) -> Self {
        ColumnRef::parse(&s)
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.table {
            Some(table) => write!(f, "{}.{}", table, self.column),
            None => f.write_str(&self.column),
        }
    }
}

/// Literal value in a filter predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Literal {
    /// Data type of the literal, None for NULL
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Literal::Null => None,
            Literal::Boolean(_) => Some(DataType::Boolean),
            Literal::Integer(_) => Some(DataType::Int),
            Literal::Float(_) => Some(DataType::Double),
            Literal::String(_) => Some(DataType::Text),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => f.write_str("NULL"),
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::Integer(i) => write!(f, "{}", i),
            Literal::Float(v) => write!(f, "{}", v),
            Literal::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
        }
    }
}

impl From<i64> for Literal {
    fn from(v: i64) -> Self {
        Literal::Integer(v)
    }
}

impl From<i32> for Literal {
    fn from(v: i32) -> Self {
        Literal::Integer(v.into())
    }
}

impl From<f64> for Literal {
    fn from(v: f64) -> Self {
        Literal::Float(v)
    }
}

impl From<bool> for Literal {
    fn from(v: bool) -> Self {
        Literal::Boolean(v)
    }
}

impl From<&str> for Literal {
    fn from(v: &str) -> Self {
        Literal::String(v.to_string())
    }
}

impl From<String> for Literal {
    fn from(v: String) -> Self {
        Literal::String(v)
    }
}

/// Comparison operator for filter predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl CompareOp {
    /// Whether a comparison outcome satisfies this operator
    pub fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::NotEq => ordering != Ordering::Equal,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::LtEq => ordering != Ordering::Greater,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::GtEq => ordering != Ordering::Less,
        }
    }

    /// Equality operators work on every type; the rest reject BOOLEAN columns
    pub fn is_equality(&self) -> bool {
        matches!(self, CompareOp::Eq | CompareOp::NotEq)
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "!=",
            CompareOp::Lt => "<",
            CompareOp::LtEq => "<=",
            CompareOp::Gt => ">",
            CompareOp::GtEq => ">=",
        };
        f.write_str(s)
    }
}

/// Inner equi-join of a new relation into the current scope
#[derive(Debug, Clone, PartialEq)]
pub struct JoinSpec {
    /// Relation being joined in
    pub table: String,
    /// Key column on one side of the equality
    pub left: ColumnRef,
    /// Key column on the other side of the equality
    pub right: ColumnRef,
}

/// `column op literal`
#[derive(Debug, Clone, PartialEq)]
pub struct FilterPredicate {
    pub column: ColumnRef,
    pub op: CompareOp,
    pub value: Literal,
}

/// Aggregate function and its argument
#[derive(Debug, Clone, PartialEq)]
pub enum AggregateKind {
    /// COUNT(*)
    CountStar,
    /// COUNT(column), non-null values only
    Count(ColumnRef),
    /// SUM(column)
    Sum(ColumnRef),
    /// AVG(column)
    Avg(ColumnRef),
}

/// Aggregate with optional output rounding
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub kind: AggregateKind,
    /// Decimal places to round the output to
    pub round: Option<u32>,
}

impl Aggregate {
    pub fn count_star() -> Self {
        Self::new(AggregateKind::CountStar)
    }

    pub fn count(column: impl Into<ColumnRef>) -> Self {
        Self::new(AggregateKind::Count(column.into()))
    }

    pub fn sum(column: impl Into<ColumnRef>) -> Self {
        Self::new(AggregateKind::Sum(column.into()))
    }

    pub fn avg(column: impl Into<ColumnRef>) -> Self {
        Self::new(AggregateKind::Avg(column.into()))
    }

    fn new(kind: AggregateKind) -> Self {
        Aggregate { kind, round: None }
    }

    /// Round the output half away from zero to `places` decimals
    #[must_use]
    pub fn rounded(mut self, places: u32) -> Self {
        self.round = Some(places);
        self
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = match &self.kind {
            AggregateKind::CountStar => "COUNT(*)".to_string(),
            AggregateKind::Count(c) => format!("COUNT({})", c),
            AggregateKind::Sum(c) => format!("SUM({})", c),
            AggregateKind::Avg(c) => format!("AVG({})", c),
        };
        match self.round {
            Some(places) => write!(f, "ROUND({}, {})", inner, places),
            None => f.write_str(&inner),
        }
    }
}

/// Expression in the select list
#[derive(Debug, Clone, PartialEq)]
pub enum SelectExpr {
    Column(ColumnRef),
    Aggregate(Aggregate),
}

/// Select list entry with its output name
#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem {
    pub expr: SelectExpr,
    pub alias: String,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Ordering by an output column
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSpec {
    /// Output alias to order by
    pub column: String,
    pub order: SortOrder,
}

/// A complete query description
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Base relation
    pub from: String,
    pub joins: Vec<JoinSpec>,
    pub filters: Vec<FilterPredicate>,
    pub group_by: Option<ColumnRef>,
    pub select: Vec<SelectItem>,
    pub order_by: Option<OrderSpec>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Query {
    /// Start building a query over `table`
    #[allow(clippy::should_implement_trait)]
    pub fn from(table: impl Into<String>) -> QueryBuilder {
        QueryBuilder {
            query: Query {
                from: table.into(),
                joins: Vec::new(),
                filters: Vec::new(),
                group_by: None,
                select: Vec::new(),
                order_by: None,
                limit: None,
                offset: None,
            },
        }
    }

    /// Whether the select list contains any aggregate
    pub fn has_aggregates(&self) -> bool {
        self.select
            .iter()
            .any(|item| matches!(item.expr, SelectExpr::Aggregate(_)))
    }
}

/// Builder for [`Query`]
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    /// Inner join `table` on `left = right`
    pub fn inner_join(
        mut self,
        table: impl Into<String>,
        left: impl Into<ColumnRef>,
        right: impl Into<ColumnRef>,
    ) -> Self {
        self.query.joins.push(JoinSpec {
            table: table.into(),
            left: left.into(),
            right: right.into(),
        });
        self
    }

    /// Keep rows where `column op value`
    pub fn filter(
        mut self,
        column: impl Into<ColumnRef>,
        op: CompareOp,
        value: impl Into<Literal>,
    ) -> Self {
        self.query.filters.push(FilterPredicate {
            column: column.into(),
            op,
            value: value.into(),
        });
        self
    }

    /// Keep rows where `column = value`
    pub fn where_eq(self, column: impl Into<ColumnRef>, value: impl Into<Literal>) -> Self {
        self.filter(column, CompareOp::Eq, value)
    }

    pub fn group_by(mut self, column: impl Into<ColumnRef>) -> Self {
        self.query.group_by = Some(column.into());
        self
    }

    /// Select a column under its own name
    pub fn select(self, column: impl Into<ColumnRef>) -> Self {
        let column = column.into();
        let alias = column.column.clone();
        self.push_item(SelectExpr::Column(column), alias)
    }

    /// Select a column under `alias`
    pub fn select_as(self, column: impl Into<ColumnRef>, alias: impl Into<String>) -> Self {
        self.push_item(SelectExpr::Column(column.into()), alias.into())
    }

    /// Select an aggregate under `alias`
    pub fn aggregate(self, aggregate: Aggregate, alias: impl Into<String>) -> Self {
        self.push_item(SelectExpr::Aggregate(aggregate), alias.into())
    }

    /// Shorthand for `COUNT(*) AS alias`
    pub fn count_star(self, alias: impl Into<String>) -> Self {
        self.aggregate(Aggregate::count_star(), alias)
    }

    pub fn order_by(mut self, column: impl Into<String>, order: SortOrder) -> Self {
        self.query.order_by = Some(OrderSpec {
            column: column.into(),
            order,
        });
        self
    }

    pub fn order_by_desc(self, column: impl Into<String>) -> Self {
        self.order_by(column, SortOrder::Descending)
    }

    pub fn order_by_asc(self, column: impl Into<String>) -> Self {
        self.order_by(column, SortOrder::Ascending)
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.query.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.query.offset = Some(offset);
        self
    }

    pub fn build(self) -> Query {
        self.query
    }

    fn push_item(mut self, expr: SelectExpr, alias: String) -> Self {
        self.query.select.push(SelectItem { expr, alias });
        self
    }
}
