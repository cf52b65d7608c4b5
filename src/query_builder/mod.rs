use crate::results::Row;
use crate::sqlite::{BindList, Database};
use crate::types::{QueryKind, RowLimit, RowValues};

mod clause;
mod dml;
mod select;

/// Insertion-ordered field → value mapping with unique field names.
///
/// Used both for WHERE predicates and for INSERT/UPDATE payloads. Setting a field that
/// is already present replaces its value and keeps its original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    entries: Vec<(String, RowValues)>,
}

impl FieldMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<RowValues>) {
        let field = field.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((field, value)),
        }
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&RowValues> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RowValues)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<K: Into<String>> FromIterator<(K, RowValues)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, RowValues)>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        for (field, value) in iter {
            map.set(field, value);
        }
        map
    }
}

impl IntoIterator for FieldMap {
    type Item = (String, RowValues);
    type IntoIter = std::vec::IntoIter<(String, RowValues)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Everything one builder call accumulates before it is compiled.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingQuery {
    pub kind: QueryKind,
    pub table: String,
    /// Field list for SELECT; exactly `["*"]` selects every column.
    pub fields: Vec<String>,
    pub limit: Option<RowLimit>,
    pub payload: FieldMap,
    pub where_clause: FieldMap,
    /// Statement text for `QueryKind::Raw`.
    pub raw_sql: String,
}

impl Default for PendingQuery {
    fn default() -> Self {
        Self {
            kind: QueryKind::Select,
            table: String::new(),
            fields: vec!["*".to_string()],
            limit: None,
            payload: FieldMap::new(),
            where_clause: FieldMap::new(),
            raw_sql: String::new(),
        }
    }
}

/// SQL text plus its parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub sql: String,
    pub binds: BindList,
}

/// Outcome of [`QueryBuilder::raw_query`].
#[derive(Debug, Clone, PartialEq)]
pub enum RawOutcome {
    /// Rows produced by the statement (possibly none)
    Rows(Vec<Row>),
    /// The statement ran and results were not requested
    Executed,
}

impl RawOutcome {
    /// The rows, or an empty vec when results were not requested.
    #[must_use]
    pub fn into_rows(self) -> Vec<Row> {
        match self {
            RawOutcome::Rows(rows) => rows,
            RawOutcome::Executed => Vec::new(),
        }
    }
}

/// Per-call query builder over a borrowed [`Database`].
///
/// Predicates, field list and limit accumulate until a terminal operation
/// (`get`, `num_rows`, `insert`, `update`, `delete`, `raw_query`) runs; the terminal
/// operation takes that state, so the next call starts clean whether or not the
/// previous one succeeded.
///
/// ```rust
/// use sql_query_builder::prelude::*;
///
/// # fn demo() -> Result<(), QueryBuilderError> {
/// let mut db = Database::open_in_memory()?;
/// db.execute_batch("CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT, age INTEGER)")?;
///
/// let id = db
///     .query()
///     .insert(
///         "people",
///         [("name", RowValues::from("alice")), ("age", RowValues::from(30))],
///     )?;
///
/// let rows = db.query().where_eq("id", id).get("people")?;
/// assert_eq!(rows[0].get("name").and_then(RowValues::as_text), Some("alice"));
/// # Ok(())
/// # }
/// # demo().unwrap();
/// ```
pub struct QueryBuilder<'db> {
    db: &'db mut Database,
    pending: PendingQuery,
}

impl<'db> QueryBuilder<'db> {
    pub(crate) fn new(db: &'db mut Database) -> Self {
        Self {
            db,
            pending: PendingQuery::default(),
        }
    }

    /// Add an equality predicate; predicates are ANDed in call order.
    pub fn where_eq(&mut self, field: impl Into<String>, value: impl Into<RowValues>) -> &mut Self {
        self.pending.where_clause.set(field, value);
        self
    }

    /// Cap the number of rows `get`/`num_rows` consider.
    pub fn limit(&mut self, limit: impl Into<RowLimit>) -> &mut Self {
        self.pending.limit = Some(limit.into());
        self
    }

    /// Restrict the selected columns. An empty list selects every column.
    pub fn fields<S: AsRef<str>>(&mut self, fields: &[S]) -> &mut Self {
        self.pending.fields = if fields.is_empty() {
            vec!["*".to_string()]
        } else {
            fields.iter().map(|f| f.as_ref().to_string()).collect()
        };
        self
    }

    /// State accumulated so far for the next call.
    #[must_use]
    pub fn pending(&self) -> &PendingQuery {
        &self.pending
    }

    /// Drop any accumulated predicates, fields and limit.
    pub fn reset(&mut self) {
        self.pending = PendingQuery::default();
    }

    /// Move the accumulated state out for one execution, leaving the builder clean.
    fn take_pending(&mut self, kind: QueryKind, table: &str) -> PendingQuery {
        let mut pending = std::mem::take(&mut self.pending);
        pending.kind = kind;
        pending.table = table.to_owned();
        pending
    }
}
