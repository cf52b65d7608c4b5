use crate::sqlite::BindList;
use crate::types::QueryKind;

use super::{CompiledQuery, FieldMap, PendingQuery};

impl PendingQuery {
    /// Compose the SQL text and register binds: payload values first, then predicates.
    ///
    /// An empty payload skips the INSERT/UPDATE clause, so such a statement is
    /// incomplete; the public builder operations refuse empty payloads before getting
    /// here. Without predicates there is no WHERE clause and UPDATE/DELETE affect
    /// every row.
    #[must_use]
    pub fn compile(&self) -> CompiledQuery {
        let mut binds = BindList::new();

        if self.kind == QueryKind::Raw {
            return CompiledQuery {
                sql: self.raw_sql.clone(),
                binds,
            };
        }

        let table = quote_identifier(&self.table);
        let mut sql = match self.kind {
            QueryKind::Insert => format!("INSERT INTO {table}"),
            QueryKind::Update => format!("UPDATE {table} SET "),
            QueryKind::Delete => format!("DELETE FROM {table}"),
            QueryKind::Select | QueryKind::Raw => {
                format!("SELECT {} FROM {table}", select_fields(&self.fields))
            }
        };

        match self.kind {
            QueryKind::Insert => sql.push_str(&insert_clause(&self.payload, &mut binds)),
            QueryKind::Update => sql.push_str(&update_clause(&self.payload, &mut binds)),
            _ => {}
        }

        sql.push_str(&where_clause(&self.where_clause, &mut binds));

        if self.kind == QueryKind::Select
            && let Some(limit) = self.limit
        {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        CompiledQuery { sql, binds }
    }
}

fn quote_identifier(name: &str) -> String {
    format!("`{name}`")
}

fn select_fields(fields: &[String]) -> String {
    if fields.len() == 1 && fields[0] == "*" {
        return "*".to_string();
    }
    fields
        .iter()
        .map(|f| quote_identifier(f))
        .collect::<Vec<_>>()
        .join(", ")
}

fn insert_clause(payload: &FieldMap, binds: &mut BindList) -> String {
    if payload.is_empty() {
        return String::new();
    }

    let mut columns = Vec::with_capacity(payload.len());
    for (field, value) in payload.iter() {
        columns.push(quote_identifier(field));
        binds.add_binding(value.clone());
    }
    let placeholders = vec!["?"; columns.len()].join(", ");
    format!(" ({}) VALUES ({placeholders})", columns.join(", "))
}

fn update_clause(payload: &FieldMap, binds: &mut BindList) -> String {
    let mut assignments = Vec::with_capacity(payload.len());
    for (field, value) in payload.iter() {
        assignments.push(format!("{}= ?", quote_identifier(field)));
        binds.add_binding(value.clone());
    }
    assignments.join(", ")
}

fn where_clause(predicates: &FieldMap, binds: &mut BindList) -> String {
    if predicates.is_empty() {
        return String::new();
    }

    let mut clauses = Vec::with_capacity(predicates.len());
    for (field, value) in predicates.iter() {
        clauses.push(format!("{} = ?", quote_identifier(field)));
        binds.add_binding(value.clone());
    }
    format!(" WHERE {}", clauses.join(" AND "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RowLimit, RowValues};

    fn pending(kind: QueryKind, table: &str) -> PendingQuery {
        PendingQuery {
            kind,
            table: table.to_string(),
            ..PendingQuery::default()
        }
    }

    #[test]
    fn select_star_without_predicates() {
        let compiled = pending(QueryKind::Select, "users").compile();
        assert_eq!(compiled.sql, "SELECT * FROM `users`");
        assert!(compiled.binds.is_empty());
    }

    #[test]
    fn select_named_fields_are_quoted() {
        let mut query = pending(QueryKind::Select, "users");
        query.fields = vec!["id".into(), "name".into()];
        assert_eq!(query.compile().sql, "SELECT `id`, `name` FROM `users`");
    }

    #[test]
    fn predicates_follow_call_order() {
        let mut query = pending(QueryKind::Select, "users");
        query.where_clause.set("b", 2);
        query.where_clause.set("a", "x");
        query.where_clause.set("c", 1.5);

        let compiled = query.compile();
        assert_eq!(
            compiled.sql,
            "SELECT * FROM `users` WHERE `b` = ? AND `a` = ? AND `c` = ?"
        );
        assert_eq!(
            compiled.binds.values(),
            vec![
                &RowValues::Int(2),
                &RowValues::Text("x".into()),
                &RowValues::Float(1.5)
            ]
        );
        assert_eq!(compiled.binds.type_tags(), "isd");
    }

    #[test]
    fn repeated_predicate_keeps_position() {
        let mut query = pending(QueryKind::Select, "t");
        query.where_clause.set("a", 1);
        query.where_clause.set("b", 2);
        query.where_clause.set("a", 3);

        let compiled = query.compile();
        assert_eq!(compiled.sql, "SELECT * FROM `t` WHERE `a` = ? AND `b` = ?");
        assert_eq!(
            compiled.binds.values(),
            vec![&RowValues::Int(3), &RowValues::Int(2)]
        );
    }

    #[test]
    fn limit_is_appended_to_selects() {
        let mut query = pending(QueryKind::Select, "t");
        query.where_clause.set("a", 1);
        query.limit = Some(RowLimit::from("5"));
        assert_eq!(query.compile().sql, "SELECT * FROM `t` WHERE `a` = ? LIMIT 5");

        query.limit = Some(RowLimit::from("many"));
        assert_eq!(query.compile().sql, "SELECT * FROM `t` WHERE `a` = ? LIMIT 0");
    }

    #[test]
    fn limit_is_ignored_for_mutations() {
        let mut query = pending(QueryKind::Delete, "t");
        query.limit = Some(RowLimit(3));
        assert_eq!(query.compile().sql, "DELETE FROM `t`");
    }

    #[test]
    fn insert_emits_one_placeholder_per_column() {
        let mut query = pending(QueryKind::Insert, "people");
        query.payload.set("name", "a");
        query.payload.set("age", 5);
        query.payload.set("active", true);

        let compiled = query.compile();
        assert_eq!(
            compiled.sql,
            "INSERT INTO `people` (`name`, `age`, `active`) VALUES (?, ?, ?)"
        );
        assert_eq!(compiled.binds.len(), 3);
        assert_eq!(compiled.binds.type_tags(), "sii");
    }

    #[test]
    fn update_binds_payload_before_predicates() {
        let mut query = pending(QueryKind::Update, "people");
        query.payload.set("name", "b");
        query.payload.set("age", RowValues::Null);
        query.where_clause.set("id", 9);

        let compiled = query.compile();
        assert_eq!(
            compiled.sql,
            "UPDATE `people` SET `name`= ?, `age`= ? WHERE `id` = ?"
        );
        assert_eq!(
            compiled.binds.values(),
            vec![
                &RowValues::Text("b".into()),
                &RowValues::Null,
                &RowValues::Int(9)
            ]
        );
        assert_eq!(compiled.binds.type_tags(), "ssi");
    }

    #[test]
    fn update_without_payload_is_incomplete() {
        let compiled = pending(QueryKind::Update, "people").compile();
        assert_eq!(compiled.sql, "UPDATE `people` SET ");
    }

    #[test]
    fn delete_with_predicates() {
        let mut query = pending(QueryKind::Delete, "people");
        query.where_clause.set("active", false);
        let compiled = query.compile();
        assert_eq!(compiled.sql, "DELETE FROM `people` WHERE `active` = ?");
        assert_eq!(compiled.binds.values(), vec![&RowValues::Int(0)]);
    }

    #[test]
    fn raw_sql_passes_through() {
        let mut query = pending(QueryKind::Raw, "");
        query.raw_sql = "SELECT 1".into();
        query.where_clause.set("ignored", 1);
        let compiled = query.compile();
        assert_eq!(compiled.sql, "SELECT 1");
        assert!(compiled.binds.is_empty());
    }
}
