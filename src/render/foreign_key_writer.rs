//! Foreign key constraints as ALTER TABLE batches

use super::script::Clauses;
use crate::model::{ForeignKey, ReferentialAction};
use crate::util::{qualified_name, quote_ident, quoted_list};

/// `ALTER TABLE ... ADD CONSTRAINT ... FOREIGN KEY`, followed by a
/// `NOCHECK CONSTRAINT` statement when the key is disabled.
///
/// Column pairs are expected in ordinal order, as the graph builder leaves them.
pub fn render_foreign_key(foreign_key: &ForeignKey, table: &str) -> Vec<String> {
    let columns = &foreign_key.columns;
    let local = quoted_list(columns.iter().map(|c| c.column.as_str()));
    let referenced = quoted_list(columns.iter().map(|c| c.referenced_column.as_str()));

    let mut clauses = Clauses::default();
    clauses.push(format!("ALTER TABLE {}", table));
    clauses.push(if foreign_key.is_not_trusted {
        "WITH NOCHECK"
    } else {
        "WITH CHECK"
    });
    clauses.push(format!(
        "ADD CONSTRAINT {} FOREIGN KEY ({})",
        quote_ident(&foreign_key.name),
        local
    ));
    clauses.push(format!(
        "REFERENCES {} ({})",
        qualified_name(&foreign_key.referenced_schema, &foreign_key.referenced_table),
        referenced
    ));
    if foreign_key.on_delete != ReferentialAction::NoAction {
        clauses.push(format!("ON DELETE {}", foreign_key.on_delete.keyword()));
    }
    if foreign_key.on_update != ReferentialAction::NoAction {
        clauses.push(format!("ON UPDATE {}", foreign_key.on_update.keyword()));
    }
    if foreign_key.is_not_for_replication {
        clauses.push("NOT FOR REPLICATION");
    }

    let mut statements = vec![clauses.into_string()];
    if foreign_key.is_disabled {
        statements.push(format!(
            "ALTER TABLE {} NOCHECK CONSTRAINT {}",
            table,
            quote_ident(&foreign_key.name)
        ));
    }
    statements
}
