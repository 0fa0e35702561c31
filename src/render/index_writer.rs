//! Index and key-constraint definitions

use super::script::Clauses;
use crate::model::{Index, IndexType, OwnerKind};
use crate::util::quote_ident;

/// Inline definition inside a `CREATE TABLE` or `CREATE TYPE ... AS TABLE` body.
///
/// Table types use the compact `PRIMARY KEY [name] (...)` / `INDEX [name] ...`
/// form, never carry a filter, and omit the NONCLUSTERED keyword. Table owners
/// declare constraints with `CONSTRAINT [name]` and always spell out the type.
pub fn render_index(index: &Index, owner: OwnerKind) -> String {
    let mut clauses = Clauses::default();

    match owner {
        OwnerKind::TableType => {
            clauses.push(if index.is_primary_key {
                "PRIMARY KEY"
            } else {
                "INDEX"
            });
            clauses.push(quote_ident(&index.name));
            if index.is_unique && !index.is_primary_key {
                clauses.push("UNIQUE");
            }
            if index.index_type != IndexType::Nonclustered {
                clauses.push(index.index_type.keyword());
            }
        }
        OwnerKind::Table | OwnerKind::MemoryOptimizedTable | OwnerKind::AlterTable => {
            if index.is_constraint() {
                clauses.push("CONSTRAINT");
                clauses.push(quote_ident(&index.name));
                clauses.push(if index.is_primary_key {
                    "PRIMARY KEY"
                } else {
                    "UNIQUE"
                });
            } else {
                clauses.push("INDEX");
                clauses.push(quote_ident(&index.name));
                if index.is_unique {
                    clauses.push("UNIQUE");
                }
            }
            clauses.push(index.index_type.keyword());
        }
    }

    if let Some(columns) = column_list(index) {
        clauses.push(format!("({})", columns));
    }
    let options = with_options(index, owner);
    if !options.is_empty() {
        clauses.push(format!("WITH ({})", options.join(", ")));
    }
    if let Some(included) = include_list(index) {
        clauses.push(format!("INCLUDE ({})", included));
    }

    clauses.into_string()
}

/// Standalone `CREATE INDEX` for a disk-based table.
///
/// XML and spatial indexes are not scripted and yield `None`.
pub fn render_create_index(index: &Index, table: &str) -> Option<String> {
    if !index.index_type.is_scripted() {
        return None;
    }

    let mut clauses = Clauses::default();
    clauses.push("CREATE");
    if index.is_unique {
        clauses.push("UNIQUE");
    }
    clauses.push(index.index_type.keyword());
    clauses.push("INDEX");
    clauses.push(quote_ident(&index.name));
    clauses.push("ON");
    clauses.push(table);
    if let Some(columns) = column_list(index) {
        clauses.push(format!("({})", columns));
    }
    if let Some(included) = include_list(index) {
        clauses.push(format!("INCLUDE ({})", included));
    }
    if let Some(filter) = index.filter.as_deref().filter(|f| !f.is_empty()) {
        clauses.push(format!("WHERE {}", filter));
    }
    let options = with_options(index, OwnerKind::AlterTable);
    if !options.is_empty() {
        clauses.push(format!("WITH ({})", options.join(", ")));
    }

    Some(clauses.into_string())
}

/// Key columns in key-ordinal order with `DESC` markers.
///
/// Columnstore indexes list their (included) columns instead; a clustered
/// columnstore index has no list at all.
fn column_list(index: &Index) -> Option<String> {
    match index.index_type {
        IndexType::ClusteredColumnstore => None,
        IndexType::NonclusteredColumnstore => {
            let mut columns = index.ordered_keys();
            columns.extend(index.ordered_includes());
            Some(
                columns
                    .iter()
                    .map(|c| quote_ident(&c.name))
                    .collect::<Vec<_>>()
                    .join(", "),
            )
        }
        _ => Some(
            index
                .ordered_keys()
                .iter()
                .map(|c| {
                    if c.is_descending {
                        format!("{} DESC", quote_ident(&c.name))
                    } else {
                        quote_ident(&c.name)
                    }
                })
                .collect::<Vec<_>>()
                .join(", "),
        ),
    }
}

fn include_list(index: &Index) -> Option<String> {
    if index.index_type.is_columnstore() || index.included_columns.is_empty() {
        return None;
    }
    Some(
        index
            .ordered_includes()
            .iter()
            .map(|c| quote_ident(&c.name))
            .collect::<Vec<_>>()
            .join(", "),
    )
}

/// Non-default index options, sorted.
fn with_options(index: &Index, owner: OwnerKind) -> Vec<String> {
    let mut options = Vec::new();
    if let Some(bucket_count) = index.bucket_count {
        options.push(format!("BUCKET_COUNT = {}", bucket_count));
    }
    if index.ignore_dup_key {
        options.push("IGNORE_DUP_KEY = ON".to_string());
    }
    if matches!(owner, OwnerKind::Table | OwnerKind::AlterTable) {
        if index.fill_factor > 0 && index.fill_factor < 100 {
            options.push(format!("FILLFACTOR = {}", index.fill_factor));
        }
        if index.is_padded {
            options.push("PAD_INDEX = ON".to_string());
        }
        if !index.allow_row_locks {
            options.push("ALLOW_ROW_LOCKS = OFF".to_string());
        }
        if !index.allow_page_locks {
            options.push("ALLOW_PAGE_LOCKS = OFF".to_string());
        }
        if index.optimize_for_sequential_key {
            options.push("OPTIMIZE_FOR_SEQUENTIAL_KEY = ON".to_string());
        }
    }
    options.sort();
    options
}
