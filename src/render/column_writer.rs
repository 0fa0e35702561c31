//! Column definitions

use super::script::Clauses;
use crate::model::{Column, GeneratedAlways, OwnerKind};
use crate::util::{escape_literal, qualified_name, quote_ident};

/// `(length)`, `(precision)` or `(precision, scale)`; scale is shown only when positive.
pub(crate) fn length_clause(
    max_length: Option<&str>,
    precision: Option<i32>,
    scale: Option<i32>,
) -> Option<String> {
    if let Some(length) = max_length.filter(|length| !length.is_empty()) {
        return Some(format!("({})", length));
    }
    match (precision, scale) {
        (Some(precision), Some(scale)) if scale > 0 => Some(format!("({}, {})", precision, scale)),
        (Some(precision), _) => Some(format!("({})", precision)),
        _ => None,
    }
}

/// Bracketed type name with its length/precision suffix and XML binding.
pub fn type_clause(column: &Column) -> String {
    let mut clause = String::new();
    if column.is_user_defined {
        if let Some(schema) = column.type_schema.as_deref().filter(|s| !s.is_empty()) {
            clause.push_str(&quote_ident(schema));
            clause.push('.');
        }
    }
    clause.push_str(&quote_ident(&column.type_name));
    if let Some(length) = length_clause(
        column.max_length.as_deref(),
        column.precision,
        column.scale,
    ) {
        clause.push_str(&length);
    }
    if let Some(xml) = &column.xml_collection {
        clause.push(' ');
        clause.push_str(if xml.is_document { "DOCUMENT" } else { "CONTENT" });
        clause.push(' ');
        clause.push_str(&qualified_name(&xml.schema, &xml.name));
    }
    clause
}

/// Full column definition for the given owner context.
///
/// `default_collation` is the database collation; a column collation equal to
/// it is not repeated.
pub fn render_column(column: &Column, owner: OwnerKind, default_collation: Option<&str>) -> String {
    let name = quote_ident(&column.name);

    if let Some(computed) = &column.computed {
        let mut text = format!("{} AS {}", name, computed.expression);
        if computed.is_persisted {
            text.push_str(" PERSISTED");
        }
        return text;
    }

    let mut clauses = Clauses::default();
    clauses.push(&name);
    clauses.push(type_clause(column));

    match owner {
        OwnerKind::Table => {
            if column.is_filestream {
                clauses.push("FILESTREAM");
            }
            push_collation(&mut clauses, column, default_collation);
            if column.is_column_set {
                clauses.push("COLUMN_SET FOR ALL_SPARSE_COLUMNS");
            } else if column.is_sparse {
                clauses.push("SPARSE");
            }
            if let Some(function) = &column.masking_function {
                clauses.push(format!(
                    "MASKED WITH (FUNCTION = '{}')",
                    escape_literal(function)
                ));
            }
            push_default(&mut clauses, column, true);
            push_identity(&mut clauses, column, true);
            push_generated(&mut clauses, column);
            push_not_null(&mut clauses, column);
            if column.is_rowguidcol {
                clauses.push("ROWGUIDCOL");
            }
            if let Some(encryption) = &column.encryption {
                clauses.push(format!(
                    "ENCRYPTED WITH (COLUMN_ENCRYPTION_KEY = {}, ENCRYPTION_TYPE = {}, ALGORITHM = '{}')",
                    quote_ident(&encryption.key_name),
                    encryption.encryption_type,
                    escape_literal(&encryption.algorithm)
                ));
            }
        }
        OwnerKind::MemoryOptimizedTable => {
            push_collation(&mut clauses, column, default_collation);
            push_generated(&mut clauses, column);
            push_not_null(&mut clauses, column);
            push_default(&mut clauses, column, true);
            push_identity(&mut clauses, column, true);
        }
        OwnerKind::TableType => {
            push_collation(&mut clauses, column, default_collation);
            push_not_null(&mut clauses, column);
            push_default(&mut clauses, column, false);
            push_identity(&mut clauses, column, false);
            if column.is_rowguidcol {
                clauses.push("ROWGUIDCOL");
            }
        }
        OwnerKind::AlterTable => {}
    }

    clauses.into_string()
}

fn push_collation(clauses: &mut Clauses, column: &Column, default_collation: Option<&str>) {
    if let Some(collation) = column.collation.as_deref() {
        if Some(collation) != default_collation {
            clauses.push(format!("COLLATE {}", collation));
        }
    }
}

fn push_default(clauses: &mut Clauses, column: &Column, named: bool) {
    let Some(default) = &column.default else {
        return;
    };
    if named && !default.name.is_empty() {
        clauses.push(format!(
            "CONSTRAINT {} DEFAULT {}",
            quote_ident(&default.name),
            default.definition
        ));
    } else {
        clauses.push(format!("DEFAULT {}", default.definition));
    }
}

fn push_identity(clauses: &mut Clauses, column: &Column, allow_not_for_replication: bool) {
    let Some(identity) = column.identity else {
        return;
    };
    if identity.seed == 1 && identity.increment == 1 {
        clauses.push("IDENTITY");
    } else {
        clauses.push(format!("IDENTITY({}, {})", identity.seed, identity.increment));
    }
    if allow_not_for_replication && identity.not_for_replication {
        clauses.push("NOT FOR REPLICATION");
    }
}

fn push_generated(clauses: &mut Clauses, column: &Column) {
    let Some(role) = column.generated_always else {
        return;
    };
    clauses.push(match role {
        GeneratedAlways::RowStart => "GENERATED ALWAYS AS ROW START",
        GeneratedAlways::RowEnd => "GENERATED ALWAYS AS ROW END",
    });
    if column.is_hidden {
        clauses.push("HIDDEN");
    }
}

fn push_not_null(clauses: &mut Clauses, column: &Column) {
    if !column.is_nullable && column.identity.is_none() {
        clauses.push("NOT NULL");
    }
}
