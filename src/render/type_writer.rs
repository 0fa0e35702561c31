//! CREATE TYPE scripts for alias types and table types

use super::column_writer::{length_clause, render_column};
use super::index_writer::render_index;
use super::script::{describe, ScriptBuilder};
use super::{expect_kind, RenderContext};
use crate::error::RenderError;
use crate::model::{CatalogObject, DatabaseObject, Index, ObjectKind, OwnerKind, UserTypeShape};
use crate::util::quote_ident;

/// `CREATE TYPE [s].[t] FROM <parent type> [NOT NULL]`
pub fn render_scalar_type(
    context: &RenderContext<'_>,
    object: &CatalogObject,
) -> Result<String, RenderError> {
    let object = expect_kind(object, ObjectKind::UserDefinedType, "scalar type")?;
    let name = object.qualified_name();
    let alias = match context.graph.user_type(&name).map(|t| &t.shape) {
        Some(UserTypeShape::Scalar(alias)) => alias,
        _ => {
            return Err(RenderError::MissingMetadata {
                name,
                facet: "alias type",
            })
        }
    };

    let mut create = format!("CREATE TYPE {} FROM {}", name, quote_ident(&alias.base_type));
    if let Some(length) = length_clause(alias.max_length.as_deref(), alias.precision, alias.scale) {
        create.push_str(&length);
    }
    if !alias.is_nullable {
        create.push_str(" NOT NULL");
    }

    let mut script = context.script();
    script.batch(create);
    finish_type(context, &mut script, object, &name);
    Ok(script.finish())
}

/// `CREATE TYPE [s].[t] AS TABLE (...)` with columns in column-id order, then
/// primary key, unique and remaining indexes, each group by name.
pub fn render_table_type(
    context: &RenderContext<'_>,
    object: &CatalogObject,
) -> Result<String, RenderError> {
    let object = expect_kind(object, ObjectKind::TableType, "table type")?;
    let name = object.qualified_name();
    let is_memory_optimized = match context.graph.user_type(&name).map(|t| &t.shape) {
        Some(UserTypeShape::Table {
            is_memory_optimized,
        }) => *is_memory_optimized,
        _ => {
            return Err(RenderError::MissingMetadata {
                name,
                facet: "table type",
            })
        }
    };

    let metadata = context.graph.types();
    let columns = metadata.columns(&name);
    if columns.is_empty() {
        return Err(RenderError::MissingMetadata {
            name,
            facet: "columns",
        });
    }

    let mut items: Vec<String> = columns
        .iter()
        .map(|c| render_column(c, OwnerKind::TableType, context.graph.collation()))
        .collect();
    let mut indexes: Vec<&Index> = metadata.indexes(&name).iter().collect();
    indexes.sort_by(|a, b| a.class().cmp(&b.class()).then_with(|| a.name.cmp(&b.name)));
    items.extend(
        indexes
            .into_iter()
            .map(|index| render_index(index, OwnerKind::TableType)),
    );

    let mut create = format!("CREATE TYPE {} AS TABLE (\n  {}\n)", name, items.join(",\n  "));
    if is_memory_optimized {
        create.push_str("\nWITH (MEMORY_OPTIMIZED = ON)");
    }

    let mut script = context.script();
    script.batch(create);
    finish_type(context, &mut script, object, &name);
    Ok(script.finish())
}

fn finish_type(
    context: &RenderContext<'_>,
    script: &mut ScriptBuilder<'_>,
    object: &DatabaseObject,
    name: &str,
) {
    context.push_permissions(
        script,
        context.graph.types().permissions(name),
        &format!("TYPE :: {}", name),
    );
    if let Some(description) = &object.description {
        script.batch(describe(
            description,
            &[
                ("SCHEMA", object.schema.as_str()),
                ("TYPE", object.name.as_str()),
            ],
        ));
    }
}
