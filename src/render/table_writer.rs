//! CREATE TABLE synthesis
//!
//! A table script is a sequence of batches:
//! 1. `CREATE TABLE` with columns, period, key constraints (all indexes for
//!    memory-optimized tables), storage placement and table options
//! 2. standalone `CREATE INDEX` statements
//! 3. foreign keys
//! 4. lock escalation and change data capture
//! 5. permissions, then descriptions

use super::column_writer::render_column;
use super::foreign_key_writer::render_foreign_key;
use super::index_writer::{render_create_index, render_index};
use super::script::{describe, ScriptBuilder};
use super::{expect_kind, RenderContext};
use crate::error::RenderError;
use crate::model::{
    CatalogObject, Column, DataSpace, DatabaseObject, Durability, GeneratedAlways, Index,
    LockEscalation, ObjectKind, OwnerKind, Table, TemporalRole,
};
use crate::util::{escape_literal, qualified_name, quote_ident};

pub fn render_table(
    context: &RenderContext<'_>,
    object: &CatalogObject,
) -> Result<String, RenderError> {
    let object = expect_kind(object, ObjectKind::Table, "table")?;
    let name = object.qualified_name();
    let table = context
        .graph
        .table(&name)
        .ok_or_else(|| RenderError::MissingMetadata {
            name: name.clone(),
            facet: "table",
        })?;

    let metadata = context.graph.objects();
    let columns = metadata.columns(&name);
    if columns.is_empty() && !table.is_filetable {
        return Err(RenderError::MissingMetadata {
            name,
            facet: "columns",
        });
    }
    let is_graph = table.is_node || table.is_edge;
    let indexes: Vec<&Index> = metadata
        .indexes(&name)
        .iter()
        .filter(|index| !(is_graph && keys_graph_columns(index, columns)))
        .collect();
    let indexes = indexes.as_slice();

    let mut script = context.script();
    script.batch(create_table(context, &name, table, columns, indexes));

    if !table.is_memory_optimized {
        let mut standalone: Vec<&Index> = indexes
            .iter()
            .copied()
            .filter(|i| !i.is_constraint())
            .collect();
        standalone.sort_by_key(|i| i.class());
        for index in standalone {
            if let Some(statement) = render_create_index(index, &name) {
                script.batch(statement);
                if index.is_disabled {
                    script.batch(format!(
                        "ALTER INDEX {} ON {} DISABLE",
                        quote_ident(&index.name),
                        name
                    ));
                }
            }
        }
    }

    for foreign_key in metadata.foreign_keys(&name) {
        for statement in render_foreign_key(foreign_key, &name) {
            script.batch(statement);
        }
    }

    if table.lock_escalation != LockEscalation::Table {
        script.batch(format!(
            "ALTER TABLE {} SET (LOCK_ESCALATION = {})",
            name,
            table.lock_escalation.keyword()
        ));
    }

    if table.is_tracked_by_cdc {
        script.batch(format!(
            "EXECUTE sys.sp_cdc_enable_table @source_schema = N'{}', @source_name = N'{}', @role_name = NULL",
            escape_literal(&table.schema),
            escape_literal(&table.name)
        ));
    }

    context.push_permissions(&mut script, metadata.permissions(&name), &name);
    push_descriptions(&mut script, object, columns, indexes, context, &name);

    Ok(script.finish())
}

fn create_table(
    context: &RenderContext<'_>,
    name: &str,
    table: &Table,
    columns: &[Column],
    indexes: &[&Index],
) -> String {
    let mut create = format!("CREATE TABLE {}", name);

    if table.is_filetable {
        create.push_str(" AS FILETABLE");
    } else {
        let owner = if table.is_memory_optimized {
            OwnerKind::MemoryOptimizedTable
        } else {
            OwnerKind::Table
        };
        let is_graph = table.is_node || table.is_edge;

        let mut items: Vec<String> = columns
            .iter()
            .filter(|c| !(is_graph && c.is_graph_internal()))
            .map(|c| render_column(c, owner, context.graph.collation()))
            .collect();
        if let Some(period) = period_clause(columns) {
            items.push(period);
        }
        let mut inline: Vec<&Index> = indexes
            .iter()
            .copied()
            .filter(|i| table.is_memory_optimized || i.is_constraint())
            .collect();
        inline.sort_by_key(|i| i.class());
        items.extend(inline.into_iter().map(|i| render_index(i, owner)));

        if !items.is_empty() {
            create.push_str(" (\n  ");
            create.push_str(&items.join(",\n  "));
            create.push_str("\n)");
        }
    }

    if table.is_node {
        create.push_str(" AS NODE");
    } else if table.is_edge {
        create.push_str(" AS EDGE");
    }

    if !table.is_memory_optimized {
        match &table.data_space {
            Some(DataSpace::Filegroup(filegroup)) => {
                create.push_str("\nON ");
                create.push_str(&quote_ident(filegroup));
            }
            Some(DataSpace::PartitionScheme { scheme, column }) => {
                create.push_str(&format!("\nON {}({})", quote_ident(scheme), quote_ident(column)));
            }
            None => {}
        }
        if let Some(lob) = &table.lob_data_space {
            create.push_str("\nTEXTIMAGE_ON ");
            create.push_str(&quote_ident(lob));
        }
        if let Some(filestream) = &table.filestream_data_space {
            create.push_str("\nFILESTREAM_ON ");
            create.push_str(&quote_ident(filestream));
        }
    }

    let options = table_options(table);
    if !options.is_empty() {
        create.push_str("\nWITH (");
        create.push_str(&options.join(", "));
        create.push(')');
    }

    create
}

/// Indexes the server maintains on `$node_id` or `$edge_id` key only hidden
/// graph columns, which the script never declares.
fn keys_graph_columns(index: &Index, columns: &[Column]) -> bool {
    !index.key_columns.is_empty()
        && index.key_columns.iter().all(|key| {
            columns
                .iter()
                .any(|c| c.name == key.name && c.is_graph_internal())
        })
}

fn period_clause(columns: &[Column]) -> Option<String> {
    let find = |role: GeneratedAlways| {
        columns
            .iter()
            .find(|c| c.generated_always == Some(role))
            .map(|c| quote_ident(&c.name))
    };
    let start = find(GeneratedAlways::RowStart)?;
    let end = find(GeneratedAlways::RowEnd)?;
    Some(format!("PERIOD FOR SYSTEM_TIME ({}, {})", start, end))
}

/// Table-level `WITH` options, sorted.
fn table_options(table: &Table) -> Vec<String> {
    let mut options = Vec::new();
    if table.is_memory_optimized {
        options.push("MEMORY_OPTIMIZED = ON".to_string());
        options.push(
            match table.durability {
                Durability::SchemaAndData => "DURABILITY = SCHEMA_AND_DATA",
                Durability::SchemaOnly => "DURABILITY = SCHEMA_ONLY",
            }
            .to_string(),
        );
    }
    if table.temporal_role == TemporalRole::SystemVersioned {
        let mut versioning = String::from("SYSTEM_VERSIONING = ON");
        if let Some((schema, history)) = &table.history_table {
            versioning.push_str(" (HISTORY_TABLE = ");
            versioning.push_str(&qualified_name(schema, history));
            if let Some(retention) = &table.history_retention {
                versioning.push_str(", HISTORY_RETENTION_PERIOD = ");
                versioning.push_str(&retention.render());
            }
            versioning.push(')');
        }
        options.push(versioning);
    }
    options.sort();
    options
}

fn push_descriptions(
    script: &mut ScriptBuilder<'_>,
    object: &DatabaseObject,
    columns: &[Column],
    indexes: &[&Index],
    context: &RenderContext<'_>,
    name: &str,
) {
    let schema = object.schema.as_str();
    let table = object.name.as_str();

    if let Some(description) = &object.description {
        script.batch(describe(description, &[("SCHEMA", schema), ("TABLE", table)]));
    }
    for column in columns {
        if let Some(description) = &column.description {
            script.batch(describe(
                description,
                &[
                    ("SCHEMA", schema),
                    ("TABLE", table),
                    ("COLUMN", column.name.as_str()),
                ],
            ));
        }
    }
    for index in indexes.iter().filter(|i| i.index_type.is_scripted()) {
        if let Some(description) = &index.description {
            let level2 = if index.is_constraint() {
                "CONSTRAINT"
            } else {
                "INDEX"
            };
            script.batch(describe(
                description,
                &[
                    ("SCHEMA", schema),
                    ("TABLE", table),
                    (level2, index.name.as_str()),
                ],
            ));
        }
    }
    for foreign_key in context.graph.objects().foreign_keys(name) {
        if let Some(description) = &foreign_key.description {
            script.batch(describe(
                description,
                &[
                    ("SCHEMA", schema),
                    ("TABLE", table),
                    ("CONSTRAINT", foreign_key.name.as_str()),
                ],
            ));
        }
    }
}
