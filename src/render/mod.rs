//! Definition renderers
//!
//! Each object kind has one writer. Writers read the metadata graph only and
//! return the finished script text, every batch closed by the batch separator.

mod column_writer;
mod foreign_key_writer;
mod index_writer;
mod module_writer;
mod permission_writer;
mod schema_writer;
pub(crate) mod script;
mod table_writer;
mod type_writer;

pub use column_writer::{render_column, type_clause};
pub use foreign_key_writer::render_foreign_key;
pub use index_writer::{render_create_index, render_index};
pub use module_writer::render_module;
pub use permission_writer::permission_statements;
pub use schema_writer::render_schema;
pub use table_writer::render_table;
pub use type_writer::{render_scalar_type, render_table_type};

use crate::error::RenderError;
use crate::model::{CatalogObject, DatabaseObject, MetadataGraph, ObjectKind, ObjectPermissions};
use script::ScriptBuilder;

pub const DEFAULT_BATCH_SEPARATOR: &str = "GO";

/// Options that change rendered text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Line written after every batch
    pub batch_separator: String,
    /// Emit GRANT/DENY/REVOKE blocks
    pub include_permissions: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            batch_separator: DEFAULT_BATCH_SEPARATOR.to_string(),
            include_permissions: true,
        }
    }
}

/// Everything a writer may read
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub graph: &'a MetadataGraph,
    pub options: &'a RenderOptions,
}

impl<'a> RenderContext<'a> {
    pub fn new(graph: &'a MetadataGraph, options: &'a RenderOptions) -> Self {
        Self { graph, options }
    }

    pub(crate) fn script(&self) -> ScriptBuilder<'a> {
        ScriptBuilder::new(&self.options.batch_separator)
    }

    /// Append permission blocks unless permissions are switched off.
    pub(crate) fn push_permissions(
        &self,
        script: &mut ScriptBuilder<'_>,
        permissions: Option<&ObjectPermissions>,
        target: &str,
    ) {
        if !self.options.include_permissions {
            return;
        }
        if let Some(permissions) = permissions {
            for statement in permission_statements(permissions, target) {
                script.batch(statement);
            }
        }
    }
}

pub type RenderFn = fn(&RenderContext<'_>, &CatalogObject) -> Result<String, RenderError>;

/// Kind-indexed renderer table
#[derive(Clone)]
pub struct Dispatch {
    renderers: [RenderFn; ObjectKind::COUNT],
}

impl Dispatch {
    pub fn new() -> Self {
        Self {
            renderers: ObjectKind::ALL.map(renderer_for),
        }
    }

    pub fn render(
        &self,
        context: &RenderContext<'_>,
        object: &CatalogObject,
    ) -> Result<String, RenderError> {
        (self.renderers[object.kind().index()])(context, object)
    }
}

impl Default for Dispatch {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatch")
            .field("kinds", &ObjectKind::COUNT)
            .finish()
    }
}

fn renderer_for(kind: ObjectKind) -> RenderFn {
    match kind {
        ObjectKind::Schema => render_schema,
        ObjectKind::UserDefinedType => render_scalar_type,
        ObjectKind::TableType => render_table_type,
        ObjectKind::Table => render_table,
        ObjectKind::View | ObjectKind::Trigger | ObjectKind::Function | ObjectKind::Procedure => {
            render_module
        }
    }
}

/// Cross-check that a writer received the kind it scripts.
pub(crate) fn expect_kind<'o>(
    object: &'o CatalogObject,
    kind: ObjectKind,
    renderer: &'static str,
) -> Result<&'o DatabaseObject, RenderError> {
    let inner = object.object();
    if inner.kind != kind {
        return Err(RenderError::KindMismatch {
            name: inner.qualified_name(),
            renderer,
            kind: inner.kind,
        });
    }
    Ok(inner)
}
