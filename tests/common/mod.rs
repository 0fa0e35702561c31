//! Common test utilities for rust-sqlscripter tests
#![allow(dead_code)]

use rust_sqlscripter::model::{
    CatalogObject, Column, DatabaseObject, Index, IndexType, IndexedColumn, MetadataGraph,
    MetadataGraphBuilder, Module, Namespace, ObjectKind, UserDefinedType, UserTypeShape,
};
use rust_sqlscripter::render::{Dispatch, RenderContext, RenderOptions};
use rust_sqlscripter::{EmittedObject, RenderError};

pub const CATALOG: &str = "ScripterTest";

/// SQL Server 2019
pub const SERVER_VERSION: u16 = 15;

pub fn plain(schema: &str, name: &str, kind: ObjectKind) -> CatalogObject {
    CatalogObject::Plain(DatabaseObject::new(CATALOG, schema, name, kind))
}

pub fn schema(name: &str) -> CatalogObject {
    plain(name, name, ObjectKind::Schema)
}

/// Module with both ANSI_NULLS and QUOTED_IDENTIFIER on.
pub fn module(schema: &str, name: &str, kind: ObjectKind, definition: &str) -> CatalogObject {
    let mut object = DatabaseObject::new(CATALOG, schema, name, kind);
    object.definition = Some(definition.to_string());
    CatalogObject::Module(Module {
        object,
        ansi_nulls: Some(true),
        quoted_identifier: Some(true),
    })
}

pub fn not_null(id: i32, name: &str, type_name: &str) -> Column {
    let mut column = Column::new(id, name, type_name);
    column.is_nullable = false;
    column
}

pub fn sized(id: i32, name: &str, type_name: &str, max_length: &str) -> Column {
    let mut column = Column::new(id, name, type_name);
    column.max_length = Some(max_length.to_string());
    column
}

/// `[dbo].[TestType]`: a table type with a three-column primary key and a unique index.
///
/// Columns and index columns are added out of order on purpose.
pub fn test_type_graph() -> MetadataGraph {
    let owner = "[dbo].[TestType]";
    let mut builder = MetadataGraphBuilder::new(SERVER_VERSION);
    builder.add_user_type(UserDefinedType {
        schema: "dbo".to_string(),
        name: "TestType".to_string(),
        shape: UserTypeShape::Table {
            is_memory_optimized: false,
        },
    });
    builder
        .add_column(Namespace::Type, owner, sized(2, "value", "nvarchar", "2048"))
        .add_column(Namespace::Type, owner, not_null(1, "key", "int"))
        .add_column(Namespace::Type, owner, not_null(3, "Session", "int"))
        .add_column(Namespace::Type, owner, not_null(4, "Division", "int"))
        .add_column(Namespace::Type, owner, not_null(5, "DeviceID", "int"));

    let mut primary_key = Index::new("PK_Test", IndexType::Nonclustered);
    primary_key.is_primary_key = true;
    primary_key.is_unique = true;
    primary_key.key_columns = vec![
        IndexedColumn::new("DeviceID", 3).descending(),
        IndexedColumn::new("Session", 1),
        IndexedColumn::new("Division", 2),
    ];

    let mut unique = Index::new("UK_Test", IndexType::Nonclustered);
    unique.is_unique = true;
    unique.ignore_dup_key = true;
    unique.key_columns = vec![
        IndexedColumn::new("Division", 2),
        IndexedColumn::new("Session", 1),
    ];

    builder
        .add_index(Namespace::Type, owner, unique)
        .add_index(Namespace::Type, owner, primary_key);
    builder.build()
}

pub fn render(graph: &MetadataGraph, object: &CatalogObject) -> Result<String, RenderError> {
    let options = RenderOptions::default();
    render_with(graph, &options, object)
}

pub fn render_with(
    graph: &MetadataGraph,
    options: &RenderOptions,
    object: &CatalogObject,
) -> Result<String, RenderError> {
    let context = RenderContext::new(graph, options);
    Dispatch::new().render(&context, object)
}

/// Owned copy of an [`EmittedObject`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captured {
    pub catalog: String,
    pub schema: String,
    pub name: String,
    pub kind: ObjectKind,
    pub text: String,
}

impl From<&EmittedObject<'_>> for Captured {
    fn from(object: &EmittedObject<'_>) -> Self {
        Self {
            catalog: object.catalog.to_string(),
            schema: object.schema.to_string(),
            name: object.name.to_string(),
            kind: object.kind,
            text: String::from_utf8_lossy(object.definition).into_owned(),
        }
    }
}
