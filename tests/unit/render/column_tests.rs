//! Column Definition Tests

use pretty_assertions::assert_eq;

use rust_sqlscripter::model::{
    Column, ComputedColumn, DefaultConstraint, Encryption, GeneratedAlways, Identity, OwnerKind,
    XmlSchemaCollection,
};
use rust_sqlscripter::render::{render_column, type_clause};

use crate::common::{not_null, sized};

// ============================================================================
// Type Clause Tests
// ============================================================================

#[test]
fn test_type_without_length_has_no_parentheses() {
    let column = Column::new(1, "Id", "int");
    assert_eq!(type_clause(&column), "[int]");
    assert_eq!(render_column(&column, OwnerKind::Table, None), "[Id] [int]");
}

#[test]
fn test_type_with_max_length() {
    let column = sized(1, "Body", "nvarchar", "max");
    assert_eq!(type_clause(&column), "[nvarchar](max)");
}

#[test]
fn test_type_with_precision_and_scale() {
    let mut column = Column::new(1, "Amount", "decimal");
    column.precision = Some(18);
    column.scale = Some(2);
    assert_eq!(type_clause(&column), "[decimal](18, 2)");
}

#[test]
fn test_type_with_zero_scale_shows_precision_only() {
    let mut column = Column::new(1, "Amount", "decimal");
    column.precision = Some(18);
    column.scale = Some(0);
    assert_eq!(
        type_clause(&column),
        "[decimal](18)",
        "A zero scale should not be rendered"
    );
}

#[test]
fn test_user_defined_type_is_schema_qualified() {
    let mut column = not_null(1, "Phone", "PhoneNumber");
    column.is_user_defined = true;
    column.type_schema = Some("dbo".to_string());
    assert_eq!(
        render_column(&column, OwnerKind::Table, None),
        "[Phone] [dbo].[PhoneNumber] NOT NULL"
    );
}

#[test]
fn test_xml_column_with_schema_collection() {
    let mut column = Column::new(1, "Doc", "xml");
    column.xml_collection = Some(XmlSchemaCollection {
        is_document: true,
        schema: "dbo".to_string(),
        name: "OrderSchemas".to_string(),
    });
    assert_eq!(type_clause(&column), "[xml] DOCUMENT [dbo].[OrderSchemas]");

    column.xml_collection.as_mut().unwrap().is_document = false;
    assert_eq!(type_clause(&column), "[xml] CONTENT [dbo].[OrderSchemas]");
}

// ============================================================================
// Identity and Nullability Tests
// ============================================================================

#[test]
fn test_not_null_column() {
    let column = not_null(1, "key", "int");
    assert_eq!(
        render_column(&column, OwnerKind::TableType, None),
        "[key] [int] NOT NULL"
    );
}

#[test]
fn test_nullable_sized_column() {
    let column = sized(2, "value", "nvarchar", "2048");
    assert_eq!(
        render_column(&column, OwnerKind::TableType, None),
        "[value] [nvarchar](2048)"
    );
}

#[test]
fn test_default_identity_has_no_arguments() {
    let mut column = not_null(1, "Id", "int");
    column.identity = Some(Identity::default());
    assert_eq!(
        render_column(&column, OwnerKind::Table, None),
        "[Id] [int] IDENTITY",
        "Identity columns never repeat NOT NULL"
    );
}

#[test]
fn test_identity_with_seed_and_increment() {
    let mut column = not_null(1, "Id", "bigint");
    column.identity = Some(Identity {
        seed: 10,
        increment: 5,
        not_for_replication: true,
    });
    assert_eq!(
        render_column(&column, OwnerKind::Table, None),
        "[Id] [bigint] IDENTITY(10, 5) NOT FOR REPLICATION"
    );
    assert_eq!(
        render_column(&column, OwnerKind::TableType, None),
        "[Id] [bigint] IDENTITY(10, 5)",
        "Table types do not support NOT FOR REPLICATION"
    );
}

// ============================================================================
// Owner Clause Tests
// ============================================================================

fn flag_column() -> Column {
    let mut column = not_null(3, "Flag", "bit");
    column.default = Some(DefaultConstraint {
        name: "DF_Flag".to_string(),
        definition: "((0))".to_string(),
    });
    column
}

#[test]
fn test_table_column_uses_named_default() {
    assert_eq!(
        render_column(&flag_column(), OwnerKind::Table, None),
        "[Flag] [bit] CONSTRAINT [DF_Flag] DEFAULT ((0)) NOT NULL"
    );
}

#[test]
fn test_memory_optimized_column_puts_not_null_before_default() {
    assert_eq!(
        render_column(&flag_column(), OwnerKind::MemoryOptimizedTable, None),
        "[Flag] [bit] NOT NULL CONSTRAINT [DF_Flag] DEFAULT ((0))"
    );
}

#[test]
fn test_table_type_column_uses_unnamed_default() {
    assert_eq!(
        render_column(&flag_column(), OwnerKind::TableType, None),
        "[Flag] [bit] NOT NULL DEFAULT ((0))"
    );
}

#[test]
fn test_alter_table_column_has_no_trailing_clause() {
    assert_eq!(
        render_column(&flag_column(), OwnerKind::AlterTable, None),
        "[Flag] [bit]"
    );
}

#[test]
fn test_collation_matching_database_default_is_omitted() {
    let mut column = sized(1, "Name", "nvarchar", "100");
    column.collation = Some("SQL_Latin1_General_CP1_CI_AS".to_string());

    assert_eq!(
        render_column(
            &column,
            OwnerKind::Table,
            Some("SQL_Latin1_General_CP1_CI_AS")
        ),
        "[Name] [nvarchar](100)"
    );
    assert_eq!(
        render_column(&column, OwnerKind::Table, Some("Latin1_General_BIN")),
        "[Name] [nvarchar](100) COLLATE SQL_Latin1_General_CP1_CI_AS"
    );
}

#[test]
fn test_table_clause_order() {
    let mut column = sized(4, "Email", "nvarchar", "256");
    column.is_nullable = false;
    column.collation = Some("Latin1_General_BIN".to_string());
    column.masking_function = Some("email()".to_string());
    column.default = Some(DefaultConstraint {
        name: "DF_Email".to_string(),
        definition: "('')".to_string(),
    });

    assert_eq!(
        render_column(&column, OwnerKind::Table, None),
        "[Email] [nvarchar](256) COLLATE Latin1_General_BIN MASKED WITH (FUNCTION = 'email()') CONSTRAINT [DF_Email] DEFAULT ('') NOT NULL"
    );
}

#[test]
fn test_sparse_and_column_set() {
    let mut sparse = sized(2, "Color", "varchar", "20");
    sparse.is_sparse = true;
    assert_eq!(
        render_column(&sparse, OwnerKind::Table, None),
        "[Color] [varchar](20) SPARSE"
    );

    let mut set = Column::new(3, "Properties", "xml");
    set.is_column_set = true;
    assert_eq!(
        render_column(&set, OwnerKind::Table, None),
        "[Properties] [xml] COLUMN_SET FOR ALL_SPARSE_COLUMNS"
    );
}

#[test]
fn test_filestream_and_rowguidcol() {
    let mut guid = not_null(1, "RowId", "uniqueidentifier");
    guid.is_rowguidcol = true;
    assert_eq!(
        render_column(&guid, OwnerKind::Table, None),
        "[RowId] [uniqueidentifier] NOT NULL ROWGUIDCOL"
    );

    let mut blob = sized(2, "Content", "varbinary", "max");
    blob.is_filestream = true;
    assert_eq!(
        render_column(&blob, OwnerKind::Table, None),
        "[Content] [varbinary](max) FILESTREAM"
    );
}

#[test]
fn test_period_columns() {
    let mut column = not_null(5, "ValidFrom", "datetime2");
    column.precision = Some(7);
    column.generated_always = Some(GeneratedAlways::RowStart);
    column.is_hidden = true;
    assert_eq!(
        render_column(&column, OwnerKind::Table, None),
        "[ValidFrom] [datetime2](7) GENERATED ALWAYS AS ROW START HIDDEN NOT NULL"
    );
}

#[test]
fn test_encrypted_column() {
    let mut column = sized(2, "SSN", "char", "11");
    column.is_nullable = false;
    column.collation = Some("Latin1_General_BIN2".to_string());
    column.encryption = Some(Encryption {
        key_name: "CEK1".to_string(),
        encryption_type: "DETERMINISTIC".to_string(),
        algorithm: "AEAD_AES_256_CBC_HMAC_SHA_256".to_string(),
    });
    assert_eq!(
        render_column(&column, OwnerKind::Table, Some("Latin1_General_BIN2")),
        "[SSN] [char](11) NOT NULL ENCRYPTED WITH (COLUMN_ENCRYPTION_KEY = [CEK1], ENCRYPTION_TYPE = DETERMINISTIC, ALGORITHM = 'AEAD_AES_256_CBC_HMAC_SHA_256')"
    );
}

#[test]
fn test_computed_column_renders_expression_only() {
    let mut column = not_null(6, "Total", "money");
    column.computed = Some(ComputedColumn {
        expression: "([Quantity]*[Price])".to_string(),
        is_persisted: true,
    });
    assert_eq!(
        render_column(&column, OwnerKind::Table, None),
        "[Total] AS ([Quantity]*[Price]) PERSISTED"
    );

    column.computed.as_mut().unwrap().is_persisted = false;
    assert_eq!(
        render_column(&column, OwnerKind::Table, None),
        "[Total] AS ([Quantity]*[Price])"
    );
}
