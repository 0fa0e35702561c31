//! User-Defined Type Script Tests

use pretty_assertions::assert_eq;

use rust_sqlscripter::model::{
    MetadataGraphBuilder, Namespace, ObjectKind, PermissionRecord, PermissionState, ScalarAlias,
    UserDefinedType, UserTypeShape,
};
use rust_sqlscripter::RenderError;

use crate::common::{not_null, plain, render, test_type_graph, SERVER_VERSION};

const TEST_TYPE_SCRIPT: &str = "CREATE TYPE [dbo].[TestType] AS TABLE (
  [key] [int] NOT NULL,
  [value] [nvarchar](2048),
  [Session] [int] NOT NULL,
  [Division] [int] NOT NULL,
  [DeviceID] [int] NOT NULL,
  PRIMARY KEY [PK_Test] ([Session], [Division], [DeviceID] DESC),
  INDEX [UK_Test] UNIQUE ([Session], [Division]) WITH (IGNORE_DUP_KEY = ON)
)
GO";

// ============================================================================
// Table Type Tests
// ============================================================================

#[test]
fn test_table_type_script() {
    let graph = test_type_graph();
    let object = plain("dbo", "TestType", ObjectKind::TableType);
    assert_eq!(render(&graph, &object).unwrap(), TEST_TYPE_SCRIPT);
}

#[test]
fn test_table_type_rendering_is_deterministic() {
    let graph = test_type_graph();
    let object = plain("dbo", "TestType", ObjectKind::TableType);
    let first = render(&graph, &object).unwrap();
    let second = render(&graph, &object).unwrap();
    assert_eq!(first.as_bytes(), second.as_bytes());
}

#[test]
fn test_memory_optimized_table_type() {
    let mut builder = MetadataGraphBuilder::new(SERVER_VERSION);
    builder
        .add_user_type(UserDefinedType {
            schema: "app".to_string(),
            name: "SessionKeys".to_string(),
            shape: UserTypeShape::Table {
                is_memory_optimized: true,
            },
        })
        .add_column(
            Namespace::Type,
            "[app].[SessionKeys]",
            not_null(1, "SessionId", "int"),
        );
    let graph = builder.build();

    assert_eq!(
        render(&graph, &plain("app", "SessionKeys", ObjectKind::TableType)).unwrap(),
        "CREATE TYPE [app].[SessionKeys] AS TABLE (\n  [SessionId] [int] NOT NULL\n)\nWITH (MEMORY_OPTIMIZED = ON)\nGO"
    );
}

#[test]
fn test_table_type_without_columns_is_missing_metadata() {
    let mut builder = MetadataGraphBuilder::new(SERVER_VERSION);
    builder.add_user_type(UserDefinedType {
        schema: "dbo".to_string(),
        name: "Empty".to_string(),
        shape: UserTypeShape::Table {
            is_memory_optimized: false,
        },
    });
    let graph = builder.build();

    let err = render(&graph, &plain("dbo", "Empty", ObjectKind::TableType)).unwrap_err();
    assert!(
        matches!(err, RenderError::MissingMetadata { facet: "columns", .. }),
        "Unexpected error: {err}"
    );
}

// ============================================================================
// Scalar Alias Tests
// ============================================================================

fn alias_graph(alias: ScalarAlias) -> rust_sqlscripter::MetadataGraph {
    let mut builder = MetadataGraphBuilder::new(SERVER_VERSION);
    builder.add_user_type(UserDefinedType {
        schema: "dbo".to_string(),
        name: "Phone".to_string(),
        shape: UserTypeShape::Scalar(alias),
    });
    builder.build()
}

#[test]
fn test_scalar_type_with_length_and_not_null() {
    let mut alias = ScalarAlias::new("varchar");
    alias.max_length = Some("20".to_string());
    alias.is_nullable = false;
    let graph = alias_graph(alias);

    assert_eq!(
        render(&graph, &plain("dbo", "Phone", ObjectKind::UserDefinedType)).unwrap(),
        "CREATE TYPE [dbo].[Phone] FROM [varchar](20) NOT NULL\nGO"
    );
}

#[test]
fn test_scalar_type_without_length() {
    let graph = alias_graph(ScalarAlias::new("int"));
    assert_eq!(
        render(&graph, &plain("dbo", "Phone", ObjectKind::UserDefinedType)).unwrap(),
        "CREATE TYPE [dbo].[Phone] FROM [int]\nGO"
    );
}

#[test]
fn test_scalar_type_permissions_use_type_class() {
    let mut builder = MetadataGraphBuilder::new(SERVER_VERSION);
    builder
        .add_user_type(UserDefinedType {
            schema: "dbo".to_string(),
            name: "Phone".to_string(),
            shape: UserTypeShape::Scalar(ScalarAlias::new("int")),
        })
        .add_permission(
            Namespace::Type,
            PermissionRecord {
                securable: "[dbo].[Phone]".to_string(),
                grantee: "app_user".to_string(),
                state: PermissionState::Grant,
                permission: "REFERENCES".to_string(),
            },
        );
    let graph = builder.build();

    assert_eq!(
        render(&graph, &plain("dbo", "Phone", ObjectKind::UserDefinedType)).unwrap(),
        "CREATE TYPE [dbo].[Phone] FROM [int]\nGO\n\nGRANT\n  REFERENCES\nON TYPE :: [dbo].[Phone] TO [app_user]\nGO"
    );
}

#[test]
fn test_scalar_renderer_rejects_table_type_record() {
    let graph = test_type_graph();
    let err = render(&graph, &plain("dbo", "TestType", ObjectKind::UserDefinedType)).unwrap_err();
    assert!(matches!(
        err,
        RenderError::MissingMetadata {
            facet: "alias type",
            ..
        }
    ));
}
