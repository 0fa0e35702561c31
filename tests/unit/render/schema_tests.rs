//! Schema Script Tests

use pretty_assertions::assert_eq;

use rust_sqlscripter::model::{
    CatalogObject, MetadataGraphBuilder, Namespace, ObjectKind, PermissionRecord,
    PermissionState,
};
use rust_sqlscripter::render::Dispatch;
use rust_sqlscripter::{RenderContext, RenderError, RenderOptions};

use crate::common::{plain, render, schema, SERVER_VERSION};

fn with_owner(name: &str, owner: &str) -> CatalogObject {
    let mut object = schema(name);
    if let CatalogObject::Plain(inner) = &mut object {
        inner.owner = Some(owner.to_string());
    }
    object
}

#[test]
fn test_schema_with_owner() {
    let graph = MetadataGraphBuilder::new(SERVER_VERSION).build();
    assert_eq!(
        render(&graph, &with_owner("sales", "dbo")).unwrap(),
        "CREATE SCHEMA [sales] AUTHORIZATION [dbo]\nGO"
    );
}

#[test]
fn test_schema_without_owner_omits_authorization() {
    let graph = MetadataGraphBuilder::new(SERVER_VERSION).build();
    assert_eq!(
        render(&graph, &schema("sales")).unwrap(),
        "CREATE SCHEMA [sales]\nGO"
    );
}

#[test]
fn test_schema_permission_blocks_are_grouped_and_sorted() {
    let mut builder = MetadataGraphBuilder::new(SERVER_VERSION);
    for (grantee, state, permission) in [
        ("writer", PermissionState::Grant, "UPDATE"),
        ("reader", PermissionState::Grant, "SELECT"),
        ("writer", PermissionState::Grant, "INSERT"),
        ("reader", PermissionState::Deny, "DELETE"),
        ("reader", PermissionState::Grant, "EXECUTE"),
    ] {
        builder.add_permission(
            Namespace::Object,
            PermissionRecord {
                securable: "[sales]".to_string(),
                grantee: grantee.to_string(),
                state,
                permission: permission.to_string(),
            },
        );
    }
    let graph = builder.build();

    let mut object = with_owner("sales", "dbo");
    if let CatalogObject::Plain(inner) = &mut object {
        inner.description = Some("Sales data".to_string());
    }

    assert_eq!(
        render(&graph, &object).unwrap(),
        "\
CREATE SCHEMA [sales] AUTHORIZATION [dbo]
GO

GRANT
  EXECUTE,
  SELECT
ON SCHEMA :: [sales] TO [reader]
GO

DENY
  DELETE
ON SCHEMA :: [sales] TO [reader]
GO

GRANT
  INSERT,
  UPDATE
ON SCHEMA :: [sales] TO [writer]
GO

EXECUTE sp_addextendedproperty @name = N'MS_Description', @level0type = N'SCHEMA', @level0name = N'sales', @value = N'Sales data'
GO"
    );
}

#[test]
fn test_dispatch_routes_every_kind_to_its_renderer() {
    let graph = MetadataGraphBuilder::new(SERVER_VERSION).build();
    let options = RenderOptions::default();
    let context = RenderContext::new(&graph, &options);
    let dispatch = Dispatch::new();

    assert!(dispatch.render(&context, &schema("sales")).is_ok());
    for kind in [ObjectKind::View, ObjectKind::Trigger, ObjectKind::Function, ObjectKind::Procedure] {
        assert!(
            matches!(
                dispatch.render(&context, &plain("dbo", "X", kind)),
                Err(RenderError::NotAModule { .. })
            ),
            "{kind} should reach the module renderer"
        );
    }
    assert!(matches!(
        dispatch.render(&context, &plain("dbo", "X", ObjectKind::Table)),
        Err(RenderError::MissingMetadata { facet: "table", .. })
    ));
}
