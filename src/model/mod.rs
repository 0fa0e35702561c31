//! Metadata model for SQL Server objects

mod builder;
mod column;
mod database_model;
mod elements;
mod foreign_key;
mod index;
mod permission;
mod table;
mod user_type;

pub use builder::MetadataGraphBuilder;
pub use column::{
    Column, ComputedColumn, DefaultConstraint, Encryption, GeneratedAlways, Identity, OwnerKind,
    XmlSchemaCollection,
};
pub use database_model::{MetadataGraph, Namespace, OwnedMetadata};
pub use elements::{CatalogObject, DatabaseObject, Module, ObjectKind, ParentObject};
pub use foreign_key::{ForeignKey, ForeignKeyColumn, ReferentialAction};
pub use index::{Index, IndexClass, IndexType, IndexedColumn};
pub use permission::{ObjectPermissions, PermissionRecord, PermissionState};
pub use table::{DataSpace, Durability, LockEscalation, Retention, Table, TemporalRole};
pub use user_type::{ScalarAlias, UserDefinedType, UserTypeShape};
