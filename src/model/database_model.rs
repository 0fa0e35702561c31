//! The read-only metadata snapshot renderers work from

use std::collections::BTreeMap;

use super::{Column, ForeignKey, Index, ObjectPermissions, Table, UserDefinedType};

/// Objects and types have separate name spaces on the server, so a table and a
/// table type may share a qualified name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Object,
    Type,
}

/// Facets owned by a qualified name within one namespace
#[derive(Debug, Clone, Default)]
pub struct OwnedMetadata {
    pub(crate) columns: BTreeMap<String, Vec<Column>>,
    pub(crate) indexes: BTreeMap<String, Vec<Index>>,
    pub(crate) foreign_keys: BTreeMap<String, Vec<ForeignKey>>,
    pub(crate) permissions: BTreeMap<String, ObjectPermissions>,
}

impl OwnedMetadata {
    /// Columns ordered by column id.
    pub fn columns(&self, owner: &str) -> &[Column] {
        self.columns.get(owner).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Indexes ordered by name.
    pub fn indexes(&self, owner: &str) -> &[Index] {
        self.indexes.get(owner).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Foreign keys ordered by name.
    pub fn foreign_keys(&self, owner: &str) -> &[ForeignKey] {
        self.foreign_keys
            .get(owner)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// `None` when the securable has no grants at all.
    pub fn permissions(&self, owner: &str) -> Option<&ObjectPermissions> {
        self.permissions.get(owner).filter(|grants| !grants.is_empty())
    }
}

/// Everything loaded from the catalog for one run.
///
/// Produced only by [`super::MetadataGraphBuilder::build`] and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct MetadataGraph {
    pub(crate) server_major_version: u16,
    pub(crate) collation: Option<String>,
    pub(crate) objects: OwnedMetadata,
    pub(crate) types: OwnedMetadata,
    pub(crate) user_types: BTreeMap<String, UserDefinedType>,
    pub(crate) tables: BTreeMap<String, Table>,
}

impl MetadataGraph {
    pub fn server_major_version(&self) -> u16 {
        self.server_major_version
    }

    /// Database default collation.
    pub fn collation(&self) -> Option<&str> {
        self.collation.as_deref()
    }

    pub fn namespace(&self, namespace: Namespace) -> &OwnedMetadata {
        match namespace {
            Namespace::Object => &self.objects,
            Namespace::Type => &self.types,
        }
    }

    /// Schemas, tables and modules.
    pub fn objects(&self) -> &OwnedMetadata {
        &self.objects
    }

    /// Table types and alias types.
    pub fn types(&self) -> &OwnedMetadata {
        &self.types
    }

    pub fn user_type(&self, name: &str) -> Option<&UserDefinedType> {
        self.user_types.get(name)
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn user_type_count(&self) -> usize {
        self.user_types.len()
    }
}
