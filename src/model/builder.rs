//! Assemble a metadata graph from catalog rows
//!
//! Facets arrive in whatever order the catalog returns them; `build()` sorts every
//! collection so rendering never depends on load order.

use std::collections::BTreeMap;

use super::{
    Column, ForeignKey, Index, MetadataGraph, Namespace, ObjectPermissions,
    OwnedMetadata, PermissionRecord, Table, UserDefinedType,
};
use crate::util::qualified_name;

#[derive(Debug, Default)]
struct PendingFacets {
    columns: BTreeMap<String, Vec<Column>>,
    indexes: BTreeMap<String, BTreeMap<String, Index>>,
    foreign_keys: BTreeMap<String, BTreeMap<String, ForeignKey>>,
    permissions: BTreeMap<String, ObjectPermissions>,
}

impl PendingFacets {
    fn finish(self) -> OwnedMetadata {
        let columns = self
            .columns
            .into_iter()
            .map(|(owner, mut columns)| {
                columns.sort_by_key(|c| c.column_id);
                (owner, columns)
            })
            .collect();

        // BTreeMap iteration already yields name order
        let indexes = self
            .indexes
            .into_iter()
            .map(|(owner, by_name)| {
                let indexes = by_name
                    .into_values()
                    .map(|mut index| {
                        index.key_columns.sort_by_key(|c| c.key_ordinal);
                        index.included_columns.sort_by_key(|c| c.key_ordinal);
                        index
                    })
                    .collect();
                (owner, indexes)
            })
            .collect();

        let foreign_keys = self
            .foreign_keys
            .into_iter()
            .map(|(owner, by_name)| {
                let keys = by_name
                    .into_values()
                    .map(|mut fk| {
                        fk.columns.sort_by_key(|c| c.ordinal);
                        fk
                    })
                    .collect();
                (owner, keys)
            })
            .collect();

        OwnedMetadata {
            columns,
            indexes,
            foreign_keys,
            permissions: self.permissions,
        }
    }
}

/// Mutable accumulator consumed by [`MetadataGraphBuilder::build`]
#[derive(Debug, Default)]
pub struct MetadataGraphBuilder {
    server_major_version: u16,
    collation: Option<String>,
    objects: PendingFacets,
    types: PendingFacets,
    user_types: BTreeMap<String, UserDefinedType>,
    tables: BTreeMap<String, Table>,
}

impl MetadataGraphBuilder {
    pub fn new(server_major_version: u16) -> Self {
        Self {
            server_major_version,
            ..Default::default()
        }
    }

    fn facets(&mut self, namespace: Namespace) -> &mut PendingFacets {
        match namespace {
            Namespace::Object => &mut self.objects,
            Namespace::Type => &mut self.types,
        }
    }

    pub fn collation(&mut self, collation: Option<String>) -> &mut Self {
        self.collation = collation;
        self
    }

    pub fn add_column(&mut self, namespace: Namespace, owner: &str, column: Column) -> &mut Self {
        self.facets(namespace)
            .columns
            .entry(owner.to_string())
            .or_default()
            .push(column);
        self
    }

    /// Register an index; a second call with the same name keeps the first header.
    pub fn add_index(&mut self, namespace: Namespace, owner: &str, index: Index) -> &mut Self {
        self.facets(namespace)
            .indexes
            .entry(owner.to_string())
            .or_default()
            .entry(index.name.clone())
            .or_insert(index);
        self
    }

    /// Register a foreign key; rows for the same key merge their columns.
    pub fn add_foreign_key(&mut self, owner: &str, foreign_key: ForeignKey) -> &mut Self {
        let entry = self
            .objects
            .foreign_keys
            .entry(owner.to_string())
            .or_default();
        match entry.get_mut(&foreign_key.name) {
            Some(existing) => existing.columns.extend(foreign_key.columns),
            None => {
                entry.insert(foreign_key.name.clone(), foreign_key);
            }
        }
        self
    }

    pub fn add_permission(&mut self, namespace: Namespace, record: PermissionRecord) -> &mut Self {
        self.facets(namespace)
            .permissions
            .entry(record.securable)
            .or_default()
            .add(record.grantee, record.state, record.permission);
        self
    }

    pub fn add_user_type(&mut self, user_type: UserDefinedType) -> &mut Self {
        let key = qualified_name(&user_type.schema, &user_type.name);
        self.user_types.insert(key, user_type);
        self
    }

    pub fn add_table(&mut self, table: Table) -> &mut Self {
        let key = qualified_name(&table.schema, &table.name);
        self.tables.insert(key, table);
        self
    }

    pub fn build(self) -> MetadataGraph {
        MetadataGraph {
            server_major_version: self.server_major_version,
            collation: self.collation,
            objects: self.objects.finish(),
            types: self.types.finish(),
            user_types: self.user_types,
            tables: self.tables,
        }
    }
}
