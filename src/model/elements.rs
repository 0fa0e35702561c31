//! Scriptable objects as reported by the object enumerator

use std::fmt;
use std::str::FromStr;

use crate::error::ScriptError;
use crate::util::{qualified_name, quote_ident};

/// Every kind of object the scripter can emit, in enumeration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectKind {
    Schema,
    UserDefinedType,
    TableType,
    Table,
    View,
    Trigger,
    Function,
    Procedure,
}

impl ObjectKind {
    pub const COUNT: usize = 8;

    pub const ALL: [ObjectKind; ObjectKind::COUNT] = [
        ObjectKind::Schema,
        ObjectKind::UserDefinedType,
        ObjectKind::TableType,
        ObjectKind::Table,
        ObjectKind::View,
        ObjectKind::Trigger,
        ObjectKind::Function,
        ObjectKind::Procedure,
    ];

    /// Position in dispatch tables and allow-list masks.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Tag the enumeration query reports in its `object_kind` column.
    pub fn catalog_tag(self) -> &'static str {
        match self {
            ObjectKind::Schema => "SCHEMA",
            ObjectKind::UserDefinedType => "DATA TYPE",
            ObjectKind::TableType => "TABLE TYPE",
            ObjectKind::Table => "BASE TABLE",
            ObjectKind::View => "VIEW",
            ObjectKind::Trigger => "TRIGGER",
            ObjectKind::Function => "FUNCTION",
            ObjectKind::Procedure => "PROCEDURE",
        }
    }

    pub fn from_catalog_tag(tag: &str) -> Option<Self> {
        ObjectKind::ALL
            .into_iter()
            .find(|kind| kind.catalog_tag() == tag)
    }

    /// Name accepted in the kind allow-list.
    pub fn config_name(self) -> &'static str {
        match self {
            ObjectKind::Schema => "schema",
            ObjectKind::UserDefinedType => "type",
            ObjectKind::TableType => "tableType",
            ObjectKind::Table => "table",
            ObjectKind::View => "view",
            ObjectKind::Trigger => "trigger",
            ObjectKind::Function => "function",
            ObjectKind::Procedure => "procedure",
        }
    }

    /// Views, triggers, functions and procedures carry module settings.
    pub fn is_module(self) -> bool {
        matches!(
            self,
            ObjectKind::View | ObjectKind::Trigger | ObjectKind::Function | ObjectKind::Procedure
        )
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.catalog_tag())
    }
}

impl FromStr for ObjectKind {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ObjectKind::ALL
            .into_iter()
            .find(|kind| kind.config_name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ScriptError::UnknownObjectKind {
                name: s.to_string(),
            })
    }
}

/// Object a trigger is attached to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentObject {
    Table(String),
    View(String),
}

impl ParentObject {
    pub fn name(&self) -> &str {
        match self {
            ParentObject::Table(name) | ParentObject::View(name) => name,
        }
    }

    /// Extended-property level1 type of the parent.
    pub fn level_type(&self) -> &'static str {
        match self {
            ParentObject::Table(_) => "TABLE",
            ParentObject::View(_) => "VIEW",
        }
    }
}

/// Identity and raw catalog attributes shared by every scriptable object.
///
/// For schemas, `schema` and `name` both hold the schema name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseObject {
    pub catalog: String,
    pub schema: String,
    pub name: String,
    pub kind: ObjectKind,
    /// Raw module text; `None` for non-modules and encrypted modules
    pub definition: Option<String>,
    pub owner: Option<String>,
    /// MS_Description extended property
    pub description: Option<String>,
    /// Parent table or view (triggers only)
    pub parent: Option<ParentObject>,
}

impl DatabaseObject {
    pub fn new(
        catalog: impl Into<String>,
        schema: impl Into<String>,
        name: impl Into<String>,
        kind: ObjectKind,
    ) -> Self {
        Self {
            catalog: catalog.into(),
            schema: schema.into(),
            name: name.into(),
            kind,
            definition: None,
            owner: None,
            description: None,
            parent: None,
        }
    }

    /// `[schema]` for schemas, `[schema].[name]` for everything else.
    ///
    /// This is the key used by the metadata graph and matched by filters.
    pub fn qualified_name(&self) -> String {
        match self.kind {
            ObjectKind::Schema => quote_ident(&self.name),
            _ => qualified_name(&self.schema, &self.name),
        }
    }
}

/// A programmable object with its ANSI_NULLS / QUOTED_IDENTIFIER settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub object: DatabaseObject,
    pub ansi_nulls: Option<bool>,
    pub quoted_identifier: Option<bool>,
}

/// One row of the object enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogObject {
    Plain(DatabaseObject),
    Module(Module),
}

impl CatalogObject {
    pub fn object(&self) -> &DatabaseObject {
        match self {
            CatalogObject::Plain(object) => object,
            CatalogObject::Module(module) => &module.object,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        self.object().kind
    }

    pub fn qualified_name(&self) -> String {
        self.object().qualified_name()
    }
}

impl From<DatabaseObject> for CatalogObject {
    fn from(object: DatabaseObject) -> Self {
        CatalogObject::Plain(object)
    }
}

impl From<Module> for CatalogObject {
    fn from(module: Module) -> Self {
        CatalogObject::Module(module)
    }
}
