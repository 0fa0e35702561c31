//! Column metadata

/// Context a column is rendered in; decides which trailing clauses apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerKind {
    Table,
    MemoryOptimizedTable,
    TableType,
    /// Column referenced from an `ALTER TABLE` batch; no trailing clause
    AlterTable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub seed: i64,
    pub increment: i64,
    pub not_for_replication: bool,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            seed: 1,
            increment: 1,
            not_for_replication: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultConstraint {
    pub name: String,
    pub definition: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputedColumn {
    pub expression: String,
    pub is_persisted: bool,
}

/// Temporal period column role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratedAlways {
    RowStart,
    RowEnd,
}

impl GeneratedAlways {
    /// Maps `sys.columns.generated_always_type`.
    pub fn from_catalog(value: i32) -> Option<Self> {
        match value {
            1 => Some(GeneratedAlways::RowStart),
            2 => Some(GeneratedAlways::RowEnd),
            _ => None,
        }
    }
}

/// Always Encrypted settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encryption {
    pub key_name: String,
    pub encryption_type: String,
    pub algorithm: String,
}

/// Typed XML binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlSchemaCollection {
    pub is_document: bool,
    pub schema: String,
    pub name: String,
}

/// A column of a table or table type.
///
/// `max_length` is already in display form: a character count, `max`, or the
/// fractional-seconds scale for `datetime2`/`time`/`datetimeoffset`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Column {
    pub column_id: i32,
    pub name: String,
    pub type_name: String,
    pub type_schema: Option<String>,
    pub is_user_defined: bool,
    pub max_length: Option<String>,
    pub precision: Option<i32>,
    pub scale: Option<i32>,
    pub is_nullable: bool,
    pub collation: Option<String>,
    pub identity: Option<Identity>,
    pub computed: Option<ComputedColumn>,
    pub default: Option<DefaultConstraint>,
    pub is_sparse: bool,
    pub is_column_set: bool,
    pub is_filestream: bool,
    pub is_rowguidcol: bool,
    pub is_hidden: bool,
    pub masking_function: Option<String>,
    pub encryption: Option<Encryption>,
    pub xml_collection: Option<XmlSchemaCollection>,
    pub generated_always: Option<GeneratedAlways>,
    pub description: Option<String>,
}

impl Column {
    /// Nullable column of a built-in type.
    pub fn new(column_id: i32, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            column_id,
            name: name.into(),
            type_name: type_name.into(),
            is_nullable: true,
            ..Default::default()
        }
    }

    /// Hidden graph bookkeeping columns and `$node_id`-style pseudo columns.
    pub fn is_graph_internal(&self) -> bool {
        self.name.starts_with('$') || (self.is_hidden && self.generated_always.is_none())
    }
}
