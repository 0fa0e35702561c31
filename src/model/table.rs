//! Physical table attributes

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSpace {
    Filegroup(String),
    /// Partition scheme and the partitioning column
    PartitionScheme { scheme: String, column: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockEscalation {
    #[default]
    Table,
    Auto,
    Disable,
}

impl LockEscalation {
    pub fn from_desc(desc: &str) -> Option<Self> {
        match desc {
            "TABLE" => Some(LockEscalation::Table),
            "AUTO" => Some(LockEscalation::Auto),
            "DISABLE" => Some(LockEscalation::Disable),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            LockEscalation::Table => "TABLE",
            LockEscalation::Auto => "AUTO",
            LockEscalation::Disable => "DISABLE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Durability {
    #[default]
    SchemaAndData,
    SchemaOnly,
}

/// `sys.tables.temporal_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemporalRole {
    #[default]
    NonTemporal,
    History,
    SystemVersioned,
}

impl TemporalRole {
    pub fn from_catalog(value: i32) -> Self {
        match value {
            1 => TemporalRole::History,
            2 => TemporalRole::SystemVersioned,
            _ => TemporalRole::NonTemporal,
        }
    }
}

/// `HISTORY_RETENTION_PERIOD`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Retention {
    Infinite,
    Period { count: i32, unit: String },
}

impl Retention {
    pub fn from_catalog(count: i32, unit: &str) -> Self {
        if unit == "INFINITE" || count < 0 {
            Retention::Infinite
        } else {
            Retention::Period {
                count,
                unit: unit.to_string(),
            }
        }
    }

    pub fn render(&self) -> String {
        match self {
            Retention::Infinite => "INFINITE".to_string(),
            Retention::Period { count, unit } if *count == 1 => format!("1 {}", unit),
            Retention::Period { count, unit } => format!("{} {}S", count, unit),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub schema: String,
    pub name: String,
    pub data_space: Option<DataSpace>,
    pub lob_data_space: Option<String>,
    pub filestream_data_space: Option<String>,
    pub lock_escalation: LockEscalation,
    pub is_memory_optimized: bool,
    pub durability: Durability,
    pub temporal_role: TemporalRole,
    /// `(schema, name)` of the linked history table
    pub history_table: Option<(String, String)>,
    pub history_retention: Option<Retention>,
    pub is_tracked_by_cdc: bool,
    pub is_filetable: bool,
    pub is_node: bool,
    pub is_edge: bool,
}

impl Table {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            ..Default::default()
        }
    }
}
