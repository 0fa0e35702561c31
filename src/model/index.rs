//! Index and key-constraint metadata

/// Rendering class; also the order classes appear in a table body
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IndexClass {
    PrimaryKey,
    Unique,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    Clustered,
    Nonclustered,
    NonclusteredHash,
    ClusteredColumnstore,
    NonclusteredColumnstore,
    Xml,
    Spatial,
}

impl IndexType {
    /// Parses `sys.indexes.type_desc`.
    pub fn from_type_desc(desc: &str) -> Option<Self> {
        match desc {
            "CLUSTERED" => Some(IndexType::Clustered),
            "NONCLUSTERED" => Some(IndexType::Nonclustered),
            "NONCLUSTERED HASH" => Some(IndexType::NonclusteredHash),
            "CLUSTERED COLUMNSTORE" => Some(IndexType::ClusteredColumnstore),
            "NONCLUSTERED COLUMNSTORE" => Some(IndexType::NonclusteredColumnstore),
            "XML" => Some(IndexType::Xml),
            "SPATIAL" => Some(IndexType::Spatial),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            IndexType::Clustered => "CLUSTERED",
            IndexType::Nonclustered => "NONCLUSTERED",
            IndexType::NonclusteredHash => "NONCLUSTERED HASH",
            IndexType::ClusteredColumnstore => "CLUSTERED COLUMNSTORE",
            IndexType::NonclusteredColumnstore => "NONCLUSTERED COLUMNSTORE",
            IndexType::Xml => "XML",
            IndexType::Spatial => "SPATIAL",
        }
    }

    pub fn is_columnstore(self) -> bool {
        matches!(
            self,
            IndexType::ClusteredColumnstore | IndexType::NonclusteredColumnstore
        )
    }

    /// XML and spatial indexes are loaded but never scripted.
    pub fn is_scripted(self) -> bool {
        !matches!(self, IndexType::Xml | IndexType::Spatial)
    }
}

/// A key or included column.
///
/// For included columns `key_ordinal` holds the index column id, which gives
/// their declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedColumn {
    pub name: String,
    pub key_ordinal: i32,
    pub is_descending: bool,
}

impl IndexedColumn {
    pub fn new(name: impl Into<String>, key_ordinal: i32) -> Self {
        Self {
            name: name.into(),
            key_ordinal,
            is_descending: false,
        }
    }

    pub fn descending(mut self) -> Self {
        self.is_descending = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    pub name: String,
    pub index_type: IndexType,
    pub is_primary_key: bool,
    pub is_unique: bool,
    pub is_unique_constraint: bool,
    pub ignore_dup_key: bool,
    pub bucket_count: Option<i64>,
    pub filter: Option<String>,
    /// 0 means the server default
    pub fill_factor: i32,
    pub is_padded: bool,
    pub allow_row_locks: bool,
    pub allow_page_locks: bool,
    pub optimize_for_sequential_key: bool,
    pub is_disabled: bool,
    pub key_columns: Vec<IndexedColumn>,
    pub included_columns: Vec<IndexedColumn>,
    pub description: Option<String>,
}

impl Index {
    pub fn new(name: impl Into<String>, index_type: IndexType) -> Self {
        Self {
            name: name.into(),
            index_type,
            is_primary_key: false,
            is_unique: false,
            is_unique_constraint: false,
            ignore_dup_key: false,
            bucket_count: None,
            filter: None,
            fill_factor: 0,
            is_padded: false,
            allow_row_locks: true,
            allow_page_locks: true,
            optimize_for_sequential_key: false,
            is_disabled: false,
            key_columns: Vec::new(),
            included_columns: Vec::new(),
            description: None,
        }
    }

    pub fn class(&self) -> IndexClass {
        if self.is_primary_key {
            IndexClass::PrimaryKey
        } else if self.is_unique {
            IndexClass::Unique
        } else {
            IndexClass::Custom
        }
    }

    /// Declared through `PRIMARY KEY` / `UNIQUE` rather than `CREATE INDEX`.
    pub fn is_constraint(&self) -> bool {
        self.is_primary_key || self.is_unique_constraint
    }

    /// Key columns in key-ordinal order, whatever order they were loaded in.
    pub fn ordered_keys(&self) -> Vec<&IndexedColumn> {
        ordered(&self.key_columns)
    }

    pub fn ordered_includes(&self) -> Vec<&IndexedColumn> {
        ordered(&self.included_columns)
    }
}

fn ordered(columns: &[IndexedColumn]) -> Vec<&IndexedColumn> {
    let mut sorted: Vec<&IndexedColumn> = columns.iter().collect();
    sorted.sort_by(|a, b| {
        a.key_ordinal
            .cmp(&b.key_ordinal)
            .then_with(|| a.name.cmp(&b.name))
    });
    sorted
}
