//! Foreign key metadata

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferentialAction {
    #[default]
    NoAction,
    Cascade,
    SetNull,
    SetDefault,
}

impl ReferentialAction {
    /// Parses `*_referential_action_desc`.
    pub fn from_desc(desc: &str) -> Option<Self> {
        match desc {
            "NO_ACTION" => Some(ReferentialAction::NoAction),
            "CASCADE" => Some(ReferentialAction::Cascade),
            "SET_NULL" => Some(ReferentialAction::SetNull),
            "SET_DEFAULT" => Some(ReferentialAction::SetDefault),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            ReferentialAction::NoAction => "NO ACTION",
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::SetDefault => "SET DEFAULT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyColumn {
    pub ordinal: i32,
    pub column: String,
    pub referenced_column: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub name: String,
    pub referenced_schema: String,
    pub referenced_table: String,
    pub columns: Vec<ForeignKeyColumn>,
    pub on_delete: ReferentialAction,
    pub on_update: ReferentialAction,
    pub is_disabled: bool,
    pub is_not_trusted: bool,
    pub is_not_for_replication: bool,
    pub description: Option<String>,
}

impl ForeignKey {
    pub fn new(
        name: impl Into<String>,
        referenced_schema: impl Into<String>,
        referenced_table: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            referenced_schema: referenced_schema.into(),
            referenced_table: referenced_table.into(),
            columns: Vec::new(),
            on_delete: ReferentialAction::NoAction,
            on_update: ReferentialAction::NoAction,
            is_disabled: false,
            is_not_trusted: false,
            is_not_for_replication: false,
            description: None,
        }
    }
}
