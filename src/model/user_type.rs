//! User-defined types

/// Parent type of an alias type, in the same display form as [`super::Column`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarAlias {
    pub base_type: String,
    pub max_length: Option<String>,
    pub precision: Option<i32>,
    pub scale: Option<i32>,
    pub collation: Option<String>,
    pub is_nullable: bool,
}

impl ScalarAlias {
    pub fn new(base_type: impl Into<String>) -> Self {
        Self {
            base_type: base_type.into(),
            max_length: None,
            precision: None,
            scale: None,
            collation: None,
            is_nullable: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserTypeShape {
    Scalar(ScalarAlias),
    /// Columns and indexes live in the graph's type namespace under the type's name.
    Table { is_memory_optimized: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDefinedType {
    pub schema: String,
    pub name: String,
    pub shape: UserTypeShape,
}
