//! Typed column access over tiberius rows

use tiberius::Row;

use crate::error::{Result, ScriptError};

/// Reads one catalog row, turning driver and NULL problems into [`ScriptError`]s
/// tagged with the facet being loaded.
pub(crate) struct RowReader<'a> {
    row: &'a Row,
    facet: &'static str,
}

impl<'a> RowReader<'a> {
    pub(crate) fn new(row: &'a Row, facet: &'static str) -> Self {
        Self { row, facet }
    }

    fn driver_error(&self, source: tiberius::error::Error) -> ScriptError {
        ScriptError::database(format!("reading {} rows", self.facet), source)
    }

    fn missing(&self, column: &str) -> ScriptError {
        ScriptError::Catalog {
            facet: self.facet,
            message: format!("column {} is NULL", column),
        }
    }

    pub(crate) fn str(&self, idx: usize) -> Result<Option<&'a str>> {
        self.row
            .try_get::<&str, _>(idx)
            .map_err(|e| self.driver_error(e))
    }

    pub(crate) fn string(&self, idx: usize) -> Result<Option<String>> {
        Ok(self.str(idx)?.map(str::to_string))
    }

    pub(crate) fn required_str(&self, idx: usize, column: &str) -> Result<&'a str> {
        self.str(idx)?.ok_or_else(|| self.missing(column))
    }

    pub(crate) fn required_string(&self, idx: usize, column: &str) -> Result<String> {
        self.required_str(idx, column).map(str::to_string)
    }

    pub(crate) fn int(&self, idx: usize) -> Result<Option<i32>> {
        self.row
            .try_get::<i32, _>(idx)
            .map_err(|e| self.driver_error(e))
    }

    pub(crate) fn required_int(&self, idx: usize, column: &str) -> Result<i32> {
        self.int(idx)?.ok_or_else(|| self.missing(column))
    }

    pub(crate) fn bigint(&self, idx: usize) -> Result<Option<i64>> {
        self.row
            .try_get::<i64, _>(idx)
            .map_err(|e| self.driver_error(e))
    }

    pub(crate) fn opt_flag(&self, idx: usize) -> Result<Option<bool>> {
        self.row
            .try_get::<bool, _>(idx)
            .map_err(|e| self.driver_error(e))
    }

    /// Bit column where NULL reads as false.
    pub(crate) fn flag(&self, idx: usize) -> Result<bool> {
        Ok(self.opt_flag(idx)?.unwrap_or(false))
    }

    pub(crate) fn catalog_error(&self, message: impl Into<String>) -> ScriptError {
        ScriptError::Catalog {
            facet: self.facet,
            message: message.into(),
        }
    }
}
