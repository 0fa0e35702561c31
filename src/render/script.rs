//! Text assembly shared by the writers

use std::fmt::Write as _;

use crate::util::escape_literal;

/// Space-separated clause list; empty clauses are ignored.
#[derive(Debug, Default)]
pub(crate) struct Clauses {
    text: String,
}

impl Clauses {
    pub(crate) fn push(&mut self, clause: impl AsRef<str>) {
        let clause = clause.as_ref();
        if clause.is_empty() {
            return;
        }
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(clause);
    }

    pub(crate) fn into_string(self) -> String {
        self.text
    }
}

/// Statement batches, each closed by the separator line and split by a blank line
#[derive(Debug)]
pub(crate) struct ScriptBuilder<'a> {
    separator: &'a str,
    text: String,
}

impl<'a> ScriptBuilder<'a> {
    pub(crate) fn new(separator: &'a str) -> Self {
        Self {
            separator,
            text: String::new(),
        }
    }

    pub(crate) fn batch(&mut self, statement: impl AsRef<str>) {
        if !self.text.is_empty() {
            self.text.push_str("\n\n");
        }
        self.text.push_str(statement.as_ref());
        self.text.push('\n');
        self.text.push_str(self.separator);
    }

    pub(crate) fn finish(self) -> String {
        self.text
    }
}

/// `sp_addextendedproperty` call for an MS_Description.
///
/// `levels` is (level type, name) from level0 (always the schema) downwards.
pub(crate) fn describe(description: &str, levels: &[(&str, &str)]) -> String {
    let mut statement =
        String::from("EXECUTE sp_addextendedproperty @name = N'MS_Description'");
    for (depth, (level_type, name)) in levels.iter().enumerate() {
        let _ = write!(
            statement,
            ", @level{depth}type = N'{}', @level{depth}name = N'{}'",
            level_type,
            escape_literal(name)
        );
    }
    let _ = write!(statement, ", @value = N'{}'", escape_literal(description));
    statement
}
