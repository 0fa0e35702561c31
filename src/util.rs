//! Shared quoting helpers.

/// Wrap an identifier in brackets, doubling any closing bracket.
#[inline]
pub fn quote_ident(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 2);
    out.push('[');
    for ch in ident.chars() {
        if ch == ']' {
            out.push_str("]]");
        } else {
            out.push(ch);
        }
    }
    out.push(']');
    out
}

/// `[schema].[name]`
#[inline]
pub fn qualified_name(schema: &str, name: &str) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(name))
}

/// Escape a value for use inside an `N'...'` literal.
#[inline]
pub fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Comma-joined bracketed identifiers.
pub fn quoted_list<'a, I>(names: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(", ")
}
