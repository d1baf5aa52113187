mod scanner;

use scanner::{
    State, is_block_comment_end, is_block_comment_start, is_line_comment_start, matches_tag,
    scan_ident, try_start_dollar_quote,
};

use crate::error::SqlUnitworkError;
use crate::types::{DatabaseType, DbValue};

/// Positional placeholder style produced by binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// PostgreSQL-style placeholders like `$1`.
    Postgres,
    /// `SQLite`-style placeholders like `?1`.
    Sqlite,
}

impl PlaceholderStyle {
    /// The placeholder style a backend expects.
    #[must_use]
    pub fn for_database(db: DatabaseType) -> Self {
        match db {
            #[cfg(feature = "postgres")]
            DatabaseType::Postgres => PlaceholderStyle::Postgres,
            #[cfg(feature = "sqlite")]
            DatabaseType::Sqlite => PlaceholderStyle::Sqlite,
        }
    }
}

/// SQL text rewritten to positional placeholders plus the values to bind,
/// in placeholder order.
#[derive(Debug, Clone)]
pub struct BoundSql {
    pub sql: String,
    pub values: Vec<DbValue>,
}

/// Resolve `:name` placeholders against a named parameter bag.
///
/// Every `:name` outside single/double-quoted strings, line comments,
/// (nested) block comments, and dollar-quoted blocks is rewritten to `?N` or
/// `$N`. Distinct names are numbered in first-appearance order; repeated
/// references reuse their number, so the value is bound once. `::` is left
/// alone (Postgres casts). Bag entries never referenced by the text are
/// ignored.
///
/// # Errors
/// Returns `SqlUnitworkError::BindError` if the text references a name the
/// bag does not contain.
pub fn bind_named(
    sql: &str,
    params: &[(String, DbValue)],
    style: PlaceholderStyle,
) -> Result<BoundSql, SqlUnitworkError> {
    let bytes = sql.as_bytes();
    let mut out = String::with_capacity(sql.len() + 8);
    let mut names: Vec<&str> = Vec::new();
    let mut copied = 0usize;
    let mut state = State::Normal;
    let mut idx = 0usize;

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => {
                if b == b'\'' {
                    state = State::SingleQuoted;
                } else if b == b'"' {
                    state = State::DoubleQuoted;
                } else if is_line_comment_start(bytes, idx) {
                    state = State::LineComment;
                    idx += 1;
                } else if is_block_comment_start(bytes, idx) {
                    state = State::BlockComment(1);
                    idx += 1;
                } else if b == b'$' {
                    if let Some((tag, advance)) = try_start_dollar_quote(bytes, idx) {
                        state = State::DollarQuoted(tag);
                        idx = advance;
                    }
                } else if b == b':' {
                    if bytes.get(idx + 1) == Some(&b':') {
                        // cast syntax, not a placeholder
                        idx += 1;
                    } else if let Some((end, name)) = scan_ident(bytes, idx + 1) {
                        out.push_str(&sql[copied..idx]);
                        let ordinal = match names.iter().position(|n| *n == name) {
                            Some(pos) => pos + 1,
                            None => {
                                if !params.iter().any(|(key, _)| key == name) {
                                    return Err(SqlUnitworkError::BindError(format!(
                                        "no parameter supplied for placeholder :{name}"
                                    )));
                                }
                                names.push(name);
                                names.len()
                            }
                        };
                        match style {
                            PlaceholderStyle::Sqlite => out.push('?'),
                            PlaceholderStyle::Postgres => out.push('$'),
                        }
                        out.push_str(&ordinal.to_string());
                        copied = end;
                        idx = end;
                        continue;
                    }
                }
            }
            State::SingleQuoted => {
                if b == b'\'' {
                    if bytes.get(idx + 1) == Some(&b'\'') {
                        idx += 1; // skip escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::DoubleQuoted => {
                if b == b'"' {
                    if bytes.get(idx + 1) == Some(&b'"') {
                        idx += 1; // skip escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment(depth) => {
                if is_block_comment_start(bytes, idx) {
                    state = State::BlockComment(depth + 1);
                    idx += 1;
                } else if is_block_comment_end(bytes, idx) {
                    state = if depth == 1 {
                        State::Normal
                    } else {
                        State::BlockComment(depth - 1)
                    };
                    idx += 1;
                }
            }
            State::DollarQuoted(ref tag) => {
                if b == b'$' && matches_tag(bytes, idx, tag) {
                    let tag_len = tag.len();
                    state = State::Normal;
                    idx += tag_len + 1;
                }
            }
        }
        idx += 1;
    }
    out.push_str(&sql[copied..]);

    let mut values = Vec::with_capacity(names.len());
    for name in &names {
        let value = params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
            .ok_or_else(|| {
                SqlUnitworkError::BindError(format!("no parameter supplied for placeholder :{name}"))
            })?;
        values.push(value);
    }

    Ok(BoundSql { sql: out, values })
}
