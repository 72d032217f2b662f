//! Placeholder splicing.
//!
//! Templates mark positional parameters with `?`. Every function here splits
//! the original template exactly once; rendered parameter text is never
//! scanned for markers, so a `?` inside a quoted value stays data.

use crate::error::{Result, SqlRsError};
use crate::types::SqlValue;

const MARKER: char = '?';

/// Counts the `?` markers in a template.
pub fn count_markers(template: &str) -> usize {
    template.matches(MARKER).count()
}

pub(crate) fn check_count(template: &str, params: usize) -> Result<()> {
    let markers = count_markers(template);
    if markers != params {
        return Err(SqlRsError::ParameterCountMismatch { markers, params });
    }
    Ok(())
}

/// Merges already-rendered parameters into a template, left to right.
pub fn splice<S: AsRef<str>>(template: &str, rendered: &[S]) -> Result<String> {
    check_count(template, rendered.len())?;

    let extra: usize = rendered.iter().map(|r| r.as_ref().len()).sum();
    let mut sql = String::with_capacity(template.len() + extra);
    let mut fragments = template.split(MARKER);
    if let Some(first) = fragments.next() {
        sql.push_str(first);
    }
    for (param, fragment) in rendered.iter().zip(fragments) {
        sql.push_str(param.as_ref());
        sql.push_str(fragment);
    }
    Ok(sql)
}

/// Renders every parameter as a SQL literal.
pub fn render_params(params: &[SqlValue]) -> Vec<String> {
    params.iter().map(SqlValue::to_sql_literal).collect()
}

/// Renders `params` and splices them into `template`.
///
/// The marker count is checked before any value is rendered.
pub fn format_to_sql(template: &str, params: &[SqlValue]) -> Result<String> {
    check_count(template, params.len())?;
    splice(template, &render_params(params))
}

/// Rewrites each `?` in the original template to `$1`, `$2`, ... for drivers
/// that bind parameters natively.
pub fn numbered_placeholders(template: &str, params: usize) -> Result<String> {
    check_count(template, params)?;

    let mut sql = String::with_capacity(template.len() + params * 2);
    for (i, fragment) in template.split(MARKER).enumerate() {
        if i > 0 {
            sql.push('$');
            sql.push_str(&i.to_string());
        }
        sql.push_str(fragment);
    }
    Ok(sql)
}
