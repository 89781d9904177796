//! Path template → endpoint chain, e.g. `/foo/{id}/bar` → `"foo" :: long :: "bar"`.

use tracing::debug;

use crate::error::{Error, Result};
use crate::fragment::{Chain, Expr};
use crate::model::Operation;

fn is_placeholder(segment: &str) -> bool {
    segment.len() >= 2 && segment.starts_with('{') && segment.ends_with('}')
}

/// Splits a template into segments after dropping one leading and one
/// trailing `/`. Empty segments survive (`a//b` has three).
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    let path = path.strip_prefix('/').unwrap_or(path);
    let path = path.strip_suffix('/').unwrap_or(path);
    path.split('/')
}

/// Builds the path chain of `op`. Placeholders are matched to path
/// parameters by position, in declaration order.
pub fn resolve_path(op: &Operation) -> Result<Chain> {
    let path_params: Vec<_> = op.path_params().collect();
    let placeholders = segments(&op.path).filter(|s| is_placeholder(s)).count();
    if placeholders != path_params.len() {
        return Err(Error::PathMismatch {
            path: op.path.clone(),
            placeholders,
            parameters: path_params.len(),
        });
    }

    let mut params = path_params.into_iter();
    let chain: Chain = segments(&op.path)
        .map(|segment| {
            if is_placeholder(segment) {
                // Counts were checked above, so a placeholder always has a param.
                if let Some(p) = params.next() {
                    return Expr::Segment(p.data_type.to_string().to_lowercase());
                }
            }
            Expr::Literal(segment.to_owned())
        })
        .collect();

    debug!(operation = %op.operation_id, path = %chain, "resolved path");
    Ok(chain)
}
