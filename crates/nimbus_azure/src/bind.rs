//! Binding of realized attributes onto declaration output cells.

use nimbus_core::{NodeId, Output, Stack};
use tracing::warn;

/// Resolve `out` from the string attribute `key` once the node is realized.
pub(crate) fn bind_attr(stack: &Stack, id: NodeId, key: &'static str, out: &Output<String>) {
    let cell = out.clone();
    stack.on_realized(
        id,
        Box::new(move |attrs| match attrs.get(key).and_then(|v| v.as_str()) {
            Some(value) => {
                if let Err(e) = cell.resolve(value.to_string()) {
                    warn!("Attribute '{key}' resolved more than once: {e}");
                }
            }
            None => warn!("Provider reported no '{key}' attribute for node {id}"),
        }),
    );
}
