//! Resource declaration records.
//!
//! Each declaration is a [`ResourceNode`]: a type token, a logical name, and
//! a map of argument inputs. Arguments referencing another declaration's
//! deferred output carry that node as a dependency edge, so the node list
//! forms a DAG by construction (references only flow forward).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::output::Output;

/// Identity of a declared resource within a stack, assigned sequentially.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Provider resource type, e.g. `azure:storage/account:Account`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TypeToken(pub &'static str);

impl TypeToken {
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// An argument value for a resource declaration: either a literal known at
/// declaration time or a deferred output of another declaration.
#[derive(Clone)]
pub enum Input {
    Literal(String),
    Deferred(Output<String>),
}

impl Input {
    /// The resolved value, if available now.
    pub fn resolved(&self) -> Option<String> {
        match self {
            Input::Literal(v) => Some(v.clone()),
            Input::Deferred(out) => out.try_get(),
        }
    }

    pub fn is_secret(&self) -> bool {
        match self {
            Input::Literal(_) => false,
            Input::Deferred(out) => out.is_secret(),
        }
    }

    /// Nodes this input waits on.
    pub fn deps(&self) -> Vec<NodeId> {
        match self {
            Input::Literal(_) => Vec::new(),
            Input::Deferred(out) => out.deps().to_vec(),
        }
    }

    /// Structural identity of the input. Literals compare by value, deferred
    /// references by their dependency edges, secrets by a fixed marker so the
    /// value never participates in fingerprints.
    pub fn fingerprint(&self) -> String {
        match self {
            Input::Literal(v) => format!("lit:{v}"),
            Input::Deferred(out) if out.is_secret() => "[secret]".to_string(),
            Input::Deferred(out) => {
                let edges: Vec<String> =
                    out.deps().iter().map(|d| d.to_string()).collect();
                format!("ref:{}", edges.join(","))
            }
        }
    }
}

impl fmt::Debug for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Literal(v) => write!(f, "Literal({v:?})"),
            Input::Deferred(out) if out.is_secret() => f.write_str("Deferred([secret])"),
            Input::Deferred(out) => write!(f, "Deferred(deps={:?})", out.deps()),
        }
    }
}

impl From<&str> for Input {
    fn from(v: &str) -> Self {
        Input::Literal(v.to_string())
    }
}

impl From<String> for Input {
    fn from(v: String) -> Self {
        Input::Literal(v)
    }
}

impl From<Output<String>> for Input {
    fn from(out: Output<String>) -> Self {
        Input::Deferred(out)
    }
}

impl From<&Output<String>> for Input {
    fn from(out: &Output<String>) -> Self {
        Input::Deferred(out.clone())
    }
}

/// A single resource declaration in the stack graph.
#[derive(Debug, Clone)]
pub struct ResourceNode {
    pub id: NodeId,
    pub type_token: TypeToken,
    pub logical_name: String,
    pub args: BTreeMap<String, Input>,
    /// Union of the dependency edges of all arguments.
    pub deps: Vec<NodeId>,
}

impl ResourceNode {
    pub fn fingerprint(&self) -> NodeFingerprint {
        NodeFingerprint {
            type_token: self.type_token.as_str().to_string(),
            logical_name: self.logical_name.clone(),
            args: self
                .args
                .iter()
                .map(|(k, v)| (k.clone(), v.fingerprint()))
                .collect(),
            deps: self.deps.clone(),
        }
    }
}

/// Structural identity of a declaration, safe to serialize and compare.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeFingerprint {
    pub type_token: String,
    pub logical_name: String,
    pub args: BTreeMap<String, String>,
    pub deps: Vec<NodeId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_input_fingerprints_by_value() {
        let input = Input::from("LRS");
        assert_eq!(input.fingerprint(), "lit:LRS");
        assert!(input.deps().is_empty());
    }

    #[test]
    fn secret_input_never_fingerprints_its_value() {
        let input = Input::from(Output::secret("p@ss".to_string()));
        assert_eq!(input.fingerprint(), "[secret]");
        assert!(!format!("{input:?}").contains("p@ss"));
    }

    #[test]
    fn deferred_input_fingerprints_by_edges() {
        let out: Output<String> = Output::pending(vec![NodeId(4)]);
        let input = Input::from(out);
        assert_eq!(input.fingerprint(), "ref:4");
        assert_eq!(input.deps(), vec![NodeId(4)]);
    }
}
