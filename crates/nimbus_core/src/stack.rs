//! Stack context: the declarative resource graph under construction.
//!
//! Declarations register themselves here in program order. Because an
//! argument can only reference the output of an already-declared resource,
//! registration order is itself a valid dependency order; [`Stack::dependency_order`]
//! still runs a Kahn pass so a malformed graph is reported instead of
//! silently realized.

use std::collections::{BTreeMap, HashMap, VecDeque};

use parking_lot::RwLock;
use serde::Serialize;
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::resource::{Input, NodeFingerprint, NodeId, ResourceNode, TypeToken};

/// Attributes of a realized resource, as reported by the provider.
pub type ResourceAttrs = serde_json::Map<String, serde_json::Value>;

/// Closure mapping realized attributes onto a declaration's output cells.
pub type OutputSetter = Box<dyn Fn(&ResourceAttrs) + Send + Sync>;

/// The declarative graph handed to the realization engine.
pub struct Stack {
    name: String,
    nodes: RwLock<Vec<ResourceNode>>,
    setters: RwLock<HashMap<NodeId, Vec<OutputSetter>>>,
}

impl std::fmt::Debug for Stack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stack")
            .field("name", &self.name)
            .field("nodes", &*self.nodes.read())
            .finish_non_exhaustive()
    }
}

impl Stack {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: RwLock::new(Vec::new()),
            setters: RwLock::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a declaration. Dependency edges are derived from the
    /// arguments; the returned id is sequential.
    pub fn register(
        &self,
        type_token: TypeToken,
        logical_name: impl Into<String>,
        args: BTreeMap<String, Input>,
    ) -> NodeId {
        let logical_name = logical_name.into();
        let mut deps: Vec<NodeId> = args.values().flat_map(Input::deps).collect();
        deps.sort_unstable();
        deps.dedup();

        let mut nodes = self.nodes.write();
        let id = NodeId(nodes.len() as u32);
        debug!("Registering resource {type_token} '{logical_name}' as node {id}");
        nodes.push(ResourceNode {
            id,
            type_token,
            logical_name,
            args,
            deps,
        });
        id
    }

    /// Attach a setter invoked when the node is realized.
    pub fn on_realized(&self, id: NodeId, setter: OutputSetter) {
        self.setters.write().entry(id).or_default().push(setter);
    }

    /// Run the node's setters against realized attributes.
    pub fn realize(&self, id: NodeId, attrs: &ResourceAttrs) -> CoreResult<()> {
        if self.node(id).is_none() {
            return Err(CoreError::UnknownNode(id));
        }
        if let Some(setters) = self.setters.read().get(&id) {
            for setter in setters {
                setter(attrs);
            }
        }
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> Option<ResourceNode> {
        self.nodes.read().get(id.0 as usize).cloned()
    }

    pub fn nodes(&self) -> Vec<ResourceNode> {
        self.nodes.read().clone()
    }

    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.read().is_empty()
    }

    /// Node ids in an order where every dependency precedes its dependents.
    pub fn dependency_order(&self) -> CoreResult<Vec<NodeId>> {
        let nodes = self.nodes.read();
        let mut indegree: HashMap<NodeId, usize> = HashMap::new();
        let mut dependents: HashMap<NodeId, Vec<NodeId>> = HashMap::new();

        for node in nodes.iter() {
            indegree.entry(node.id).or_insert(0);
            for dep in &node.deps {
                if dep.0 as usize >= nodes.len() {
                    return Err(CoreError::UnknownNode(*dep));
                }
                *indegree.entry(node.id).or_insert(0) += 1;
                dependents.entry(*dep).or_default().push(node.id);
            }
        }

        let mut ready: VecDeque<NodeId> = nodes
            .iter()
            .filter(|n| indegree[&n.id] == 0)
            .map(|n| n.id)
            .collect();
        let mut order = Vec::with_capacity(nodes.len());

        while let Some(id) = ready.pop_front() {
            order.push(id);
            if let Some(children) = dependents.get(&id) {
                for child in children {
                    let entry = indegree.get_mut(child).ok_or(CoreError::UnknownNode(*child))?;
                    *entry -= 1;
                    if *entry == 0 {
                        ready.push_back(*child);
                    }
                }
            }
        }

        if order.len() != nodes.len() {
            let stuck = nodes
                .iter()
                .map(|n| n.id)
                .find(|id| !order.contains(id))
                .unwrap_or(NodeId(0));
            return Err(CoreError::DependencyCycle(stuck));
        }
        Ok(order)
    }

    /// Structural identity of the whole graph. Equal inputs must yield equal
    /// fingerprints across declarator runs.
    pub fn fingerprint(&self) -> StackFingerprint {
        StackFingerprint {
            nodes: self.nodes.read().iter().map(ResourceNode::fingerprint).collect(),
        }
    }
}

/// Ordered structural identity of a declared stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackFingerprint {
    pub nodes: Vec<NodeFingerprint>,
}
