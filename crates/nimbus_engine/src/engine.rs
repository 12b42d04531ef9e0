//! Local deployment driver.
//!
//! Walks the declared graph in dependency order, asks the provider to create
//! each resource, and feeds realized attributes back into the graph so
//! deferred outputs resolve. No retries, no rollback: the first failure
//! aborts the run and already-created resources stay as they are.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use nimbus_core::{NodeFingerprint, NodeId, Output, ResourceNode, Stack};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::provider::{ResolvedArgs, ResourceProvider};

/// Preview of a deployment: the graph as the engine would realize it.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub stack: String,
    /// Declarations in realization order, secrets already redacted.
    pub resources: Vec<NodeFingerprint>,
    /// Names of the published outputs.
    pub outputs: Vec<String>,
}

/// One realized resource in a deployment run.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceState {
    pub id: NodeId,
    pub type_token: String,
    pub logical_name: String,
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

/// Outcome of a deployment run. Output values are rendered with secrets
/// redacted; callers holding the output handles can still read raw values.
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentResult {
    pub run_id: Uuid,
    pub stack: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub resources: Vec<ResourceState>,
    pub outputs: BTreeMap<String, String>,
}

/// Drives a stack against a [`ResourceProvider`].
pub struct LocalEngine {
    provider: Arc<dyn ResourceProvider>,
}

impl LocalEngine {
    pub fn new(provider: Arc<dyn ResourceProvider>) -> Self {
        Self { provider }
    }

    /// The plan for a declared stack, without touching the provider.
    pub fn preview(
        &self,
        stack: &Stack,
        outputs: &BTreeMap<String, Output<String>>,
    ) -> EngineResult<Plan> {
        let order = stack.dependency_order()?;
        let mut resources = Vec::with_capacity(order.len());
        for id in order {
            let node = stack
                .node(id)
                .ok_or(nimbus_core::CoreError::UnknownNode(id))?;
            resources.push(node.fingerprint());
        }
        Ok(Plan {
            stack: stack.name().to_string(),
            resources,
            outputs: outputs.keys().cloned().collect(),
        })
    }

    /// Realize the stack: create every resource in dependency order and
    /// resolve the published outputs.
    pub async fn up(
        &self,
        stack: &Stack,
        outputs: &BTreeMap<String, Output<String>>,
    ) -> EngineResult<DeploymentResult> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(
            "Deploying stack '{}' ({} resources) via provider '{}'",
            stack.name(),
            stack.len(),
            self.provider.name()
        );

        let mut resources = Vec::with_capacity(stack.len());
        for id in stack.dependency_order()? {
            let node = stack
                .node(id)
                .ok_or(nimbus_core::CoreError::UnknownNode(id))?;
            let args = resolve_args(&node)?;

            info!("Creating {} '{}'", node.type_token, node.logical_name);
            let attrs = self.provider.create(&node, &args).await?;
            stack.realize(id, &attrs)?;
            debug!("Realized node {id} with {} attributes", attrs.len());

            resources.push(ResourceState {
                id,
                type_token: node.type_token.as_str().to_string(),
                logical_name: node.logical_name.clone(),
                attributes: attrs,
            });
        }

        let mut rendered = BTreeMap::new();
        for (name, output) in outputs {
            if !output.is_resolved() {
                return Err(EngineError::OutputUnresolved(name.clone()));
            }
            rendered.insert(name.clone(), output.display_value());
        }

        Ok(DeploymentResult {
            run_id,
            stack: stack.name().to_string(),
            started_at,
            finished_at: Utc::now(),
            resources,
            outputs: rendered,
        })
    }
}

/// Resolve every argument of a node. Dependency ordering guarantees inputs
/// have resolved; an unresolved one indicates a malformed declaration.
fn resolve_args(node: &ResourceNode) -> EngineResult<ResolvedArgs> {
    let mut args = ResolvedArgs::new();
    for (key, input) in &node.args {
        let value = input
            .resolved()
            .ok_or_else(|| EngineError::UnresolvedInput {
                node: node.id,
                key: key.clone(),
            })?;
        args.insert(key.clone(), value);
    }
    Ok(args)
}
