//! Mock resource provider for tests and offline runs.
//!
//! Synthesizes deterministic attributes per resource type instead of calling
//! a cloud API, captures every create call for verification, and can be
//! scripted to fail on a named resource.

use std::collections::HashMap;

use async_trait::async_trait;
use nimbus_core::{ResourceAttrs, ResourceNode};
use parking_lot::RwLock;
use serde_json::json;

use crate::error::{EngineError, EngineResult};
use crate::provider::{ResolvedArgs, ResourceProvider};

/// Attribute synthesis rule for one resource type.
pub type AttrRule = Box<dyn Fn(&ResolvedArgs) -> ResourceAttrs + Send + Sync>;

/// Captured create call, for test verification.
#[derive(Debug, Clone)]
pub struct CapturedCreate {
    pub type_token: String,
    pub logical_name: String,
    pub args: ResolvedArgs,
}

/// Mock provider with per-type attribute rules.
pub struct MockProvider {
    rules: HashMap<&'static str, AttrRule>,
    fail_on: RwLock<Option<String>>,
    captured: RwLock<Vec<CapturedCreate>>,
}

fn attrs(entries: Vec<(&str, String)>) -> ResourceAttrs {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), json!(v)))
        .collect()
}

fn arg(args: &ResolvedArgs, key: &str) -> String {
    args.get(key).cloned().unwrap_or_default()
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
            fail_on: RwLock::new(None),
            captured: RwLock::new(Vec::new()),
        }
    }

    /// Register an attribute rule for a resource type.
    pub fn with_rule(mut self, type_token: &'static str, rule: AttrRule) -> Self {
        self.rules.insert(type_token, rule);
        self
    }

    /// A provider that understands every built-in Azure resource type.
    pub fn with_azure_defaults() -> Self {
        Self::new()
            .with_rule(
                "azure:core/resourceGroup:ResourceGroup",
                Box::new(|args| attrs(vec![("name", arg(args, "name"))])),
            )
            .with_rule(
                "azure:storage/account:Account",
                Box::new(|args| {
                    let name = arg(args, "name");
                    let key = format!("{name}mockkey000");
                    let conn = format!(
                        "DefaultEndpointsProtocol=https;AccountName={name};AccountKey={key};EndpointSuffix=core.windows.net"
                    );
                    attrs(vec![
                        ("name", name),
                        ("primary_access_key", key),
                        ("primary_connection_string", conn),
                    ])
                }),
            )
            .with_rule(
                "azure:storage/container:Container",
                Box::new(|args| attrs(vec![("name", arg(args, "name"))])),
            )
            .with_rule(
                "azure:storage/blob:Blob",
                Box::new(|args| {
                    let name = arg(args, "name");
                    let url = format!(
                        "https://{}.blob.core.windows.net/{}/{name}",
                        arg(args, "storage_account_name"),
                        arg(args, "storage_container_name"),
                    );
                    attrs(vec![("name", name), ("url", url)])
                }),
            )
            .with_rule(
                "azure:appservice/plan:Plan",
                Box::new(|args| {
                    let name = arg(args, "name");
                    let id = format!(
                        "/subscriptions/00000000-0000-0000-0000-000000000000/resourceGroups/{}/providers/Microsoft.Web/serverFarms/{name}",
                        arg(args, "resource_group_name"),
                    );
                    attrs(vec![("name", name), ("id", id)])
                }),
            )
            // The admin password arrives in the args and is deliberately
            // never echoed back as an attribute.
            .with_rule(
                "azure:sql/sqlServer:SqlServer",
                Box::new(|args| attrs(vec![("name", arg(args, "name"))])),
            )
            .with_rule(
                "azure:sql/database:Database",
                Box::new(|args| attrs(vec![("name", arg(args, "name"))])),
            )
            .with_rule(
                "azure:appservice/appService:AppService",
                Box::new(|args| {
                    let name = arg(args, "name");
                    let hostname = format!("{name}.azurewebsites.net");
                    attrs(vec![("name", name), ("default_site_hostname", hostname)])
                }),
            )
    }

    /// Script a failure when creating the named resource.
    pub fn fail_on(self, logical_name: impl Into<String>) -> Self {
        *self.fail_on.write() = Some(logical_name.into());
        self
    }

    /// All captured create calls, in order.
    pub fn captured_calls(&self) -> Vec<CapturedCreate> {
        self.captured.read().clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResourceProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn create(&self, node: &ResourceNode, args: &ResolvedArgs) -> EngineResult<ResourceAttrs> {
        self.captured.write().push(CapturedCreate {
            type_token: node.type_token.as_str().to_string(),
            logical_name: node.logical_name.clone(),
            args: args.clone(),
        });

        if self.fail_on.read().as_deref() == Some(node.logical_name.as_str()) {
            return Err(EngineError::Create {
                name: node.logical_name.clone(),
                reason: "scripted failure".to_string(),
            });
        }

        let rule = self
            .rules
            .get(node.type_token.as_str())
            .ok_or_else(|| EngineError::UnknownResourceType(node.type_token.to_string()))?;
        Ok(rule(args))
    }
}
