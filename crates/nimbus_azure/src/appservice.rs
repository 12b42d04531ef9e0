//! App service plans and web apps.

use std::collections::BTreeMap;

use nimbus_core::{Input, NodeId, Output, Stack, TypeToken};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bind::bind_attr;
use crate::error::AzureResult;
use crate::naming;

pub const APP_SERVICE_PLAN: TypeToken = TypeToken("azure:appservice/plan:Plan");
pub const APP_SERVICE: TypeToken = TypeToken("azure:appservice/appService:AppService");

/// Plan SKU.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSku {
    pub tier: String,
    pub size: String,
}

impl PlanSku {
    pub fn basic_b1() -> Self {
        Self {
            tier: "Basic".to_string(),
            size: "B1".to_string(),
        }
    }
}

/// Arguments for an app service plan declaration.
#[derive(Debug, Clone)]
pub struct AppServicePlanArgs {
    pub name: String,
    pub resource_group_name: Input,
    pub kind: String,
    pub sku: PlanSku,
}

/// A declared app service plan.
pub struct AppServicePlan {
    pub id: NodeId,
    pub name: Output<String>,
    /// The plan's provider-assigned resource id.
    pub plan_id: Output<String>,
}

impl AppServicePlan {
    pub fn declare(stack: &Stack, logical_name: &str, args: AppServicePlanArgs) -> AzureResult<Self> {
        naming::validate_dns_name(&args.name)?;

        let mut node_args = BTreeMap::new();
        node_args.insert("name".to_string(), Input::from(args.name));
        node_args.insert("resource_group_name".to_string(), args.resource_group_name);
        node_args.insert("kind".to_string(), Input::from(args.kind));
        node_args.insert("sku_tier".to_string(), Input::from(args.sku.tier));
        node_args.insert("sku_size".to_string(), Input::from(args.sku.size));
        let id = stack.register(APP_SERVICE_PLAN, logical_name, node_args);
        debug!("Declared app service plan '{logical_name}'");

        let name = Output::pending(vec![id]);
        let plan_id = Output::pending(vec![id]);
        bind_attr(stack, id, "name", &name);
        bind_attr(stack, id, "id", &plan_id);
        Ok(Self { id, name, plan_id })
    }
}

/// Connection string type exposed to the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionStringType {
    SqlAzure,
    SqlServer,
    Custom,
}

impl ConnectionStringType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStringType::SqlAzure => "SQLAzure",
            ConnectionStringType::SqlServer => "SQLServer",
            ConnectionStringType::Custom => "Custom",
        }
    }
}

/// A named connection string entry on a web app.
#[derive(Debug, Clone)]
pub struct ConnectionStringEntry {
    pub name: String,
    pub kind: ConnectionStringType,
    pub value: Input,
}

/// Arguments for a web app declaration.
#[derive(Debug, Clone, Default)]
pub struct WebAppArgs {
    pub name: String,
    pub resource_group_name: Option<Input>,
    pub app_service_plan_id: Option<Input>,
    pub app_settings: BTreeMap<String, Input>,
    pub connection_strings: Vec<ConnectionStringEntry>,
}

impl WebAppArgs {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn resource_group_name(mut self, input: impl Into<Input>) -> Self {
        self.resource_group_name = Some(input.into());
        self
    }

    pub fn app_service_plan_id(mut self, input: impl Into<Input>) -> Self {
        self.app_service_plan_id = Some(input.into());
        self
    }

    pub fn app_setting(mut self, key: impl Into<String>, value: impl Into<Input>) -> Self {
        self.app_settings.insert(key.into(), value.into());
        self
    }

    pub fn connection_string(
        mut self,
        name: impl Into<String>,
        kind: ConnectionStringType,
        value: impl Into<Input>,
    ) -> Self {
        self.connection_strings.push(ConnectionStringEntry {
            name: name.into(),
            kind,
            value: value.into(),
        });
        self
    }
}

/// A declared web app.
pub struct WebApp {
    pub id: NodeId,
    pub name: Output<String>,
    /// `{name}.azurewebsites.net`, resolved once the app exists.
    pub default_site_hostname: Output<String>,
}

impl WebApp {
    pub fn declare(stack: &Stack, logical_name: &str, args: WebAppArgs) -> AzureResult<Self> {
        naming::validate_dns_name(&args.name)?;

        let mut node_args = BTreeMap::new();
        node_args.insert("name".to_string(), Input::from(args.name));
        if let Some(group) = args.resource_group_name {
            node_args.insert("resource_group_name".to_string(), group);
        }
        if let Some(plan) = args.app_service_plan_id {
            node_args.insert("app_service_plan_id".to_string(), plan);
        }
        for (key, value) in args.app_settings {
            node_args.insert(format!("app_settings.{key}"), value);
        }
        for entry in args.connection_strings {
            node_args.insert(
                format!("connection_strings.{}.type", entry.name),
                Input::from(entry.kind.as_str()),
            );
            node_args.insert(
                format!("connection_strings.{}.value", entry.name),
                entry.value,
            );
        }
        let id = stack.register(APP_SERVICE, logical_name, node_args);
        debug!("Declared web app '{logical_name}'");

        let name = Output::pending(vec![id]);
        let default_site_hostname = Output::pending(vec![id]);
        bind_attr(stack, id, "name", &name);
        bind_attr(stack, id, "default_site_hostname", &default_site_hostname);
        Ok(Self {
            id,
            name,
            default_site_hostname,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_sku_defaults_to_basic_b1() {
        let sku = PlanSku::basic_b1();
        assert_eq!(sku.tier, "Basic");
        assert_eq!(sku.size, "B1");
    }

    #[test]
    fn web_app_flattens_settings_and_connection_strings() {
        let stack = Stack::new("test");
        let secret = Output::secret("conn".to_string());
        let app = WebApp::declare(
            &stack,
            "app",
            WebAppArgs::new("pulumiwebapp")
                .app_setting("WEBSITE_RUN_FROM_PACKAGE", "https://example/pkg.zip")
                .connection_string("db", ConnectionStringType::SqlAzure, &secret),
        )
        .unwrap();

        let node = stack.node(app.id).unwrap();
        assert!(node.args.contains_key("app_settings.WEBSITE_RUN_FROM_PACKAGE"));
        assert_eq!(
            node.args["connection_strings.db.type"].resolved().as_deref(),
            Some("SQLAzure")
        );
        assert!(node.args["connection_strings.db.value"].is_secret());
    }
}
