//! Resource groups.

use std::collections::BTreeMap;

use nimbus_core::{Input, NodeId, Output, Stack, TypeToken};
use tracing::debug;

use crate::bind::bind_attr;
use crate::error::AzureResult;
use crate::naming;

pub const RESOURCE_GROUP: TypeToken = TypeToken("azure:core/resourceGroup:ResourceGroup");

/// Arguments for a resource group declaration.
#[derive(Debug, Clone)]
pub struct ResourceGroupArgs {
    pub name: String,
}

impl ResourceGroupArgs {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A declared resource group.
pub struct ResourceGroup {
    pub id: NodeId,
    /// The group name, resolved once the group exists.
    pub name: Output<String>,
}

impl ResourceGroup {
    pub fn declare(stack: &Stack, logical_name: &str, args: ResourceGroupArgs) -> AzureResult<Self> {
        naming::validate_resource_group_name(&args.name)?;

        let mut node_args = BTreeMap::new();
        node_args.insert("name".to_string(), Input::from(args.name));
        let id = stack.register(RESOURCE_GROUP, logical_name, node_args);
        debug!("Declared resource group '{logical_name}'");

        let name = Output::pending(vec![id]);
        bind_attr(stack, id, "name", &name);
        Ok(Self { id, name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declare_registers_a_single_node() {
        let stack = Stack::new("test");
        let group =
            ResourceGroup::declare(&stack, "resourceGroup", ResourceGroupArgs::new("pulumi"))
                .unwrap();

        assert_eq!(stack.len(), 1);
        let node = stack.node(group.id).unwrap();
        assert_eq!(node.type_token, RESOURCE_GROUP);
        assert_eq!(node.args["name"].resolved().as_deref(), Some("pulumi"));
    }

    #[test]
    fn invalid_name_is_rejected_before_registration() {
        let stack = Stack::new("test");
        let result = ResourceGroup::declare(&stack, "rg", ResourceGroupArgs::new(""));
        assert!(result.is_err());
        assert!(stack.is_empty());
    }
}
