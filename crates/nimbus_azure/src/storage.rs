//! Storage accounts, containers and archive blobs.

use std::collections::BTreeMap;

use nimbus_core::{Input, NodeId, Output, Stack, TypeToken};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::archive::FileArchive;
use crate::bind::bind_attr;
use crate::error::AzureResult;
use crate::naming;

pub const STORAGE_ACCOUNT: TypeToken = TypeToken("azure:storage/account:Account");
pub const STORAGE_CONTAINER: TypeToken = TypeToken("azure:storage/container:Container");
pub const ARCHIVE_BLOB: TypeToken = TypeToken("azure:storage/blob:Blob");

/// Storage replication type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplicationType {
    Lrs,
    Grs,
    Zrs,
    Ragrs,
}

impl ReplicationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplicationType::Lrs => "LRS",
            ReplicationType::Grs => "GRS",
            ReplicationType::Zrs => "ZRS",
            ReplicationType::Ragrs => "RAGRS",
        }
    }
}

/// Storage account performance tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountTier {
    Standard,
    Premium,
}

impl AccountTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountTier::Standard => "Standard",
            AccountTier::Premium => "Premium",
        }
    }
}

/// Container access level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerAccessType {
    Private,
    Blob,
    Container,
}

impl ContainerAccessType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerAccessType::Private => "private",
            ContainerAccessType::Blob => "blob",
            ContainerAccessType::Container => "container",
        }
    }
}

/// Arguments for a storage account declaration.
#[derive(Debug, Clone)]
pub struct StorageAccountArgs {
    pub name: String,
    pub resource_group_name: Input,
    pub account_replication_type: ReplicationType,
    pub account_tier: AccountTier,
}

/// A declared storage account.
pub struct StorageAccount {
    pub id: NodeId,
    pub name: Output<String>,
    /// Primary connection string, available once the account exists.
    pub primary_connection_string: Output<String>,
    /// Primary access key, used to derive signed URLs.
    pub primary_access_key: Output<String>,
}

impl StorageAccount {
    pub fn declare(stack: &Stack, logical_name: &str, args: StorageAccountArgs) -> AzureResult<Self> {
        naming::validate_storage_account_name(&args.name)?;

        let mut node_args = BTreeMap::new();
        node_args.insert("name".to_string(), Input::from(args.name));
        node_args.insert("resource_group_name".to_string(), args.resource_group_name);
        node_args.insert(
            "account_replication_type".to_string(),
            Input::from(args.account_replication_type.as_str()),
        );
        node_args.insert(
            "account_tier".to_string(),
            Input::from(args.account_tier.as_str()),
        );
        let id = stack.register(STORAGE_ACCOUNT, logical_name, node_args);
        debug!("Declared storage account '{logical_name}'");

        let name = Output::pending(vec![id]);
        let primary_connection_string = Output::pending(vec![id]);
        let primary_access_key = Output::pending(vec![id]);
        bind_attr(stack, id, "name", &name);
        bind_attr(stack, id, "primary_connection_string", &primary_connection_string);
        bind_attr(stack, id, "primary_access_key", &primary_access_key);
        Ok(Self {
            id,
            name,
            primary_connection_string,
            primary_access_key,
        })
    }
}

/// Arguments for a blob container declaration.
#[derive(Debug, Clone)]
pub struct StorageContainerArgs {
    pub storage_account_name: Input,
    pub container_access_type: ContainerAccessType,
}

/// A declared blob container.
pub struct StorageContainer {
    pub id: NodeId,
    pub name: Output<String>,
}

impl StorageContainer {
    pub fn declare(
        stack: &Stack,
        logical_name: &str,
        args: StorageContainerArgs,
    ) -> AzureResult<Self> {
        let mut node_args = BTreeMap::new();
        node_args.insert("name".to_string(), Input::from(logical_name));
        node_args.insert("storage_account_name".to_string(), args.storage_account_name);
        node_args.insert(
            "container_access_type".to_string(),
            Input::from(args.container_access_type.as_str()),
        );
        let id = stack.register(STORAGE_CONTAINER, logical_name, node_args);
        debug!("Declared storage container '{logical_name}'");

        let name = Output::pending(vec![id]);
        bind_attr(stack, id, "name", &name);
        Ok(Self { id, name })
    }
}

/// Arguments for an archive blob declaration.
#[derive(Debug, Clone)]
pub struct ArchiveBlobArgs {
    pub storage_account_name: Input,
    pub storage_container_name: Input,
    pub content: FileArchive,
}

/// A declared block blob backed by a file archive.
pub struct ArchiveBlob {
    pub id: NodeId,
    pub name: Output<String>,
    /// The blob's unauthenticated URL.
    pub url: Output<String>,
}

impl ArchiveBlob {
    pub fn declare(stack: &Stack, logical_name: &str, args: ArchiveBlobArgs) -> AzureResult<Self> {
        // Only the content hash enters the graph; the engine uploads the files.
        let content_hash = args.content.content_hash()?;

        let mut node_args = BTreeMap::new();
        node_args.insert("name".to_string(), Input::from(logical_name));
        node_args.insert("storage_account_name".to_string(), args.storage_account_name);
        node_args.insert(
            "storage_container_name".to_string(),
            args.storage_container_name,
        );
        node_args.insert("type".to_string(), Input::from("block"));
        node_args.insert(
            "source".to_string(),
            Input::from(args.content.path().to_string_lossy().to_string()),
        );
        node_args.insert("content_hash".to_string(), Input::from(content_hash));
        let id = stack.register(ARCHIVE_BLOB, logical_name, node_args);
        debug!("Declared archive blob '{logical_name}'");

        let name = Output::pending(vec![id]);
        let url = Output::pending(vec![id]);
        bind_attr(stack, id, "name", &name);
        bind_attr(stack, id, "url", &url);
        Ok(Self { id, name, url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::{ResourceGroup, ResourceGroupArgs};

    #[test]
    fn account_depends_on_its_resource_group() {
        let stack = Stack::new("test");
        let group =
            ResourceGroup::declare(&stack, "resourceGroup", ResourceGroupArgs::new("pulumi"))
                .unwrap();
        let account = StorageAccount::declare(
            &stack,
            "storage",
            StorageAccountArgs {
                name: "wwwcontainer".to_string(),
                resource_group_name: Input::from(&group.name),
                account_replication_type: ReplicationType::Lrs,
                account_tier: AccountTier::Standard,
            },
        )
        .unwrap();

        let node = stack.node(account.id).unwrap();
        assert_eq!(node.deps, vec![group.id]);
        assert_eq!(
            node.args["account_replication_type"].resolved().as_deref(),
            Some("LRS")
        );
    }

    #[test]
    fn blob_declaration_requires_the_archive_directory() {
        let stack = Stack::new("test");
        let result = ArchiveBlob::declare(
            &stack,
            "zip",
            ArchiveBlobArgs {
                storage_account_name: Input::from("wwwcontainer"),
                storage_container_name: Input::from("zips"),
                content: FileArchive::new("missing-dir"),
            },
        );
        assert!(result.is_err());
        assert!(stack.is_empty());
    }
}
