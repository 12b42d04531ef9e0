//! # nimbus_azure
//!
//! Typed Azure resource declarations for Nimbus stacks.
//!
//! Each resource type pairs an argument record with a handle exposing the
//! resource's deferred outputs. Declaring a resource registers a node in the
//! [`Stack`](nimbus_core::Stack) graph; realization is the engine's job.
//!
//! The [`webstack`] module is the topology declarator: the full web
//! application stack (storage, app service, SQL) wired together through
//! deferred references.
//!
//! ## Example
//!
//! ```rust,no_run
//! use nimbus_core::{Stack, StackConfig};
//! use nimbus_azure::webstack::{declare_web_stack, WebStackOptions};
//!
//! let stack = Stack::new("dev");
//! let mut config = StackConfig::new();
//! config.set_secret("sqlPassword", "correct-horse");
//!
//! let outputs = declare_web_stack(&stack, &config, &WebStackOptions::default()).unwrap();
//! assert!(outputs.contains_key("endpoint"));
//! ```

mod bind;

pub mod appservice;
pub mod archive;
pub mod error;
pub mod group;
pub mod naming;
pub mod signing;
pub mod sql;
pub mod storage;
pub mod webstack;

pub use appservice::{AppServicePlan, AppServicePlanArgs, PlanSku, WebApp, WebAppArgs};
pub use archive::FileArchive;
pub use error::{AzureError, AzureResult};
pub use group::{ResourceGroup, ResourceGroupArgs};
pub use signing::signed_blob_read_url;
pub use sql::{SqlDatabase, SqlDatabaseArgs, SqlServer, SqlServerArgs};
pub use storage::{
    ArchiveBlob, ArchiveBlobArgs, StorageAccount, StorageAccountArgs, StorageContainer,
    StorageContainerArgs,
};
pub use webstack::{declare_web_stack, StackOutputs, WebStackOptions};
