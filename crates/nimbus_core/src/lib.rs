//! # nimbus_core
//!
//! Core declarative model for Nimbus stacks.
//!
//! A stack program declares resources into a [`Stack`], referencing other
//! declarations through deferred [`Output`] values. References form the
//! dependency edges of a DAG; the realization engine walks that graph,
//! creates resources, and resolves the outputs. Nothing in this crate talks
//! to a cloud.
//!
//! ## Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use nimbus_core::{Input, Output, Stack, TypeToken};
//!
//! let stack = Stack::new("dev");
//! let group = stack.register(TypeToken("azure:core:ResourceGroup"), "rg", BTreeMap::new());
//!
//! let group_name: Output<String> = Output::pending(vec![group]);
//! let mut args = BTreeMap::new();
//! args.insert("resource_group_name".to_string(), Input::from(&group_name));
//! stack.register(TypeToken("azure:storage:Account"), "storage", args);
//! ```

pub mod config;
pub mod error;
pub mod output;
pub mod resource;
pub mod stack;

pub use config::StackConfig;
pub use error::{CoreError, CoreResult};
pub use output::{tuple3, Output};
pub use resource::{Input, NodeFingerprint, NodeId, ResourceNode, TypeToken};
pub use stack::{OutputSetter, ResourceAttrs, Stack, StackFingerprint};
