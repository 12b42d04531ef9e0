//! # nimbus_engine
//!
//! The realization-engine seam for Nimbus stacks.
//!
//! Real diffing, state persistence and provider plugins belong to an
//! external engine; this crate carries the boundary the declarator hands its
//! graph to: the [`ResourceProvider`] trait, a [`LocalEngine`] that drives a
//! graph in dependency order, and a [`MockProvider`] for tests and offline
//! runs.

pub mod engine;
pub mod error;
pub mod mock;
pub mod provider;

pub use engine::{DeploymentResult, LocalEngine, Plan, ResourceState};
pub use error::{EngineError, EngineResult};
pub use mock::{CapturedCreate, MockProvider};
pub use provider::{ResolvedArgs, ResourceProvider};
