//! Resource provider seam.

use std::collections::BTreeMap;

use async_trait::async_trait;
use nimbus_core::{ResourceAttrs, ResourceNode};

use crate::error::EngineResult;

/// Argument values of a node after all deferred inputs have resolved.
pub type ResolvedArgs = BTreeMap<String, String>;

/// The provider-plugin seam: given a declaration and its resolved arguments,
/// create the resource and report its attributes. Real cloud providers live
/// behind this trait; the engine never talks to an API itself.
#[async_trait]
pub trait ResourceProvider: Send + Sync {
    /// Provider identity, for logs.
    fn name(&self) -> &str;

    /// Create the resource and return its realized attributes.
    async fn create(&self, node: &ResourceNode, args: &ResolvedArgs) -> EngineResult<ResourceAttrs>;
}
