//! `nimbus preview` — print the deployment plan.

use std::sync::Arc;

use nimbus_engine::{LocalEngine, MockProvider};
use tracing::info;

use super::{declare, StackArgs};

pub async fn execute(args: StackArgs) -> anyhow::Result<()> {
    let (stack, outputs) = declare(&args)?;
    info!("Previewing stack '{}'", stack.name());

    let engine = LocalEngine::new(Arc::new(MockProvider::with_azure_defaults()));
    let plan = engine.preview(&stack, &outputs)?;

    // Secrets are already redacted in the plan's fingerprints.
    println!("{}", serde_yaml::to_string(&plan)?);
    Ok(())
}
