//! `nimbus up` — realize the stack against the simulated provider.

use std::sync::Arc;

use nimbus_engine::{LocalEngine, MockProvider};
use tracing::info;

use super::{declare, UpArgs};

pub async fn execute(args: UpArgs) -> anyhow::Result<()> {
    let (stack, outputs) = declare(&args.stack)?;

    let engine = LocalEngine::new(Arc::new(MockProvider::with_azure_defaults()));
    let result = engine.up(&stack, &outputs).await?;

    let duration = result.finished_at - result.started_at;
    info!(
        "Run {} created {} resources in {}ms",
        result.run_id,
        result.resources.len(),
        duration.num_milliseconds()
    );

    println!("Outputs:");
    for (name, output) in &outputs {
        let value = if args.show_secrets {
            output
                .try_get()
                .unwrap_or_else(|| "<unresolved>".to_string())
        } else {
            output.display_value()
        };
        println!("  {name}: {value}");
    }
    Ok(())
}
