//! CLI command definitions.

pub mod preview;
pub mod up;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use nimbus_azure::webstack::{declare_web_stack, StackOutputs, WebStackOptions};
use nimbus_core::{Stack, StackConfig};

/// Declarative Azure web stacks.
#[derive(Parser)]
#[command(name = "nimbus", version, about = "Declare and deploy the Nimbus web stack")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the deployment plan without creating anything
    Preview(StackArgs),
    /// Realize the stack against the built-in simulated provider
    Up(UpArgs),
}

#[derive(Args)]
pub struct StackArgs {
    /// Stack name
    #[arg(long, default_value = "dev")]
    pub stack: String,

    /// Stack configuration file
    #[arg(long, default_value = "Nimbus.yaml")]
    pub config: PathBuf,

    /// Application directory packaged as the deployment blob
    #[arg(long, default_value = "wwwroot")]
    pub app_path: PathBuf,
}

#[derive(Args)]
pub struct UpArgs {
    #[command(flatten)]
    pub stack: StackArgs,

    /// Print secret output values in plaintext
    #[arg(long)]
    pub show_secrets: bool,
}

/// Load config and declare the web stack for a command invocation.
pub(crate) fn declare(args: &StackArgs) -> anyhow::Result<(Stack, StackOutputs)> {
    let config = if args.config.exists() {
        StackConfig::from_file(&args.config)?
    } else {
        StackConfig::new()
    };

    let stack = Stack::new(&args.stack);
    let options = WebStackOptions {
        app_path: args.app_path.clone(),
    };
    let outputs = declare_web_stack(&stack, &config, &options)?;
    Ok((stack, outputs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_parses_with_defaults() {
        let cli = Cli::try_parse_from(["nimbus", "preview"]).unwrap();
        match cli.command {
            Commands::Preview(args) => {
                assert_eq!(args.stack, "dev");
                assert_eq!(args.config, PathBuf::from("Nimbus.yaml"));
                assert_eq!(args.app_path, PathBuf::from("wwwroot"));
            }
            _ => panic!("expected preview"),
        }
    }

    #[test]
    fn up_accepts_show_secrets() {
        let cli = Cli::try_parse_from(["nimbus", "up", "--show-secrets", "--stack", "prod"])
            .unwrap();
        match cli.command {
            Commands::Up(args) => {
                assert!(args.show_secrets);
                assert_eq!(args.stack.stack, "prod");
            }
            _ => panic!("expected up"),
        }
    }

    #[test]
    fn declare_fails_cleanly_without_a_password() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "x").unwrap();

        let args = StackArgs {
            stack: "dev".to_string(),
            config: dir.path().join("missing.yaml"),
            app_path: dir.path().to_path_buf(),
        };
        let err = declare(&args).unwrap_err();
        assert!(err.to_string().contains("sqlPassword"));
    }
}
