use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use figma_relay::figma::client::{extract_document, DesignApi, FigmaClient};
use figma_relay::models::share_link::Locator;
use figma_relay::rendering::prune::{prune_with, KeySet};

/// Prune Figma node trees down to id, name, type, componentProperties and children
#[derive(Parser, Debug)]
#[command(name = "figma-prune")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Output options shared by every subcommand.
#[derive(Args, Debug)]
struct OutputArgs {
    /// Extra key to keep on every object (repeatable)
    #[arg(short, long = "keep", value_name = "KEY")]
    keep: Vec<String>,

    /// Print compact JSON instead of pretty-printed
    #[arg(short, long)]
    minified: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Prune a JSON node tree read from a file, or stdin when omitted or `-`
    File {
        path: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Resolve a share link, fetch the node from Figma and prune it
    Link {
        /// Figma share link, e.g. https://www.figma.com/file/KEY/Title?node-id=1-2
        link: String,

        /// Figma personal access token
        #[arg(long, env = "FIGMA_TOKEN", hide_env_values = true)]
        token: String,

        /// Base URL of the Figma REST API
        #[arg(long, env = "FIGMA_API_BASE", default_value = "https://api.figma.com")]
        api_base: String,

        /// Request timeout in seconds
        #[arg(long, env = "FIGMA_TIMEOUT_SECS", default_value_t = 30)]
        timeout_secs: u64,

        #[command(flatten)]
        output: OutputArgs,
    },
}

impl Commands {
    fn output(&self) -> &OutputArgs {
        match self {
            Commands::File { output, .. } | Commands::Link { output, .. } => output,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = cli.command.output();
    let keys = KeySet::with_extra(output.keep.iter().cloned());

    let tree = match &cli.command {
        Commands::File { path, .. } => read_tree(path.as_deref())?,
        Commands::Link {
            link,
            token,
            api_base,
            timeout_secs,
            ..
        } => fetch_tree(link, token, api_base, Duration::from_secs(*timeout_secs)).await?,
    };

    println!("{}", render(&prune_with(tree, &keys), output.minified)?);
    Ok(())
}

/// Read a JSON tree from `path`, or stdin for `None` / `-`.
fn read_tree(path: Option<&Path>) -> Result<Value> {
    let raw = match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .with_context(|| format!("Failed to read {}", p.display()))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    serde_json::from_str(&raw).context("Input is not valid JSON")
}

async fn fetch_tree(link: &str, token: &str, api_base: &str, timeout: Duration) -> Result<Value> {
    let locator = Locator::from_share_link(link)?;
    let client = FigmaClient::new(api_base, token.to_string(), timeout)?;

    let body = client.file_nodes(&locator).await?;
    match body.and_then(|b| extract_document(b, &locator.node_id)) {
        Some(document) => Ok(document),
        None => bail!(
            "Node {} not found in file {}",
            locator.node_id,
            locator.document_id
        ),
    }
}

fn render(value: &Value, minified: bool) -> Result<String> {
    let out = if minified {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(out)
}
