//! Aspect CLI Application
//!
//! Compiles Aspects and deploys, binds and unbinds them on chain.

use aspect_tool::aspect::{BindRequest, DeployRequest};
use aspect_tool::cli::{self, CliResult};
use aspect_tool::compiler::DEFAULT_ENTRY_FILE;
use aspect_tool::config::{ConfigResolver, DEFAULT_NETWORK};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "aspect")]
#[command(version)]
#[command(about = "Compile, deploy and bind Aspects", long_about = None)]
struct Cli {
    /// Project configuration file (defaults to ./aspect.config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Network entry to use from the configuration file
    #[arg(long, global = true, default_value = DEFAULT_NETWORK)]
    network: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile an Aspect with the AssemblyScript toolchain
    Compile {
        /// Entry source file
        #[arg(short, long, default_value = DEFAULT_ENTRY_FILE)]
        entry: PathBuf,

        /// Compilation target (debug or release)
        #[arg(short, long, default_value = "debug")]
        target: String,

        /// Output file (derived from the entry file when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Deploy a compiled Aspect
    Deploy {
        /// Compiled Aspect binary
        #[arg(short, long)]
        wasm: PathBuf,

        /// Initial properties as JSON, e.g. '[{"key":"k","value":"v"}]'
        #[arg(short, long)]
        properties: Option<String>,

        /// Join points (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        join_points: Option<Vec<String>>,

        /// Gas limit
        #[arg(short, long)]
        gas: Option<String>,
    },

    /// Bind an Aspect to a contract
    Bind {
        /// Contract address
        #[arg(short, long)]
        contract: String,

        /// Aspect id
        #[arg(short, long)]
        aspect_id: String,

        /// Gas limit
        #[arg(short, long)]
        gas: Option<String>,
    },

    /// Unbind an Aspect from a contract
    Unbind {
        /// Contract address
        #[arg(short, long)]
        contract: String,

        /// Aspect id
        #[arg(short, long)]
        aspect_id: String,

        /// Gas limit
        #[arg(short, long)]
        gas: Option<String>,
    },
}

fn main() {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        let code = cli::exit_code(e.as_ref());
        if code == 0 {
            println!("{}", e);
        } else {
            eprintln!("❌ {}", e);
        }
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let resolver = match cli.config {
        Some(path) => ConfigResolver::from_path(path),
        None => ConfigResolver::from_current_dir()?,
    }
    .with_network(&cli.network);

    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        match cli.command {
            Commands::Compile {
                entry,
                target,
                output,
            } => cli::cmd_compile(&resolver, &entry, &target, output).await,

            Commands::Deploy {
                wasm,
                properties,
                join_points,
                gas,
            } => {
                let request = DeployRequest {
                    properties,
                    join_points,
                    wasm_path: wasm,
                    gas,
                };
                cli::cmd_deploy(&resolver, request).await
            }

            Commands::Bind {
                contract,
                aspect_id,
                gas,
            } => {
                let request = BindRequest {
                    contract,
                    aspect_id,
                    gas,
                };
                cli::cmd_bind(&resolver, request).await
            }

            Commands::Unbind {
                contract,
                aspect_id,
                gas,
            } => {
                let request = BindRequest {
                    contract,
                    aspect_id,
                    gas,
                };
                cli::cmd_unbind(&resolver, request).await
            }
        }
    })
}
