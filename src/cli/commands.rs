//! CLI commands for the Aspect tool
//!
//! Implements all command handlers for the CLI interface.

use crate::aspect::{bind_aspect, deploy_aspect, unbind_aspect, AspectError, BindRequest, DeployRequest};
use crate::compiler::{CompileError, CompileRequest, Target};
use crate::config::{ConfigError, ConfigResolver, Configuration};
use crate::rpc::TransactionReceipt;
use std::error::Error;
use std::path::{Path, PathBuf};

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Exit status for a failed command.
///
/// Missing configuration and rejected input exit with 0, a failed compiler
/// run passes its own exit code through, everything else exits with 1.
pub fn exit_code(err: &(dyn Error + 'static)) -> i32 {
    if let Some(e) = err.downcast_ref::<ConfigError>() {
        return if e.is_missing() { 0 } else { 1 };
    }
    if let Some(e) = err.downcast_ref::<AspectError>() {
        return if e.is_validation() { 0 } else { 1 };
    }
    if let Some(CompileError::Failed { code }) = err.downcast_ref::<CompileError>() {
        return *code;
    }
    1
}

/// Compile an Aspect
pub async fn cmd_compile(
    resolver: &ConfigResolver,
    entry: &Path,
    target: &str,
    output: Option<PathBuf>,
) -> CliResult<()> {
    let target: Target = target.parse()?;
    let toolchain = resolver.load_project_or_default()?.compiler;
    let request = CompileRequest::new(entry, target, output, &toolchain.extension);
    let work_dir = std::env::current_dir()?;

    println!("🔨 Compiling {} ({})...", entry.display(), target);
    toolchain.compile(&request, &work_dir).await?.into_result()?;

    println!("✅ AssemblyScript compilation completed successfully.");
    println!("   📦 Output: {}", request.output.display());
    Ok(())
}

/// Deploy a compiled Aspect
pub async fn cmd_deploy(resolver: &ConfigResolver, request: DeployRequest) -> CliResult<()> {
    let config = resolve_config(resolver)?;

    println!("📜 Deploying aspect from {}...", request.wasm_path.display());
    let outcome = deploy_aspect(&config, &request).await?;

    print_receipt(&outcome.receipt)?;
    println!("== deploy aspectID == {}", outcome.aspect_id);
    Ok(())
}

/// Bind an Aspect to a contract
pub async fn cmd_bind(resolver: &ConfigResolver, request: BindRequest) -> CliResult<()> {
    let config = resolve_config(resolver)?;

    println!(
        "🔗 Binding aspect {} to {}...",
        request.aspect_id, request.contract
    );
    let receipt = bind_aspect(&config, &request).await?;

    print_receipt(&receipt)?;
    println!("== aspect bind success ==");
    Ok(())
}

/// Remove an Aspect binding
pub async fn cmd_unbind(resolver: &ConfigResolver, request: BindRequest) -> CliResult<()> {
    let config = resolve_config(resolver)?;

    println!(
        "✂️  Unbinding aspect {} from {}...",
        request.aspect_id, request.contract
    );
    let receipt = unbind_aspect(&config, &request).await?;

    print_receipt(&receipt)?;
    println!("== aspect unbind success ==");
    Ok(())
}

fn resolve_config(resolver: &ConfigResolver) -> CliResult<Configuration> {
    log::info!(
        "Using network '{}' from {}",
        resolver.network(),
        resolver.path().display()
    );
    Ok(resolver.resolve()?)
}

fn print_receipt(receipt: &TransactionReceipt) -> CliResult<()> {
    println!("🧾 Receipt:");
    println!("{}", serde_json::to_string_pretty(receipt)?);
    Ok(())
}
