//! Aspect compilation
//!
//! Wraps the external AssemblyScript toolchain (`npx asc` by default).
//!
//! # Example
//!
//! ```rust,no_run
//! use aspect_tool::compiler::{CompileRequest, Target, Toolchain};
//! use std::path::Path;
//!
//! # async fn run() -> Result<(), aspect_tool::compiler::CompileError> {
//! let toolchain = Toolchain::default();
//! let request = CompileRequest::new(Path::new("aspect/index.ts"), Target::Release, None, "wasm");
//! let output = toolchain.compile(&request, Path::new(".")).await?;
//! println!("exit code {}", output.exit_code);
//! # Ok(())
//! # }
//! ```

pub mod toolchain;

pub use toolchain::{
    derive_output_path, CompileError, CompileOutput, CompileRequest, Target, Toolchain,
    BUILD_DIR, DEFAULT_ENTRY_FILE,
};
