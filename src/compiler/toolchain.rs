//! Aspect compiler invocation
//!
//! Derives the artifact path, prepares the build directory and drives the
//! external compiler as a child process, streaming its output as it runs.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::str::FromStr;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

/// Entry file compiled when none is given
pub const DEFAULT_ENTRY_FILE: &str = "aspect/index.ts";

/// Directory derived artifact paths live in
pub const BUILD_DIR: &str = "build";

/// Compiler errors
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Invalid target: {0} (expected 'debug' or 'release')")]
    InvalidTarget(String),
    #[error("Failed to create build directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to spawn {program}: {source}")]
    SpawnFailed {
        program: String,
        source: std::io::Error,
    },
    #[error("Failed to wait for compiler: {0}")]
    WaitFailed(std::io::Error),
    #[error("Failed to compile AssemblyScript: process exited with code {code}")]
    Failed { code: i32 },
}

/// Compilation target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    #[default]
    Debug,
    Release,
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Debug => "debug",
            Target::Release => "release",
        }
    }
}

impl FromStr for Target {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(Target::Debug),
            "release" => Ok(Target::Release),
            other => Err(CompileError::InvalidTarget(other.to_string())),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// External compiler command line, configurable under `compiler` in the
/// project file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Toolchain {
    /// Program to spawn
    pub program: String,
    /// Arguments placed before the entry file
    pub args: Vec<String>,
    /// Extension of derived artifact paths
    pub extension: String,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            program: "npx".to_string(),
            args: vec!["asc".to_string()],
            extension: "bin".to_string(),
        }
    }
}

/// A single compilation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    pub entry_file: PathBuf,
    pub target: Target,
    pub output: PathBuf,
}

impl CompileRequest {
    /// Build a request, deriving the output path when none is given
    pub fn new(entry_file: &Path, target: Target, output: Option<PathBuf>, extension: &str) -> Self {
        let output = output.unwrap_or_else(|| derive_output_path(entry_file, target, extension));
        Self {
            entry_file: entry_file.to_path_buf(),
            target,
            output,
        }
    }

    /// Arguments handed to the compiler after the toolchain's own arguments
    pub fn compiler_args(&self) -> Vec<String> {
        vec![
            self.entry_file.to_string_lossy().into_owned(),
            "--target".to_string(),
            self.target.as_str().to_string(),
            "-o".to_string(),
            self.output.to_string_lossy().into_owned(),
        ]
    }

    /// Create the output's directory if it is missing.
    /// Only the last level is created; missing ancestors are an error.
    pub fn prepare_output_dir(&self, base_dir: &Path) -> Result<(), CompileError> {
        let Some(parent) = self.output.parent() else {
            return Ok(());
        };
        if parent.as_os_str().is_empty() {
            return Ok(());
        }

        let dir = base_dir.join(parent);
        if !dir.exists() {
            log::debug!("Creating build directory {}", dir.display());
            std::fs::create_dir(&dir).map_err(|source| CompileError::CreateDir {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

/// `build/<name>.<ext>` for release, `build/<name>_debug.<ext>` for debug
pub fn derive_output_path(entry_file: &Path, target: Target, extension: &str) -> PathBuf {
    let name = entry_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let file_name = match target {
        Target::Release => format!("{}.{}", name, extension),
        Target::Debug => format!("{}_debug.{}", name, extension),
    };
    Path::new(BUILD_DIR).join(file_name)
}

/// Outcome of a compiler run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CompileOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Turn a non-zero exit into an error
    pub fn into_result(self) -> Result<Self, CompileError> {
        if self.success() {
            Ok(self)
        } else {
            Err(CompileError::Failed {
                code: self.exit_code,
            })
        }
    }
}

impl Toolchain {
    /// Full argument list for a request
    pub fn command_args(&self, request: &CompileRequest) -> Vec<String> {
        let mut args = self.args.clone();
        args.extend(request.compiler_args());
        args
    }

    /// Run the compiler in `work_dir`.
    ///
    /// Output lines are echoed as they arrive and also collected into the
    /// returned [`CompileOutput`]. A non-zero exit is not an error here; use
    /// [`CompileOutput::into_result`] to treat it as one.
    pub async fn compile(
        &self,
        request: &CompileRequest,
        work_dir: &Path,
    ) -> Result<CompileOutput, CompileError> {
        request.prepare_output_dir(work_dir)?;

        let args = self.command_args(request);
        println!("Running command: {} {}", self.program, args.join(" "));

        let mut child = Command::new(&self.program)
            .args(&args)
            .current_dir(work_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| CompileError::SpawnFailed {
                program: self.program.clone(),
                source,
            })?;

        let stdout_task = tokio::spawn(stream_lines(child.stdout.take(), Stream::Stdout));
        let stderr_task = tokio::spawn(stream_lines(child.stderr.take(), Stream::Stderr));

        let status = child.wait().await.map_err(CompileError::WaitFailed)?;
        let stdout = stdout_task.await.unwrap_or_default();
        let stderr = stderr_task.await.unwrap_or_default();

        // Killed by a signal
        let exit_code = status.code().unwrap_or(1);
        log::debug!("Compiler exited with {}", status);

        Ok(CompileOutput {
            exit_code,
            stdout,
            stderr,
        })
    }
}

#[derive(Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

async fn stream_lines<R>(reader: Option<R>, stream: Stream) -> String
where
    R: AsyncRead + Unpin,
{
    let mut collected = String::new();
    let Some(reader) = reader else {
        return collected;
    };

    // Lines are split on raw bytes so invalid UTF-8 never stops the drain
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                log::warn!("Failed to read compiler output: {}", e);
                break;
            }
        }

        let text = String::from_utf8_lossy(&buf);
        let line = text.trim_end_matches(|c| c == '\n' || c == '\r');
        match stream {
            Stream::Stdout => println!("stdout: {}", line),
            Stream::Stderr => eprintln!("stderr: {}", line),
        }
        collected.push_str(line);
        collected.push('\n');
    }
    collected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_output_paths() {
        let entry = Path::new("aspect/index.ts");
        assert_eq!(
            derive_output_path(entry, Target::Release, "wasm"),
            PathBuf::from("build/index.wasm")
        );
        assert_eq!(
            derive_output_path(entry, Target::Debug, "wasm"),
            PathBuf::from("build/index_debug.wasm")
        );
        assert_eq!(
            derive_output_path(Path::new("my.aspect.ts"), Target::Release, "bin"),
            PathBuf::from("build/my.aspect.bin")
        );
    }

    #[test]
    fn test_explicit_output_wins() {
        let request = CompileRequest::new(
            Path::new("aspect/index.ts"),
            Target::Debug,
            Some(PathBuf::from("out/custom.wasm")),
            "wasm",
        );
        assert_eq!(request.output, PathBuf::from("out/custom.wasm"));
    }

    #[test]
    fn test_release_scenario_args() {
        let toolchain = Toolchain::default();
        assert_eq!(toolchain.extension, "bin");

        let request = CompileRequest::new(
            Path::new("aspect/index.ts"),
            Target::Release,
            None,
            &toolchain.extension,
        );
        assert_eq!(
            request.compiler_args(),
            vec!["aspect/index.ts", "--target", "release", "-o", "build/index.bin"]
        );

        let debug = CompileRequest::new(
            Path::new("aspect/index.ts"),
            Target::Debug,
            None,
            &toolchain.extension,
        );
        assert_eq!(debug.output, PathBuf::from("build/index_debug.bin"));

        let full = toolchain.command_args(&request);
        assert_eq!(toolchain.program, "npx");
        assert_eq!(full[0], "asc");
        assert_eq!(&full[1..], request.compiler_args().as_slice());
    }

    #[test]
    fn test_target_parsing() {
        assert_eq!("debug".parse::<Target>().unwrap(), Target::Debug);
        assert_eq!("release".parse::<Target>().unwrap(), Target::Release);
        assert!(matches!(
            "prod".parse::<Target>(),
            Err(CompileError::InvalidTarget(_))
        ));
        assert_eq!(Target::default(), Target::Debug);
    }

    #[test]
    fn test_prepare_output_dir_single_level() {
        let temp_dir = tempfile::tempdir().unwrap();

        let request =
            CompileRequest::new(Path::new("aspect/index.ts"), Target::Release, None, "wasm");
        request.prepare_output_dir(temp_dir.path()).unwrap();
        assert!(temp_dir.path().join("build").is_dir());

        // Existing directory is fine
        request.prepare_output_dir(temp_dir.path()).unwrap();

        let nested = CompileRequest::new(
            Path::new("aspect/index.ts"),
            Target::Release,
            Some(PathBuf::from("a/b/out.wasm")),
            "wasm",
        );
        assert!(matches!(
            nested.prepare_output_dir(temp_dir.path()),
            Err(CompileError::CreateDir { .. })
        ));
    }

    #[test]
    fn test_output_without_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let request = CompileRequest::new(
            Path::new("index.ts"),
            Target::Release,
            Some(PathBuf::from("index.wasm")),
            "wasm",
        );
        request.prepare_output_dir(temp_dir.path()).unwrap();
    }

    #[test]
    fn test_compile_output_result() {
        let ok = CompileOutput {
            exit_code: 0,
            stdout: String::new(),
            stderr: String::new(),
        };
        assert!(ok.clone().into_result().is_ok());

        let failed = CompileOutput { exit_code: 2, ..ok };
        assert!(matches!(
            failed.into_result(),
            Err(CompileError::Failed { code: 2 })
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_compile_collects_output_and_exit_code() {
        let temp_dir = tempfile::tempdir().unwrap();
        let toolchain = Toolchain {
            program: "sh".to_string(),
            args: vec![
                "-c".to_string(),
                "echo \"compiling $1\"; echo warning >&2; exit 3".to_string(),
                "asc".to_string(),
            ],
            extension: "wasm".to_string(),
        };
        let request =
            CompileRequest::new(Path::new("aspect/index.ts"), Target::Release, None, "wasm");

        let output = toolchain.compile(&request, temp_dir.path()).await.unwrap();
        assert_eq!(output.exit_code, 3);
        assert_eq!(output.stdout, "compiling aspect/index.ts\n");
        assert_eq!(output.stderr, "warning\n");
        assert!(temp_dir.path().join("build").is_dir());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_compile_survives_non_utf8_output() {
        let temp_dir = tempfile::tempdir().unwrap();
        let toolchain = Toolchain {
            program: "sh".to_string(),
            args: vec![
                "-c".to_string(),
                "printf 'caf\\351\\n'; sleep 0.2; echo done; exit 0".to_string(),
            ],
            extension: "wasm".to_string(),
        };
        let request =
            CompileRequest::new(Path::new("aspect/index.ts"), Target::Release, None, "wasm");

        let output = toolchain.compile(&request, temp_dir.path()).await.unwrap();
        assert_eq!(output.exit_code, 0);
        assert_eq!(output.stdout, "caf\u{FFFD}\ndone\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_compile_success() {
        let temp_dir = tempfile::tempdir().unwrap();
        let toolchain = Toolchain {
            program: "true".to_string(),
            args: vec![],
            extension: "wasm".to_string(),
        };
        let request =
            CompileRequest::new(Path::new("aspect/index.ts"), Target::Debug, None, "wasm");

        let output = toolchain.compile(&request, temp_dir.path()).await.unwrap();
        assert!(output.success());
    }

    #[tokio::test]
    async fn test_spawn_failure() {
        let temp_dir = tempfile::tempdir().unwrap();
        let toolchain = Toolchain {
            program: "definitely-not-a-compiler-binary".to_string(),
            args: vec![],
            extension: "wasm".to_string(),
        };
        let request =
            CompileRequest::new(Path::new("aspect/index.ts"), Target::Debug, None, "wasm");

        let err = toolchain.compile(&request, temp_dir.path()).await.unwrap_err();
        assert!(matches!(err, CompileError::SpawnFailed { .. }));
    }
}
