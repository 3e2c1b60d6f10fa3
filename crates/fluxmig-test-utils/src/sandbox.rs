//! Hermetic filesystem sandbox for running the fluxmig binary in tests.
//! - Everything lives under an `assert_fs::TempDir` and is cleaned up on drop
//! - Commands run with a private `HOME`, `NO_COLOR=1` and no inherited `RUST_LOG`
//! - Run the cargo-built binary with `run()` or any program via `cmd()`
//!
//! ## Quick example
//! ```no_run
//! use fluxmig_test_utils::sandbox::Sandbox;
//!
//! let mut sb = Sandbox::new();
//! sb.write("apps/media/sonarr/app/helmrelease.yaml", "---\n");
//!
//! let out = sb.run("fluxmig", ["--config", "fluxmig.toml"]);
//! assert_eq!(out.code, Some(0));
//! ```

use assert_fs::TempDir;
use assert_fs::fixture::PathChild;
use duct::Expression;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

pub struct Sandbox {
    root: TempDir,
    pub home: PathBuf,
    default_cwd: PathBuf,
}

/// Captured result of a sandboxed command.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new()
    }
}

impl Sandbox {
    /// Create a new sandbox; all state is under an auto-cleaned TempDir.
    pub fn new() -> Self {
        let root = TempDir::new().expect("create sandbox TempDir");
        let home = root.child("home").to_path_buf();
        fs::create_dir_all(&home).expect("create home dir");
        let default_cwd = root.path().to_path_buf();

        Self {
            root,
            home,
            default_cwd,
        }
    }

    /// Get the current default working directory for commands.
    pub fn default_cwd(&self) -> &Path {
        &self.default_cwd
    }

    /// Set the default working directory for commands. Path is relative to sandbox root if not absolute.
    pub fn set_default_cwd<P: AsRef<Path>>(&mut self, cwd: P) -> &mut Self {
        let cwd = cwd.as_ref();
        self.default_cwd = if cwd.is_absolute() {
            cwd.to_path_buf()
        } else {
            self.root_path().join(cwd)
        };
        self
    }

    /// Absolute path to the sandbox root.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Write/overwrite a file relative to the sandbox root.
    pub fn write<P: AsRef<Path>, S: AsRef<[u8]>>(&mut self, rel: P, contents: S) -> &mut Self {
        let p = self.root_path().join(rel);
        if let Some(parent) = p.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(p, contents).expect("write file");
        self
    }

    /// Create a directory (and its parents) relative to the sandbox root.
    pub fn mkdir<P: AsRef<Path>>(&mut self, rel: P) -> &mut Self {
        fs::create_dir_all(self.root_path().join(rel)).expect("create dir");
        self
    }

    /// Read a file relative to the sandbox root.
    pub fn read<P: AsRef<Path>>(&self, rel: P) -> String {
        let p = self.root_path().join(rel);
        fs::read_to_string(&p).unwrap_or_else(|e| panic!("read {}: {e}", p.display()))
    }

    /// Whether a path relative to the sandbox root exists.
    pub fn exists<P: AsRef<Path>>(&self, rel: P) -> bool {
        self.root_path().join(rel).exists()
    }

    /// Build a `duct::Expression` pre-wired with the sandbox env and default cwd.
    pub fn cmd<S: AsRef<OsStr>, I: IntoIterator>(&self, program: S, args: I) -> Expression
    where
        I::Item: AsRef<OsStr>,
    {
        let program_str = program.as_ref().to_string_lossy();
        let args: Vec<_> = args
            .into_iter()
            .map(|arg| arg.as_ref().to_string_lossy().to_string())
            .collect();
        let expr = duct::cmd(program_str.as_ref(), args).dir(&self.default_cwd);
        self.inject_env(expr)
    }

    /// Run a cargo binary inside this sandbox, capturing exit code and output.
    /// Uses `cargo_bin()` to locate the binary; a non-zero exit is not an error.
    pub fn run<I>(&self, program: &str, args: I) -> RunOutput
    where
        I: IntoIterator,
        I::Item: AsRef<OsStr>,
    {
        let cargo_bin_path = assert_cmd::cargo::cargo_bin(program);
        let output = self
            .cmd(cargo_bin_path, args)
            .unchecked()
            .stdout_capture()
            .stderr_capture()
            .run()
            .unwrap_or_else(|e| panic!("failed to spawn {program}: {e}"));

        RunOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    pub fn inject_env(&self, expr: Expression) -> Expression {
        let mut env_map: HashMap<String, String> = HashMap::new();
        if let Ok(path) = std::env::var("PATH") {
            env_map.insert("PATH".into(), path);
        }
        env_map.insert("HOME".into(), self.home.to_string_lossy().into_owned());
        env_map.insert("NO_COLOR".into(), "1".into());

        expr.full_env(&env_map)
    }
}
