use anyhow::Result;
use std::path::PathBuf;

use crate::app::AppRef;

pub mod helm_release;
pub mod kustomization;

/// Context passed to all codemods for one application
#[derive(Debug, Clone)]
pub struct MigrateContext {
    /// Application being migrated
    pub app: AppRef,
    /// Absolute or config-relative path of the application directory
    pub app_dir: PathBuf,
    /// Chart tag for the generated OCIRepository (e.g. "4.4.0")
    pub app_template_version: String,
    /// OCI source url for the generated OCIRepository
    pub oci_url: String,
}

/// Result of running a codemod over a file's content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    /// New file content, always different from the input
    Updated(String),
    /// Nothing to do; the file stays byte-for-byte identical
    Skipped(Skip),
}

/// Why a codemod left a file alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// HelmRelease already references its OCIRepository through `chartRef`
    AlreadyMigrated,
    /// HelmRelease has neither the legacy chart block nor a `chartRef`
    Unrecognized,
    /// Kustomization already lists `./ocirepository.yaml`
    AlreadyPresent,
    /// Kustomization has no `./helmrelease.yaml` resource to insert after
    AnchorNotFound,
}

impl Skip {
    /// Skips that may hide a formatting drift rather than a finished migration
    pub fn is_warning(self) -> bool {
        matches!(self, Skip::Unrecognized | Skip::AnchorNotFound)
    }
}

pub trait Codemod {
    /// File edited by this codemod, relative to the application directory
    fn file_name(&self) -> &'static str;
    fn apply(&self, ctx: &MigrateContext, content: &str) -> Result<Rewrite>;
}
