use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{Codemod, MigrateContext, Rewrite, Skip};

/// Marker looked up anywhere in the file before inserting
pub const OCI_REPOSITORY_RESOURCE: &str = "./ocirepository.yaml";

/// `- ./helmrelease.yaml` list item: indentation, item, line ending
static HELM_RELEASE_RESOURCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^([ \t]*)(- \./helmrelease\.yaml)(\r?\n)").unwrap());

/// Add `./ocirepository.yaml` to the kustomization resources, right after `./helmrelease.yaml`
pub struct Kustomization;

impl Codemod for Kustomization {
    fn file_name(&self) -> &'static str {
        "kustomization.yaml"
    }

    fn apply(&self, _ctx: &MigrateContext, content: &str) -> Result<Rewrite> {
        Ok(add_oci_repository_resource(content))
    }
}

pub fn add_oci_repository_resource(content: &str) -> Rewrite {
    if content.contains(OCI_REPOSITORY_RESOURCE) {
        return Rewrite::Skipped(Skip::AlreadyPresent);
    }

    if !HELM_RELEASE_RESOURCE.is_match(content) {
        return Rewrite::Skipped(Skip::AnchorNotFound);
    }

    // The new item reuses the anchor's indentation and line ending
    let updated =
        HELM_RELEASE_RESOURCE.replace(content, "${1}${2}${3}${1}- ./ocirepository.yaml${3}");
    Rewrite::Updated(updated.into_owned())
}
