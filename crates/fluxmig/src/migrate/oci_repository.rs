use anyhow::{Context, Result};
use log::debug;
use minijinja::{AutoEscape, Environment, context};
use std::path::{Path, PathBuf};

use super::MigrateContext;

const OCI_REPOSITORY_TEMPLATE: &str = include_str!("../../templates/ocirepository.yaml.jinja");

pub const FILE_NAME: &str = "ocirepository.yaml";

/// Polling interval of the generated OCIRepository
pub const INTERVAL: &str = "15m";

/// Layer holding the packaged Helm chart
pub const HELM_CHART_MEDIA_TYPE: &str = "application/vnd.cncf.helm.chart.content.v1.tar+gzip";

/// Render the OCIRepository manifest for one application
pub fn render(ctx: &MigrateContext) -> Result<String> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.add_template(FILE_NAME, OCI_REPOSITORY_TEMPLATE)?;

    let content = env.get_template(FILE_NAME)?.render(context! {
        name => ctx.app.name,
        namespace => ctx.app.namespace,
        interval => INTERVAL,
        media_type => HELM_CHART_MEDIA_TYPE,
        tag => ctx.app_template_version,
        url => ctx.oci_url,
    })?;

    Ok(content)
}

/// Write `ocirepository.yaml` into the application directory, replacing any existing file
pub fn write(ctx: &MigrateContext) -> Result<PathBuf> {
    let path = ctx.app_dir.join(FILE_NAME);
    let content = render(ctx)?;
    write_file(&path, &content)?;
    Ok(path)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    debug!("Writing {} ({} bytes)", path.display(), content.len());
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
