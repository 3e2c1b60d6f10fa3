use anyhow::Result;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{Codemod, MigrateContext, Rewrite, Skip};

/// `spec:` block pointing at the app-template chart in the shared bjw-s HelmRepository
static LEGACY_CHART_SPEC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"spec:\r?\n",
        r"  interval: [0-9]+m\r?\n",
        r"  chart:\r?\n",
        r"    spec:\r?\n",
        r"      chart: app-template\r?\n",
        r"      version: [0-9.]+\r?\n",
        r"      sourceRef:\r?\n",
        r"        kind: HelmRepository\r?\n",
        r"        name: bjw-s\r?\n",
        r"        namespace: flux-system\r?\n",
    ))
    .unwrap()
});

/// Replace the legacy chart reference in helmrelease.yaml with a `chartRef`
/// to the application's own OCIRepository
pub struct HelmRelease;

impl Codemod for HelmRelease {
    fn file_name(&self) -> &'static str {
        "helmrelease.yaml"
    }

    fn apply(&self, ctx: &MigrateContext, content: &str) -> Result<Rewrite> {
        rewrite_chart_spec(content, &ctx.app.name)
    }
}

/// New `spec:` head; the chart version now lives in the OCIRepository
pub fn chart_ref_spec(name: &str, eol: &str) -> String {
    format!(
        "spec:{eol}  chartRef:{eol}    kind: OCIRepository{eol}    name: {name}{eol}  interval: 1h{eol}"
    )
}

/// Swap the first legacy chart block for a `chartRef` block.
///
/// Only the first occurrence is replaced. When no legacy block is present the
/// content is checked for an existing `chartRef` to tell a finished migration
/// apart from a file whose layout we do not recognize.
pub fn rewrite_chart_spec(content: &str, name: &str) -> Result<Rewrite> {
    if let Some(m) = LEGACY_CHART_SPEC.find(content) {
        debug!("Legacy chart block at bytes {}..{}", m.start(), m.end());
        let eol = if m.as_str().starts_with("spec:\r\n") {
            "\r\n"
        } else {
            "\n"
        };
        let updated = format!(
            "{}{}{}",
            &content[..m.start()],
            chart_ref_spec(name, eol),
            &content[m.end()..]
        );
        return Ok(Rewrite::Updated(updated));
    }

    if has_chart_ref(content, name)? {
        Ok(Rewrite::Skipped(Skip::AlreadyMigrated))
    } else {
        Ok(Rewrite::Skipped(Skip::Unrecognized))
    }
}

/// Whether `content` already has a `chartRef` to the OCIRepository `name`
fn has_chart_ref(content: &str, name: &str) -> Result<bool> {
    let kind = r"[ \t]+kind:[ \t]*OCIRepository[ \t]*";
    let name = format!(r"[ \t]+name:[ \t]*{}[ \t]*", regex::escape(name));
    // Both keys, in either order, directly under `chartRef:`
    let pattern = format!(
        r"(?m)^[ \t]*chartRef:[ \t]*\r?\n(?:{kind}\r?\n{name}|{name}\r?\n{kind})\r?$"
    );
    Ok(Regex::new(&pattern)?.is_match(content))
}
