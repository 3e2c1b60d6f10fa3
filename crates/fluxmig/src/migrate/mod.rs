use anyhow::{Context, Result};
use clap::Args;
use fluxmig_ui::{icons, prelude::*, rule};
use log::debug;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

pub mod codemods;
pub mod oci_repository;

use crate::app::AppRef;
use crate::config::{DEFAULT_CONFIG_FILE, MigrateConfig};
pub use codemods::MigrateContext;
use codemods::{Codemod, Rewrite, Skip, helm_release::HelmRelease, kustomization::Kustomization};

/// Arguments for the migration
#[derive(Args, Debug, Clone)]
pub struct MigrateArgs {
    /// Application paths (<namespace>/<name>/app) to migrate, in order.
    /// When omitted, the `apps` list from the config file is used.
    #[arg(value_name = "APPS")]
    pub apps: Vec<String>,

    /// Migration config file
    #[arg(
        short,
        long,
        value_name = "PATH",
        default_value = DEFAULT_CONFIG_FILE,
        value_hint = clap::ValueHint::FilePath
    )]
    pub config: PathBuf,

    /// Directory holding the applications, overrides `apps-dir` from the config
    #[arg(long, value_name = "DIR", value_hint = clap::ValueHint::DirPath)]
    pub apps_dir: Option<PathBuf>,
}

/// What happened to a single file of an application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Written where no file existed
    Created,
    /// Written over an existing file
    Replaced,
    /// Rewritten in place
    Updated,
    /// Left alone on purpose
    Skipped(Skip),
    /// File to rewrite does not exist
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub path: PathBuf,
    pub outcome: Outcome,
}

impl StepReport {
    fn needs_review(&self) -> bool {
        match self.outcome {
            Outcome::Missing => true,
            Outcome::Skipped(skip) => skip.is_warning(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppStatus {
    Migrated(Vec<StepReport>),
    DirectoryMissing(PathBuf),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MigrationSummary {
    pub migrated: Vec<String>,
    /// Migrated applications with a file that was missing or not recognized
    pub needs_review: Vec<String>,
    pub failed: Vec<String>,
}

/// Execute the migration
pub fn execute(args: MigrateArgs) -> Result<()> {
    let mut config = MigrateConfig::from_file(&args.config)?;
    if let Some(apps_dir) = args.apps_dir {
        config.apps_dir = apps_dir;
    }
    let apps = config.select_apps(&args.apps)?;
    debug!("Apps directory: {}", config.apps_dir.display());

    print_banner(&config, apps.len());
    let summary = migrate_all(&config, &apps);
    print_summary(&summary);

    if !summary.failed.is_empty() {
        anyhow::bail!(
            "{} of {} applications failed to migrate",
            summary.failed.len(),
            apps.len()
        );
    }

    Ok(())
}

/// Migrate every application in order. Failures are reported and counted,
/// they never stop the remaining applications.
pub fn migrate_all(config: &MigrateConfig, apps: &[String]) -> MigrationSummary {
    let mut summary = MigrationSummary::default();

    for app_path in apps {
        match migrate_app(config, app_path) {
            Ok(AppStatus::Migrated(steps)) => {
                if steps.iter().any(StepReport::needs_review) {
                    summary.needs_review.push(app_path.clone());
                }
                summary.migrated.push(app_path.clone());
            }
            Ok(AppStatus::DirectoryMissing(_)) => summary.failed.push(app_path.clone()),
            Err(e) => {
                println!("  {} Error migrating {app_path}: {e:#}", icons::error());
                summary.failed.push(app_path.clone());
            }
        }
    }

    summary
}

/// Migrate a single application: write the OCIRepository, then rewrite the
/// HelmRelease and the Kustomization. The rewrites run even when the one
/// before them was skipped.
pub fn migrate_app(config: &MigrateConfig, app_path: &str) -> Result<AppStatus> {
    let app: AppRef = app_path.parse()?;
    let app_dir = config.app_dir(&app);

    println!(
        "\n{} Migrating {}",
        icons::package(),
        app.to_string().with_style(Style::Cyan).bold()
    );

    if !app_dir.is_dir() {
        println!(
            "  {} Directory not found: {}",
            icons::error(),
            app_dir.display()
        );
        return Ok(AppStatus::DirectoryMissing(app_dir));
    }

    let ctx = MigrateContext {
        app,
        app_dir,
        app_template_version: config.app_template_version.clone(),
        oci_url: config.oci_url.clone(),
    };

    let mut steps = Vec::new();

    let existed = ctx.app_dir.join(oci_repository::FILE_NAME).exists();
    let path = oci_repository::write(&ctx)?;
    let outcome = if existed {
        Outcome::Replaced
    } else {
        Outcome::Created
    };
    steps.push(StepReport { path, outcome });
    print_step(&steps[0]);

    let codemods: Vec<Box<dyn Codemod>> = vec![Box::new(HelmRelease), Box::new(Kustomization)];
    for codemod in &codemods {
        let step = run_codemod(&ctx, codemod.as_ref())?;
        print_step(&step);
        steps.push(step);
    }

    Ok(AppStatus::Migrated(steps))
}

/// Read, rewrite and write back one file of an application
fn run_codemod(ctx: &MigrateContext, codemod: &dyn Codemod) -> Result<StepReport> {
    let path = ctx.app_dir.join(codemod.file_name());

    let original = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Ok(StepReport {
                path,
                outcome: Outcome::Missing,
            });
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", path.display()));
        }
    };

    let outcome = match codemod.apply(ctx, &original)? {
        Rewrite::Updated(content) => {
            fs::write(&path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            Outcome::Updated
        }
        Rewrite::Skipped(skip) => Outcome::Skipped(skip),
    };
    debug!("{}: {:?}", path.display(), outcome);

    Ok(StepReport { path, outcome })
}

fn print_step(step: &StepReport) {
    let path = step.path.display();
    match step.outcome {
        Outcome::Created => println!("  {} Created {path}", icons::success()),
        Outcome::Replaced => println!("  {} Replaced {path}", icons::success()),
        Outcome::Updated => println!("  {} Updated {path}", icons::success()),
        Outcome::Missing => println!("  {} Not found: {path}", icons::warning()),
        Outcome::Skipped(skip) => {
            let icon = if skip.is_warning() {
                icons::warning()
            } else {
                icons::info()
            };
            let message = match skip {
                Skip::AlreadyMigrated => format!("{path} already uses chartRef"),
                Skip::Unrecognized => format!(
                    "Legacy chart block not found in {path} and no chartRef either, format not recognized"
                ),
                Skip::AlreadyPresent => format!(
                    "{} already listed in {path}",
                    oci_repository::FILE_NAME
                ),
                Skip::AnchorNotFound => {
                    format!("Could not find ./helmrelease.yaml in resources of {path}")
                }
            };
            println!("  {icon} {message}");
        }
    }
}

fn print_banner(config: &MigrateConfig, total: usize) {
    println!("{}", rule());
    println!(
        "{}",
        "app-template migration to OCIRepository".with_style(Style::Cyan).bold()
    );
    println!("  Target version: {}", config.app_template_version);
    println!("  Source: {}", config.oci_url);
    println!("  Total apps: {total}");
    println!("{}", rule());
}

fn print_summary(summary: &MigrationSummary) {
    println!("\n{}", rule());
    println!(
        "{} Successfully migrated: {}",
        icons::success(),
        summary.migrated.len()
    );
    if !summary.needs_review.is_empty() {
        println!(
            "{} Needs review: {}",
            icons::warning(),
            summary.needs_review.len()
        );
        for app in &summary.needs_review {
            println!("  - {}", app.with_style(Style::Yellow));
        }
    }
    println!("{} Failed: {}", icons::error(), summary.failed.len());
    for app in &summary.failed {
        println!("  - {}", app.with_style(Style::Red));
    }
    println!("{}", rule());
}
