//! Command implementations for the CLI.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use monoflow_adapters::{default_sources, GitSource};
use monoflow_core::{
    parse_version, BumpType, ChangeDetector, ChangelogGenerator, CommitInfo, CommitSource,
    DependencyGraph, DiffSource, LoadOptions, PackageRegistry, ReleasePlan, VersionManager,
};
use owo_colors::OwoColorize;

use crate::formatting;

/// Anchors `path` at the process working directory. Absolute paths pass
/// through unchanged.
fn absolutize(path: &Path) -> Result<PathBuf> {
    Ok(env::current_dir()?.join(path))
}

pub fn cmd_scan(packages_dir: PathBuf, json: bool, strict: bool) -> Result<()> {
    let packages_dir = absolutize(&packages_dir)?;
    let options = if strict {
        LoadOptions::abort_on_manifest_error()
    } else {
        LoadOptions::default()
    };
    let outcome = PackageRegistry::discover(&packages_dir, &default_sources(), options)?;

    if json {
        let packages: Vec<_> = outcome.registry.packages().collect();
        println!("{}", serde_json::to_string_pretty(&packages)?);
    } else {
        println!("{}", "[Scanning packages...]".bold().cyan());
        println!();

        if outcome.registry.is_empty() {
            println!("  {} No packages found", "WARNING:".yellow());
        } else {
            println!(
                "  {} Found {} {}",
                "OK".green(),
                outcome.registry.len().to_string().bold().cyan(),
                "packages".bold()
            );
            println!();

            let rows: Vec<(String, String, String)> = outcome
                .registry
                .packages()
                .map(|package| {
                    let path = package
                        .root
                        .strip_prefix(&packages_dir)
                        .unwrap_or(&package.root);
                    (
                        package.name.clone(),
                        package.version.to_string(),
                        path.display().to_string(),
                    )
                })
                .collect();
            formatting::print_package_table(&rows);
        }

        for skipped in &outcome.skipped {
            println!(
                "  {} Skipped {}: {}",
                "WARNING:".yellow(),
                skipped.root.display(),
                skipped.error
            );
        }
        println!();
    }

    Ok(())
}

pub fn cmd_order(packages_dir: PathBuf, json: bool) -> Result<()> {
    let packages_dir = absolutize(&packages_dir)?;
    let outcome = PackageRegistry::discover(
        &packages_dir,
        &default_sources(),
        LoadOptions::default(),
    )?;
    let graph = DependencyGraph::build(&outcome.registry);
    let order = graph.build_order()?;

    if json {
        let order_data = serde_json::json!({ "order": order });
        println!("{}", serde_json::to_string_pretty(&order_data)?);
    } else {
        println!("{}", "[Build Order]".bold().cyan());
        println!();

        if order.is_empty() {
            println!("  {} No packages found", "WARNING:".yellow());
        } else {
            println!(
                "  {} Topological order ({} packages):",
                "OK".green(),
                order.len().to_string().bold().cyan()
            );
            println!();
            for (idx, pkg) in order.iter().enumerate() {
                println!(
                    "  {} {}",
                    format!("{:2}", idx + 1).bright_black(),
                    pkg.bold().white()
                );
            }
        }
        println!();
    }

    Ok(())
}

pub fn cmd_affected(
    packages_dir: PathBuf,
    files: Vec<String>,
    git: bool,
    since: Option<String>,
    json: bool,
) -> Result<()> {
    let packages_dir = absolutize(&packages_dir)?;
    let outcome = PackageRegistry::discover(
        &packages_dir,
        &default_sources(),
        LoadOptions::default(),
    )?;
    let registry = outcome.registry;
    let graph = DependencyGraph::build(&registry);

    let changed: Vec<PathBuf> = if git {
        let source = GitSource::open(&packages_dir)?;
        let root = source.root()?;
        source
            .changed_files_since(since.as_deref())?
            .into_iter()
            .map(|path| root.join(path))
            .collect()
    } else if files.is_empty() {
        return Err(anyhow::anyhow!(
            "No files specified. Use --git to detect from git or provide file paths."
        ));
    } else {
        files
            .iter()
            .map(|file| absolutize(Path::new(file)))
            .collect::<Result<Vec<_>>>()?
    };

    let affected = ChangeDetector::fully_affected(&changed, &registry, &graph)?;

    if json {
        let affected_data = serde_json::json!({ "affected": affected });
        println!("{}", serde_json::to_string_pretty(&affected_data)?);
    } else {
        println!("{}", "[Affected Packages]".bold().cyan());
        println!();

        if affected.is_empty() {
            println!("  {} No affected packages", "OK".green());
        } else {
            println!(
                "  {} {} {}",
                "WARNING:".yellow(),
                affected.len().to_string().bold().yellow(),
                "packages affected".bold()
            );
            println!();
            for pkg in &affected {
                println!("  - {}", pkg.bold().yellow());
            }
        }
        println!();
    }

    Ok(())
}

pub fn cmd_deps(packages_dir: PathBuf, package: String, json: bool) -> Result<()> {
    let packages_dir = absolutize(&packages_dir)?;
    let outcome = PackageRegistry::discover(
        &packages_dir,
        &default_sources(),
        LoadOptions::default(),
    )?;
    let graph = DependencyGraph::build(&outcome.registry);

    let deps = graph.dependencies(&package)?;
    let dependents = graph.dependents(&package)?;

    if json {
        let deps_data = serde_json::json!({
            "package": package,
            "dependencies": deps,
            "dependents": dependents,
        });
        println!("{}", serde_json::to_string_pretty(&deps_data)?);
    } else {
        println!("{}", "[Package Dependencies]".bold().cyan());
        println!();
        println!("  Package: {}", package.bold().white());
        println!();

        println!(
            "  {} Dependencies ({}):",
            "DEPENDS ON:".bright_cyan(),
            deps.len().to_string().bold().cyan()
        );
        if deps.is_empty() {
            println!("     {}", "(none)".bright_black());
        } else {
            for dep in deps {
                println!("     - {}", dep.bold().white());
            }
        }
        println!();

        println!(
            "  {} Dependents ({}):",
            "DEPENDED ON BY:".bright_cyan(),
            dependents.len().to_string().bold().cyan()
        );
        if dependents.is_empty() {
            println!("     {}", "(none)".bright_black());
        } else {
            for dep in dependents {
                println!("     - {}", dep.bold().white());
            }
        }
        println!();
    }

    Ok(())
}

pub fn cmd_release(
    packages_dir: PathBuf,
    package: String,
    since: Option<String>,
    bump: Option<BumpType>,
    to: Option<String>,
    apply: bool,
    json: bool,
) -> Result<()> {
    let packages_dir = absolutize(&packages_dir)?;
    let outcome = PackageRegistry::discover(
        &packages_dir,
        &default_sources(),
        LoadOptions::default(),
    )?;
    let registry = outcome.registry;
    let manager = VersionManager::new(&registry);
    let root = registry.require(&package)?.root.clone();

    // The commit log feeds the changelog even when --bump or --to overrides
    // the classified bump.
    let source = GitSource::open(&packages_dir)?;
    let commits = source.commits_for_package(&root, since.as_deref())?;

    let plan = if let Some(version) = to {
        manager.plan_release_to(&package, parse_version(&version)?)?
    } else if let Some(bump) = bump {
        manager.plan_release_with(&package, bump)?
    } else {
        manager.plan_release(&package, &commits)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        if apply && !plan.is_noop() {
            apply_plan(&registry, &plan, &commits)?;
        }
        return Ok(());
    }

    if apply {
        println!("{}", "[Release Plan]".bold().cyan());
    } else {
        println!("{}", "[Release Plan (Dry Run)]".bold().cyan());
    }
    println!();

    if plan.is_noop() {
        println!("  {} No version bump needed", "OK".green());
        println!();
        return Ok(());
    }

    let current = plan.current.to_string();
    let next = plan.next.to_string();
    match plan.bump {
        Some(BumpType::Major) => {
            println!(
                "  [{}] {} {} → {}",
                "MAJOR".red(),
                plan.package.bold().white(),
                current.bright_black(),
                next.bold().cyan()
            );
        }
        Some(BumpType::Minor) => {
            println!(
                "  [{}] {} {} → {}",
                "MINOR".yellow(),
                plan.package.bold().white(),
                current.bright_black(),
                next.bold().cyan()
            );
        }
        Some(BumpType::Patch) => {
            println!(
                "  [{}] {} {} → {}",
                "PATCH".green(),
                plan.package.bold().white(),
                current.bright_black(),
                next.bold().cyan()
            );
        }
        None => {
            println!(
                "  [{}] {} {} → {}",
                "VERSION".cyan(),
                plan.package.bold().white(),
                current.bright_black(),
                next.bold().cyan()
            );
        }
    }
    println!();

    println!(
        "  {} {} commits feed the changelog",
        "COMMITS:".bright_cyan(),
        commits.len().to_string().bold().cyan()
    );
    println!();

    if apply {
        apply_plan(&registry, &plan, &commits)?;
        println!("  {} Release completed successfully", "OK".green());
    } else {
        println!(
            "  {}",
            "Run again with --apply to write the manifest and changelog.".bright_black()
        );
    }
    println!();

    Ok(())
}

/// Writes a plan to disk: the next version into the package manifest, the
/// rendered changelog fragment on top of the package CHANGELOG.md.
fn apply_plan(
    registry: &PackageRegistry,
    plan: &ReleasePlan,
    commits: &[CommitInfo],
) -> Result<()> {
    let package = registry.require(&plan.package)?;

    let sources = default_sources();
    let source = sources
        .iter()
        .find(|source| source.detect(&package.root))
        .ok_or_else(|| {
            anyhow::anyhow!("no manifest source recognizes {}", package.root.display())
        })?;
    source.set_version(&package.root, &plan.next)?;

    let fragment = ChangelogGenerator::render_today(&plan.next, commits);
    let changelog_path = package.root.join("CHANGELOG.md");
    let existing = match fs::read_to_string(&changelog_path) {
        Ok(contents) => contents,
        Err(error) if error.kind() == io::ErrorKind::NotFound => String::new(),
        Err(error) => return Err(error.into()),
    };
    let merged = if existing.is_empty() {
        fragment
    } else {
        format!("{}\n{}", fragment, existing)
    };
    fs::write(&changelog_path, merged)?;

    Ok(())
}
