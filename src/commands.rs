//! The `extract` command: walk a Luau source tree, resolve every file's
//! doc comments into symbols, and write the catalog.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use walkdir::WalkDir;

use crate::bindings;
use crate::catalog::{self, Module};
use crate::config::Config;
use crate::error::Error;
use crate::extractor;
use crate::inherit;
use crate::oracle::NoOracle;
use crate::resolver;
use crate::types::{Diagnostic, Severity};

/// Scan sources under `root` (optionally narrowed to `src`), build the
/// catalog, and write it to `out`. Diagnostics go to stderr; the catalog
/// is written even when diagnostics were raised.
///
/// # Errors
///
/// Returns `Error::FileNotFound` if the scan directory does not exist,
/// `Error::NoSources` if it holds no Luau files, and I/O, TOML, or JSON
/// errors from reading sources and writing the catalog.
pub fn extract(
    root: &Path,
    src: Option<&Path>,
    out: &Path,
    fail_on_warning: bool,
) -> Result<ExitCode, Error> {
    let config = Config::load(root)?;
    let scan_root = match src {
        Some(sub) => root.join(sub),
        None => root.to_path_buf(),
    };
    if !scan_root.is_dir() {
        return Err(Error::FileNotFound {
            path: scan_root.clone(),
        });
    }

    let sources = collect_sources(root, &scan_root, &config);
    if sources.is_empty() {
        return Err(Error::NoSources { dir: scan_root });
    }

    let mut diagnostics = Vec::new();
    let mut modules = Vec::new();
    for (path, relative) in &sources {
        modules.push(extract_module(
            path,
            relative,
            &config,
            &mut diagnostics,
        )?);
    }

    // Inherit-doc references resolve within a module only.
    for module in &mut modules {
        inherit::apply_inherit_docs(&mut module.symbols);
    }

    let document = catalog::build_catalog(modules);
    let json = serde_json::to_string_pretty(&document)?;
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(out, json + "\n")?;

    report_diagnostics(&diagnostics);
    println!(
        "Wrote {} modules to {}",
        sources.len(),
        out.display()
    );

    let has_error = diagnostics.iter().any(|d| d.level == Severity::Error);
    if has_error || (fail_on_warning && !diagnostics.is_empty()) {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Discover Luau files under the scan root in a stable order. Hidden
/// directories and `node_modules` are never entered.
fn collect_sources(root: &Path, scan_root: &Path, config: &Config) -> Vec<(PathBuf, String)> {
    let mut sources = Vec::new();

    let walker = WalkDir::new(scan_root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            !(name.starts_with('.') && name.len() > 1) && name != "node_modules"
        });

    for entry in walker.flatten() {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let is_luau = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == "lua" || e == "luau");
        if !is_luau {
            continue;
        }

        let relative = path
            .strip_prefix(root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");
        if config.should_scan(&relative) {
            sources.push((path.to_path_buf(), relative));
        }
    }

    sources
}

/// Run the per-file pipeline: extract blocks, scan bindings, resolve
/// symbols, and wrap the result as a catalog module.
fn extract_module(
    path: &Path,
    relative: &str,
    config: &Config,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Module, Error> {
    let raw = std::fs::read_to_string(path)?;
    let normalized = raw.replace("\r\n", "\n");
    let lines: Vec<String> = normalized.lines().map(String::from).collect();

    let blocks = extractor::extract_doc_blocks(&lines);
    let file_bindings = bindings::collect_bindings(&lines);
    let symbols = resolver::build_symbols(
        &blocks,
        &file_bindings,
        &lines,
        relative,
        &NoOracle,
        diagnostics,
    );

    let id = config
        .module_id_override(relative)
        .map_or_else(|| catalog::module_id(relative), String::from);

    Ok(Module {
        id,
        path: relative.to_string(),
        source_hash: catalog::source_hash(&raw),
        symbols,
    })
}

/// Print diagnostics to stderr, one per line, in resolution order.
fn report_diagnostics(diagnostics: &[Diagnostic]) {
    for diag in diagnostics {
        let label = match diag.level {
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        };
        eprintln!("{label} {}:{} {}", diag.file, diag.line, diag.message);
    }
}
