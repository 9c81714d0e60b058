//! Subcommand implementations
//!
//! Each command reads its inputs, runs the library pipeline and writes its
//! outputs. Paths are resolved by the caller.

use anyhow::{bail, Context, Result};
use resgen_symbols::{
    export_to_java, generate_dependency_sources, generate_keep_rules, io,
    keep_rules_from_layout_dir, merge_and_renumber, scan_resource_dir, IdAllocator, JavaOptions,
    ManifestData, ResourceType, SymbolTable,
};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of a `scan`, printed as text or JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    /// Package written on the first line, if any
    pub package: Option<String>,
    /// Total symbols written
    pub symbols: usize,
    /// Symbol count per resource type
    pub by_type: BTreeMap<ResourceType, usize>,
    /// Written symbol file
    pub output: PathBuf,
}

impl ScanSummary {
    fn of(table: &SymbolTable, package: Option<&str>, output: &Path) -> Self {
        let by_type = table
            .resource_types()
            .into_iter()
            .map(|t| (t, table.symbols_of_type(t).len()))
            .collect();
        Self {
            package: package.map(str::to_string),
            symbols: table.len(),
            by_type,
            output: output.to_path_buf(),
        }
    }

    /// Human-readable report
    #[must_use]
    pub fn generate_text(&self) -> String {
        let mut text = format!("Scanned {} symbols into {}\n", self.symbols, self.output.display());
        for (resource_type, count) in &self.by_type {
            let _ = writeln!(text, "  {resource_type}: {count}");
        }
        text
    }
}

/// Where the package of a merged table comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageSource {
    /// Given on the command line
    Name(String),
    /// Read from an `AndroidManifest.xml`
    Manifest(PathBuf),
}

impl PackageSource {
    fn resolve(&self) -> Result<String> {
        match self {
            Self::Name(name) => Ok(name.clone()),
            Self::Manifest(path) => Ok(read_manifest(path)?.package),
        }
    }
}

/// Scan `res_dir` and write its symbol file
///
/// With a package, the file starts with the package line.
///
/// # Errors
/// Returns error if the scan fails or the output cannot be written
pub fn scan(res_dir: &Path, package: Option<&str>, output: &Path) -> Result<ScanSummary> {
    let table = scan_resource_dir(res_dir, &mut IdAllocator::new())
        .with_context(|| format!("failed to scan {}", res_dir.display()))?;

    match package {
        Some(package) => io::write_with_package(&table.rename(package)?, output)?,
        None => io::write(&table, output)?,
    }
    Ok(ScanSummary::of(&table, package, output))
}

/// Merge a module table with its dependencies and write the result
///
/// # Errors
/// Returns error if an input cannot be read or the merge fails
pub fn merge(
    table: &Path,
    platform: &Path,
    dependencies: &[PathBuf],
    package: &PackageSource,
    output: &Path,
) -> Result<SymbolTable> {
    let module = io::read(table)?;
    let platform = read_platform(platform)?;
    let dependencies = read_dependencies(dependencies)?;
    let package = package.resolve()?;

    let merged = merge_and_renumber(&module, &dependencies, &platform, &package, &mut IdAllocator::new())
        .with_context(|| format!("failed to merge symbols for {package}"))?;
    io::write(&merged, output)?;
    Ok(merged)
}

/// Generate the Java source of a symbol file
///
/// # Errors
/// Returns error if the table cannot be read or the source written
pub fn generate(table: &Path, package: &str, out_dir: &Path, options: &JavaOptions) -> Result<PathBuf> {
    let table = io::read(table)?.rename(package)?;
    Ok(export_to_java(&table, out_dir, options)?)
}

/// Inputs of the `library` pipeline
#[derive(Debug, Clone)]
pub struct LibraryArgs {
    /// Module resource directory
    pub res_dir: PathBuf,
    /// Module manifest
    pub manifest: PathBuf,
    /// Platform symbol file
    pub platform: PathBuf,
    /// Package-prefixed dependency symbol files
    pub dependencies: Vec<PathBuf>,
    /// Merged symbol file
    pub output: PathBuf,
    /// Root of generated sources
    pub source_dir: PathBuf,
}

/// Scan, merge, write the merged table and generate non-final sources for
/// the module and each dependency package
///
/// Returns the generated source paths, module first.
///
/// # Errors
/// Returns error if any step fails
pub fn library(args: &LibraryArgs, class_name: &str) -> Result<Vec<PathBuf>> {
    let manifest = read_manifest(&args.manifest)?;
    let module = scan_resource_dir(&args.res_dir, &mut IdAllocator::new())
        .with_context(|| format!("failed to scan {}", args.res_dir.display()))?;
    let platform = read_platform(&args.platform)?;
    let dependencies = read_dependencies(&args.dependencies)?;

    let merged = merge_and_renumber(
        &module,
        &dependencies,
        &platform,
        &manifest.package,
        &mut IdAllocator::new(),
    )
    .with_context(|| format!("failed to merge symbols for {}", manifest.package))?;
    io::write(&merged, &args.output)?;

    let options = JavaOptions {
        class_name: class_name.to_string(),
        final_ids: false,
    };
    let mut sources = vec![export_to_java(&merged, &args.source_dir, &options)?];
    sources.extend(generate_dependency_sources(
        &merged,
        &dependencies,
        &args.source_dir,
        &options,
    )?);

    tracing::info!(
        "Built library {} with {} symbols and {} sources",
        manifest.package,
        merged.len(),
        sources.len()
    );
    Ok(sources)
}

/// Write keep rules for manifest components and custom layout views
///
/// # Errors
/// Returns error if an input cannot be read or the output written
pub fn keep_rules(manifest: &Path, layout_dirs: &[PathBuf], main_dex: bool, output: &Path) -> Result<usize> {
    let manifest = read_manifest(manifest)?;
    let mut rules = generate_keep_rules(&manifest, main_dex);

    let mut layout_rules = BTreeSet::new();
    for dir in layout_dirs {
        keep_rules_from_layout_dir(dir, &mut layout_rules)?;
    }
    let components: BTreeSet<String> = rules.iter().cloned().collect();
    rules.extend(layout_rules.into_iter().filter(|rule| !components.contains(rule)));

    let mut content = rules.join("\n");
    content.push('\n');
    fs::write(output, content).with_context(|| format!("failed to write {}", output.display()))?;
    Ok(rules.len() - 1)
}

fn read_manifest(path: &Path) -> Result<ManifestData> {
    let xml = fs::read_to_string(path).with_context(|| format!("failed to read manifest {}", path.display()))?;
    ManifestData::parse(&xml).with_context(|| format!("in manifest {}", path.display()))
}

fn read_platform(path: &Path) -> Result<SymbolTable> {
    io::read(path).with_context(|| format!("failed to load platform symbols {}", path.display()))
}

fn read_dependencies(paths: &[PathBuf]) -> Result<Vec<SymbolTable>> {
    let mut dependencies = Vec::with_capacity(paths.len());
    for path in paths {
        let table = io::read_with_package(path)
            .with_context(|| format!("failed to load dependency symbols {}", path.display()))?;
        if table.package().is_empty() {
            bail!("dependency {} has no package", path.display());
        }
        dependencies.push(table);
    }
    Ok(dependencies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use resgen_test_utils::{sample_res_dir, ResDir, SAMPLE_MANIFEST};

    #[test]
    fn scan_summary_counts_types() {
        let res = sample_res_dir();
        let out = ResDir::new();
        let output = out.path().join("R.txt");

        let summary = scan(res.path(), Some("com.example.lib"), &output).unwrap();
        assert_eq!(summary.package.as_deref(), Some("com.example.lib"));
        assert_eq!(summary.by_type.get(&ResourceType::Drawable), Some(&2));
        assert_eq!(summary.by_type.get(&ResourceType::Id), Some(&4));

        let written = fs::read_to_string(&output).unwrap();
        assert!(written.starts_with("com.example.lib\n"));
        assert_eq!(written.lines().count(), summary.symbols + 1);
    }

    #[test]
    fn scan_summary_serializes() {
        let summary = ScanSummary {
            package: None,
            symbols: 3,
            by_type: BTreeMap::from([(ResourceType::String, 1), (ResourceType::Styleable, 2)]),
            output: PathBuf::from("R.txt"),
        };
        assert_eq!(
            serde_json::to_string(&summary).unwrap(),
            r#"{"package":null,"symbols":3,"by_type":{"string":1,"styleable":2},"output":"R.txt"}"#
        );
        assert!(summary.generate_text().contains("  string: 1\n"));
    }

    #[test]
    fn package_from_manifest() {
        let dir = ResDir::new();
        let manifest = dir.file("AndroidManifest.xml", SAMPLE_MANIFEST);
        assert_eq!(
            PackageSource::Manifest(manifest).resolve().unwrap(),
            "com.example.lib"
        );
    }

    #[test]
    fn dependency_without_package_line_fails() {
        let dir = ResDir::new();
        let path = dir.file("dep.txt", "");
        assert!(read_dependencies(&[path]).is_err());
    }

    #[test]
    fn keep_rules_file() {
        let res = sample_res_dir();
        let manifest = res.file("AndroidManifest.xml", SAMPLE_MANIFEST);
        let output = res.path().join("rules.pro");

        let count = keep_rules(&manifest, &[res.path().join("layout")], false, &output).unwrap();
        assert_eq!(count, 4);
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "# Generated by resgen\n\
             -keep class com.example.lib.LibApp { <init>(...); }\n\
             -keep class com.example.lib.MainActivity { <init>(...); }\n\
             -keep class com.example.lib.Sync { <init>(...); }\n\
             -keep class com.example.widget.BadgeView { <init>(...); }\n"
        );
    }
}
