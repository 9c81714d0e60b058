//! `R.java` generation
//!
//! One public final class per package, with a nested class per resource
//! type present in the table.

use crate::error::GenerateError;
use crate::resource_type::ResourceType;
use crate::symbol::{Symbol, SymbolKey};
use crate::table::SymbolTable;
use std::collections::{BTreeMap, HashSet};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Default generated class name
pub const DEFAULT_CLASS_NAME: &str = "R";

const HEADER: &str = "/* AUTO-GENERATED FILE.  DO NOT MODIFY.
 *
 * This class was automatically generated by resgen
 * from the resource data it found. It
 * should not be modified by hand.
 */
";

/// Options for generated sources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaOptions {
    /// Name of the outer class and of the file
    pub class_name: String,

    /// Emit `final` fields. Libraries use non-final ids so the application
    /// can renumber them.
    pub final_ids: bool,
}

impl Default for JavaOptions {
    fn default() -> Self {
        Self {
            class_name: DEFAULT_CLASS_NAME.to_string(),
            final_ids: false,
        }
    }
}

/// Render the source of `table` as a Java class
#[must_use]
pub fn render_java(table: &SymbolTable, options: &JavaOptions) -> String {
    let modifiers = if options.final_ids {
        "public static final"
    } else {
        "public static"
    };

    let mut out = String::from(HEADER);
    if !table.package().is_empty() {
        let _ = writeln!(out, "package {};", table.package());
    }
    out.push('\n');
    let _ = writeln!(out, "public final class {} {{", options.class_name);

    for resource_type in ResourceType::ALL {
        let mut symbols = table.symbols_of_type(resource_type);
        if symbols.is_empty() {
            continue;
        }
        symbols.sort_by(|a, b| a.name().cmp(b.name()));

        let _ = writeln!(out, "    public static final class {resource_type} {{");
        for symbol in symbols {
            let _ = writeln!(
                out,
                "        {modifiers} {} {} = {};",
                symbol.value_type(),
                symbol.name(),
                symbol.value()
            );
        }
        out.push_str("    }\n");
    }

    out.push_str("}\n");
    out
}

/// Path of the generated source for `package` under `dir`
#[must_use]
pub fn source_path(dir: &Path, package: &str, options: &JavaOptions) -> PathBuf {
    let mut path = dir.to_path_buf();
    for segment in package.split('.').filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    path.push(format!("{}.java", options.class_name));
    path
}

/// Write the source of `table` under `dir`, creating package directories
///
/// Returns the path of the written file.
///
/// # Errors
/// Returns error if directories or the file cannot be written
pub fn export_to_java(
    table: &SymbolTable,
    dir: &Path,
    options: &JavaOptions,
) -> Result<PathBuf, GenerateError> {
    let path = source_path(dir, table.package(), options);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| GenerateError::io_error(parent, e))?;
    }
    fs::write(&path, render_java(table, options)).map_err(|e| GenerateError::io_error(&path, e))?;

    tracing::debug!("Generated {} with {} symbols", path.display(), table.len());
    Ok(path)
}

/// Write one source per dependency package, with values from `merged`
///
/// Dependencies sharing a package are exported once, with the union of
/// their keys. Returns the written paths in package order.
///
/// # Errors
/// Returns error if a package is invalid or a file cannot be written
pub fn generate_dependency_sources(
    merged: &SymbolTable,
    dependencies: &[SymbolTable],
    dir: &Path,
    options: &JavaOptions,
) -> Result<Vec<PathBuf>, GenerateError> {
    let mut by_package: BTreeMap<&str, HashSet<SymbolKey>> = BTreeMap::new();
    for dependency in dependencies {
        by_package
            .entry(dependency.package())
            .or_default()
            .extend(dependency.keys().cloned());
    }

    let mut written = Vec::with_capacity(by_package.len());
    for (package, keys) in by_package {
        let mut builder = SymbolTable::builder().package(package);
        for symbol in merged.symbols().filter(|s| keys.contains(&s.key())) {
            builder.add(Symbol::clone(symbol))?;
        }
        written.push(export_to_java(&builder.build()?, dir, options)?);
    }

    tracing::info!("Generated {} dependency sources", written.len());
    Ok(written)
}
