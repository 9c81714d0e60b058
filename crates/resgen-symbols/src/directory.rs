//! Resource directory scanning
//!
//! A resource directory holds one level of `<type>[-qualifier]*`
//! directories. `values*` directories contain values documents; every
//! other directory contributes one symbol per file, plus the inline ids of
//! its XML files.
//!
//! Directories and files are visited in lexicographic order and symbols are
//! added first-wins, so a scan is deterministic for a given tree.

use crate::error::ScanError;
use crate::id::IdAllocator;
use crate::inline::collect_inline_ids;
use crate::resource_type::ResourceType;
use crate::symbol::Symbol;
use crate::table::{SymbolTable, SymbolTableBuilder};
use crate::values::ValuesParser;
use crate::xml::{parse_document, Element};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Pseudo-type of directories holding values documents
pub const VALUES_DIR: &str = "values";

static FILE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9_]+(\.[^.]+)?$").expect("file name pattern is valid"));

/// Scan `res_dir` into a new table
///
/// # Errors
/// Returns error naming the offending path if the tree does not follow the
/// resource directory layout or a file cannot be read or parsed
pub fn scan_resource_dir(res_dir: &Path, ids: &mut IdAllocator) -> Result<SymbolTable, ScanError> {
    let mut builder = SymbolTable::builder();
    scan_resource_dir_into(res_dir, ids, &mut builder)?;
    Ok(builder.build()?)
}

/// Scan `res_dir`, adding symbols to `builder`
///
/// # Errors
/// See [`scan_resource_dir`]
pub fn scan_resource_dir_into(
    res_dir: &Path,
    ids: &mut IdAllocator,
    builder: &mut SymbolTableBuilder,
) -> Result<(), ScanError> {
    let before = builder.len();
    let mut values = ValuesParser::new();

    for dir in sorted_entries(res_dir)? {
        if !dir.is_dir() {
            return Err(ScanError::NotADirectory(dir));
        }

        let dir_name = file_name(&dir).ok_or_else(|| ScanError::UnknownResourceType(dir.clone()))?;
        let pseudo_type = dir_name.split('-').next().unwrap_or_default();
        tracing::debug!("Scanning {} as {}", dir.display(), pseudo_type);

        if pseudo_type == VALUES_DIR {
            scan_values_dir(&dir, &mut values, ids, builder)?;
            continue;
        }

        let resource_type = ResourceType::from_name(pseudo_type)
            .ok_or_else(|| ScanError::UnknownResourceType(dir.clone()))?;
        scan_file_dir(&dir, resource_type, ids, builder)?;
    }

    tracing::info!(
        "Scanned {}: {} symbols",
        res_dir.display(),
        builder.len() - before
    );
    Ok(())
}

fn scan_values_dir(
    dir: &Path,
    values: &mut ValuesParser,
    ids: &mut IdAllocator,
    builder: &mut SymbolTableBuilder,
) -> Result<(), ScanError> {
    for file in resource_files(dir)? {
        tracing::debug!("Parsing values file {}", file.display());
        let root = read_xml(&file)?;
        values
            .parse(&root, ids, builder)
            .map_err(|source| ScanError::Values { path: file, source })?;
    }
    Ok(())
}

fn scan_file_dir(
    dir: &Path,
    resource_type: ResourceType,
    ids: &mut IdAllocator,
    builder: &mut SymbolTableBuilder,
) -> Result<(), ScanError> {
    for file in resource_files(dir)? {
        let name = file_name(&file)
            .filter(|n| FILE_NAME.is_match(n))
            .ok_or_else(|| ScanError::InvalidFileName(file.clone()))?;
        let (stem, extension) = match name.split_once('.') {
            Some((stem, extension)) => (stem, Some(extension)),
            None => (name, None),
        };

        let symbol = Symbol::int(resource_type, stem, ids.next(resource_type)?)?;
        if !builder.add_if_absent(symbol) {
            tracing::debug!("Skipping duplicate {}/{} from {}", resource_type, stem, file.display());
        }

        if extension == Some("xml") && !resource_type.is_opaque() {
            let root = read_xml(&file)?;
            let inline = collect_inline_ids(&root, ids, builder)?;
            if inline > 0 {
                tracing::debug!("{} inline ids in {}", inline, file.display());
            }
        }
    }
    Ok(())
}

/// Regular files of `dir` in lexicographic order; subdirectories are skipped
fn resource_files(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut files = Vec::new();
    for path in sorted_entries(dir)? {
        if path.is_dir() {
            continue;
        }
        if !path.is_file() {
            return Err(ScanError::NotAFile(path));
        }
        files.push(path);
    }
    Ok(files)
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let entries = fs::read_dir(dir).map_err(|e| ScanError::io_error(dir, e))?;
    let mut paths = entries
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ScanError::io_error(dir, e))?;
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

fn read_xml(path: &Path) -> Result<Element, ScanError> {
    let content = fs::read_to_string(path).map_err(|e| ScanError::io_error(path, e))?;
    parse_document(&content).map_err(|source| ScanError::Xml {
        path: path.to_path_buf(),
        source,
    })
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}
