//! Shrinker keep rules
//!
//! Classes the framework instantiates by reflection must survive code
//! shrinking: manifest components and custom views referenced from layouts.

use crate::error::ScanError;
use crate::manifest::ManifestData;
use crate::xml::{parse_document, Element};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// First line of every generated rules file
pub const KEEP_RULES_HEADER: &str = "# Generated by resgen";

/// Keep rule for `class_name`
#[must_use]
pub fn keep_rule(class_name: &str) -> String {
    format!("-keep class {class_name} {{ <init>(...); }}")
}

/// Keep rules for the components of `manifest`, in declaration order
///
/// With `main_dex`, components running in a private process (`:name`) are
/// left out.
#[must_use]
pub fn generate_keep_rules(manifest: &ManifestData, main_dex: bool) -> Vec<String> {
    let mut rules = vec![KEEP_RULES_HEADER.to_string()];
    for component in &manifest.components {
        let private = manifest
            .effective_process(component)
            .is_some_and(|p| p.starts_with(':'));
        if main_dex && private {
            continue;
        }
        rules.push(keep_rule(&component.class_name));
    }
    rules
}

/// Add a keep rule for every custom view tag in a layout
///
/// A tag naming a class (containing `.`) is instantiated by reflection.
pub fn keep_rules_from_layout(root: &Element, rules: &mut BTreeSet<String>) {
    root.walk(&mut |element| {
        if element.qualified_name().contains('.') {
            rules.insert(keep_rule(element.qualified_name()));
        }
    });
}

/// [`keep_rules_from_layout`] over every `.xml` file of `dir`
///
/// # Errors
/// Returns error naming the file if one cannot be read or parsed
pub fn keep_rules_from_layout_dir(dir: &Path, rules: &mut BTreeSet<String>) -> Result<(), ScanError> {
    let entries = fs::read_dir(dir).map_err(|e| ScanError::io_error(dir, e))?;
    let mut files = entries
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ScanError::io_error(dir, e))?;
    files.retain(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "xml"));
    files.sort();

    for file in files {
        let content = fs::read_to_string(&file).map_err(|e| ScanError::io_error(&file, e))?;
        let root = parse_document(&content).map_err(|source| ScanError::Xml {
            path: file.clone(),
            source,
        })?;
        keep_rules_from_layout(&root, rules);
    }
    Ok(())
}
