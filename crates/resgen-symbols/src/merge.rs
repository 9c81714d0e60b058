//! Dependency merge and renumbering
//!
//! Combines a module's table with its dependencies' tables and assigns a
//! fresh, self-consistent set of ids. Values already present in the inputs
//! (including ids published by dependencies) are never consulted: only the
//! keys and the attribute lists of styleables survive.

use crate::error::SymbolError;
use crate::id::IdAllocator;
use crate::resource_type::ResourceType;
use crate::styleable::StyleableOwners;
use crate::symbol::{attr_from_member_suffix, styleable_member_name, Symbol, ANDROID_NS_PREFIX};
use crate::table::SymbolTable;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Merge `table` with `dependencies` and renumber everything
///
/// - Non-styleable names are grouped by type, sorted, and numbered in
///   [`ResourceType`] order.
/// - Styleables are grouped by array name. A group lists the union of its
///   arrays' children and of the attributes named by its member symbols,
///   sorted. Platform attributes (`android:`) take their value from
///   `platform`, the rest from the freshly numbered `attr` symbols; names
///   that resolve nowhere are dropped.
/// - Each group emits its `int[]` array and one member per resolved
///   attribute. Arrays are emitted first; a member whose name equals an
///   array name is dropped.
///
/// The result carries `package`.
///
/// # Errors
/// Returns error if `package` is invalid
///
/// # Example
/// ```
/// use resgen_symbols::{merge_and_renumber, IdAllocator, ResourceType, Symbol, SymbolTable};
///
/// let mut dep = SymbolTable::builder().package("com.lib");
/// dep.add(Symbol::int(ResourceType::Attr, "foo", "0x7f040099")?)?;
/// let dep = dep.build()?;
///
/// let merged = merge_and_renumber(
///     &SymbolTable::empty(),
///     &[dep.clone(), dep],
///     &SymbolTable::empty(),
///     "com.app",
///     &mut IdAllocator::new(),
/// )?;
/// assert_eq!(merged.len(), 1);
/// assert_eq!(merged.get(ResourceType::Attr, "foo").unwrap().value(), "0x7f040001");
/// # Ok::<(), resgen_symbols::SymbolError>(())
/// ```
pub fn merge_and_renumber(
    table: &SymbolTable,
    dependencies: &[SymbolTable],
    platform: &SymbolTable,
    package: &str,
    ids: &mut IdAllocator,
) -> Result<SymbolTable, SymbolError> {
    let mut names: BTreeMap<ResourceType, BTreeSet<&str>> = BTreeMap::new();
    let mut groups: BTreeMap<&str, BTreeSet<String>> = BTreeMap::new();
    let mut members: Vec<&str> = Vec::new();

    for symbol in std::iter::once(table).chain(dependencies).flat_map(SymbolTable::symbols) {
        if symbol.is_styleable_array() {
            groups
                .entry(symbol.name())
                .or_default()
                .extend(symbol.children().iter().cloned());
        } else if symbol.is_styleable_member() {
            members.push(symbol.name());
        } else {
            names
                .entry(symbol.resource_type())
                .or_default()
                .insert(symbol.name());
        }
    }

    let owners = StyleableOwners::new(groups.keys().copied());
    for member in members {
        match owners.owner(member) {
            Some((array, suffix)) => {
                if let Some(attrs) = groups.get_mut(array) {
                    attrs.insert(attr_from_member_suffix(suffix));
                }
            }
            None => tracing::debug!("Dropping styleable {} with no owning array", member),
        }
    }

    let mut builder = SymbolTable::builder().package(package);
    let mut attrs: HashMap<&str, String> = HashMap::new();

    for (resource_type, type_names) in &names {
        for name in type_names {
            let value = ids.next(*resource_type)?;
            if *resource_type == ResourceType::Attr {
                attrs.insert(name, value.clone());
            }
            builder.add(Symbol::int(*resource_type, *name, value)?)?;
        }
    }

    let mut pending_members = Vec::new();
    for (array, attr_names) in &groups {
        let mut resolved = Vec::new();
        let mut values = Vec::new();

        for attr in attr_names {
            let value = match attr.strip_prefix(ANDROID_NS_PREFIX) {
                Some(platform_name) => platform
                    .get(ResourceType::Attr, platform_name)
                    .map(|s| s.value().to_string()),
                None => attrs.get(attr.as_str()).cloned(),
            };
            match value {
                Some(value) => {
                    resolved.push(attr.clone());
                    values.push(value);
                }
                None => tracing::warn!("Dropping unresolved attribute {} of styleable {}", attr, array),
            }
        }

        let member_symbols = resolved
            .iter()
            .zip(&values)
            .map(|(attr, value)| {
                Symbol::int(ResourceType::Styleable, styleable_member_name(array, attr), value.clone())
            })
            .collect::<Result<Vec<_>, _>>()?;

        builder.add(Symbol::styleable(*array, &values, resolved)?)?;
        pending_members.extend(member_symbols);
    }

    // Members only after every array; a member never replaces an array.
    for member in pending_members {
        let key = member.key();
        if !builder.add_if_absent(member) {
            tracing::warn!("Dropping styleable member {}, key already emitted", key);
        }
    }

    let merged = builder.build()?;
    tracing::info!(
        "Merged {} dependencies into {} symbols for {}",
        dependencies.len(),
        merged.len(),
        package
    );
    Ok(merged)
}
