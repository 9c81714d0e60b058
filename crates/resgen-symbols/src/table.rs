//! Symbol tables
//!
//! Provides [`SymbolTable`], an immutable key-deduplicated collection of
//! [`Symbol`]s with a package identity, and [`SymbolTableBuilder`] with its
//! two insertion policies:
//! - [`SymbolTableBuilder::add`] rejects a key that is already present
//! - [`SymbolTableBuilder::add_if_absent`] silently keeps the first symbol

use crate::error::SymbolError;
use crate::resource_type::ResourceType;
use crate::symbol::{Symbol, SymbolKey};
use indexmap::IndexMap;

/// Immutable symbol table
///
/// Iteration follows insertion order. Equality ignores order but compares
/// the package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    package: String,
    symbols: IndexMap<SymbolKey, Symbol>,
}

impl SymbolTable {
    /// Start building a table
    #[inline]
    #[must_use]
    pub fn builder() -> SymbolTableBuilder {
        SymbolTableBuilder::new()
    }

    /// Empty table with no package
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Package identity (may be empty)
    #[inline]
    #[must_use]
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Number of symbols
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the table has no symbols
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Lookup by key parts
    #[must_use]
    pub fn get(&self, resource_type: ResourceType, name: &str) -> Option<&Symbol> {
        self.symbols.get(&SymbolKey::new(resource_type, name))
    }

    /// Whether `key` is present
    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: &SymbolKey) -> bool {
        self.symbols.contains_key(key)
    }

    /// Whether a symbol with this type and name is present
    #[must_use]
    pub fn contains(&self, resource_type: ResourceType, name: &str) -> bool {
        self.get(resource_type, name).is_some()
    }

    /// All symbols in insertion order
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    /// All keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &SymbolKey> {
        self.symbols.keys()
    }

    /// Symbols of one type, in insertion order
    #[must_use]
    pub fn symbols_of_type(&self, resource_type: ResourceType) -> Vec<&Symbol> {
        self.symbols
            .values()
            .filter(|s| s.resource_type() == resource_type)
            .collect()
    }

    /// Resource types present in the table, in type order
    #[must_use]
    pub fn resource_types(&self) -> Vec<ResourceType> {
        ResourceType::ALL
            .iter()
            .copied()
            .filter(|t| self.symbols.keys().any(|k| k.resource_type == *t))
            .collect()
    }

    /// Keep only the symbols whose key is also in `other`
    ///
    /// Values and package come from `self`.
    #[must_use]
    pub fn filter(&self, other: &SymbolTable) -> SymbolTable {
        let symbols = self
            .symbols
            .iter()
            .filter(|(key, _)| other.contains_key(key))
            .map(|(key, symbol)| (key.clone(), symbol.clone()))
            .collect();

        Self {
            package: self.package.clone(),
            symbols,
        }
    }

    /// Combine tables in priority order
    ///
    /// Earlier tables win on key collisions. The package is the first
    /// table's, or empty if there are no tables.
    #[must_use]
    pub fn merge<'a>(tables: impl IntoIterator<Item = &'a SymbolTable>) -> SymbolTable {
        let mut package = None;
        let mut symbols: IndexMap<SymbolKey, Symbol> = IndexMap::new();

        for table in tables {
            if package.is_none() {
                package = Some(table.package.clone());
            }
            for (key, symbol) in &table.symbols {
                symbols
                    .entry(key.clone())
                    .or_insert_with(|| symbol.clone());
            }
        }

        Self {
            package: package.unwrap_or_default(),
            symbols,
        }
    }

    /// Same symbols under a different package
    ///
    /// # Errors
    /// Returns error if `package` is not a valid package name
    pub fn rename(&self, package: impl Into<String>) -> Result<SymbolTable, SymbolError> {
        let package = package.into();
        validate_package(&package)?;
        Ok(Self {
            package,
            symbols: self.symbols.clone(),
        })
    }

    /// Whether both tables hold equal symbols, ignoring packages
    #[must_use]
    pub fn same_symbols(&self, other: &SymbolTable) -> bool {
        self.symbols == other.symbols
    }
}

impl<'a> IntoIterator for &'a SymbolTable {
    type Item = &'a Symbol;
    type IntoIter = indexmap::map::Values<'a, SymbolKey, Symbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.symbols.values()
    }
}

/// Builder for [`SymbolTable`]
///
/// Usage:
/// ```
/// use resgen_symbols::{ResourceType, Symbol, SymbolTable};
///
/// let mut builder = SymbolTable::builder().package("com.example.lib");
/// builder.add(Symbol::int(ResourceType::String, "app_name", "0x7f140001")?)?;
/// let first = builder.add_if_absent(Symbol::int(ResourceType::String, "app_name", "0x7f140002")?);
/// assert!(!first);
/// let table = builder.build()?;
/// assert_eq!(table.get(ResourceType::String, "app_name").unwrap().value(), "0x7f140001");
/// # Ok::<(), resgen_symbols::SymbolError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct SymbolTableBuilder {
    package: String,
    symbols: IndexMap<SymbolKey, Symbol>,
}

impl SymbolTableBuilder {
    /// Create empty builder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the table package
    #[inline]
    #[must_use]
    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    /// Set the table package in place
    #[inline]
    pub fn set_package(&mut self, package: impl Into<String>) {
        self.package = package.into();
    }

    /// Insert a symbol, rejecting duplicate keys
    ///
    /// # Errors
    /// Returns [`SymbolError::Duplicate`] if the key is already present
    pub fn add(&mut self, symbol: Symbol) -> Result<&mut Self, SymbolError> {
        let key = symbol.key();
        if self.symbols.contains_key(&key) {
            return Err(SymbolError::Duplicate {
                resource_type: key.resource_type,
                name: key.name,
            });
        }
        self.symbols.insert(key, symbol);
        Ok(self)
    }

    /// Insert a symbol unless its key is already present
    ///
    /// Returns `true` if the symbol was inserted.
    pub fn add_if_absent(&mut self, symbol: Symbol) -> bool {
        let key = symbol.key();
        if self.symbols.contains_key(&key) {
            return false;
        }
        self.symbols.insert(key, symbol);
        true
    }

    /// Insert or overwrite, keeping the original position of an existing key
    pub(crate) fn replace(&mut self, symbol: Symbol) {
        self.symbols.insert(symbol.key(), symbol);
    }

    /// Whether `key` is present
    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: &SymbolKey) -> bool {
        self.symbols.contains_key(key)
    }

    /// Number of symbols added so far
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether nothing was added yet
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Finish the table
    ///
    /// # Errors
    /// Returns error if the package name is invalid
    pub fn build(self) -> Result<SymbolTable, SymbolError> {
        validate_package(&self.package)?;
        Ok(SymbolTable {
            package: self.package,
            symbols: self.symbols,
        })
    }
}

/// Check that `package` is empty or dot-separated identifiers
///
/// # Errors
/// Returns [`SymbolError::InvalidPackage`] otherwise
pub fn validate_package(package: &str) -> Result<(), SymbolError> {
    if package.is_empty() {
        return Ok(());
    }

    let valid = package.split('.').all(|segment| {
        let mut chars = segment.chars();
        match chars.next() {
            Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {
                chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
            }
            _ => false,
        }
    });

    if valid {
        Ok(())
    } else {
        Err(SymbolError::InvalidPackage(package.to_string()))
    }
}
