//! Symbol - the identity record of one resource
//!
//! Provides [`Symbol`] (resource type, name, value type, value and, for
//! styleable arrays, the ordered attribute names) plus the name helpers
//! shared by the scanners.

use crate::error::SymbolError;
use crate::resource_type::{ResourceType, ValueType};
use std::fmt::{self, Display, Formatter};

/// Namespace prefix of platform attributes in styleable children
pub const ANDROID_NS_PREFIX: &str = "android:";

/// Canonical form of [`ANDROID_NS_PREFIX`] inside symbol names
pub const ANDROID_NAME_PREFIX: &str = "android_";

/// One resource symbol
///
/// Immutable once created. Equality compares every field, including the
/// order of `children`.
///
/// # Example
/// ```
/// use resgen_symbols::{ResourceType, Symbol, ValueType};
///
/// let symbol = Symbol::new(ResourceType::String, "app_name", ValueType::Int, "0x7f140001")?;
/// assert_eq!(symbol.to_string(), "int string app_name 0x7f140001");
/// # Ok::<(), resgen_symbols::SymbolError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    resource_type: ResourceType,
    name: String,
    value_type: ValueType,
    value: String,
    children: Vec<String>,
}

impl Symbol {
    /// Create a symbol without children
    ///
    /// # Errors
    /// Returns error if a field violates the symbol invariants
    pub fn new(
        resource_type: ResourceType,
        name: impl Into<String>,
        value_type: ValueType,
        value: impl Into<String>,
    ) -> Result<Self, SymbolError> {
        Self::with_children(resource_type, name, value_type, value, Vec::new())
    }

    /// Create a symbol with styleable children
    ///
    /// # Errors
    /// Returns error if a field violates the symbol invariants, or if
    /// children are given for anything but a `styleable` `int[]`
    pub fn with_children(
        resource_type: ResourceType,
        name: impl Into<String>,
        value_type: ValueType,
        value: impl Into<String>,
        children: Vec<String>,
    ) -> Result<Self, SymbolError> {
        let name = name.into();
        let value = value.into();

        if name.is_empty() {
            return Err(SymbolError::invalid(resource_type, name, "empty name"));
        }
        if name.chars().any(char::is_whitespace) {
            return Err(SymbolError::invalid(resource_type, name, "name contains whitespace"));
        }
        if value.is_empty() {
            return Err(SymbolError::invalid(resource_type, name, "empty value"));
        }
        if value.contains(['\n', '\r']) {
            return Err(SymbolError::invalid(resource_type, name, "value contains a line break"));
        }
        if value_type == ValueType::IntList && resource_type != ResourceType::Styleable {
            return Err(SymbolError::invalid(
                resource_type,
                name,
                "only styleable symbols may be int[]",
            ));
        }
        if !children.is_empty() && value_type != ValueType::IntList {
            return Err(SymbolError::invalid(
                resource_type,
                name,
                "only int[] symbols may have children",
            ));
        }

        Ok(Self {
            resource_type,
            name,
            value_type,
            value,
            children,
        })
    }

    /// Create an `int` symbol
    ///
    /// # Errors
    /// Returns error if name or value are invalid
    #[inline]
    pub fn int(
        resource_type: ResourceType,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, SymbolError> {
        Self::new(resource_type, name, ValueType::Int, value)
    }

    /// Create a styleable array whose value is the braced list of `values`
    ///
    /// # Errors
    /// Returns error if the name is invalid
    pub fn styleable(
        name: impl Into<String>,
        values: &[String],
        children: Vec<String>,
    ) -> Result<Self, SymbolError> {
        let value = format!("{{{}}}", values.join(","));
        Self::with_children(ResourceType::Styleable, name, ValueType::IntList, value, children)
    }

    /// Resource type
    #[inline]
    #[must_use]
    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    /// Symbol name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value type
    #[inline]
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Value as written in symbol files
    #[inline]
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Attribute names of a styleable array, in order
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[String] {
        &self.children
    }

    /// Table key
    #[inline]
    #[must_use]
    pub fn key(&self) -> SymbolKey {
        SymbolKey::new(self.resource_type, self.name.clone())
    }

    /// Whether this is a styleable `int[]`
    #[inline]
    #[must_use]
    pub fn is_styleable_array(&self) -> bool {
        self.resource_type == ResourceType::Styleable && self.value_type == ValueType::IntList
    }

    /// Whether this is a styleable `int` (an attribute entry of an array)
    #[inline]
    #[must_use]
    pub fn is_styleable_member(&self) -> bool {
        self.resource_type == ResourceType::Styleable && self.value_type == ValueType::Int
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.value_type, self.resource_type, self.name, self.value
        )
    }
}

/// `(resource type, name)` key of a symbol table entry
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolKey {
    /// Resource type
    pub resource_type: ResourceType,

    /// Symbol name
    pub name: String,
}

impl SymbolKey {
    /// Create key
    #[inline]
    #[must_use]
    pub fn new(resource_type: ResourceType, name: impl Into<String>) -> Self {
        Self {
            resource_type,
            name: name.into(),
        }
    }
}

impl Display for SymbolKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.resource_type, self.name)
    }
}

/// Replace characters that cannot appear in a field name with `_`
///
/// Resource names declared in XML may contain `.`, `:` and `-`
/// (`Theme.AppCompat`, `android:textColor`).
#[must_use]
pub fn canonicalize_name(name: &str) -> String {
    name.replace(['.', ':', '-'], "_")
}

/// Member symbol name for attribute `attr` of styleable `styleable`
#[must_use]
pub fn styleable_member_name(styleable: &str, attr: &str) -> String {
    format!("{styleable}_{}", canonicalize_name(attr))
}

/// Attribute name recovered from the suffix of a member symbol name
///
/// `android_foo` maps back to `android:foo`.
#[must_use]
pub fn attr_from_member_suffix(suffix: &str) -> String {
    match suffix.strip_prefix(ANDROID_NAME_PREFIX) {
        Some(rest) if !rest.is_empty() => format!("{ANDROID_NS_PREFIX}{rest}"),
        _ => suffix.to_string(),
    }
}
