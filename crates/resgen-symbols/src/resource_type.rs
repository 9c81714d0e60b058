//! Resource and value type enumerations
//!
//! [`ResourceType`] is the fixed set of resource categories. Its declaration
//! order is the lexicographic order of the wire names, and the position in
//! that order is the type index packed into every allocated id.

use serde::Serialize;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Resource category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceType {
    /// Tween animations (`res/anim`)
    Anim,

    /// Property animations
    Animator,

    /// Typed, string and integer arrays
    Array,

    /// Attribute declarations
    Attr,

    /// Boolean values
    Bool,

    /// Colors and color state lists
    Color,

    /// Dimensions
    Dimen,

    /// Drawables, bitmap or XML
    Drawable,

    /// Fonts and font families
    Font,

    /// Fractions
    Fraction,

    /// Ids, declared in values or inline with `@+id/`
    Id,

    /// Integer values
    Integer,

    /// Animation interpolators
    Interpolator,

    /// Layouts
    Layout,

    /// Menus
    Menu,

    /// Launcher icons
    Mipmap,

    /// Navigation graphs
    Navigation,

    /// Quantity strings
    Plurals,

    /// Opaque files shipped as is
    Raw,

    /// Strings
    String,

    /// Styles and themes
    Style,

    /// Attribute sets of custom views (`declare-styleable`)
    Styleable,

    /// Scene transitions
    Transition,

    /// Arbitrary XML files
    Xml,
}

impl ResourceType {
    /// Every resource type, in type-index order
    pub const ALL: [ResourceType; 24] = [
        Self::Anim,
        Self::Animator,
        Self::Array,
        Self::Attr,
        Self::Bool,
        Self::Color,
        Self::Dimen,
        Self::Drawable,
        Self::Font,
        Self::Fraction,
        Self::Id,
        Self::Integer,
        Self::Interpolator,
        Self::Layout,
        Self::Menu,
        Self::Mipmap,
        Self::Navigation,
        Self::Plurals,
        Self::Raw,
        Self::String,
        Self::Style,
        Self::Styleable,
        Self::Transition,
        Self::Xml,
    ];

    /// Name used in symbol files, directories and generated sources
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Anim => "anim",
            Self::Animator => "animator",
            Self::Array => "array",
            Self::Attr => "attr",
            Self::Bool => "bool",
            Self::Color => "color",
            Self::Dimen => "dimen",
            Self::Drawable => "drawable",
            Self::Font => "font",
            Self::Fraction => "fraction",
            Self::Id => "id",
            Self::Integer => "integer",
            Self::Interpolator => "interpolator",
            Self::Layout => "layout",
            Self::Menu => "menu",
            Self::Mipmap => "mipmap",
            Self::Navigation => "navigation",
            Self::Plurals => "plurals",
            Self::Raw => "raw",
            Self::String => "string",
            Self::Style => "style",
            Self::Styleable => "styleable",
            Self::Transition => "transition",
            Self::Xml => "xml",
        }
    }

    /// 0-based position in [`ResourceType::ALL`]
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look up a type by its wire name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }

    /// Whether files of this type are opaque payloads, never read as XML
    #[inline]
    #[must_use]
    pub const fn is_opaque(self) -> bool {
        matches!(self, Self::Raw)
    }
}

impl Display for ResourceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResourceType {
    type Err = UnknownTypeName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownTypeName(s.to_string()))
    }
}

/// Value type of a symbol as written in symbol files and generated sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueType {
    /// Single id
    Int,

    /// List of ids (styleables)
    IntList,
}

impl ValueType {
    /// Wire name: `int` or `int[]`
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::IntList => "int[]",
        }
    }

    /// Look up a value type by its wire name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "int" => Some(Self::Int),
            "int[]" => Some(Self::IntList),
            _ => None,
        }
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValueType {
    type Err = UnknownTypeName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownTypeName(s.to_string()))
    }
}

/// Name that matches no resource or value type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown type name: '{0}'")]
pub struct UnknownTypeName(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_in_index_order() {
        for (i, t) in ResourceType::ALL.iter().enumerate() {
            assert_eq!(t.index(), i);
        }
    }

    #[test]
    fn declaration_order_is_lexicographic() {
        let names: Vec<&str> = ResourceType::ALL.iter().map(|t| t.name()).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn parse_names() {
        assert_eq!("styleable".parse::<ResourceType>().unwrap(), ResourceType::Styleable);
        assert_eq!("raw".parse::<ResourceType>().unwrap(), ResourceType::Raw);
        assert!("declare-styleable".parse::<ResourceType>().is_err());
        assert_eq!("int[]".parse::<ValueType>().unwrap(), ValueType::IntList);
        assert!("long".parse::<ValueType>().is_err());
    }

    #[test]
    fn display_uses_wire_name() {
        assert_eq!(ResourceType::Drawable.to_string(), "drawable");
        assert_eq!(ValueType::IntList.to_string(), "int[]");
    }
}
