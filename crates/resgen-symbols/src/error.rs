//! Error types for resource symbol processing
//!
//! Provides error handling for:
//! - Symbol and table construction (invalid fields, duplicate keys)
//! - XML documents (well-formedness) and resource values documents
//! - Resource directory scans
//! - Symbol file I/O and source generation
//! - Manifest reading

use crate::resource_type::ResourceType;
use std::path::PathBuf;

/// Errors building symbols and symbol tables
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SymbolError {
    /// A symbol field failed validation
    #[error("invalid symbol {resource_type}/{name}: {reason}")]
    InvalidSymbol {
        /// Type of the offending symbol
        resource_type: ResourceType,
        /// Name of the offending symbol
        name: String,
        /// Violated rule
        reason: String,
    },

    /// Strict insertion of a key that is already present
    #[error("duplicate symbol: {resource_type}/{name}")]
    Duplicate {
        /// Type of the offending symbol
        resource_type: ResourceType,
        /// Name of the offending symbol
        name: String,
    },

    /// Package name is not a dot-separated list of identifiers
    #[error("invalid table package: '{0}'")]
    InvalidPackage(String),

    /// Every 16-bit sequence number of the type is already allocated
    #[error("no ids left for resource type {0}")]
    IdsExhausted(ResourceType),
}

impl SymbolError {
    /// Create invalid symbol error
    pub fn invalid(
        resource_type: ResourceType,
        name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidSymbol {
            resource_type,
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Malformed XML input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum XmlError {
    /// Tokenizer or attribute error reported by quick-xml
    #[error("malformed XML at byte {position}: {message}")]
    Malformed {
        /// Byte offset in the input
        position: u64,
        /// Parser message
        message: String,
    },

    /// Document has no root element
    #[error("document has no root element")]
    NoRoot,

    /// Element left open at end of input
    #[error("unexpected end of document inside <{0}>")]
    UnexpectedEof(String),

    /// Content after the root element closed
    #[error("unexpected element <{0}> after the root element")]
    TrailingElement(String),
}

/// Errors interpreting a resource values document
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValuesError {
    /// Root is not a no-namespace `resources` element
    #[error("resource values root element must be <resources>, found <{0}>")]
    InvalidRoot(String),

    /// Element with no handler
    #[error("Unknown resource value XML element '{0}'")]
    UnknownElement(String),

    /// `item` whose `type` names no resource kind
    #[error("Unknown resource value XML item type '{0}'")]
    UnknownItemType(String),

    /// Required attribute absent
    #[error("element <{element}> is missing required attribute '{attribute}'")]
    MissingAttribute {
        /// Element tag
        element: String,
        /// Attribute name
        attribute: String,
    },

    /// Something other than an attribute declared inside a styleable
    #[error("Illegal type under declare-styleable: was <{0}>, only accepted is <attr>")]
    IllegalStyleableChild(String),

    /// Symbol construction failed
    #[error(transparent)]
    Symbol(#[from] SymbolError),
}

impl ValuesError {
    /// Create missing attribute error
    pub fn missing_attribute(element: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
        }
    }
}

/// Errors scanning a resource directory tree
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Top-level entry that is not a directory
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),

    /// Entry that is neither a file nor a directory
    #[error("{0} is not a file or directory")]
    NotAFile(PathBuf),

    /// File name does not follow the resource file naming rules
    #[error("invalid resource file name: {0}")]
    InvalidFileName(PathBuf),

    /// Directory prefix is not a known resource type
    #[error("unknown resource type directory: {0}")]
    UnknownResourceType(PathBuf),

    /// IO error listing or reading
    #[error("io error reading {path}: {source}")]
    Io {
        /// Offending file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File is not well-formed XML
    #[error("failed to parse {path}: {source}")]
    Xml {
        /// Offending file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: XmlError,
    },

    /// File is well-formed XML but not a valid values document
    #[error("failed to parse {path}: {source}")]
    Values {
        /// Offending file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: ValuesError,
    },

    /// Symbol construction failed
    #[error(transparent)]
    Symbol(#[from] SymbolError),
}

impl ScanError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors reading or writing symbol files
#[derive(Debug, thiserror::Error)]
pub enum SymbolIoError {
    /// Line that does not follow `<type> <class> <name> <value>`
    #[error("File format error reading {path} line {line}: '{content}': {reason}")]
    Format {
        /// Offending file
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// Line as read
        content: String,
        /// Violated rule
        reason: String,
    },

    /// Package-prefixed file with no package line
    #[error("symbol file with package cannot be empty: {0}")]
    MissingPackage(PathBuf),

    /// IO error during read or write
    #[error("io error on {path}: {source}")]
    Io {
        /// Offending file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Line parsed but symbol invalid
    #[error("invalid symbol in {path}: {source}")]
    Symbol {
        /// Offending file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: SymbolError,
    },
}

impl SymbolIoError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors generating source files
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// IO error creating directories or writing the source
    #[error("io error writing {path}: {source}")]
    Io {
        /// Offending file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Symbol table could not be assembled for a package
    #[error(transparent)]
    Symbol(#[from] SymbolError),
}

impl GenerateError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors reading a manifest
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ManifestError {
    /// Manifest is not well-formed
    #[error("malformed manifest: {0}")]
    Xml(#[from] XmlError),

    /// Root element is not `manifest`
    #[error("manifest root element must be <manifest>, found <{0}>")]
    InvalidRoot(String),

    /// No package attribute on the root
    #[error("manifest does not declare a package")]
    MissingPackage,
}

/// Combined error for the whole pipeline
#[derive(Debug, thiserror::Error)]
pub enum ResgenError {
    /// Symbol or table construction failed
    #[error("symbol error: {0}")]
    Symbol(#[from] SymbolError),

    /// XML was not well-formed
    #[error("xml error: {0}")]
    Xml(#[from] XmlError),

    /// Values document was invalid
    #[error("values error: {0}")]
    Values(#[from] ValuesError),

    /// Resource directory scan failed
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

    /// Symbol file could not be read or written
    #[error("symbol file error: {0}")]
    SymbolIo(#[from] SymbolIoError),

    /// Source generation failed
    #[error("generate error: {0}")]
    Generate(#[from] GenerateError),

    /// Manifest could not be read
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),
}

/// Result type alias for resgen operations
pub type ResgenResult<T> = Result<T, ResgenError>;
