//! resgen symbols
//!
//! Resource symbol tables for Android library modules.
//!
//! # Overview
//!
//! The crate provides:
//! - **IdAllocator**: per-type sequential resource ids (`0x7fTTNNNN`)
//! - **SymbolTable**: key-deduplicated symbols with a package identity
//! - **Scanners**: resource directories, values documents, inline `@+id/`
//! - **Merge**: union of a module and its dependencies, renumbered
//! - **I/O**: `R.txt` read/write, `R.java` generation, keep rules
//!
//! All operations are synchronous. An allocator is owned by one scan or
//! merge and passed explicitly.
//!
//! # Example
//!
//! ```rust
//! use resgen_symbols::{io, parse_document, parse_values, IdAllocator, ResourceType};
//!
//! let root = parse_document(r#"
//!     <resources>
//!         <attr name="tint"/>
//!         <declare-styleable name="Badge"><attr name="tint"/></declare-styleable>
//!     </resources>"#)?;
//! let table = parse_values(&root, &mut IdAllocator::new())?;
//!
//! assert_eq!(table.get(ResourceType::Styleable, "Badge").unwrap().children(), &["tint"]);
//! assert!(io::render(&table).starts_with("int attr tint 0x7f040001\n"));
//! # Ok::<(), resgen_symbols::ResgenError>(())
//! ```

#![warn(missing_docs)]

pub mod directory;
pub mod error;
pub mod id;
pub mod inline;
pub mod io;
pub mod java;
pub mod keep_rules;
pub mod manifest;
pub mod merge;
pub mod resource_type;
pub mod styleable;
pub mod symbol;
pub mod table;
pub mod values;
pub mod xml;

// Re-exports
pub use directory::{scan_resource_dir, scan_resource_dir_into};
pub use error::{
    GenerateError, ManifestError, ResgenError, ResgenResult, ScanError, SymbolError, SymbolIoError,
    ValuesError, XmlError,
};
pub use id::{format_id, IdAllocator, PACKAGE_ID};
pub use inline::{collect_inline_ids, parse_inline_ids};
pub use java::{export_to_java, generate_dependency_sources, render_java, JavaOptions};
pub use keep_rules::{generate_keep_rules, keep_rules_from_layout, keep_rules_from_layout_dir};
pub use manifest::{Component, ManifestData};
pub use merge::merge_and_renumber;
pub use resource_type::{ResourceType, ValueType};
pub use symbol::{canonicalize_name, Symbol, SymbolKey};
pub use table::{SymbolTable, SymbolTableBuilder};
pub use values::{parse_values, ValuesParser};
pub use xml::{parse_document, Element};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for symbol processing
    pub use crate::{
        IdAllocator, JavaOptions, ResgenError, ResgenResult, ResourceType, Symbol, SymbolKey,
        SymbolTable, SymbolTableBuilder, ValueType,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
