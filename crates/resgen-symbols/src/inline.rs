//! Inline `@+id/` declarations
//!
//! Layouts, menus and other XML resources may declare ids in any attribute
//! value (`android:id="@+id/fab"`). The scanner walks the tree depth-first
//! and turns each one into an `id` symbol.

use crate::error::SymbolError;
use crate::id::IdAllocator;
use crate::resource_type::ResourceType;
use crate::symbol::{canonicalize_name, Symbol};
use crate::table::{SymbolTable, SymbolTableBuilder};
use crate::xml::Element;

/// Prefix of an inline id declaration
pub const NEW_ID_PREFIX: &str = "@+id/";

/// Add every inline id declared under `root` to `builder`
///
/// Returns the number of ids inserted. Names already present are skipped.
///
/// # Errors
/// Returns error if a declared name is not a valid symbol name
pub fn collect_inline_ids(
    root: &Element,
    ids: &mut IdAllocator,
    builder: &mut SymbolTableBuilder,
) -> Result<usize, SymbolError> {
    let mut inserted = 0;
    scan(root, ids, builder, &mut inserted)?;
    Ok(inserted)
}

/// Inline ids of one document as a table of their own
///
/// # Errors
/// Returns error if a declared name is not a valid symbol name
pub fn parse_inline_ids(root: &Element, ids: &mut IdAllocator) -> Result<SymbolTable, SymbolError> {
    let mut builder = SymbolTable::builder();
    collect_inline_ids(root, ids, &mut builder)?;
    builder.build()
}

fn scan(
    element: &Element,
    ids: &mut IdAllocator,
    builder: &mut SymbolTableBuilder,
    inserted: &mut usize,
) -> Result<(), SymbolError> {
    for attribute in element.attributes() {
        let Some(name) = attribute.value.strip_prefix(NEW_ID_PREFIX) else {
            continue;
        };
        let symbol = Symbol::int(ResourceType::Id, canonicalize_name(name), ids.next(ResourceType::Id)?)?;
        if builder.add_if_absent(symbol) {
            *inserted += 1;
        }
    }

    for child in element.children() {
        scan(child, ids, builder, inserted)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_document;

    fn scan_str(xml: &str) -> SymbolTable {
        parse_inline_ids(&parse_document(xml).unwrap(), &mut IdAllocator::new()).unwrap()
    }

    #[test]
    fn single_fab() {
        let table = scan_str(
            r#"<FrameLayout xmlns:android="http://schemas.android.com/apk/res/android">
                <Button android:id="@+id/fab"/>
            </FrameLayout>"#,
        );
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(ResourceType::Id, "fab").unwrap().value(), "0x7f0b0001");
    }

    #[test]
    fn depth_first_order_and_first_wins() {
        let table = scan_str(
            r#"<a x="@+id/outer">
                <b y="@+id/inner"><c z="@+id/deep"/></b>
                <d w="@+id/inner" v="@id/reference"/>
            </a>"#,
        );

        let names: Vec<&str> = table.symbols().map(Symbol::name).collect();
        assert_eq!(names, ["outer", "inner", "deep"]);
        assert_eq!(table.get(ResourceType::Id, "inner").unwrap().value(), "0x7f0b0002");
    }

    #[test]
    fn names_are_canonicalized() {
        let table = scan_str(r#"<a id="@+id/top.bar-item"/>"#);
        assert!(table.contains(ResourceType::Id, "top_bar_item"));
    }

    #[test]
    fn empty_name_is_rejected() {
        let root = parse_document(r#"<a id="@+id/"/>"#).unwrap();
        assert!(parse_inline_ids(&root, &mut IdAllocator::new()).is_err());
    }
}
