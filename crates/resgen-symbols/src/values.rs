//! Resource values documents
//!
//! Turns a `<resources>` document into symbols. Child elements are
//! dispatched by local tag name through a static tag table; `item` resolves
//! its handler from the `type` attribute instead.
//!
//! Every declaration allocates a fresh id, even when its key is already
//! present and the symbol is skipped.

use crate::error::ValuesError;
use crate::id::IdAllocator;
use crate::resource_type::ResourceType;
use crate::symbol::{canonicalize_name, styleable_member_name, Symbol, SymbolKey, ANDROID_NS_PREFIX};
use crate::table::{SymbolTable, SymbolTableBuilder};
use crate::xml::Element;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// What to do with one element under `<resources>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Handler {
    /// Plain declaration of the given type
    Declare(ResourceType),
    /// `attr`, whose `enum` children become ids
    Attr,
    /// `declare-styleable`
    Styleable,
    /// Accepted and ignored
    Ignore,
}

static TAG_HANDLERS: Lazy<HashMap<&'static str, Handler>> = Lazy::new(|| {
    let mut handlers = HashMap::new();
    for resource_type in ResourceType::ALL {
        let handler = match resource_type {
            ResourceType::Attr => Handler::Attr,
            ResourceType::Styleable => continue,
            other => Handler::Declare(other),
        };
        handlers.insert(resource_type.name(), handler);
    }
    handlers.insert("declare-styleable", Handler::Styleable);
    handlers.insert("integer-array", Handler::Declare(ResourceType::Array));
    handlers.insert("string-array", Handler::Declare(ResourceType::Array));
    handlers.insert("public", Handler::Ignore);
    handlers.insert("eat-comment", Handler::Ignore);
    handlers.insert("skip", Handler::Ignore);
    handlers
});

const ITEM_TAG: &str = "item";
const ENUM_TAG: &str = "enum";
const EAT_COMMENT_TAG: &str = "eat-comment";

/// Handler for `<item type="...">`: the type acts as the tag, and
/// `styleable` is accepted for `declare-styleable`
fn item_handler(item_type: &str) -> Option<Handler> {
    match item_type {
        "styleable" => Some(Handler::Styleable),
        other => TAG_HANDLERS.get(other).copied(),
    }
}

/// Values parser state shared across the documents of one scan
///
/// Remembers which `id` symbols were derived from `enum` values so that a
/// later explicit `<id>` with the same name replaces them.
#[derive(Debug, Default)]
pub struct ValuesParser {
    enum_ids: HashSet<String>,
}

impl ValuesParser {
    /// Create parser
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the symbols declared in `root` to `builder`
    ///
    /// Keys already present are skipped.
    ///
    /// # Errors
    /// Returns error if the root is not `<resources>`, an element is not a
    /// known declaration, or a required attribute is missing
    pub fn parse(
        &mut self,
        root: &Element,
        ids: &mut IdAllocator,
        builder: &mut SymbolTableBuilder,
    ) -> Result<(), ValuesError> {
        if root.local_name() != "resources" || root.namespace().is_some() {
            return Err(ValuesError::InvalidRoot(root.qualified_name().to_string()));
        }

        for element in root.children() {
            let handler = resolve_handler(element)?;
            self.dispatch(handler, element, ids, builder)?;
        }
        Ok(())
    }

    fn dispatch(
        &mut self,
        handler: Handler,
        element: &Element,
        ids: &mut IdAllocator,
        builder: &mut SymbolTableBuilder,
    ) -> Result<(), ValuesError> {
        match handler {
            Handler::Ignore => Ok(()),
            Handler::Declare(resource_type) => self.declare(resource_type, element, ids, builder),
            Handler::Attr => {
                let name = canonicalize_name(required_name(element)?);
                let value = ids.next(ResourceType::Attr)?;
                builder.add_if_absent(Symbol::int(ResourceType::Attr, name, value)?);
                self.declare_enums(element, ids, builder)
            }
            Handler::Styleable => self.declare_styleable(element, ids, builder),
        }
    }

    fn declare(
        &mut self,
        resource_type: ResourceType,
        element: &Element,
        ids: &mut IdAllocator,
        builder: &mut SymbolTableBuilder,
    ) -> Result<(), ValuesError> {
        let name = canonicalize_name(required_name(element)?);
        let value = ids.next(resource_type)?;

        if resource_type == ResourceType::Id && self.enum_ids.remove(&name) {
            builder.replace(Symbol::int(resource_type, name, value)?);
        } else {
            builder.add_if_absent(Symbol::int(resource_type, name, value)?);
        }
        Ok(())
    }

    fn declare_enums(
        &mut self,
        attr: &Element,
        ids: &mut IdAllocator,
        builder: &mut SymbolTableBuilder,
    ) -> Result<(), ValuesError> {
        for child in attr.children().iter().filter(|c| is_enum(c)) {
            let name = canonicalize_name(required_name(child)?);
            let value = ids.next(ResourceType::Id)?;
            if builder.add_if_absent(Symbol::int(ResourceType::Id, name.clone(), value)?) {
                self.enum_ids.insert(name);
            }
        }
        Ok(())
    }

    fn declare_styleable(
        &mut self,
        element: &Element,
        ids: &mut IdAllocator,
        builder: &mut SymbolTableBuilder,
    ) -> Result<(), ValuesError> {
        let styleable = canonicalize_name(required_name(element)?);
        // A redeclaration still allocates and declares its attrs, but the
        // first array and its members stand.
        let redeclared = builder.contains_key(&SymbolKey::new(ResourceType::Styleable, &styleable));
        if redeclared {
            tracing::debug!("Skipping redeclared styleable {}", styleable);
        }
        let mut values = Vec::new();
        let mut attrs = Vec::new();

        for child in element.children() {
            if child.local_name() == EAT_COMMENT_TAG {
                continue;
            }
            if !is_attr(child) {
                return Err(ValuesError::IllegalStyleableChild(
                    child.local_name().to_string(),
                ));
            }

            let raw = required_name(child)?;
            let value = ids.next(ResourceType::Attr)?;
            let attr = match raw.strip_prefix(ANDROID_NS_PREFIX) {
                Some(platform) => format!("{ANDROID_NS_PREFIX}{}", canonicalize_name(platform)),
                None => {
                    let name = canonicalize_name(raw);
                    builder.add_if_absent(Symbol::int(ResourceType::Attr, name.clone(), value.clone())?);
                    name
                }
            };
            self.declare_enums(child, ids, builder)?;
            if redeclared {
                continue;
            }

            builder.add_if_absent(Symbol::int(
                ResourceType::Styleable,
                styleable_member_name(&styleable, &attr),
                value.clone(),
            )?);
            values.push(value);
            attrs.push(attr);
        }

        if !redeclared {
            builder.add(Symbol::styleable(styleable, &values, attrs)?)?;
        }
        Ok(())
    }
}

/// Parse one values document into a table of its own
///
/// # Errors
/// Returns error if the document is not a valid values document
///
/// # Example
/// ```
/// use resgen_symbols::{parse_document, parse_values, IdAllocator, ResourceType};
///
/// let root = parse_document(r#"<resources><string name="app_name">Demo</string></resources>"#)?;
/// let table = parse_values(&root, &mut IdAllocator::new())?;
/// assert_eq!(table.get(ResourceType::String, "app_name").unwrap().value(), "0x7f140001");
/// # Ok::<(), resgen_symbols::ResgenError>(())
/// ```
pub fn parse_values(root: &Element, ids: &mut IdAllocator) -> Result<SymbolTable, ValuesError> {
    let mut builder = SymbolTable::builder();
    ValuesParser::new().parse(root, ids, &mut builder)?;
    Ok(builder.build()?)
}

fn resolve_handler(element: &Element) -> Result<Handler, ValuesError> {
    let tag = element.local_name();
    if tag == ITEM_TAG {
        let item_type = element
            .attribute("type")
            .ok_or_else(|| ValuesError::missing_attribute(ITEM_TAG, "type"))?;
        return item_handler(item_type)
            .ok_or_else(|| ValuesError::UnknownItemType(item_type.to_string()));
    }

    TAG_HANDLERS
        .get(tag)
        .copied()
        .ok_or_else(|| ValuesError::UnknownElement(tag.to_string()))
}

fn required_name(element: &Element) -> Result<&str, ValuesError> {
    element
        .attribute("name")
        .ok_or_else(|| ValuesError::missing_attribute(element.local_name(), "name"))
}

fn is_attr(element: &Element) -> bool {
    match element.local_name() {
        "attr" => true,
        ITEM_TAG => element.attribute("type") == Some("attr"),
        _ => false,
    }
}

fn is_enum(element: &Element) -> bool {
    match element.local_name() {
        ENUM_TAG => true,
        ITEM_TAG => element.attribute("type") == Some(ENUM_TAG),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource_type::ValueType;
    use crate::xml::parse_document;

    fn parse(xml: &str) -> Result<SymbolTable, ValuesError> {
        parse_values(&parse_document(xml).unwrap(), &mut IdAllocator::new())
    }

    fn value(table: &SymbolTable, resource_type: ResourceType, name: &str) -> String {
        table
            .get(resource_type, name)
            .unwrap_or_else(|| panic!("missing {resource_type}/{name}"))
            .value()
            .to_string()
    }

    #[test]
    fn simple_declarations() {
        let table = parse(
            r#"<resources>
                <bool name="a">true</bool>
                <color name="b">#fff</color>
                <dimen name="c">1dp</dimen>
                <item name="d" type="dimen">10%</item>
                <string-array name="e"><item>x</item></string-array>
                <integer-array name="f"><item>1</item></integer-array>
                <plurals name="g"><item quantity="one">x</item></plurals>
                <style name="Theme.App"><item name="android:x">y</item></style>
            </resources>"#,
        )
        .unwrap();

        assert_eq!(value(&table, ResourceType::Bool, "a"), "0x7f050001");
        assert_eq!(value(&table, ResourceType::Color, "b"), "0x7f060001");
        assert_eq!(value(&table, ResourceType::Dimen, "c"), "0x7f070001");
        assert_eq!(value(&table, ResourceType::Dimen, "d"), "0x7f070002");
        assert_eq!(value(&table, ResourceType::Array, "e"), "0x7f030001");
        assert_eq!(value(&table, ResourceType::Array, "f"), "0x7f030002");
        assert_eq!(value(&table, ResourceType::Plurals, "g"), "0x7f120001");
        assert_eq!(value(&table, ResourceType::Style, "Theme_App"), "0x7f150001");
        assert_eq!(table.len(), 8);
    }

    #[test]
    fn attr_enums_become_ids_and_flags_do_not() {
        let table = parse(
            r#"<resources>
                <attr name="a0" format="reference|color"/>
                <attr name="a1">
                    <flag name="f0" value="0"/>
                </attr>
                <attr name="a2">
                    <enum name="e0" value="0"/>
                    <enum name="e1" value="1"/>
                </attr>
            </resources>"#,
        )
        .unwrap();

        assert_eq!(value(&table, ResourceType::Attr, "a2"), "0x7f040003");
        assert_eq!(value(&table, ResourceType::Id, "e0"), "0x7f0b0001");
        assert_eq!(value(&table, ResourceType::Id, "e1"), "0x7f0b0002");
        assert!(!table.contains(ResourceType::Id, "f0"));
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn explicit_id_replaces_enum_id() {
        let table = parse(
            r#"<resources>
                <attr name="a1">
                    <enum name="enum1" value="0"/>
                    <enum name="enum2" value="1"/>
                </attr>
                <id name="enum1"/>
                <id name="nonEnumId"/>
            </resources>"#,
        )
        .unwrap();

        assert_eq!(value(&table, ResourceType::Id, "enum1"), "0x7f0b0003");
        assert_eq!(value(&table, ResourceType::Id, "enum2"), "0x7f0b0002");
        assert_eq!(value(&table, ResourceType::Id, "nonEnumId"), "0x7f0b0004");
    }

    #[test]
    fn empty_styleable() {
        let table = parse(r#"<resources><declare-styleable name="empty"/></resources>"#).unwrap();
        assert_eq!(table.len(), 1);

        let symbol = table.get(ResourceType::Styleable, "empty").unwrap();
        assert_eq!(symbol.value_type(), ValueType::IntList);
        assert_eq!(symbol.value(), "{}");
        assert!(symbol.children().is_empty());
    }

    #[test]
    fn styleable_with_attrs() {
        let table = parse(
            r#"<resources>
                <declare-styleable name="twoattrs">
                    <eat-comment/>
                    <attr name="flags"><flag name="f0" value="0"/></attr>
                    <attr name="nothing"/>
                    <attr name="android:textColor"/>
                </declare-styleable>
            </resources>"#,
        )
        .unwrap();

        let array = table.get(ResourceType::Styleable, "twoattrs").unwrap();
        assert_eq!(array.value(), "{0x7f040001,0x7f040002,0x7f040003}");
        assert_eq!(array.children(), &["flags", "nothing", "android:textColor"]);

        assert_eq!(value(&table, ResourceType::Attr, "flags"), "0x7f040001");
        assert_eq!(value(&table, ResourceType::Styleable, "twoattrs_flags"), "0x7f040001");
        assert_eq!(value(&table, ResourceType::Styleable, "twoattrs_nothing"), "0x7f040002");
        assert_eq!(
            value(&table, ResourceType::Styleable, "twoattrs_android_textColor"),
            "0x7f040003"
        );
        assert!(!table.contains(ResourceType::Attr, "android_textColor"));
    }

    #[test]
    fn redeclared_attr_keeps_first_symbol() {
        let table = parse(
            r#"<resources>
                <attr name="shared"/>
                <declare-styleable name="S"><attr name="shared"/></declare-styleable>
            </resources>"#,
        )
        .unwrap();

        assert_eq!(value(&table, ResourceType::Attr, "shared"), "0x7f040001");
        assert_eq!(value(&table, ResourceType::Styleable, "S_shared"), "0x7f040002");
        assert_eq!(table.get(ResourceType::Styleable, "S").unwrap().value(), "{0x7f040002}");
    }

    #[test]
    fn item_forms_match_element_forms() {
        let items = parse(
            r#"<resources>
                <item type="styleable" name="PieChart">
                    <item type="attr" name="showText" format="boolean"/>
                    <item type="attr" name="labelPosition" format="enum">
                        <item type="enum" name="left" value="0"/>
                        <item type="enum" name="right" value="1"/>
                    </item>
                </item>
            </resources>"#,
        )
        .unwrap();
        let elements = parse(
            r#"<resources>
                <declare-styleable name="PieChart">
                    <attr name="showText" format="boolean"/>
                    <attr name="labelPosition" format="enum">
                        <enum name="left" value="0"/>
                        <enum name="right" value="1"/>
                    </attr>
                </declare-styleable>
            </resources>"#,
        )
        .unwrap();

        assert_eq!(items, elements);
        assert_eq!(value(&items, ResourceType::Id, "right"), "0x7f0b0002");
    }

    #[test]
    fn item_types_dispatch_like_tags() {
        let table = parse(
            r#"<resources>
                <item type="string-array" name="a"/>
                <item type="integer-array" name="b"/>
                <item type="declare-styleable" name="S">
                    <attr name="tint"/>
                </item>
            </resources>"#,
        )
        .unwrap();

        assert_eq!(value(&table, ResourceType::Array, "a"), "0x7f030001");
        assert_eq!(value(&table, ResourceType::Array, "b"), "0x7f030002");
        assert_eq!(value(&table, ResourceType::Attr, "tint"), "0x7f040001");
        let styleable = table.get(ResourceType::Styleable, "S").unwrap();
        assert_eq!(styleable.value(), "{0x7f040001}");
        assert_eq!(styleable.children(), &["tint"]);
    }

    #[test]
    fn redeclared_styleable_adds_no_members() {
        let mut ids = IdAllocator::new();
        let mut builder = SymbolTable::builder();
        let mut parser = ValuesParser::new();
        for xml in [
            r#"<resources><declare-styleable name="S"><attr name="a"/></declare-styleable></resources>"#,
            r#"<resources><declare-styleable name="S"><attr name="b"/></declare-styleable></resources>"#,
        ] {
            parser
                .parse(&parse_document(xml).unwrap(), &mut ids, &mut builder)
                .unwrap();
        }
        let table = builder.build().unwrap();

        let styleable = table.get(ResourceType::Styleable, "S").unwrap();
        assert_eq!(styleable.children(), &["a"]);
        assert_eq!(styleable.value(), "{0x7f040001}");
        assert!(table.contains(ResourceType::Styleable, "S_a"));
        assert!(!table.contains(ResourceType::Styleable, "S_b"));
        assert_eq!(value(&table, ResourceType::Attr, "b"), "0x7f040002");
    }

    #[test]
    fn illegal_styleable_child() {
        let err = parse(
            r#"<resources>
                <declare-styleable name="PieChart">
                    <enum name="left" value="0"/>
                </declare-styleable>
            </resources>"#,
        )
        .unwrap_err();
        assert!(err
            .to_string()
            .contains("Illegal type under declare-styleable: was <enum>, only accepted is <attr>"));
    }

    #[test]
    fn unknown_element() {
        let err = parse(r#"<resources><myType name="foo"/></resources>"#).unwrap_err();
        assert_eq!(err, ValuesError::UnknownElement("myType".to_string()));
    }

    #[test]
    fn unknown_item_type() {
        let err = parse(r#"<resources><item type="bogus" name="foo"/></resources>"#).unwrap_err();
        assert_eq!(err, ValuesError::UnknownItemType("bogus".to_string()));
    }

    #[test]
    fn missing_name() {
        let err = parse(r#"<resources><string>x</string></resources>"#).unwrap_err();
        assert_eq!(err, ValuesError::missing_attribute("string", "name"));
    }

    #[test]
    fn ignored_elements() {
        let table = parse(
            r#"<resources>
                <public type="string" name="a"/>
                <eat-comment/>
                <skip/>
            </resources>"#,
        )
        .unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn prefixed_children_dispatch_on_local_name() {
        let table = parse(
            r#"<resources xmlns:aapt="http://schemas.android.com/aapt">
                <aapt:color name="colorPrimaryDark">#303F9F</aapt:color>
            </resources>"#,
        )
        .unwrap();
        assert!(table.contains(ResourceType::Color, "colorPrimaryDark"));
    }

    #[test]
    fn root_must_be_resources_without_namespace() {
        assert!(matches!(parse("<values/>"), Err(ValuesError::InvalidRoot(_))));
        assert!(matches!(
            parse(r#"<x:resources xmlns:x="urn:x"/>"#),
            Err(ValuesError::InvalidRoot(_))
        ));
    }
}
