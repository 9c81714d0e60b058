//! Minimal namespace-aware XML tree
//!
//! Resource files are small, so documents are read fully into an
//! [`Element`] tree with resolved namespaces. Text, comments and
//! processing instructions are dropped.

use crate::error::XmlError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;

/// Namespace URI of Android attributes
pub const ANDROID_NS_URI: &str = "http://schemas.android.com/apk/res/android";

/// One attribute with its resolved namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Qualified name as written (`android:name`)
    pub qualified_name: String,

    /// Local part (`name`)
    pub local_name: String,

    /// Namespace URI, `None` when unprefixed
    pub namespace: Option<String>,

    /// Unescaped value
    pub value: String,
}

/// One element with attributes and element children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    qualified_name: String,
    local_name: String,
    namespace: Option<String>,
    attributes: Vec<Attribute>,
    children: Vec<Element>,
}

impl Element {
    /// Tag as written, including any prefix
    #[inline]
    #[must_use]
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Tag without prefix
    #[inline]
    #[must_use]
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Namespace URI of the tag
    #[inline]
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Attributes in document order
    #[inline]
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Element children in document order
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Value of the unprefixed attribute `local_name`
    #[must_use]
    pub fn attribute(&self, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.namespace.is_none() && a.local_name == local_name)
            .map(|a| a.value.as_str())
    }

    /// Value of attribute `local_name` in namespace `namespace`
    #[must_use]
    pub fn attribute_ns(&self, namespace: &str, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.namespace.as_deref() == Some(namespace) && a.local_name == local_name)
            .map(|a| a.value.as_str())
    }

    /// Visit this element and every descendant in document order
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Element)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// Parse a complete document into its root element
///
/// # Errors
/// Returns error if the document is not well-formed or has no root
pub fn parse_document(input: &str) -> Result<Element, XmlError> {
    let mut reader = NsReader::from_str(input);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let position = u64::try_from(reader.buffer_position()).unwrap_or(u64::MAX);
        let (resolved, event) = reader
            .read_resolved_event()
            .map_err(|e| malformed(position, &e))?;
        // The resolved namespace borrows the reader; take an owned copy first.
        let namespace = namespace_of(&resolved, position)?;

        match event {
            Event::Start(start) => {
                let element = open_element(&reader, namespace, &start, position)?;
                if root.is_some() {
                    return Err(XmlError::TrailingElement(element.qualified_name));
                }
                stack.push(element);
            }
            Event::Empty(start) => {
                let element = open_element(&reader, namespace, &start, position)?;
                if root.is_some() {
                    return Err(XmlError::TrailingElement(element.qualified_name));
                }
                close_element(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                // quick-xml already checked that the end tag matches.
                if let Some(element) = stack.pop() {
                    close_element(&mut stack, &mut root, element);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::UnexpectedEof(open.qualified_name));
    }
    root.ok_or(XmlError::NoRoot)
}

fn close_element(stack: &mut Vec<Element>, root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

fn open_element(
    reader: &NsReader<&[u8]>,
    namespace: Option<String>,
    start: &BytesStart<'_>,
    position: u64,
) -> Result<Element, XmlError> {
    let qualified_name = decode(start.name().as_ref(), position)?;
    let local_name = decode(start.local_name().as_ref(), position)?;

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| malformed(position, &e))?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }

        let (attr_resolved, attr_local) = reader.resolve_attribute(attr.key);
        let attr_namespace = namespace_of(&attr_resolved, position)?;
        let attr_qualified = decode(attr.key.as_ref(), position)?;
        let value = attr
            .unescape_value()
            .map_err(|e| malformed(position, &e))?
            .into_owned();

        attributes.push(Attribute {
            namespace: attr_namespace,
            local_name: decode(attr_local.as_ref(), position)?,
            qualified_name: attr_qualified,
            value,
        });
    }

    Ok(Element {
        qualified_name,
        local_name,
        namespace,
        attributes,
        children: Vec::new(),
    })
}

fn namespace_of(resolved: &ResolveResult<'_>, position: u64) -> Result<Option<String>, XmlError> {
    match resolved {
        ResolveResult::Bound(ns) => Ok(Some(decode(ns.as_ref(), position)?)),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(XmlError::Malformed {
            position,
            message: format!(
                "unbound namespace prefix '{}'",
                String::from_utf8_lossy(prefix)
            ),
        }),
    }
}

fn decode(bytes: &[u8], position: u64) -> Result<String, XmlError> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| malformed(position, &e))
}

fn malformed(position: u64, error: &impl std::fmt::Display) -> XmlError {
    XmlError::Malformed {
        position,
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements() {
        let root = parse_document(
            r#"<?xml version="1.0" encoding="utf-8"?>
            <resources>
                <string name="app_name">Hello</string>
                <!-- comment -->
                <dimen name="pad"/>
            </resources>"#,
        )
        .unwrap();

        assert_eq!(root.local_name(), "resources");
        assert_eq!(root.namespace(), None);
        let names: Vec<&str> = root.children().iter().map(Element::local_name).collect();
        assert_eq!(names, ["string", "dimen"]);
        assert_eq!(root.children()[0].attribute("name"), Some("app_name"));
    }

    #[test]
    fn resolves_namespaces() {
        let root = parse_document(
            r#"<LinearLayout xmlns:android="http://schemas.android.com/apk/res/android"
                             android:id="@+id/root" tag="x"/>"#,
        )
        .unwrap();

        assert_eq!(root.attribute_ns(ANDROID_NS_URI, "id"), Some("@+id/root"));
        assert_eq!(root.attribute("id"), None);
        assert_eq!(root.attribute("tag"), Some("x"));
        assert_eq!(root.attributes().len(), 2);
    }

    #[test]
    fn prefixed_root_has_namespace() {
        let root = parse_document(r#"<x:resources xmlns:x="urn:other"/>"#).unwrap();
        assert_eq!(root.local_name(), "resources");
        assert_eq!(root.namespace(), Some("urn:other"));
        assert_eq!(root.qualified_name(), "x:resources");
    }

    #[test]
    fn unescapes_attribute_values() {
        let root = parse_document(r#"<a v="&lt;b&gt;"/>"#).unwrap();
        assert_eq!(root.attribute("v"), Some("<b>"));
    }

    #[test]
    fn rejects_unclosed_element() {
        let err = parse_document("<resources><string>").unwrap_err();
        assert!(matches!(
            err,
            XmlError::UnexpectedEof(_) | XmlError::Malformed { .. }
        ));
    }

    #[test]
    fn rejects_mismatched_end() {
        assert!(parse_document("<a><b></a>").is_err());
    }

    #[test]
    fn rejects_empty_document() {
        assert_eq!(parse_document("  ").unwrap_err(), XmlError::NoRoot);
    }

    #[test]
    fn walk_visits_in_document_order() {
        let root = parse_document("<a><b><c/></b><d/></a>").unwrap();
        let mut seen = Vec::new();
        root.walk(&mut |e| seen.push(e.local_name().to_string()));
        assert_eq!(seen, ["a", "b", "c", "d"]);
    }
}
