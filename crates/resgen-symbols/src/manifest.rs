//! Manifest data
//!
//! Only what symbol processing needs: the package (the default identity of
//! the module's table) and the component classes instantiated by the
//! framework, for keep rules.

use crate::error::ManifestError;
use crate::xml::{parse_document, Element, ANDROID_NS_URI};

const COMPONENT_TAGS: [&str; 4] = ["activity", "service", "receiver", "provider"];

/// Component class declared in a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Fully qualified class name
    pub class_name: String,

    /// `android:process`, if declared on the component
    pub process: Option<String>,
}

/// Parsed manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestData {
    /// `manifest@package`
    pub package: String,

    /// Components in declaration order
    pub components: Vec<Component>,

    /// `application@android:process`
    pub application_process: Option<String>,
}

impl ManifestData {
    /// Parse manifest XML
    ///
    /// # Errors
    /// Returns error if the document is malformed, the root is not
    /// `<manifest>`, or it declares no package
    pub fn parse(xml: &str) -> Result<Self, ManifestError> {
        let root = parse_document(xml)?;
        if root.local_name() != "manifest" {
            return Err(ManifestError::InvalidRoot(root.qualified_name().to_string()));
        }
        let package = root
            .attribute("package")
            .filter(|p| !p.is_empty())
            .ok_or(ManifestError::MissingPackage)?
            .to_string();

        let mut data = Self {
            package,
            components: Vec::new(),
            application_process: None,
        };

        for child in root.children() {
            match child.local_name() {
                "application" => data.read_application(child),
                "instrumentation" => data.push_component(child, None),
                _ => {}
            }
        }
        Ok(data)
    }

    /// Process a component runs in, falling back to the application's
    #[must_use]
    pub fn effective_process<'a>(&'a self, component: &'a Component) -> Option<&'a str> {
        component
            .process
            .as_deref()
            .or(self.application_process.as_deref())
    }

    fn read_application(&mut self, application: &Element) {
        self.application_process = android_attribute(application, "process").map(str::to_string);

        for attribute in ["name", "backupAgent"] {
            if let Some(name) = android_attribute(application, attribute) {
                let class_name = resolve_class_name(&self.package, name);
                self.components.push(Component {
                    class_name,
                    process: None,
                });
            }
        }

        for child in application.children() {
            if COMPONENT_TAGS.contains(&child.local_name()) {
                let process = android_attribute(child, "process").map(str::to_string);
                self.push_component(child, process);
            }
        }
    }

    fn push_component(&mut self, element: &Element, process: Option<String>) {
        if let Some(name) = android_attribute(element, "name") {
            self.components.push(Component {
                class_name: resolve_class_name(&self.package, name),
                process,
            });
        }
    }
}

/// Resolve a manifest class reference against `package`
///
/// `.Foo` and `Foo` become `package.Foo`; dotted names are already
/// qualified.
#[must_use]
pub fn resolve_class_name(package: &str, name: &str) -> String {
    if name.starts_with('.') {
        format!("{package}{name}")
    } else if !name.contains('.') {
        format!("{package}.{name}")
    } else {
        name.to_string()
    }
}

fn android_attribute<'a>(element: &'a Element, local_name: &str) -> Option<&'a str> {
    element.attribute_ns(ANDROID_NS_URI, local_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::XmlError;

    const MANIFEST: &str = r#"<manifest package="org.sample"
          xmlns:android="http://schemas.android.com/apk/res/android">
    <application android:name=".SampleApp" android:backupAgent="backupAgent"
                 android:process="DefaultProcess">
        <activity android:name=".ui.Launch"/>
        <service android:name=".Sync" android:process=":sync"/>
        <provider android:name="androidx.core.content.FileProvider">
            <meta-data android:name="paths"/>
        </provider>
    </application>
    <instrumentation android:name=".Instrument"/>
</manifest>"#;

    #[test]
    fn parses_components_in_order() {
        let data = ManifestData::parse(MANIFEST).unwrap();
        assert_eq!(data.package, "org.sample");
        assert_eq!(data.application_process.as_deref(), Some("DefaultProcess"));

        let names: Vec<&str> = data.components.iter().map(|c| c.class_name.as_str()).collect();
        assert_eq!(
            names,
            [
                "org.sample.SampleApp",
                "org.sample.backupAgent",
                "org.sample.ui.Launch",
                "org.sample.Sync",
                "androidx.core.content.FileProvider",
                "org.sample.Instrument",
            ]
        );
        assert_eq!(data.components[3].process.as_deref(), Some(":sync"));
    }

    #[test]
    fn effective_process_falls_back_to_application() {
        let data = ManifestData::parse(MANIFEST).unwrap();
        assert_eq!(data.effective_process(&data.components[2]), Some("DefaultProcess"));
        assert_eq!(data.effective_process(&data.components[3]), Some(":sync"));
    }

    #[test]
    fn class_name_resolution() {
        assert_eq!(resolve_class_name("a.b", ".C"), "a.b.C");
        assert_eq!(resolve_class_name("a.b", "C"), "a.b.C");
        assert_eq!(resolve_class_name("a.b", "x.y.C"), "x.y.C");
    }

    #[test]
    fn errors() {
        assert_eq!(
            ManifestData::parse("<manifest/>").unwrap_err(),
            ManifestError::MissingPackage
        );
        assert!(matches!(
            ManifestData::parse("<application/>"),
            Err(ManifestError::InvalidRoot(_))
        ));
        assert_eq!(
            ManifestData::parse("").unwrap_err(),
            ManifestError::Xml(XmlError::NoRoot)
        );
    }
}
