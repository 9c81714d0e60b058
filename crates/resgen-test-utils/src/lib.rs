//! Testing utilities for resgen workspace
//!
//! Shared fixtures: symbol and table shorthands and temporary resource
//! directories.

#![allow(missing_docs)]

use resgen_symbols::{ResourceType, Symbol, SymbolTable};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn int_symbol(resource_type: ResourceType, name: &str, value: &str) -> Symbol {
    Symbol::int(resource_type, name, value).unwrap()
}

pub fn styleable_symbol(name: &str, values: &[&str], children: &[&str]) -> Symbol {
    let values: Vec<String> = values.iter().map(ToString::to_string).collect();
    let children = children.iter().map(ToString::to_string).collect();
    Symbol::styleable(name, &values, children).unwrap()
}

pub fn table_of(package: &str, symbols: impl IntoIterator<Item = Symbol>) -> SymbolTable {
    let mut builder = SymbolTable::builder().package(package);
    for symbol in symbols {
        builder.add(symbol).unwrap();
    }
    builder.build().unwrap()
}

/// Temporary resource directory, removed on drop
pub struct ResDir {
    dir: TempDir,
}

impl ResDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` to `relative`, creating parent directories
    pub fn file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    /// Builder-style [`ResDir::file`]
    pub fn with_file(self, relative: &str, content: &str) -> Self {
        self.file(relative, content);
        self
    }
}

impl Default for ResDir {
    fn default() -> Self {
        Self::new()
    }
}

pub const SAMPLE_VALUES: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<resources>
    <string name="app_name">Sample</string>
    <color name="accent">#FF4081</color>
    <attr name="tint" format="color"/>
    <declare-styleable name="Badge">
        <attr name="tint"/>
        <attr name="android:textSize"/>
        <attr name="shape">
            <enum name="circle" value="0"/>
            <enum name="square" value="1"/>
        </attr>
    </declare-styleable>
</resources>
"#;

pub const SAMPLE_LAYOUT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<FrameLayout xmlns:android="http://schemas.android.com/apk/res/android">
    <com.example.widget.BadgeView android:id="@+id/badge"/>
    <Button android:id="@+id/fab"/>
</FrameLayout>
"#;

pub const SAMPLE_MANIFEST: &str = r#"<manifest package="com.example.lib"
    xmlns:android="http://schemas.android.com/apk/res/android">
    <application android:name=".LibApp">
        <activity android:name=".MainActivity"/>
        <service android:name=".Sync" android:process=":sync"/>
    </application>
</manifest>
"#;

/// Resource directory with one values file, one layout and two drawables
pub fn sample_res_dir() -> ResDir {
    ResDir::new()
        .with_file("values/values.xml", SAMPLE_VALUES)
        .with_file("layout/main.xml", SAMPLE_LAYOUT)
        .with_file("drawable/icon.png", "")
        .with_file("drawable-hdpi/icon.png", "")
        .with_file("drawable/background.xml", "<shape/>")
}
