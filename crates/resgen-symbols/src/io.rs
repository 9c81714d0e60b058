//! Symbol file I/O
//!
//! One symbol per line, `<value type> <resource type> <name> <value>`,
//! separated by single spaces. The value is the remainder of the line and
//! may contain spaces. Styleable children are not written; they are
//! recovered on read from the `int styleable <array>_<attr>` member lines.
//!
//! ```text
//! int attr foo 0x7f040001
//! int[] styleable View {0x7f040001}
//! int styleable View_foo 0x7f040001
//! ```

use crate::error::{SymbolError, SymbolIoError};
use crate::resource_type::{ResourceType, ValueType};
use crate::styleable::StyleableOwners;
use crate::symbol::{attr_from_member_suffix, Symbol};
use crate::table::{validate_package, SymbolTable};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// How the children of a styleable array are ordered on read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChildOrder {
    /// Order of the member lines in the file
    File,
    /// Ascending integer value of the member lines (aapt output)
    MemberValue,
}

/// One parsed line before children are attached
struct ParsedLine<'a> {
    number: usize,
    content: &'a str,
    symbol: Symbol,
}

/// Render `table` in symbol file format
///
/// Symbols are grouped by resource type in [`ResourceType`] order and keep
/// table order within a type.
#[must_use]
pub fn render(table: &SymbolTable) -> String {
    let mut out = String::new();
    for resource_type in ResourceType::ALL {
        for symbol in table.symbols_of_type(resource_type) {
            // Writing to a String cannot fail.
            let _ = writeln!(out, "{symbol}");
        }
    }
    out
}

/// Write `table` to `path`
///
/// # Errors
/// Returns error if the file cannot be written
pub fn write(table: &SymbolTable, path: &Path) -> Result<(), SymbolIoError> {
    tracing::debug!("Writing {} symbols to {}", table.len(), path.display());
    fs::write(path, render(table)).map_err(|e| SymbolIoError::io_error(path, e))
}

/// Write `table` to `path` with its package on the first line
///
/// # Errors
/// Returns error if the file cannot be written
pub fn write_with_package(table: &SymbolTable, path: &Path) -> Result<(), SymbolIoError> {
    let content = format!("{}\n{}", table.package(), render(table));
    fs::write(path, content).map_err(|e| SymbolIoError::io_error(path, e))
}

/// Read a symbol file; the table has no package
///
/// # Errors
/// Returns error if the file cannot be read or a line is malformed
pub fn read(path: &Path) -> Result<SymbolTable, SymbolIoError> {
    let content = read_to_string(path)?;
    parse(&content, path)
}

/// Read a symbol file whose first line is the table package
///
/// # Errors
/// Returns error if the file is empty, cannot be read, or a line is
/// malformed
pub fn read_with_package(path: &Path) -> Result<SymbolTable, SymbolIoError> {
    let content = read_to_string(path)?;
    let mut lines = numbered_lines(&content);
    let (_, package) = lines
        .next()
        .ok_or_else(|| SymbolIoError::MissingPackage(path.to_path_buf()))?;
    let package = package.trim();
    validate_package(package).map_err(|source| symbol_error(path, source))?;

    let table = parse_lines(lines, path, ChildOrder::File)?;
    table.rename(package).map_err(|source| symbol_error(path, source))
}

/// Read a symbol file produced by aapt
///
/// aapt numbers styleable members by their index in the array, so children
/// are ordered by member value instead of by line.
///
/// # Errors
/// Returns error if the file cannot be read, a line is malformed, or a
/// member value is not an integer
pub fn read_aapt(path: &Path) -> Result<SymbolTable, SymbolIoError> {
    let content = read_to_string(path)?;
    parse_lines(numbered_lines(&content), path, ChildOrder::MemberValue)
}

/// Parse symbol file `content`; `path` only labels errors
///
/// # Errors
/// Returns error if a line is malformed
///
/// # Example
/// ```
/// use resgen_symbols::{io, ResourceType};
/// use std::path::Path;
///
/// let table = io::parse("int string app_name 0x7f140001\n", Path::new("R.txt"))?;
/// assert!(table.contains(ResourceType::String, "app_name"));
/// # Ok::<(), resgen_symbols::SymbolIoError>(())
/// ```
pub fn parse(content: &str, path: &Path) -> Result<SymbolTable, SymbolIoError> {
    parse_lines(numbered_lines(content), path, ChildOrder::File)
}

fn parse_lines<'a>(
    lines: impl Iterator<Item = (usize, &'a str)>,
    path: &Path,
    order: ChildOrder,
) -> Result<SymbolTable, SymbolIoError> {
    let parsed = lines
        .map(|(number, content)| {
            parse_line(content)
                .map(|symbol| ParsedLine {
                    number,
                    content,
                    symbol,
                })
                .map_err(|reason| format_error(path, number, content, reason))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let children = collect_children(&parsed, path, order)?;

    let mut builder = SymbolTable::builder();
    for line in parsed {
        let symbol = match children.get(line.symbol.name()) {
            Some(attrs) if line.symbol.is_styleable_array() => Symbol::with_children(
                ResourceType::Styleable,
                line.symbol.name(),
                ValueType::IntList,
                line.symbol.value(),
                attrs.clone(),
            )
            .map_err(|e| format_error(path, line.number, line.content, e.to_string()))?,
            _ => line.symbol,
        };
        builder
            .add(symbol)
            .map_err(|e| format_error(path, line.number, line.content, e.to_string()))?;
    }

    builder.build().map_err(|source| symbol_error(path, source))
}

/// Children of every styleable array, recovered from member lines
fn collect_children(
    parsed: &[ParsedLine<'_>],
    path: &Path,
    order: ChildOrder,
) -> Result<HashMap<String, Vec<String>>, SymbolIoError> {
    let owners = StyleableOwners::new(
        parsed
            .iter()
            .filter(|l| l.symbol.is_styleable_array())
            .map(|l| l.symbol.name()),
    );
    if owners.is_empty() {
        return Ok(HashMap::new());
    }

    let mut grouped: HashMap<String, Vec<(i64, String)>> = HashMap::new();
    for line in parsed.iter().filter(|l| l.symbol.is_styleable_member()) {
        let Some((array, suffix)) = owners.owner(line.symbol.name()) else {
            continue;
        };
        let sort_key = match order {
            ChildOrder::File => 0,
            ChildOrder::MemberValue => parse_int(line.symbol.value()).ok_or_else(|| {
                format_error(
                    path,
                    line.number,
                    line.content,
                    format!("styleable index '{}' is not an integer", line.symbol.value()),
                )
            })?,
        };
        grouped
            .entry(array.to_string())
            .or_default()
            .push((sort_key, attr_from_member_suffix(suffix)));
    }

    Ok(grouped
        .into_iter()
        .map(|(array, mut attrs)| {
            // Stable, so file order holds among equal keys.
            attrs.sort_by_key(|(key, _)| *key);
            (array, attrs.into_iter().map(|(_, attr)| attr).collect())
        })
        .collect())
}

fn parse_line(line: &str) -> Result<Symbol, String> {
    let mut fields = line.splitn(4, ' ');
    let (Some(value_type), Some(resource_type), Some(name), Some(value)) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err("expected '<type> <class> <name> <value>'".to_string());
    };

    if [value_type, resource_type, name, value].iter().any(|f| f.is_empty()) {
        return Err("empty field".to_string());
    }
    let value_type = ValueType::from_name(value_type)
        .ok_or_else(|| format!("Invalid symbol type {value_type}"))?;
    let resource_type = ResourceType::from_name(resource_type)
        .ok_or_else(|| format!("Invalid resource type {resource_type}"))?;

    Symbol::new(resource_type, name, value_type, value).map_err(|e| e.to_string())
}

fn parse_int(value: &str) -> Option<i64> {
    match value.strip_prefix("0x") {
        Some(hex) => i64::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

/// Lines numbered from 1 with a trailing `\r` removed
fn numbered_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .enumerate()
        .map(|(index, line)| (index + 1, line))
}

fn read_to_string(path: &Path) -> Result<String, SymbolIoError> {
    fs::read_to_string(path).map_err(|e| SymbolIoError::io_error(path, e))
}

fn format_error(path: &Path, line: usize, content: &str, reason: impl Into<String>) -> SymbolIoError {
    SymbolIoError::Format {
        path: path.to_path_buf(),
        line,
        content: content.to_string(),
        reason: reason.into(),
    }
}

fn symbol_error(path: &Path, source: SymbolError) -> SymbolIoError {
    SymbolIoError::Symbol {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn path() -> &'static Path {
        Path::new("R.txt")
    }

    #[test]
    fn render_groups_by_type_then_table_order() {
        let mut builder = SymbolTable::builder();
        builder.add(Symbol::int(ResourceType::String, "b", "0x7f140001").unwrap()).unwrap();
        builder.add(Symbol::int(ResourceType::Attr, "z", "0x7f040001").unwrap()).unwrap();
        builder.add(Symbol::int(ResourceType::String, "a", "0x7f140002").unwrap()).unwrap();
        let table = builder.build().unwrap();

        assert_eq!(
            render(&table),
            "int attr z 0x7f040001\nint string b 0x7f140001\nint string a 0x7f140002\n"
        );
    }

    #[test]
    fn children_recovered_from_member_lines() {
        let table = parse(
            "int attr b 0x7f040002\n\
             int styleable S_b 0x7f040002\n\
             int styleable S_android_text 0x01010001\n\
             int[] styleable S {0x7f040002,0x01010001}\n",
            path(),
        )
        .unwrap();

        let array = table.get(ResourceType::Styleable, "S").unwrap();
        assert_eq!(array.children(), &["b", "android:text"]);
        assert!(table.contains(ResourceType::Styleable, "S_b"));
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn value_keeps_spaces_and_drops_carriage_return() {
        let table = parse("int[] styleable S { 0x1, 0x2 }  \r\n", path()).unwrap();
        assert_eq!(
            table.get(ResourceType::Styleable, "S").unwrap().value(),
            "{ 0x1, 0x2 }  "
        );
    }

    #[test]
    fn malformed_line_reports_number_and_content() {
        let err = parse("int string a 0x1\nint string\n", path()).unwrap_err();
        match err {
            SymbolIoError::Format { line, content, .. } => {
                assert_eq!(line, 2);
                assert_eq!(content, "int string");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn unknown_types_are_malformed() {
        assert!(parse("long string a 0x1", path()).is_err());
        assert!(parse("int widget a 0x1", path()).is_err());
        assert!(parse("int[] attr a {}", path()).is_err());
        assert!(parse("int string  0x1", path()).is_err());
    }

    #[test]
    fn duplicate_line_is_malformed() {
        let err = parse("int id a 0x1\nint id a 0x2\n", path()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn aapt_children_follow_member_values() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("R.txt");
        fs::write(
            &file,
            "int[] styleable S { 0x7f040002, 0x7f040001 }\n\
             int styleable S_b 1\n\
             int styleable S_a 0\n",
        )
        .unwrap();

        let table = read_aapt(&file).unwrap();
        assert_eq!(table.get(ResourceType::Styleable, "S").unwrap().children(), &["a", "b"]);

        let in_file_order = read(&file).unwrap();
        assert_eq!(
            in_file_order.get(ResourceType::Styleable, "S").unwrap().children(),
            &["b", "a"]
        );
    }

    #[test]
    fn aapt_rejects_non_integer_index() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("R.txt");
        fs::write(&file, "int[] styleable S {}\nint styleable S_a zero\n").unwrap();
        assert!(matches!(read_aapt(&file), Err(SymbolIoError::Format { line: 2, .. })));
    }

    #[test]
    fn package_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("package-aware-r.txt");

        let mut builder = SymbolTable::builder().package("com.example.lib");
        builder.add(Symbol::int(ResourceType::Drawable, "icon", "0x7f080001").unwrap()).unwrap();
        let table = builder.build().unwrap();

        write_with_package(&table, &file).unwrap();
        assert_eq!(read_with_package(&file).unwrap(), table);
    }

    #[test]
    fn empty_package_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("empty.txt");
        fs::write(&file, "").unwrap();
        assert!(matches!(read_with_package(&file), Err(SymbolIoError::MissingPackage(_))));
    }

    #[test]
    fn missing_file_names_path() {
        let err = read(Path::new("/nonexistent/R.txt")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/R.txt"));
    }
}
