//! In-memory representation of a single context file.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;

use log::info;

use super::error::StoreError;
use super::settings::Settings;

/// A value bound to an entry name within a [`Context`].
///
/// A stored key of the form `entryName<delimiter>fieldName` contributes one
/// field to a group; a key with no delimiter binds its whole value as plain
/// text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundValue {
    /// A bare `key=value` binding.
    Text(String),
    /// A named group of fields, kept in file order.
    Group(Vec<(String, String)>),
}

impl BoundValue {
    /// Looks up a field within a group binding.
    ///
    /// Returns `None` for plain text bindings and for absent fields.
    pub fn field(&self, name: &str) -> Option<&str> {
        match self {
            BoundValue::Text(_) => None,
            BoundValue::Group(fields) => fields
                .iter()
                .find(|(field, _)| field == name)
                .map(|(_, value)| value.as_str()),
        }
    }
}

impl fmt::Display for BoundValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundValue::Text(value) => f.write_str(value),
            BoundValue::Group(fields) => {
                write!(f, "{{")?;
                for (i, (field, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{field}={value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// A named, resolved context: the authoritative registry of every entry
/// bound within one `.properties` file.
///
/// Contexts are produced by [`Directory::resolve`](super::Directory::resolve)
/// and hold a snapshot of the backing file at resolution time; nothing is
/// cached between resolutions.
#[derive(Debug, Clone)]
pub struct Context {
    name: String,
    entries: BTreeMap<String, BoundValue>,
}

/// Whether `name` can name a context: non-empty, no path separators.
pub(crate) fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(std::path::is_separator)
}

impl Context {
    /// Reads the backing file for `name`, treating a missing file or a
    /// malformed name as "no such context".
    pub(crate) fn load(settings: &Settings, name: &str) -> Result<Option<Context>, StoreError> {
        if !is_valid_name(name) {
            info!("context name '{name}' is malformed, treating it as absent");
            return Ok(None);
        }

        let path = settings.context_path(name);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(Context::parse(name, &text, settings.delimiter()))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("no backing file for context '{}' at '{}'", name, path.display());
                Ok(None)
            }
            Err(e) => Err(StoreError::Io { path, source: e }),
        }
    }

    /// Parses property lines into the entry registry.
    ///
    /// One `key=value` pair per line, split at the first `=`. Blank lines are
    /// skipped, as are lines starting with `#` or `!`. A line with no `=`
    /// binds the whole line as a key with an empty value. A key containing
    /// the delimiter is split at its first occurrence into entry name and
    /// field name.
    pub(crate) fn parse(name: &str, text: &str, delimiter: &str) -> Context {
        let mut entries: BTreeMap<String, BoundValue> = BTreeMap::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            let (key, value) = match line.split_once('=') {
                Some((key, value)) => (key.trim(), value.trim()),
                None => (line, ""),
            };

            match key.split_once(delimiter) {
                Some((entry, field)) => {
                    let slot = entries
                        .entry(entry.to_string())
                        .or_insert_with(|| BoundValue::Group(Vec::new()));
                    // A group line displaces an earlier text binding of the same name.
                    if !matches!(slot, BoundValue::Group(_)) {
                        *slot = BoundValue::Group(Vec::new());
                    }
                    if let BoundValue::Group(fields) = slot {
                        match fields.iter_mut().find(|(f, _)| f == field) {
                            // Last write wins, position kept.
                            Some((_, v)) => *v = value.to_string(),
                            None => fields.push((field.to_string(), value.to_string())),
                        }
                    }
                }
                None => {
                    entries.insert(key.to_string(), BoundValue::Text(value.to_string()));
                }
            }
        }

        Context {
            name: name.to_string(),
            entries,
        }
    }

    /// The context name (the filename stem of the backing file).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every entry name in this context, each with the textual form of its
    /// bound value.
    ///
    /// Plain text bindings render verbatim; groups render their fields in
    /// file order as `{field=value, field=value}`.
    pub fn entries(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(name, value)| (name.clone(), value.to_string()))
            .collect()
    }

    /// The `(entry_name, textual value)` pair for a single entry.
    pub fn entry_detail(&self, entry_name: &str) -> Result<(String, String), StoreError> {
        match self.entries.get(entry_name) {
            Some(value) => Ok((entry_name.to_string(), value.to_string())),
            None => Err(StoreError::EntryNotFound {
                context: self.name.clone(),
                entry: entry_name.to_string(),
            }),
        }
    }

    /// Shape-level access to a single bound value.
    pub fn get(&self, entry_name: &str) -> Option<&BoundValue> {
        self.entries.get(entry_name)
    }

    /// Whether an entry with this name is bound.
    pub fn contains(&self, entry_name: &str) -> bool {
        self.entries.contains_key(entry_name)
    }

    /// Number of bound entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the context has no bound entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Context {
        Context::parse("default_ds", text, "/")
    }

    #[test]
    fn test_parse_groups_fields_by_entry_name() {
        let ctx = parse("app/driver=sqlite\napp/url=sqlite:data/app.db\nother/x=1\n");

        assert_eq!(ctx.len(), 2);
        assert_eq!(
            ctx.get("app"),
            Some(&BoundValue::Group(vec![
                ("driver".to_string(), "sqlite".to_string()),
                ("url".to_string(), "sqlite:data/app.db".to_string()),
            ]))
        );
    }

    #[test]
    fn test_parse_binds_plain_keys_as_text() {
        let ctx = parse("greeting=hello world\n");

        assert_eq!(
            ctx.get("greeting"),
            Some(&BoundValue::Text("hello world".to_string()))
        );
        assert_eq!(ctx.get("greeting").unwrap().field("x"), None);
    }

    #[test]
    fn test_parse_skips_blank_and_comment_lines() {
        let ctx = parse("\n# comment\n! also a comment\napp/x=1\n\n");

        assert_eq!(ctx.len(), 1);
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_parse_line_without_equals_binds_empty_value() {
        let ctx = parse("flag\n");

        assert_eq!(ctx.get("flag"), Some(&BoundValue::Text(String::new())));
    }

    #[test]
    fn test_parse_splits_value_at_first_equals() {
        let ctx = parse("app/url=sqlite:data/app.db?mode=ro\n");

        assert_eq!(
            ctx.get("app").unwrap().field("url"),
            Some("sqlite:data/app.db?mode=ro")
        );
    }

    #[test]
    fn test_parse_splits_key_at_first_delimiter() {
        let ctx = parse("a/b/c=1\n");

        assert_eq!(ctx.get("a").unwrap().field("b/c"), Some("1"));
    }

    #[test]
    fn test_parse_last_value_wins_for_repeated_field() {
        let ctx = parse("app/x=1\napp/y=2\napp/x=3\n");

        assert_eq!(
            ctx.get("app"),
            Some(&BoundValue::Group(vec![
                ("x".to_string(), "3".to_string()),
                ("y".to_string(), "2".to_string()),
            ]))
        );
    }

    #[test]
    fn test_parse_trims_key_and_value_but_keeps_interior_whitespace() {
        let ctx = parse("  app/name =  hello there  \n");

        assert_eq!(ctx.get("app").unwrap().field("name"), Some("hello there"));
    }

    #[test]
    fn test_entries_render_groups_in_file_order() {
        let ctx = parse("out/target_name=data/out\nout/buffered=true\n");

        let entries = ctx.entries();
        assert_eq!(entries["out"], "{target_name=data/out, buffered=true}");
    }

    #[test]
    fn test_entry_detail_returns_name_and_textual_value() {
        let ctx = parse("greeting=hello\n");

        assert_eq!(
            ctx.entry_detail("greeting").unwrap(),
            ("greeting".to_string(), "hello".to_string())
        );
    }

    #[test]
    fn test_entry_detail_missing_entry() {
        let ctx = parse("greeting=hello\n");

        let result = ctx.entry_detail("absent");

        assert!(matches!(result, Err(StoreError::EntryNotFound { .. })));
    }
}
