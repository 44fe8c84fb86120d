//! Layered configuration loading.
//!
//! Every layer contributes a TOML table. Tables are merged recursively, with
//! later layers overriding values of earlier ones.

use std::path::{Path, PathBuf};
use std::{env, fs, io};

use anyhow::{Context as _, Result};
use serde::de::DeserializeOwned;
use smallvec::SmallVec;
use toml::map::Entry;
use toml::{Table, Value};

/// Builds a configuration value from a stack of layers.
#[must_use]
pub struct Builder {
    table: Result<Table>,
}

impl Builder {
    /// Creates a new builder without any layers.
    pub fn new() -> Self {
        Self {
            table: Ok(Table::new()),
        }
    }

    /// Pushes a layer on top of the current ones.
    pub fn add_layer<L: Layer>(mut self, source: L) -> Self {
        self.table = self.table.and_then(|mut t| {
            source.extend_table(&mut t)?;
            Ok(t)
        });
        self
    }

    /// Deserializes the merged layers.
    pub fn build<T>(self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let table = self.table?;
        T::deserialize(table).context("cannot deserialize config")
    }
}

/// A configuration layer.
pub trait Layer {
    /// Merges this layer into the table.
    fn extend_table(&self, table: &mut Table) -> Result<()>;
}

/// A layer loaded from a TOML file.
#[must_use]
pub struct File {
    path: PathBuf,
    required: bool,
}

impl File {
    /// Creates a layer for the file at the given path.
    ///
    /// The file is required unless [`Self::required`] says otherwise.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            required: true,
        }
    }

    /// Sets whether a missing file is an error or an empty layer.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// A layer parsed from embedded TOML text.
#[must_use]
pub struct TomlText<'a> {
    text: &'a str,
}

impl<'a> TomlText<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }
}

/// A layer built from the process environment.
///
/// Variable names are lowercased and split at `__` (two underscores) to
/// address nested keys, so `DISCORD__TOKEN` sets `discord.token`. Aliases map
/// a whole variable name onto a dotted key path.
///
/// All values are strings. Non UTF-8 values are converted lossily.
#[must_use]
pub struct Env {
    aliases: Vec<(&'static str, &'static str)>,
}

impl Env {
    pub fn new() -> Self {
        Self {
            aliases: Vec::new(),
        }
    }

    /// Maps the variable `var` to the dotted key `path`.
    ///
    /// An alias is applied after the generic mapping, so it wins if both
    /// forms are present.
    pub fn alias(mut self, var: &'static str, path: &'static str) -> Self {
        self.aliases.push((var, path));
        self
    }
}

impl Layer for File {
    fn extend_table(&self, table: &mut Table) -> Result<()> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(why) if !self.required && why.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(why) => {
                return Err(why).with_context(|| format!("cannot read config {:?}", self.path));
            },
        };

        let file = parse_table(&text).with_context(|| format!("invalid config {:?}", self.path))?;
        merge_tables(table, file);
        Ok(())
    }
}

impl Layer for TomlText<'_> {
    fn extend_table(&self, table: &mut Table) -> Result<()> {
        let toml = parse_table(self.text).context("embedded config is invalid")?;
        merge_tables(table, toml);
        Ok(())
    }
}

impl Layer for Env {
    fn extend_table(&self, table: &mut Table) -> Result<()> {
        for (key, value) in env::vars_os() {
            // keys that aren't utf8 can't name any config field
            let Ok(mut key) = key.into_string() else {
                continue;
            };

            let value = value
                .into_string()
                .unwrap_or_else(|o| o.to_string_lossy().into_owned());

            if let Some(&(_, path)) = self.aliases.iter().find(|(var, _)| *var == key) {
                let segments = path.split('.').collect::<SmallVec<[&str; 8]>>();
                insert_at(table, &segments, Value::String(value.clone()));
            }

            key.make_ascii_lowercase();
            let segments = key.split("__").collect::<SmallVec<[&str; 8]>>();
            insert_at(table, &segments, Value::String(value));
        }

        Ok(())
    }
}

fn parse_table(text: &str) -> Result<Table> {
    toml::from_str(text).context("config toml is invalid")
}

/// Merges `consume` into `target`. Nested tables merge, anything else is
/// replaced.
fn merge_tables(target: &mut Table, consume: Table) {
    for (key, value) in consume {
        match target.entry(key) {
            Entry::Vacant(entry) => _ = entry.insert(value),
            Entry::Occupied(mut entry) => match (entry.get_mut(), value) {
                (Value::Table(a), Value::Table(b)) => merge_tables(a, b),
                (a, b) => *a = b,
            },
        }
    }
}

/// Sets the value at a key path, creating intermediate tables.
///
/// A non-table value in the way is replaced.
fn insert_at(table: &mut Table, path: &[&str], value: Value) {
    let [first, rest @ ..] = path else {
        panic!("path must have at least one segment");
    };

    match table.entry(*first) {
        Entry::Vacant(entry) => _ = entry.insert(nested_value(rest, value)),
        Entry::Occupied(mut entry) => match entry.get_mut() {
            Value::Table(inner) if !rest.is_empty() => insert_at(inner, rest, value),
            slot => *slot = nested_value(rest, value),
        },
    }
}

fn nested_value(path: &[&str], value: Value) -> Value {
    path.iter().rev().fold(value, |inner, &segment| {
        let mut table = Table::new();
        table.insert(segment.to_owned(), inner);
        Value::Table(table)
    })
}
