//! Ordered, named severity scales.
//!
//! A [`LevelGroup`] is a fixed list of levels ranked by insertion order. Every
//! [`Level`] remembers the group that created it, and levels only compare
//! against levels of the same group: comparing across groups yields `None`
//! from [`PartialOrd::partial_cmp`], which callers must treat as
//! "incomparable".


use crate::error::{Result, SawmillError};
use once_cell::sync::Lazy;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// The standard scale: DEBUG < INFO < WARN < ERROR < FATAL < ANY, default INFO.
pub static STANDARD_LEVELS: Lazy<LevelGroup> = Lazy::new(|| {
    LevelGroup::builder()
        .add("DEBUG", &["debug"])
        .add_default("INFO", &["info"])
        .add("WARN", &["warn"])
        .add("ERROR", &["error"])
        .add("FATAL", &["fatal"])
        .add("ANY", &["any", "unknown"])
        .build()
        .expect("standard level group is well-formed")
});

#[derive(Debug)]
struct GroupInner {
    names: Vec<String>,
    by_name: HashMap<String, usize>,
    by_method: HashMap<String, usize>,
    default: Option<usize>,
}

/// A single level inside a [`LevelGroup`].
#[derive(Clone)]
pub struct Level {
    group: Arc<GroupInner>,
    value: usize,
}

impl Level {
    pub fn name(&self) -> &str {
        &self.group.names[self.value]
    }

    /// Rank within the group, starting at 0 for the lowest level.
    pub fn value(&self) -> usize {
        self.value
    }

    pub fn group(&self) -> LevelGroup {
        LevelGroup {
            inner: Arc::clone(&self.group),
        }
    }

    pub fn same_group(&self, other: &Level) -> bool {
        Arc::ptr_eq(&self.group, &other.group)
    }
}

impl PartialEq for Level {
    fn eq(&self, other: &Self) -> bool {
        self.same_group(other) && self.value == other.value
    }
}

impl Eq for Level {}

impl Hash for Level {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
        self.name().hash(state);
    }
}

impl PartialOrd for Level {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.same_group(other)
            .then(|| self.value.cmp(&other.value))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Level({}={})", self.name(), self.value)
    }
}

/// Ways of naming a level when resolving it against a group.
#[derive(Debug, Clone, Copy)]
pub enum LevelKey<'a> {
    Rank(usize),
    Name(&'a str),
    Level(&'a Level),
    Default,
}

impl From<usize> for LevelKey<'_> {
    fn from(value: usize) -> Self {
        LevelKey::Rank(value)
    }
}

impl<'a> From<&'a str> for LevelKey<'a> {
    fn from(value: &'a str) -> Self {
        LevelKey::Name(value)
    }
}

impl<'a> From<&'a String> for LevelKey<'a> {
    fn from(value: &'a String) -> Self {
        LevelKey::Name(value.as_str())
    }
}

impl<'a> From<&'a Level> for LevelKey<'a> {
    fn from(value: &'a Level) -> Self {
        LevelKey::Level(value)
    }
}

impl<'a, T> From<Option<T>> for LevelKey<'a>
where
    T: Into<LevelKey<'a>>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(LevelKey::Default)
    }
}

#[derive(Clone)]
pub struct LevelGroup {
    inner: Arc<GroupInner>,
}

impl LevelGroup {
    pub fn builder() -> LevelGroupBuilder {
        LevelGroupBuilder::default()
    }

    fn level_at(&self, value: usize) -> Option<Level> {
        (value < self.inner.names.len()).then(|| Level {
            group: Arc::clone(&self.inner),
            value,
        })
    }

    /// Resolves a rank, a name, a level of this group, or the default.
    ///
    /// Returns `None` when the key does not name a level of this group.
    pub fn get<'a>(&self, key: impl Into<LevelKey<'a>>) -> Option<Level> {
        match key.into() {
            LevelKey::Rank(value) => self.level_at(value),
            LevelKey::Name(name) => self
                .inner
                .by_name
                .get(name)
                .and_then(|value| self.level_at(*value)),
            LevelKey::Level(level) => {
                (Arc::ptr_eq(&level.group, &self.inner)).then(|| level.clone())
            }
            LevelKey::Default => Some(self.default()),
        }
    }

    pub fn lowest(&self) -> Level {
        Level {
            group: Arc::clone(&self.inner),
            value: 0,
        }
    }

    pub fn highest(&self) -> Level {
        Level {
            group: Arc::clone(&self.inner),
            value: self.inner.names.len() - 1,
        }
    }

    /// The configured default level, or the highest level if none was set.
    pub fn default(&self) -> Level {
        match self.inner.default {
            Some(value) => Level {
                group: Arc::clone(&self.inner),
                value,
            },
            None => self.highest(),
        }
    }

    /// Resolves a method alias such as `"warn"` to its level.
    pub fn lookup_method(&self, method: &str) -> Option<Level> {
        self.inner
            .by_method
            .get(method)
            .and_then(|value| self.level_at(*value))
    }

    /// Width of the widest level name, for column-aligned output.
    pub fn column_width(&self) -> usize {
        self.inner.names.iter().map(String::len).max().unwrap_or(0)
    }

    pub fn levels(&self) -> impl Iterator<Item = Level> + '_ {
        (0..self.inner.names.len()).map(|value| Level {
            group: Arc::clone(&self.inner),
            value,
        })
    }

    pub fn len(&self) -> usize {
        self.inner.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.names.is_empty()
    }
}

impl PartialEq for LevelGroup {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for LevelGroup {}

impl fmt::Debug for LevelGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelGroup")
            .field("levels", &self.inner.names)
            .finish()
    }
}

/// Collects level definitions in rank order.
///
/// Errors (duplicate names, duplicate aliases, a second default) are held
/// until [`LevelGroupBuilder::build`] so definitions can be chained.
#[derive(Debug, Default)]
pub struct LevelGroupBuilder {
    names: Vec<String>,
    by_name: HashMap<String, usize>,
    by_method: HashMap<String, usize>,
    default: Option<usize>,
    error: Option<SawmillError>,
}

impl LevelGroupBuilder {
    pub fn add(self, name: &str, methods: &[&str]) -> Self {
        self.push(name, methods, false)
    }

    pub fn add_default(self, name: &str, methods: &[&str]) -> Self {
        self.push(name, methods, true)
    }

    fn push(mut self, name: &str, methods: &[&str], default: bool) -> Self {
        if self.error.is_some() {
            return self;
        }

        if self.by_name.contains_key(name) {
            self.error = Some(SawmillError::level(format!("name {name} already taken")));
            return self;
        }

        let value = self.names.len();

        if default {
            if self.default.is_some() {
                self.error = Some(SawmillError::level("a default level is already specified"));
                return self;
            }
            self.default = Some(value);
        }

        for method in methods {
            if self.by_method.contains_key(*method) {
                self.error = Some(SawmillError::level(format!("method {method} already taken")));
                return self;
            }
            self.by_method.insert((*method).to_string(), value);
        }

        self.names.push(name.to_string());
        self.by_name.insert(name.to_string(), value);
        self
    }

    pub fn build(self) -> Result<LevelGroup> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if self.names.is_empty() {
            return Err(SawmillError::level("a level group needs at least one level"));
        }

        Ok(LevelGroup {
            inner: Arc::new(GroupInner {
                names: self.names,
                by_name: self.by_name,
                by_method: self.by_method,
                default: self.default,
            }),
        })
    }
}
