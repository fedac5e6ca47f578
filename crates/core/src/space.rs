//! Variable spaces
//!
//! A [`Space`] is an ordered allow-list of symbols and path patterns used to
//! restrict ownership queries to a subset of a trace. The empty space matches
//! every variable.
//!
//! ## Pattern matching
//!
//! A pattern entry such as `x[1]` matches a rendered name when the name is
//! exactly the pattern, or extends it with further indexing (`x[1][2]`).
//! It never matches a name that merely shares a textual prefix (`x[10]`).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::varname::{Symbol, VarName};

/// One entry of a [`Space`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpaceEntry {
    /// Every occurrence of a top-level symbol
    Symbol(Symbol),
    /// A rendered indexing prefix, e.g. `x[1]`
    Pattern(String),
}

impl SpaceEntry {
    fn matches(&self, name: &VarName, rendered: &mut Option<String>) -> bool {
        match self {
            SpaceEntry::Symbol(sym) => name.symbol() == sym,
            SpaceEntry::Pattern(pattern) => {
                let rendered = rendered.get_or_insert_with(|| name.to_string());
                match rendered.strip_prefix(pattern.as_str()) {
                    Some(rest) => rest.is_empty() || rest.starts_with('['),
                    None => false,
                }
            }
        }
    }

    /// Whether some name rooted at `symbol` could match this entry
    ///
    /// Rendered names start with their symbol, so a pattern can only match
    /// when one of the two is a prefix of the other. Symbols may themselves
    /// contain indexing, so both directions are checked.
    fn may_hold(&self, symbol: &Symbol) -> bool {
        match self {
            SpaceEntry::Symbol(sym) => sym == symbol,
            SpaceEntry::Pattern(pattern) => {
                pattern.starts_with(symbol.as_str())
                    || symbol
                        .as_str()
                        .strip_prefix(pattern.as_str())
                        .is_some_and(|rest| rest.starts_with('['))
            }
        }
    }
}

impl fmt::Display for SpaceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpaceEntry::Symbol(sym) => write!(f, "{}", sym),
            SpaceEntry::Pattern(p) => f.write_str(p),
        }
    }
}

/// Ordered, de-duplicated allow-list of symbols and path patterns
///
/// # Examples
///
/// ```
/// use tracestore_core::{Space, VarName};
///
/// let space: Space = ["mu", "x[1]"].into_iter().collect();
/// assert!(space.contains(&VarName::scalar("mu")));
/// assert!(space.contains(&VarName::new("x", "[1]")));
/// assert!(!space.contains(&VarName::new("x", "[2]")));
/// assert!(Space::all().contains(&VarName::new("x", "[2]")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Space {
    entries: Vec<SpaceEntry>,
}

impl Space {
    /// The empty space, which matches everything
    pub fn all() -> Self {
        Self::default()
    }

    /// Space naming exactly the given symbols
    pub fn symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        symbols
            .into_iter()
            .fold(Self::all(), |space, sym| space.with_symbol(sym))
    }

    /// Add a symbol entry
    pub fn with_symbol(self, symbol: impl Into<Symbol>) -> Self {
        self.with_entry(SpaceEntry::Symbol(symbol.into()))
    }

    /// Add a path-pattern entry
    pub fn with_pattern(self, pattern: impl Into<String>) -> Self {
        self.with_entry(SpaceEntry::Pattern(pattern.into()))
    }

    fn with_entry(mut self, entry: SpaceEntry) -> Self {
        if !self.entries.contains(&entry) {
            self.entries.push(entry);
        }
        self
    }

    /// True for the match-everything space
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[SpaceEntry] {
        &self.entries
    }

    /// Whether `name` belongs to this space
    pub fn contains(&self, name: &VarName) -> bool {
        if self.entries.is_empty() {
            return true;
        }
        let mut rendered = None;
        self.entries.iter().any(|e| e.matches(name, &mut rendered))
    }

    /// Whether any name with this symbol could belong to the space
    ///
    /// Used by partitioned traces to skip whole sub-stores.
    pub fn may_contain_symbol(&self, symbol: &Symbol) -> bool {
        self.entries.is_empty() || self.entries.iter().any(|e| e.may_hold(symbol))
    }
}

impl<'a> FromIterator<&'a str> for Space {
    /// Entries containing `[` become patterns, all others symbols.
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().fold(Space::all(), |space, entry| {
            if entry.contains('[') {
                space.with_pattern(entry)
            } else {
                space.with_symbol(entry)
            }
        })
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", entry)?;
        }
        f.write_str(")")
    }
}
