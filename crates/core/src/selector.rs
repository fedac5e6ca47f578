//! Sampler selectors and ownership sets
//!
//! A [`Selector`] is an opaque identifier for one sampling algorithm. Samplers
//! hold only their selector, never a reference into the trace; every
//! interaction goes through trace operations taking the selector by value.
//!
//! A variable's [`Owners`] set records which selectors have claimed it. An
//! empty set means the variable is unassigned and is matched by every
//! selector query (the default / prior sampler convention).

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Opaque identifier of a sampling algorithm
///
/// Two selectors are equal iff both id and tag are equal.
///
/// # Examples
///
/// ```
/// use tracestore_core::Selector;
///
/// let hmc = Selector::new("hmc");
/// let other = Selector::new("hmc");
/// assert_ne!(hmc, other); // fresh id each time
/// assert_eq!(hmc.tag(), "hmc");
/// assert!(Selector::default().is_default());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selector {
    id: Uuid,
    tag: Arc<str>,
}

impl Selector {
    /// Create a selector with a fresh random id
    pub fn new(tag: impl AsRef<str>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tag: Arc::from(tag.as_ref()),
        }
    }

    /// Create a selector with a fixed id (e.g. restored from a checkpoint)
    pub fn with_id(id: Uuid, tag: impl AsRef<str>) -> Self {
        Self {
            id,
            tag: Arc::from(tag.as_ref()),
        }
    }

    /// Unique id
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Human-readable tag, e.g. `"hmc"`
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// True for the nil-id `"default"` selector
    pub fn is_default(&self) -> bool {
        self.id.is_nil() && &*self.tag == "default"
    }
}

impl Default for Selector {
    fn default() -> Self {
        Self::with_id(Uuid::nil(), "default")
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tag, self.id)
    }
}

/// Set of selectors owning a variable
///
/// Almost always holds zero or one selector, so it is kept inline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owners(SmallVec<[Selector; 2]>);

impl Owners {
    /// Empty set: unassigned, matched by every selector
    pub fn none() -> Self {
        Self::default()
    }

    /// Set holding a single selector
    pub fn one(selector: Selector) -> Self {
        let mut owners = Self::none();
        owners.insert(selector);
        owners
    }

    /// Add a selector; returns false if it was already present
    pub fn insert(&mut self, selector: Selector) -> bool {
        if self.0.contains(&selector) {
            return false;
        }
        self.0.push(selector);
        true
    }

    /// Whether `selector` has explicitly claimed this variable
    pub fn contains(&self, selector: &Selector) -> bool {
        self.0.contains(selector)
    }

    /// Whether a query under `selector` matches this set
    ///
    /// Explicit claim, or unassigned.
    pub fn admits(&self, selector: &Selector) -> bool {
        self.0.is_empty() || self.0.contains(selector)
    }

    /// Number of owners
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when unassigned
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate owners in claim order
    pub fn iter(&self) -> impl Iterator<Item = &Selector> {
        self.0.iter()
    }
}

impl FromIterator<Selector> for Owners {
    fn from_iter<I: IntoIterator<Item = Selector>>(iter: I) -> Self {
        let mut owners = Owners::none();
        for s in iter {
            owners.insert(s);
        }
        owners
    }
}

impl From<Selector> for Owners {
    fn from(selector: Selector) -> Self {
        Owners::one(selector)
    }
}
