//! Per-slot boolean flags
//!
//! Flags are named dense boolean columns, one entry per slot. Two are always
//! present: [`TRANS`] (value stored in unconstrained space) and [`DEL`]
//! (marked for deletion/resampling on the next execution). Any other key is
//! created lazily the first time it is set, with every existing slot false.

use rustc_hash::FxHashMap;

/// Value currently stored in unconstrained space
pub const TRANS: &str = "trans";

/// Marked for deletion / resampling on the next execution
pub const DEL: &str = "del";

/// Named boolean columns sized to the slot count
#[derive(Debug, Clone)]
pub struct FlagTable {
    columns: FxHashMap<String, Vec<bool>>,
    len: usize,
}

impl FlagTable {
    /// Create a table holding the two mandatory flags
    pub fn new() -> Self {
        let mut columns = FxHashMap::default();
        columns.insert(TRANS.to_string(), Vec::new());
        columns.insert(DEL.to_string(), Vec::new());
        Self { columns, len: 0 }
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no slot has been added
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append one slot, false in every column
    pub fn push_slot(&mut self) {
        for column in self.columns.values_mut() {
            column.push(false);
        }
        self.len += 1;
    }

    /// Read a flag; unknown keys read as false
    pub fn get(&self, key: &str, slot: usize) -> bool {
        self.columns
            .get(key)
            .and_then(|column| column.get(slot).copied())
            .unwrap_or(false)
    }

    /// Set a flag, creating the column if needed
    ///
    /// Callers resolve slots through the store's name index first, so `slot`
    /// must be in range.
    pub fn set(&mut self, key: &str, slot: usize, value: bool) {
        debug_assert!(slot < self.len, "flag slot {} out of range {}", slot, self.len);
        let column = self.column_mut(key);
        column[slot] = value;
    }

    /// Ensure a column exists without touching any slot
    pub fn ensure(&mut self, key: &str) {
        let _ = self.column_mut(key);
    }

    fn column_mut(&mut self, key: &str) -> &mut Vec<bool> {
        let len = self.len;
        self.columns
            .entry(key.to_string())
            .or_insert_with(|| vec![false; len])
    }

    /// Defined flag keys, sorted
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.columns.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Empty every column and forget custom keys
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

impl Default for FlagTable {
    fn default() -> Self {
        Self::new()
    }
}
