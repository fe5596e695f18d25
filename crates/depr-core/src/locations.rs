//! Interner for opaque area codes.
//!
//! Location codes arrive as strings (county GEOIDs and the like).  Every
//! table in a run refers to them through a dense [`LocationId`], and the
//! interner maps back to the code when a table is written out.

use rustc_hash::FxHashMap;

use crate::{DeprError, DeprResult, LocationId};

/// Bidirectional `code ↔ LocationId` map.
///
/// Ids are assigned in insertion order starting at 0 and are never reused.
#[derive(Clone, Debug, Default)]
pub struct Locations {
    names: Vec<String>,
    index: FxHashMap<String, LocationId>,
}

impl Locations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id for `code`, assigning the next one if it is new.
    pub fn intern(&mut self, code: &str) -> DeprResult<LocationId> {
        if let Some(&id) = self.index.get(code) {
            return Ok(id);
        }
        let id = LocationId::try_from(self.names.len())?;
        self.names.push(code.to_owned());
        self.index.insert(code.to_owned(), id);
        Ok(id)
    }

    /// Look up an existing code without interning it.
    #[inline]
    pub fn get(&self, code: &str) -> Option<LocationId> {
        self.index.get(code).copied()
    }

    /// Like [`get`](Self::get) but fails with `InvalidInput` for unknown codes.
    pub fn require(&self, code: &str) -> DeprResult<LocationId> {
        self.get(code)
            .ok_or_else(|| DeprError::InvalidInput(format!("unknown location {code:?}")))
    }

    /// The code for `id`.
    ///
    /// # Panics
    /// Panics if `id` was not issued by this interner.
    #[inline]
    pub fn name(&self, id: LocationId) -> &str {
        &self.names[id.index()]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate `(id, code)` in id order.
    pub fn iter(&self) -> impl Iterator<Item = (LocationId, &str)> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(|(i, n)| (LocationId(i as u32), n.as_str()))
    }
}
