//! Dense `u32` identifiers.
//!
//! Individuals, interned locations and OD pairs are all numbered `0..n` in
//! the order they are first created, so each id doubles as an index into the
//! `Vec` that owns the corresponding data.  New ids are minted with
//! `TryFrom<usize>`, which fails instead of wrapping once `n` passes
//! `u32::MAX`.

use std::fmt;

use crate::DeprError;

macro_rules! dense_id {
    ($(#[$attr:meta])* $name:ident, $label:literal) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub u32);

        impl $name {
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = DeprError;

            fn try_from(index: usize) -> Result<Self, DeprError> {
                u32::try_from(index)
                    .map($name)
                    .map_err(|_| DeprError::IdOverflow { kind: $label, index })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{} {}", $label, self.0)
            }
        }
    };
}

dense_id! {
    /// Individual, numbered in population-table order.
    Uid, "uid"
}

dense_id! {
    /// Interned area code; see [`Locations`][crate::Locations].
    LocationId, "location"
}

dense_id! {
    /// One distinct (origin, destination) pair of an OD domain.
    OdId, "od"
}
