use core::fmt;
use core::num::NonZeroU32;

use crate::error::{FcError, FcResult};

/// Compact arena index shared by every handle type.
///
/// - `u32` keeps memory small
/// - `NonZero` enables `Option<Id>` to be pointer-optimized
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(NonZeroU32);

impl Id {
    /// Create an Id from a 0-based arena index by storing index+1.
    pub fn try_from_index(index: usize) -> FcResult<Self> {
        u32::try_from(index)
            .ok()
            .and_then(|i| i.checked_add(1))
            .and_then(NonZeroU32::new)
            .map(Self)
            .ok_or(FcError::IndexOob {
                what: "arena index",
                index,
                len: u32::MAX as usize,
            })
    }

    /// Recover the 0-based index.
    pub fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.index())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Declares a typed handle over [`Id`] so variable, term and block indices
/// cannot be mixed up at call sites.
macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(Id);

        impl $name {
            pub fn try_from_index(index: usize) -> FcResult<Self> {
                Id::try_from_index(index).map(Self)
            }

            pub fn index(self) -> usize {
                self.0.index()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.index())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.index())
            }
        }
    };
}

handle!(
    /// Handle of an input or output variable inside an engine.
    ///
    /// Input and output variables live in separate arenas; the engine API
    /// says which one a handle belongs to.
    VariableId
);

handle!(
    /// Handle of a term inside its owning variable.
    TermId
);

handle!(
    /// Handle of a rule block inside an engine.
    RuleBlockId
);
