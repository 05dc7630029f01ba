//! # Handles
//!
//! Handles are the only thing code outside the store ever holds:
//! - Lower 32 bits: index into the handle table
//! - Upper 32 bits: generation counter for detecting stale handles

/// Stable identifier for an object owned by a [`PackedStore`](super::PackedStore).
///
/// A handle keeps designating the same logical object while the store moves
/// that object around internally. It only stops being valid when the object
/// is erased or the whole store is cleared. The index may later be reissued,
/// but always with a new generation, so a stale handle never aliases the new
/// object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Handle(u64);

impl Handle {
    /// Creates a handle from index and generation.
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | (index as u64))
    }

    /// Returns the index portion of the handle.
    ///
    /// This is the small integer the handle table is keyed by.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// Returns the generation portion of the handle.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Raw 64-bit representation.
    #[inline]
    #[must_use]
    pub const fn to_bits(self) -> u64 {
        self.0
    }

    /// Rebuilds a handle from [`Handle::to_bits`].
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// A handle that is never issued.
    pub const NULL: Self = Self(u64::MAX);

    /// Checks if this is the null handle.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u64::MAX
    }
}

impl Default for Handle {
    fn default() -> Self {
        Self::NULL
    }
}

impl std::fmt::Display for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}v{}", self.index(), self.generation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_parts() {
        let handle = Handle::new(12345, 67890);
        assert_eq!(handle.index(), 12345);
        assert_eq!(handle.generation(), 67890);
        assert_eq!(Handle::from_bits(handle.to_bits()), handle);
    }

    #[test]
    fn test_null_handle() {
        assert!(Handle::default().is_null());
        assert!(!Handle::new(0, 0).is_null());
        assert_eq!(Handle::new(3, 1).to_string(), "3v1");
    }
}
