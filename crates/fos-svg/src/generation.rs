//! Attribute generation counter
//!
//! Each element bumps its generation on every attribute write. Callers
//! compare generations to learn whether (and how often) the persisted
//! attribute strings changed.

/// Generation counter - incremented on every attribute write
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Generation(u32);

impl Generation {
    /// Initial generation (never mutated)
    pub const INITIAL: Self = Generation(0);

    /// Get the raw value
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Get the next generation
    #[inline]
    pub const fn next(self) -> Self {
        Generation(self.0.wrapping_add(1))
    }

    /// Number of writes between `earlier` and this generation
    #[inline]
    pub fn since(self, earlier: Self) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    /// Check if this generation is newer than another
    #[inline]
    pub fn is_newer_than(self, other: Self) -> bool {
        // Handle wraparound
        let diff = self.0.wrapping_sub(other.0);
        diff > 0 && diff < u32::MAX / 2
    }
}

impl Default for Generation {
    fn default() -> Self {
        Self::INITIAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_ordering() {
        let g0 = Generation::INITIAL;
        let g1 = g0.next();
        let g2 = g1.next();

        assert!(g1.is_newer_than(g0));
        assert!(g2.is_newer_than(g1));
        assert!(!g0.is_newer_than(g1));
        assert_eq!(g2.since(g0), 2);
    }

    #[test]
    fn test_generation_wraparound() {
        let max = Generation(u32::MAX);
        let wrapped = max.next();

        assert_eq!(wrapped.value(), 0);
        assert!(wrapped.is_newer_than(max));
        assert_eq!(wrapped.since(max), 1);
    }
}
