use serde::{Deserialize, Serialize};
use std::fmt;

/// A capacity or requirement across the three dimensions we track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceVector {
    pub compute: i64,
    pub memory: i64,
    pub storage: i64,
}

impl ResourceVector {
    pub fn new(compute: i64, memory: i64, storage: i64) -> Self {
        Self { compute, memory, storage }
    }

    /// True iff every dimension of `requested` fits inside this vector.
    pub fn fits(&self, requested: &ResourceVector) -> bool {
        requested.compute <= self.compute
            && requested.memory <= self.memory
            && requested.storage <= self.storage
    }

    /// Componentwise subtract. Performs no check of its own: the caller must
    /// have verified `fits` inside the same critical section, otherwise a
    /// component can go negative.
    pub fn reserve(&mut self, requested: &ResourceVector) {
        self.compute -= requested.compute;
        self.memory -= requested.memory;
        self.storage -= requested.storage;
    }

    /// Componentwise add. No upper bound is enforced; release amounts must
    /// exactly mirror prior reservations.
    pub fn release(&mut self, requested: &ResourceVector) {
        self.compute += requested.compute;
        self.memory += requested.memory;
        self.storage += requested.storage;
    }
}

impl fmt::Display for ResourceVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(cpu: {}, mem: {}, disk: {})",
            self.compute, self.memory, self.storage
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_is_componentwise() {
        let cap = ResourceVector::new(12, 16000, 20000);
        assert!(cap.fits(&ResourceVector::new(12, 16000, 20000)));
        assert!(cap.fits(&ResourceVector::new(1, 1, 1)));
        assert!(!cap.fits(&ResourceVector::new(13, 1, 1)));
        assert!(!cap.fits(&ResourceVector::new(1, 16001, 1)));
        assert!(!cap.fits(&ResourceVector::new(1, 1, 20001)));
    }

    #[test]
    fn reserve_then_release_restores_exactly() {
        let mut avail = ResourceVector::new(16, 20000, 20000);
        let req = ResourceVector::new(2, 1500, 50);

        avail.reserve(&req);
        assert_eq!(avail, ResourceVector::new(14, 18500, 19950));

        avail.release(&req);
        assert_eq!(avail, ResourceVector::new(16, 20000, 20000));
    }
}
