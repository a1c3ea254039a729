extern crate alloc;
use alloc::collections::TryReserveError;
use alloc::vec::Vec;

/// Grow-only region allocator.
///
/// Values are placed into growing backing storage and addressed by opaque
/// handles. Nothing is reclaimed individually: the whole region is released
/// in one operation when it is dropped. Handles are valid for the lifetime
/// of the region and never alias.
#[derive(Debug)]
pub struct Region<T> {
    slots: Vec<T>,
}

impl<T> Region<T> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Place a value in the region and return its handle.
    ///
    /// Backing storage grows geometrically; growth failure is reported
    /// instead of aborting.
    pub fn alloc(&mut self, value: T) -> Result<u32, TryReserveError> {
        if self.slots.len() == self.slots.capacity() {
            self.slots.try_reserve(1)?;
        }
        let handle = self.slots.len() as u32;
        self.slots.push(value);
        Ok(handle)
    }

    /// Resolve a handle returned by `alloc` on this region.
    pub fn get(&self, handle: u32) -> &T {
        &self.slots[handle as usize]
    }

    pub fn get_mut(&mut self, handle: u32) -> &mut T {
        &mut self.slots[handle as usize]
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<T> Default for Region<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_distinct() {
        let mut region = Region::new();
        let a = region.alloc(1u32).unwrap();
        let b = region.alloc(2u32).unwrap();
        assert_ne!(a, b);
        assert_eq!(*region.get(a), 1);
        assert_eq!(*region.get(b), 2);
    }

    #[test]
    fn values_survive_growth() {
        let mut region = Region::new();
        let handles: Vec<u32> = (0..10_000).map(|i| region.alloc(i).unwrap()).collect();
        for (i, &h) in handles.iter().enumerate() {
            assert_eq!(*region.get(h), i);
        }
        assert_eq!(region.len(), 10_000);
    }

    #[test]
    fn get_mut_updates_in_place() {
        let mut region = Region::new();
        let h = region.alloc(5i32).unwrap();
        *region.get_mut(h) += 10;
        assert_eq!(*region.get(h), 15);
    }

    #[test]
    fn starts_empty() {
        let region: Region<u8> = Region::new();
        assert!(region.is_empty());
        assert_eq!(region.len(), 0);
    }
}
