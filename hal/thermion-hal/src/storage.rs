//! Non-volatile storage abstraction
//!
//! The controller persists one opaque block at a fixed offset. Offsets are
//! relative to the region the board reserves for settings.

/// Errors from storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Underlying flash/EEPROM operation failed
    Device,
    /// Offset plus length runs past the end of the region
    OutOfBounds,
    /// Offset or length violates the device's alignment rules
    Unaligned,
}

/// Fixed-offset persistent storage
///
/// `put` replaces the stored bytes at `offset`; implementations on flash
/// are responsible for erasing the affected sector first.
pub trait NvStorage {
    /// Size of the storage region in bytes
    fn capacity(&self) -> usize;

    /// Read `buffer.len()` bytes starting at `offset`
    fn get(&mut self, offset: u32, buffer: &mut [u8]) -> Result<(), StorageError>;

    /// Write `data` starting at `offset`
    fn put(&mut self, offset: u32, data: &[u8]) -> Result<(), StorageError>;
}
