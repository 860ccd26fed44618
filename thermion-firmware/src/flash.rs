//! Profile sector in on-board flash
//!
//! One 4 KB erase sector at the end of flash, reserved in memory.x.
//! Writes are read-modify-write over the whole sector.

use embassy_rp::flash::{Blocking, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;

use thermion_hal::{NvStorage, StorageError};

/// Flash size on the Pico
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Offset of the profile sector from the start of flash
pub const PROFILE_SECTOR_START: u32 = (FLASH_SIZE - ERASE_SIZE) as u32;

/// Non-volatile storage backed by the last flash sector
pub struct FlashRegion<'d> {
    flash: Flash<'d, FLASH, Blocking, FLASH_SIZE>,
}

impl<'d> FlashRegion<'d> {
    pub fn new(flash: Peri<'d, FLASH>) -> Self {
        Self {
            flash: Flash::new_blocking(flash),
        }
    }

    fn check(offset: u32, len: usize) -> Result<u32, StorageError> {
        let end = offset as usize + len;
        if end > ERASE_SIZE {
            return Err(StorageError::OutOfBounds);
        }
        Ok(PROFILE_SECTOR_START + offset)
    }
}

impl NvStorage for FlashRegion<'_> {
    fn capacity(&self) -> usize {
        ERASE_SIZE
    }

    fn get(&mut self, offset: u32, buffer: &mut [u8]) -> Result<(), StorageError> {
        let addr = Self::check(offset, buffer.len())?;
        self.flash
            .blocking_read(addr, buffer)
            .map_err(|_| StorageError::Device)
    }

    fn put(&mut self, offset: u32, data: &[u8]) -> Result<(), StorageError> {
        Self::check(offset, data.len())?;

        let mut sector = [0u8; ERASE_SIZE];
        self.flash
            .blocking_read(PROFILE_SECTOR_START, &mut sector)
            .map_err(|_| StorageError::Device)?;

        let start = offset as usize;
        sector[start..start + data.len()].copy_from_slice(data);

        self.flash
            .blocking_erase(PROFILE_SECTOR_START, PROFILE_SECTOR_START + ERASE_SIZE as u32)
            .map_err(|_| StorageError::Device)?;
        self.flash
            .blocking_write(PROFILE_SECTOR_START, &sector)
            .map_err(|_| StorageError::Device)
    }
}
