//! Profile persistence
//!
//! The profile is written as one fixed-size block at a fixed offset:
//!
//! ```text
//! ┌────────┬─────────┬──────────────────┬───────┬─────────┐
//! │ MAGIC  │ VERSION │ PROFILE          │ CRC32 │ padding │
//! │ 4B     │ 1B      │ postcard, varlen │ var   │ zeros   │
//! └────────┴─────────┴──────────────────┴───────┴─────────┘
//! ```
//!
//! The CRC covers the encoded profile bytes. A block whose magic, version
//! or CRC does not match is rejected as a whole; nothing is partially
//! applied.

use serde::{Deserialize, Serialize};

use thermion_hal::{NvStorage, StorageError};

use super::profile::Profile;

/// Magic bytes identifying a profile block
pub const PROFILE_MAGIC: [u8; 4] = *b"THRM";

/// Current profile layout version
///
/// Bump whenever a field is added, removed or reordered in [`Profile`].
pub const PROFILE_VERSION: u8 = 1;

/// Size of the persisted block in bytes
pub const PROFILE_BLOCK_SIZE: usize = 256;

/// Default offset of the block within the storage region
pub const PROFILE_OFFSET: u32 = 0;

/// Profile persistence errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PersistError {
    /// Storage port failed
    Storage(StorageError),
    /// Profile does not fit in the block
    Encode,
    /// Block contents could not be decoded
    Decode,
    /// Block was never written (or is not ours)
    BadMagic,
    /// Block was written by a different profile layout
    VersionMismatch { found: u8 },
    /// CRC mismatch
    Checksum,
}

impl From<StorageError> for PersistError {
    fn from(e: StorageError) -> Self {
        PersistError::Storage(e)
    }
}

#[derive(Serialize, Deserialize)]
struct BlockHeader {
    magic: [u8; 4],
    version: u8,
}

/// Encode a profile into a storage block
pub fn encode_block(profile: &Profile) -> Result<[u8; PROFILE_BLOCK_SIZE], PersistError> {
    let mut block = [0u8; PROFILE_BLOCK_SIZE];
    let header = BlockHeader {
        magic: PROFILE_MAGIC,
        version: PROFILE_VERSION,
    };

    let header_len = postcard::to_slice(&header, &mut block)
        .map_err(|_| PersistError::Encode)?
        .len();
    let body_len = postcard::to_slice(profile, &mut block[header_len..])
        .map_err(|_| PersistError::Encode)?
        .len();

    let body_end = header_len + body_len;
    let crc = crc32(&block[header_len..body_end]);
    postcard::to_slice(&crc, &mut block[body_end..]).map_err(|_| PersistError::Encode)?;

    Ok(block)
}

/// Decode and validate a storage block
pub fn decode_block(block: &[u8]) -> Result<Profile, PersistError> {
    let (header, rest) =
        postcard::take_from_bytes::<BlockHeader>(block).map_err(|_| PersistError::Decode)?;

    if header.magic != PROFILE_MAGIC {
        return Err(PersistError::BadMagic);
    }
    if header.version != PROFILE_VERSION {
        return Err(PersistError::VersionMismatch {
            found: header.version,
        });
    }

    let (profile, tail) =
        postcard::take_from_bytes::<Profile>(rest).map_err(|_| PersistError::Decode)?;
    let body = &rest[..rest.len() - tail.len()];

    let (crc, _) = postcard::take_from_bytes::<u32>(tail).map_err(|_| PersistError::Decode)?;
    if crc != crc32(body) {
        return Err(PersistError::Checksum);
    }

    Ok(profile)
}

/// Loads and saves the profile block at a fixed offset
#[derive(Debug, Clone, Copy)]
pub struct ProfileStore {
    offset: u32,
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::new(PROFILE_OFFSET)
    }
}

impl ProfileStore {
    /// Create a store for the block at `offset`
    pub const fn new(offset: u32) -> Self {
        Self { offset }
    }

    /// Read the block and decode it
    pub fn load<S: NvStorage + ?Sized>(&self, storage: &mut S) -> Result<Profile, PersistError> {
        let mut block = [0u8; PROFILE_BLOCK_SIZE];
        storage.get(self.offset, &mut block)?;
        decode_block(&block)
    }

    /// Encode the profile and write the whole block
    pub fn save<S: NvStorage + ?Sized>(
        &self,
        storage: &mut S,
        profile: &Profile,
    ) -> Result<(), PersistError> {
        let block = encode_block(profile)?;
        storage.put(self.offset, &block)?;
        Ok(())
    }
}

/// CRC32 (IEEE 802.3 polynomial)
fn crc32(data: &[u8]) -> u32 {
    const POLY: u32 = 0xEDB88320;
    let mut crc: u32 = 0xFFFFFFFF;

    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ POLY;
            } else {
                crc >>= 1;
            }
        }
    }

    !crc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemStorage;

    fn tuned_profile() -> Profile {
        Profile {
            kp: 123.5,
            ki: 0.25,
            setpoint_c: 72.0,
            plot: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_crc32_check_value() {
        assert_eq!(crc32(b"123456789"), 0xCBF43926);
    }

    #[test]
    fn test_save_then_load() {
        let mut storage = MemStorage::new();
        let store = ProfileStore::default();

        store.save(&mut storage, &tuned_profile()).unwrap();
        assert_eq!(store.load(&mut storage).unwrap(), tuned_profile());
    }

    #[test]
    fn test_erased_storage_is_bad_magic() {
        let mut storage = MemStorage::new();
        let result = ProfileStore::default().load(&mut storage);
        assert_eq!(result, Err(PersistError::BadMagic));
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let mut block = encode_block(&Profile::default()).unwrap();
        block[4] = PROFILE_VERSION + 1;
        assert_eq!(
            decode_block(&block),
            Err(PersistError::VersionMismatch {
                found: PROFILE_VERSION + 1
            })
        );
    }

    #[test]
    fn test_corrupted_body_rejected() {
        let mut block = encode_block(&tuned_profile()).unwrap();
        // First byte of the profile body (adc_pin)
        block[5] ^= 0x01;
        assert_eq!(decode_block(&block), Err(PersistError::Checksum));
    }

    #[test]
    fn test_storage_failure_surfaces() {
        let mut storage = MemStorage::new();
        storage.fail = true;
        let store = ProfileStore::default();

        assert_eq!(
            store.save(&mut storage, &Profile::default()),
            Err(PersistError::Storage(StorageError::Device))
        );
        assert_eq!(
            store.load(&mut storage),
            Err(PersistError::Storage(StorageError::Device))
        );
    }

    #[test]
    fn test_offset_is_respected() {
        let mut storage = MemStorage::new();
        let store = ProfileStore::new(512);
        store.save(&mut storage, &tuned_profile()).unwrap();

        assert_eq!(
            ProfileStore::new(0).load(&mut storage),
            Err(PersistError::BadMagic)
        );
        assert_eq!(store.load(&mut storage).unwrap(), tuned_profile());
    }
}
