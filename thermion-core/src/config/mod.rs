//! Configuration types
//!
//! The control profile and its persisted block format.

pub mod persist;
pub mod profile;

pub use persist::{
    decode_block, encode_block, PersistError, ProfileStore, PROFILE_BLOCK_SIZE, PROFILE_MAGIC,
    PROFILE_OFFSET, PROFILE_VERSION,
};
pub use profile::Profile;
