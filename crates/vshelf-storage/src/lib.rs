//! S3-compatible object storage.
//!
//! This crate provides:
//! - The [`ObjectStore`] capability used by the upload pipeline
//! - An `aws-sdk-s3` backed client
//! - Storage key routing by aspect class
//! - Presigned retrieval URLs for persisted references

pub mod client;
pub mod delivery;
pub mod error;
pub mod keys;
pub mod store;

pub use client::{S3Client, S3Config};
pub use delivery::{DeliveryConfig, DeliveryUrl, VideoUrlSigner};
pub use error::{StorageError, StorageResult};
pub use keys::{random_key_id, route_key, route_key_with_rng, KEY_ID_BYTES};
pub use store::ObjectStore;

#[cfg(any(test, feature = "mock"))]
pub use store::MockObjectStore;
