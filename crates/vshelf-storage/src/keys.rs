//! Storage key routing.
//!
//! Keys are `<aspect prefix><random id>`, e.g. `landscape/Qm9v...`. The id is
//! 32 bytes from the thread-local CSPRNG, URL-safe base64 without padding, so
//! it is always 43 characters and never contains `/` or `,`.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;

use vshelf_models::AspectClass;

/// Random bytes per key id.
pub const KEY_ID_BYTES: usize = 32;

/// Route a processed file of the given class to a fresh storage key.
pub fn route_key(class: AspectClass) -> String {
    route_key_with_rng(class, &mut rand::rng())
}

/// [`route_key`] with an explicit randomness source.
pub fn route_key_with_rng<R: RngCore + ?Sized>(class: AspectClass, rng: &mut R) -> String {
    format!("{}{}", class.key_prefix(), random_key_id(rng))
}

/// Generate a URL-safe random key id.
pub fn random_key_id<R: RngCore + ?Sized>(rng: &mut R) -> String {
    let mut bytes = [0u8; KEY_ID_BYTES];
    rng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
