//! Memory-image synthesis.
//!
//! Turns a sparse, address-tagged byte description (the `verilog`-style hex
//! the cross toolchain emits) into the contiguous little-endian word image
//! the simulator's instruction ROM reads. The pipeline is:
//! 1. **Scan:** whitespace-split tokens, classified as address directives or bytes.
//! 2. **Accumulate:** a [`MemoryImage`] tracking a write cursor, last write wins.
//! 3. **Pack:** a gap-free [`WordImage`], one 8-hex-digit line per 32-bit word.
//!
//! Synthesis is a pure function of the description text and the token policy:
//! the same input always produces byte-identical output.

pub mod description;
pub mod memory;
pub mod word;

use serde::Deserialize;
use tracing::trace;

use crate::error::ImageError;
use description::Token;
pub use memory::MemoryImage;
pub use word::WordImage;

/// Policy for malformed value tokens in an image description.
///
/// Both behaviors exist in the field: the benchmark flow skips garbage
/// tokens so a partially damaged dump still produces an image, while the
/// single-test flow treats any garbage as a broken toolchain run. Malformed
/// *address directives* fail under both policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum TokenPolicy {
    /// Silently skip malformed value tokens.
    #[default]
    Lenient,
    /// Fail the whole synthesis on the first malformed token.
    Strict,
}

/// Largest byte address a write may land at, for [`synthesize`].
///
/// The packed image materializes a word for every address up to the
/// highest write, so a corrupt directive pointing far past the start
/// must fail instead of allocating.
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 64 * 1024 * 1024;

/// Synthesizes a word image from an image description.
///
/// Empty or all-whitespace input yields an empty image, never an error.
/// Writes are bounded by [`DEFAULT_MAX_IMAGE_BYTES`]; use
/// [`synthesize_bounded`] to configure the limit.
///
/// # Errors
///
/// Under [`TokenPolicy::Strict`], any malformed token fails the synthesis.
/// Under [`TokenPolicy::Lenient`], only a malformed address directive or
/// an out-of-bounds write does.
pub fn synthesize(text: &str, policy: TokenPolicy) -> Result<WordImage, ImageError> {
    synthesize_bounded(text, policy, DEFAULT_MAX_IMAGE_BYTES)
}

/// [`synthesize`] with an explicit image size limit.
///
/// A byte write at or beyond `max_bytes` fails under both policies with
/// [`ImageError::AddressBeyondLimit`]. A trailing directive beyond the
/// limit with no bytes after it still contributes nothing, as any
/// trailing directive does.
///
/// # Errors
///
/// As [`synthesize`], against `max_bytes` instead of the default limit.
pub fn synthesize_bounded(
    text: &str,
    policy: TokenPolicy,
    max_bytes: u64,
) -> Result<WordImage, ImageError> {
    let mut mem = MemoryImage::new();

    for (index, raw) in text.split_whitespace().enumerate() {
        match description::classify(raw, index) {
            Ok(Token::SetCursor(addr)) => mem.set_cursor(addr),
            Ok(Token::Byte(value)) => {
                if mem.cursor() >= max_bytes {
                    return Err(ImageError::AddressBeyondLimit {
                        address: mem.cursor(),
                        limit: max_bytes,
                    });
                }
                mem.push(value);
            }
            Err(err @ ImageError::BadByteToken { .. }) => match policy {
                TokenPolicy::Strict => return Err(err),
                TokenPolicy::Lenient => trace!(token = raw, index, "skipping malformed token"),
            },
            // Directive errors ignore the policy.
            Err(err) => return Err(err),
        }
    }

    Ok(WordImage::from_memory(&mem))
}
