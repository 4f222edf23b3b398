//! Image description tokens.
//!
//! An image description is plain text: tokens separated by arbitrary
//! whitespace, one or many per line. A token beginning with `@` is an
//! address directive (hex digits after the `@` give an absolute byte
//! address); any other token is a hexadecimal byte value. There is no
//! checksum, length prefix, or line-count header.

use crate::error::ImageError;

/// A classified description token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// `@HEX` — move the write cursor to an absolute byte address.
    SetCursor(u64),
    /// A hex byte value, written at the cursor; the cursor advances by one.
    Byte(u8),
}

/// Classifies one raw token.
///
/// `index` is the token's zero-based position in the description and is only
/// used for error reporting.
///
/// # Errors
///
/// [`ImageError::BadDirective`] if an `@` token has no valid hex address,
/// [`ImageError::BadByteToken`] if a value token is not a hex byte in 00..FF.
pub fn classify(token: &str, index: usize) -> Result<Token, ImageError> {
    if let Some(hex) = token.strip_prefix('@') {
        u64::from_str_radix(hex, 16)
            .map(Token::SetCursor)
            .map_err(|_| ImageError::BadDirective {
                token: token.to_string(),
                index,
            })
    } else {
        u8::from_str_radix(token, 16)
            .map(Token::Byte)
            .map_err(|_| ImageError::BadByteToken {
                token: token.to_string(),
                index,
            })
    }
}
