//! Header parser for the npy container
//!
//! The prelude is fixed-layout binary; the header is a restricted Python
//! dictionary literal, tokenized and parsed by recursive descent.

mod cursor;
mod dict;
mod prelude;
mod shape;
mod token;

pub use cursor::{ByteCursor, Parser};
pub use dict::parse_dict;
pub use prelude::{Prelude, parse_magic_version, parse_prelude};
pub use shape::parse_shape;
pub use token::{Lexeme, Token, token};

use crate::config::LoadOptions;
use crate::error::{NpyError, Result};
use crate::types::Header;

/// Reject header lengths above the configured limit
pub(crate) fn check_header_len(prelude: &Prelude, options: &LoadOptions) -> Result<()> {
    let limit = options.header_limit();
    if prelude.header_len > limit {
        return Err(NpyError::HeaderTooLarge {
            len: prelude.header_len,
            limit,
        });
    }
    Ok(())
}

/// Parse the header text that follows the prelude
pub fn parse_header_text(text: &[u8], options: &LoadOptions) -> Result<Header> {
    let (header, _) = parse_dict(options.max_dim, options.reject_duplicate_keys)
        .parse(ByteCursor::new(text))?;
    Ok(header)
}

/// Parse prelude and header from the start of a buffer.
///
/// The buffer may extend past the header; only the declared header region
/// is handed to the dictionary parser.
pub fn parse_header(bytes: &[u8], options: &LoadOptions) -> Result<(Prelude, Header)> {
    let prelude = parse_prelude(bytes)?;
    check_header_len(&prelude, options)?;

    let end = prelude.payload_offset();
    if bytes.len() < end {
        return Err(NpyError::Truncated {
            expected: end as u64,
            actual: bytes.len() as u64,
        });
    }
    let header = parse_header_text(&bytes[prelude.consumed..end], options)?;
    Ok((prelude, header))
}
