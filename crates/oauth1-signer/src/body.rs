//! Re-readable request bodies.

use std::borrow::Cow;
use std::io;

/// Request body that can be read for hashing without consuming it.
///
/// Signing needs the payload bytes while the request itself still has to be
/// sent afterwards, so the body is replayed rather than taken.
pub trait RequestBody {
    /// Return the payload bytes. Bodiless requests return an empty slice.
    fn replay(&self) -> io::Result<Cow<'_, [u8]>>;
}

impl RequestBody for () {
    fn replay(&self) -> io::Result<Cow<'_, [u8]>> {
        Ok(Cow::Borrowed(&[]))
    }
}

impl RequestBody for Vec<u8> {
    fn replay(&self) -> io::Result<Cow<'_, [u8]>> {
        Ok(Cow::Borrowed(self))
    }
}

impl RequestBody for &[u8] {
    fn replay(&self) -> io::Result<Cow<'_, [u8]>> {
        Ok(Cow::Borrowed(self))
    }
}

impl RequestBody for String {
    fn replay(&self) -> io::Result<Cow<'_, [u8]>> {
        Ok(Cow::Borrowed(self.as_bytes()))
    }
}

impl RequestBody for &str {
    fn replay(&self) -> io::Result<Cow<'_, [u8]>> {
        Ok(Cow::Borrowed(self.as_bytes()))
    }
}

impl<B: RequestBody> RequestBody for Option<B> {
    fn replay(&self) -> io::Result<Cow<'_, [u8]>> {
        match self {
            Some(body) => body.replay(),
            None => Ok(Cow::Borrowed(&[])),
        }
    }
}
