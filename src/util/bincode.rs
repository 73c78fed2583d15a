//! Bincode encoding of packed `(height, block_time, tx)` records.
//!
//! Fixed-size integers, little endian. Callers go through these helpers so the
//! record layout is pinned in one place.

use bincode_do_not_use_directly as bincode;
use bincode::Options;

pub fn serialize_little<T>(value: &T) -> Result<Vec<u8>, bincode::Error>
where
    T: ?Sized + serde::Serialize,
{
    options_little().serialize(value)
}

pub fn deserialize_little<'a, T>(bytes: &'a [u8]) -> Result<T, bincode::Error>
where
    T: serde::Deserialize<'a>,
{
    options_little().deserialize(bytes)
}

#[inline]
fn options_little() -> impl Options {
    bincode::options()
        .with_fixint_encoding()
        .with_no_limit()
        .with_little_endian()
        .reject_trailing_bytes()
}
