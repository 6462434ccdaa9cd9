//! A `heed` codec that stores values with `postcard`, the pack's compact wire format.
//!
//! `heed` ships `SerdeBincode`/`SerdeJson` codecs behind optional features; this crate
//! wires up the same adapter shape for `postcard` instead, keeping payload vectors
//! (multiple rows per NameIndex key) compact on disk.

use std::borrow::Cow;
use std::marker::PhantomData;

use heed::{BoxedError, BytesDecode, BytesEncode};
use serde::{Deserialize, Serialize};

pub struct Postcard<T> {
    marker: PhantomData<T>,
}

impl<'a, T: 'a> BytesEncode<'a> for Postcard<T>
where
    T: Serialize,
{
    type EItem = T;

    fn bytes_encode(item: &'a Self::EItem) -> Result<Cow<'a, [u8]>, BoxedError> {
        Ok(Cow::Owned(postcard::to_allocvec(item)?))
    }
}

impl<'a, T: 'a> BytesDecode<'a> for Postcard<T>
where
    T: Deserialize<'a>,
{
    type DItem = T;

    fn bytes_decode(bytes: &'a [u8]) -> Result<Self::DItem, BoxedError> {
        Ok(postcard::from_bytes(bytes)?)
    }
}
