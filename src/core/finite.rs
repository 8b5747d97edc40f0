//! Non-finite float detection for structured values
//!
//! `serde_json` writes `NaN` and infinities as `null`. Structured values are
//! walked with [`FiniteCheck`] first so that such values are reported as an
//! encoding failure instead of silently changing meaning.

use serde::ser::{self, Error as _};
use serde::Serialize;

type Result = serde_json::Result<()>;

/// Serializer that produces nothing and fails on the first non-finite float.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FiniteCheck;

/// Fails if `value` contains a `NaN` or infinite float anywhere.
pub(crate) fn ensure_finite<T: Serialize + ?Sized>(value: &T) -> Result {
    value.serialize(FiniteCheck)
}

fn check(v: f64) -> Result {
    if v.is_finite() {
        Ok(())
    } else {
        Err(serde_json::Error::custom(format!("unsupported float value: {}", v)))
    }
}

impl ser::Serializer for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_bool(self, _v: bool) -> Result {
        Ok(())
    }

    fn serialize_i8(self, _v: i8) -> Result {
        Ok(())
    }

    fn serialize_i16(self, _v: i16) -> Result {
        Ok(())
    }

    fn serialize_i32(self, _v: i32) -> Result {
        Ok(())
    }

    fn serialize_i64(self, _v: i64) -> Result {
        Ok(())
    }

    fn serialize_i128(self, _v: i128) -> Result {
        Ok(())
    }

    fn serialize_u8(self, _v: u8) -> Result {
        Ok(())
    }

    fn serialize_u16(self, _v: u16) -> Result {
        Ok(())
    }

    fn serialize_u32(self, _v: u32) -> Result {
        Ok(())
    }

    fn serialize_u64(self, _v: u64) -> Result {
        Ok(())
    }

    fn serialize_u128(self, _v: u128) -> Result {
        Ok(())
    }

    fn serialize_f32(self, v: f32) -> Result {
        check(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result {
        check(v)
    }

    fn serialize_char(self, _v: char) -> Result {
        Ok(())
    }

    fn serialize_str(self, _v: &str) -> Result {
        Ok(())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result {
        Ok(())
    }

    fn serialize_none(self) -> Result {
        Ok(())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result {
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result {
        Ok(())
    }

    fn serialize_unit_variant(self, _name: &'static str, _index: u32, _variant: &'static str) -> Result {
        Ok(())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(self, _name: &'static str, value: &T) -> Result {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Result {
        value.serialize(self)
    }

    fn serialize_seq(self, _len: Option<usize>) -> serde_json::Result<Self> {
        Ok(self)
    }

    fn serialize_tuple(self, _len: usize) -> serde_json::Result<Self> {
        Ok(self)
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> serde_json::Result<Self> {
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> serde_json::Result<Self> {
        Ok(self)
    }

    fn serialize_map(self, _len: Option<usize>) -> serde_json::Result<Self> {
        Ok(self)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> serde_json::Result<Self> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> serde_json::Result<Self> {
        Ok(self)
    }
}

impl ser::SerializeSeq for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result {
        value.serialize(*self)
    }

    fn end(self) -> Result {
        Ok(())
    }
}

impl ser::SerializeTuple for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result {
        value.serialize(*self)
    }

    fn end(self) -> Result {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result {
        value.serialize(*self)
    }

    fn end(self) -> Result {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result {
        value.serialize(*self)
    }

    fn end(self) -> Result {
        Ok(())
    }
}

impl ser::SerializeMap for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result {
        key.serialize(*self)
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result {
        value.serialize(*self)
    }

    fn end(self) -> Result {
        Ok(())
    }
}

impl ser::SerializeStruct for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _key: &'static str, value: &T) -> Result {
        value.serialize(*self)
    }

    fn end(self) -> Result {
        Ok(())
    }
}

impl ser::SerializeStructVariant for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _key: &'static str, value: &T) -> Result {
        value.serialize(*self)
    }

    fn end(self) -> Result {
        Ok(())
    }
}
