//! Element reader
//!
//! Walks a byte slice one element at a time. Every read is bounds-checked:
//! an element that runs past the end of the input yields
//! `LampError::MalformedResponse` and the reader stops.

use crate::error::{LampError, Result};
use super::control::{is_uint, split_control, Width, WIDTH_BIT};

/// Decoded element value, borrowing byte array payloads from the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value<'a> {
    UInt { value: u16, width: Width },
    Bytes(&'a [u8]),
}

/// One element: its tag and value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element<'a> {
    pub tag: u8,
    pub value: Value<'a>,
}

impl<'a> Element<'a> {
    /// The integer value, if this is an unsigned integer element
    pub fn as_uint(&self) -> Option<u16> {
        match self.value {
            Value::UInt { value, .. } => Some(value),
            Value::Bytes(_) => None,
        }
    }

    /// The integer value, if this is an unsigned integer of exactly `width`
    pub fn as_uint_of(&self, width: Width) -> Option<u16> {
        match self.value {
            Value::UInt { value, width: w } if w == width => Some(value),
            _ => None,
        }
    }

    /// The payload, if this is a byte array element
    pub fn as_bytes(&self) -> Option<&'a [u8]> {
        match self.value {
            Value::Bytes(data) => Some(data),
            Value::UInt { .. } => None,
        }
    }
}

/// Sequential reader over a TLV byte sequence
///
/// Yields `Result<Element>`; after the first error it yields nothing more.
pub struct TlvReader<'a> {
    data: &'a [u8],
    pos: usize,
    failed: bool,
}

impl<'a> TlvReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            failed: false,
        }
    }

    /// Offset of the next control byte
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Read one byte at `at`, or fail with the element start for context
    fn byte_at(&self, at: usize) -> Result<u8> {
        self.data.get(at).copied().ok_or_else(|| {
            LampError::MalformedResponse(format!(
                "element at offset {} truncated: need byte {}, input is {} bytes",
                self.pos,
                at,
                self.data.len()
            ))
        })
    }

    /// Check that an element ending at `end` (exclusive) fits in the input
    fn check_end(&self, end: usize) -> Result<()> {
        if end > self.data.len() {
            return Err(LampError::MalformedResponse(format!(
                "element at offset {} declares {} bytes, only {} available",
                self.pos,
                end - self.pos,
                self.data.len() - self.pos
            )));
        }
        Ok(())
    }

    /// Read one element at the current position
    ///
    /// A 1-byte uint whose length byte is 0 has no value byte to read and is
    /// rejected, where a literal walk would read past it and advance by two.
    fn read_element(&mut self) -> Result<Element<'a>> {
        let start = self.pos;
        let (tag, base) = split_control(self.data[start]);

        let (value, end) = if is_uint(base) {
            if base & WIDTH_BIT == 0 {
                // [control][len][value ...]; only the first value byte counts
                let len = self.byte_at(start + 1)? as usize;
                if len == 0 {
                    return Err(LampError::MalformedResponse(format!(
                        "1-byte uint at offset {} has zero length",
                        start
                    )));
                }
                let end = start + 2 + len;
                self.check_end(end)?;
                let value = self.data[start + 2] as u16;
                (Value::UInt { value, width: Width::One }, end)
            } else {
                let end = start + 3;
                self.check_end(end)?;
                let value = u16::from_le_bytes([self.data[start + 1], self.data[start + 2]]);
                (Value::UInt { value, width: Width::Two }, end)
            }
        } else {
            let len = self.byte_at(start + 1)? as usize;
            let end = start + 2 + len;
            self.check_end(end)?;
            (Value::Bytes(&self.data[start + 2..end]), end)
        };

        self.pos = end;
        Ok(Element { tag, value })
    }
}

impl<'a> Iterator for TlvReader<'a> {
    type Item = Result<Element<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.data.len() {
            return None;
        }
        let result = self.read_element();
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}
