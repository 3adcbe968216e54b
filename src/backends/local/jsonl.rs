// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! JSON Lines encoding for `pushitems.jsonl`.
//!
//! Records are written with `", "` and `": "` separators, sorted keys and
//! non-ASCII characters escaped as `\uXXXX`, the same shape other push
//! tooling emits, so existing readers and diffs of these files keep working.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};

use crate::items::PushItemRecord;

/// Compact JSON with a single space after each `,` and `:`, ASCII only.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(fragment[start..i].as_bytes())?;
            // Characters outside the BMP become a surrogate pair
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = i + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

/// Append one record, terminated by a newline.
pub(super) fn write_record<W: Write>(writer: &mut W, record: &PushItemRecord) -> io::Result<()> {
    let mut serializer = Serializer::with_formatter(&mut *writer, SpacedFormatter);
    record.serialize(&mut serializer).map_err(io::Error::from)?;
    writer.write_all(b"\n")
}
