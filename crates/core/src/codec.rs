//! Byte-level codec primitives
//!
//! [`MobfWrite`] and [`MobfRead`] extend any `std::io::Write` / `Read` with
//! the exact-width big-endian encodings every MOBF value is built from.
//! Writers return the number of bytes they produced so callers can account
//! for lengths without re-measuring buffers.
//!
//! ## Encodings
//!
//! ```text
//! bool        u8 (0 = false, 1 = true; any non-zero reads as true)
//! i8..i64     big-endian two's complement
//! f32, f64    big-endian IEEE-754
//! string      byte_len: u32 BE, bytes: [u8; byte_len]
//! timestamp   see crate::timestamp
//! ```
//!
//! A read that runs out of bytes fails with
//! [`MobfError::TruncatedStream`](crate::MobfError::TruncatedStream).

use crate::charset::Charset;
use crate::error::{MobfError, MobfResult};
use crate::timestamp::Timestamp;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};
use std::mem;

/// Byte width of the string length prefix
pub const STRING_LEN_PREFIX: usize = mem::size_of::<u32>();

/// Writing side of the codec
pub trait MobfWrite: Write {
    /// Write a boolean as one byte
    fn write_bool(&mut self, value: bool) -> MobfResult<usize> {
        self.write_u8(value as u8)?;
        Ok(1)
    }

    /// Write a signed byte
    fn write_byte(&mut self, value: i8) -> MobfResult<usize> {
        self.write_i8(value)?;
        Ok(mem::size_of::<i8>())
    }

    /// Write a 16-bit integer
    fn write_short(&mut self, value: i16) -> MobfResult<usize> {
        self.write_i16::<BigEndian>(value)?;
        Ok(mem::size_of::<i16>())
    }

    /// Write a 32-bit integer
    fn write_int32(&mut self, value: i32) -> MobfResult<usize> {
        self.write_i32::<BigEndian>(value)?;
        Ok(mem::size_of::<i32>())
    }

    /// Write a 64-bit integer
    fn write_long(&mut self, value: i64) -> MobfResult<usize> {
        self.write_i64::<BigEndian>(value)?;
        Ok(mem::size_of::<i64>())
    }

    /// Write an IEEE-754 single
    fn write_float(&mut self, value: f32) -> MobfResult<usize> {
        self.write_f32::<BigEndian>(value)?;
        Ok(mem::size_of::<f32>())
    }

    /// Write an IEEE-754 double
    fn write_double(&mut self, value: f64) -> MobfResult<usize> {
        self.write_f64::<BigEndian>(value)?;
        Ok(mem::size_of::<f64>())
    }

    /// Write a one-byte type id
    fn write_type_id(&mut self, id: u8) -> MobfResult<usize> {
        self.write_u8(id)?;
        Ok(1)
    }

    /// Write a 32-bit element count
    fn write_count(&mut self, count: usize) -> MobfResult<usize> {
        let count = u32::try_from(count).map_err(|_| MobfError::LengthOverflow(count))?;
        self.write_u32::<BigEndian>(count)?;
        Ok(mem::size_of::<u32>())
    }

    /// Write a length-prefixed string in `charset`
    fn write_string(&mut self, value: &str, charset: Charset) -> MobfResult<usize> {
        let bytes = charset.encode(value);
        let prefix = self.write_count(bytes.len())?;
        self.write_all(&bytes)?;
        Ok(prefix + bytes.len())
    }

    /// Write a timestamp
    fn write_timestamp(&mut self, value: &Timestamp) -> MobfResult<usize> {
        value.write_to(self)
    }
}

impl<W: Write + ?Sized> MobfWrite for W {}

/// Reading side of the codec
pub trait MobfRead: Read {
    /// Read a one-byte boolean
    fn read_bool(&mut self) -> MobfResult<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// Read a signed byte
    fn read_byte(&mut self) -> MobfResult<i8> {
        Ok(self.read_i8()?)
    }

    /// Read a 16-bit integer
    fn read_short(&mut self) -> MobfResult<i16> {
        Ok(self.read_i16::<BigEndian>()?)
    }

    /// Read a 32-bit integer
    fn read_int32(&mut self) -> MobfResult<i32> {
        Ok(self.read_i32::<BigEndian>()?)
    }

    /// Read a 64-bit integer
    fn read_long(&mut self) -> MobfResult<i64> {
        Ok(self.read_i64::<BigEndian>()?)
    }

    /// Read an IEEE-754 single
    fn read_float(&mut self) -> MobfResult<f32> {
        Ok(self.read_f32::<BigEndian>()?)
    }

    /// Read an IEEE-754 double
    fn read_double(&mut self) -> MobfResult<f64> {
        Ok(self.read_f64::<BigEndian>()?)
    }

    /// Read a one-byte type id
    fn read_type_id(&mut self) -> MobfResult<u8> {
        Ok(self.read_u8()?)
    }

    /// Read a 32-bit element count
    fn read_count(&mut self) -> MobfResult<usize> {
        Ok(self.read_u32::<BigEndian>()? as usize)
    }

    /// Read a length-prefixed string in `charset`
    fn read_string(&mut self, charset: Charset) -> MobfResult<String> {
        let len = self.read_count()?;
        // Grow with the data rather than trusting the prefix up front
        let mut bytes = Vec::new();
        let read = Read::take(&mut *self, len as u64).read_to_end(&mut bytes)?;
        if read != len {
            return Err(MobfError::truncated(format!(
                "string declared {} bytes, stream held {}",
                len, read
            )));
        }
        charset.decode(bytes)
    }

    /// Read a timestamp
    fn read_timestamp(&mut self) -> MobfResult<Timestamp> {
        Timestamp::read_from(self)
    }
}

impl<R: Read + ?Sized> MobfRead for R {}
