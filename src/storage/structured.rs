//! Structured binary I/O for index files.
//!
//! [`StructWriter`] and [`StructReader`] wrap a storage stream with typed
//! little-endian primitives, variable-byte integers, length-prefixed strings,
//! and a running CRC32 checksum. Writers append the checksum as a footer on
//! close; readers that consume a file sequentially can verify it, turning
//! silent corruption into an explicit [`CaselexError::CorruptIndex`].

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{CaselexError, Result};
use crate::storage::traits::{StorageInput, StorageOutput};
use crate::util::varint::vb_encode;

/// A structured file writer for binary data.
pub struct StructWriter<W: StorageOutput> {
    writer: W,
    hasher: crc32fast::Hasher,
    position: u64,
}

impl<W: StorageOutput> StructWriter<W> {
    /// Create a new structured file writer.
    pub fn new(writer: W) -> Self {
        StructWriter {
            writer,
            hasher: crc32fast::Hasher::new(),
            position: 0,
        }
    }

    /// Write a u8 value.
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.writer.write_u8(value)?;
        self.track(&[value]);
        Ok(())
    }

    /// Write a u16 value (little-endian).
    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.writer.write_u16::<LittleEndian>(value)?;
        self.track(&value.to_le_bytes());
        Ok(())
    }

    /// Write a u32 value (little-endian).
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.writer.write_u32::<LittleEndian>(value)?;
        self.track(&value.to_le_bytes());
        Ok(())
    }

    /// Write a u64 value (little-endian).
    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        self.writer.write_u64::<LittleEndian>(value)?;
        self.track(&value.to_le_bytes());
        Ok(())
    }

    /// Write a f32 value (little-endian).
    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        self.writer.write_f32::<LittleEndian>(value)?;
        self.track(&value.to_le_bytes());
        Ok(())
    }

    /// Write a variable-byte encoded integer.
    pub fn write_varint(&mut self, value: u64) -> Result<()> {
        let encoded = vb_encode(value);
        self.writer.write_all(&encoded)?;
        self.track(&encoded);
        Ok(())
    }

    /// Write a string with a varint length prefix.
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        self.write_bytes(value.as_bytes())
    }

    /// Write raw bytes with a varint length prefix.
    pub fn write_bytes(&mut self, value: &[u8]) -> Result<()> {
        self.write_varint(value.len() as u64)?;
        self.writer.write_all(value)?;
        self.track(value);
        Ok(())
    }

    /// Write raw bytes without a length prefix.
    pub fn write_raw(&mut self, value: &[u8]) -> Result<()> {
        self.writer.write_all(value)?;
        self.track(value);
        Ok(())
    }

    /// Get the current logical position (bytes written so far).
    pub fn position(&self) -> u64 {
        self.position
    }

    fn track(&mut self, data: &[u8]) {
        self.hasher.update(data);
        self.position += data.len() as u64;
    }

    /// Write the checksum footer, then flush and sync the output.
    pub fn close(mut self) -> Result<()> {
        let checksum = self.hasher.clone().finalize();
        self.writer.write_u32::<LittleEndian>(checksum)?;
        self.writer.flush_and_sync()?;
        Ok(())
    }
}

/// A structured file reader for binary data.
pub struct StructReader<R: StorageInput> {
    reader: R,
    hasher: crc32fast::Hasher,
    position: u64,
    file_size: u64,
}

impl<R: StorageInput> StructReader<R> {
    /// Create a new structured file reader.
    pub fn new(reader: R) -> Result<Self> {
        let file_size = reader.size()?;
        Ok(StructReader {
            reader,
            hasher: crc32fast::Hasher::new(),
            position: 0,
            file_size,
        })
    }

    /// Read a u8 value.
    pub fn read_u8(&mut self) -> Result<u8> {
        let value = self.reader.read_u8()?;
        self.track(&[value]);
        Ok(value)
    }

    /// Read a u16 value (little-endian).
    pub fn read_u16(&mut self) -> Result<u16> {
        let value = self.reader.read_u16::<LittleEndian>()?;
        self.track(&value.to_le_bytes());
        Ok(value)
    }

    /// Read a u32 value (little-endian).
    pub fn read_u32(&mut self) -> Result<u32> {
        let value = self.reader.read_u32::<LittleEndian>()?;
        self.track(&value.to_le_bytes());
        Ok(value)
    }

    /// Read a u64 value (little-endian).
    pub fn read_u64(&mut self) -> Result<u64> {
        let value = self.reader.read_u64::<LittleEndian>()?;
        self.track(&value.to_le_bytes());
        Ok(value)
    }

    /// Read a f32 value (little-endian).
    pub fn read_f32(&mut self) -> Result<f32> {
        let value = self.reader.read_f32::<LittleEndian>()?;
        self.track(&value.to_le_bytes());
        Ok(value)
    }

    /// Read a variable-byte encoded integer.
    pub fn read_varint(&mut self) -> Result<u64> {
        let mut acc = 0u64;

        for _ in 0..10 {
            let byte = self.reader.read_u8()?;
            self.track(&[byte]);
            acc = (acc << 7) | (byte & 0x7F) as u64;
            if byte & 0x80 != 0 {
                return Ok(acc);
            }
        }

        Err(CaselexError::corrupt("varint overflow"))
    }

    /// Read a string with a varint length prefix.
    pub fn read_string(&mut self) -> Result<String> {
        let bytes = self.read_bytes()?;
        String::from_utf8(bytes)
            .map_err(|e| CaselexError::corrupt(format!("invalid UTF-8 in string: {e}")))
    }

    /// Read bytes with a varint length prefix.
    pub fn read_bytes(&mut self) -> Result<Vec<u8>> {
        let length = self.read_varint()? as usize;
        self.read_raw(length)
    }

    /// Read an exact number of raw bytes.
    pub fn read_raw(&mut self, length: usize) -> Result<Vec<u8>> {
        if self.position + length as u64 > self.file_size {
            return Err(CaselexError::corrupt("unexpected end of file"));
        }
        let mut bytes = vec![0u8; length];
        self.reader.read_exact(&mut bytes)?;
        self.track(&bytes);
        Ok(bytes)
    }

    /// Get the current logical position (bytes read so far).
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Get the file size in bytes.
    pub fn size(&self) -> u64 {
        self.file_size
    }

    fn track(&mut self, data: &[u8]) {
        self.hasher.update(data);
        self.position += data.len() as u64;
    }

    /// Read the checksum footer and compare it against the running checksum
    /// of everything read so far.
    ///
    /// Must be called after the entire payload has been consumed.
    pub fn verify_checksum(&mut self) -> Result<()> {
        let computed = self.hasher.clone().finalize();
        let stored = self.reader.read_u32::<LittleEndian>()?;
        self.position += 4;

        if stored != computed {
            return Err(CaselexError::corrupt(format!(
                "checksum mismatch: stored {stored:#010x}, computed {computed:#010x}"
            )));
        }
        Ok(())
    }
}
