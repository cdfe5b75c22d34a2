// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Thin adapters between block-oriented streams and the element-at-a-time
//! access the codecs want. Neither adapter alters semantics.

use crate::{AvroResult, error::Details};
use oval::Buffer;
use std::io::{Read, Write};

const DEFAULT_CAPACITY: usize = 8 * 1024;

/// Yields bytes one at a time (with single-byte lookahead) from a
/// block-producing reader.
pub struct BlockReader<R> {
    inner: R,
    buffer: Buffer,
    eof: bool,
}

impl<R: Read> BlockReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_capacity(inner, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(inner: R, capacity: usize) -> Self {
        Self {
            inner,
            buffer: Buffer::with_capacity(capacity.max(1)),
            eof: false,
        }
    }

    /// Pull the next block from the underlying reader. Returns the number of
    /// bytes added, zero meaning end of input.
    fn refill(&mut self) -> AvroResult<usize> {
        if self.eof {
            return Ok(0);
        }
        if self.buffer.available_space() == 0 {
            self.buffer.shift();
        }
        let n = self
            .inner
            .read(self.buffer.space())
            .map_err(Details::ReadBytes)?;
        if n == 0 {
            self.eof = true;
        }
        self.buffer.fill(n);
        Ok(n)
    }

    /// The next byte, or `None` at end of input.
    pub fn next_byte(&mut self) -> AvroResult<Option<u8>> {
        if self.buffer.available_data() == 0 && self.refill()? == 0 {
            return Ok(None);
        }
        let byte = self.buffer.data()[0];
        self.buffer.consume(1);
        Ok(Some(byte))
    }

    /// Look at the next byte without consuming it.
    pub fn peek_byte(&mut self) -> AvroResult<Option<u8>> {
        if self.buffer.available_data() == 0 && self.refill()? == 0 {
            return Ok(None);
        }
        Ok(Some(self.buffer.data()[0]))
    }

    /// Fill `out` completely or fail with [`Details::UnexpectedEof`].
    pub fn read_exact(&mut self, out: &mut [u8]) -> AvroResult<()> {
        let mut filled = 0;
        while filled < out.len() {
            let available = self.buffer.available_data();
            if available == 0 {
                if self.refill()? == 0 {
                    return Err(Details::UnexpectedEof.into());
                }
                continue;
            }
            let take = available.min(out.len() - filled);
            out[filled..filled + take].copy_from_slice(&self.buffer.data()[..take]);
            self.buffer.consume(take);
            filled += take;
        }
        Ok(())
    }

    /// Discard exactly `n` bytes.
    pub fn skip(&mut self, mut n: usize) -> AvroResult<()> {
        while n > 0 {
            let available = self.buffer.available_data();
            if available == 0 {
                if self.refill()? == 0 {
                    return Err(Details::UnexpectedEof.into());
                }
                continue;
            }
            let take = available.min(n);
            self.buffer.consume(take);
            n -= take;
        }
        Ok(())
    }
}

impl<R: Read> Read for BlockReader<R> {
    fn read(&mut self, out: &mut [u8]) -> std::io::Result<usize> {
        if out.is_empty() {
            return Ok(0);
        }
        if self.buffer.available_data() == 0 {
            match self.refill() {
                Ok(0) => return Ok(0),
                Ok(_) => {}
                Err(_) => {
                    return Err(std::io::Error::new(
                        std::io::ErrorKind::Other,
                        "failed to refill buffer",
                    ));
                }
            }
        }
        let take = self.buffer.available_data().min(out.len());
        out[..take].copy_from_slice(&self.buffer.data()[..take]);
        self.buffer.consume(take);
        Ok(take)
    }
}

/// Buffers element-sized writes and flushes whole blocks to the sink.
pub struct BlockWriter<W: Write> {
    inner: W,
    buffer: Buffer,
}

impl<W: Write> BlockWriter<W> {
    pub fn new(inner: W) -> Self {
        Self::with_capacity(inner, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(inner: W, capacity: usize) -> Self {
        Self {
            inner,
            buffer: Buffer::with_capacity(capacity.max(1)),
        }
    }

    pub fn write_byte(&mut self, byte: u8) -> AvroResult<()> {
        self.write_all_bytes(&[byte])
    }

    pub fn write_all_bytes(&mut self, mut bytes: &[u8]) -> AvroResult<()> {
        while !bytes.is_empty() {
            if self.buffer.available_space() == 0 {
                self.flush_buffer()?;
            }
            let take = self.buffer.available_space().min(bytes.len());
            self.buffer.space()[..take].copy_from_slice(&bytes[..take]);
            self.buffer.fill(take);
            bytes = &bytes[take..];
        }
        Ok(())
    }

    fn flush_buffer(&mut self) -> AvroResult<()> {
        let data_len = self.buffer.available_data();
        if data_len > 0 {
            self.inner
                .write_all(&self.buffer.data()[..data_len])
                .map_err(Details::WriteBytes)?;
            self.buffer.consume(data_len);
            self.buffer.shift();
        }
        Ok(())
    }

    /// Flush buffered bytes and the underlying sink.
    pub fn flush(&mut self) -> AvroResult<()> {
        self.flush_buffer()?;
        self.inner.flush().map_err(Details::WriteBytes)?;
        Ok(())
    }

    /// Flush and hand back the sink.
    pub fn into_inner(mut self) -> AvroResult<W> {
        self.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> Write for BlockWriter<W> {
    fn write(&mut self, bytes: &[u8]) -> std::io::Result<usize> {
        self.write_all_bytes(bytes)
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::Other, "buffered write failed"))?;
        Ok(bytes.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        BlockWriter::flush(self)
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::Other, "buffered flush failed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reader_yields_bytes_in_order() {
        let data = b"abc".to_vec();
        let mut reader = BlockReader::with_capacity(&data[..], 2);
        assert_eq!(reader.peek_byte().unwrap(), Some(b'a'));
        assert_eq!(reader.next_byte().unwrap(), Some(b'a'));
        assert_eq!(reader.next_byte().unwrap(), Some(b'b'));
        assert_eq!(reader.peek_byte().unwrap(), Some(b'c'));
        assert_eq!(reader.next_byte().unwrap(), Some(b'c'));
        assert_eq!(reader.next_byte().unwrap(), None);
        assert_eq!(reader.peek_byte().unwrap(), None);
    }

    #[test]
    fn reader_read_exact_spans_blocks() {
        let data: Vec<u8> = (0..32).collect();
        let mut reader = BlockReader::with_capacity(&data[..], 4);
        let mut out = [0u8; 32];
        reader.read_exact(&mut out).unwrap();
        assert_eq!(out.to_vec(), data);
        assert!(reader.read_exact(&mut [0u8; 1]).is_err());
    }

    #[test]
    fn reader_skip() {
        let data: Vec<u8> = (0..16).collect();
        let mut reader = BlockReader::with_capacity(&data[..], 4);
        reader.skip(10).unwrap();
        assert_eq!(reader.next_byte().unwrap(), Some(10));
        assert!(reader.skip(100).is_err());
    }

    #[test]
    fn writer_flushes_blocks() {
        let mut out = Vec::new();
        {
            let mut writer = BlockWriter::with_capacity(&mut out, 4);
            writer.write_all_bytes(b"hello world").unwrap();
            writer.flush().unwrap();
        }
        assert_eq!(out, b"hello world");
    }

    #[test]
    fn writer_small_writes_buffered_until_flush() {
        let mut out = Vec::new();
        let mut writer = BlockWriter::with_capacity(&mut out, 64);
        writer.write_byte(1).unwrap();
        writer.write_byte(2).unwrap();
        writer.flush().unwrap();
        drop(writer);
        assert_eq!(out, vec![1, 2]);
    }
}
