//! Binary encoding.
//!
//! A denser, streaming counterpart of the text form. Layout (see
//! [`crate::format`] for details):
//!
//! ```text
//! stream := "RDA" version:u8 flags:u8 body
//! body   := node crc32:u32le          (LZ4 frame when flags bit 0 is set)
//! node   := tag:u8 [len:u32le utf8-bytes] [count:u32le node*]
//! ```
//!
//! Both directions work incrementally against `io::Write` / `io::Read`; the
//! reader never allocates ahead of the bytes it has actually received.
//!
//! ```rust
//! use rda::Rda;
//!
//! let mut rda = Rda::new();
//! rda[0].set_value("John");
//!
//! let mut buffer = Vec::new();
//! rda.write_stream(&mut buffer).unwrap();
//!
//! let back = Rda::read_stream(buffer.as_slice()).unwrap();
//! assert_eq!(back, rda);
//! ```

use crate::options::Compression;
use crate::{Error, Rda, RdaOptions, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};
use tracing::{debug, trace};

pub const MAGIC: &[u8; 3] = b"RDA";
pub const VERSION: u8 = 1;

const TAG_VALUE: u8 = 0b01;
const TAG_CHILDREN: u8 = 0b10;
const FLAG_LZ4: u8 = 0b01;

/// Writes trees as binary streams.
pub struct BinaryWriter<W: Write> {
    inner: W,
    options: RdaOptions,
}

impl<W: Write> BinaryWriter<W> {
    pub fn new(inner: W, options: RdaOptions) -> Self {
        BinaryWriter { inner, options }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Writes one complete stream for `rda` and flushes the sink.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DepthLimitExceeded`] if `rda` is nested too deeply, or
    /// an I/O error from the sink.
    pub fn write(&mut self, rda: &Rda) -> Result<()> {
        let compression = self.options.compression;
        self.inner.write_all(MAGIC)?;
        self.inner.write_u8(VERSION)?;
        self.inner.write_u8(compression.flag())?;

        let max_depth = self.options.max_depth;
        let body_len = match compression {
            Compression::None => write_body(&mut self.inner, rda, max_depth)?,
            Compression::Lz4 => {
                let mut encoder = lz4_flex::frame::FrameEncoder::new(&mut self.inner);
                let len = write_body(&mut encoder, rda, max_depth)?;
                encoder
                    .finish()
                    .map_err(|e| Error::io(&format!("lz4 frame: {}", e)))?;
                len
            }
        };
        self.inner.flush()?;

        debug!(body_len, ?compression, "wrote rda stream");
        Ok(())
    }
}

fn write_body<W: Write>(sink: &mut W, rda: &Rda, max_depth: usize) -> Result<u64> {
    let mut writer = FrameWriter {
        inner: sink,
        hasher: crc32fast::Hasher::new(),
        written: 0,
    };
    writer.write_node(rda, 0, max_depth)?;

    let crc = writer.hasher.finalize();
    writer.inner.write_u32::<LittleEndian>(crc)?;
    Ok(writer.written)
}

/// Sink wrapper that checksums and counts node bytes.
struct FrameWriter<'a, W: Write> {
    inner: &'a mut W,
    hasher: crc32fast::Hasher,
    written: u64,
}

impl<W: Write> Write for FrameWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<W: Write> FrameWriter<'_, W> {
    fn write_node(&mut self, rda: &Rda, depth: usize, max_depth: usize) -> Result<()> {
        let mut tag = 0;
        if rda.value.is_some() {
            tag |= TAG_VALUE;
        }
        if !rda.children.is_empty() {
            if depth >= max_depth {
                return Err(Error::depth_limit(max_depth));
            }
            tag |= TAG_CHILDREN;
        }
        self.write_u8(tag)?;

        if let Some(value) = &rda.value {
            let len = u32::try_from(value.len())
                .map_err(|_| Error::custom("scalar exceeds 4 GiB frame limit"))?;
            self.write_u32::<LittleEndian>(len)?;
            self.write_all(value.as_bytes())?;
        }

        if !rda.children.is_empty() {
            let count = u32::try_from(rda.children.len())
                .map_err(|_| Error::custom("child count exceeds u32 frame limit"))?;
            self.write_u32::<LittleEndian>(count)?;
            for child in &rda.children {
                self.write_node(child, depth + 1, max_depth)?;
            }
        }
        Ok(())
    }
}

/// Reads trees from binary streams.
pub struct BinaryReader<R: Read> {
    inner: R,
    options: RdaOptions,
}

impl<R: Read> BinaryReader<R> {
    pub fn new(inner: R, options: RdaOptions) -> Self {
        BinaryReader { inner, options }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Reads exactly one stream.
    ///
    /// # Errors
    ///
    /// Returns a parse error for a bad preamble, malformed or truncated frame,
    /// checksum mismatch or nesting beyond `max_depth`; other I/O failures are
    /// returned as [`Error::Io`].
    pub fn read(&mut self) -> Result<Rda> {
        let mut preamble = [0u8; 5];
        read_preamble(&mut self.inner, &mut preamble)?;

        if &preamble[..3] != MAGIC {
            return Err(Error::invalid_frame(0, "missing RDA magic"));
        }
        if preamble[3] != VERSION {
            return Err(Error::invalid_frame(
                3,
                &format!("unsupported version {}", preamble[3]),
            ));
        }
        let flags = preamble[4];
        if flags & !FLAG_LZ4 != 0 {
            return Err(Error::invalid_frame(
                4,
                &format!("unknown flags {:#04x}", flags),
            ));
        }

        let max_depth = self.options.max_depth;
        let rda = if flags & FLAG_LZ4 == 0 {
            read_body(&mut self.inner, max_depth)?
        } else {
            let mut source = EofGuard {
                inner: &mut self.inner,
                hit_eof: false,
            };
            let mut decoder = lz4_flex::frame::FrameDecoder::new(&mut source);
            let rda = read_body(&mut decoder, max_depth)?;
            // Consume the frame end mark; any further decompressed byte is garbage.
            let mut spare = [0u8; 1];
            let extra = decoder.read(&mut spare)?;
            drop(decoder);
            if extra != 0 {
                return Err(Error::invalid_frame(
                    preamble.len() as u64,
                    "trailing data inside compressed body",
                ));
            }
            // The decoder reports a missing end mark as a clean end of data.
            if source.hit_eof {
                return Err(Error::unexpected_eof(preamble.len(), "lz4 frame end mark"));
            }
            rda
        };

        debug!(children = rda.len(), "read rda stream");
        Ok(rda)
    }
}

/// Records whether the source ran dry. A complete frame is read with exact
/// reads up to its end mark and never sees end of input.
struct EofGuard<'a, R: Read> {
    inner: &'a mut R,
    hit_eof: bool,
}

impl<R: Read> Read for EofGuard<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n == 0 && !buf.is_empty() {
            self.hit_eof = true;
        }
        Ok(n)
    }
}

fn read_preamble<R: Read>(source: &mut R, preamble: &mut [u8; 5]) -> Result<()> {
    let mut filled = 0;
    while filled < preamble.len() {
        match source.read(&mut preamble[filled..]) {
            Ok(0) => return Err(Error::unexpected_eof(filled, "stream preamble")),
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

fn read_body<R: Read>(source: &mut R, max_depth: usize) -> Result<Rda> {
    let mut reader = FrameReader {
        inner: source,
        hasher: crc32fast::Hasher::new(),
        offset: MAGIC.len() as u64 + 2,
        max_depth,
    };
    let rda = reader.read_node(0)?;

    let found = reader.hasher.clone().finalize();
    let expected = reader
        .inner
        .read_u32::<LittleEndian>()
        .map_err(|e| map_eof(e, reader.offset, "body checksum"))?;
    if expected != found {
        return Err(Error::ChecksumMismatch { expected, found });
    }
    Ok(rda)
}

fn map_eof(err: io::Error, offset: u64, expected: &str) -> Error {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        Error::unexpected_eof(offset as usize, expected)
    } else {
        err.into()
    }
}

/// Source wrapper that checksums node bytes and tracks the offset.
struct FrameReader<'a, R: Read> {
    inner: &'a mut R,
    hasher: crc32fast::Hasher,
    offset: u64,
    max_depth: usize,
}

impl<R: Read> Read for FrameReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        self.offset += n as u64;
        Ok(n)
    }
}

impl<R: Read> FrameReader<'_, R> {
    fn read_node(&mut self, depth: usize) -> Result<Rda> {
        let tag_offset = self.offset;
        let tag = self
            .read_u8()
            .map_err(|e| map_eof(e, self.offset, "node tag"))?;
        if tag & !(TAG_VALUE | TAG_CHILDREN) != 0 {
            return Err(Error::invalid_frame(
                tag_offset,
                &format!("unknown tag {:#04x}", tag),
            ));
        }

        let mut node = Rda::new();

        if tag & TAG_VALUE != 0 {
            let len = self
                .read_u32::<LittleEndian>()
                .map_err(|e| map_eof(e, self.offset, "scalar length"))?;
            let start = self.offset;
            let mut bytes = Vec::new();
            self.by_ref().take(u64::from(len)).read_to_end(&mut bytes)?;
            if bytes.len() as u64 != u64::from(len) {
                return Err(Error::unexpected_eof(
                    self.offset as usize,
                    &format!("{} scalar bytes", len),
                ));
            }
            let value = String::from_utf8(bytes)
                .map_err(|_| Error::invalid_frame(start, "scalar is not valid UTF-8"))?;
            node.value = Some(value);
        }

        if tag & TAG_CHILDREN != 0 {
            if depth >= self.max_depth {
                return Err(Error::depth_limit(self.max_depth));
            }
            let count_offset = self.offset;
            let count = self
                .read_u32::<LittleEndian>()
                .map_err(|e| map_eof(e, self.offset, "child count"))?;
            if count == 0 {
                return Err(Error::invalid_frame(
                    count_offset,
                    "child list flagged but empty",
                ));
            }
            for _ in 0..count {
                let child = self.read_node(depth + 1)?;
                node.children.push(child);
            }
            trace!(depth, count, "read child frames");
        }

        Ok(node)
    }
}
