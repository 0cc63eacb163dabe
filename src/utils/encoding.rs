//! Streaming text encoding for CSV input and output.
//!
//! The CSV layer works on UTF-8. This module sits between it and the files:
//! - [`DecodingReader`] turns any supported input encoding into UTF-8
//! - [`EncodingWriter`] turns UTF-8 back into the configured output encoding
//!
//! Both are strict: malformed input or unmappable output characters become
//! `InvalidData` I/O errors instead of replacement characters.

use encoding_rs::{
    Decoder, DecoderResult, Encoder, EncoderResult, Encoding, REPLACEMENT, UTF_16BE, UTF_16LE, UTF_8,
};
use std::fmt;
use std::io::{self, Read, Write};

const BUFFER_SIZE: usize = 8192;

/// A resolved text encoding plus how byte order marks are handled.
#[derive(Clone, Copy, PartialEq)]
pub struct TextEncoding {
    encoding: &'static Encoding,
    write_bom: bool,
    // Input byte order comes from each file's BOM (`utf-16` label).
    detect_byte_order: bool,
}

impl TextEncoding {
    pub fn utf8() -> Self {
        Self { encoding: UTF_8, write_bom: false, detect_byte_order: false }
    }

    /// Resolve an encoding label.
    ///
    /// Accepts WHATWG labels (`utf-8`, `windows-1252`, `shift_jis`, ...) and the
    /// Python spellings people tend to type (`utf-8-sig`, `utf-16-le`, `latin-1`).
    ///
    /// `utf-16` reads either byte order, chosen per file by its BOM (little
    /// endian without one), and writes little endian with a BOM.
    pub fn for_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_ascii_lowercase();
        let (whatwg, write_bom, detect_byte_order) = match normalized.as_str() {
            "utf-8-sig" | "utf8-sig" | "utf_8_sig" => ("utf-8", true, false),
            "utf_8" => ("utf-8", false, false),
            "utf-16" | "utf16" | "utf_16" => ("utf-16le", true, true),
            "utf-16-le" | "utf_16_le" => ("utf-16le", false, false),
            "utf-16-be" | "utf_16_be" => ("utf-16be", false, false),
            "latin-1" | "latin_1" => ("latin1", false, false),
            other => (other, false, false),
        };

        let encoding = Encoding::for_label(whatwg.as_bytes())?;
        if encoding == REPLACEMENT {
            return None;
        }
        Some(Self { encoding, write_bom, detect_byte_order })
    }

    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    pub fn decoder<R: Read>(self, inner: R) -> DecodingReader<R> {
        DecodingReader::new(inner, self)
    }

    pub fn encoder<W: Write>(self, inner: W) -> EncodingWriter<W> {
        EncodingWriter::new(inner, self)
    }

    fn bom(&self) -> &'static [u8] {
        if !self.write_bom {
            return &[];
        }
        if self.encoding == UTF_16LE {
            &[0xff, 0xfe]
        } else if self.encoding == UTF_16BE {
            &[0xfe, 0xff]
        } else {
            &[0xef, 0xbb, 0xbf]
        }
    }
}

impl Default for TextEncoding {
    fn default() -> Self {
        Self::utf8()
    }
}

impl fmt::Debug for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextEncoding")
            .field("encoding", &self.name())
            .field("write_bom", &self.write_bom)
            .field("detect_byte_order", &self.detect_byte_order)
            .finish()
    }
}

/// Reader adapter that yields UTF-8 bytes decoded from `inner`.
pub struct DecodingReader<R> {
    inner: R,
    decoder: Decoder,
    input: Box<[u8]>,
    input_start: usize,
    input_end: usize,
    output: Box<[u8]>,
    output_start: usize,
    output_end: usize,
    utf16_only: bool,
    eof: bool,
    finished: bool,
}

impl<R: Read> DecodingReader<R> {
    fn new(inner: R, target: TextEncoding) -> Self {
        let decoder = if target.detect_byte_order {
            // Sniffs the BOM and switches to the byte order it names.
            target.encoding.new_decoder()
        } else {
            // Strips a leading BOM of the configured encoding only.
            target.encoding.new_decoder_with_bom_removal()
        };
        Self {
            inner,
            decoder,
            input: vec![0; BUFFER_SIZE].into_boxed_slice(),
            input_start: 0,
            input_end: 0,
            output: vec![0; BUFFER_SIZE].into_boxed_slice(),
            output_start: 0,
            output_end: 0,
            utf16_only: target.detect_byte_order,
            eof: false,
            finished: false,
        }
    }

    fn fill_input(&mut self) -> io::Result<()> {
        loop {
            match self.inner.read(&mut self.input) {
                Ok(n) => {
                    self.input_start = 0;
                    self.input_end = n;
                    self.eof = n == 0;
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

impl<R: Read> Read for DecodingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            if self.output_start < self.output_end {
                let available = &self.output[self.output_start..self.output_end];
                let n = available.len().min(buf.len());
                buf[..n].copy_from_slice(&available[..n]);
                self.output_start += n;
                return Ok(n);
            }
            if self.finished || buf.is_empty() {
                return Ok(0);
            }
            if self.input_start == self.input_end && !self.eof {
                self.fill_input()?;
            }

            let last = self.eof;
            let (result, read, written) = self.decoder.decode_to_utf8_without_replacement(
                &self.input[self.input_start..self.input_end],
                &mut self.output,
                last,
            );
            self.input_start += read;
            self.output_start = 0;
            self.output_end = written;

            // A UTF-8 BOM switches a sniffing decoder away from UTF-16.
            let sniffed = self.decoder.encoding();
            if self.utf16_only && sniffed != UTF_16LE && sniffed != UTF_16BE {
                self.output_end = 0;
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("byte order mark is {}, expected UTF-16", sniffed.name()),
                ));
            }

            match result {
                DecoderResult::InputEmpty => {
                    if last {
                        self.finished = true;
                    }
                }
                DecoderResult::OutputFull => {}
                DecoderResult::Malformed(_, _) => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("byte sequence is not valid {}", self.decoder.encoding().name()),
                    ));
                }
            }
        }
    }
}

/// Writer adapter that encodes the UTF-8 it receives into the target encoding.
///
/// Call [`EncodingWriter::finish`] once everything is written; stateful
/// encodings (ISO-2022-JP) emit their closing sequence there.
pub struct EncodingWriter<W> {
    inner: W,
    target: TextEncoding,
    encoder: Option<Encoder>,
    // UTF-8 bytes of a character split across two writes.
    pending: Vec<u8>,
    bom_pending: bool,
    scratch: Box<[u8]>,
}

impl<W: Write> EncodingWriter<W> {
    fn new(inner: W, target: TextEncoding) -> Self {
        let encoding = target.encoding;
        let encoder = if encoding == UTF_8 || encoding == UTF_16LE || encoding == UTF_16BE {
            None
        } else {
            Some(encoding.new_encoder())
        };
        Self {
            inner,
            target,
            encoder,
            pending: Vec::new(),
            bom_pending: target.write_bom,
            scratch: vec![0; BUFFER_SIZE].into_boxed_slice(),
        }
    }

    /// Flush the encoder state and hand back the inner writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.write_bom()?;
        if !self.pending.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "output ended in the middle of a UTF-8 sequence",
            ));
        }
        if let Some(encoder) = self.encoder.as_mut() {
            loop {
                let (result, _, written) =
                    encoder.encode_from_utf8_without_replacement("", &mut self.scratch, true);
                self.inner.write_all(&self.scratch[..written])?;
                if let EncoderResult::InputEmpty = result {
                    break;
                }
            }
        }
        self.inner.flush()?;
        Ok(self.inner)
    }

    fn write_bom(&mut self) -> io::Result<()> {
        if self.bom_pending {
            self.bom_pending = false;
            self.inner.write_all(self.target.bom())?;
        }
        Ok(())
    }

    fn encode_str(&mut self, text: &str) -> io::Result<()> {
        let encoding = self.target.encoding;
        if encoding == UTF_8 {
            return self.inner.write_all(text.as_bytes());
        }
        if encoding == UTF_16LE || encoding == UTF_16BE {
            let mut bytes = Vec::with_capacity(text.len() * 2);
            for unit in text.encode_utf16() {
                let pair = if encoding == UTF_16LE { unit.to_le_bytes() } else { unit.to_be_bytes() };
                bytes.extend_from_slice(&pair);
            }
            return self.inner.write_all(&bytes);
        }

        let Some(encoder) = self.encoder.as_mut() else {
            return self.inner.write_all(text.as_bytes());
        };
        let mut consumed = 0;
        loop {
            let (result, read, written) = encoder.encode_from_utf8_without_replacement(
                &text[consumed..],
                &mut self.scratch,
                false,
            );
            consumed += read;
            self.inner.write_all(&self.scratch[..written])?;
            match result {
                EncoderResult::InputEmpty => return Ok(()),
                EncoderResult::OutputFull => {}
                EncoderResult::Unmappable(c) => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("character {c:?} cannot be encoded as {}", encoding.name()),
                    ));
                }
            }
        }
    }
}

impl<W: Write> Write for EncodingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bom()?;

        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(buf);

        let valid_up_to = match std::str::from_utf8(&bytes) {
            Ok(_) => bytes.len(),
            // Truncated multi-byte character at the end: keep it for the next write.
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(_) => {
                return Err(io::Error::new(io::ErrorKind::InvalidData, "output is not valid UTF-8"))
            }
        };

        let (complete, rest) = bytes.split_at(valid_up_to);
        let text = std::str::from_utf8(complete)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.encode_str(text)?;
        self.pending = rest.to_vec();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
