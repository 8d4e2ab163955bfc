//! Memory image files.
//!
//! A memory image is a simple text format, one word per line:
//! a zero-padded two-digit address, a colon, and a zero-padded signed
//! three-digit value, e.g. `97:-40` or `05:900`. Addresses 1-99 are
//! dumped; address 0 is excluded by convention.
//!
//! Restore parses the whole file before patching anything, so a
//! malformed line never leaves a half-applied image.

use crate::cpu::{Cpu, Memory, Word, MEMORY_SIZE};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use thiserror::Error;

/// Largest value a memory word can carry.
const WORD_MAX: Word = 999;

/// A parsed memory image: address/value patches in file order.
#[derive(Debug, Clone, Default)]
pub struct MemoryImage {
    patches: Vec<(usize, Word)>,
}

impl MemoryImage {
    /// Capture an image of a memory's cells 1-99.
    pub fn from_memory(mem: &Memory) -> Self {
        Self {
            patches: (1..MEMORY_SIZE).map(|addr| (addr, mem.read(addr))).collect(),
        }
    }

    /// Parse an image from a reader.
    ///
    /// Stops at the first malformed line; nothing parsed so far is
    /// applied anywhere.
    pub fn parse<R: BufRead>(reader: R) -> Result<Self, ImageError> {
        let mut patches = Vec::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result.map_err(|e| ImageError::Io(e.to_string()))?;
            let trimmed = line.trim();

            if trimmed.is_empty() {
                continue;
            }

            let patch = parse_line(trimmed).map_err(|message| ImageError::Parse {
                line: line_num + 1,
                message,
            })?;
            patches.push(patch);
        }

        Ok(Self { patches })
    }

    /// Write the image in line format.
    pub fn write<W: Write>(&self, mut writer: W) -> Result<(), ImageError> {
        for &(addr, value) in &self.patches {
            writeln!(writer, "{:02}:{:03}", addr, value)
                .map_err(|e| ImageError::Io(e.to_string()))?;
        }
        Ok(())
    }

    /// Patch the image into a machine's memory.
    pub fn apply(&self, cpu: &mut Cpu) {
        for &(addr, value) in &self.patches {
            cpu.set_memory(addr, value);
        }
    }

    /// Number of patches in the image.
    pub fn len(&self) -> usize {
        self.patches.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }
}

/// Parse a single `AA:VVV` line into an address/value patch.
fn parse_line(line: &str) -> Result<(usize, Word), String> {
    let (addr_tok, value_tok) = line
        .split_once(':')
        .ok_or_else(|| format!("missing ':' in '{}'", line))?;

    let addr: usize = addr_tok
        .parse()
        .map_err(|_| format!("invalid memory address '{}'", addr_tok))?;
    if addr >= MEMORY_SIZE {
        return Err(format!("memory address {} out of range (0-{})", addr, MEMORY_SIZE - 1));
    }

    let value: Word = value_tok
        .parse()
        .map_err(|_| format!("invalid memory value '{}'", value_tok))?;
    if !(-WORD_MAX..=WORD_MAX).contains(&value) {
        return Err(format!(
            "memory value {} out of range ({}..{})",
            value, -WORD_MAX, WORD_MAX
        ));
    }

    Ok((addr, value))
}

/// Load a memory image from disk.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<MemoryImage, ImageError> {
    let file = std::fs::File::open(path.as_ref()).map_err(|e| ImageError::Io(e.to_string()))?;
    MemoryImage::parse(BufReader::new(file))
}

/// Dump a memory's cells 1-99 to disk.
pub fn save_image<P: AsRef<Path>>(path: P, mem: &Memory) -> Result<(), ImageError> {
    let file = std::fs::File::create(path.as_ref()).map_err(|e| ImageError::Io(e.to_string()))?;
    MemoryImage::from_memory(mem).write(file)
}

/// Errors that can occur during image dump/restore.
#[derive(Debug, Clone, Error)]
pub enum ImageError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_image_line_format() {
        let mut mem = Memory::new();
        mem.write(1, 197);
        mem.write(97, -40);
        mem.write(99, -4);

        let mut buf = Vec::new();
        MemoryImage::from_memory(&mem).write(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 99);
        assert_eq!(lines[0], "01:197");
        assert_eq!(lines[1], "02:000");
        assert_eq!(lines[96], "97:-40");
        assert_eq!(lines[98], "99:-04");
        assert!(!text.contains("00:"));
    }

    #[test]
    fn test_roundtrip_through_fresh_machine() {
        let mut source = Cpu::new();
        source.set_memory(10, 421);
        source.set_memory(42, -999);
        source.set_memory(96, 7);

        let mut buf = Vec::new();
        MemoryImage::from_memory(&source.mem).write(&mut buf).unwrap();

        let mut target = Cpu::new();
        target.hard_reset();
        MemoryImage::parse(&buf[..]).unwrap().apply(&mut target);

        for addr in 1..MEMORY_SIZE {
            assert_eq!(target.mem.read(addr), source.mem.read(addr), "cell {}", addr);
        }
    }

    #[test]
    fn test_parse_missing_colon() {
        let err = MemoryImage::parse("10 197\n".as_bytes()).unwrap_err();
        match err {
            ImageError::Parse { line, message } => {
                assert_eq!(line, 1);
                assert!(message.contains("missing ':'"), "{}", message);
                assert!(message.contains("10 197"), "{}", message);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_bad_address() {
        let err = MemoryImage::parse("ab:197\n".as_bytes()).unwrap_err();
        match err {
            ImageError::Parse { message, .. } => {
                assert!(message.contains("'ab'"), "{}", message);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_address_out_of_range() {
        let err = MemoryImage::parse("05:000\n120:000\n".as_bytes()).unwrap_err();
        match err {
            ImageError::Parse { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("120"), "{}", message);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_bad_value() {
        let err = MemoryImage::parse("05:9x7\n".as_bytes()).unwrap_err();
        match err {
            ImageError::Parse { message, .. } => {
                assert!(message.contains("'9x7'"), "{}", message);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_value_out_of_range() {
        assert!(MemoryImage::parse("05:1000\n".as_bytes()).is_err());
        assert!(MemoryImage::parse("05:-1000\n".as_bytes()).is_err());
        assert!(MemoryImage::parse("05:999\n".as_bytes()).is_ok());
        assert!(MemoryImage::parse("05:-999\n".as_bytes()).is_ok());
    }

    #[test]
    fn test_parse_stops_at_first_error() {
        // The bad line aborts the parse even though later lines are fine.
        let err = MemoryImage::parse("01:100\nbad\n03:300\n".as_bytes()).unwrap_err();
        match err {
            ImageError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let img = MemoryImage::parse("01:100\n\n02:200\n".as_bytes()).unwrap();
        assert_eq!(img.len(), 2);
    }

    proptest! {
        #[test]
        fn prop_line_roundtrip(addr in 0usize..100, value in -999i16..=999) {
            let line = format!("{:02}:{:03}", addr, value);
            prop_assert_eq!(parse_line(&line).unwrap(), (addr, value));
        }
    }
}
