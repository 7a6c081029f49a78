// src/sensor/line.rs

use crate::common::dialect::LineTerminator;
use heapless::Vec;

/// Longest command line kept; further bytes are dropped until the terminator.
pub const COMMAND_CAPACITY: usize = 127;

/// One completed command line, terminator stripped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandLine {
    bytes: Vec<u8, COMMAND_CAPACITY>,
    truncated: bool,
}

impl CommandLine {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Whether bytes past [`COMMAND_CAPACITY`] were dropped from this line.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

/// Accumulates bytes into command lines for one terminator convention.
#[derive(Debug, Clone)]
pub struct LineAssembler {
    terminator: LineTerminator,
    current: CommandLine,
}

impl LineAssembler {
    pub fn new(terminator: LineTerminator) -> Self {
        LineAssembler {
            terminator,
            current: CommandLine::default(),
        }
    }

    /// Feeds one byte. Returns the finished line when `byte` is the terminator;
    /// the empty line is returned too.
    pub fn push(&mut self, byte: u8) -> Option<CommandLine> {
        if byte == self.terminator.byte() {
            return Some(core::mem::take(&mut self.current));
        }
        if byte == self.terminator.ignored() {
            return None;
        }
        if self.current.bytes.push(byte).is_err() && !self.current.truncated {
            warn!("command line exceeds {} bytes, dropping the rest", COMMAND_CAPACITY);
            self.current.truncated = true;
        }
        None
    }

    /// Bytes received since the last terminator.
    pub fn pending(&self) -> &[u8] {
        self.current.as_bytes()
    }

    /// Drops the partial line.
    pub fn clear(&mut self) {
        self.current = CommandLine::default();
    }

    /// Lazily yields the lines completed by `bytes`. A trailing partial line
    /// stays buffered for the next call.
    pub fn lines<I>(&mut self, bytes: I) -> Lines<'_, I::IntoIter>
    where
        I: IntoIterator<Item = u8>,
    {
        Lines {
            assembler: self,
            bytes: bytes.into_iter(),
        }
    }
}

/// Iterator returned by [`LineAssembler::lines`].
pub struct Lines<'a, I> {
    assembler: &'a mut LineAssembler,
    bytes: I,
}

impl<I: Iterator<Item = u8>> Iterator for Lines<'_, I> {
    type Item = CommandLine;

    fn next(&mut self) -> Option<CommandLine> {
        for byte in self.bytes.by_ref() {
            if let Some(line) = self.assembler.push(byte) {
                return Some(line);
            }
        }
        None
    }
}
