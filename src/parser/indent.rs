//! Indentation tracking for the parser
//!
//! The source language has no block delimiters, so the parser keeps a stack
//! of the widths of all currently open blocks. A line at the innermost
//! width continues the block, a deeper line is only legal right after a
//! block header, and a shallower line must land exactly on the width of
//! some enclosing block.
//!
//! A block opened while the parser is inside brackets (a function body in
//! a table literal or call argument list) is marked as such: a dedent out
//! of it may stop at any shallower width, because the lines around it are
//! continuation lines of the bracketed expression rather than blocks.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    width: usize,
    in_brackets: bool,
}

/// Stack of open block widths, scoped to a single parse
#[derive(Debug, Clone, Default)]
pub struct IndentTracker {
    frames: Vec<Frame>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndentError {
    /// `push` with a width that does not exceed the current one
    NotDeeper { width: usize, current: usize },
    /// A shallower line that matches no open block
    UnmatchedDedent { width: usize },
    /// `pop` or `resolve_dedent` with nothing open
    NoOpenBlock,
}

impl fmt::Display for IndentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndentError::NotDeeper { width, current } => write!(
                f,
                "block at indentation {} must be deeper than the enclosing {}",
                width, current
            ),
            IndentError::UnmatchedDedent { width } => write!(
                f,
                "dedent to indentation {} does not match any enclosing block",
                width
            ),
            IndentError::NoOpenBlock => write!(f, "no block is open"),
        }
    }
}

impl IndentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Width of the innermost open block, `None` if nothing is open
    pub fn current(&self) -> Option<usize> {
        self.frames.last().map(|frame| frame.width)
    }

    /// Number of open blocks
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Open a block at `width`, which must be strictly deeper than the
    /// current block
    pub fn push(&mut self, width: usize) -> Result<(), IndentError> {
        self.push_frame(width, false)
    }

    /// Open a block whose surrounding lines belong to a bracketed
    /// expression
    pub fn push_in_brackets(&mut self, width: usize) -> Result<(), IndentError> {
        self.push_frame(width, true)
    }

    fn push_frame(&mut self, width: usize, in_brackets: bool) -> Result<(), IndentError> {
        if let Some(current) = self.current() {
            if width <= current {
                return Err(IndentError::NotDeeper { width, current });
            }
        }
        self.frames.push(Frame { width, in_brackets });
        Ok(())
    }

    /// Close the innermost block, returning its width
    pub fn pop(&mut self) -> Result<usize, IndentError> {
        self.frames
            .pop()
            .map(|frame| frame.width)
            .ok_or(IndentError::NoOpenBlock)
    }

    /// How many blocks a line at `width` closes. Zero means the line
    /// continues the innermost block. Deeper lines are the caller's
    /// concern and also report zero.
    pub fn resolve_dedent(&self, width: usize) -> Result<usize, IndentError> {
        if self.frames.is_empty() {
            return Err(IndentError::NoOpenBlock);
        }

        for (closed, frame) in self.frames.iter().rev().enumerate() {
            if width >= frame.width {
                return if width == frame.width || closed == 0 {
                    Ok(closed)
                } else {
                    Err(IndentError::UnmatchedDedent { width })
                };
            }
            if frame.in_brackets {
                return Ok(closed + 1);
            }
        }

        Err(IndentError::UnmatchedDedent { width })
    }
}
