// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The vertex layout mini-language.
//!
//! A format string describes the byte layout of one vertex buffer as a sequence of
//! `<count><shape><width>` tokens, optionally separated by whitespace, followed by an
//! optional divisor marker:
//!
//! | Token | Meaning |
//! |---|---|
//! | `f`, `f4` | 32-bit float |
//! | `f1`, `f2` | 8/16-bit unsigned, normalized to float |
//! | `i1`, `i2`, `i`/`i4` | signed integer |
//! | `u1`, `u2`, `u`/`u4` | unsigned integer |
//! | `d`, `d8` | 64-bit float |
//! | `x`/`x1`, `x2`, `x4`, `x8` | padding bytes, bound to nothing |
//! | `/v`, `/i`, `/<N>i`, `/r` | per vertex, per instance, every N instances, per render |
//!
//! For example `"3f 2x4 /i"` is three floats followed by eight padding bytes, stepped once
//! per instance.

use super::enums::ScalarType;

/// Divisor used by the `/r` (per render) marker.
pub const PER_RENDER_DIVISOR: u32 = 0x7fff_ffff;

/// One element of a parsed format string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatNode {
    /// Shape code: `'f'`, `'i'`, `'u'`, `'d'` or `'x'` for padding.
    pub shape: char,
    /// Number of scalars.
    pub count: usize,
    /// Size of one scalar in bytes.
    pub size: usize,
    /// Source scalar type, `None` for padding.
    pub scalar: Option<ScalarType>,
    /// Integer source converted to a normalized float.
    pub normalized: bool,
}

impl FormatNode {
    /// Returns `true` for padding nodes, which consume bytes but bind nothing.
    pub fn is_padding(&self) -> bool {
        self.shape == 'x'
    }

    /// Total bytes covered by this node.
    pub fn byte_size(&self) -> usize {
        self.count * self.size
    }
}

/// Aggregate information about a whole format string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatInfo {
    /// Number of non-padding nodes.
    pub nodes: usize,
    /// Total byte size of one element, padding included.
    pub size: usize,
    /// Instancing divisor; 0 steps per vertex.
    pub divisor: u32,
    /// `false` if the string is empty or malformed.
    pub valid: bool,
}

/// A restartable cursor over a format string.
///
/// Iterating yields nodes until the end of the string, a divisor marker, or a syntax
/// error; [`FormatIterator::info`] tells these apart. Scanning is deterministic, so
/// `info` can be called before, during, or after iteration.
#[derive(Debug, Clone)]
pub struct FormatIterator<'a> {
    source: &'a [u8],
    pos: usize,
}

enum Step {
    Node(FormatNode),
    Divisor(u32),
    End,
    Invalid,
}

impl<'a> FormatIterator<'a> {
    /// Creates a cursor at the start of `format`.
    pub fn new(format: &'a str) -> Self {
        Self {
            source: format.as_bytes(),
            pos: 0,
        }
    }

    /// Scans the whole string from the beginning and summarizes it.
    pub fn info(&self) -> FormatInfo {
        let mut cursor = FormatIterator::new_from_bytes(self.source);
        let mut info = FormatInfo::default();
        let mut tokens = 0usize;

        loop {
            match cursor.step() {
                Step::Node(node) => {
                    tokens += 1;
                    if !node.is_padding() {
                        info.nodes += 1;
                    }
                    match info.size.checked_add(node.byte_size()) {
                        Some(size) => info.size = size,
                        None => return FormatInfo::default(),
                    }
                }
                Step::Divisor(divisor) => {
                    info.divisor = divisor;
                    info.valid = tokens > 0;
                    return info;
                }
                Step::End => {
                    info.valid = tokens > 0;
                    return info;
                }
                Step::Invalid => return FormatInfo::default(),
            }
        }
    }

    fn new_from_bytes(source: &'a [u8]) -> Self {
        Self { source, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// Reads a decimal number, `None` if there are no digits or it overflows.
    fn number(&mut self) -> Option<usize> {
        let start = self.pos;
        let mut value = 0usize;
        while let Some(c) = self.peek().filter(u8::is_ascii_digit) {
            value = value.checked_mul(10)?.checked_add(usize::from(c - b'0'))?;
            self.pos += 1;
        }
        (self.pos > start).then_some(value)
    }

    fn has_digit(&self) -> bool {
        self.peek().is_some_and(|c| c.is_ascii_digit())
    }

    fn step(&mut self) -> Step {
        self.skip_whitespace();

        let Some(c) = self.peek() else {
            return Step::End;
        };

        if c == b'/' {
            self.pos += 1;
            return self.divisor();
        }

        let count = if self.has_digit() {
            match self.number() {
                Some(count) if count > 0 => count,
                _ => return Step::Invalid,
            }
        } else {
            1
        };

        let Some(shape) = self.peek() else {
            return Step::Invalid;
        };
        self.pos += 1;

        let width = if self.has_digit() {
            match self.number() {
                Some(width) => Some(width),
                None => return Step::Invalid,
            }
        } else {
            None
        };

        let (size, scalar, normalized) = match (shape, width) {
            (b'f', None | Some(4)) => (4, Some(ScalarType::F32), false),
            (b'f', Some(1)) => (1, Some(ScalarType::U8), true),
            (b'f', Some(2)) => (2, Some(ScalarType::U16), true),
            (b'i', Some(1)) => (1, Some(ScalarType::I8), false),
            (b'i', Some(2)) => (2, Some(ScalarType::I16), false),
            (b'i', None | Some(4)) => (4, Some(ScalarType::I32), false),
            (b'u', Some(1)) => (1, Some(ScalarType::U8), false),
            (b'u', Some(2)) => (2, Some(ScalarType::U16), false),
            (b'u', None | Some(4)) => (4, Some(ScalarType::U32), false),
            (b'd', None | Some(8)) => (8, Some(ScalarType::F64), false),
            (b'x', None | Some(1)) => (1, None, false),
            (b'x', Some(w @ (2 | 4 | 8))) => (w, None, false),
            _ => return Step::Invalid,
        };

        if count.checked_mul(size).is_none() {
            return Step::Invalid;
        }

        Step::Node(FormatNode {
            shape: char::from(shape),
            count,
            size,
            scalar,
            normalized,
        })
    }

    fn divisor(&mut self) -> Step {
        let divisor = match self.peek() {
            Some(b'v') => {
                self.pos += 1;
                0
            }
            Some(b'r') => {
                self.pos += 1;
                PER_RENDER_DIVISOR
            }
            Some(b'i') => {
                self.pos += 1;
                1
            }
            Some(c) if c.is_ascii_digit() => {
                let Some(n) = self.number().and_then(|n| u32::try_from(n).ok()) else {
                    return Step::Invalid;
                };
                if n == 0 || self.peek() != Some(b'i') {
                    return Step::Invalid;
                }
                self.pos += 1;
                n
            }
            _ => return Step::Invalid,
        };

        // The marker must close the string.
        self.skip_whitespace();
        if self.peek().is_some() {
            return Step::Invalid;
        }
        Step::Divisor(divisor)
    }
}

impl Iterator for FormatIterator<'_> {
    type Item = FormatNode;

    fn next(&mut self) -> Option<Self::Item> {
        match self.step() {
            Step::Node(node) => Some(node),
            _ => {
                self.pos = self.source.len();
                None
            }
        }
    }
}

/// Parses `format` into its nodes and aggregate info.
pub fn parse(format: &str) -> (Vec<FormatNode>, FormatInfo) {
    let iter = FormatIterator::new(format);
    let info = iter.info();
    if !info.valid {
        return (Vec::new(), info);
    }
    (iter.collect(), info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_counts_and_widths() {
        let (nodes, info) = parse("3f 2u1 i2");
        assert!(info.valid);
        assert_eq!(info.nodes, 3);
        assert_eq!(info.size, 12 + 2 + 2);
        assert_eq!(info.divisor, 0);

        assert_eq!(nodes[0].shape, 'f');
        assert_eq!(nodes[0].count, 3);
        assert_eq!(nodes[0].scalar, Some(ScalarType::F32));
        assert_eq!(nodes[1].scalar, Some(ScalarType::U8));
        assert_eq!(nodes[1].size, 1);
        assert_eq!(nodes[2].shape, 'i');
        assert_eq!(nodes[2].scalar, Some(ScalarType::I16));
    }

    #[test]
    fn normalized_floats_keep_the_float_shape() {
        let (nodes, info) = parse("4f1");
        assert!(info.valid);
        assert_eq!(nodes[0].shape, 'f');
        assert!(nodes[0].normalized);
        assert_eq!(info.size, 4);
    }

    #[test]
    fn padding_counts_bytes_but_not_nodes() {
        let (nodes, info) = parse("2f 3x4 1d");
        assert!(info.valid);
        assert_eq!(info.nodes, 2);
        assert_eq!(info.size, 8 + 12 + 8);
        assert!(nodes[1].is_padding());
        assert_eq!(nodes[1].byte_size(), 12);
    }

    #[test]
    fn divisor_markers() {
        assert_eq!(parse("2f/v").1.divisor, 0);
        assert_eq!(parse("2f /i").1.divisor, 1);
        assert_eq!(parse("2f /4i").1.divisor, 4);
        assert_eq!(parse("2f /r").1.divisor, PER_RENDER_DIVISOR);
        assert!(parse("2f /i").1.valid);
    }

    #[test]
    fn malformed_formats_are_invalid() {
        for format in ["", "   ", "3q", "f3", "0f", "2f /", "2f /0i", "2f /i 3f", "x3", "/i"] {
            let info = FormatIterator::new(format).info();
            assert!(!info.valid, "{format:?} should be invalid");
        }
    }

    #[test]
    fn info_is_deterministic_and_matches_nodes() {
        for format in ["3f", "2f 3x4 1d", "4f1 2i2 /3i", "16f", "1u 1i 1f 1d 1x8"] {
            let iter = FormatIterator::new(format);
            let first = iter.info();
            let second = iter.info();
            assert_eq!(first, second);
            assert!(first.valid);

            let total: usize = iter.clone().map(|node| node.byte_size()).sum();
            assert_eq!(total, first.size, "{format:?}");
        }
    }

    #[test]
    fn info_is_unaffected_by_iteration() {
        let mut iter = FormatIterator::new("2f 2f");
        let before = iter.info();
        assert!(iter.next().is_some());
        assert_eq!(iter.info(), before);
        assert!(iter.next().is_some());
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }
}
