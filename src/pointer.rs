//! Pointers into the content of a file, used to delimit snippets.

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// A position in a file, counted in bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ByteOffsetPointer {
    /// SPDX id of the referenced file.
    pub reference: Option<String>,
    /// Bytes from the start of the file.
    pub offset: Option<i64>,
}

/// A position in a file, counted in lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineCharPointer {
    /// SPDX id of the referenced file.
    pub reference: Option<String>,
    /// Line number, counted from 1.
    #[serde(rename = "lineNumber")]
    pub line_number: Option<i64>,
}

/// Either kind of single pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SinglePointer {
    /// A byte offset.
    ByteOffset(ByteOffsetPointer),
    /// A line number.
    LineChar(LineCharPointer),
}

/// The concrete kind of a [`SinglePointer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PointerKind {
    /// [`SinglePointer::ByteOffset`]
    ByteOffset,
    /// [`SinglePointer::LineChar`]
    LineChar,
}

impl SinglePointer {
    /// A complete byte offset pointer.
    pub fn byte_offset(reference: impl Into<String>, offset: i64) -> Self {
        SinglePointer::ByteOffset(ByteOffsetPointer {
            reference: Some(reference.into()),
            offset: Some(offset),
        })
    }

    /// A complete line pointer.
    pub fn line_char(reference: impl Into<String>, line_number: i64) -> Self {
        SinglePointer::LineChar(LineCharPointer {
            reference: Some(reference.into()),
            line_number: Some(line_number),
        })
    }

    /// Which kind of pointer this is.
    pub fn kind(&self) -> PointerKind {
        match self {
            SinglePointer::ByteOffset(_) => PointerKind::ByteOffset,
            SinglePointer::LineChar(_) => PointerKind::LineChar,
        }
    }

    /// SPDX id of the file pointed into.
    pub fn reference(&self) -> Option<&str> {
        match self {
            SinglePointer::ByteOffset(p) => p.reference.as_deref(),
            SinglePointer::LineChar(p) => p.reference.as_deref(),
        }
    }

    /// The offset or line number.
    pub fn value(&self) -> Option<i64> {
        match self {
            SinglePointer::ByteOffset(p) => p.offset,
            SinglePointer::LineChar(p) => p.line_number,
        }
    }

    fn value_name(&self) -> &'static str {
        match self {
            SinglePointer::ByteOffset(_) => "offset",
            SinglePointer::LineChar(_) => "line number",
        }
    }

    /// Problems with this pointer, empty when it is well formed.
    pub fn verify(&self) -> Vec<String> {
        let mut problems = vec![];
        if self.reference().is_none() {
            problems.push("missing reference".to_string());
        }
        match self.value() {
            None => problems.push(format!("missing {}", self.value_name())),
            Some(v) if v < 0 => problems.push(format!("negative {} {}", self.value_name(), v)),
            Some(_) => {}
        }
        problems
    }

    /// Whether both pointers reference the same element at the same position.
    pub fn equivalent(&self, other: &SinglePointer) -> bool {
        self.kind() == other.kind()
            && self.reference() == other.reference()
            && self.value() == other.value()
    }
}

impl Ord for SinglePointer {
    fn cmp(&self, other: &Self) -> Ordering {
        // `None` sorts before any `Some`, for both the reference and the value.
        self.reference()
            .cmp(&other.reference())
            .then_with(|| self.value().cmp(&other.value()))
            .then_with(|| self.kind().cmp(&other.kind()))
    }
}

impl PartialOrd for SinglePointer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for SinglePointer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.value() {
            Some(v) => write!(f, "{}", v),
            None => write!(f, "?"),
        }
    }
}

/// A range between two pointers of the same kind into the same file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartEndPointer {
    /// Where the range starts, inclusive.
    #[serde(rename = "startPointer")]
    pub start: Option<SinglePointer>,
    /// Where the range ends, inclusive.
    #[serde(rename = "endPointer")]
    pub end: Option<SinglePointer>,
}

impl StartEndPointer {
    /// A range with both ends set.
    pub fn new(start: SinglePointer, end: SinglePointer) -> Self {
        StartEndPointer {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Parse `start:end` into a range of `kind` pointers into `reference`.
    pub fn parse(text: &str, reference: Option<&str>, kind: PointerKind) -> Result<Self, String> {
        let (start, end) = text
            .trim()
            .split_once(':')
            .ok_or_else(|| format!("expected '<start>:<end>', found '{}'", text.trim()))?;

        let number = |s: &str| -> Result<i64, String> {
            s.trim()
                .parse::<i64>()
                .map_err(|e| format!("'{}' is not a number: {}", s.trim(), e))
        };
        let pointer = |value: i64| {
            let reference = reference.map(ToOwned::to_owned);
            match kind {
                PointerKind::ByteOffset => SinglePointer::ByteOffset(ByteOffsetPointer {
                    reference,
                    offset: Some(value),
                }),
                PointerKind::LineChar => SinglePointer::LineChar(LineCharPointer {
                    reference,
                    line_number: Some(value),
                }),
            }
        };

        Ok(StartEndPointer::new(
            pointer(number(start)?),
            pointer(number(end)?),
        ))
    }

    /// Problems with the range, empty when it is well formed.
    ///
    /// Ordering and kind are only compared once both ends are individually
    /// valid, so one bad pointer yields one diagnostic.
    pub fn verify(&self) -> Vec<String> {
        let mut problems = vec![];

        let start = match &self.start {
            Some(p) => Some(p),
            None => {
                problems.push("missing start pointer".to_string());
                None
            }
        };
        let end = match &self.end {
            Some(p) => Some(p),
            None => {
                problems.push("missing end pointer".to_string());
                None
            }
        };

        let (start, end) = match (start, end) {
            (Some(start), Some(end)) => (start, end),
            _ => return problems,
        };

        let start_problems = start.verify();
        let end_problems = end.verify();
        let valid = start_problems.is_empty() && end_problems.is_empty();
        problems.extend(start_problems.into_iter().map(|p| format!("start pointer: {}", p)));
        problems.extend(end_problems.into_iter().map(|p| format!("end pointer: {}", p)));
        if !valid {
            return problems;
        }

        if start.kind() != end.kind() {
            problems.push("start and end pointers are of different types".to_string());
        } else if start.reference() != end.reference() {
            problems.push("start and end pointers reference different elements".to_string());
        } else if start.value() > end.value() {
            problems.push(format!("start {} is after end {}", start, end));
        }

        problems
    }

    /// Give ends without a reference the given one.
    pub fn fill_reference(&mut self, reference: &str) {
        for pointer in [&mut self.start, &mut self.end].into_iter().flatten() {
            let slot = match pointer {
                SinglePointer::ByteOffset(p) => &mut p.reference,
                SinglePointer::LineChar(p) => &mut p.reference,
            };
            if slot.is_none() {
                *slot = Some(reference.to_string());
            }
        }
    }

    /// The kind shared by both ends, if they agree.
    pub fn kind(&self) -> Option<PointerKind> {
        match (&self.start, &self.end) {
            (Some(s), Some(e)) if s.kind() == e.kind() => Some(s.kind()),
            _ => None,
        }
    }

    /// Whether both ranges have equivalent ends.
    pub fn equivalent(&self, other: &StartEndPointer) -> bool {
        fn same(a: &Option<SinglePointer>, b: &Option<SinglePointer>) -> bool {
            match (a, b) {
                (Some(a), Some(b)) => a.equivalent(b),
                (None, None) => true,
                _ => false,
            }
        }
        same(&self.start, &other.start) && same(&self.end, &other.end)
    }
}

impl Display for StartEndPointer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let show = |p: &Option<SinglePointer>| p.as_ref().map_or("?".to_string(), |p| p.to_string());
        write!(f, "{}:{}", show(&self.start), show(&self.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILE: &str = "SPDXRef-File-1";

    #[test]
    fn negative_end_is_one_problem() {
        let range = StartEndPointer::new(
            SinglePointer::byte_offset(FILE, 15),
            SinglePointer::byte_offset(FILE, -1),
        );
        let problems = range.verify();
        assert_eq!(problems.len(), 1, "{:?}", problems);
        assert!(problems[0].contains("negative"));
    }

    #[test]
    fn mixed_kinds_are_one_problem() {
        let range = StartEndPointer::new(
            SinglePointer::byte_offset(FILE, 15),
            SinglePointer::line_char(FILE, 30),
        );
        assert_eq!(range.verify().len(), 1);
        assert_eq!(range.kind(), None);
    }

    #[test]
    fn reversed_range_is_reported() {
        let range = StartEndPointer::new(
            SinglePointer::line_char(FILE, 9),
            SinglePointer::line_char(FILE, 3),
        );
        assert_eq!(range.verify(), vec!["start 9 is after end 3".to_string()]);
    }

    #[test]
    fn missing_ends_are_reported() {
        let range = StartEndPointer {
            start: None,
            end: None,
        };
        assert_eq!(range.verify().len(), 2);
    }

    #[test]
    fn well_formed_range_is_clean() {
        let range = StartEndPointer::parse("310:420", Some(FILE), PointerKind::ByteOffset).unwrap();
        assert!(range.verify().is_empty());
        assert_eq!(range.to_string(), "310:420");
        assert_eq!(range.kind(), Some(PointerKind::ByteOffset));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(StartEndPointer::parse("310", Some(FILE), PointerKind::ByteOffset).is_err());
        assert!(StartEndPointer::parse("a:4", Some(FILE), PointerKind::LineChar).is_err());
    }

    #[test]
    fn ordering_is_by_reference_then_value() {
        let mut pointers = vec![
            SinglePointer::byte_offset("b", 1),
            SinglePointer::byte_offset("a", 20),
            SinglePointer::byte_offset("a", 3),
            SinglePointer::ByteOffset(ByteOffsetPointer {
                reference: Some("a".to_string()),
                offset: None,
            }),
        ];
        pointers.sort();
        let values: Vec<_> = pointers.iter().map(|p| (p.reference(), p.value())).collect();
        assert_eq!(
            values,
            vec![
                (Some("a"), None),
                (Some("a"), Some(3)),
                (Some("a"), Some(20)),
                (Some("b"), Some(1)),
            ]
        );
    }

    #[test]
    fn equivalence_is_structural() {
        let a = StartEndPointer::new(SinglePointer::line_char(FILE, 1), SinglePointer::line_char(FILE, 5));
        let b = StartEndPointer::parse("1:5", Some(FILE), PointerKind::LineChar).unwrap();
        assert!(a.equivalent(&b));
    }
}
