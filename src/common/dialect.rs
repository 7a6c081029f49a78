// src/common/dialect.rs

/// The three wire dialects of the text protocol. They are not compatible with
/// each other; a firmware instance speaks exactly one.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dialect {
    /// Single-letter queries `v`, `n`, `c`. CR-terminated input,
    /// `<letter> <value>\r\n` responses.
    Basic,
    /// Queries `v`, `d`. CR-terminated input, pipe-delimited `\r` responses.
    Pipe,
    /// Queries `v`, `s <i>`, `t <i>`, `h <i>`. LF-terminated input,
    /// space-delimited `\r\n` responses, unsolicited periodic samples.
    #[default]
    Periodic,
}

/// Which byte ends a command line and which one is ignored.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineTerminator {
    /// CR ends the line, LF is discarded.
    Cr,
    /// LF ends the line, CR is discarded.
    Lf,
}

impl LineTerminator {
    /// The byte that completes a line.
    pub const fn byte(&self) -> u8 {
        match self {
            LineTerminator::Cr => b'\r',
            LineTerminator::Lf => b'\n',
        }
    }

    /// The opposite-convention byte, dropped wherever it appears.
    pub const fn ignored(&self) -> u8 {
        match self {
            LineTerminator::Cr => b'\n',
            LineTerminator::Lf => b'\r',
        }
    }
}

impl Dialect {
    /// Input (command) line terminator convention.
    pub const fn input_terminator(&self) -> LineTerminator {
        match self {
            Dialect::Basic | Dialect::Pipe => LineTerminator::Cr,
            Dialect::Periodic => LineTerminator::Lf,
        }
    }

    /// Bytes appended to every response line.
    pub const fn output_terminator(&self) -> &'static str {
        match self {
            Dialect::Basic | Dialect::Periodic => "\r\n",
            Dialect::Pipe => "\r",
        }
    }

    /// Byte between the response letter and each field.
    pub const fn separator(&self) -> char {
        match self {
            Dialect::Basic | Dialect::Periodic => ' ',
            Dialect::Pipe => '|',
        }
    }

    /// Whether the periodic sampling loop runs.
    pub const fn reports_periodically(&self) -> bool {
        matches!(self, Dialect::Periodic)
    }

    /// Whether the command verb belongs to this dialect's verb table.
    pub fn accepts_verb(&self, verb: u8) -> bool {
        match self {
            Dialect::Basic => matches!(verb, b'v' | b'n' | b'c'),
            Dialect::Pipe => matches!(verb, b'v' | b'd'),
            Dialect::Periodic => matches!(verb, b'v' | b's' | b't' | b'h'),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminators() {
        assert_eq!(Dialect::Basic.input_terminator(), LineTerminator::Cr);
        assert_eq!(Dialect::Pipe.input_terminator(), LineTerminator::Cr);
        assert_eq!(Dialect::Periodic.input_terminator(), LineTerminator::Lf);
        assert_eq!(LineTerminator::Cr.ignored(), b'\n');
        assert_eq!(LineTerminator::Lf.ignored(), b'\r');
        assert_eq!(Dialect::Pipe.output_terminator(), "\r");
        assert_eq!(Dialect::Basic.output_terminator(), "\r\n");
    }

    #[test]
    fn test_verb_tables_are_disjoint_where_expected() {
        assert!(Dialect::Basic.accepts_verb(b'n'));
        assert!(!Dialect::Pipe.accepts_verb(b'n'));
        assert!(Dialect::Pipe.accepts_verb(b'd'));
        assert!(!Dialect::Periodic.accepts_verb(b'd'));
        assert!(Dialect::Periodic.accepts_verb(b't'));
        assert!(!Dialect::Basic.accepts_verb(b't'));
        for dialect in [Dialect::Basic, Dialect::Pipe, Dialect::Periodic] {
            assert!(dialect.accepts_verb(b'v'));
            assert!(!dialect.accepts_verb(b'x'));
        }
    }
}
