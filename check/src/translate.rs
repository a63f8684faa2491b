//! Rewrites POSIX extended regular expressions into [`regex`] crate syntax.
//!
//! The `regex` parser accepts a superset of ERE in which several constructs
//! mean something else: `&&`, `--` and `~~` are class set operators, `[`
//! inside a class opens a nested class, `\<` and `\>` are word boundaries,
//! a `{` that is not a bound is an error, and `*?` is a lazy star. The
//! translator parses the pattern with ERE rules and emits every literal
//! escaped, so the compiled regex means exactly what the ERE meant:
//!
//! - bracket expressions are re-emitted item by item; negated ones never
//!   match a newline
//! - `\` followed by punctuation is that character; Perl escapes such as
//!   `\d`, `\b` or `\pL` are errors
//! - a `{` that does not start a valid bound is a literal
//! - stacked repetition (`a*?`, `a+*`, `a{2}{3}`) applies each operator to
//!   the already repeated expression
//! - `(` always opens a group, so `(?` is a repetition without an operand

use regex::escape;

/// Upper limit for `{n,m}` bounds.
const MAX_REPEAT: u32 = 1000;

/// Names accepted in `[:name:]` bracket classes.
const CLASS_NAMES: &[&str] = &[
    "alnum", "alpha", "ascii", "blank", "cntrl", "digit", "graph", "lower", "print", "punct",
    "space", "upper", "word", "xdigit",
];

/// Translates `pattern` into an equivalent `regex` crate pattern.
///
/// Returns the syntax problem as a one-line reason when `pattern` is not a
/// valid POSIX extended regular expression.
pub(crate) fn to_rust_syntax(pattern: &str) -> Result<String, String> {
    let mut translator = Translator {
        chars: pattern.chars().collect(),
        pos: 0,
        current: Vec::new(),
        outer: Vec::new(),
    };
    translator.run()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnitKind {
    Atom,
    Repeated,
    Assertion,
    Alternation,
}

#[derive(Debug)]
struct Unit {
    text: String,
    kind: UnitKind,
}

#[derive(Debug)]
enum ClassItem {
    Range(char, char),
    Named(String),
}

struct Translator {
    chars: Vec<char>,
    pos: usize,
    /// Units of the innermost open group.
    current: Vec<Unit>,
    /// Enclosing groups, innermost last.
    outer: Vec<Vec<Unit>>,
}

impl Translator {
    fn run(&mut self) -> Result<String, String> {
        while let Some(c) = self.peek(0) {
            match c {
                '\\' => {
                    let literal = self.escape()?;
                    self.push(escape_char(literal), UnitKind::Atom);
                }
                '[' => {
                    let class = self.class()?;
                    self.push(class, UnitKind::Atom);
                }
                '(' => {
                    self.pos += 1;
                    self.outer.push(std::mem::take(&mut self.current));
                }
                ')' => {
                    self.pos += 1;
                    let Some(parent) = self.outer.pop() else {
                        return Err("unexpected )".to_string());
                    };
                    let inner = std::mem::replace(&mut self.current, parent);
                    self.push(format!("({})", join(&inner)), UnitKind::Atom);
                }
                '|' => {
                    self.pos += 1;
                    self.push("|".to_string(), UnitKind::Alternation);
                }
                '^' | '$' => {
                    self.pos += 1;
                    self.push(c.to_string(), UnitKind::Assertion);
                }
                '.' => {
                    self.pos += 1;
                    self.push(".".to_string(), UnitKind::Atom);
                }
                '*' | '+' | '?' => {
                    self.pos += 1;
                    self.repeat(&c.to_string())?;
                }
                '{' => match self.bound()? {
                    Some(op) => self.repeat(&op)?,
                    None => {
                        self.pos += 1;
                        self.push(escape_char('{'), UnitKind::Atom);
                    }
                },
                other => {
                    self.pos += 1;
                    self.push(escape_char(other), UnitKind::Atom);
                }
            }
        }

        if !self.outer.is_empty() {
            return Err("missing closing )".to_string());
        }
        Ok(join(&self.current))
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn push(&mut self, text: String, kind: UnitKind) {
        self.current.push(Unit { text, kind });
    }

    /// Applies a repetition operator to the preceding unit.
    fn repeat(&mut self, op: &str) -> Result<(), String> {
        match self.current.last_mut() {
            Some(unit) if unit.kind != UnitKind::Alternation => {
                if matches!(unit.kind, UnitKind::Repeated | UnitKind::Assertion) {
                    unit.text = format!("(?:{})", unit.text);
                }
                unit.text.push_str(op);
                unit.kind = UnitKind::Repeated;
                Ok(())
            }
            _ => Err(format!("missing argument to repetition operator: `{op}`")),
        }
    }

    /// Parses `{n}`, `{n,}` or `{n,m}` at the cursor.
    ///
    /// Returns `None` without consuming anything when the brace does not
    /// start a bound.
    fn bound(&mut self) -> Result<Option<String>, String> {
        let mut i = self.pos + 1;
        let Some(min) = self.number(&mut i) else {
            return Ok(None);
        };

        let max = if self.chars.get(i) == Some(&',') {
            i += 1;
            if self.chars.get(i) == Some(&'}') {
                None
            } else {
                match self.number(&mut i) {
                    Some(max) => Some(max),
                    None => return Ok(None),
                }
            }
        } else {
            Some(min)
        };
        if self.chars.get(i) != Some(&'}') {
            return Ok(None);
        }

        let text: String = self.chars[self.pos..=i].iter().collect();
        if min > MAX_REPEAT || max.is_some_and(|max| max > MAX_REPEAT || max < min) {
            return Err(format!("invalid repeat count: `{text}`"));
        }
        self.pos = i + 1;

        Ok(Some(match max {
            Some(max) if max == min && !text.contains(',') => format!("{{{min}}}"),
            Some(max) => format!("{{{min},{max}}}"),
            None => format!("{{{min},}}"),
        }))
    }

    /// Reads decimal digits starting at `*i`. A leading zero followed by
    /// another digit is not a number.
    fn number(&self, i: &mut usize) -> Option<u32> {
        let start = *i;
        while self.chars.get(*i).is_some_and(char::is_ascii_digit) {
            *i += 1;
        }
        let digits = &self.chars[start..*i];
        if digits.is_empty() || (digits.len() > 1 && digits[0] == '0') {
            return None;
        }
        // Saturate so oversized counts still fail the range check.
        Some(digits.iter().fold(0u32, |n, d| {
            n.saturating_mul(10)
                .saturating_add(d.to_digit(10).unwrap_or(0))
        }))
    }

    /// Parses an escape sequence at the cursor into the character it denotes.
    fn escape(&mut self) -> Result<char, String> {
        self.pos += 1;
        let Some(c) = self.peek(0) else {
            return Err("trailing backslash at end of expression".to_string());
        };
        self.pos += 1;

        let invalid = || format!("invalid escape sequence: `\\{c}`");
        match c {
            '1'..='7' if !self.peek(0).is_some_and(|d| d.is_digit(8)) => Err(invalid()),
            '0'..='7' => {
                let mut value = c.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.peek(0).and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            value = value * 8 + d;
                            self.pos += 1;
                        }
                        None => break,
                    }
                }
                char::from_u32(value).ok_or_else(invalid)
            }
            'x' => self.hex_escape().ok_or_else(invalid),
            'a' => Ok('\u{7}'),
            'f' => Ok('\u{c}'),
            'n' => Ok('\n'),
            'r' => Ok('\r'),
            't' => Ok('\t'),
            'v' => Ok('\u{b}'),
            c if c.is_ascii() && !c.is_ascii_alphanumeric() => Ok(c),
            _ => Err(invalid()),
        }
    }

    /// `\xHH` or `\x{H...}`, with the cursor after the `x`.
    fn hex_escape(&mut self) -> Option<char> {
        let digits: String = if self.peek(0) == Some('{') {
            let close = (self.pos + 1..self.chars.len()).find(|&j| self.chars[j] == '}')?;
            let digits = self.chars[self.pos + 1..close].iter().collect();
            self.pos = close + 1;
            digits
        } else {
            let digits: String = self.chars.get(self.pos..self.pos + 2)?.iter().collect();
            self.pos += 2;
            digits
        };
        if digits.is_empty() || !digits.chars().all(|d| d.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(&digits, 16)
            .ok()
            .and_then(char::from_u32)
    }

    /// Parses a bracket expression at the cursor and emits it as a `regex`
    /// class with every member escaped.
    fn class(&mut self) -> Result<String, String> {
        let missing = || "missing closing ]".to_string();
        self.pos += 1;

        let negated = self.peek(0) == Some('^');
        if negated {
            self.pos += 1;
        }

        let mut items = Vec::new();
        let mut first = true;
        loop {
            let c = self.peek(0).ok_or_else(missing)?;
            if c == ']' && !first {
                self.pos += 1;
                break;
            }
            if c == '-' && !first && self.peek(1) != Some(']') {
                return Err("invalid character class range: `-`".to_string());
            }
            first = false;

            if c == '[' && self.peek(1) == Some(':') {
                if let Some(name) = self.named_class()? {
                    items.push(ClassItem::Named(name));
                    continue;
                }
            }

            let lo = self.class_char().ok_or_else(missing)??;
            let mut hi = lo;
            if self.peek(0) == Some('-') && self.peek(1).is_some_and(|n| n != ']') {
                self.pos += 1;
                hi = self.class_char().ok_or_else(missing)??;
                if hi < lo {
                    return Err(format!("invalid character class range: `{lo}-{hi}`"));
                }
            }
            items.push(ClassItem::Range(lo, hi));
        }

        let mut out = String::from("[");
        if negated {
            out.push_str("^\\n");
        }
        for item in &items {
            match item {
                ClassItem::Range(lo, hi) if lo == hi => out.push_str(&escape_char(*lo)),
                ClassItem::Range(lo, hi) => {
                    out.push_str(&escape_char(*lo));
                    out.push('-');
                    out.push_str(&escape_char(*hi));
                }
                ClassItem::Named(name) => {
                    out.push_str("[:");
                    out.push_str(name);
                    out.push_str(":]");
                }
            }
        }
        out.push(']');
        Ok(out)
    }

    /// Parses `[:name:]` at the cursor. Returns `None`, consuming nothing,
    /// when no `:]` follows.
    fn named_class(&mut self) -> Result<Option<String>, String> {
        let start = self.pos + 2;
        let Some(end) = (start..self.chars.len().saturating_sub(1))
            .find(|&j| self.chars[j] == ':' && self.chars[j + 1] == ']')
        else {
            return Ok(None);
        };

        let name: String = self.chars[start..end].iter().collect();
        if !CLASS_NAMES.contains(&name.strip_prefix('^').unwrap_or(name.as_str())) {
            return Err(format!("invalid character class range: `[:{name}:]`"));
        }
        self.pos = end + 2;
        Ok(Some(name))
    }

    /// Reads one bracket member, or `None` at end of input.
    fn class_char(&mut self) -> Option<Result<char, String>> {
        let c = self.peek(0)?;
        if c == '\\' {
            return Some(self.escape());
        }
        self.pos += 1;
        Some(Ok(c))
    }
}

fn escape_char(c: char) -> String {
    escape(c.encode_utf8(&mut [0; 4]))
}

fn join(units: &[Unit]) -> String {
    units.iter().map(|unit| unit.text.as_str()).collect()
}
