/*!
# Field Codec

Comma-delimited, double-quote dialect:

- fields containing `,`, `"`, `\r` or `\n` are quoted
- embedded quotes are doubled (`""`)
- records end with `\n` (`\r\n` is accepted on read)
- quoted fields may span lines

[`RecordDecoder`] is fed one line at a time so the reader can stream a file
without holding more than the current record.
*/

use crate::errors::{CsvError, CsvResult};
use std::borrow::Cow;

pub const DELIMITER: char = ',';
pub const QUOTE: char = '"';
pub const RECORD_TERMINATOR: &str = "\n";

const BOM: char = '\u{feff}';

// ================================================================================================
// Decoding
// ================================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    StartRecord,
    StartField,
    LeadingSpace,
    Unquoted,
    Quoted,
    QuoteInQuoted,
    AfterQuoted,
}

/// Incremental record tokenizer
#[derive(Debug)]
pub struct RecordDecoder {
    state: State,
    field: String,
    fields: Vec<String>,
    records: usize,
    seen_input: bool,
    skip_empty_lines: bool,
}

impl Default for RecordDecoder {
    fn default() -> Self {
        Self::new(true)
    }
}

impl RecordDecoder {
    pub fn new(skip_empty_lines: bool) -> Self {
        Self {
            state: State::StartRecord,
            field: String::new(),
            fields: Vec::new(),
            records: 0,
            seen_input: false,
            skip_empty_lines,
        }
    }

    /// Number of records started so far (1-based index of the current one)
    pub fn records(&self) -> usize {
        self.records
    }

    /// Feed one line, terminator included if present.
    ///
    /// Returns the completed record, or `None` when the line is blank and
    /// skipped or when a quoted field continues onto the next line.
    pub fn decode_line(&mut self, line: &str) -> CsvResult<Option<Vec<String>>> {
        let line = if self.seen_input {
            line
        } else {
            self.seen_input = true;
            line.strip_prefix(BOM).unwrap_or(line)
        };
        let (body, terminator) = split_terminator(line);

        if self.state == State::StartRecord {
            // Whitespace-only lines count as blank
            if self.skip_empty_lines && body.trim().is_empty() {
                return Ok(None);
            }
            if body.is_empty() {
                if terminator.is_empty() {
                    return Ok(None);
                }
                self.records += 1;
                return Ok(Some(vec![String::new()]));
            }
            self.records += 1;
            self.state = State::StartField;
        }

        for c in body.chars() {
            let state = self.state;
            self.state = match state {
                State::StartRecord | State::StartField | State::LeadingSpace => match c {
                    QUOTE => {
                        self.field.clear();
                        State::Quoted
                    }
                    DELIMITER => {
                        self.end_field();
                        State::StartField
                    }
                    c if c.is_whitespace() => {
                        self.field.push(c);
                        State::LeadingSpace
                    }
                    c => {
                        self.field.push(c);
                        State::Unquoted
                    }
                },
                State::Unquoted => match c {
                    DELIMITER => {
                        self.end_field();
                        State::StartField
                    }
                    c => {
                        self.field.push(c);
                        State::Unquoted
                    }
                },
                State::Quoted => match c {
                    QUOTE => State::QuoteInQuoted,
                    c => {
                        self.field.push(c);
                        State::Quoted
                    }
                },
                State::QuoteInQuoted => match c {
                    QUOTE => {
                        self.field.push(QUOTE);
                        State::Quoted
                    }
                    DELIMITER => {
                        self.end_field();
                        State::StartField
                    }
                    c if c.is_whitespace() => State::AfterQuoted,
                    c => return Err(self.unexpected_after_quote(c)),
                },
                State::AfterQuoted => match c {
                    DELIMITER => {
                        self.end_field();
                        State::StartField
                    }
                    c if c.is_whitespace() => State::AfterQuoted,
                    c => return Err(self.unexpected_after_quote(c)),
                },
            };
        }

        if self.state == State::Quoted {
            // Record continues on the next line
            self.field.push_str(terminator);
            return Ok(None);
        }

        self.end_field();
        self.state = State::StartRecord;
        Ok(Some(std::mem::take(&mut self.fields)))
    }

    /// Signal end of input
    pub fn finish(&mut self) -> CsvResult<()> {
        if self.state == State::Quoted {
            return Err(CsvError::parse(self.records, "unterminated quoted field"));
        }
        Ok(())
    }

    fn end_field(&mut self) {
        self.fields.push(std::mem::take(&mut self.field));
    }

    fn unexpected_after_quote(&mut self, c: char) -> CsvError {
        self.state = State::StartRecord;
        self.field.clear();
        self.fields.clear();
        CsvError::parse(
            self.records,
            format!("unexpected character {:?} after closing quote", c),
        )
    }
}

fn split_terminator(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}

/// Decode an in-memory CSV document into raw (uncoerced) records
pub fn decode_str(text: &str, skip_empty_lines: bool) -> CsvResult<Vec<Vec<String>>> {
    let mut decoder = RecordDecoder::new(skip_empty_lines);
    let mut records = Vec::new();

    for line in text.split_inclusive('\n') {
        if let Some(record) = decoder.decode_line(line)? {
            records.push(record);
        }
    }
    decoder.finish()?;

    Ok(records)
}

// ================================================================================================
// Encoding
// ================================================================================================

pub fn needs_quotes(field: &str) -> bool {
    field.contains([DELIMITER, QUOTE, '\r', '\n'])
}

/// Quote a field when needed (or always), doubling embedded quotes
pub fn encode_field(field: &str, always_quote: bool) -> Cow<'_, str> {
    if !always_quote && !needs_quotes(field) {
        return Cow::Borrowed(field);
    }

    let mut out = String::with_capacity(field.len() + 2);
    out.push(QUOTE);
    for c in field.chars() {
        if c == QUOTE {
            out.push(QUOTE);
        }
        out.push(c);
    }
    out.push(QUOTE);
    Cow::Owned(out)
}

/// Encode one record, terminator included
pub fn encode_record<I, S>(fields: I, always_quote: bool) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let fields: Vec<S> = fields.into_iter().collect();
    let mut line = String::new();

    // An empty row or a lone empty field would otherwise be indistinguishable
    // from a blank line, so both are written as `""`
    let blank = match fields.as_slice() {
        [] => true,
        [only] => only.as_ref().is_empty(),
        _ => false,
    };
    if blank {
        line.push(QUOTE);
        line.push(QUOTE);
        line.push_str(RECORD_TERMINATOR);
        return line;
    }

    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            line.push(DELIMITER);
        }
        line.push_str(&encode_field(field.as_ref(), always_quote));
    }
    line.push_str(RECORD_TERMINATOR);
    line
}

// ================================================================================================
// Tests
// ================================================================================================
