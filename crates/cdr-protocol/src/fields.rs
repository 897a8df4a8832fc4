//! Raw record tokenization and bounds-guarded field access
//!
//! A GSX CDR is a single comma-delimited line in which some fields are
//! themselves double-quoted sub-records (the per-leg signaling data and
//! the calling-name block). The platform documents field positions
//! against two different token streams:
//!
//! - the **raw** stream: the line split on `,` with quotes ignored
//! - the **unquoted** stream: the line with every `"..."` span removed,
//!   then split on `,`
//!
//! [`RawRecord`] materializes both streams plus the `"`-split sections,
//! and every consumer goes through its bounds-checked getters. Nothing
//! in this crate indexes token storage directly; an out-of-range
//! position is data ("field not present in this release"), not a bug.

/// A tokenized CDR line with guarded positional access
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    fields: Vec<String>,
    unquoted: Vec<String>,
    sections: Vec<String>,
}

impl RawRecord {
    /// Tokenize a raw CDR line.
    ///
    /// Empty (or whitespace-only) input produces a record with no
    /// tokens in any view rather than an error.
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self {
                fields: Vec::new(),
                unquoted: Vec::new(),
                sections: Vec::new(),
            };
        }

        let fields = trimmed.split(',').map(str::to_string).collect();
        let unquoted = strip_quoted_spans(trimmed)
            .split(',')
            .map(str::to_string)
            .collect();
        let sections = trimmed.split('"').map(str::to_string).collect();

        Self {
            fields,
            unquoted,
            sections,
        }
    }

    /// True if the input contained no tokens at all
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of tokens in the raw stream
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Token at `idx` in the raw stream, trimmed
    pub fn field(&self, idx: usize) -> Option<&str> {
        self.fields.get(idx).map(|s| s.trim())
    }

    /// Token at `idx` in the quote-stripped stream, trimmed
    pub fn unquoted_field(&self, idx: usize) -> Option<&str> {
        self.unquoted.get(idx).map(|s| s.trim())
    }

    /// `"`-delimited section at `idx`; odd indices are the embedded
    /// sub-records (signaling data, calling-name block)
    pub fn section(&self, idx: usize) -> Option<&str> {
        self.sections.get(idx).map(|s| s.trim())
    }
}

/// A tokenized composite sub-field (signaling sub-record, RTP endpoint
/// pair) with the same guarded access contract as [`RawRecord`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokens<'a> {
    tokens: Vec<&'a str>,
}

impl<'a> Tokens<'a> {
    /// Split `text` on `delim`. Empty input yields no tokens.
    pub fn split(text: &'a str, delim: char) -> Self {
        let text = text.trim();
        let tokens = if text.is_empty() {
            Vec::new()
        } else {
            text.split(delim).map(str::trim).collect()
        };
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token at `idx`, or `None` when out of range
    pub fn get(&self, idx: usize) -> Option<&'a str> {
        self.tokens.get(idx).copied()
    }

    /// Token at `idx` when present and non-blank
    pub fn get_nonblank(&self, idx: usize) -> Option<&'a str> {
        self.get(idx).filter(|t| !t.is_empty())
    }
}

/// Remove every balanced `"..."` span (quotes included).
///
/// An unmatched trailing quote is not a span and stays in place.
fn strip_quoted_spans(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('"') {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];
        match after_open.find('"') {
            Some(close) => {
                rest = &after_open[close + 1..];
            }
            None => {
                // No closing quote: keep the remainder verbatim
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::{strip_quoted_spans, RawRecord, Tokens};

    #[test]
    fn test_empty_input_has_no_tokens() {
        let rec = RawRecord::new("");
        assert!(rec.is_empty());
        assert_eq!(rec.field(0), None);
        assert_eq!(rec.unquoted_field(0), None);
        assert_eq!(rec.section(0), None);

        let rec = RawRecord::new("   \n");
        assert!(rec.is_empty());
    }

    #[test]
    fn test_field_access_in_and_out_of_bounds() {
        let rec = RawRecord::new("STOP,GW1,,x");
        assert_eq!(rec.field(0), Some("STOP"));
        assert_eq!(rec.field(1), Some("GW1"));
        assert_eq!(rec.field(2), Some(""));
        assert_eq!(rec.field(3), Some("x"));
        assert_eq!(rec.field(4), None);
        assert_eq!(rec.field(usize::MAX), None);
    }

    #[test]
    fn test_unquoted_stream_removes_quoted_spans() {
        let rec = RawRecord::new(r#"STOP,a,"SIP,inner,data",b,c"#);
        // Raw stream counts the commas inside the quotes
        assert_eq!(rec.field(2), Some(r#""SIP"#));
        // Unquoted stream does not
        assert_eq!(rec.unquoted_field(0), Some("STOP"));
        assert_eq!(rec.unquoted_field(1), Some("a"));
        assert_eq!(rec.unquoted_field(2), Some(""));
        assert_eq!(rec.unquoted_field(3), Some("b"));
        assert_eq!(rec.unquoted_field(4), Some("c"));
    }

    #[test]
    fn test_sections_expose_quoted_subrecords() {
        let rec = RawRecord::new(r#"START,x,"SIP,abc",y,"SIP,def",z,"Name""#);
        assert_eq!(rec.section(1), Some("SIP,abc"));
        assert_eq!(rec.section(3), Some("SIP,def"));
        assert_eq!(rec.section(5), Some("Name"));
        assert_eq!(rec.section(99), None);
    }

    #[test]
    fn test_unmatched_quote_is_preserved() {
        assert_eq!(strip_quoted_spans(r#"a,"b",c""#), r#"a,,c""#);
        assert_eq!(strip_quoted_spans(r#"a,"bc"#), r#"a,"bc"#);
        assert_eq!(strip_quoted_spans("a,b,c"), "a,b,c");
    }

    #[test]
    fn test_tokens_guarded_access() {
        let toks = Tokens::split("10.0.0.1:5004/10.0.0.2:5002", '/');
        assert_eq!(toks.len(), 2);
        assert_eq!(toks.get(0), Some("10.0.0.1:5004"));
        assert_eq!(toks.get(1), Some("10.0.0.2:5002"));
        assert_eq!(toks.get(2), None);

        let empty = Tokens::split("  ", ',');
        assert!(empty.is_empty());
        assert_eq!(empty.get(0), None);
    }

    #[test]
    fn test_tokens_nonblank() {
        let toks = Tokens::split("a,,c", ',');
        assert_eq!(toks.get(1), Some(""));
        assert_eq!(toks.get_nonblank(1), None);
        assert_eq!(toks.get_nonblank(2), Some("c"));
    }
}
