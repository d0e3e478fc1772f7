//! Parser for the KeyValues-style `.vphys` text container.
//!
//! The format is line-oriented: `key = value` pairs inside `{ }`
//! dictionaries, `[ ]` lists of values or blocks, and `#[ ]` hex blobs
//! holding whitespace-separated hex byte pairs. A key with an empty
//! right-hand side takes the block opening on the following line as its
//! value. Lines containing `<!` are header/comment metadata.
//!
//! The parser builds the whole value tree without interpreting its
//! semantics; geometry extraction walks the tree afterwards.

use crate::error::{Result, VphysError};

/// A parsed value in a `.vphys` container.
#[derive(Debug, Clone, PartialEq)]
pub enum KvValue {
    /// Integer number.
    Int(i64),
    /// Real number.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// String literal (contents without quotes).
    String(String),
    /// Dictionary, in declaration order.
    Dict(Vec<(String, KvValue)>),
    /// List of values.
    List(Vec<KvValue>),
    /// Hex blob, decoded to raw bytes.
    Hex(Vec<u8>),
}

impl KvValue {
    /// Look up a key in a dictionary.
    pub fn get(&self, key: &str) -> Option<&KvValue> {
        match self {
            KvValue::Dict(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Index into a list.
    pub fn at(&self, index: usize) -> Option<&KvValue> {
        match self {
            KvValue::List(items) => items.get(index),
            _ => None,
        }
    }

    /// Try to get as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            KvValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as a real number (also accepts integer).
    pub fn as_float(&self) -> Option<f64> {
        match self {
            KvValue::Float(v) => Some(*v),
            KvValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Try to get as a list.
    pub fn as_list(&self) -> Option<&[KvValue]> {
        match self {
            KvValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Try to get as a hex blob.
    pub fn as_hex(&self) -> Option<&[u8]> {
        match self {
            KvValue::Hex(bytes) => Some(bytes),
            _ => None,
        }
    }
}

/// Parse a `.vphys` document into its root dictionary.
pub fn parse_vphys(input: &str) -> Result<KvValue> {
    let mut parser = Parser::new(input);
    parser.parse_document()
}

/// Line-oriented recursive-descent parser.
struct Parser<'a> {
    /// Non-blank, non-comment lines with their 1-indexed line numbers.
    lines: Vec<(usize, &'a str)>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        let lines = input
            .lines()
            .enumerate()
            .map(|(i, raw)| (i + 1, raw.trim()))
            .filter(|(_, content)| !content.is_empty() && !content.contains("<!"))
            .collect();
        Self { lines, pos: 0 }
    }

    fn next_line(&mut self) -> Result<(usize, &'a str)> {
        let &(line, content) = self
            .lines
            .get(self.pos)
            .ok_or_else(|| VphysError::syntax(0, "unexpected end of input"))?;
        self.pos += 1;
        Ok((line, content))
    }

    fn parse_document(&mut self) -> Result<KvValue> {
        let (line, content) = self.next_line()?;
        if strip_comma(content) != "{" {
            return Err(VphysError::syntax(
                line,
                "expected `{` opening the root dictionary",
            ));
        }
        self.parse_dict()
    }

    /// Parse a dictionary body; the opening `{` has been consumed.
    fn parse_dict(&mut self) -> Result<KvValue> {
        let mut entries = Vec::new();
        loop {
            let (line, raw) = self.next_line()?;
            let content = strip_comma(raw);
            if content == "}" {
                return Ok(KvValue::Dict(entries));
            }

            let (key, rhs) = content
                .split_once('=')
                .ok_or_else(|| VphysError::syntax(line, "expected `key = value`"))?;
            let key = key.trim();
            let rhs = rhs.trim();

            let value = if rhs.is_empty() {
                self.parse_block()?
            } else {
                parse_scalar(line, rhs)?
            };
            entries.push((key.to_string(), value));
        }
    }

    /// Parse a block value opening on the next line.
    fn parse_block(&mut self) -> Result<KvValue> {
        let (line, raw) = self.next_line()?;
        match strip_comma(raw) {
            "{" => self.parse_dict(),
            "[" => self.parse_list(),
            "#[" => self.parse_hex(),
            other => Err(VphysError::syntax(
                line,
                format!("expected `{{`, `[` or `#[`, found `{other}`"),
            )),
        }
    }

    /// Parse a list body; the opening `[` has been consumed.
    fn parse_list(&mut self) -> Result<KvValue> {
        let mut items = Vec::new();
        loop {
            let (line, raw) = self.next_line()?;
            match strip_comma(raw) {
                "]" => return Ok(KvValue::List(items)),
                "{" => items.push(self.parse_dict()?),
                "[" => items.push(self.parse_list()?),
                "#[" => items.push(self.parse_hex()?),
                scalar => items.push(parse_scalar(line, scalar)?),
            }
        }
    }

    /// Parse a hex blob body; the opening `#[` has been consumed.
    fn parse_hex(&mut self) -> Result<KvValue> {
        let mut bytes = Vec::new();
        loop {
            let (line, raw) = self.next_line()?;
            let content = strip_comma(raw);
            if content == "]" {
                return Ok(KvValue::Hex(bytes));
            }
            decode_hex_line(line, content, &mut bytes)?;
        }
    }
}

/// Strip an optional trailing comma from a trimmed line.
fn strip_comma(content: &str) -> &str {
    content.strip_suffix(',').map_or(content, str::trim_end)
}

fn parse_scalar(line: usize, content: &str) -> Result<KvValue> {
    if let Some(inner) = content
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
    {
        return Ok(KvValue::String(inner.to_string()));
    }
    match content {
        "true" => return Ok(KvValue::Bool(true)),
        "false" => return Ok(KvValue::Bool(false)),
        _ => {}
    }
    if let Ok(v) = content.parse::<i64>() {
        return Ok(KvValue::Int(v));
    }
    if let Ok(v) = content.parse::<f64>() {
        return Ok(KvValue::Float(v));
    }
    Err(VphysError::syntax(
        line,
        format!("unrecognized value `{content}`"),
    ))
}

/// Decode one line of whitespace-separated hex byte pairs.
pub(crate) fn decode_hex_line(line: usize, content: &str, out: &mut Vec<u8>) -> Result<()> {
    for token in content.split_whitespace() {
        if !token.is_ascii() || token.len() % 2 != 0 {
            return Err(VphysError::syntax(
                line,
                format!("malformed hex token `{token}`"),
            ));
        }
        for i in (0..token.len()).step_by(2) {
            let byte = u8::from_str_radix(&token[i..i + 2], 16)
                .map_err(|_| VphysError::syntax(line, format!("malformed hex token `{token}`")))?;
            out.push(byte);
        }
    }
    Ok(())
}
