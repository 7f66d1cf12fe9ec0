//! Typed values and their canonical text encoding
//!
//! Every entry keeps its payload as text plus a [`TypeTag`]. The encodings are:
//!
//! | Type | Digit | Encoding |
//! |------|-------|----------|
//! | Int | `1` | signed decimal (`-1234`) |
//! | String | `2` | raw text |
//! | Bool | `3` | `0` or `1` |
//! | Float | `4` | decimal with six fractional digits (`0.483000`) |
//! | Point | `5` | `x,y` |
//! | Rect | `6` | `x,y,w,h` |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of value stored in an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeTag {
    Int,
    String,
    Bool,
    Float,
    Point,
    Rect,
}

impl TypeTag {
    pub const ALL: [TypeTag; 6] = [
        TypeTag::Int,
        TypeTag::String,
        TypeTag::Bool,
        TypeTag::Float,
        TypeTag::Point,
        TypeTag::Rect,
    ];

    /// Returns the digit written in front of a data line
    ///
    /// This match is the only place the digit assignment lives;
    /// [`TypeTag::from_digit`] is derived from it.
    pub fn digit(self) -> char {
        match self {
            TypeTag::Int => '1',
            TypeTag::String => '2',
            TypeTag::Bool => '3',
            TypeTag::Float => '4',
            TypeTag::Point => '5',
            TypeTag::Rect => '6',
        }
    }

    /// Looks up the tag for a line's leading digit
    pub fn from_digit(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.digit() == c)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::Int => "int",
            TypeTag::String => "string",
            TypeTag::Bool => "bool",
            TypeTag::Float => "float",
            TypeTag::Point => "point",
            TypeTag::Rect => "rect",
        }
    }

    /// Checks `text` against this tag and returns its canonical encoding
    pub fn canonicalize(self, text: &str) -> Result<String, Vec<DecodeError>> {
        match self {
            TypeTag::Int => i64::decode(text).map(|v| v.encode()),
            TypeTag::String => String::decode(text).map(|v| v.encode()),
            TypeTag::Bool => bool::decode(text).map(|v| v.encode()),
            TypeTag::Float => f32::decode(text).map(|v| v.encode()),
            TypeTag::Point => Point::decode(text).map(|v| v.encode()),
            TypeTag::Rect => Rect::decode(text).map(|v| v.encode()),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeTag {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DecodeError::UnknownType(s.to_string()))
    }
}

/// Why a stored text could not be read back as a typed value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("'{text}' is not a valid {tag}")]
    Malformed { tag: TypeTag, text: String },

    #[error("expected {expected} comma-separated components, found {found}")]
    Arity { expected: usize, found: usize },

    #[error("component {index} ('{text}') is not an integer")]
    Component { index: usize, text: String },

    #[error("unknown type '{0}'")]
    UnknownType(String),
}

/// Two-dimensional integer coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Integer rectangle (origin plus size)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }
}

/// A Rust type that can live in a config entry
///
/// `Default` supplies the zero value returned by failed reads.
pub trait ConfigValue: Sized + Default {
    const TAG: TypeTag;

    fn encode(&self) -> String;

    /// Decodes stored text; the error list is never empty.
    fn decode(text: &str) -> Result<Self, Vec<DecodeError>>;
}

fn malformed(tag: TypeTag, text: &str) -> Vec<DecodeError> {
    vec![DecodeError::Malformed {
        tag,
        text: text.to_string(),
    }]
}

impl ConfigValue for i64 {
    const TAG: TypeTag = TypeTag::Int;

    fn encode(&self) -> String {
        self.to_string()
    }

    fn decode(text: &str) -> Result<Self, Vec<DecodeError>> {
        text.trim().parse().map_err(|_| malformed(Self::TAG, text))
    }
}

impl ConfigValue for f32 {
    const TAG: TypeTag = TypeTag::Float;

    fn encode(&self) -> String {
        format!("{:.6}", self)
    }

    fn decode(text: &str) -> Result<Self, Vec<DecodeError>> {
        text.trim().parse().map_err(|_| malformed(Self::TAG, text))
    }
}

impl ConfigValue for bool {
    const TAG: TypeTag = TypeTag::Bool;

    fn encode(&self) -> String {
        let digit = if *self { "1" } else { "0" };
        digit.to_string()
    }

    fn decode(text: &str) -> Result<Self, Vec<DecodeError>> {
        match text.trim() {
            "1" => Ok(true),
            "0" => Ok(false),
            s if s.eq_ignore_ascii_case("true") => Ok(true),
            s if s.eq_ignore_ascii_case("false") => Ok(false),
            _ => Err(malformed(Self::TAG, text)),
        }
    }
}

impl ConfigValue for String {
    const TAG: TypeTag = TypeTag::String;

    fn encode(&self) -> String {
        self.clone()
    }

    fn decode(text: &str) -> Result<Self, Vec<DecodeError>> {
        Ok(text.to_string())
    }
}

impl ConfigValue for Point {
    const TAG: TypeTag = TypeTag::Point;

    fn encode(&self) -> String {
        format!("{},{}", self.x, self.y)
    }

    fn decode(text: &str) -> Result<Self, Vec<DecodeError>> {
        let [x, y] = parse_components::<2>(text)?;
        Ok(Self { x, y })
    }
}

impl ConfigValue for Rect {
    const TAG: TypeTag = TypeTag::Rect;

    fn encode(&self) -> String {
        format!("{},{},{},{}", self.x, self.y, self.w, self.h)
    }

    fn decode(text: &str) -> Result<Self, Vec<DecodeError>> {
        let [x, y, w, h] = parse_components::<4>(text)?;
        Ok(Self { x, y, w, h })
    }
}

/// Splits a comma-joined integer list, collecting one error per bad component
fn parse_components<const N: usize>(text: &str) -> Result<[i32; N], Vec<DecodeError>> {
    let parts: Vec<&str> = text.split(',').collect();
    if parts.len() != N {
        return Err(vec![DecodeError::Arity {
            expected: N,
            found: parts.len(),
        }]);
    }

    let mut values = [0; N];
    let mut failures = Vec::new();
    for (index, part) in parts.iter().enumerate() {
        match part.trim().parse() {
            Ok(v) => values[index] = v,
            Err(_) => failures.push(DecodeError::Component {
                index,
                text: part.to_string(),
            }),
        }
    }

    if failures.is_empty() {
        Ok(values)
    } else {
        Err(failures)
    }
}

/// Reads a `0x`-prefixed hexadecimal number out of string text
///
/// Returns `Ok(None)` when the prefix is absent.
pub fn decode_hex(text: &str) -> Result<Option<i64>, DecodeError> {
    let Some(digits) = text.trim().strip_prefix("0x") else {
        return Ok(None);
    };

    let malformed = || DecodeError::Malformed {
        tag: TypeTag::String,
        text: text.to_string(),
    };

    // from_str_radix would also take a leading sign
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(malformed());
    }

    i64::from_str_radix(digits, 16).map(Some).map_err(|_| malformed())
}
