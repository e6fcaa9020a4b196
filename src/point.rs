use crate::error::ValidationError;
use log::trace;
use std::time::Instant;

/// Characters that get a backslash in front of them when encoded.
const RESERVED_CHARACTERS: [char; 5] = [',', '=', ' ', '"', '\\'];

/// Whitespace allowed around a numeric timestamp.
const NUMERIC_PADDING: [char; 6] = [' ', '\t', '\n', '\r', '\x0B', '\x0C'];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    I64(i64),
    U64(u64),
    /// Written with `Display`, so NaN and infinities come out as `NaN` and
    /// `inf`, which line protocol readers reject. Callers keep floats finite.
    F64(f64),
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Number::I64(v) => v.fmt(f),
            Number::U64(v) => v.fmt(f),
            Number::F64(v) => v.fmt(f),
        }
    }
}

/// Value of a tag or a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Number(Number),
}

impl FieldValue {
    pub fn to_line_protocol(&self) -> String {
        match self {
            FieldValue::String(v) => escape(v),
            FieldValue::Number(v) => v.to_string(),
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            FieldValue::String(v) => v.fmt(f),
            FieldValue::Number(v) => v.fmt(f),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<Number> for FieldValue {
    fn from(value: Number) -> Self {
        FieldValue::Number(value)
    }
}

macro_rules! impl_from_number {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::Number(Number::$variant(value.into()))
                }
            }
        )*
    };
}

impl_from_number!(
    i8 => I64,
    i16 => I64,
    i32 => I64,
    i64 => I64,
    u8 => U64,
    u16 => U64,
    u32 => U64,
    u64 => U64,
    f32 => F64,
    f64 => F64,
);

/// One metric observation, validated at construction and immutable after.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    measurement: String,
    tags: Vec<(String, FieldValue)>,
    fields: Vec<(String, FieldValue)>,
    timestamp: String,
}

impl Point {
    /// Builds a point from any key/value collections.
    ///
    /// Entries keep the iteration order of the collections passed in. Fails if
    /// `fields` is empty or if `timestamp` is not a number.
    pub fn new<TK, TV, FK, FV>(
        measurement: impl Into<String>,
        tags: impl IntoIterator<Item = (TK, TV)>,
        fields: impl IntoIterator<Item = (FK, FV)>,
        timestamp: impl Into<String>,
    ) -> Result<Self, ValidationError>
    where
        TK: Into<String>,
        TV: Into<FieldValue>,
        FK: Into<String>,
        FV: Into<FieldValue>,
    {
        let fields = collect_pairs(fields);
        if fields.is_empty() {
            return Err(ValidationError::EmptyFields);
        }

        let timestamp = timestamp.into();
        if !is_numeric(&timestamp) {
            return Err(ValidationError::NonNumericTimestamp(timestamp));
        }

        Ok(Point {
            measurement: measurement.into(),
            tags: collect_pairs(tags),
            fields,
            timestamp,
        })
    }

    pub fn measurement(&self) -> &str {
        &self.measurement
    }

    pub fn tags(&self) -> &[(String, FieldValue)] {
        &self.tags
    }

    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Renders `measurement[,tag=value...] field=value[,field=value...] timestamp`.
    pub fn to_line_protocol(&self) -> String {
        let function_start = Instant::now();

        let tag_section = pair_fragments(&self.tags);
        let field_section = pair_fragments(&self.fields);
        let field_section = field_section.strip_prefix(',').unwrap_or(&field_section);

        let line = format!(
            "{}{} {} {}",
            escape(&self.measurement),
            tag_section,
            field_section,
            escape(&self.timestamp)
        );

        trace!("to_line_protocol duration: {:?}", function_start.elapsed());
        line
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&self.to_line_protocol())
    }
}

fn collect_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Vec<(String, FieldValue)>
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect()
}

fn pair_fragments(pairs: &[(String, FieldValue)]) -> String {
    // Every pair contributes ",key=value", including the first one
    let mut output = String::new();
    for (key, value) in pairs {
        output.push(',');
        output.push_str(&escape(key));
        output.push('=');
        output.push_str(&value.to_line_protocol());
    }
    output
}

/// Prefixes every reserved character of `value` with a backslash.
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if RESERVED_CHARACTERS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Whether `value` reads as an integer or a float, exponent notation included.
pub fn is_numeric(value: &str) -> bool {
    let value = value.trim_matches(&NUMERIC_PADDING[..]);
    if value.is_empty() {
        return false;
    }

    // f64 parsing also takes "inf" and "NaN", which are not numbers here
    if value
        .chars()
        .any(|c| c.is_alphabetic() && c != 'e' && c != 'E')
    {
        return false;
    }

    value.parse::<f64>().is_ok()
}

#[cfg(test)]
pub mod tests;
