use crate::error::{ParseError, ParseErrorKind};

const COMMENT: &str = "#";
const SEPARATOR: char = ';';

/// Split a raw line into a station and its measurement.
///
/// Comment lines yield `Ok(None)`. `line_no` only labels the error.
#[inline]
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<(&str, f64)>, ParseError> {
    if line.starts_with(COMMENT) {
        return Ok(None);
    }

    let mut fields = line.split(SEPARATOR);
    let (key, value) = match (fields.next(), fields.next(), fields.next()) {
        (Some(key), Some(value), None) => (key, value),
        _ => {
            return Err(ParseError {
                line: line_no,
                reason: ParseErrorKind::FieldCount(line.split(SEPARATOR).count()),
            })
        }
    };

    // fast_float also accepts nan/inf spellings; only finite decimals are records.
    match fast_float::parse::<f64, _>(value) {
        Ok(parsed) if parsed.is_finite() => Ok(Some((key, parsed))),
        _ => Err(ParseError {
            line: line_no,
            reason: ParseErrorKind::InvalidNumber(value.to_owned()),
        }),
    }
}
