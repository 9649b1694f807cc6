//! Lexical building blocks shared by the text readers.
//!
//! `ws`, `quoted` and `symbol` are public so other readers of ACE output
//! tokenize strings the same way.

use nom::{
    IResult,
    bytes::complete::take_while1,
    character::complete::{char, digit1, multispace0},
    combinator::{all_consuming, map_res, opt, recognize},
    error::{ErrorKind, ParseError, VerboseError, convert_error},
    sequence::{delimited, pair, preceded, separated_pair, terminated},
};

use crate::DelphinError;
use crate::lnk::Lnk;

pub type Res<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

/// Skip leading whitespace before `inner`.
pub fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> Res<'a, O>
where
    F: FnMut(&'a str) -> Res<'a, O>,
{
    preceded(multispace0, inner)
}

/// A double-quoted string with backslash escapes; returns the unescaped text.
pub fn quoted(input: &str) -> Res<'_, String> {
    let (body, _) = char::<_, VerboseError<&str>>('"')(input)?;
    let mut out = String::new();
    let mut chars = body.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Ok((&body[i + 1..], out)),
            '\\' => match chars.next() {
                Some((_, escaped)) => out.push(escaped),
                None => break,
            },
            _ => out.push(c),
        }
    }
    Err(nom::Err::Error(VerboseError::from_error_kind(
        input,
        ErrorKind::Char,
    )))
}

/// A bare token: anything up to whitespace or one of the delimiter characters.
pub fn symbol<'a>(delimiters: &'static str) -> impl FnMut(&'a str) -> Res<'a, &'a str> {
    take_while1(move |c: char| !c.is_whitespace() && !delimiters.contains(c))
}

/// An optionally signed decimal integer.
pub(crate) fn integer(input: &str) -> Res<'_, i64> {
    map_res(recognize(pair(opt(char('-')), digit1)), str::parse)(input)
}

/// A character span `<from:to>`.
pub(crate) fn lnk(input: &str) -> Res<'_, Lnk> {
    let (rest, (from, to)) = delimited(
        char('<'),
        separated_pair(integer, char(':'), integer),
        char('>'),
    )(input)?;
    Ok((rest, Lnk::new(from, to)))
}

/// Run `parser` over the whole of `input` (trailing whitespace allowed).
pub(crate) fn parse_all<'a, T, F>(
    format: &'static str,
    input: &'a str,
    parser: F,
) -> Result<T, DelphinError>
where
    F: FnMut(&'a str) -> Res<'a, T>,
{
    match all_consuming(terminated(parser, multispace0))(input) {
        Ok((_, value)) => Ok(value),
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) => Err(DelphinError::Syntax {
            format,
            message: convert_error(input, e),
        }),
        Err(nom::Err::Incomplete(_)) => Err(DelphinError::Syntax {
            format,
            message: "incomplete input".to_string(),
        }),
    }
}

/// Write `s` as a double-quoted string, escaping quotes and backslashes.
pub(crate) fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_handles_escapes() {
        let (rest, s) = quoted(r#""say \"hi\"" tail"#).unwrap();
        assert_eq!(s, r#"say "hi""#);
        assert_eq!(rest, " tail");
    }

    #[test]
    fn test_quoted_accepts_empty_string() {
        let (rest, s) = quoted(r#""""#).unwrap();
        assert_eq!(s, "");
        assert_eq!(rest, "");
    }

    #[test]
    fn test_unterminated_string_is_an_error() {
        assert!(quoted(r#""abc"#).is_err());
    }

    #[test]
    fn test_lnk_reads_character_span() {
        let (_, l) = lnk("<7:12>").unwrap();
        assert_eq!(l, Lnk::new(7, 12));
    }

    #[test]
    fn test_quote_round_trips_through_quoted() {
        let original = r#"a "b" \c"#;
        let (_, back) = quoted(&quote(original)).unwrap();
        assert_eq!(back, original);
    }
}
