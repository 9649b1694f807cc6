//! Reader for ACE's `--tsdb-stdout` output.
//!
//! ACE reports each item as a sequence of keyword entries written as
//! s-expressions, e.g.
//!
//! ```text
//! (:p-input . "(1, 0, 1, <0:6>, 1, \"Abrams\", 0, \"null\")")
//! (:results . (((:result-id . 0) (:mrs . "[ ... ]") (:derivation . "(...)"))))
//! (:readings . 1) (:tcpu . 8) (:pedges . 31)
//! ```
//!
//! The reader only understands what bottlenose needs: keyword entries,
//! strings, bare atoms and nested lists. Unknown keys are ignored.

use bottlenose_core::{ProcessorError, ProcessorResponse, ProcessorResult, TokenStreams};
use bottlenose_delphin::syntax::{Res, quoted, symbol, ws};
use nom::{
    branch::alt,
    character::complete::{char, multispace0},
    combinator::{all_consuming, map},
    error::{VerboseError, convert_error},
    multi::many0,
    sequence::terminated,
};
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;

/// Passive edge count in ACE's chart summary note.
static PEDGES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"added \d+ / (\d+) edges to chart").expect("edge count pattern is valid")
});

const NOTE_PREFIX: &str = "NOTE:";

/// One s-expression.
///
/// A dotted pair whose tail is a list is read as one flat list, so
/// `(:k . (a b))` and `(:k a b)` are the same value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sexp {
    Atom(String),
    Str(String),
    List(Vec<Sexp>),
    Cons(Box<Sexp>, Box<Sexp>),
}

/// The value of a keyword entry.
#[derive(Debug, Clone, Copy)]
enum Value<'a> {
    Scalar(&'a Sexp),
    Items(&'a [Sexp]),
}

impl<'a> Value<'a> {
    fn scalar(self) -> Option<&'a Sexp> {
        match self {
            Self::Scalar(s) | Self::Items([s]) => Some(s),
            Self::Items(_) => None,
        }
    }

    fn items(self) -> &'a [Sexp] {
        match self {
            Self::Items(items) => items,
            Self::Scalar(Sexp::List(items)) => items.as_slice(),
            Self::Scalar(_) => &[],
        }
    }

    fn string(self) -> Option<&'a str> {
        match self.scalar()? {
            Sexp::Str(s) => Some(s.as_str()),
            Sexp::Atom(a) if a != "nil" => Some(a.as_str()),
            _ => None,
        }
    }

    fn number<T: FromStr>(self) -> Option<T> {
        match self.scalar()? {
            Sexp::Atom(a) | Sexp::Str(a) => a.parse().ok(),
            _ => None,
        }
    }
}


fn atom(input: &str) -> Res<'_, Sexp> {
    map(symbol("()\""), |s: &str| Sexp::Atom(s.to_string()))(input)
}

/// The rest of a list after a consing dot, if `input` starts with one.
fn dot(input: &str) -> Option<&str> {
    input
        .strip_prefix('.')
        .filter(|rest| rest.starts_with(|c: char| c.is_whitespace() || c == '(' || c == '"'))
}

fn list(input: &str) -> Res<'_, Sexp> {
    let (mut rest, _) = char::<_, VerboseError<&str>>('(')(input)?;
    let mut items = Vec::new();
    loop {
        let (r, _) = multispace0::<_, VerboseError<&str>>(rest)?;
        if let Some(r) = r.strip_prefix(')') {
            return Ok((r, Sexp::List(items)));
        }
        if let Some(r) = dot(r) {
            let (r, tail) = sexp(r)?;
            let (r, _) = ws(char(')'))(r)?;
            let value = match tail {
                Sexp::List(more) => {
                    items.extend(more);
                    Sexp::List(items)
                }
                tail if items.len() == 1 => {
                    let head = items.remove(0);
                    Sexp::Cons(Box::new(head), Box::new(tail))
                }
                tail => {
                    items.push(tail);
                    Sexp::List(items)
                }
            };
            return Ok((r, value));
        }
        let (r, item) = sexp(r)?;
        items.push(item);
        rest = r;
    }
}

fn sexp(input: &str) -> Res<'_, Sexp> {
    ws(alt((list, map(quoted, Sexp::Str), atom)))(input)
}

/// Read every s-expression in `input`.
pub fn read_all(input: &str) -> Result<Vec<Sexp>, ProcessorError> {
    match all_consuming(terminated(many0(sexp), multispace0))(input) {
        Ok((_, items)) => Ok(items),
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) => Err(ProcessorError::MalformedOutput(
            convert_error(input, e),
        )),
        Err(nom::Err::Incomplete(_)) => Err(ProcessorError::MalformedOutput(
            "incomplete output".to_string(),
        )),
    }
}

/// Split a keyword entry into key and value.
fn keyword(item: &Sexp) -> Option<(&str, Value<'_>)> {
    match item {
        Sexp::Cons(head, tail) => match head.as_ref() {
            Sexp::Atom(key) if key.starts_with(':') => Some((key.as_str(), Value::Scalar(tail))),
            _ => None,
        },
        Sexp::List(items) => match items.split_first() {
            Some((Sexp::Atom(key), rest)) if key.starts_with(':') => {
                Some((key.as_str(), Value::Items(rest)))
            }
            _ => None,
        },
        _ => None,
    }
}

/// Collect keyword entries, descending into lists that are not entries.
fn entries<'a>(items: &'a [Sexp], out: &mut Vec<(&'a str, Value<'a>)>) {
    for item in items {
        if let Some(entry) = keyword(item) {
            out.push(entry);
        } else if let Sexp::List(inner) = item {
            entries(inner, out);
        }
    }
}

fn lookup<'a>(entries: &[(&'a str, Value<'a>)], key: &str) -> Option<Value<'a>> {
    entries.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

fn result(index: usize, item: &Sexp) -> ProcessorResult {
    let mut fields = Vec::new();
    if let Sexp::List(items) = item {
        entries(items, &mut fields);
    }
    let string = |key: &str| lookup(&fields, key).and_then(Value::string).map(str::to_string);
    ProcessorResult {
        result_id: lookup(&fields, ":result-id")
            .and_then(Value::number)
            .unwrap_or(index),
        mrs: string(":mrs"),
        derivation: string(":derivation"),
        surface: string(":surface"),
    }
}

/// Passive edge count from the first chart summary note that has one.
pub fn pedges_from_notes(notes: &[String]) -> Option<u64> {
    notes.iter().find_map(|note| {
        PEDGES_RE
            .captures(note)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    })
}

/// Build a [`ProcessorResponse`] from one invocation's output.
pub fn decode(input: &str, stdout: &str, stderr: &str) -> Result<ProcessorResponse, ProcessorError> {
    let items = read_all(stdout)?;
    let mut fields = Vec::new();
    entries(&items, &mut fields);

    let results = lookup(&fields, ":results")
        .map(Value::items)
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(i, item)| result(i, item))
        .collect();

    let notes: Vec<String> = stderr
        .lines()
        .filter_map(|line| line.strip_prefix(NOTE_PREFIX))
        .map(|note| note.trim().to_string())
        .collect();

    let errors = fields
        .iter()
        .filter(|(key, _)| *key == ":error")
        .filter_map(|(_, value)| value.string())
        .filter(|message| !message.trim().is_empty())
        .map(str::to_string)
        .collect();

    let string = |key: &str| lookup(&fields, key).and_then(Value::string).map(str::to_string);
    Ok(ProcessorResponse {
        input: input.to_string(),
        results,
        readings: lookup(&fields, ":readings").and_then(Value::number),
        tcpu: lookup(&fields, ":tcpu").and_then(Value::number),
        pedges: lookup(&fields, ":pedges")
            .and_then(Value::number)
            .or_else(|| pedges_from_notes(&notes)),
        tokens: TokenStreams {
            initial: string(":p-input"),
            internal: string(":p-tokens"),
        },
        notes,
        errors,
    })
}
