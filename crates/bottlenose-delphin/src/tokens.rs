//! YY token lattices.
//!
//! ACE reports its initial and internal tokenizations in YY format, one
//! parenthesized tuple per token:
//!
//! ```text
//! (1, 0, 1, <0:6>, 1, "Abrams" "abrams", 0, "null", "NNP" 1.0000)
//! ```
//!
//! Fields are id, start vertex, end vertex, optional character span, paths,
//! form and optional surface, inflectional position, lexical rules, and
//! optional part-of-speech tags with probabilities.

use std::fmt;
use std::str::FromStr;

use nom::{
    character::complete::char,
    combinator::opt,
    multi::{many0, many1},
    number::complete::double,
    sequence::{pair, preceded, terminated, tuple},
};
use serde_json::{Map, Value};

use crate::DelphinError;
use crate::lnk::Lnk;
use crate::syntax::{self, Res, integer, parse_all, quote, quoted, ws};

const FORMAT: &str = "YY";

#[derive(Debug, Clone, PartialEq)]
pub struct YyToken {
    pub id: i64,
    pub start: i64,
    pub end: i64,
    pub lnk: Option<Lnk>,
    pub paths: Vec<i64>,
    pub form: String,
    pub surface: Option<String>,
    pub ipos: i64,
    pub lrules: Vec<String>,
    /// `(tag, probability)` pairs.
    pub pos: Vec<(String, f64)>,
}

impl YyToken {
    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        out.insert("id".into(), self.id.into());
        out.insert("start".into(), self.start.into());
        out.insert("end".into(), self.end.into());
        if let Some(lnk) = self.lnk {
            out.insert("from".into(), lnk.from.into());
            out.insert("to".into(), lnk.to.into());
        }
        out.insert("form".into(), self.form.as_str().into());
        if let Some(surface) = &self.surface {
            out.insert("surface".into(), surface.as_str().into());
        }
        if !self.pos.is_empty() {
            let (tags, probabilities): (Vec<Value>, Vec<Value>) = self
                .pos
                .iter()
                .map(|(tag, p)| (Value::from(tag.as_str()), Value::from(*p)))
                .unzip();
            out.insert("tags".into(), tags.into());
            out.insert("probabilities".into(), probabilities.into());
        }
        Value::Object(out)
    }
}

impl fmt::Display for YyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, ", self.id, self.start, self.end)?;
        if let Some(lnk) = self.lnk {
            write!(f, "{lnk}, ")?;
        }
        if self.paths.is_empty() {
            f.write_str("1")?;
        } else {
            let paths: Vec<String> = self.paths.iter().map(ToString::to_string).collect();
            f.write_str(&paths.join(" "))?;
        }
        write!(f, ", {}", quote(&self.form))?;
        if let Some(surface) = &self.surface {
            write!(f, " {}", quote(surface))?;
        }
        write!(f, ", {}, ", self.ipos)?;
        let lrules: Vec<String> = self.lrules.iter().map(|rule| quote(rule)).collect();
        f.write_str(&lrules.join(" "))?;
        if !self.pos.is_empty() {
            let pos: Vec<String> = self
                .pos
                .iter()
                .map(|(tag, p)| format!("{} {p:.4}", quote(tag)))
                .collect();
            write!(f, ", {}", pos.join(" "))?;
        }
        f.write_str(")")
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct YyTokenLattice {
    pub tokens: Vec<YyToken>,
}

impl YyTokenLattice {
    pub fn to_json(&self) -> Value {
        Value::Array(self.tokens.iter().map(YyToken::to_json).collect())
    }
}

impl FromStr for YyTokenLattice {
    type Err = DelphinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens = parse_all(FORMAT, s, many0(ws(token)))?;
        Ok(Self { tokens })
    }
}

impl fmt::Display for YyTokenLattice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{token}")?;
        }
        Ok(())
    }
}

fn comma(input: &str) -> Res<'_, char> {
    ws(char(','))(input)
}

fn token(input: &str) -> Res<'_, YyToken> {
    let (rest, (id, start, end, lnk, paths)) = tuple((
        preceded(char('('), ws(integer)),
        preceded(comma, ws(integer)),
        preceded(comma, ws(integer)),
        opt(preceded(comma, ws(syntax::lnk))),
        preceded(comma, many1(ws(integer))),
    ))(input)?;
    let (rest, (form, surface, ipos, lrules, pos)) = terminated(
        tuple((
            preceded(comma, ws(quoted)),
            opt(ws(quoted)),
            preceded(comma, ws(integer)),
            preceded(comma, many1(ws(quoted))),
            opt(preceded(comma, many1(pair(ws(quoted), ws(double))))),
        )),
        ws(char(')')),
    )(rest)?;
    Ok((
        rest,
        YyToken {
            id,
            start,
            end,
            lnk,
            paths,
            form,
            surface,
            ipos,
            lrules,
            pos: pos.unwrap_or_default(),
        },
    ))
}
