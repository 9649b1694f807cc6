//! SimpleMRS reader and writer.
//!
//! Reads the bracketed text form ACE prints, e.g.
//!
//! ```text
//! [ LTOP: h0 INDEX: e2 [ e SF: prop ]
//!   RELS: < [ _bark_v_1<7:13> LBL: h1 ARG0: e2 ARG1: x3 ] >
//!   HCONS: < h0 qeq h1 > ]
//! ```

use std::collections::HashSet;

use nom::{
    branch::alt,
    character::complete::char,
    combinator::{map, opt},
    multi::many0,
    sequence::{delimited, pair, terminated, tuple},
};

use super::{
    CARG, ElementaryPredication, HandleConstraint, IndividualConstraint, LBL, Mrs, Properties,
};
use crate::DelphinError;
use crate::syntax::{self, Res, parse_all, quote, quoted, symbol, ws};

const FORMAT: &str = "SimpleMRS";
const DELIMITERS: &str = "[]<>:\"";

struct VarOcc {
    name: String,
    props: Properties,
}

enum Value {
    Var(VarOcc),
    Const(String),
}

struct RawEp {
    predicate: String,
    lnk: Option<crate::Lnk>,
    surface: Option<String>,
    args: Vec<(String, Value)>,
}

#[derive(Default)]
struct RawMrs {
    surface: Option<String>,
    top: Option<VarOcc>,
    index: Option<VarOcc>,
    rels: Vec<RawEp>,
    hcons: Vec<(VarOcc, String, VarOcc)>,
    icons: Vec<(VarOcc, String, VarOcc)>,
}

/// Read exactly one MRS.
pub fn loads_one(s: &str) -> Result<Mrs, DelphinError> {
    let raw = parse_all(FORMAT, s, mrs)?;
    raw.into_mrs()
}

/// Write one MRS on a single line.
pub fn dumps_one(m: &Mrs) -> String {
    let mut writer = Writer {
        mrs: m,
        seen: HashSet::new(),
        out: String::from("["),
    };
    writer.write();
    writer.out
}

// ============================================================================
// Reader
// ============================================================================

fn bare(input: &str) -> Res<'_, String> {
    map(symbol(DELIMITERS), str::to_string)(input)
}

fn feature(input: &str) -> Res<'_, String> {
    map(terminated(ws(symbol(DELIMITERS)), ws(char(':'))), |s: &str| {
        s.to_ascii_uppercase()
    })(input)
}

fn properties(input: &str) -> Res<'_, Properties> {
    let (input, _) = ws(char('['))(input)?;
    let (input, _sort) = ws(symbol(DELIMITERS))(input)?;
    let (input, props) = many0(pair(feature, ws(alt((quoted, bare)))))(input)?;
    let (input, _) = ws(char(']'))(input)?;
    Ok((input, props))
}

fn var_occ(input: &str) -> Res<'_, VarOcc> {
    let (input, name) = ws(symbol(DELIMITERS))(input)?;
    let (input, props) = opt(properties)(input)?;
    Ok((
        input,
        VarOcc {
            name: name.to_string(),
            props: props.unwrap_or_default(),
        },
    ))
}

fn arg_value(input: &str) -> Res<'_, Value> {
    alt((map(ws(quoted), Value::Const), map(var_occ, Value::Var)))(input)
}

fn ep(input: &str) -> Res<'_, RawEp> {
    let (input, _) = ws(char('['))(input)?;
    let (input, predicate) = ws(alt((quoted, bare)))(input)?;
    let (input, lnk) = opt(ws(syntax::lnk))(input)?;
    let (input, surface) = opt(ws(quoted))(input)?;
    let (input, args) = many0(pair(feature, arg_value))(input)?;
    let (input, _) = ws(char(']'))(input)?;
    Ok((
        input,
        RawEp {
            predicate,
            lnk,
            surface,
            args,
        },
    ))
}

fn constraint(input: &str) -> Res<'_, (VarOcc, String, VarOcc)> {
    tuple((
        var_occ,
        map(ws(symbol(DELIMITERS)), str::to_lowercase),
        var_occ,
    ))(input)
}

fn bag<'a, T>(
    item: impl FnMut(&'a str) -> Res<'a, T>,
) -> impl FnMut(&'a str) -> Res<'a, Vec<T>> {
    delimited(ws(char('<')), many0(item), ws(char('>')))
}

fn mrs(input: &str) -> Res<'_, RawMrs> {
    let (rest, _) = ws(char('['))(input)?;
    let (mut input, surface) = opt(ws(quoted))(rest)?;
    let mut raw = RawMrs {
        surface,
        ..RawMrs::default()
    };
    loop {
        let closing: Res<'_, char> = ws(char(']'))(input);
        if let Ok((rest, _)) = closing {
            return Ok((rest, raw));
        }
        let (rest, name) = feature(input)?;
        input = match name.as_str() {
            "TOP" | "LTOP" => {
                let (rest, v) = var_occ(rest)?;
                raw.top = Some(v);
                rest
            }
            "INDEX" => {
                let (rest, v) = var_occ(rest)?;
                raw.index = Some(v);
                rest
            }
            "RELS" => {
                let (rest, eps) = bag(ep)(rest)?;
                raw.rels = eps;
                rest
            }
            "HCONS" => {
                let (rest, cs) = bag(constraint)(rest)?;
                raw.hcons = cs;
                rest
            }
            "ICONS" => {
                let (rest, cs) = bag(constraint)(rest)?;
                raw.icons = cs;
                rest
            }
            // XARG and other top-level features carry no information we keep
            _ => var_occ(rest)?.0,
        };
    }
}

impl RawMrs {
    fn into_mrs(self) -> Result<Mrs, DelphinError> {
        let mut m = Mrs {
            surface: self.surface,
            ..Mrs::default()
        };
        m.top = self.top.map(|v| register(&mut m, v));
        m.index = self.index.map(|v| register(&mut m, v));

        for raw in self.rels {
            let mut label = None;
            let mut args = Vec::with_capacity(raw.args.len());
            for (role, value) in raw.args {
                match (role.as_str(), value) {
                    (LBL, Value::Var(v)) => label = Some(register(&mut m, v)),
                    (LBL, Value::Const(c)) => {
                        return Err(DelphinError::structure(
                            FORMAT,
                            format!("label of {} is a constant ({c})", raw.predicate),
                        ));
                    }
                    (_, Value::Var(v)) => {
                        let name = register(&mut m, v);
                        args.push((role, name));
                    }
                    (_, Value::Const(c)) => args.push((role, c)),
                }
            }
            let label = label.ok_or_else(|| {
                DelphinError::structure(FORMAT, format!("{} has no LBL", raw.predicate))
            })?;
            m.rels.push(ElementaryPredication {
                predicate: raw.predicate,
                label,
                args,
                lnk: raw.lnk,
                surface: raw.surface,
            });
        }

        for (hi, relation, lo) in self.hcons {
            let hi = register(&mut m, hi);
            let lo = register(&mut m, lo);
            m.hcons.push(HandleConstraint { hi, relation, lo });
        }
        for (left, relation, right) in self.icons {
            let left = register(&mut m, left);
            let right = register(&mut m, right);
            m.icons.push(IndividualConstraint {
                left,
                relation,
                right,
            });
        }
        Ok(m)
    }
}

fn register(m: &mut Mrs, v: VarOcc) -> String {
    m.add_variable(&v.name, v.props);
    v.name
}

// ============================================================================
// Writer
// ============================================================================

struct Writer<'m> {
    mrs: &'m Mrs,
    seen: HashSet<&'m str>,
    out: String,
}

impl<'m> Writer<'m> {
    fn write(&mut self) {
        let m = self.mrs;
        if let Some(surface) = &m.surface {
            self.out.push(' ');
            self.out.push_str(&quote(surface));
        }
        if let Some(top) = &m.top {
            self.out.push_str(" TOP: ");
            self.var(top);
        }
        if let Some(index) = &m.index {
            self.out.push_str(" INDEX: ");
            self.var(index);
        }
        self.out.push_str(" RELS: <");
        for ep in &m.rels {
            self.out.push_str(" [ ");
            self.out.push_str(&ep.predicate);
            if let Some(lnk) = ep.lnk {
                self.out.push_str(&lnk.to_string());
            }
            if let Some(surface) = &ep.surface {
                self.out.push(' ');
                self.out.push_str(&quote(surface));
            }
            self.out.push_str(" LBL: ");
            self.var(&ep.label);
            for (role, value) in &ep.args {
                self.out.push(' ');
                self.out.push_str(role);
                self.out.push_str(": ");
                if role == CARG {
                    self.out.push_str(&quote(value));
                } else {
                    self.var(value);
                }
            }
            self.out.push_str(" ]");
        }
        self.out.push_str(" > HCONS: <");
        for hc in &m.hcons {
            self.out.push(' ');
            self.var(&hc.hi);
            self.out.push(' ');
            self.out.push_str(&hc.relation);
            self.out.push(' ');
            self.var(&hc.lo);
        }
        self.out.push_str(" >");
        if !m.icons.is_empty() {
            self.out.push_str(" ICONS: <");
            for ic in &m.icons {
                self.out.push(' ');
                self.var(&ic.left);
                self.out.push(' ');
                self.out.push_str(&ic.relation);
                self.out.push(' ');
                self.var(&ic.right);
            }
            self.out.push_str(" >");
        }
        self.out.push_str(" ]");
    }

    /// Write a variable, with its property list on first mention.
    fn var(&mut self, name: &'m str) {
        self.out.push_str(name);
        if !self.seen.insert(name) {
            return;
        }
        let props = self.mrs.properties(name);
        if props.is_empty() {
            return;
        }
        self.out.push_str(" [ ");
        self.out.push_str(crate::variable::sort(name));
        for (key, value) in props {
            self.out.push(' ');
            self.out.push_str(key);
            self.out.push_str(": ");
            self.out.push_str(value);
        }
        self.out.push_str(" ]");
    }
}
