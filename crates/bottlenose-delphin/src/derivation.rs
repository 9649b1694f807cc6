//! UDF derivation trees.
//!
//! ACE prints derivations in the Unified Derivation Format:
//!
//! ```text
//! (root_strict
//!  (21 sb-hd_mc_c 1.2 0 2
//!   (19 hdn_bnp-pn_c 0.3 0 1
//!    (5 abrams 0.0 0 1 ("abrams" 14 "token [ +FORM \"abrams\" ]")))
//!   (20 bark_v1 0.5 1 2 ("barks" 15 "token [ +FORM \"barks\" ]"))))
//! ```
//!
//! The outer root entity is optional.

use nom::{
    branch::alt,
    character::complete::{char, multispace1},
    combinator::map,
    multi::many0,
    number::complete::double,
    sequence::{delimited, pair, preceded, tuple},
};
use serde_json::{Map, Value};

use crate::DelphinError;
use crate::syntax::{Res, integer, parse_all, quoted, symbol, ws};

const FORMAT: &str = "UDF";
const DELIMITERS: &str = "()\"";

/// Fields a derivation node may project to JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivationField {
    Id,
    Entity,
    Score,
    Start,
    End,
    Form,
    Tokens,
}

impl DerivationField {
    /// The projection served for `derivation=json`.
    pub const SERVED: &'static [Self] = &[
        Self::Id,
        Self::Entity,
        Self::Score,
        Self::Form,
        Self::Tokens,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UdfToken {
    pub id: i64,
    /// The token's feature structure as printed by ACE.
    pub tfs: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UdfTerminal {
    pub form: String,
    pub tokens: Vec<UdfToken>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UdfDaughter {
    Node(UdfNode),
    Terminal(UdfTerminal),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UdfNode {
    pub id: i64,
    pub entity: String,
    pub score: f64,
    pub start: i64,
    pub end: i64,
    pub daughters: Vec<UdfDaughter>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Derivation {
    /// Root condition, e.g. `root_strict`.
    pub root: Option<String>,
    pub tree: UdfNode,
}

impl Derivation {
    pub fn from_udf(s: &str) -> Result<Self, DelphinError> {
        parse_all(FORMAT, s, derivation)
    }

    /// Project to JSON keeping only `fields`; daughters are always present.
    pub fn to_json(&self, fields: &[DerivationField]) -> Value {
        let tree = node_to_json(&self.tree, fields);
        match &self.root {
            Some(root) => {
                let mut out = Map::new();
                if fields.contains(&DerivationField::Entity) {
                    out.insert("entity".into(), root.as_str().into());
                }
                out.insert("daughters".into(), Value::Array(vec![tree]));
                Value::Object(out)
            }
            None => tree,
        }
    }
}

fn node_to_json(node: &UdfNode, fields: &[DerivationField]) -> Value {
    let mut out = Map::new();
    for field in fields {
        match field {
            DerivationField::Id => {
                out.insert("id".into(), node.id.into());
            }
            DerivationField::Entity => {
                out.insert("entity".into(), node.entity.as_str().into());
            }
            DerivationField::Score => {
                out.insert("score".into(), node.score.into());
            }
            DerivationField::Start => {
                out.insert("start".into(), node.start.into());
            }
            DerivationField::End => {
                out.insert("end".into(), node.end.into());
            }
            DerivationField::Form | DerivationField::Tokens => {}
        }
    }
    if !node.daughters.is_empty() {
        let daughters = node
            .daughters
            .iter()
            .map(|d| match d {
                UdfDaughter::Node(n) => node_to_json(n, fields),
                UdfDaughter::Terminal(t) => terminal_to_json(t, fields),
            })
            .collect();
        out.insert("daughters".into(), Value::Array(daughters));
    }
    Value::Object(out)
}

fn terminal_to_json(terminal: &UdfTerminal, fields: &[DerivationField]) -> Value {
    let mut out = Map::new();
    if fields.contains(&DerivationField::Form) {
        out.insert("form".into(), terminal.form.as_str().into());
    }
    if fields.contains(&DerivationField::Tokens) && !terminal.tokens.is_empty() {
        let tokens = terminal
            .tokens
            .iter()
            .map(|t| serde_json::json!({"id": t.id, "tfs": t.tfs}))
            .collect();
        out.insert("tokens".into(), Value::Array(tokens));
    }
    Value::Object(out)
}

// ============================================================================
// Reader
// ============================================================================

fn entity(input: &str) -> Res<'_, String> {
    alt((quoted, map(symbol(DELIMITERS), str::to_string)))(input)
}

fn token(input: &str) -> Res<'_, UdfToken> {
    map(pair(ws(integer), ws(quoted)), |(id, tfs)| UdfToken { id, tfs })(input)
}

fn terminal(input: &str) -> Res<'_, UdfTerminal> {
    map(
        delimited(
            char('('),
            pair(ws(quoted), many0(token)),
            ws(char(')')),
        ),
        |(form, tokens)| UdfTerminal { form, tokens },
    )(input)
}

fn daughter(input: &str) -> Res<'_, UdfDaughter> {
    ws(alt((
        map(node, UdfDaughter::Node),
        map(terminal, UdfDaughter::Terminal),
    )))(input)
}

fn node(input: &str) -> Res<'_, UdfNode> {
    map(
        delimited(
            char('('),
            tuple((
                ws(integer),
                preceded(multispace1, entity),
                ws(double),
                ws(integer),
                ws(integer),
                many0(daughter),
            )),
            ws(char(')')),
        ),
        |(id, entity, score, start, end, daughters)| UdfNode {
            id,
            entity,
            score,
            start,
            end,
            daughters,
        },
    )(input)
}

fn rooted(input: &str) -> Res<'_, Derivation> {
    map(
        delimited(char('('), pair(ws(entity), ws(node)), ws(char(')'))),
        |(root, tree)| Derivation {
            root: Some(root),
            tree,
        },
    )(input)
}

fn derivation(input: &str) -> Res<'_, Derivation> {
    ws(alt((
        map(node, |tree| Derivation { root: None, tree }),
        rooted,
    )))(input)
}
