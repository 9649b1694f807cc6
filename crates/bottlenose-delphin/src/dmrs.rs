//! Dependency MRS.
//!
//! A DMRS is built from an MRS by turning each predication into a node and
//! each argument into a labelled link. The link's post-slash label records
//! how the two ends were connected in the MRS:
//!
//! - `EQ`: an individual argument whose target shares the source's label
//! - `NEQ`: an individual argument whose target has a different label
//! - `H`: a handle argument resolved through a `qeq`
//! - `HEQ`: a handle argument naming the target's label directly

use serde_json::{Map, Value};
use tracing::debug;

use crate::lnk::Lnk;
use crate::mrs::{BODY, Mrs, Properties, RSTR, props_to_json};
use crate::predicate;
use crate::variable;

/// Node ids are numbered from here, in predication order.
pub const FIRST_NODE_ID: i64 = 10000;

pub const EQ_POST: &str = "EQ";
pub const NEQ_POST: &str = "NEQ";
pub const H_POST: &str = "H";
pub const HEQ_POST: &str = "HEQ";
/// Role of links that join the extra heads of a label set.
pub const MOD_ROLE: &str = "MOD";

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub nodeid: i64,
    pub predicate: String,
    /// Sort of the intrinsic variable; `None` for quantifiers.
    pub cvarsort: Option<String>,
    pub properties: Properties,
    pub lnk: Option<Lnk>,
    pub surface: Option<String>,
    pub carg: Option<String>,
    pub quantifier: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub from: i64,
    pub to: i64,
    pub rargname: String,
    pub post: String,
}

impl Link {
    fn new(from: i64, to: i64, rargname: &str, post: &str) -> Self {
        Self {
            from,
            to,
            rargname: rargname.to_string(),
            post: post.to_string(),
        }
    }

    /// `ROLE/POST`, the label drawn on the link.
    pub fn label(&self) -> String {
        format!("{}/{}", self.rargname, self.post)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dmrs {
    pub top: Option<i64>,
    pub index: Option<i64>,
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
    pub surface: Option<String>,
}

fn node_id(ep_index: usize) -> i64 {
    FIRST_NODE_ID + i64::try_from(ep_index).unwrap_or(i64::MAX - FIRST_NODE_ID)
}

impl Dmrs {
    pub fn from_mrs(m: &Mrs) -> Self {
        let nodes = m
            .rels
            .iter()
            .enumerate()
            .map(|(i, ep)| {
                let quantifier = ep.is_quantifier();
                let (cvarsort, properties) = match ep.iv() {
                    Some(iv) if !quantifier => {
                        (Some(variable::sort(iv).to_string()), m.properties(iv).to_vec())
                    }
                    _ => (None, Vec::new()),
                };
                Node {
                    nodeid: node_id(i),
                    predicate: predicate::normalize(&ep.predicate),
                    cvarsort,
                    properties,
                    lnk: ep.lnk,
                    surface: ep.surface.clone(),
                    carg: ep.carg().map(str::to_string),
                    quantifier,
                }
            })
            .collect();

        let mut links = Vec::new();
        for (i, ep) in m.rels.iter().enumerate() {
            let from = node_id(i);
            if ep.is_quantifier() {
                if let Some(target) = ep.iv().and_then(|iv| m.intrinsic_ep(iv)) {
                    links.push(Link::new(from, node_id(target), RSTR, H_POST));
                    continue;
                }
            }
            for (role, value) in ep.outgoing() {
                if ep.is_quantifier() && role == BODY {
                    continue;
                }
                if variable::is_handle(value) {
                    match m.resolve_handle(value) {
                        Some((target, via_qeq)) => {
                            let post = if via_qeq { H_POST } else { HEQ_POST };
                            links.push(Link::new(from, node_id(target), role, post));
                        }
                        None => debug!(role, value, "dropping unresolved handle argument"),
                    }
                } else if let Some(target) = m.intrinsic_ep(value) {
                    let post = if m.rels[target].label == ep.label {
                        EQ_POST
                    } else {
                        NEQ_POST
                    };
                    links.push(Link::new(from, node_id(target), role, post));
                }
            }
        }

        // remaining heads of a shared label hang off the first one
        let mut seen_labels: Vec<&str> = Vec::new();
        for ep in &m.rels {
            if seen_labels.contains(&ep.label.as_str()) {
                continue;
            }
            seen_labels.push(&ep.label);
            let heads = m.labelset_heads(&ep.label);
            if let Some((&first, rest)) = heads.split_first() {
                for &other in rest {
                    links.push(Link::new(node_id(other), node_id(first), MOD_ROLE, EQ_POST));
                }
            }
        }

        Self {
            top: m.top_ep().map(node_id),
            index: m
                .index
                .as_deref()
                .and_then(|index| m.intrinsic_ep(index))
                .map(node_id),
            nodes,
            links,
            surface: m.surface.clone(),
        }
    }

    /// Structured JSON; `properties` toggles the `sortinfo` of each node.
    pub fn to_json(&self, properties: bool) -> Value {
        let nodes: Vec<Value> = self
            .nodes
            .iter()
            .map(|node| node_to_json(node, properties))
            .collect();
        let links: Vec<Value> = self
            .links
            .iter()
            .map(|link| {
                serde_json::json!({
                    "from": link.from,
                    "to": link.to,
                    "rargname": link.rargname,
                    "post": link.post,
                })
            })
            .collect();

        let mut out = Map::new();
        if let Some(top) = self.top {
            out.insert("top".into(), top.into());
        }
        if let Some(index) = self.index {
            out.insert("index".into(), index.into());
        }
        out.insert("nodes".into(), nodes.into());
        out.insert("links".into(), links.into());
        Value::Object(out)
    }
}

fn node_to_json(node: &Node, properties: bool) -> Value {
    let mut out = Map::new();
    out.insert("nodeid".into(), node.nodeid.into());
    out.insert("predicate".into(), node.predicate.as_str().into());
    if let Some(lnk) = node.lnk {
        out.insert("lnk".into(), lnk.to_json());
    }
    if properties && !node.quantifier {
        if let Some(cvarsort) = &node.cvarsort {
            let mut sortinfo = Map::new();
            sortinfo.insert("cvarsort".into(), cvarsort.as_str().into());
            if let Value::Object(props) = props_to_json(&node.properties) {
                sortinfo.extend(props);
            }
            out.insert("sortinfo".into(), Value::Object(sortinfo));
        }
    }
    if let Some(carg) = &node.carg {
        out.insert("carg".into(), carg.as_str().into());
    }
    if let Some(surface) = &node.surface {
        out.insert("surface".into(), surface.as_str().into());
    }
    Value::Object(out)
}
