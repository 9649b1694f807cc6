//! Elementary Dependency Structures.
//!
//! An EDS keeps one node per predication and replaces scopal structure with
//! plain edges: handle arguments point at the head of the label they scope
//! over, and quantifiers get a `BV` edge to what they bind.

use serde_json::{Map, Value};
use tracing::debug;

use crate::lnk::Lnk;
use crate::mrs::{Mrs, Properties, props_to_json};
use crate::predicate;
use crate::variable;

/// Edge from a quantifier to the node it binds.
pub const BV: &str = "BV";

#[derive(Debug, Clone, PartialEq)]
pub struct EdsNode {
    pub id: String,
    pub predicate: String,
    /// Sort of the intrinsic variable; `None` for quantifiers.
    pub node_type: Option<String>,
    pub properties: Properties,
    pub lnk: Option<Lnk>,
    pub surface: Option<String>,
    pub carg: Option<String>,
    /// `(role, target node id)` in argument order.
    pub edges: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Eds {
    pub top: Option<String>,
    pub nodes: Vec<EdsNode>,
    pub surface: Option<String>,
}

impl Eds {
    pub fn from_mrs(m: &Mrs) -> Self {
        let ids = node_ids(m);

        let nodes = m
            .rels
            .iter()
            .enumerate()
            .map(|(i, ep)| {
                let quantifier = ep.is_quantifier();
                let mut edges = Vec::new();
                if quantifier {
                    if let Some(target) = ep.iv().and_then(|iv| m.intrinsic_ep(iv)) {
                        edges.push((BV.to_string(), ids[target].clone()));
                    }
                } else {
                    for (role, value) in ep.outgoing() {
                        let target = if variable::is_handle(value) {
                            m.resolve_handle(value).map(|(t, _)| t)
                        } else {
                            m.intrinsic_ep(value)
                        };
                        match target {
                            Some(t) => edges.push((role.to_string(), ids[t].clone())),
                            None => debug!(role, value, "argument has no node to point at"),
                        }
                    }
                }
                let (node_type, properties) = match ep.iv() {
                    Some(iv) if !quantifier => {
                        (Some(variable::sort(iv).to_string()), m.properties(iv).to_vec())
                    }
                    _ => (None, Vec::new()),
                };
                EdsNode {
                    id: ids[i].clone(),
                    predicate: predicate::normalize(&ep.predicate),
                    node_type,
                    properties,
                    lnk: ep.lnk,
                    surface: ep.surface.clone(),
                    carg: ep.carg().map(str::to_string),
                    edges,
                }
            })
            .collect();

        Self {
            top: m.top_ep().map(|i| ids[i].clone()),
            nodes,
            surface: m.surface.clone(),
        }
    }

    /// Structured JSON keyed by node id; `properties` toggles `type` and `properties`.
    pub fn to_json(&self, properties: bool) -> Value {
        let mut nodes = Map::new();
        for node in &self.nodes {
            let edges: Map<String, Value> = node
                .edges
                .iter()
                .map(|(role, target)| (role.clone(), Value::String(target.clone())))
                .collect();
            let mut entry = Map::new();
            entry.insert("label".into(), node.predicate.as_str().into());
            entry.insert("edges".into(), Value::Object(edges));
            if let Some(lnk) = node.lnk {
                entry.insert("lnk".into(), lnk.to_json());
            }
            if properties {
                if let Some(node_type) = &node.node_type {
                    entry.insert("type".into(), node_type.as_str().into());
                }
                if !node.properties.is_empty() {
                    entry.insert("properties".into(), props_to_json(&node.properties));
                }
            }
            if let Some(carg) = &node.carg {
                entry.insert("carg".into(), carg.as_str().into());
            }
            nodes.insert(node.id.clone(), Value::Object(entry));
        }

        let mut out = Map::new();
        if let Some(top) = &self.top {
            out.insert("top".into(), top.as_str().into());
        }
        out.insert("nodes".into(), Value::Object(nodes));
        Value::Object(out)
    }
}

/// Nodes take their intrinsic variable as id when no other node claims it;
/// quantifiers and the rest get `_1`, `_2`, ...
fn node_ids(m: &Mrs) -> Vec<String> {
    let mut counter = 0;
    let mut fresh = || {
        counter += 1;
        format!("_{counter}")
    };
    let mut used: Vec<&str> = Vec::new();
    m.rels
        .iter()
        .map(|ep| match ep.iv() {
            Some(iv) if !ep.is_quantifier() => {
                let shared = m
                    .rels
                    .iter()
                    .filter(|other| !other.is_quantifier() && other.iv() == Some(iv))
                    .count()
                    > 1;
                if shared || used.contains(&iv) {
                    fresh()
                } else {
                    used.push(iv);
                    iv.to_string()
                }
            }
            _ => fresh(),
        })
        .collect()
}

/// Write the native single-graph EDS text form.
///
/// ```text
/// {e2:
///  _1:proper_q<0:6>[BV x3]
///  x3:named<0:6>("Abrams")[]
///  e2:_bark_v_1<7:13>[ARG1 x3]
/// }
/// ```
pub fn dumps_native(eds: &Eds) -> String {
    let mut out = format!("{{{}:", eds.top.as_deref().unwrap_or(""));
    for node in &eds.nodes {
        out.push_str("\n ");
        out.push_str(&node.id);
        out.push(':');
        out.push_str(&node.predicate);
        if let Some(lnk) = node.lnk {
            out.push_str(&lnk.to_string());
        }
        if let Some(carg) = &node.carg {
            out.push('(');
            out.push_str(&crate::syntax::quote(carg));
            out.push(')');
        }
        let edges: Vec<String> = node
            .edges
            .iter()
            .map(|(role, target)| format!("{role} {target}"))
            .collect();
        out.push('[');
        out.push_str(&edges.join(", "));
        out.push(']');
    }
    out.push_str("\n}");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mrs::fixtures::{ABRAMS_BARKS, BIG_DOG};
    use crate::simplemrs;
    use serde_json::json;

    fn eds(text: &str) -> Eds {
        Eds::from_mrs(&simplemrs::loads_one(text).unwrap())
    }

    fn node<'a>(e: &'a Eds, id: &str) -> Option<&'a EdsNode> {
        e.nodes.iter().find(|n| n.id == id)
    }

    #[test]
    fn test_ids_come_from_intrinsic_variables() {
        let e = eds(ABRAMS_BARKS);
        let ids: Vec<&str> = e.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["_1", "x3", "e2"]);
        assert_eq!(e.top.as_deref(), Some("e2"));
    }

    #[test]
    fn test_quantifier_binds_and_arguments_follow_variables() {
        let e = eds(BIG_DOG);
        assert_eq!(node(&e, "_1").unwrap().edges, [("BV".to_string(), "x3".to_string())]);
        assert_eq!(node(&e, "e8").unwrap().edges, [("ARG1".to_string(), "x3".to_string())]);
        assert_eq!(node(&e, "e2").unwrap().edges, [("ARG1".to_string(), "x3".to_string())]);
    }

    #[test]
    fn test_handle_arguments_point_at_label_heads() {
        let e = eds(
            "[ TOP: h0 INDEX: e2 RELS: < \
             [ _try_v_1<0:3> LBL: h1 ARG0: e2 ARG2: h5 ] \
             [ _go_v_1<4:6> LBL: h6 ARG0: e7 ] > \
             HCONS: < h0 qeq h1 h5 qeq h6 > ]",
        );
        assert_eq!(node(&e, "e2").unwrap().edges, [("ARG2".to_string(), "e7".to_string())]);
    }

    #[test]
    fn test_json_is_keyed_by_node_id() {
        let j = eds(ABRAMS_BARKS).to_json(true);
        assert_eq!(j["top"], "e2");
        assert_eq!(
            j["nodes"]["x3"],
            json!({
                "label": "named",
                "edges": {},
                "lnk": {"from": 0, "to": 6},
                "type": "x",
                "properties": {"PERS": "3", "NUM": "sg", "IND": "+"},
                "carg": "Abrams",
            })
        );
        assert_eq!(j["nodes"]["_1"]["edges"], json!({"BV": "x3"}));
    }

    #[test]
    fn test_json_without_properties_drops_type() {
        let j = eds(ABRAMS_BARKS).to_json(false);
        assert!(j["nodes"]["e2"].get("type").is_none());
        assert!(j["nodes"]["e2"].get("properties").is_none());
    }

    #[test]
    fn test_native_form_lists_one_node_per_line() {
        let text = dumps_native(&eds(ABRAMS_BARKS));
        assert_eq!(
            text,
            "{e2:\n _1:proper_q<0:6>[BV x3]\n x3:named<0:6>(\"Abrams\")[]\n e2:_bark_v_1<7:13>[ARG1 x3]\n}"
        );
    }
}
