//! Penman serialization of DMRS and EDS graphs.
//!
//! Both models are first flattened into a generic graph of instances,
//! relations and attributes, then laid out as a tree rooted at the top
//! node. Relations that point back at an already written node become
//! references; relations into a node from one that has not been written yet
//! are inverted (`:ARG1-of`).
//!
//! ```text
//! (e2 / _bark_v_1
//!     :lnk "<7:13>"
//!     :ARG1 (x3 / named
//!               :lnk "<0:6>"
//!               :carg "Abrams"
//!               :BV-of (_1 / proper_q
//!                          :lnk "<0:6>")))
//! ```

use crate::DelphinError;
use crate::dmrs::Dmrs;
use crate::eds::Eds;
use crate::syntax::quote;

const FORMAT: &str = "Penman";

/// Attribute values: quoted strings or bare symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Constant {
    Quoted(String),
    Symbol(String),
}

impl Constant {
    fn render(&self) -> String {
        match self {
            Self::Quoted(s) => quote(s),
            Self::Symbol(s) => s.clone(),
        }
    }
}

#[derive(Debug)]
struct Instance {
    id: String,
    concept: String,
    attributes: Vec<(String, Constant)>,
}

#[derive(Debug)]
struct Relation {
    source: usize,
    role: String,
    target: usize,
}

#[derive(Debug, Default)]
struct Graph {
    top: Option<usize>,
    instances: Vec<Instance>,
    relations: Vec<Relation>,
}

/// Encode a DMRS; `properties` adds the node's morphosemantic properties.
///
/// Node ids are the sort of the node's intrinsic variable followed by its
/// position (`x2`), quantifiers use `q`. Roles carry the link's post label
/// (`ARG1-NEQ`, `RSTR-H`).
pub fn encode_dmrs(dmrs: &Dmrs, properties: bool) -> Result<String, DelphinError> {
    let mut graph = Graph::default();
    for (i, node) in dmrs.nodes.iter().enumerate() {
        let prefix = if node.quantifier {
            "q"
        } else {
            node.cvarsort.as_deref().unwrap_or("u")
        };
        let mut attributes = Vec::new();
        if let Some(lnk) = node.lnk {
            attributes.push(("lnk".to_string(), Constant::Quoted(lnk.to_string())));
        }
        if let Some(carg) = &node.carg {
            attributes.push(("carg".to_string(), Constant::Quoted(carg.clone())));
        }
        if properties {
            attributes.extend(property_attributes(&node.properties));
        }
        graph.instances.push(Instance {
            id: format!("{prefix}{}", i + 1),
            concept: node.predicate.clone(),
            attributes,
        });
    }

    let position = |nodeid: i64| dmrs.nodes.iter().position(|n| n.nodeid == nodeid);
    for link in &dmrs.links {
        let (Some(source), Some(target)) = (position(link.from), position(link.to)) else {
            return Err(DelphinError::encode(
                FORMAT,
                format!("link {} -> {} names a missing node", link.from, link.to),
            ));
        };
        graph.relations.push(Relation {
            source,
            role: format!("{}-{}", link.rargname, link.post),
            target,
        });
    }
    graph.top = dmrs.top.and_then(position);
    graph.layout()
}

/// Encode an EDS; `properties` adds each node's morphosemantic properties.
pub fn encode_eds(eds: &Eds, properties: bool) -> Result<String, DelphinError> {
    let mut graph = Graph::default();
    for node in &eds.nodes {
        let mut attributes = Vec::new();
        if let Some(lnk) = node.lnk {
            attributes.push(("lnk".to_string(), Constant::Quoted(lnk.to_string())));
        }
        if let Some(carg) = &node.carg {
            attributes.push(("carg".to_string(), Constant::Quoted(carg.clone())));
        }
        if properties {
            attributes.extend(property_attributes(&node.properties));
        }
        graph.instances.push(Instance {
            id: node.id.clone(),
            concept: node.predicate.clone(),
            attributes,
        });
    }

    let position = |id: &str| eds.nodes.iter().position(|n| n.id == id);
    for (source, node) in eds.nodes.iter().enumerate() {
        for (role, target) in &node.edges {
            let target = position(target).ok_or_else(|| {
                DelphinError::encode(FORMAT, format!("edge {role} of {} names a missing node", node.id))
            })?;
            graph.relations.push(Relation {
                source,
                role: role.clone(),
                target,
            });
        }
    }
    graph.top = eds.top.as_deref().and_then(position);
    graph.layout()
}

fn property_attributes(props: &[(String, String)]) -> impl Iterator<Item = (String, Constant)> + '_ {
    props
        .iter()
        .map(|(key, value)| (key.to_lowercase(), Constant::Symbol(value.to_lowercase())))
}

struct Layout<'g> {
    graph: &'g Graph,
    visited: Vec<bool>,
    used: Vec<bool>,
    out: String,
}

impl Graph {
    fn layout(&self) -> Result<String, DelphinError> {
        if self.instances.is_empty() {
            return Err(DelphinError::encode(FORMAT, "graph has no nodes"));
        }
        let top = self.top.unwrap_or(0);
        let mut layout = Layout {
            graph: self,
            visited: vec![false; self.instances.len()],
            used: vec![false; self.relations.len()],
            out: String::new(),
        };
        layout.node(top);
        if let Some(missed) = layout.visited.iter().position(|v| !v) {
            return Err(DelphinError::encode(
                FORMAT,
                format!(
                    "graph is disconnected: {} is not reachable from {}",
                    self.instances[missed].id, self.instances[top].id
                ),
            ));
        }
        Ok(layout.out)
    }
}

impl Layout<'_> {
    fn column(&self) -> usize {
        let line_start = self.out.rfind('\n').map_or(0, |i| i + 1);
        self.out[line_start..].chars().count()
    }

    fn newline(&mut self, indent: usize) {
        self.out.push('\n');
        self.out.extend(std::iter::repeat(' ').take(indent));
    }

    fn node(&mut self, idx: usize) {
        let graph = self.graph;
        let instance = &graph.instances[idx];
        self.visited[idx] = true;
        // continuation lines line up under the slash
        let indent = self.column() + instance.id.chars().count() + 2;
        self.out.push('(');
        self.out.push_str(&instance.id);
        self.out.push_str(" / ");
        self.out.push_str(&instance.concept);

        for (role, value) in &instance.attributes {
            self.newline(indent);
            self.out.push(':');
            self.out.push_str(role);
            self.out.push(' ');
            self.out.push_str(&value.render());
        }

        for (r, relation) in graph.relations.iter().enumerate() {
            if self.used[r] || relation.source != idx {
                continue;
            }
            self.used[r] = true;
            self.newline(indent);
            self.out.push(':');
            self.out.push_str(&relation.role);
            self.out.push(' ');
            if self.visited[relation.target] {
                self.out.push_str(&graph.instances[relation.target].id);
            } else {
                self.node(relation.target);
            }
        }

        for (r, relation) in graph.relations.iter().enumerate() {
            if self.used[r] || relation.target != idx || self.visited[relation.source] {
                continue;
            }
            self.used[r] = true;
            self.newline(indent);
            self.out.push(':');
            self.out.push_str(&relation.role);
            self.out.push_str("-of ");
            self.node(relation.source);
        }

        self.out.push(')');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mrs::fixtures::{ABRAMS_BARKS, BIG_DOG};
    use crate::simplemrs;

    #[test]
    fn test_eds_penman_inverts_quantifier_edges() {
        let eds = Eds::from_mrs(&simplemrs::loads_one(ABRAMS_BARKS).unwrap());
        let text = encode_eds(&eds, false).unwrap();
        assert_eq!(
            text,
            "(e2 / _bark_v_1\n    :lnk \"<7:13>\"\n    :ARG1 (x3 / named\n              :lnk \"<0:6>\"\n              :carg \"Abrams\"\n              :BV-of (_1 / proper_q\n                         :lnk \"<0:6>\")))"
        );
    }

    #[test]
    fn test_dmrs_penman_names_roles_with_post_labels() {
        let dmrs = Dmrs::from_mrs(&simplemrs::loads_one(BIG_DOG).unwrap());
        let text = encode_dmrs(&dmrs, false).unwrap();
        assert!(text.starts_with("(e4 / _bark_v_1"));
        assert!(text.contains(":ARG1-NEQ (x3 / _dog_n_1"));
        assert!(text.contains(":ARG1-EQ-of (e2 / _big_a_1"));
        assert!(text.contains(":RSTR-H-of (q1 / _the_q"));
    }

    #[test]
    fn test_properties_are_lowercased_attributes() {
        let eds = Eds::from_mrs(&simplemrs::loads_one(ABRAMS_BARKS).unwrap());
        let text = encode_eds(&eds, true).unwrap();
        assert!(text.contains(":num sg"));
        assert!(text.contains(":sf prop"));
        assert!(!encode_eds(&eds, false).unwrap().contains(":num"));
    }

    #[test]
    fn test_shared_targets_become_references() {
        let eds = Eds::from_mrs(
            &simplemrs::loads_one(
                "[ TOP: h0 INDEX: e2 RELS: < \
                 [ _see_v_1<0:3> LBL: h1 ARG0: e2 ARG1: x3 ARG2: x3 ] \
                 [ pron<4:7> LBL: h4 ARG0: x3 ] > HCONS: < h0 qeq h1 > ]",
            )
            .unwrap(),
        );
        let text = encode_eds(&eds, false).unwrap();
        assert!(text.contains(":ARG1 (x3 / pron"));
        assert!(text.ends_with(":ARG2 x3)"));
    }

    #[test]
    fn test_disconnected_graphs_are_rejected() {
        let eds = Eds::from_mrs(
            &simplemrs::loads_one(
                "[ TOP: h0 INDEX: e2 RELS: < \
                 [ _rain_v_1<0:4> LBL: h1 ARG0: e2 ] \
                 [ _snow_v_1<5:9> LBL: h3 ARG0: e4 ] > HCONS: < h0 qeq h1 > ]",
            )
            .unwrap(),
        );
        let err = encode_eds(&eds, false).unwrap_err();
        assert!(matches!(err, DelphinError::Encode { .. }));
    }
}
