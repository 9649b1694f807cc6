//! Minimal Recursion Semantics.
//!
//! [`Mrs`] is the hub representation: ACE emits SimpleMRS, and both
//! [`Dmrs`](crate::Dmrs) and [`Eds`](crate::Eds) are computed from it.

mod json;
pub mod simplemrs;

pub(crate) use json::props_to_json;

use crate::lnk::Lnk;
use crate::predicate;
use crate::variable;

/// Role of the intrinsic variable.
pub const ARG0: &str = "ARG0";
/// Role holding a constant argument (e.g. a name).
pub const CARG: &str = "CARG";
/// Restriction of a quantifier.
pub const RSTR: &str = "RSTR";
/// Body of a quantifier.
pub const BODY: &str = "BODY";
/// Label pseudo-role used by SimpleMRS.
pub const LBL: &str = "LBL";

/// Ordered `(PROPERTY, value)` pairs of a variable.
pub type Properties = Vec<(String, String)>;

/// One elementary predication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementaryPredication {
    pub predicate: String,
    pub label: String,
    /// Arguments in source order, including `ARG0` and `CARG`.
    pub args: Vec<(String, String)>,
    pub lnk: Option<Lnk>,
    pub surface: Option<String>,
}

impl ElementaryPredication {
    pub fn arg(&self, role: &str) -> Option<&str> {
        self.args
            .iter()
            .find(|(r, _)| r == role)
            .map(|(_, v)| v.as_str())
    }

    /// The intrinsic variable (`ARG0`).
    pub fn iv(&self) -> Option<&str> {
        self.arg(ARG0)
    }

    pub fn carg(&self) -> Option<&str> {
        self.arg(CARG)
    }

    pub fn is_quantifier(&self) -> bool {
        self.arg(RSTR).is_some()
    }

    /// Arguments that point at other structure: everything but `ARG0` and `CARG`.
    pub fn outgoing(&self) -> impl Iterator<Item = (&str, &str)> {
        self.args
            .iter()
            .filter(|(r, _)| r != ARG0 && r != CARG)
            .map(|(r, v)| (r.as_str(), v.as_str()))
    }
}

/// `hi qeq lo` and friends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleConstraint {
    pub hi: String,
    pub relation: String,
    pub lo: String,
}

/// Individual constraints (information structure).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndividualConstraint {
    pub left: String,
    pub relation: String,
    pub right: String,
}

/// A variable and its morphosemantic properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub properties: Properties,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mrs {
    pub top: Option<String>,
    pub index: Option<String>,
    pub rels: Vec<ElementaryPredication>,
    pub hcons: Vec<HandleConstraint>,
    pub icons: Vec<IndividualConstraint>,
    /// Every variable in order of first appearance.
    pub variables: Vec<Variable>,
    pub surface: Option<String>,
}

impl Mrs {
    pub fn properties(&self, var: &str) -> &[(String, String)] {
        self.variables
            .iter()
            .find(|v| v.name == var)
            .map(|v| v.properties.as_slice())
            .unwrap_or(&[])
    }

    /// Register `var` if unseen and merge `props` into its properties.
    pub(crate) fn add_variable(&mut self, var: &str, props: Properties) {
        let idx = match self.variables.iter().position(|v| v.name == var) {
            Some(idx) => idx,
            None => {
                self.variables.push(Variable {
                    name: var.to_string(),
                    properties: Vec::new(),
                });
                self.variables.len() - 1
            }
        };
        let existing = &mut self.variables[idx].properties;
        for (key, value) in props {
            match existing.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => existing.push((key, value)),
            }
        }
    }

    /// The `lo` of a `qeq` whose `hi` is `hole`.
    pub fn qeq(&self, hole: &str) -> Option<&str> {
        self.hcons
            .iter()
            .find(|hc| hc.hi == hole && hc.relation.eq_ignore_ascii_case("qeq"))
            .map(|hc| hc.lo.as_str())
    }

    /// Indices of the predications sharing `label`.
    pub fn labelset(&self, label: &str) -> Vec<usize> {
        self.rels
            .iter()
            .enumerate()
            .filter(|(_, ep)| ep.label == label)
            .map(|(i, _)| i)
            .collect()
    }

    /// The non-quantifier predication introducing `var`, if any.
    pub fn intrinsic_ep(&self, var: &str) -> Option<usize> {
        self.rels
            .iter()
            .position(|ep| !ep.is_quantifier() && ep.iv() == Some(var))
    }

    fn is_quantified(&self, var: &str) -> bool {
        self.rels
            .iter()
            .any(|ep| ep.is_quantifier() && ep.iv() == Some(var))
    }

    /// Heads of a label set, best candidate first.
    ///
    /// A head has no argument pointing at another member of its set. Ties
    /// prefer quantified or quantifier predications, then surface
    /// predicates, then abstract ones.
    pub fn labelset_heads(&self, label: &str) -> Vec<usize> {
        let members = self.labelset(label);
        if members.len() <= 1 {
            return members;
        }
        let mut heads: Vec<usize> = members
            .iter()
            .copied()
            .filter(|&i| {
                !self.rels[i].outgoing().any(|(_, value)| {
                    members
                        .iter()
                        .any(|&j| j != i && self.rels[j].iv() == Some(value))
                })
            })
            .collect();
        if heads.is_empty() {
            heads = members;
        }
        heads.sort_by_key(|&i| {
            let ep = &self.rels[i];
            if ep.is_quantifier() || ep.iv().is_some_and(|iv| self.is_quantified(iv)) {
                0
            } else if predicate::is_surface(&predicate::normalize(&ep.predicate)) {
                1
            } else {
                2
            }
        });
        heads
    }

    pub fn labelset_head(&self, label: &str) -> Option<usize> {
        self.labelset_heads(label).into_iter().next()
    }

    /// Resolve a handle argument to the head it scopes over.
    ///
    /// Returns the head index and whether the resolution went through a
    /// `qeq` (`true`) or named the label directly (`false`).
    pub fn resolve_handle(&self, handle: &str) -> Option<(usize, bool)> {
        if !variable::is_handle(handle) {
            return None;
        }
        if let Some(lo) = self.qeq(handle) {
            return self.labelset_head(lo).map(|i| (i, true));
        }
        self.labelset_head(handle).map(|i| (i, false))
    }

    /// The predication at the top of the structure.
    pub fn top_ep(&self) -> Option<usize> {
        self.top
            .as_deref()
            .and_then(|top| self.resolve_handle(top))
            .map(|(i, _)| i)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{ABRAMS_BARKS, BIG_DOG};
    use super::simplemrs;

    #[test]
    fn test_top_resolves_through_qeq() {
        let m = simplemrs::loads_one(ABRAMS_BARKS).unwrap();
        let top = m.top_ep().unwrap();
        assert_eq!(m.rels[top].predicate, "_bark_v_1");
    }

    #[test]
    fn test_labelset_head_prefers_the_modified_noun() {
        let m = simplemrs::loads_one(BIG_DOG).unwrap();
        let head = m.labelset_head("h7").unwrap();
        assert_eq!(m.rels[head].predicate, "_dog_n_1");
    }

    #[test]
    fn test_intrinsic_ep_skips_quantifiers() {
        let m = simplemrs::loads_one(ABRAMS_BARKS).unwrap();
        assert_eq!(m.intrinsic_ep("x3"), Some(1));
        assert_eq!(m.intrinsic_ep("h4"), None);
    }

    #[test]
    fn test_properties_follow_first_mention() {
        let m = simplemrs::loads_one(ABRAMS_BARKS).unwrap();
        assert_eq!(
            m.properties("x3"),
            &[
                ("PERS".to_string(), "3".to_string()),
                ("NUM".to_string(), "sg".to_string()),
                ("IND".to_string(), "+".to_string()),
            ]
        );
        assert!(m.properties("h4").is_empty());
    }
}
