//! Structured JSON form of an MRS.
//!
//! ```json
//! {"relations": [{"label": "h1", "predicate": "_bark_v_1",
//!                 "arguments": {"ARG0": "e2", "ARG1": "x3"},
//!                 "lnk": {"from": 7, "to": 13}}],
//!  "constraints": [{"relation": "qeq", "high": "h0", "low": "h1"}],
//!  "variables": {"e2": {"type": "e", "properties": {"SF": "prop"}}},
//!  "top": "h0", "index": "e2"}
//! ```

use serde_json::{Map, Value, json};

use super::{ElementaryPredication, HandleConstraint, IndividualConstraint, Mrs};
use crate::DelphinError;
use crate::lnk::Lnk;
use crate::predicate;
use crate::variable;

const FORMAT: &str = "MRS JSON";

impl Mrs {
    /// Project to structured JSON; `properties` toggles variable properties.
    pub fn to_json(&self, properties: bool) -> Value {
        let relations: Vec<Value> = self.rels.iter().map(ep_to_json).collect();

        let mut constraints: Vec<Value> = self
            .hcons
            .iter()
            .map(|hc| json!({"relation": hc.relation, "high": hc.hi, "low": hc.lo}))
            .collect();
        constraints.extend(
            self.icons
                .iter()
                .map(|ic| json!({"relation": ic.relation, "left": ic.left, "right": ic.right})),
        );

        let mut variables = Map::new();
        for var in &self.variables {
            let mut entry = Map::new();
            entry.insert("type".into(), variable::sort(&var.name).into());
            if properties && !var.properties.is_empty() {
                entry.insert("properties".into(), props_to_json(&var.properties));
            }
            variables.insert(var.name.clone(), Value::Object(entry));
        }

        let mut out = Map::new();
        out.insert("relations".into(), relations.into());
        out.insert("constraints".into(), constraints.into());
        out.insert("variables".into(), Value::Object(variables));
        if let Some(top) = &self.top {
            out.insert("top".into(), top.as_str().into());
        }
        if let Some(index) = &self.index {
            out.insert("index".into(), index.as_str().into());
        }
        Value::Object(out)
    }

    /// Rebuild an MRS from [`Mrs::to_json`] output.
    pub fn from_json(value: &Value) -> Result<Self, DelphinError> {
        let obj = value
            .as_object()
            .ok_or_else(|| DelphinError::structure(FORMAT, "expected an object"))?;

        let mut m = Self {
            top: opt_str(obj, "top")?,
            index: opt_str(obj, "index")?,
            ..Self::default()
        };

        if let Some(vars) = obj.get("variables") {
            let vars = vars
                .as_object()
                .ok_or_else(|| DelphinError::structure(FORMAT, "variables must be an object"))?;
            for (name, entry) in vars {
                let props = match entry.get("properties") {
                    Some(Value::Object(p)) => p
                        .iter()
                        .map(|(k, v)| Ok((k.clone(), scalar(v)?)))
                        .collect::<Result<Vec<_>, DelphinError>>()?,
                    Some(_) => {
                        return Err(DelphinError::structure(
                            FORMAT,
                            format!("properties of {name} must be an object"),
                        ));
                    }
                    None => Vec::new(),
                };
                m.add_variable(name, props);
            }
        }

        for rel in array(obj, "relations")? {
            m.rels.push(ep_from_json(rel)?);
        }

        for c in array(obj, "constraints")? {
            let relation = req_str(c, "relation")?;
            if c.get("high").is_some() {
                m.hcons.push(HandleConstraint {
                    hi: req_str(c, "high")?,
                    relation,
                    lo: req_str(c, "low")?,
                });
            } else {
                m.icons.push(IndividualConstraint {
                    left: req_str(c, "left")?,
                    relation,
                    right: req_str(c, "right")?,
                });
            }
        }

        // variables only mentioned structurally still need an entry
        let mentioned: Vec<String> = m
            .top
            .iter()
            .chain(m.index.iter())
            .cloned()
            .chain(m.rels.iter().flat_map(|ep| {
                std::iter::once(ep.label.clone()).chain(
                    ep.args
                        .iter()
                        .filter(|(role, _)| role != super::CARG)
                        .map(|(_, v)| v.clone()),
                )
            }))
            .collect();
        for var in mentioned {
            m.add_variable(&var, Vec::new());
        }
        Ok(m)
    }
}

pub(crate) fn props_to_json(props: &[(String, String)]) -> Value {
    Value::Object(
        props
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect(),
    )
}

fn ep_to_json(ep: &ElementaryPredication) -> Value {
    let arguments: Map<String, Value> = ep
        .args
        .iter()
        .map(|(role, value)| (role.clone(), Value::String(value.clone())))
        .collect();
    let mut out = Map::new();
    out.insert("label".into(), ep.label.as_str().into());
    out.insert(
        "predicate".into(),
        predicate::normalize(&ep.predicate).into(),
    );
    out.insert("arguments".into(), Value::Object(arguments));
    if let Some(lnk) = ep.lnk {
        out.insert("lnk".into(), lnk.to_json());
    }
    if let Some(surface) = &ep.surface {
        out.insert("surface".into(), surface.as_str().into());
    }
    Value::Object(out)
}

fn ep_from_json(value: &Value) -> Result<ElementaryPredication, DelphinError> {
    let args = match value.get("arguments") {
        Some(Value::Object(a)) => a
            .iter()
            .map(|(k, v)| Ok((k.clone(), scalar(v)?)))
            .collect::<Result<Vec<_>, DelphinError>>()?,
        None => Vec::new(),
        Some(_) => {
            return Err(DelphinError::structure(
                FORMAT,
                "arguments must be an object",
            ));
        }
    };
    let lnk = match value.get("lnk") {
        Some(l) => Some(
            serde_json::from_value::<Lnk>(l.clone())
                .map_err(|e| DelphinError::structure(FORMAT, format!("bad lnk: {e}")))?,
        ),
        None => None,
    };
    Ok(ElementaryPredication {
        predicate: req_str(value, "predicate")?,
        label: req_str(value, "label")?,
        args,
        lnk,
        surface: value
            .get("surface")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

fn array<'v>(obj: &'v Map<String, Value>, key: &str) -> Result<&'v [Value], DelphinError> {
    match obj.get(key) {
        Some(Value::Array(items)) => Ok(items),
        None => Ok(Default::default()),
        Some(_) => Err(DelphinError::structure(
            FORMAT,
            format!("{key} must be an array"),
        )),
    }
}

fn req_str(value: &Value, key: &str) -> Result<String, DelphinError> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| DelphinError::structure(FORMAT, format!("missing string field {key}")))
}

fn opt_str(obj: &Map<String, Value>, key: &str) -> Result<Option<String>, DelphinError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(DelphinError::structure(
            FORMAT,
            format!("{key} must be a string"),
        )),
    }
}

/// Property values and arguments are strings, but tolerate numbers and booleans.
fn scalar(value: &Value) -> Result<String, DelphinError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(true) => Ok("+".to_string()),
        Value::Bool(false) => Ok("-".to_string()),
        _ => Err(DelphinError::structure(
            FORMAT,
            format!("expected a scalar, got {value}"),
        )),
    }
}
