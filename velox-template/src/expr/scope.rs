use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use super::value::Value;
use crate::error::EvalError;

/// How far past its end one write may extend an array.
const MAX_ARRAY_GROWTH: usize = 1 << 16;

/// One step of an assignment path below the root identifier.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PathKey {
    Field(String),
    Index(usize),
}

struct Frame {
    vars: RefCell<IndexMap<String, Value>>,
    parent: Option<Rc<Frame>>,
}

/// Runtime context for expression evaluation.
///
/// The outermost frame is the template's context object; loop aliases and
/// arrow parameters push child frames. Clones share frames, so writes made by
/// an event handler are visible to the next render.
#[derive(Clone)]
pub struct Scope {
    frame: Rc<Frame>,
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.frame.vars.borrow().iter()).finish()
    }
}

impl Scope {
    pub fn new() -> Self {
        Self {
            frame: Rc::new(Frame {
                vars: RefCell::new(IndexMap::new()),
                parent: None,
            }),
        }
    }

    /// Bind `name` in this scope's innermost frame.
    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.frame.vars.borrow_mut().insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        let mut frame = Some(&self.frame);
        while let Some(f) = frame {
            if let Some(v) = f.vars.borrow().get(name) {
                return Some(v.clone());
            }
            frame = f.parent.as_ref();
        }
        None
    }

    /// A new scope whose bindings shadow this one.
    pub fn child<I, K>(&self, bindings: I) -> Scope
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Scope {
            frame: Rc::new(Frame {
                vars: RefCell::new(bindings.into_iter().map(|(k, v)| (k.into(), v)).collect()),
                parent: Some(self.frame.clone()),
            }),
        }
    }

    /// Store `value` at `name` followed by `path`.
    ///
    /// The write lands in the nearest frame binding `name`; an unbound plain
    /// name is created in the outermost (context) frame.
    pub(crate) fn assign(
        &self,
        name: &str,
        path: &[PathKey],
        value: Value,
    ) -> Result<(), EvalError> {
        let mut frame = &self.frame;
        loop {
            if frame.vars.borrow().contains_key(name) {
                break;
            }
            match &frame.parent {
                Some(parent) => frame = parent,
                None if path.is_empty() => break,
                None => return Err(EvalError::Unbound(name.to_string())),
            }
        }

        let mut vars = frame.vars.borrow_mut();
        if path.is_empty() {
            vars.insert(name.to_string(), value);
            return Ok(());
        }
        let mut slot = vars
            .get_mut(name)
            .ok_or_else(|| EvalError::Unbound(name.to_string()))?;
        for key in path {
            slot = descend(slot, key)?;
        }
        *slot = value;
        Ok(())
    }
}

fn descend<'v>(slot: &'v mut Value, key: &PathKey) -> Result<&'v mut Value, EvalError> {
    let target = slot.type_name();
    match (slot, key) {
        (Value::Object(map), PathKey::Field(field)) => Ok(map.entry(field.clone()).or_default()),
        (Value::Array(items), PathKey::Index(i)) if *i <= items.len() + MAX_ARRAY_GROWTH => {
            if *i >= items.len() {
                items.resize(i + 1, Value::Null);
            }
            Ok(&mut items[*i])
        }
        (_, key) => Err(EvalError::InvalidMember {
            target: target.to_string(),
            property: match key {
                PathKey::Field(f) => f.clone(),
                PathKey::Index(i) => i.to_string(),
            },
        }),
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Scope {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let scope = Scope::new();
        for (k, v) in iter {
            scope.set(k, v);
        }
        scope
    }
}
