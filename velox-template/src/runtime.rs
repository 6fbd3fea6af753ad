//! The boundary between compiled programs and the renderer that consumes them.
//!
//! A [`Renderer`] supplies the render primitives; [`RenderProgram::render`]
//! walks the compiled call tree, evaluates each expression against a
//! [`Scope`], and calls the primitives in the order the emitted source would.

use indexmap::IndexMap;
use tracing::trace;

use crate::error::RenderError;
use crate::expr::{Expression, Function, Scope, Value};
use crate::program::{
    ChildrenCall, ElementCall, ProgramBody, PropValue, RenderNode, RenderProgram, TagRef,
    TextSource,
};

pub type Props = IndexMap<String, Value>;

/// The first argument of `h`.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag<C> {
    Element(String),
    Component(C),
    Text,
    Fragment,
}

/// The third argument of `h`.
#[derive(Debug, Clone, PartialEq)]
pub enum Children<N> {
    None,
    Text(String),
    Array(Vec<N>),
    /// Children passed as trailing arguments rather than one array.
    Spread(Vec<N>),
}

/// Getter/setter pair generated for `v-model`.
#[derive(Debug, Clone)]
pub struct ModelBinding {
    pub getter: Function,
    pub setter: Function,
}

impl ModelBinding {
    fn new(target: &Expression, scope: &Scope) -> Self {
        let (get_expr, get_scope) = (target.ast.clone(), scope.clone());
        let (set_expr, set_scope) = (target.ast.clone(), scope.clone());
        ModelBinding {
            getter: Function::new(move |_| get_expr.eval(&get_scope)),
            setter: Function::new(move |args| {
                let value = args.first().cloned().unwrap_or_default();
                set_expr.assign(&set_scope, value.clone())?;
                Ok(value)
            }),
        }
    }
}

/// Render primitives provided by the embedding runtime.
pub trait Renderer {
    type Node;
    type Component;

    /// `h(tag, props?, children?)`
    fn h(
        &mut self,
        tag: Tag<Self::Component>,
        props: Option<Props>,
        children: Children<Self::Node>,
    ) -> Result<Self::Node, RenderError>;

    /// `resolveComponent(name)`
    fn resolve_component(&mut self, name: &str) -> Result<Self::Component, RenderError>;

    /// `renderList(source, item)`: arrays yield `(item, index)`, strings
    /// `(char, index)`, a number `n` yields `(1..=n, index)` and objects
    /// `(value, key, index)`. A number that is NaN or above 2^20 is an
    /// `InvalidListSource`.
    fn render_list(
        &mut self,
        source: &Value,
        item: &mut dyn FnMut(&mut Self, &[Value]) -> Result<Self::Node, RenderError>,
    ) -> Result<Vec<Self::Node>, RenderError> {
        match source {
            Value::Null => Ok(Vec::new()),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, v)| item(self, &[v.clone(), Value::from(i)]))
                .collect(),
            Value::String(s) => s
                .chars()
                .enumerate()
                .map(|(i, c)| item(self, &[Value::String(c.to_string()), Value::from(i)]))
                .collect(),
            Value::Number(n) => {
                let count = range_len(*n).ok_or_else(|| {
                    RenderError::InvalidListSource(format!("number {}", source.to_display_string()))
                })?;
                (0..count)
                    .map(|i| item(self, &[Value::from(i + 1), Value::from(i)]))
                    .collect()
            }
            Value::Object(map) => map
                .iter()
                .enumerate()
                .map(|(i, (k, v))| item(self, &[v.clone(), Value::from(k.as_str()), Value::from(i)]))
                .collect(),
            other => Err(RenderError::InvalidListSource(other.type_name().to_string())),
        }
    }

    /// `withModel(tag, props, getter, setter)`: native elements get `value` and
    /// `onInput`, components get `modelValue` and `onUpdate:modelValue`. The
    /// handler stores its first argument.
    fn with_model(
        &mut self,
        tag: &Tag<Self::Component>,
        props: Option<Props>,
        model: ModelBinding,
    ) -> Result<Option<Props>, RenderError> {
        let mut props = props.unwrap_or_default();
        let (value_key, handler_key) = match tag {
            Tag::Component(_) => ("modelValue", "onUpdate:modelValue"),
            _ => ("value", "onInput"),
        };
        props.insert(value_key.to_string(), model.getter.call(&[])?);
        props.insert(handler_key.to_string(), Value::Function(model.setter));
        Ok(Some(props))
    }
}

/// Upper bound on the length of a `v-for="i in n"` range.
const MAX_RANGE: f64 = 1_048_576.0;

// iterations of `for (i = 0; i < n; i++)`
fn range_len(n: f64) -> Option<usize> {
    if n.is_nan() || n > MAX_RANGE {
        return None;
    }
    Some(n.max(0.0).ceil() as usize)
}

/// What a program evaluates to: one node, or a list for a multi-root template.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered<N> {
    Node(N),
    Nodes(Vec<N>),
}

impl<N> Rendered<N> {
    pub fn into_nodes(self) -> Vec<N> {
        match self {
            Rendered::Node(n) => vec![n],
            Rendered::Nodes(ns) => ns,
        }
    }
}

impl RenderProgram {
    pub fn render<R: Renderer>(
        &self,
        renderer: &mut R,
        scope: &Scope,
    ) -> Result<Rendered<R::Node>, RenderError> {
        match &self.body {
            ProgramBody::Single(node) => Ok(Rendered::Node(node.render(renderer, scope)?)),
            ProgramBody::Group(nodes) => Ok(Rendered::Nodes(
                nodes
                    .iter()
                    .map(|n| n.render(renderer, scope))
                    .collect::<Result<_, _>>()?,
            )),
        }
    }
}

impl RenderNode {
    pub fn render<R: Renderer>(&self, r: &mut R, scope: &Scope) -> Result<R::Node, RenderError> {
        match self {
            RenderNode::Element(call) => call.render(r, scope),
            RenderNode::Text(text) => r.h(Tag::Text, None, Children::Text(text.eval(scope)?)),
            RenderNode::Conditional {
                test,
                consequent,
                alternate,
            } => {
                let pass = test.ast.eval(scope)?.is_truthy();
                trace!(test = %test, pass, "conditional");
                match (pass, alternate) {
                    (true, _) => consequent.render(r, scope),
                    (false, Some(alt)) => alt.render(r, scope),
                    (false, None) => r.h(Tag::Text, None, Children::Text(String::new())),
                }
            }
            RenderNode::List {
                source,
                alias,
                body,
                ..
            } => {
                let items = source.ast.eval(scope)?;
                let nodes = r.render_list(&items, &mut |r, args| {
                    let local = scope.child(alias.iter().cloned().zip(args.iter().cloned()));
                    body.render(r, &local)
                })?;
                r.h(Tag::Fragment, None, Children::Array(nodes))
            }
        }
    }
}

impl ElementCall {
    fn render<R: Renderer>(&self, r: &mut R, scope: &Scope) -> Result<R::Node, RenderError> {
        let tag = match &self.tag {
            TagRef::Native(name) => Tag::Element(name.clone()),
            TagRef::Component(name) => Tag::Component(r.resolve_component(name)?),
        };

        let mut props = if self.props.is_empty() {
            None
        } else {
            let mut map = Props::with_capacity(self.props.len());
            for prop in &self.props {
                let value = match &prop.value {
                    PropValue::Static(s) => Value::String(s.clone()),
                    PropValue::Dynamic(e) => e.ast.eval(scope)?,
                };
                map.insert(prop.key.clone(), value);
            }
            Some(map)
        };
        if let Some(target) = &self.model {
            props = r.with_model(&tag, props, ModelBinding::new(target, scope))?;
        }

        let children = match &self.children {
            ChildrenCall::None => Children::None,
            ChildrenCall::Text(text) => Children::Text(text.eval(scope)?),
            ChildrenCall::Array(nodes) => Children::Array(render_all(nodes, r, scope)?),
            ChildrenCall::Spread(nodes) => Children::Spread(render_all(nodes, r, scope)?),
        };
        r.h(tag, props, children)
    }
}

fn render_all<R: Renderer>(
    nodes: &[RenderNode],
    r: &mut R,
    scope: &Scope,
) -> Result<Vec<R::Node>, RenderError> {
    nodes.iter().map(|n| n.render(r, scope)).collect()
}

impl TextSource {
    fn eval(&self, scope: &Scope) -> Result<String, RenderError> {
        match self {
            TextSource::Static(s) => Ok(s.clone()),
            TextSource::Dynamic(e) => Ok(e.ast.eval(scope)?.to_display_string()),
        }
    }
}
