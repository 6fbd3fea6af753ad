//! The compiled form of a template: a nested call tree over the render
//! primitives (`h`, `Text`, `Fragment`, `renderList`, `resolveComponent`,
//! `withModel`).
//!
//! `Display` prints the call tree as source text; [`RenderProgram::render`]
//! evaluates it through a [`Renderer`](crate::runtime::Renderer).

use std::fmt;

use crate::expr::{Expr, Expression};

#[derive(Debug, Clone, PartialEq)]
pub struct RenderProgram {
    pub(crate) body: ProgramBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgramBody {
    Single(RenderNode),
    /// A root with several children evaluates to a list of nodes.
    Group(Vec<RenderNode>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderNode {
    Element(ElementCall),
    /// `h(Text, null, content)`
    Text(TextSource),
    /// `test ? consequent : alternate`; a missing alternate is an empty text node.
    Conditional {
        test: Expression,
        consequent: Box<RenderNode>,
        alternate: Option<Box<RenderNode>>,
    },
    /// `h(Fragment, null, renderList(source, alias => body))`
    List {
        source: Expression,
        alias: Vec<String>,
        alias_source: String,
        body: Box<RenderNode>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum TextSource {
    Static(String),
    Dynamic(Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TagRef {
    Native(String),
    Component(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Static(String),
    Dynamic(Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prop {
    pub key: String,
    pub value: PropValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChildrenCall {
    None,
    /// A lone text or interpolation child passed as the content itself.
    Text(TextSource),
    /// Children led by an element: `[a, b]`.
    Array(Vec<RenderNode>),
    /// Children led by text: passed as trailing arguments `a, b`.
    Spread(Vec<RenderNode>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementCall {
    pub tag: TagRef,
    pub props: Vec<Prop>,
    /// `v-model` target, wrapped around the props through `withModel`.
    pub model: Option<Expression>,
    pub children: ChildrenCall,
}

impl RenderProgram {
    pub fn body(&self) -> &ProgramBody {
        &self.body
    }

    /// The root node, when the template has exactly one.
    pub fn root(&self) -> Option<&RenderNode> {
        match &self.body {
            ProgramBody::Single(node) => Some(node),
            ProgramBody::Group(_) => None,
        }
    }

    /// Full program text: the primitives are pulled from `runtime` and every
    /// free identifier resolves against `ctx`.
    pub fn to_source(&self) -> String {
        format!(
            "with (ctx) {{\n    const {{ h, Text, Fragment, renderList, resolveComponent, withModel }} = runtime\n    return {self}\n}}"
        )
    }
}

impl fmt::Display for RenderProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.body {
            ProgramBody::Single(node) => write!(f, "{node}"),
            ProgramBody::Group(nodes) => write!(f, "[{}]", join(nodes)),
        }
    }
}

impl fmt::Display for RenderNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderNode::Element(call) => write!(f, "{call}"),
            RenderNode::Text(text) => write!(f, "h(Text, null, {text})"),
            RenderNode::Conditional {
                test,
                consequent,
                alternate,
            } => {
                // a test that binds looser than `?:` keeps its own parens
                match test.ast {
                    Expr::Conditional(..) | Expr::Assign(..) | Expr::Arrow(_) => {
                        write!(f, "({test}) ? {consequent} : ")?
                    }
                    _ => write!(f, "{test} ? {consequent} : ")?,
                }
                match alternate.as_deref() {
                    Some(alt @ RenderNode::Conditional { .. }) => write!(f, "({alt})"),
                    Some(alt) => write!(f, "{alt}"),
                    None => write!(f, "{}", RenderNode::Text(TextSource::Static(String::new()))),
                }
            }
            RenderNode::List {
                source,
                alias_source,
                body,
                ..
            } => write!(
                f,
                "h(Fragment, null, renderList({source}, {alias_source} => {body}))"
            ),
        }
    }
}

impl fmt::Display for ElementCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match &self.tag {
            TagRef::Native(name) => string_lit(name),
            TagRef::Component(name) => format!("resolveComponent({})", string_lit(name)),
        };

        let mut props = if self.props.is_empty() {
            "null".to_string()
        } else {
            let entries: Vec<String> = self.props.iter().map(ToString::to_string).collect();
            format!("{{ {} }}", entries.join(", "))
        };
        if let Some(model) = &self.model {
            props = format!("withModel({tag}, {props}, () => {model}, value => {model} = value)");
        }

        match &self.children {
            ChildrenCall::None if props == "null" => write!(f, "h({tag})"),
            ChildrenCall::None => write!(f, "h({tag}, {props})"),
            ChildrenCall::Text(text) => write!(f, "h({tag}, {props}, {text})"),
            ChildrenCall::Array(nodes) => write!(f, "h({tag}, {props}, [{}])", join(nodes)),
            ChildrenCall::Spread(nodes) => write!(f, "h({tag}, {props}, {})", join(nodes)),
        }
    }
}

impl fmt::Display for Prop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if is_identifier(&self.key) {
            write!(f, "{}: {}", self.key, self.value)
        } else {
            write!(f, "{}: {}", string_lit(&self.key), self.value)
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Static(s) => f.write_str(&string_lit(s)),
            PropValue::Dynamic(e) => write!(f, "{e}"),
        }
    }
}

impl fmt::Display for TextSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextSource::Static(s) => f.write_str(&string_lit(s)),
            TextSource::Dynamic(e) => write!(f, "{e}"),
        }
    }
}

fn join(nodes: &[RenderNode]) -> String {
    nodes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// JSON string literal, which is also a valid JS string literal.
pub(crate) fn string_lit(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
