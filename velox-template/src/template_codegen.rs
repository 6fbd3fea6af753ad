use std::sync::Arc;

use tracing::{debug, trace};

use crate::directives::{ConditionalChain, ResolvedDirectives, Sibling, group_siblings};
use crate::error::CodegenError;
use crate::expr::{Expr, Expression, Lambda, parse_alias};
use crate::program::{
    ChildrenCall, ElementCall, ProgramBody, Prop, PropValue, RenderNode, RenderProgram, TagRef,
    TextSource,
};
use crate::template_ast::{Element, ElementKind, Node, Root, SimpleExpression};

/// Public API: turn a parsed template into its render program.
pub fn generate(root: &Root) -> Result<RenderProgram, CodegenError> {
    // counted after chain grouping: a whole `v-if`/`v-else` run is one root
    let mut nodes = emit_siblings(&root.children)?;
    let body = match nodes.len() {
        0 => ProgramBody::Single(RenderNode::Text(TextSource::Static(String::new()))),
        1 => ProgramBody::Single(nodes.remove(0)),
        _ => ProgramBody::Group(nodes),
    };
    debug!(roots = root.children.len(), "generate");
    Ok(RenderProgram { body })
}

/// How an element passes its children to `h`, decided by the child count and
/// the kind of the first child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChildrenShape {
    Empty,
    InlineText,
    Array,
    Spread,
}

pub(crate) fn children_shape(children: &[Node]) -> ChildrenShape {
    match children {
        [] => ChildrenShape::Empty,
        [Node::Text(_) | Node::Interpolation(_)] => ChildrenShape::InlineText,
        [Node::Element(_), ..] => ChildrenShape::Array,
        _ => ChildrenShape::Spread,
    }
}

fn emit_siblings(children: &[Node]) -> Result<Vec<RenderNode>, CodegenError> {
    group_siblings(children)
        .into_iter()
        .map(|sibling| match sibling {
            Sibling::Node(node) => emit_node(node),
            Sibling::Chain(chain) => emit_chain(&chain),
        })
        .collect()
}

fn emit_node(node: &Node) -> Result<RenderNode, CodegenError> {
    match node {
        Node::Text(t) => Ok(RenderNode::Text(TextSource::Static(t.clone()))),
        Node::Interpolation(exp) => Ok(RenderNode::Text(text_source(exp)?)),
        Node::Element(el) => emit_element(el),
    }
}

fn text_source(exp: &SimpleExpression) -> Result<TextSource, CodegenError> {
    if exp.is_static {
        Ok(TextSource::Static(exp.content.clone()))
    } else {
        Ok(TextSource::Dynamic(expression(&exp.content)?))
    }
}

/// Fold a chain into nested conditionals, innermost (last branch) first.
fn emit_chain(chain: &ConditionalChain<'_>) -> Result<RenderNode, CodegenError> {
    let mut alternate = match chain.fallback {
        Some(el) => Some(Box::new(emit_element(el)?)),
        None => None,
    };
    for el in chain.branches.iter().rev() {
        let dirs = ResolvedDirectives::classify(el);
        let test = match dirs.condition_exp() {
            Some(exp) => expression(&exp.content)?,
            None => {
                return Err(CodegenError::Expression {
                    text: String::new(),
                    message: format!("v-if on <{}> needs a condition", el.tag),
                });
            }
        };
        trace!(tag = %el.tag, test = %test, "emit_chain: branch");
        alternate = Some(Box::new(RenderNode::Conditional {
            test,
            consequent: Box::new(emit_element(el)?),
            alternate,
        }));
    }
    // a chain always has a head branch
    alternate
        .map(|node| *node)
        .ok_or_else(|| CodegenError::Expression {
            text: String::new(),
            message: "empty conditional chain".to_string(),
        })
}

/// An element's own form once any condition has been handled by its chain.
fn emit_element(el: &Element) -> Result<RenderNode, CodegenError> {
    let dirs = ResolvedDirectives::classify(el);
    let Some(for_each) = dirs.for_each else {
        return Ok(RenderNode::Element(emit_element_call(el, &dirs)?));
    };

    let content = for_each
        .exp
        .as_ref()
        .map(|e| e.content.as_str())
        .unwrap_or_default();
    let (alias_source, source) = split_for_expression(content)
        .ok_or_else(|| CodegenError::MalformedForExpression(content.to_string()))?;
    let alias = parse_alias(alias_source)
        .map_err(|_| CodegenError::MalformedForExpression(content.to_string()))?;
    if source.is_empty() {
        return Err(CodegenError::MalformedForExpression(content.to_string()));
    }
    trace!(tag = %el.tag, ?alias, source, "emit_element: v-for");

    Ok(RenderNode::List {
        source: expression(source)?,
        alias,
        alias_source: alias_source.to_string(),
        body: Box::new(RenderNode::Element(emit_element_call(el, &dirs)?)),
    })
}

fn emit_element_call(
    el: &Element,
    dirs: &ResolvedDirectives<'_>,
) -> Result<ElementCall, CodegenError> {
    let tag = match el.kind {
        ElementKind::Native => TagRef::Native(el.tag.clone()),
        ElementKind::Component => TagRef::Component(el.tag.clone()),
    };

    let model = match dirs.model {
        Some(dir) => {
            let content = dir.exp.as_ref().map(|e| e.content.as_str()).unwrap_or_default();
            let target = expression(content)?;
            if !target.ast.is_assignable() {
                return Err(CodegenError::InvalidModelTarget(content.to_string()));
            }
            Some(target)
        }
        None => None,
    };

    let children = match children_shape(&el.children) {
        ChildrenShape::Empty => ChildrenCall::None,
        ChildrenShape::InlineText => match &el.children[0] {
            Node::Interpolation(exp) => ChildrenCall::Text(text_source(exp)?),
            Node::Text(t) => ChildrenCall::Text(TextSource::Static(t.clone())),
            Node::Element(_) => ChildrenCall::Array(emit_siblings(&el.children)?),
        },
        ChildrenShape::Array => ChildrenCall::Array(emit_siblings(&el.children)?),
        ChildrenShape::Spread => ChildrenCall::Spread(emit_siblings(&el.children)?),
    };

    Ok(ElementCall {
        tag,
        props: emit_props(el, dirs)?,
        model,
        children,
    })
}

fn emit_props(el: &Element, dirs: &ResolvedDirectives<'_>) -> Result<Vec<Prop>, CodegenError> {
    let mut props: Vec<Prop> = el
        .props
        .iter()
        .map(|a| Prop {
            key: a.name.clone(),
            value: PropValue::Static(a.value.clone().unwrap_or_default()),
        })
        .collect();

    for dir in &dirs.generic {
        let arg = dir.arg.as_ref().map(|a| a.content.as_str());
        let exp = dir.exp.as_ref().map(|e| e.content.as_str());
        let prop = match dir.name.as_str() {
            "bind" => Prop {
                key: arg.unwrap_or("bind").to_string(),
                value: dynamic_value(exp)?,
            },
            "on" => Prop {
                key: format!("on{}", capitalize(arg.unwrap_or_default())),
                value: match exp {
                    Some(exp) => PropValue::Dynamic(event_handler(exp)?),
                    None => PropValue::Static(String::new()),
                },
            },
            "html" => Prop {
                key: "innerHTML".to_string(),
                value: dynamic_value(exp)?,
            },
            name => Prop {
                key: name.to_string(),
                value: dynamic_value(exp)?,
            },
        };
        props.push(prop);
    }
    Ok(props)
}

fn dynamic_value(exp: Option<&str>) -> Result<PropValue, CodegenError> {
    match exp {
        Some(exp) => Ok(PropValue::Dynamic(expression(exp)?)),
        None => Ok(PropValue::Static(String::new())),
    }
}

/// `foo()` becomes `$event => (foo())`; names and arrow functions pass through.
fn event_handler(exp: &str) -> Result<Expression, CodegenError> {
    let parsed = expression(exp)?;
    if !looks_like_bare_call(exp) {
        return Ok(parsed);
    }
    Ok(Expression {
        source: format!("$event => ({})", parsed.source),
        ast: Expr::Arrow(Arc::new(Lambda {
            params: vec!["$event".to_string()],
            body: parsed.ast,
        })),
    })
}

// ends in `( ... )` with no `)` inside the final parens, and no `=>`
pub(crate) fn looks_like_bare_call(exp: &str) -> bool {
    let exp = exp.trim();
    if exp.contains("=>") {
        return false;
    }
    let Some(inner) = exp.strip_suffix(')') else {
        return false;
    };
    match (inner.rfind('('), inner.rfind(')')) {
        (Some(open), Some(close)) => open > close,
        (Some(_), None) => true,
        _ => false,
    }
}

/// Split `item in items` / `(item, i) of items` at the first whitespace-padded
/// `in` or `of`.
pub(crate) fn split_for_expression(exp: &str) -> Option<(&str, &str)> {
    let bytes = exp.as_bytes();
    for i in 0..bytes.len() {
        if !bytes[i].is_ascii_whitespace() {
            continue;
        }
        let kw = &bytes[i + 1..];
        if (kw.starts_with(b"in") || kw.starts_with(b"of"))
            && kw.get(2).is_some_and(u8::is_ascii_whitespace)
        {
            return Some((exp[..i].trim(), exp[i + 3..].trim()));
        }
    }
    None
}

fn expression(text: &str) -> Result<Expression, CodegenError> {
    Expression::parse(text).map_err(|e| CodegenError::Expression {
        text: text.to_string(),
        message: e.to_string(),
    })
}

pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
