#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Once;

use velox_template::{Children, Props, RenderError, Renderer, Tag, Value};

static TRACING: Once = Once::new();

/// Opt-in test logging: `RUST_LOG=velox_template=trace cargo test`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Tree built by [`RecordingRenderer`].
#[derive(Debug, Clone, PartialEq)]
pub enum VNode {
    Text(String),
    Fragment(Vec<VNode>),
    Element {
        tag: String,
        props: Option<Props>,
        children: Vec<VNode>,
        /// `true` when children arrived as an array rather than trailing args.
        array_children: bool,
    },
}

impl VNode {
    pub fn tag(&self) -> Option<&str> {
        match self {
            VNode::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn children(&self) -> &[VNode] {
        match self {
            VNode::Element { children, .. } | VNode::Fragment(children) => children,
            VNode::Text(_) => &[],
        }
    }

    pub fn prop(&self, key: &str) -> Option<&Value> {
        match self {
            VNode::Element { props: Some(p), .. } => p.get(key),
            _ => None,
        }
    }

    /// Concatenated text of the subtree.
    pub fn text(&self) -> String {
        match self {
            VNode::Text(t) => t.clone(),
            _ => self.children().iter().map(VNode::text).collect(),
        }
    }
}

/// Records `h` calls as [`VNode`]s. Components resolve to `component:<name>`
/// when registered.
#[derive(Default)]
pub struct RecordingRenderer {
    pub components: BTreeSet<String>,
    pub calls: usize,
}

impl RecordingRenderer {
    pub fn with_components(names: &[&str]) -> Self {
        Self {
            components: names.iter().map(|n| n.to_string()).collect(),
            calls: 0,
        }
    }
}

impl Renderer for RecordingRenderer {
    type Node = VNode;
    type Component = String;

    fn h(
        &mut self,
        tag: Tag<String>,
        props: Option<Props>,
        children: Children<VNode>,
    ) -> Result<VNode, RenderError> {
        self.calls += 1;
        let (children, array_children) = match children {
            Children::None => (Vec::new(), false),
            Children::Text(t) => (vec![VNode::Text(t)], false),
            Children::Array(nodes) => (nodes, true),
            Children::Spread(nodes) => (nodes, false),
        };
        Ok(match tag {
            Tag::Text => VNode::Text(children.iter().map(VNode::text).collect()),
            Tag::Fragment => VNode::Fragment(children),
            Tag::Element(tag) | Tag::Component(tag) => VNode::Element {
                tag,
                props,
                children,
                array_children,
            },
        })
    }

    fn resolve_component(&mut self, name: &str) -> Result<String, RenderError> {
        if self.components.contains(name) {
            Ok(format!("component:{name}"))
        } else {
            Err(RenderError::UnknownComponent(name.to_string()))
        }
    }
}
