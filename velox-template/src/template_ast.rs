#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Native,    // <div>
    Component, // <MyButton>
}

/// A fragment of expression text. Static ones are string literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleExpression {
    pub content: String,
    pub is_static: bool,
}

impl SimpleExpression {
    pub fn literal(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_static: true,
        }
    }

    pub fn dynamic(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_static: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: Option<String>,
}

/// `v-if="ok"`, `:value="count"`, `@click="inc"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub name: String,
    pub arg: Option<SimpleExpression>,
    pub exp: Option<SimpleExpression>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub kind: ElementKind,
    pub props: Vec<Attribute>,
    pub directives: Vec<Directive>,
    pub self_closing: bool,
    pub children: Vec<Node>,
}

impl Element {
    pub fn directive(&self, name: &str) -> Option<&Directive> {
        self.directives.iter().find(|d| d.name == name)
    }

    pub fn has_directive(&self, name: &str) -> bool {
        self.directive(name).is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Interpolation(SimpleExpression), // {{ expr }}
}

impl Node {
    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    /// Text made only of whitespace (the candidates for removal between siblings).
    pub fn is_blank_text(&self) -> bool {
        matches!(self, Node::Text(t) if t.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Root {
    pub children: Vec<Node>,
}
