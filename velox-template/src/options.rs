/// Static compiler settings shared by the parser and code generator.
#[derive(Debug, Clone)]
pub struct CompilerOptions {
    /// Interpolation open/close delimiters.
    pub delimiters: (String, String),
    /// Tags that never have children or an end tag (`<br>`, `<input>`).
    pub is_void_tag: fn(&str) -> bool,
    /// Tags rendered as native elements; anything else resolves as a component.
    pub is_native_tag: fn(&str) -> bool,
    /// Reject `</b>` closing an `<a>`. When off, any end tag closes the element.
    pub check_end_tags: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            delimiters: ("{{".to_string(), "}}".to_string()),
            is_void_tag,
            is_native_tag,
            check_end_tags: true,
        }
    }
}

impl CompilerOptions {
    pub fn with_delimiters(mut self, open: impl Into<String>, close: impl Into<String>) -> Self {
        self.delimiters = (open.into(), close.into());
        self
    }

    pub fn with_void_tags(mut self, pred: fn(&str) -> bool) -> Self {
        self.is_void_tag = pred;
        self
    }

    pub fn with_native_tags(mut self, pred: fn(&str) -> bool) -> Self {
        self.is_native_tag = pred;
        self
    }

    pub fn with_end_tag_check(mut self, check: bool) -> Self {
        self.check_end_tags = check;
        self
    }
}

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const HTML_TAGS: &[&str] = &[
    "html", "body", "base", "head", "link", "meta", "style", "title", "address", "article",
    "aside", "footer", "header", "h1", "h2", "h3", "h4", "h5", "h6", "hgroup", "nav", "section",
    "div", "dd", "dl", "dt", "figcaption", "figure", "picture", "hr", "img", "li", "main", "ol",
    "p", "pre", "ul", "a", "b", "abbr", "bdi", "bdo", "br", "cite", "code", "data", "dfn", "em",
    "i", "kbd", "mark", "q", "rp", "rt", "ruby", "s", "samp", "small", "span", "strong", "sub",
    "sup", "time", "u", "var", "wbr", "area", "audio", "map", "track", "video", "embed", "object",
    "param", "source", "canvas", "script", "noscript", "del", "ins", "caption", "col", "colgroup",
    "table", "thead", "tbody", "td", "th", "tr", "button", "datalist", "fieldset", "form", "input",
    "label", "legend", "meter", "optgroup", "option", "output", "progress", "select", "textarea",
    "details", "dialog", "menu", "summary", "template", "blockquote", "iframe", "tfoot",
];

const SVG_TAGS: &[&str] = &[
    "svg", "animate", "circle", "clipPath", "defs", "desc", "ellipse", "filter", "g", "image",
    "line", "linearGradient", "marker", "mask", "path", "pattern", "polygon", "polyline",
    "radialGradient", "rect", "stop", "symbol", "text", "textPath", "tspan", "use", "view",
];

/// HTML void elements.
pub fn is_void_tag(tag: &str) -> bool {
    VOID_TAGS.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

/// HTML and SVG element names.
pub fn is_native_tag(tag: &str) -> bool {
    HTML_TAGS.contains(&tag) || SVG_TAGS.contains(&tag)
}
