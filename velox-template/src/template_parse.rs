use tracing::trace;

use crate::context::{ParserContext, is_html_space};
use crate::error::{ParseError, ParseErrorKind};
use crate::options::CompilerOptions;
use crate::template_ast::{
    Attribute, Directive, Element, ElementKind, Node, Root, SimpleExpression,
};

/// Hand-rolled recursive-descent parser for the template markup:
/// - nested elements, self-closing (`<input/>`) and void (`<br>`) tags
/// - attributes: static (`class="x"`), bind (`:value="expr"`), event (`@click="foo"`)
///   and `v-` directives with an optional `:arg`
/// - text and `{{ interpolation }}` splits
pub fn parse_template_to_ast(input: &str, options: &CompilerOptions) -> Result<Root, ParseError> {
    let mut ctx = ParserContext::new(input, options);
    let children = parse_children(&mut ctx)?;

    // parse_children only stops early on `</`, which nothing at the top level can close
    if !ctx.is_empty() {
        let at = ctx.offset();
        ctx.advance_by(2);
        let tag = read_tag_name(&mut ctx).unwrap_or_default();
        return Err(ctx.error_at(ParseErrorKind::UnmatchedEndTag(tag.to_string()), at));
    }

    Ok(Root { children })
}

fn parse_children(ctx: &mut ParserContext<'_>) -> Result<Vec<Node>, ParseError> {
    let mut nodes = Vec::new();
    while !is_end(ctx) {
        let node = if ctx.starts_with(&ctx.options.delimiters.0) {
            parse_interpolation(ctx)?
        } else if ctx.starts_with("<") {
            Node::Element(parse_element(ctx)?)
        } else {
            parse_text(ctx)
        };
        nodes.push(node);
    }
    Ok(normalize_whitespace(nodes))
}

fn is_end(ctx: &ParserContext<'_>) -> bool {
    ctx.is_empty() || ctx.starts_with("</")
}

/// Collapse whitespace runs in text nodes and drop the blank ones that only
/// format the markup (at either edge of the list, or a line break between two
/// elements). Remaining blank text becomes a single space.
fn normalize_whitespace(nodes: Vec<Node>) -> Vec<Node> {
    let mut keep = vec![true; nodes.len()];
    let mut collapsed: Vec<Option<String>> = vec![None; nodes.len()];

    for (i, node) in nodes.iter().enumerate() {
        let Node::Text(text) = node else { continue };
        if text.bytes().any(|b| !is_html_space(b)) {
            collapsed[i] = Some(collapse_spaces(text));
            continue;
        }
        let prev = i.checked_sub(1).and_then(|p| nodes.get(p));
        let next = nodes.get(i + 1);
        let drop = match (prev, next) {
            (Some(p), Some(n)) => {
                p.is_element() && n.is_element() && text.contains(['\r', '\n'])
            }
            _ => true,
        };
        if drop {
            keep[i] = false;
        } else {
            collapsed[i] = Some(" ".to_string());
        }
    }

    nodes
        .into_iter()
        .zip(keep)
        .zip(collapsed)
        .filter(|((_, keep), _)| *keep)
        .map(|((node, _), text)| match text {
            Some(t) => Node::Text(t),
            None => node,
        })
        .collect()
}

fn collapse_spaces(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_run = false;
    for ch in s.chars() {
        if ch.is_ascii() && is_html_space(ch as u8) {
            if !in_run {
                out.push(' ');
                in_run = true;
            }
        } else {
            out.push(ch);
            in_run = false;
        }
    }
    out
}

// text until the next '<' or open delimiter
fn parse_text(ctx: &mut ParserContext<'_>) -> Node {
    let rest = ctx.rest();
    let options = ctx.options;
    let open = options.delimiters.0.as_str();
    let end = [rest.find('<'), rest.find(open)]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(rest.len());
    trace!(offset = ctx.offset(), len = end, "parse_text");
    Node::Text(ctx.take(end).to_string())
}

fn parse_interpolation(ctx: &mut ParserContext<'_>) -> Result<Node, ParseError> {
    let start = ctx.offset();
    let options = ctx.options;
    let (open, close) = (&options.delimiters.0, &options.delimiters.1);
    ctx.advance_by(open.len());

    let Some(close_index) = ctx.rest().find(close.as_str()) else {
        return Err(ctx.error_at(ParseErrorKind::UnterminatedInterpolation, start));
    };
    let content = ctx.take(close_index).trim().to_string();
    ctx.advance_by(close.len());

    trace!(offset = start, expr = %content, "parse_interpolation");
    Ok(Node::Interpolation(SimpleExpression::dynamic(content)))
}

fn parse_element(ctx: &mut ParserContext<'_>) -> Result<Element, ParseError> {
    let mut element = parse_start_tag(ctx)?;
    trace!(tag = %element.tag, self_closing = element.self_closing, "parse_element");

    if element.self_closing || (ctx.options.is_void_tag)(&element.tag) {
        return Ok(element);
    }

    element.children = parse_children(ctx)?;
    if ctx.is_empty() {
        return Err(ctx.error(ParseErrorKind::UnexpectedEof));
    }
    parse_end_tag(ctx, &element.tag)?;

    Ok(element)
}

fn parse_start_tag(ctx: &mut ParserContext<'_>) -> Result<Element, ParseError> {
    let start = ctx.offset();
    ctx.advance_by(1); // '<'
    let Some(tag) = read_tag_name(ctx) else {
        return Err(ctx.error_at(ParseErrorKind::InvalidTagName, start));
    };
    ctx.advance_spaces();

    let (props, directives) = parse_attributes(ctx)?;
    if ctx.is_empty() {
        return Err(ctx.error(ParseErrorKind::UnexpectedEof));
    }

    let self_closing = ctx.starts_with("/>");
    ctx.advance_by(if self_closing { 2 } else { 1 });

    let kind = if (ctx.options.is_native_tag)(tag) {
        ElementKind::Native
    } else {
        ElementKind::Component
    };

    Ok(Element {
        tag: tag.to_string(),
        kind,
        props,
        directives,
        self_closing,
        children: Vec::new(),
    })
}

fn parse_end_tag(ctx: &mut ParserContext<'_>, open_tag: &str) -> Result<(), ParseError> {
    let start = ctx.offset();
    ctx.advance_by(2); // '</'
    let Some(tag) = read_tag_name(ctx) else {
        return Err(ctx.error_at(ParseErrorKind::InvalidTagName, start));
    };
    if ctx.options.check_end_tags && !tag.eq_ignore_ascii_case(open_tag) {
        return Err(ctx.error_at(
            ParseErrorKind::MismatchedEndTag {
                expected: open_tag.to_string(),
                found: tag.to_string(),
            },
            start,
        ));
    }

    match ctx.rest().find('>') {
        Some(gt) => {
            ctx.advance_by(gt + 1);
            Ok(())
        }
        None => Err(ctx.error(ParseErrorKind::UnexpectedEof)),
    }
}

// [a-zA-Z][^\s/>]*
fn read_tag_name<'a>(ctx: &mut ParserContext<'a>) -> Option<&'a str> {
    let rest = ctx.rest().as_bytes();
    if !rest.first()?.is_ascii_alphabetic() {
        return None;
    }
    let len = rest
        .iter()
        .take_while(|b| !is_html_space(**b) && **b != b'/' && **b != b'>')
        .count();
    Some(ctx.take(len))
}

fn parse_attributes(
    ctx: &mut ParserContext<'_>,
) -> Result<(Vec<Attribute>, Vec<Directive>), ParseError> {
    let mut props = Vec::new();
    let mut directives = Vec::new();
    while !ctx.is_empty() && !ctx.starts_with(">") && !ctx.starts_with("/>") {
        match parse_attribute(ctx)? {
            ParsedAttr::Static(attr) => props.push(attr),
            ParsedAttr::Directive(dir) => directives.push(dir),
        }
    }
    Ok((props, directives))
}

enum ParsedAttr {
    Static(Attribute),
    Directive(Directive),
}

fn parse_attribute(ctx: &mut ParserContext<'_>) -> Result<ParsedAttr, ParseError> {
    let start = ctx.offset();
    let rest = ctx.rest().as_bytes();
    let len = match rest.first() {
        Some(b) if !is_html_space(*b) && *b != b'/' && *b != b'>' => {
            1 + rest[1..]
                .iter()
                .take_while(|b| !is_html_space(**b) && !matches!(**b, b'/' | b'>' | b'='))
                .count()
        }
        _ => return Err(ctx.error_at(ParseErrorKind::InvalidAttributeName, start)),
    };
    let name = ctx.take(len);
    ctx.advance_spaces();

    let mut value = None;
    if ctx.starts_with("=") {
        ctx.advance_by(1);
        ctx.advance_spaces();
        value = Some(parse_attribute_value(ctx)?);
        ctx.advance_spaces();
    }
    trace!(name, ?value, "parse_attribute");

    let (dir_name, arg) = if let Some(arg) = name.strip_prefix(':') {
        ("bind", Some(arg))
    } else if let Some(arg) = name.strip_prefix('@') {
        ("on", Some(arg))
    } else if let Some(body) = name.strip_prefix("v-") {
        match body.split_once(':') {
            Some((dir, arg)) => (dir, Some(arg)),
            None => (body, None),
        }
    } else {
        return Ok(ParsedAttr::Static(Attribute {
            name: name.to_string(),
            value,
        }));
    };

    Ok(ParsedAttr::Directive(Directive {
        name: dir_name.to_string(),
        arg: arg
            .filter(|a| !a.is_empty())
            .map(|a| SimpleExpression::literal(camelize(a))),
        exp: value.map(SimpleExpression::dynamic),
    }))
}

fn parse_attribute_value(ctx: &mut ParserContext<'_>) -> Result<String, ParseError> {
    let start = ctx.offset();
    let rest = ctx.rest();
    match rest.as_bytes().first() {
        Some(&quote) if quote == b'"' || quote == b'\'' => {
            let Some(end) = rest[1..].find(quote as char) else {
                return Err(ctx.error_at(ParseErrorKind::UnterminatedAttributeValue, start));
            };
            ctx.advance_by(1);
            let value = ctx.take(end).to_string();
            ctx.advance_by(1);
            Ok(value)
        }
        Some(_) => {
            let bytes = rest.as_bytes();
            let mut end = 0;
            while end < bytes.len()
                && !is_html_space(bytes[end])
                && bytes[end] != b'>'
                && !bytes[end..].starts_with(b"/>")
            {
                end += 1;
            }
            Ok(ctx.take(end).to_string())
        }
        None => Err(ctx.error_at(ParseErrorKind::UnterminatedAttributeValue, start)),
    }
}

/// `foo-bar` -> `fooBar`
pub fn camelize(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        match chars.peek() {
            Some(next) if ch == '-' && (next.is_alphanumeric() || *next == '_') => {
                out.extend(next.to_uppercase());
                chars.next();
            }
            _ => out.push(ch),
        }
    }
    out
}
