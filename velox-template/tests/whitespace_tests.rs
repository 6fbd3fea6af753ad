use velox_template::{CompilerOptions, Node, compile, parse_template_to_ast};

fn children(src: &str) -> Vec<Node> {
    let mut root = parse_template_to_ast(src, &CompilerOptions::default()).unwrap();
    match root.children.remove(0) {
        Node::Element(el) => el.children,
        other => panic!("expected element, got {other:?}"),
    }
}

#[test]
fn runs_collapse_to_one_space() {
    assert_eq!(
        children("<p>  a \n\t b  </p>"),
        vec![Node::Text(" a b ".into())]
    );
}

#[test]
fn edge_whitespace_is_dropped() {
    let kids = children("<div>\n  <span></span>\n</div>");
    assert_eq!(kids.len(), 1);
    assert!(kids[0].is_element());
}

#[test]
fn line_break_between_elements_is_dropped() {
    let kids = children("<div><a></a>\n   <b></b></div>");
    assert_eq!(kids.len(), 2);
    assert!(kids.iter().all(Node::is_element));
}

#[test]
fn inline_space_between_elements_is_kept() {
    let kids = children("<div><a></a>   <b></b></div>");
    assert_eq!(kids.len(), 3);
    assert_eq!(kids[1], Node::Text(" ".into()));
}

#[test]
fn space_next_to_interpolation_is_kept() {
    let kids = children("<p>{{ a }} {{ b }}</p>");
    assert_eq!(kids.len(), 3);
    assert_eq!(kids[1], Node::Text(" ".into()));
}

#[test]
fn formatted_template_compiles_compactly() {
    let src = "\n<ul>\n  <li>one</li>\n  <li>two</li>\n</ul>\n";
    assert_eq!(
        compile(src).unwrap().to_string(),
        r#"h("ul", null, [h("li", null, "one"), h("li", null, "two")])"#
    );
}
