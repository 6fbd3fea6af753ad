use insta::assert_snapshot;
use velox_template::{CodegenError, CompileError, compile, generate, parse_template_to_ast};

fn r#gen(src: &str) -> String {
    compile(src).unwrap().to_string()
}

#[test]
fn codegen_div_with_text() {
    assert_eq!(r#gen("<div>hi</div>"), r#"h("div", null, "hi")"#);
}

#[test]
fn codegen_interpolation() {
    assert_eq!(
        r#gen("<p>Hello {{name}}</p>"),
        r#"h("p", null, h(Text, null, "Hello "), h(Text, null, name))"#
    );
}

#[test]
fn codegen_attrs() {
    assert_snapshot!(
        r#gen(r#"<input class="x" :value="count" @input="onInput"/>"#),
        @r#"h("input", { class: "x", value: count, onInput: onInput })"#
    );
}

#[test]
fn empty_element_uses_shortest_form() {
    assert_eq!(r#gen("<br>"), r#"h("br")"#);
    assert_eq!(r#gen("<div></div>"), r#"h("div")"#);
    assert_eq!(r#gen(r#"<div id="a"></div>"#), r#"h("div", { id: "a" })"#);
}

#[test]
fn components_resolve_by_name() {
    assert_eq!(
        r#gen(r#"<MyButton label="go"/>"#),
        r#"h(resolveComponent("MyButton"), { label: "go" })"#
    );
    assert_eq!(
        r#gen("<Card><span>x</span></Card>"),
        r#"h(resolveComponent("Card"), null, [h("span", null, "x")])"#
    );
}

#[test]
fn element_first_children_are_an_array() {
    assert_eq!(
        r#gen("<div><b>x</b> tail</div>"),
        r#"h("div", null, [h("b", null, "x"), h(Text, null, " tail")])"#
    );
}

#[test]
fn text_first_children_are_spread() {
    assert_eq!(
        r#gen("<div>a<b></b></div>"),
        r#"h("div", null, h(Text, null, "a"), h("b"))"#
    );
}

#[test]
fn static_text_is_escaped() {
    assert_eq!(
        r#gen(r#"<p>say "hi" \ bye</p>"#),
        r#"h("p", null, "say \"hi\" \\ bye")"#
    );
}

#[test]
fn keys_that_are_not_identifiers_are_quoted() {
    assert_eq!(
        r#gen(r#"<div data-id="1" aria-label="x"></div>"#),
        r#"h("div", { "data-id": "1", "aria-label": "x" })"#
    );
}

#[test]
fn attributes_precede_directives() {
    assert_eq!(
        r#gen(r#"<div :id="x" class="c"></div>"#),
        r#"h("div", { class: "c", id: x })"#
    );
}

#[test]
fn generic_directives_become_props() {
    assert_eq!(r#gen(r#"<div v-html="raw"></div>"#), r#"h("div", { innerHTML: raw })"#);
    assert_eq!(r#gen(r#"<div v-show="visible"></div>"#), r#"h("div", { show: visible })"#);
    assert_eq!(r#gen("<div v-cloak></div>"), r#"h("div", { cloak: "" })"#);
    assert_eq!(r#gen(r#"<div v-bind="attrs"></div>"#), r#"h("div", { bind: attrs })"#);
}

#[test]
fn valueless_attribute_is_empty_string() {
    assert_eq!(r#gen("<input disabled>"), r#"h("input", { disabled: "" })"#);
}

#[test]
fn root_shapes() {
    assert_eq!(r#gen(""), r#"h(Text, null, "")"#);
    assert_eq!(r#gen("hello"), r#"h(Text, null, "hello")"#);
    assert_eq!(r#gen("{{ msg }}"), r#"h(Text, null, msg)"#);
    assert_eq!(r#gen("<a></a><b></b>"), r#"[h("a"), h("b")]"#);
}

#[test]
fn nested_tree() {
    assert_snapshot!(
        r#gen(r#"<div class="app"><h1>{{ title }}</h1><ul><li>a</li><li>b</li></ul></div>"#),
        @r#"h("div", { class: "app" }, [h("h1", null, title), h("ul", null, [h("li", null, "a"), h("li", null, "b")])])"#
    );
}

#[test]
fn program_source_wraps_the_call_tree() {
    let program = compile("<div>{{ msg }}</div>").unwrap();
    let source = program.to_source();
    assert!(source.starts_with("with (ctx) {"));
    assert!(source.contains(
        "const { h, Text, Fragment, renderList, resolveComponent, withModel } = runtime"
    ));
    assert!(source.contains(r#"return h("div", null, msg)"#));
    assert!(source.ends_with('}'));
}

#[test]
fn generate_from_parsed_ast() {
    let root = parse_template_to_ast("<p>x</p>", &Default::default()).unwrap();
    assert_eq!(generate(&root).unwrap().to_string(), r#"h("p", null, "x")"#);
}

#[test]
fn invalid_expression_is_a_codegen_error() {
    let err = compile(r#"<p :title="a +">x</p>"#).unwrap_err();
    match err {
        CompileError::Codegen(CodegenError::Expression { text, .. }) => assert_eq!(text, "a +"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn compiled_programs_are_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<velox_template::RenderProgram>();
    assert_send_sync::<velox_template::Root>();
    assert_send_sync::<CompileError>();
}
