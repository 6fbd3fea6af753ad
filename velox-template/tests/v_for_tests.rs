use velox_template::{CodegenError, CompileError, RenderNode, compile};

fn r#gen(src: &str) -> String {
    compile(src).unwrap().to_string()
}

#[test]
fn v_for_renders_a_fragment_over_render_list() {
    assert_eq!(
        r#gen(r#"<ul><li v-for="item in items">{{item}}</li></ul>"#),
        r#"h("ul", null, [h(Fragment, null, renderList(items, item => h("li", null, item)))])"#
    );
}

#[test]
fn v_for_accepts_of_and_tuple_alias() {
    assert_eq!(
        r#gen(r#"<li v-for="(todo, i) of list.todos">{{ i }}: {{ todo.text }}</li>"#),
        concat!(
            r#"h(Fragment, null, renderList(list.todos, (todo, i) => "#,
            r#"h("li", null, h(Text, null, i), h(Text, null, ": "), h(Text, null, todo.text))))"#
        )
    );
}

#[test]
fn v_for_keeps_other_props() {
    assert_eq!(
        r#gen(r#"<li v-for="x in xs" :key="x.id" class="row"></li>"#),
        r#"h(Fragment, null, renderList(xs, x => h("li", { class: "row", key: x.id })))"#
    );
}

#[test]
fn v_for_alias_is_parsed() {
    let program = compile(r#"<p v-for="(value, key, index) in obj"></p>"#).unwrap();
    match program.root() {
        Some(RenderNode::List { alias, source, .. }) => {
            assert_eq!(alias, &["value", "key", "index"]);
            assert_eq!(source.source, "obj");
        }
        other => panic!("expected list, got {other:?}"),
    }
}

#[test]
fn nested_v_for() {
    assert_eq!(
        r#gen(r#"<div v-for="row in rows"><span v-for="cell in row">{{ cell }}</span></div>"#),
        concat!(
            r#"h(Fragment, null, renderList(rows, row => h("div", null, "#,
            r#"[h(Fragment, null, renderList(row, cell => h("span", null, cell)))])))"#
        )
    );
}

#[test]
fn malformed_v_for_is_rejected() {
    for src in [
        r#"<li v-for="items"></li>"#,
        r#"<li v-for="x in "></li>"#,
        r#"<li v-for="(a b) in xs"></li>"#,
        "<li v-for></li>",
    ] {
        match compile(src) {
            Err(CompileError::Codegen(CodegenError::MalformedForExpression(_))) => {}
            other => panic!("{src}: expected malformed v-for, got {other:?}"),
        }
    }
}
