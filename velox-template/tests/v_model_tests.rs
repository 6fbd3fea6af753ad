use velox_template::{CodegenError, CompileError, compile};

fn r#gen(src: &str) -> String {
    compile(src).unwrap().to_string()
}

#[test]
fn v_model_on_native_input() {
    assert_eq!(
        r#gen(r#"<input v-model="text">"#),
        r#"h("input", withModel("input", null, () => text, value => text = value))"#
    );
}

#[test]
fn v_model_wraps_existing_props() {
    assert_eq!(
        r#gen(r#"<input type="text" v-model="form.name" :placeholder="hint">"#),
        concat!(
            r#"h("input", withModel("input", { type: "text", placeholder: hint }, "#,
            r#"() => form.name, value => form.name = value))"#
        )
    );
}

#[test]
fn v_model_on_component() {
    assert_eq!(
        r#gen(r#"<MyInput v-model="query"></MyInput>"#),
        concat!(
            r#"h(resolveComponent("MyInput"), withModel(resolveComponent("MyInput"), null, "#,
            r#"() => query, value => query = value))"#
        )
    );
}

#[test]
fn v_model_with_children() {
    assert_eq!(
        r#gen(r#"<select v-model="choice"><option>a</option></select>"#),
        concat!(
            r#"h("select", withModel("select", null, () => choice, value => choice = value), "#,
            r#"[h("option", null, "a")])"#
        )
    );
}

#[test]
fn v_model_target_must_be_assignable() {
    for src in [
        r#"<input v-model="a + b">"#,
        r#"<input v-model="getName()">"#,
        r#"<input v-model="'x'">"#,
    ] {
        match compile(src) {
            Err(CompileError::Codegen(CodegenError::InvalidModelTarget(_))) => {}
            other => panic!("{src}: expected invalid model target, got {other:?}"),
        }
    }
}

#[test]
fn v_model_accepts_index_targets() {
    assert_eq!(
        r#gen(r#"<input v-model="rows[i].label">"#),
        r#"h("input", withModel("input", null, () => rows[i].label, value => rows[i].label = value))"#
    );
}
