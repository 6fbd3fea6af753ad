use velox_template::expr::{Expr, parse_alias, parse_expr};
use velox_template::{EvalError, Expression, Function, Scope, Value};

fn eval(src: &str, scope: &Scope) -> Value {
    parse_expr(src).unwrap().eval(scope).unwrap()
}

fn scope() -> Scope {
    let user: Value = [("name", Value::from("Ada")), ("age", Value::from(36))]
        .into_iter()
        .collect();
    [
        ("count", Value::from(2)),
        ("items", Value::from(vec![Value::from("a"), Value::from("b")])),
        ("user", user),
        ("empty", Value::Null),
    ]
    .into_iter()
    .collect()
}

#[test]
fn arithmetic_and_precedence() {
    let s = Scope::new();
    assert_eq!(eval("1 + 2 * 3", &s), Value::from(7));
    assert_eq!(eval("(1 + 2) * 3", &s), Value::from(9));
    assert_eq!(eval("10 % 4 - -1", &s), Value::from(3));
    assert_eq!(eval("'a' + 1", &s), Value::from("a1"));
}

#[test]
fn comparison_and_logic() {
    let s = scope();
    assert_eq!(eval("count > 1 && count <= 2", &s), Value::Bool(true));
    assert_eq!(eval("count === '2'", &s), Value::Bool(false));
    assert_eq!(eval("count == '2'", &s), Value::Bool(true));
    assert_eq!(eval("!count", &s), Value::Bool(false));
    assert_eq!(eval("empty || 'fallback'", &s), Value::from("fallback"));
    assert_eq!(eval("empty ?? 0", &s), Value::from(0));
    assert_eq!(eval("count ? 'yes' : 'no'", &s), Value::from("yes"));
}

#[test]
fn members_and_indexing() {
    let s = scope();
    assert_eq!(eval("user.name", &s), Value::from("Ada"));
    assert_eq!(eval("user['age'] + 1", &s), Value::from(37));
    assert_eq!(eval("items[1]", &s), Value::from("b"));
    assert_eq!(eval("items.length", &s), Value::from(2));
    assert_eq!(eval("user.missing", &s), Value::Null);
}

#[test]
fn literals() {
    let s = Scope::new();
    assert_eq!(
        eval("[1, 'two', true, null]", &s),
        Value::from(vec![
            Value::from(1),
            Value::from("two"),
            Value::Bool(true),
            Value::Null
        ])
    );
    let obj = eval(r#"{ a: 1, "b-c": 'x\'y' }"#, &s);
    assert_eq!(
        obj,
        [("a", Value::from(1)), ("b-c", Value::from("x'y"))]
            .into_iter()
            .collect::<Value>()
    );
}

#[test]
fn unbound_names_are_errors() {
    let err = parse_expr("missing + 1").unwrap().eval(&Scope::new()).unwrap_err();
    assert_eq!(err, EvalError::Unbound("missing".into()));
}

#[test]
fn member_of_null_is_an_error() {
    let err = parse_expr("empty.x").unwrap().eval(&scope()).unwrap_err();
    assert!(matches!(err, EvalError::InvalidMember { .. }));
}

#[test]
fn host_functions_and_closures() {
    let s = scope();
    s.set(
        "double",
        Function::new(|args| Ok(Value::from(args[0].to_number() * 2.0))),
    );
    assert_eq!(eval("double(count)", &s), Value::from(4));

    let f = eval("(a, b) => a + b + count", &s);
    let f = f.as_function().unwrap();
    assert_eq!(f.call(&[Value::from(1), Value::from(2)]).unwrap(), Value::from(5));

    let err = parse_expr("count()").unwrap().eval(&s).unwrap_err();
    assert_eq!(err, EvalError::NotCallable("count".into()));
}

#[test]
fn assignment_writes_through_the_scope() {
    let s = scope();
    assert_eq!(eval("count += 3", &s), Value::from(5));
    assert_eq!(s.get("count"), Some(Value::from(5)));

    eval("user.name = 'Grace'", &s);
    assert_eq!(eval("user.name", &s), Value::from("Grace"));

    eval("items[0] = 'z'", &s);
    assert_eq!(eval("items[0]", &s), Value::from("z"));
}

#[test]
fn assignment_to_an_unbound_name_creates_it_in_the_outer_frame() {
    let outer = Scope::new();
    let inner = outer.child([("x", Value::from(1))]);
    eval("x = 2", &inner);
    eval("fresh = 'new'", &inner);
    assert_eq!(outer.get("x"), None);
    assert_eq!(outer.get("fresh"), Some(Value::from("new")));
    assert_eq!(inner.get("x"), Some(Value::from(2)));
}

#[test]
fn child_scopes_shadow_parents() {
    let s = scope();
    let local = s.child([("count", Value::from(10))]);
    assert_eq!(eval("count", &local), Value::from(10));
    assert_eq!(eval("count", &s), Value::from(2));
    assert_eq!(eval("user.name", &local), Value::from("Ada"));
}

#[test]
fn syntax_errors_are_reported() {
    assert!(parse_expr("a +").is_err());
    assert!(parse_expr("(a").is_err());
    assert!(parse_expr("1 = 2").is_err());
    assert!(Expression::parse("").is_err());
}

#[test]
fn assignability() {
    assert!(parse_expr("a").unwrap().is_assignable());
    assert!(parse_expr("a.b[c]").unwrap().is_assignable());
    assert!(!parse_expr("a()").unwrap().is_assignable());
    assert!(matches!(parse_expr("a = 1").unwrap(), Expr::Assign(..)));
}

#[test]
fn aliases() {
    assert_eq!(parse_alias("item").unwrap(), vec!["item"]);
    assert_eq!(parse_alias("( v , k, i )").unwrap(), vec!["v", "k", "i"]);
    assert!(parse_alias("a.b").is_err());
}

#[test]
fn display_strings() {
    assert_eq!(Value::Null.to_display_string(), "");
    assert_eq!(Value::from(3).to_display_string(), "3");
    assert_eq!(Value::from(1.5).to_display_string(), "1.5");
    assert_eq!(Value::Number(f64::NAN).to_display_string(), "NaN");
    assert_eq!(Value::Bool(true).to_display_string(), "true");
    assert_eq!(
        Value::from(vec![Value::from(1), Value::from(2)]).to_display_string(),
        "[\n  1,\n  2\n]"
    );
}

#[test]
fn exponent_literals() {
    let s = Scope::new();
    assert_eq!(eval("1e3 + 2.5E-1", &s), Value::from(1000.25));
    assert_eq!(eval(".5e1", &s), Value::from(5));
    assert_eq!(eval("1e18 > 1e17", &s), Value::Bool(true));
    assert!(parse_expr("1e").is_err());
}

#[test]
fn out_of_range_index_writes_are_errors() {
    let s = Scope::new();
    s.set("arr", vec![Value::from(0)]);
    for target in ["arr[100000000000000000000] = 1", "arr[1e9] = 1", "arr[-1] = 1"] {
        let err = parse_expr(target).unwrap().eval(&s).unwrap_err();
        assert!(
            matches!(err, EvalError::InvalidMember { .. }),
            "{target}: {err:?}"
        );
    }

    let handler = eval("() => arr[1e20] = 1", &s);
    let err = handler.as_function().unwrap().call(&[]).unwrap_err();
    assert!(matches!(err, EvalError::InvalidMember { .. }));

    // a write a little past the end pads with nulls
    eval("arr[3] = 'x'", &s);
    assert_eq!(eval("arr.length", &s), Value::from(4));
    assert_eq!(eval("arr[2]", &s), Value::Null);
    assert_eq!(eval("arr[1e20]", &s), Value::Null);
}

#[test]
fn value_accessors() {
    let s = scope();
    assert_eq!(eval("user.name", &s).as_str(), Some("Ada"));
    assert_eq!(Value::from(1).as_str(), None);
    assert_eq!(Value::from(3).as_index(), Some(3));
    assert_eq!(Value::from(1.5).as_index(), None);
    assert_eq!(Value::from(-1).as_index(), None);
    assert_eq!(Value::from(1e20).as_index(), None);
    assert_eq!(Value::Number(f64::INFINITY).as_index(), None);
    assert_eq!(Value::from("3").as_index(), None);
}
