use motif::ast::{Ast, AstKind, BinOp, RetAnn, UnOp};
use motif::parse;

fn parse_one(src: &str) -> Ast {
    let mut program = parse(src).expect("program should parse");
    assert_eq!(program.len(), 1, "expected a single statement for {src:?}");
    program.remove(0)
}

#[test]
fn precedence_binds_multiplication_tighter() {
    let stmt = parse_one("1 + 2 * 3");
    let AstKind::Binary { op: BinOp::Add, rhs, .. } = stmt.kind else {
        panic!("expected addition at the root, got {:?}", stmt.kind);
    };
    assert!(matches!(rhs.kind, AstKind::Binary { op: BinOp::Mul, .. }));
}

#[test]
fn binary_operators_are_left_associative() {
    let stmt = parse_one("10 - 4 - 3");
    let AstKind::Binary { op: BinOp::Sub, lhs, rhs } = stmt.kind else {
        panic!("expected subtraction at the root");
    };
    assert!(matches!(lhs.kind, AstKind::Binary { op: BinOp::Sub, .. }));
    assert!(matches!(rhs.kind, AstKind::Int(3)));
}

#[test]
fn assignment_is_right_associative_and_top_level() {
    let stmt = parse_one("a = b = 1");
    let AstKind::Assign { target, value } = stmt.kind else {
        panic!("expected assignment");
    };
    assert!(matches!(target.kind, AstKind::Ident(_)));
    assert!(matches!(value.kind, AstKind::Assign { .. }));
}

#[test]
fn ternary_attaches_after_binary_operators() {
    let stmt = parse_one("a < b ? 1 : 2");
    let AstKind::Ternary { cond, alt, .. } = stmt.kind else {
        panic!("expected ternary");
    };
    assert!(matches!(cond.kind, AstKind::Binary { op: BinOp::Lt, .. }));
    assert!(alt.is_some());

    let stmt = parse_one("a ? 1");
    assert!(matches!(stmt.kind, AstKind::Ternary { alt: None, .. }));
}

#[test]
fn unary_operators_nest() {
    let stmt = parse_one("!-x");
    let AstKind::Unary { op: UnOp::Not, operand } = stmt.kind else {
        panic!("expected logical not");
    };
    assert!(matches!(operand.kind, AstKind::Unary { op: UnOp::Neg, .. }));
}

#[test]
fn parenthesised_expression_is_not_a_tuple() {
    assert!(matches!(parse_one("(1)").kind, AstKind::Int(1)));
}

#[test]
fn trailing_comma_makes_a_tuple() {
    let AstKind::Tuple(items) = parse_one("(1,)").kind else {
        panic!("expected tuple");
    };
    assert_eq!(items.len(), 1);
    assert!(items[0].name.is_none());
}

#[test]
fn named_tuple_elements() {
    let AstKind::Tuple(items) = parse_one("(a: 10, b: 20)").kind else {
        panic!("expected tuple");
    };
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].name.as_deref(), Some("a"));
    assert_eq!(items[1].name.as_deref(), Some("b"));
}

#[test]
fn named_then_positional_elements() {
    let AstKind::Tuple(items) = parse_one("(a: 1, 2, 3)").kind else {
        panic!("expected tuple");
    };
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].name.as_deref(), Some("a"));
    assert!(items[1].name.is_none() && items[2].name.is_none());
}

#[test]
fn assignment_inside_parens_reads_as_tuple() {
    let AstKind::Tuple(items) = parse_one("(x = 1, 2)").kind else {
        panic!("expected tuple");
    };
    assert!(matches!(items[0].value.kind, AstKind::Assign { .. }));
}

#[test]
fn postfix_chain() {
    let stmt = parse_one("a.b(1)[2]");
    let AstKind::Index { object, .. } = stmt.kind else {
        panic!("expected index at the root");
    };
    let AstKind::Call { callee, args } = &object.kind else {
        panic!("expected call under index");
    };
    assert_eq!(args.len(), 1);
    assert!(matches!(callee.kind, AstKind::Member { .. }));
}

#[test]
fn less_than_stays_a_comparison() {
    let stmt = parse_one("x < y");
    assert!(matches!(stmt.kind, AstKind::Binary { op: BinOp::Lt, .. }));

    let stmt = parse_one("x < y + 1");
    assert!(matches!(stmt.kind, AstKind::Binary { op: BinOp::Lt, .. }));
}

#[test]
fn template_instantiation_commits_on_closing_angle() {
    let stmt = parse_one("f<i32>(1)");
    let AstKind::Call { callee, .. } = stmt.kind else {
        panic!("expected call");
    };
    let AstKind::TemplateInst { base, args } = &callee.kind else {
        panic!("expected template instantiation, got {:?}", callee.kind);
    };
    assert!(base.is_some());
    assert_eq!(args.len(), 1);
    assert_eq!(args[0].ty.as_deref(), Some("i32"));
}

#[test]
fn bare_template_prefix() {
    let stmt = parse_one("<i32>(x)");
    let AstKind::Call { callee, .. } = stmt.kind else {
        panic!("expected call");
    };
    assert!(matches!(&callee.kind, AstKind::TemplateInst { base: None, .. }));
}

#[test]
fn fn_declaration_with_typed_params_and_defaults() {
    let stmt = parse_one("fn f(copy a: i32, b :: const, c = 3) : (r:i32) :: constexpr { return a }");
    let AstKind::FnDecl(decl) = stmt.kind else {
        panic!("expected fn declaration");
    };
    assert_eq!(&*decl.name, "f");
    assert_eq!(decl.params.len(), 3);
    assert!(decl.params[0].qualifier.is_some());
    assert_eq!(
        decl.params[0].type_ann.as_ref().and_then(|t| t.ty.as_deref()),
        Some("i32")
    );
    assert!(decl.params[1].attrs.is_const);
    assert!(decl.params[2].default.is_some());
    assert!(matches!(decl.ret, Some(RetAnn::Tuple(_))));
    assert!(decl.attrs.is_constexpr);
    assert_eq!(decl.body.len(), 1);
}

#[test]
fn fn_declaration_with_custom_operator_name() {
    let stmt = parse_one("fn \"+>\"(a, b) { return a }");
    let AstKind::FnDecl(decl) = stmt.kind else {
        panic!("expected fn declaration");
    };
    assert_eq!(&*decl.name, "+>");
}

#[test]
fn fn_template_parameters() {
    let stmt = parse_one("fn <T:i32, U::, V:i32:3> f(a) { }");
    let AstKind::FnDecl(decl) = stmt.kind else {
        panic!("expected fn declaration");
    };
    let tmpl = decl.tmpl.as_ref().expect("template decl");
    assert_eq!(tmpl.params.len(), 3);
    assert_eq!(tmpl.params[0].ty.as_deref(), Some("i32"));
    assert!(tmpl.params[1].is_variadic);
    assert!(tmpl.params[2].is_variadic);
}

#[test]
fn var_declaration_forms() {
    let stmt = parse_one("var x : i32 :: const = 1");
    let AstKind::VarDecl { type_ann, attrs, init, .. } = stmt.kind else {
        panic!("expected var declaration");
    };
    assert_eq!(type_ann.and_then(|t| t.ty).as_deref(), Some("i32"));
    assert!(attrs.is_const);
    assert!(init.is_some());

    // bare, no annotation, no initializer
    assert!(matches!(
        parse_one("var y").kind,
        AstKind::VarDecl { init: None, type_ann: None, .. }
    ));
}

#[test]
fn var_with_double_colon_requires_initializer() {
    let error = parse("var x :: const").expect_err("should fail");
    assert!(error.message.contains("no '=' initializer"), "got {error}");
}

#[test]
fn pat_declaration_with_bases() {
    let stmt = parse_one("pat Dog : Animal | Pet :: const {\n var name\n fn speak() { }\n}");
    let AstKind::PatDecl { name, bases, attrs, body, .. } = stmt.kind else {
        panic!("expected pat declaration");
    };
    assert_eq!(&*name, "Dog");
    assert_eq!(bases.len(), 2);
    assert!(attrs.is_const);
    assert_eq!(body.len(), 2);
}

#[test]
fn import_with_alias_and_items() {
    let stmt = parse_one("import a.b.c as m of { x as y, z }");
    let AstKind::Import { path, alias, items } = stmt.kind else {
        panic!("expected import");
    };
    assert_eq!(&*path, "a.b.c");
    assert_eq!(alias.as_deref(), Some("m"));
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].alias.as_deref(), Some("y"));
    assert!(items[1].alias.is_none());
}

#[test]
fn import_cannot_be_pub() {
    let error = parse("pub import a").expect_err("should fail");
    assert!(error.message.contains("import cannot be pub"));
}

#[test]
fn switch_cases_and_default() {
    let stmt = parse_one("switch(x) { case 1: f() break case 2: { g() } break default: h() }");
    let AstKind::Switch { cases, .. } = stmt.kind else {
        panic!("expected switch");
    };
    assert_eq!(cases.len(), 3);
    assert!(cases[0].test.is_some());
    assert!(cases[2].test.is_none());
    assert_eq!(cases[0].body.len(), 1);
}

#[test]
fn for_and_while_loops() {
    let stmt = parse_one("for (i : 10) { i }");
    let AstKind::For { var, .. } = stmt.kind else {
        panic!("expected for loop");
    };
    assert_eq!(&*var, "i");

    let stmt = parse_one("while (x) { y }");
    assert!(matches!(stmt.kind, AstKind::While { pre: Some(_), .. }));
}

#[test]
fn statements_separated_by_semicolons_and_newlines() {
    let program = parse("var a = 1; var b = 2\n\n;;\nvar c = 3").expect("should parse");
    assert_eq!(program.len(), 3);
}

#[test]
fn error_message_format() {
    let error = parse("var 1").expect_err("should fail");
    let rendered = error.to_string();
    assert!(
        rendered.starts_with("Error at line 1 col 5:"),
        "unexpected rendering: {rendered}"
    );
    assert!(rendered.contains("(got <int>)"), "unexpected rendering: {rendered}");
}

#[test]
fn first_error_wins() {
    let error = parse("var 1\nvar 2").expect_err("should fail");
    assert_eq!(error.loc.line, 1);
}

#[test]
fn scope_as_expression() {
    let stmt = parse_one("var x = { 1\n2 }");
    let AstKind::VarDecl { init: Some(init), .. } = stmt.kind else {
        panic!("expected var declaration with initializer");
    };
    let AstKind::Scope(body) = &init.kind else {
        panic!("expected scope initializer");
    };
    assert_eq!(body.len(), 2);
}
