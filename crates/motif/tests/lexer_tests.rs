use motif::{Lexer, TokenKind};
use pretty_assertions::assert_eq;

fn kinds(src: &str) -> Vec<TokenKind> {
    let mut lexer = Lexer::new(src);
    let mut out = Vec::new();
    loop {
        let token = lexer.next();
        let kind = token.kind;
        out.push(kind);
        if kind == TokenKind::Eof {
            return out;
        }
    }
}

fn lexemes(src: &str) -> Vec<String> {
    let mut lexer = Lexer::new(src);
    let mut out = Vec::new();
    loop {
        let token = lexer.next();
        if token.kind == TokenKind::Eof {
            return out;
        }
        out.push(token.lexeme);
    }
}

#[test]
fn keywords_and_identifiers() {
    assert_eq!(
        kinds("fn var pat import pub foo _bar baz9"),
        vec![
            TokenKind::Fn,
            TokenKind::Var,
            TokenKind::Pat,
            TokenKind::Import,
            TokenKind::Pub,
            TokenKind::Ident,
            TokenKind::Ident,
            TokenKind::Ident,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn two_character_operators_win_over_single() {
    assert_eq!(
        kinds("<< >> <= >= == != && || :: ->"),
        vec![
            TokenKind::Shl,
            TokenKind::Shr,
            TokenKind::Le,
            TokenKind::Ge,
            TokenKind::EqEq,
            TokenKind::Ne,
            TokenKind::AndAnd,
            TokenKind::OrOr,
            TokenKind::ColonColon,
            TokenKind::Arrow,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn numeric_literals() {
    assert_eq!(
        kinds("1 23 4.5 6e2 7.5e-1 8."),
        vec![
            TokenKind::IntLit,
            TokenKind::IntLit,
            TokenKind::FloatLit,
            TokenKind::FloatLit,
            TokenKind::FloatLit,
            TokenKind::IntLit, // "8" — a bare trailing dot is not a float
            TokenKind::Dot,
            TokenKind::Eof,
        ]
    );
    assert_eq!(lexemes("4.5 6e2"), vec!["4.5", "6e2"]);
}

#[test]
fn comments_are_skipped() {
    assert_eq!(
        kinds("1 // line comment\n/* block\ncomment */ 2"),
        vec![TokenKind::IntLit, TokenKind::Newline, TokenKind::IntLit, TokenKind::Eof]
    );
}

#[test]
fn newline_insertion_outside_brackets_only() {
    // no newline tokens inside any balanced bracket span
    for src in ["(1,\n2)", "[1,\n2]", "{\n}"] {
        let got = kinds(src);
        assert!(!got.contains(&TokenKind::Newline), "unexpected newline in {src:?}");
    }
    // a closing bracket can end a statement, so a newline after it terminates
    let got = kinds("(1)\n2");
    assert_eq!(
        got,
        vec![
            TokenKind::LParen,
            TokenKind::IntLit,
            TokenKind::RParen,
            TokenKind::Newline,
            TokenKind::IntLit,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn newline_after_gt_terminates() {
    // `>` may close a template argument list, so it can end a statement
    let got = kinds("a > b\nc");
    assert!(got.contains(&TokenKind::Newline));
}

#[test]
fn newline_after_operator_is_absorbed() {
    let got = kinds("1 +\n2");
    assert_eq!(
        got,
        vec![TokenKind::IntLit, TokenKind::Plus, TokenKind::IntLit, TokenKind::Eof]
    );
}

#[test]
fn carriage_returns_are_whitespace() {
    let got = kinds("1\r\n2");
    assert_eq!(
        got,
        vec![TokenKind::IntLit, TokenKind::Newline, TokenKind::IntLit, TokenKind::Eof]
    );
}

#[test]
fn string_quotes_and_escapes() {
    assert_eq!(lexemes("'ab' \"cd\""), vec!["ab", "cd"]);
    assert_eq!(lexemes(r#"'a\nb'"#), vec!["a\nb"]);
}

#[test]
fn custom_operator_name_after_fn() {
    let mut lexer = Lexer::new("fn \"+>\" (a)");
    assert_eq!(lexer.next().kind, TokenKind::Fn);
    let op = lexer.next();
    assert_eq!(op.kind, TokenKind::CustomOp);
    assert_eq!(op.lexeme, "+>");
    assert_eq!(lexer.next().kind, TokenKind::LParen);
}

#[test]
fn positions_track_lines_and_columns() {
    let mut lexer = Lexer::new("a\n  b");
    let a = lexer.next();
    assert_eq!((a.line, a.col), (1, 1));
    let newline = lexer.next();
    assert_eq!(newline.kind, TokenKind::Newline);
    let b = lexer.next();
    assert_eq!((b.line, b.col), (2, 3));
}

#[test]
fn relex_of_spaced_lexemes_preserves_kinds() {
    // lexer reversibility on a custom-operator-free, string-free program
    let src = "var x = 1 + 2 * y << 3 >= 4";
    let mut lexer = Lexer::new(src);
    let mut parts = Vec::new();
    let mut expected = Vec::new();
    loop {
        let token = lexer.next();
        if token.kind == TokenKind::Eof {
            break;
        }
        expected.push(token.kind);
        parts.push(token.lexeme);
    }
    let rejoined = parts.join(" ");
    let mut got = kinds(&rejoined);
    got.pop(); // drop EOF
    assert_eq!(got, expected);
}

#[test]
fn unknown_byte_is_an_error_token() {
    assert_eq!(kinds("@"), vec![TokenKind::Error, TokenKind::Eof]);
}
