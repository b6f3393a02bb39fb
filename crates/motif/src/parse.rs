//! Recursive-descent parser.
//!
//! Statements are separated (not gated) by newline/semicolon terminator
//! tokens. Binary expressions use Pratt-style precedence climbing; assignment
//! and the ternary are recognized only at the top of expression parsing.
//!
//! Three constructs need disambiguation:
//! - `::` directly after a declared name means attributes with the type
//!   omitted; `:` means a type, optionally followed by `::attrs`.
//! - `(` opens a parenthesised expression, an unnamed tuple, or a named tuple
//!   (`(name: expr, …)`), decided after the first element.
//! - Postfix `<` is either less-than or a template-argument list; the parser
//!   snapshots the lexer and its current token, attempts the template form,
//!   and rolls back when no closing `>` materializes.

use std::rc::Rc;

use crate::{
    ast::{
        Ast, AstKind, Attrs, BinOp, CodeLoc, FnDecl, ImportItem, Param, ParamQual, RetAnn, SwitchCase, TemplateDecl,
        TemplateParam, TupleItem, TypeAnn, UnOp,
    },
    error::ParseError,
    lex::{Lexer, Token, TokenKind},
};

/// Parses a complete program. Returns the first syntax error, if any.
pub fn parse(src: &str) -> Result<Vec<Ast>, ParseError> {
    let mut parser = Parser::new(src);
    let program = parser.parse_program();
    match parser.error {
        Some(error) => Err(error),
        None => Ok(program),
    }
}

struct Parser<'src> {
    lexer: Lexer<'src>,
    cur: Token,
    /// First error wins; later failures are suppressed.
    error: Option<ParseError>,
}

impl<'src> Parser<'src> {
    fn new(src: &'src str) -> Self {
        let mut lexer = Lexer::new(src);
        let cur = lexer.next();
        Self {
            lexer,
            cur,
            error: None,
        }
    }

    fn had_error(&self) -> bool {
        self.error.is_some()
    }

    fn record_error(&mut self, message: impl Into<String>) {
        if self.error.is_none() {
            self.error = Some(ParseError::new(message, self.cur.loc(), self.cur.kind));
        }
    }

    fn loc(&self) -> CodeLoc {
        self.cur.loc()
    }

    fn advance(&mut self) {
        self.cur = self.lexer.next();
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.cur.kind == kind
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            return true;
        }
        false
    }

    fn expect(&mut self, kind: TokenKind) {
        if self.check(kind) {
            self.advance();
        } else {
            self.record_error(format!("expected '{kind}'"));
        }
    }

    fn skip_terminators(&mut self) {
        while matches!(self.cur.kind, TokenKind::Newline | TokenKind::Semi) {
            self.advance();
        }
    }

    /// Takes the current token's lexeme as a shared string and advances.
    fn take_name(&mut self) -> Rc<str> {
        let name = Rc::from(self.cur.lexeme.as_str());
        self.advance();
        name
    }

    // ------------------------------------------------------------- program

    fn parse_program(&mut self) -> Vec<Ast> {
        let mut program = Vec::new();
        self.skip_terminators();
        while !self.check(TokenKind::Eof) && !self.had_error() {
            match self.parse_stmt() {
                Some(stmt) => program.push(stmt),
                None if !self.had_error() => break,
                None => {}
            }
            self.skip_terminators();
        }
        program
    }

    // ---------------------------------------------------------- statements

    fn parse_stmt(&mut self) -> Option<Ast> {
        let is_pub = self.eat(TokenKind::Pub);

        match self.cur.kind {
            TokenKind::Fn => self.parse_fn_decl(is_pub),
            TokenKind::Var => self.parse_var_decl(is_pub),
            TokenKind::Pat => self.parse_pat_decl(is_pub),
            TokenKind::Import => {
                if is_pub {
                    self.record_error("import cannot be pub");
                }
                self.parse_import_decl()
            }
            TokenKind::For => self.parse_for(),
            TokenKind::While => self.parse_while(),
            TokenKind::Switch => self.parse_switch(),
            TokenKind::Break => {
                let loc = self.loc();
                self.advance();
                Some(Ast::new(AstKind::Break, loc))
            }
            TokenKind::Yield => {
                let loc = self.loc();
                self.advance();
                let value = self.parse_optional_stmt_value();
                Some(Ast::new(AstKind::Yield(value), loc))
            }
            TokenKind::Return => {
                let loc = self.loc();
                self.advance();
                let value = self.parse_optional_stmt_value();
                Some(Ast::new(AstKind::Return(value), loc))
            }
            TokenKind::LBrace => {
                let loc = self.loc();
                let body = self.parse_scope_block();
                Some(Ast::new(AstKind::Scope(body), loc))
            }
            _ => {
                if is_pub {
                    self.record_error("expected declaration after pub");
                    return None;
                }
                self.parse_expr()
            }
        }
    }

    /// Value expression of `yield`/`return`, absent when the statement ends.
    fn parse_optional_stmt_value(&mut self) -> Option<Box<Ast>> {
        if matches!(
            self.cur.kind,
            TokenKind::Newline | TokenKind::Semi | TokenKind::Eof | TokenKind::RBrace
        ) {
            return None;
        }
        self.parse_expr().map(Box::new)
    }

    /// Consumes attribute keywords after a `::`.
    fn parse_attrs(&mut self) -> Attrs {
        let mut attrs = Attrs::default();
        loop {
            match self.cur.kind {
                TokenKind::Static => {
                    attrs.is_static = true;
                    self.advance();
                }
                TokenKind::Const => {
                    attrs.is_const = true;
                    self.advance();
                }
                TokenKind::Constexpr => {
                    attrs.is_constexpr = true;
                    self.advance();
                }
                _ => return attrs,
            }
        }
    }

    // -------------------------------------------------------- declarations

    /// `<Param[:type[:count]][=default], …>` or `<Param::[count][=default], …>`
    /// (the `::` form omits the type and marks the parameter variadic).
    fn parse_template_decl(&mut self) -> Option<TemplateDecl> {
        if !self.check(TokenKind::Lt) {
            return None;
        }
        let loc = self.loc();
        self.advance();
        let mut params = Vec::new();
        while !self.check(TokenKind::Gt) && !self.check(TokenKind::Eof) {
            if self.check(TokenKind::Ident) {
                let ploc = self.loc();
                let name = self.take_name();
                let mut ty = None;
                let mut is_variadic = false;
                if self.eat(TokenKind::ColonColon) {
                    is_variadic = true;
                    if self.check(TokenKind::Ident) || self.check(TokenKind::IntLit) {
                        self.advance(); // optional variadic count
                    }
                } else if self.eat(TokenKind::Colon) {
                    if self.check(TokenKind::Ident) || self.check(TokenKind::Var) {
                        ty = Some(self.take_name());
                    }
                    if self.eat(TokenKind::Colon) {
                        is_variadic = true;
                        if self.check(TokenKind::Ident) || self.check(TokenKind::IntLit) {
                            self.advance();
                        }
                    }
                }
                let default = if self.eat(TokenKind::Eq) { self.parse_expr() } else { None };
                params.push(TemplateParam {
                    loc: ploc,
                    name,
                    ty,
                    is_variadic,
                    default,
                });
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::Gt);
        Some(TemplateDecl { loc, params })
    }

    fn parse_fn_decl(&mut self, is_pub: bool) -> Option<Ast> {
        let loc = self.loc();
        self.advance(); // fn
        let tmpl = self.parse_template_decl();

        // name: identifier or quoted custom operator
        if !self.check(TokenKind::Ident) && !self.check(TokenKind::CustomOp) {
            self.record_error("expected function name");
            return None;
        }
        let name = self.take_name();

        let mut params = Vec::new();
        self.expect(TokenKind::LParen);
        while !self.check(TokenKind::RParen) && !self.check(TokenKind::Eof) {
            let ploc = self.loc();
            let qualifier = if self.eat(TokenKind::Copy) {
                Some(ParamQual::Copy)
            } else if self.eat(TokenKind::Move) {
                Some(ParamQual::Move)
            } else {
                None
            };
            let pname = if self.check(TokenKind::Ident) {
                Some(self.take_name())
            } else {
                None
            };
            let mut type_ann = None;
            let mut attrs = Attrs::default();
            if self.eat(TokenKind::ColonColon) {
                // param::attrs — type omitted
                attrs = self.parse_attrs();
            } else if self.eat(TokenKind::Colon) {
                // param:type or param:type::attrs
                type_ann = Some(self.parse_type_ann());
                if self.eat(TokenKind::ColonColon) {
                    attrs = self.parse_attrs();
                }
            }
            let default = if self.eat(TokenKind::Eq) { self.parse_expr() } else { None };
            params.push(Param {
                loc: ploc,
                name: pname,
                qualifier,
                type_ann,
                attrs,
                default,
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen);

        // optional return annotation: `:type` or `:(name:type, …)`
        let mut ret = None;
        if self.eat(TokenKind::Colon) {
            if self.check(TokenKind::LParen) {
                self.advance();
                let mut anns = Vec::new();
                while !self.check(TokenKind::RParen) && !self.check(TokenKind::Eof) {
                    anns.push(self.parse_type_ann());
                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(TokenKind::RParen);
                ret = Some(RetAnn::Tuple(anns));
            } else if !self.check(TokenKind::LBrace) && !self.check(TokenKind::Newline) && !self.check(TokenKind::Semi)
            {
                ret = Some(RetAnn::Single(self.parse_type_ann()));
            }
        }
        // function-level attributes, with or without a return annotation
        let mut attrs = Attrs::default();
        if self.eat(TokenKind::ColonColon) {
            attrs = self.parse_attrs();
        }

        self.skip_terminators();
        let body = if self.check(TokenKind::LBrace) {
            self.parse_scope_block()
        } else {
            Vec::new()
        };

        Some(Ast::new(
            AstKind::FnDecl(Rc::new(FnDecl {
                loc,
                name,
                tmpl,
                params,
                ret,
                attrs,
                is_pub,
                body,
            })),
            loc,
        ))
    }

    fn parse_var_decl(&mut self, is_pub: bool) -> Option<Ast> {
        let loc = self.loc();
        self.advance(); // var
        let tmpl = self.parse_template_decl();

        if !self.check(TokenKind::Ident) {
            self.record_error("expected variable name");
            return None;
        }
        let name = self.take_name();

        // name::attrs (type omitted, initializer required)
        // name:type or name:type::attrs
        let mut type_ann = None;
        let mut attrs = Attrs::default();
        if self.eat(TokenKind::ColonColon) {
            attrs = self.parse_attrs();
            if !self.check(TokenKind::Eq) {
                self.record_error("type omitted with '::' but no '=' initializer to infer type from");
            }
        } else if self.eat(TokenKind::Colon) {
            if !matches!(
                self.cur.kind,
                TokenKind::Eq | TokenKind::Newline | TokenKind::Semi | TokenKind::Eof | TokenKind::ColonColon
            ) {
                type_ann = Some(self.parse_type_ann());
            }
            if self.eat(TokenKind::ColonColon) {
                attrs = self.parse_attrs();
            }
        }

        let init = if self.eat(TokenKind::Eq) {
            self.parse_expr().map(Box::new)
        } else {
            None
        };

        Some(Ast::new(
            AstKind::VarDecl {
                name,
                tmpl,
                type_ann,
                attrs,
                is_pub,
                init,
            },
            loc,
        ))
    }

    fn parse_pat_decl(&mut self, is_pub: bool) -> Option<Ast> {
        let loc = self.loc();
        self.advance(); // pat
        let tmpl = self.parse_template_decl();

        if !self.check(TokenKind::Ident) {
            self.record_error("expected pattern name");
            return None;
        }
        let name = self.take_name();

        // pat Name::attrs | pat Name:Base|Base2[::attrs]
        let mut bases = Vec::new();
        let mut attrs = Attrs::default();
        if self.eat(TokenKind::ColonColon) {
            attrs = self.parse_attrs();
        } else if self.eat(TokenKind::Colon) {
            loop {
                if self.check(TokenKind::Ident) {
                    bases.push(self.take_name());
                }
                if !self.eat(TokenKind::Pipe) {
                    break;
                }
            }
            if self.eat(TokenKind::ColonColon) {
                attrs = self.parse_attrs();
            }
        }

        self.skip_terminators();
        let body = if self.check(TokenKind::LBrace) {
            self.parse_scope_block()
        } else {
            Vec::new()
        };

        Some(Ast::new(
            AstKind::PatDecl {
                name,
                tmpl,
                bases,
                attrs,
                is_pub,
                body,
            },
            loc,
        ))
    }

    fn parse_import_decl(&mut self) -> Option<Ast> {
        let loc = self.loc();
        self.advance(); // import

        if !self.check(TokenKind::Ident) {
            self.record_error("expected module name");
            return None;
        }
        let mut path = String::new();
        while self.check(TokenKind::Ident) {
            if !path.is_empty() {
                path.push('.');
            }
            path.push_str(&self.cur.lexeme);
            self.advance();
            if !self.eat(TokenKind::Dot) {
                break;
            }
        }

        let alias = if self.eat(TokenKind::As) {
            if self.check(TokenKind::Ident) {
                Some(self.take_name())
            } else {
                None
            }
        } else {
            None
        };

        let mut items = Vec::new();
        if self.eat(TokenKind::Of) {
            let has_brace = self.eat(TokenKind::LBrace);
            loop {
                let iloc = self.loc();
                if self.check(TokenKind::Ident) {
                    let name = self.take_name();
                    let item_alias = if self.eat(TokenKind::As) {
                        if self.check(TokenKind::Ident) {
                            Some(self.take_name())
                        } else {
                            None
                        }
                    } else {
                        None
                    };
                    items.push(ImportItem {
                        loc: iloc,
                        name,
                        alias: item_alias,
                    });
                }
                if !self.eat(TokenKind::Comma) {
                    break;
                }
                if self.check(TokenKind::RBrace) || self.check(TokenKind::Eof) {
                    break;
                }
            }
            if has_brace {
                self.expect(TokenKind::RBrace);
            }
        }

        Some(Ast::new(
            AstKind::Import {
                path: Rc::from(path),
                alias,
                items,
            },
            loc,
        ))
    }

    // ----------------------------------------------------- type annotation

    fn parse_type_ann(&mut self) -> TypeAnn {
        let loc = self.loc();
        let mut ann = TypeAnn {
            loc,
            ..TypeAnn::default()
        };

        // named slot: name:type
        if self.check(TokenKind::Ident) && self.lexer.peek().kind == TokenKind::Colon {
            ann.name = Some(self.take_name());
            self.advance(); // ':'
        }

        if self.check(TokenKind::Ident) {
            ann.ty = Some(self.take_name());
            if self.check(TokenKind::Lt) {
                ann.args = Some(self.parse_template_args());
            }
        } else if self.check(TokenKind::Null) {
            ann.ty = Some(Rc::from("null"));
            self.advance();
        }

        ann
    }

    /// Template arguments of a type annotation: `<expr, …>`.
    fn parse_template_args(&mut self) -> Vec<Ast> {
        self.advance(); // '<'
        let mut args = Vec::new();
        while !self.check(TokenKind::Gt) && !self.check(TokenKind::Eof) {
            match self.parse_expr() {
                Some(expr) => args.push(expr),
                None => break,
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::Gt);
        args
    }

    // -------------------------------------------------------------- blocks

    fn parse_scope_block(&mut self) -> Vec<Ast> {
        self.expect(TokenKind::LBrace);
        self.skip_terminators();
        let mut stmts = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.check(TokenKind::Eof) && !self.had_error() {
            match self.parse_stmt() {
                Some(stmt) => stmts.push(stmt),
                None if !self.had_error() => break,
                None => {}
            }
            self.skip_terminators();
        }
        self.expect(TokenKind::RBrace);
        stmts
    }

    // -------------------------------------------------------- control flow

    fn parse_for(&mut self) -> Option<Ast> {
        let loc = self.loc();
        self.advance(); // for
        self.expect(TokenKind::LParen);
        let var = if self.check(TokenKind::Ident) {
            self.take_name()
        } else {
            Rc::from("_")
        };
        self.expect(TokenKind::Colon);
        let iterable = self.parse_expr()?;
        self.expect(TokenKind::RParen);
        // optional loop-variable type/attrs, recorded nowhere
        if self.eat(TokenKind::Colon) {
            while self.check(TokenKind::Colon) || self.check(TokenKind::Ident) {
                self.advance();
            }
        }
        self.skip_terminators();
        let body = self.parse_scope_block();
        Some(Ast::new(
            AstKind::For {
                var,
                iterable: Box::new(iterable),
                body,
            },
            loc,
        ))
    }

    fn parse_while(&mut self) -> Option<Ast> {
        let loc = self.loc();

        let mut pre = None;
        if self.check(TokenKind::While) {
            self.advance();
            self.expect(TokenKind::LParen);
            pre = self.parse_expr().map(Box::new);
            self.expect(TokenKind::RParen);
        }

        self.skip_terminators();
        let body = self.parse_scope_block();

        let mut post = None;
        if self.check(TokenKind::While) {
            self.advance();
            self.expect(TokenKind::LParen);
            post = self.parse_expr().map(Box::new);
            self.expect(TokenKind::RParen);
        }

        Some(Ast::new(AstKind::While { pre, body, post }, loc))
    }

    fn parse_switch(&mut self) -> Option<Ast> {
        let loc = self.loc();
        self.advance(); // switch
        self.expect(TokenKind::LParen);
        let selector = self.parse_expr()?;
        self.expect(TokenKind::RParen);
        if self.eat(TokenKind::Colon) {
            while !self.check(TokenKind::LBrace) && !self.check(TokenKind::Eof) {
                self.advance();
            }
        }
        self.expect(TokenKind::LBrace);
        self.skip_terminators();

        let mut cases = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.check(TokenKind::Eof) {
            if self.check(TokenKind::Case) {
                let cloc = self.loc();
                self.advance();
                let test = self.parse_expr();
                self.expect(TokenKind::Colon);
                let body = self.parse_case_body(true);
                cases.push(SwitchCase { loc: cloc, test, body });
            } else if self.check(TokenKind::Default) {
                let cloc = self.loc();
                self.advance();
                self.expect(TokenKind::Colon);
                let body = self.parse_case_body(false);
                cases.push(SwitchCase {
                    loc: cloc,
                    test: None,
                    body,
                });
            } else {
                break;
            }
            self.skip_terminators();
        }
        self.expect(TokenKind::RBrace);

        Some(Ast::new(
            AstKind::Switch {
                selector: Box::new(selector),
                cases,
            },
            loc,
        ))
    }

    /// A case body runs until `break`, the next case label, or `}`. The
    /// trailing `break` is consumed here, which is what rules out
    /// fall-through.
    fn parse_case_body(&mut self, stop_at_labels: bool) -> Vec<Ast> {
        let braced = self.eat(TokenKind::LBrace);
        self.skip_terminators();
        let mut body = Vec::new();
        loop {
            if self.check(TokenKind::Break)
                || self.check(TokenKind::RBrace)
                || self.check(TokenKind::Eof)
                || self.had_error()
                || (stop_at_labels && (self.check(TokenKind::Case) || self.check(TokenKind::Default)))
            {
                break;
            }
            match self.parse_stmt() {
                Some(stmt) => body.push(stmt),
                None if !self.had_error() => break,
                None => {}
            }
            self.skip_terminators();
        }
        if braced && self.check(TokenKind::RBrace) {
            self.advance();
        }
        if self.check(TokenKind::Break) {
            self.advance();
        }
        body
    }

    // --------------------------------------------------------- expressions

    fn parse_expr(&mut self) -> Option<Ast> {
        self.parse_expr_prec(0)
    }

    fn parse_expr_prec(&mut self, min_prec: u8) -> Option<Ast> {
        let mut left = self.parse_unary()?;

        // assignment: lowest precedence, right-associative, only at the top
        if min_prec == 0 && self.check(TokenKind::Eq) {
            let loc = self.loc();
            self.advance();
            let value = self.parse_expr()?;
            left = Ast::new(
                AstKind::Assign {
                    target: Box::new(left),
                    value: Box::new(value),
                },
                loc,
            );
        }

        loop {
            let Some((op, prec)) = binop_prec(self.cur.kind) else { break };
            if prec <= min_prec {
                break;
            }
            let loc = self.loc();
            self.advance();
            let rhs = self.parse_expr_prec(prec)?;
            left = Ast::new(
                AstKind::Binary {
                    op,
                    lhs: Box::new(left),
                    rhs: Box::new(rhs),
                },
                loc,
            );
        }

        // ternary binds after every binary operator: `a < b ? c : d`
        if min_prec == 0 && self.check(TokenKind::Question) {
            let loc = self.loc();
            self.advance();
            let then = self.parse_expr()?;
            let alt = if self.eat(TokenKind::Colon) {
                self.parse_expr().map(Box::new)
            } else {
                None
            };
            return Some(Ast::new(
                AstKind::Ternary {
                    cond: Box::new(left),
                    then: Box::new(then),
                    alt,
                },
                loc,
            ));
        }

        Some(left)
    }

    fn parse_unary(&mut self) -> Option<Ast> {
        let loc = self.loc();
        let op = match self.cur.kind {
            TokenKind::Minus => Some(UnOp::Neg),
            TokenKind::Bang => Some(UnOp::Not),
            TokenKind::Tilde => Some(UnOp::BitNot),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.parse_unary()?;
            return Some(Ast::new(
                AstKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                loc,
            ));
        }
        if self.check(TokenKind::Copy) {
            self.advance();
            let operand = self.parse_unary()?;
            return Some(Ast::new(AstKind::Copy(Box::new(operand)), loc));
        }
        if self.check(TokenKind::Move) {
            self.advance();
            let operand = self.parse_unary()?;
            return Some(Ast::new(AstKind::Move(Box::new(operand)), loc));
        }

        let base = self.parse_primary()?;
        self.parse_postfix(base)
    }

    fn parse_primary(&mut self) -> Option<Ast> {
        let loc = self.loc();
        match self.cur.kind {
            TokenKind::IntLit => {
                let value = self.cur.lexeme.parse::<i64>().unwrap_or(i64::MAX);
                self.advance();
                Some(Ast::new(AstKind::Int(value), loc))
            }
            TokenKind::FloatLit => {
                let value = self.cur.lexeme.parse::<f64>().unwrap_or(0.0);
                self.advance();
                Some(Ast::new(AstKind::Float(value), loc))
            }
            TokenKind::StrLit => {
                let value = Rc::from(self.cur.lexeme.as_str());
                self.advance();
                Some(Ast::new(AstKind::Str(value), loc))
            }
            TokenKind::Null => {
                self.advance();
                Some(Ast::new(AstKind::Null, loc))
            }
            TokenKind::Ident => {
                let name = self.take_name();
                Some(Ast::new(AstKind::Ident(name), loc))
            }
            TokenKind::LParen => self.parse_paren(),
            TokenKind::LBrace => {
                let body = self.parse_scope_block();
                Some(Ast::new(AstKind::Scope(body), loc))
            }
            TokenKind::Lt => {
                // bare template-instantiation prefix: <type, …>
                self.advance();
                let mut args = Vec::new();
                while !self.check(TokenKind::Gt) && !self.check(TokenKind::Eof) {
                    args.push(self.parse_type_ann());
                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(TokenKind::Gt);
                Some(Ast::new(AstKind::TemplateInst { base: None, args }, loc))
            }
            _ => {
                if !matches!(
                    self.cur.kind,
                    TokenKind::Eof
                        | TokenKind::RBrace
                        | TokenKind::RParen
                        | TokenKind::RBracket
                        | TokenKind::Semi
                        | TokenKind::Newline
                ) {
                    self.record_error("unexpected token in expression");
                    self.advance();
                }
                None
            }
        }
    }

    /// After `(`: a parenthesised expression, an unnamed tuple, or a named
    /// tuple. Named when the first element is `ident :`; unnamed when a comma
    /// follows, or when the first element was an assignment (which inside
    /// parentheses acts as a named-element shorthand at evaluation time).
    fn parse_paren(&mut self) -> Option<Ast> {
        let loc = self.loc();
        self.advance(); // '('
        let expr = self.parse_expr()?;

        if self.check(TokenKind::Colon) {
            if let AstKind::Ident(first_name) = &expr.kind {
                let mut pending = Rc::clone(first_name);
                let mut items = Vec::new();
                loop {
                    self.advance(); // ':'
                    let value = self.parse_expr()?;
                    items.push(TupleItem {
                        name: Some(pending),
                        value,
                    });
                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                    if self.check(TokenKind::RParen) {
                        break; // trailing comma
                    }
                    let next = self.parse_expr()?;
                    if self.check(TokenKind::Colon) {
                        if let AstKind::Ident(name) = &next.kind {
                            pending = Rc::clone(name);
                            continue;
                        }
                    }
                    // remaining elements are positional
                    items.push(TupleItem { name: None, value: next });
                    while self.eat(TokenKind::Comma) {
                        if self.check(TokenKind::RParen) {
                            break;
                        }
                        let value = self.parse_expr()?;
                        items.push(TupleItem { name: None, value });
                    }
                    break;
                }
                self.expect(TokenKind::RParen);
                return Some(Ast::new(AstKind::Tuple(items), loc));
            }
        }

        if self.check(TokenKind::Comma) || matches!(expr.kind, AstKind::Assign { .. }) {
            let mut items = vec![TupleItem { name: None, value: expr }];
            while self.eat(TokenKind::Comma) {
                if self.check(TokenKind::RParen) {
                    break; // trailing comma
                }
                let value = self.parse_expr()?;
                items.push(TupleItem { name: None, value });
            }
            self.expect(TokenKind::RParen);
            return Some(Ast::new(AstKind::Tuple(items), loc));
        }

        self.expect(TokenKind::RParen);
        Some(expr)
    }

    fn parse_postfix(&mut self, mut base: Ast) -> Option<Ast> {
        loop {
            match self.cur.kind {
                TokenKind::Dot => {
                    let loc = self.loc();
                    self.advance();
                    // a member name may sit on the next line
                    self.skip_terminators();
                    let field = if self.check(TokenKind::Ident) {
                        self.take_name()
                    } else {
                        Rc::from("")
                    };
                    base = Ast::new(
                        AstKind::Member {
                            object: Box::new(base),
                            field,
                        },
                        loc,
                    );
                }
                TokenKind::LParen => {
                    let loc = self.loc();
                    self.advance();
                    self.skip_terminators();
                    let mut args = Vec::new();
                    while !self.check(TokenKind::RParen) && !self.check(TokenKind::Eof) {
                        args.push(self.parse_expr()?);
                        if !self.eat(TokenKind::Comma) {
                            break;
                        }
                    }
                    self.expect(TokenKind::RParen);
                    base = Ast::new(
                        AstKind::Call {
                            callee: Box::new(base),
                            args,
                        },
                        loc,
                    );
                }
                TokenKind::LBracket => {
                    let loc = self.loc();
                    self.advance();
                    let index = self.parse_expr()?;
                    self.expect(TokenKind::RBracket);
                    base = Ast::new(
                        AstKind::Index {
                            object: Box::new(base),
                            index: Box::new(index),
                        },
                        loc,
                    );
                }
                TokenKind::Lt => {
                    // Speculative template instantiation. Snapshot the lexer
                    // (cursor, depth counters, last_real, peek buffer) and the
                    // current token; roll everything back when the argument
                    // list does not close with '>'.
                    let loc = self.loc();
                    let lex_state = self.lexer.save();
                    let saved_cur = self.cur.clone();
                    let saved_error = self.error.clone();

                    self.advance(); // '<'
                    let mut args = Vec::new();
                    let mut ok = true;
                    while !self.check(TokenKind::Gt) && !self.check(TokenKind::Eof) {
                        let ann = self.parse_type_ann();
                        if self.had_error() {
                            ok = false;
                            break;
                        }
                        args.push(ann);
                        if !self.eat(TokenKind::Comma) {
                            break;
                        }
                    }
                    if ok && self.check(TokenKind::Gt) {
                        self.advance();
                        base = Ast::new(
                            AstKind::TemplateInst {
                                base: Some(Box::new(base)),
                                args,
                            },
                            loc,
                        );
                    } else {
                        self.lexer.restore(lex_state);
                        self.cur = saved_cur;
                        self.error = saved_error;
                        break;
                    }
                }
                _ => break,
            }
        }
        Some(base)
    }
}

fn binop_prec(kind: TokenKind) -> Option<(BinOp, u8)> {
    match kind {
        TokenKind::OrOr => Some((BinOp::Or, 1)),
        TokenKind::AndAnd => Some((BinOp::And, 2)),
        TokenKind::Pipe => Some((BinOp::BitOr, 3)),
        TokenKind::Caret => Some((BinOp::BitXor, 4)),
        TokenKind::Amp => Some((BinOp::BitAnd, 5)),
        TokenKind::EqEq => Some((BinOp::Eq, 6)),
        TokenKind::Ne => Some((BinOp::Ne, 6)),
        TokenKind::Lt => Some((BinOp::Lt, 7)),
        TokenKind::Gt => Some((BinOp::Gt, 7)),
        TokenKind::Le => Some((BinOp::Le, 7)),
        TokenKind::Ge => Some((BinOp::Ge, 7)),
        TokenKind::Shl => Some((BinOp::Shl, 8)),
        TokenKind::Shr => Some((BinOp::Shr, 8)),
        TokenKind::Plus => Some((BinOp::Add, 9)),
        TokenKind::Minus => Some((BinOp::Sub, 9)),
        TokenKind::Star => Some((BinOp::Mul, 10)),
        TokenKind::Slash => Some((BinOp::Div, 10)),
        TokenKind::Percent => Some((BinOp::Rem, 10)),
        _ => None,
    }
}
