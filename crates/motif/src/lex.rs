//! Token stream for Motif source text.
//!
//! The lexer is a byte cursor with a one-token peek buffer. Statement
//! termination is context-sensitive: a newline becomes a [`TokenKind::Newline`]
//! token only outside all brackets and only after a token that can end a
//! statement, which is what makes semicolons optional in the language.

use strum::IntoStaticStr;

use crate::ast::CodeLoc;

/// Every kind of token the lexer can produce.
///
/// The display string is what parse errors show for the token: fixed tokens
/// render as themselves, token classes render as `<int>`, `<ident>`, etc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr)]
pub enum TokenKind {
    // Keywords
    #[strum(serialize = "fn")]
    Fn,
    #[strum(serialize = "var")]
    Var,
    #[strum(serialize = "pat")]
    Pat,
    #[strum(serialize = "import")]
    Import,
    #[strum(serialize = "pub")]
    Pub,
    #[strum(serialize = "for")]
    For,
    #[strum(serialize = "while")]
    While,
    #[strum(serialize = "switch")]
    Switch,
    #[strum(serialize = "case")]
    Case,
    #[strum(serialize = "default")]
    Default,
    #[strum(serialize = "break")]
    Break,
    #[strum(serialize = "yield")]
    Yield,
    #[strum(serialize = "return")]
    Return,
    #[strum(serialize = "copy")]
    Copy,
    #[strum(serialize = "move")]
    Move,
    #[strum(serialize = "null")]
    Null,
    #[strum(serialize = "as")]
    As,
    #[strum(serialize = "of")]
    Of,
    #[strum(serialize = "static")]
    Static,
    #[strum(serialize = "const")]
    Const,
    #[strum(serialize = "constexpr")]
    Constexpr,

    // Literals
    #[strum(serialize = "<int>")]
    IntLit,
    #[strum(serialize = "<float>")]
    FloatLit,
    #[strum(serialize = "<string>")]
    StrLit,

    #[strum(serialize = "<ident>")]
    Ident,

    // Statement terminators
    #[strum(serialize = "<newline>")]
    Newline,
    #[strum(serialize = ";")]
    Semi,

    // Brackets
    #[strum(serialize = "{")]
    LBrace,
    #[strum(serialize = "}")]
    RBrace,
    #[strum(serialize = "(")]
    LParen,
    #[strum(serialize = ")")]
    RParen,
    #[strum(serialize = "[")]
    LBracket,
    #[strum(serialize = "]")]
    RBracket,
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = ">")]
    Gt,

    // Punctuation
    #[strum(serialize = ",")]
    Comma,
    #[strum(serialize = ".")]
    Dot,
    #[strum(serialize = ":")]
    Colon,
    #[strum(serialize = "::")]
    ColonColon,
    #[strum(serialize = "->")]
    Arrow,

    // Assignment
    #[strum(serialize = "=")]
    Eq,

    // Operators
    #[strum(serialize = "+")]
    Plus,
    #[strum(serialize = "-")]
    Minus,
    #[strum(serialize = "*")]
    Star,
    #[strum(serialize = "/")]
    Slash,
    #[strum(serialize = "%")]
    Percent,
    #[strum(serialize = "<=")]
    Le,
    #[strum(serialize = ">=")]
    Ge,
    #[strum(serialize = "==")]
    EqEq,
    #[strum(serialize = "!=")]
    Ne,
    #[strum(serialize = "&")]
    Amp,
    #[strum(serialize = "|")]
    Pipe,
    #[strum(serialize = "^")]
    Caret,
    #[strum(serialize = "~")]
    Tilde,
    #[strum(serialize = "!")]
    Bang,
    #[strum(serialize = "?")]
    Question,
    #[strum(serialize = "<<")]
    Shl,
    #[strum(serialize = ">>")]
    Shr,
    #[strum(serialize = "&&")]
    AndAnd,
    #[strum(serialize = "||")]
    OrOr,

    /// Quoted operator name directly after `fn`, e.g. `fn "+>" (a, b) { … }`.
    #[strum(serialize = "<custom_op>")]
    CustomOp,

    #[strum(serialize = "<eof>")]
    Eof,
    #[strum(serialize = "<error>")]
    Error,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).into())
    }
}

impl TokenKind {
    /// Tokens that may end a statement; a newline after one of these (outside
    /// brackets) terminates the statement.
    #[must_use]
    pub fn can_end_statement(self) -> bool {
        matches!(
            self,
            Self::IntLit
                | Self::FloatLit
                | Self::StrLit
                | Self::Ident
                | Self::Null
                | Self::RBrace
                | Self::RParen
                | Self::RBracket
                | Self::Gt
                | Self::Break
                | Self::Yield
                | Self::Return
        )
    }
}

fn keyword(lexeme: &str) -> Option<TokenKind> {
    Some(match lexeme {
        "fn" => TokenKind::Fn,
        "var" => TokenKind::Var,
        "pat" => TokenKind::Pat,
        "import" => TokenKind::Import,
        "pub" => TokenKind::Pub,
        "for" => TokenKind::For,
        "while" => TokenKind::While,
        "switch" => TokenKind::Switch,
        "case" => TokenKind::Case,
        "default" => TokenKind::Default,
        "break" => TokenKind::Break,
        "yield" => TokenKind::Yield,
        "return" => TokenKind::Return,
        "copy" => TokenKind::Copy,
        "move" => TokenKind::Move,
        "null" => TokenKind::Null,
        "as" => TokenKind::As,
        "of" => TokenKind::Of,
        "static" => TokenKind::Static,
        "const" => TokenKind::Const,
        "constexpr" => TokenKind::Constexpr,
        _ => return None,
    })
}

/// One lexed token: kind, owned lexeme, and source position.
///
/// String literals carry their unescaped contents as the lexeme; every other
/// kind carries the raw source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: u32,
    pub col: u32,
}

impl Token {
    fn new(kind: TokenKind, lexeme: String, line: u32, col: u32) -> Self {
        Self { kind, lexeme, line, col }
    }

    #[must_use]
    pub fn loc(&self) -> CodeLoc {
        CodeLoc {
            line: self.line,
            col: self.col,
        }
    }
}

/// Saved lexer cursor, used by the parser to roll back a speculative parse.
#[derive(Debug, Clone)]
pub(crate) struct LexState {
    pos: usize,
    line: u32,
    col: u32,
    paren_depth: u32,
    bracket_depth: u32,
    brace_depth: u32,
    last_real: TokenKind,
    peeked: Option<Token>,
}

/// The lexer: a cursor over source bytes with a single-token peek buffer.
#[derive(Debug)]
pub struct Lexer<'src> {
    src: &'src str,
    bytes: &'src [u8],
    pos: usize,
    line: u32,
    col: u32,
    // depth counters for the newline-as-terminator rule
    paren_depth: u32,
    bracket_depth: u32,
    brace_depth: u32,
    /// Kind of the last emitted non-terminator token.
    last_real: TokenKind,
    peeked: Option<Token>,
}

impl<'src> Lexer<'src> {
    #[must_use]
    pub fn new(src: &'src str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            line: 1,
            col: 1,
            paren_depth: 0,
            bracket_depth: 0,
            brace_depth: 0,
            last_real: TokenKind::Eof,
            peeked: None,
        }
    }

    /// Returns the next token, consuming it and updating depth counters and
    /// `last_real`.
    pub fn next(&mut self) -> Token {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.lex_raw(),
        };
        self.update_state(&token);
        token
    }

    /// Returns the next token without consuming it.
    ///
    /// Peeking never perturbs the depth counters or `last_real`; only
    /// [`Lexer::next`] does.
    pub fn peek(&mut self) -> &Token {
        if self.peeked.is_none() {
            let token = self.lex_raw();
            self.peeked = Some(token);
        }
        self.peeked.as_ref().expect("peek buffer filled above")
    }

    /// Captures the full cursor state, including the peek buffer.
    pub(crate) fn save(&self) -> LexState {
        LexState {
            pos: self.pos,
            line: self.line,
            col: self.col,
            paren_depth: self.paren_depth,
            bracket_depth: self.bracket_depth,
            brace_depth: self.brace_depth,
            last_real: self.last_real,
            peeked: self.peeked.clone(),
        }
    }

    /// Restores a state captured with [`Lexer::save`].
    pub(crate) fn restore(&mut self, state: LexState) {
        self.pos = state.pos;
        self.line = state.line;
        self.col = state.col;
        self.paren_depth = state.paren_depth;
        self.bracket_depth = state.bracket_depth;
        self.brace_depth = state.brace_depth;
        self.last_real = state.last_real;
        self.peeked = state.peeked;
    }

    fn update_state(&mut self, token: &Token) {
        match token.kind {
            TokenKind::LParen => self.paren_depth += 1,
            TokenKind::RParen => self.paren_depth = self.paren_depth.saturating_sub(1),
            TokenKind::LBracket => self.bracket_depth += 1,
            TokenKind::RBracket => self.bracket_depth = self.bracket_depth.saturating_sub(1),
            TokenKind::LBrace => self.brace_depth += 1,
            TokenKind::RBrace => self.brace_depth = self.brace_depth.saturating_sub(1),
            _ => {}
        }
        if token.kind != TokenKind::Newline && token.kind != TokenKind::Semi {
            self.last_real = token.kind;
        }
    }

    fn cur(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_ch(&self) -> Option<u8> {
        self.bytes.get(self.pos + 1).copied()
    }

    fn advance(&mut self) -> u8 {
        let c = self.bytes[self.pos];
        self.pos += 1;
        if c == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        c
    }

    fn lex_raw(&mut self) -> Token {
        loop {
            while matches!(self.cur(), Some(b' ' | b'\t' | b'\r')) {
                self.advance();
            }
            let (line, col) = (self.line, self.col);

            let Some(c) = self.cur() else {
                return Token::new(TokenKind::Eof, String::new(), line, col);
            };

            if c == b'/' && self.peek_ch() == Some(b'/') {
                while self.cur().is_some_and(|c| c != b'\n') {
                    self.advance();
                }
                continue;
            }
            if c == b'/' && self.peek_ch() == Some(b'*') {
                self.advance();
                self.advance();
                while let Some(c) = self.cur() {
                    if c == b'*' && self.peek_ch() == Some(b'/') {
                        self.advance();
                        self.advance();
                        break;
                    }
                    self.advance();
                }
                continue;
            }

            if c == b'\n' {
                let depth = self.paren_depth + self.bracket_depth + self.brace_depth;
                self.advance();
                if depth == 0 && self.last_real.can_end_statement() {
                    return Token::new(TokenKind::Newline, "\n".to_owned(), line, col);
                }
                continue;
            }

            if c.is_ascii_digit() {
                return self.lex_number();
            }
            if c.is_ascii_alphabetic() || c == b'_' {
                return self.lex_ident_or_keyword();
            }
            if c == b'\'' {
                return self.lex_string(b'\'');
            }
            if c == b'"' {
                // A double quote right after `fn` opens a custom operator name.
                if self.last_real == TokenKind::Fn {
                    return self.lex_custom_op();
                }
                return self.lex_string(b'"');
            }

            return self.lex_operator(c, line, col);
        }
    }

    fn lex_number(&mut self) -> Token {
        let (line, col) = (self.line, self.col);
        let start = self.pos;
        let mut is_float = false;

        while self.cur().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        if self.cur() == Some(b'.') && self.peek_ch().is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.advance();
            while self.cur().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        // Exponent marker counts only when digits follow (past an optional sign).
        if matches!(self.cur(), Some(b'e' | b'E')) {
            let mut look = self.pos + 1;
            if matches!(self.bytes.get(look).copied(), Some(b'+' | b'-')) {
                look += 1;
            }
            if self.bytes.get(look).is_some_and(u8::is_ascii_digit) {
                is_float = true;
                self.advance();
                if matches!(self.cur(), Some(b'+' | b'-')) {
                    self.advance();
                }
                while self.cur().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }

        let kind = if is_float { TokenKind::FloatLit } else { TokenKind::IntLit };
        Token::new(kind, self.src[start..self.pos].to_owned(), line, col)
    }

    fn lex_ident_or_keyword(&mut self) -> Token {
        let (line, col) = (self.line, self.col);
        let start = self.pos;
        while self.cur().is_some_and(|c| c.is_ascii_alphanumeric() || c == b'_') {
            self.advance();
        }
        let lexeme = &self.src[start..self.pos];
        match keyword(lexeme) {
            Some(kind) => Token::new(kind, lexeme.to_owned(), line, col),
            None => Token::new(TokenKind::Ident, lexeme.to_owned(), line, col),
        }
    }

    fn lex_string(&mut self, quote: u8) -> Token {
        let (line, col) = (self.line, self.col);
        self.advance();
        let mut buf = Vec::new();
        while self.cur().is_some_and(|c| c != quote) {
            let c = self.advance();
            if c == b'\\' && self.cur().is_some() {
                let escaped = self.advance();
                buf.push(match escaped {
                    b'n' => b'\n',
                    b't' => b'\t',
                    b'r' => b'\r',
                    other => other,
                });
            } else {
                buf.push(c);
            }
        }
        if self.cur() == Some(quote) {
            self.advance();
        }
        Token::new(
            TokenKind::StrLit,
            String::from_utf8_lossy(&buf).into_owned(),
            line,
            col,
        )
    }

    fn lex_custom_op(&mut self) -> Token {
        let (line, col) = (self.line, self.col);
        self.advance();
        let start = self.pos;
        while self.cur().is_some_and(|c| c != b'"') {
            self.advance();
        }
        let lexeme = self.src[start..self.pos].to_owned();
        if self.cur() == Some(b'"') {
            self.advance();
        }
        Token::new(TokenKind::CustomOp, lexeme, line, col)
    }

    fn lex_operator(&mut self, c: u8, line: u32, col: u32) -> Token {
        let two = |kind, text: &str| Token::new(kind, text.to_owned(), line, col);
        if let Some(n) = self.peek_ch() {
            let kind = match (c, n) {
                (b'<', b'<') => Some((TokenKind::Shl, "<<")),
                (b'>', b'>') => Some((TokenKind::Shr, ">>")),
                (b'<', b'=') => Some((TokenKind::Le, "<=")),
                (b'>', b'=') => Some((TokenKind::Ge, ">=")),
                (b'=', b'=') => Some((TokenKind::EqEq, "==")),
                (b'!', b'=') => Some((TokenKind::Ne, "!=")),
                (b'&', b'&') => Some((TokenKind::AndAnd, "&&")),
                (b'|', b'|') => Some((TokenKind::OrOr, "||")),
                (b':', b':') => Some((TokenKind::ColonColon, "::")),
                (b'-', b'>') => Some((TokenKind::Arrow, "->")),
                _ => None,
            };
            if let Some((kind, text)) = kind {
                self.advance();
                self.advance();
                return two(kind, text);
            }
        }

        self.advance();
        let kind = match c {
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b'<' => TokenKind::Lt,
            b'>' => TokenKind::Gt,
            b',' => TokenKind::Comma,
            b'.' => TokenKind::Dot,
            b':' => TokenKind::Colon,
            b';' => TokenKind::Semi,
            b'=' => TokenKind::Eq,
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Star,
            b'/' => TokenKind::Slash,
            b'%' => TokenKind::Percent,
            b'&' => TokenKind::Amp,
            b'|' => TokenKind::Pipe,
            b'^' => TokenKind::Caret,
            b'~' => TokenKind::Tilde,
            b'!' => TokenKind::Bang,
            b'?' => TokenKind::Question,
            _ => TokenKind::Error,
        };
        Token::new(kind, (c as char).to_string(), line, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn newline_terminates_only_after_expression_enders() {
        // after `=` the newline is absorbed, after the literal it terminates
        let got = kinds("var x =\n1\n");
        assert_eq!(
            got,
            vec![
                TokenKind::Var,
                TokenKind::Ident,
                TokenKind::Eq,
                TokenKind::IntLit,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn newlines_inside_brackets_are_absorbed() {
        let got = kinds("(1,\n2)");
        assert!(!got.contains(&TokenKind::Newline));
    }

    #[test]
    fn custom_operator_only_after_fn() {
        let mut lexer = Lexer::new("fn \"+>\"");
        assert_eq!(lexer.next().kind, TokenKind::Fn);
        let op = lexer.next();
        assert_eq!(op.kind, TokenKind::CustomOp);
        assert_eq!(op.lexeme, "+>");

        let mut lexer = Lexer::new("\"+>\"");
        assert_eq!(lexer.next().kind, TokenKind::StrLit);
    }

    #[test]
    fn peek_does_not_consume() {
        let mut lexer = Lexer::new("a + b");
        assert_eq!(lexer.peek().kind, TokenKind::Ident);
        assert_eq!(lexer.peek().lexeme, "a");
        let token = lexer.next();
        assert_eq!((token.kind, token.lexeme.as_str()), (TokenKind::Ident, "a"));
    }

    #[test]
    fn exponent_requires_digits() {
        let got = kinds("12e3 12e x1e");
        assert_eq!(
            got,
            vec![
                TokenKind::FloatLit,
                TokenKind::IntLit,
                TokenKind::Ident,
                TokenKind::Ident,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn string_escapes() {
        let mut lexer = Lexer::new(r#""a\tb\n\\q\z""#);
        let token = lexer.next();
        assert_eq!(token.kind, TokenKind::StrLit);
        assert_eq!(token.lexeme, "a\tb\n\\qz");
    }
}
