//! Expressions inside output tags.
//!
//! ```text
//! expr     := primary ( "??" primary )*
//! primary  := string | number | name | name "(" [ expr ( "," expr )* ] ")"
//! name     := ["it."] ident
//! ```

use std::iter::Peekable;
use std::vec::IntoIter;

use super::engine::TemplateRenderError;
use super::scope::{RenderScope, ScopeValue};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Str(String),
    Num(String),
    LParen,
    RParen,
    Comma,
    Coalesce,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Literal(String),
    Var(String),
    Call { name: String, args: Vec<Expr> },
    /// `left ?? right`: `right` is used when `left` is undefined.
    Fallback(Box<Expr>, Box<Expr>),
}

pub fn parse(source: &str, line: usize) -> Result<Expr, TemplateRenderError> {
    let syntax = |reason: &str| TemplateRenderError::Syntax {
        expr: source.trim().to_string(),
        reason: reason.to_string(),
        line,
    };

    let tokens = tokenize(source).map_err(|reason| syntax(&reason))?;
    if tokens.is_empty() {
        return Err(syntax("empty expression"));
    }

    let mut tokens = tokens.into_iter().peekable();
    let expr = parse_expr(&mut tokens).map_err(|reason| syntax(&reason))?;
    if let Some(tok) = tokens.next() {
        return Err(syntax(&format!("unexpected {}", describe(&tok))));
    }
    Ok(expr)
}

fn tokenize(source: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            '?' => {
                chars.next();
                if chars.next() != Some('?') {
                    return Err("expected '??'".into());
                }
                tokens.push(Token::Coalesce);
            }
            '"' | '\'' | '`' => {
                chars.next();
                tokens.push(Token::Str(read_string(&mut chars, c)?));
            }
            c if c.is_ascii_digit() => {
                let mut num = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        num.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Num(num));
            }
            c if is_ident_start(c) => {
                let mut ident = String::new();
                while let Some(&d) = chars.peek() {
                    if is_ident_char(d) || d == '.' {
                        ident.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(resolve_name(&ident)?));
            }
            other => return Err(format!("unexpected character '{other}'")),
        }
    }

    Ok(tokens)
}

fn read_string(
    chars: &mut Peekable<std::str::Chars<'_>>,
    quote: char,
) -> Result<String, String> {
    let mut s = String::new();
    loop {
        match chars.next() {
            None => return Err("unterminated string literal".into()),
            Some(c) if c == quote => return Ok(s),
            Some('\\') => match chars.next() {
                Some('n') => s.push('\n'),
                Some('t') => s.push('\t'),
                Some(c @ ('\\' | '"' | '\'' | '`')) => s.push(c),
                Some(other) => return Err(format!("unknown escape '\\{other}'")),
                None => return Err("unterminated string literal".into()),
            },
            Some(c) => s.push(c),
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

// `it.name` is the same variable as `name`; other member access is rejected.
fn resolve_name(raw: &str) -> Result<String, String> {
    let name = raw.strip_prefix("it.").unwrap_or(raw);
    if name.is_empty() || name.contains('.') || !name.starts_with(is_ident_start) {
        return Err(format!("unsupported name '{raw}'"));
    }
    Ok(name.to_string())
}

fn describe(tok: &Token) -> String {
    match tok {
        Token::Ident(s) => format!("name '{s}'"),
        Token::Str(_) => "string".into(),
        Token::Num(n) => format!("number {n}"),
        Token::LParen => "'('".into(),
        Token::RParen => "')'".into(),
        Token::Comma => "','".into(),
        Token::Coalesce => "'??'".into(),
    }
}

type Tokens = Peekable<IntoIter<Token>>;

fn parse_expr(tokens: &mut Tokens) -> Result<Expr, String> {
    let mut expr = parse_primary(tokens)?;
    while tokens.next_if_eq(&Token::Coalesce).is_some() {
        let right = parse_primary(tokens)?;
        expr = Expr::Fallback(Box::new(expr), Box::new(right));
    }
    Ok(expr)
}

fn parse_primary(tokens: &mut Tokens) -> Result<Expr, String> {
    match tokens.next() {
        Some(Token::Str(s)) | Some(Token::Num(s)) => Ok(Expr::Literal(s)),
        Some(Token::Ident(name)) => {
            if tokens.next_if_eq(&Token::LParen).is_none() {
                return Ok(Expr::Var(name));
            }
            let mut args = Vec::new();
            if tokens.next_if_eq(&Token::RParen).is_some() {
                return Ok(Expr::Call { name, args });
            }
            loop {
                args.push(parse_expr(tokens)?);
                match tokens.next() {
                    Some(Token::Comma) => continue,
                    Some(Token::RParen) => break,
                    Some(tok) => {
                        return Err(format!("expected ',' or ')', found {}", describe(&tok)));
                    }
                    None => return Err("missing ')'".into()),
                }
            }
            Ok(Expr::Call { name, args })
        }
        Some(tok) => Err(format!("unexpected {}", describe(&tok))),
        None => Err("unexpected end of expression".into()),
    }
}

pub fn evaluate(
    expr: &Expr,
    scope: &RenderScope,
    line: usize,
) -> Result<String, TemplateRenderError> {
    match expr {
        Expr::Literal(s) => Ok(s.clone()),
        Expr::Var(name) => match scope.get(name) {
            Some(ScopeValue::Text(v)) => Ok(v.clone()),
            Some(ScopeValue::DateFormat(_)) => {
                Err(TemplateRenderError::FunctionAsValue { name: name.clone(), line })
            }
            None => Err(TemplateRenderError::UndefinedVariable { name: name.clone(), line }),
        },
        Expr::Call { name, args } => match scope.get(name) {
            Some(ScopeValue::DateFormat(formatter)) => {
                if args.is_empty() || args.len() > 2 {
                    return Err(TemplateRenderError::Arity {
                        name: name.clone(),
                        expected: "1 or 2",
                        got: args.len(),
                        line,
                    });
                }
                let values = args
                    .iter()
                    .map(|a| evaluate(a, scope, line))
                    .collect::<Result<Vec<_>, _>>()?;
                formatter
                    .format(&values[0], values.get(1).map(String::as_str))
                    .map_err(|source| TemplateRenderError::Date { source, line })
            }
            Some(ScopeValue::Text(_)) => {
                Err(TemplateRenderError::NotAFunction { name: name.clone(), line })
            }
            None => Err(TemplateRenderError::UndefinedVariable { name: name.clone(), line }),
        },
        Expr::Fallback(left, right) => match evaluate(left, scope, line) {
            Err(TemplateRenderError::UndefinedVariable { .. }) => {
                evaluate(right, scope, line)
            }
            other => other,
        },
    }
}
