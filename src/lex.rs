use std::fmt::Display;

use miette::SourceSpan;

use crate::{error::CalcError, vars::VariableTable};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// The character the token started at: the first digit of a literal, the
    /// variable letter, the operator or the bracket.
    pub symbol: char,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind {
    Number(f32),
    Operator(Op),
    OpeningBracket,
    ClosingBracket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Mult,
    Div,
    Pow,
}

impl Op {
    pub fn from_char(c: char) -> Option<Op> {
        Some(match c {
            '+' => Op::Add,
            '-' => Op::Sub,
            '*' => Op::Mult,
            '/' => Op::Div,
            '^' => Op::Pow,
            _ => return None,
        })
    }

    pub fn precedence(self) -> u8 {
        match self {
            Op::Add | Op::Sub => 1,
            Op::Mult | Op::Div => 2,
            Op::Pow => 3,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Op::Add => '+',
            Op::Sub => '-',
            Op::Mult => '*',
            Op::Div => '/',
            Op::Pow => '^',
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sym = self.symbol;
        match self.kind {
            TokenKind::Number(n) if sym.is_ascii_lowercase() => write!(f, "VARIABLE {sym} {n}"),
            TokenKind::Number(n) => write!(f, "NUMBER {n}"),
            TokenKind::Operator(op) => write!(f, "OPERATOR {sym} {}", op.precedence()),
            TokenKind::OpeningBracket => write!(f, "OPENING_BRACKET {sym} null"),
            TokenKind::ClosingBracket => write!(f, "CLOSING_BRACKET {sym} null"),
        }
    }
}

/// Splits an expression into tokens, resolving variables against `variables`
/// as they are met.
pub struct Lexer<'de> {
    rest: &'de str,
    byte: usize,
    variables: &'de VariableTable,
}

impl<'de> Lexer<'de> {
    pub fn new(input: &'de str, variables: &'de VariableTable) -> Self {
        Lexer {
            rest: input,
            byte: 0,
            variables,
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, CalcError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut chars = self.rest.chars();
        let c = chars.next()?;
        let cur = self.rest;
        let start = self.byte;
        self.rest = chars.as_str();
        self.byte += c.len_utf8();

        let process = |kind: TokenKind| {
            Some(Ok(Token {
                kind,
                symbol: c,
                span: SourceSpan::from(start..start + c.len_utf8()),
            }))
        };

        match c {
            '(' => process(TokenKind::OpeningBracket),
            ')' => process(TokenKind::ClosingBracket),
            'a'..='z' => process(TokenKind::Number(self.variables.get(c).unwrap_or_default())),
            '0'..='9' | '.' => {
                let first_non_digit = cur
                    .find(|c| !matches!(c, '0'..='9' | '.'))
                    .unwrap_or(cur.len());
                let literal = &cur[..first_non_digit];

                // the scan has to skip the whole literal, not just its first digit
                let extra_bytes = literal.len() - c.len_utf8();
                self.byte += extra_bytes;
                self.rest = &self.rest[extra_bytes..];

                let span = SourceSpan::from(start..self.byte);
                let malformed = || CalcError::MalformedNumber {
                    span,
                    literal: literal.to_string(),
                };

                if literal.matches('.').count() > 1 {
                    return Some(Err(malformed()));
                }
                match literal.parse::<f32>() {
                    Ok(n) if n.is_finite() => Some(Ok(Token {
                        kind: TokenKind::Number(n),
                        symbol: c,
                        span,
                    })),
                    _ => Some(Err(malformed())),
                }
            }
            c => match Op::from_char(c) {
                Some(op) => process(TokenKind::Operator(op)),
                None => Some(Err(CalcError::InvalidCharacter {
                    span: SourceSpan::from(start..self.byte),
                    token: c,
                })),
            },
        }
    }
}

pub fn tokenize(expression: &str, variables: &VariableTable) -> Result<Vec<Token>, CalcError> {
    Lexer::new(expression, variables).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(expression: &str, variables: &VariableTable) -> Vec<TokenKind> {
        tokenize(expression, variables)
            .unwrap()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn test_tokenizer() {
        use TokenKind::*;

        assert_eq!(
            kinds("(12.5+3)*4^2/1-0", &VariableTable::default()),
            vec![
                OpeningBracket,
                Number(12.5),
                Operator(Op::Add),
                Number(3.0),
                ClosingBracket,
                Operator(Op::Mult),
                Number(4.0),
                Operator(Op::Pow),
                Number(2.0),
                Operator(Op::Div),
                Number(1.0),
                Operator(Op::Sub),
                Number(0.0),
            ]
        );
    }

    #[test]
    fn multi_digit_literals_are_one_token() {
        let tokens = tokenize("1234+56", &VariableTable::default()).unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].kind, TokenKind::Number(1234.0));
        assert_eq!(tokens[0].span, SourceSpan::from(0..4));
        assert_eq!(tokens[1].span, SourceSpan::from(4..5));
        assert_eq!(tokens[2].kind, TokenKind::Number(56.0));
        assert_eq!(tokens[2].symbol, '5');
    }

    #[test]
    fn decimal_point_forms() {
        let table = VariableTable::default();
        assert_eq!(kinds(".5", &table), vec![TokenKind::Number(0.5)]);
        assert_eq!(kinds("5.", &table), vec![TokenKind::Number(5.0)]);
        assert_eq!(kinds("0.25", &table), vec![TokenKind::Number(0.25)]);
    }

    #[test]
    fn variables_resolve_immediately() {
        let mut table = VariableTable::default();
        table.set('x', 7.0).unwrap();
        let tokens = tokenize("x*y", &table).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Number(7.0));
        assert_eq!(tokens[0].symbol, 'x');
        assert_eq!(tokens[2].kind, TokenKind::Number(0.0));
    }

    #[test]
    fn operators_carry_precedence() {
        let tokens = tokenize("+-*/^", &VariableTable::default()).unwrap();
        let ranks: Vec<u8> = tokens
            .iter()
            .map(|token| match token.kind {
                TokenKind::Operator(op) => op.precedence(),
                _ => panic!("expected an operator, got {token}"),
            })
            .collect();
        assert_eq!(ranks, vec![1, 1, 2, 2, 3]);
    }

    #[test]
    fn test_tokenizer_unexpected_char() {
        let table = VariableTable::default();
        assert_eq!(
            tokenize("1+2 * 3", &table).unwrap_err(),
            CalcError::InvalidCharacter {
                span: SourceSpan::from(3..4),
                token: ' ',
            }
        );
        assert!(matches!(
            tokenize("2*X", &table),
            Err(CalcError::InvalidCharacter { token: 'X', .. })
        ));
        assert!(matches!(
            tokenize("sin(2)!", &table),
            Err(CalcError::InvalidCharacter { token: '!', .. })
        ));
    }

    #[test]
    fn malformed_literals_are_rejected() {
        let table = VariableTable::default();
        assert_eq!(
            tokenize("1+1.2.3", &table).unwrap_err(),
            CalcError::MalformedNumber {
                span: SourceSpan::from(2..7),
                literal: "1.2.3".to_string(),
            }
        );
        assert!(matches!(
            tokenize("(.)", &table),
            Err(CalcError::MalformedNumber { .. })
        ));
        assert!(matches!(
            tokenize(&"9".repeat(50), &table),
            Err(CalcError::MalformedNumber { .. })
        ));
    }

    #[test]
    fn display_names_each_kind() {
        let mut table = VariableTable::default();
        table.set('e', 2.5).unwrap();
        let lines: Vec<String> = tokenize("(1.5+e)", &table)
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            lines,
            vec![
                "OPENING_BRACKET ( null",
                "NUMBER 1.5",
                "OPERATOR + 1",
                "VARIABLE e 2.5",
                "CLOSING_BRACKET ) null",
            ]
        );
    }
}
