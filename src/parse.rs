use std::fmt::Display;

use crate::{
    error::CalcError,
    lex::{Token, TokenKind},
};

/// Tokens in reverse polish order.
///
/// Outside this crate only [`to_postfix`] builds one, so a `Postfix` never holds
/// a bracket.
#[derive(Debug, Clone, PartialEq)]
pub struct Postfix(pub(crate) Vec<Token>);

impl std::ops::Deref for Postfix {
    type Target = [Token];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl IntoIterator for Postfix {
    type Item = Token;
    type IntoIter = std::vec::IntoIter<Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Display for Postfix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, token) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            match token.kind {
                TokenKind::Number(n) => write!(f, "{n}")?,
                _ => write!(f, "{}", token.symbol)?,
            }
        }
        Ok(())
    }
}

/// Reorders infix tokens into postfix with the shunting-yard algorithm.
///
/// Operators of equal precedence are left-associative, `^` included.
pub fn to_postfix(tokens: impl IntoIterator<Item = Token>) -> Result<Postfix, CalcError> {
    let mut output = Vec::new();
    let mut stack: Vec<Token> = Vec::new();

    for token in tokens {
        match token.kind {
            TokenKind::Number(_) => output.push(token),
            TokenKind::Operator(op) => {
                while let Some(&top) = stack.last() {
                    match top.kind {
                        TokenKind::Operator(top_op) if top_op.precedence() >= op.precedence() => {
                            output.push(top);
                            stack.pop();
                        }
                        _ => break,
                    }
                }
                stack.push(token);
            }
            TokenKind::OpeningBracket => stack.push(token),
            TokenKind::ClosingBracket => loop {
                match stack.pop() {
                    Some(Token {
                        kind: TokenKind::OpeningBracket,
                        ..
                    }) => break,
                    Some(top) => output.push(top),
                    None => return Err(CalcError::MismatchedBrackets { span: token.span }),
                }
            },
        }
    }

    while let Some(top) = stack.pop() {
        if let TokenKind::OpeningBracket | TokenKind::ClosingBracket = top.kind {
            return Err(CalcError::MismatchedBrackets { span: top.span });
        }
        output.push(top);
    }

    Ok(Postfix(output))
}

#[cfg(test)]
mod tests {
    use miette::SourceSpan;

    use super::*;
    use crate::{lex::tokenize, vars::VariableTable};

    fn postfix(expression: &str) -> Result<Postfix, CalcError> {
        to_postfix(tokenize(expression, &VariableTable::default())?)
    }

    #[test]
    fn test_convert_to_postfix() {
        assert_eq!(postfix("2+3*4").unwrap().to_string(), "2 3 4 * +");
        assert_eq!(postfix("(2+3)*4").unwrap().to_string(), "2 3 + 4 *");
        assert_eq!(postfix("1.5").unwrap().to_string(), "1.5");
        assert_eq!(
            postfix("((1+2)*(3-4))/5^2").unwrap().to_string(),
            "1 2 + 3 4 - * 5 2 ^ /"
        );
    }

    #[test]
    fn equal_precedence_is_left_associative() {
        assert_eq!(postfix("8-4-2").unwrap().to_string(), "8 4 - 2 -");
        assert_eq!(postfix("8/4*2").unwrap().to_string(), "8 4 / 2 *");
        assert_eq!(postfix("2^3^2").unwrap().to_string(), "2 3 ^ 2 ^");
    }

    #[test]
    fn higher_precedence_on_stack_is_flushed() {
        assert_eq!(postfix("2^3*4+1").unwrap().to_string(), "2 3 ^ 4 * 1 +");
    }

    #[test]
    fn brackets_are_dropped() {
        let postfix = postfix("((7))").unwrap();
        assert_eq!(postfix.len(), 1);
        assert_eq!(postfix[0].kind, TokenKind::Number(7.0));
    }

    #[test]
    fn unclosed_bracket_is_reported() {
        assert_eq!(
            postfix("(2+3").unwrap_err(),
            CalcError::MismatchedBrackets {
                span: SourceSpan::from(0..1)
            }
        );
        assert!(matches!(
            postfix("((2)"),
            Err(CalcError::MismatchedBrackets { .. })
        ));
    }

    #[test]
    fn unopened_bracket_is_reported() {
        assert_eq!(
            postfix(")2+3(").unwrap_err(),
            CalcError::MismatchedBrackets {
                span: SourceSpan::from(0..1)
            }
        );
        assert_eq!(
            postfix("(2+3))").unwrap_err(),
            CalcError::MismatchedBrackets {
                span: SourceSpan::from(5..6)
            }
        );
    }

    #[test]
    fn operand_counts_are_not_checked_here() {
        assert_eq!(postfix("2+").unwrap().to_string(), "2 +");
        assert!(postfix("").unwrap().is_empty());
    }
}
