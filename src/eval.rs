use crate::{
    error::{CalcError, PowError},
    lex::{Op, Token, TokenKind},
    parse::Postfix,
};

/// Reduces a postfix sequence to a single value.
pub fn evaluate(postfix: &Postfix) -> Result<f32, CalcError> {
    let mut stack: Vec<f32> = Vec::with_capacity(postfix.len());

    for token in postfix.iter() {
        match token.kind {
            TokenKind::Number(n) => stack.push(n),
            TokenKind::Operator(op) => {
                let missing = || CalcError::MismatchedOperands {
                    span: Some(token.span),
                };
                // the right operand was pushed last
                let rhs = stack.pop().ok_or_else(missing)?;
                let lhs = stack.pop().ok_or_else(missing)?;
                stack.push(apply(op, lhs, rhs, token)?);
            }
            TokenKind::OpeningBracket | TokenKind::ClosingBracket => {
                unreachable!("bracket `{}` survived postfix conversion", token.symbol)
            }
        }
    }

    match stack.as_slice() {
        [value] => Ok(*value),
        _ => Err(CalcError::MismatchedOperands { span: None }),
    }
}

fn apply(op: Op, lhs: f32, rhs: f32, token: &Token) -> Result<f32, CalcError> {
    Ok(match op {
        Op::Add => lhs + rhs,
        Op::Sub => lhs - rhs,
        Op::Mult => lhs * rhs,
        Op::Div => {
            if rhs == 0.0 {
                return Err(CalcError::DivisionByZero { span: token.span });
            }
            lhs / rhs
        }
        Op::Pow => {
            let reason = if lhs == 0.0 && rhs == 0.0 {
                Some(PowError::ZeroToZero)
            } else if lhs < 0.0 && rhs.fract() != 0.0 {
                Some(PowError::NegativeBaseFractionalExponent)
            } else if lhs == 0.0 && rhs < 0.0 {
                Some(PowError::ZeroToNegative)
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(CalcError::UndefinedExponentiation {
                    span: token.span,
                    reason,
                });
            }
            lhs.powf(rhs)
        }
    })
}
