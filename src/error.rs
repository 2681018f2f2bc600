use std::fmt::Display;

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum CalcError {
    #[error("Unexpected character '{token}' in expression")]
    #[diagnostic(help(
        "only digits, `.`, `+ - * / ^`, brackets and the variables a-z are allowed"
    ))]
    InvalidCharacter {
        #[label("this character")]
        span: SourceSpan,
        token: char,
    },

    #[error("Malformed number literal `{literal}`")]
    #[diagnostic(help("a number is written as digits with at most one decimal point"))]
    MalformedNumber {
        #[label("this numeric literal")]
        span: SourceSpan,
        literal: String,
    },

    #[error("Mismatched brackets")]
    MismatchedBrackets {
        #[label("this bracket has no partner")]
        span: SourceSpan,
    },

    #[error("Mismatched operators and numbers")]
    #[diagnostic(help(
        "every operator needs a number on both sides; write negative numbers as (0-x)"
    ))]
    MismatchedOperands {
        #[label("here")]
        span: Option<SourceSpan>,
    },

    #[error("Division by zero")]
    DivisionByZero {
        #[label("the right-hand side of this division is zero")]
        span: SourceSpan,
    },

    #[error("Undefined exponentiation: {reason}")]
    UndefinedExponentiation {
        #[label("this power")]
        span: SourceSpan,
        reason: PowError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowError {
    ZeroToZero,
    NegativeBaseFractionalExponent,
    ZeroToNegative,
}

impl Display for PowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PowError::ZeroToZero => write!(f, "0^0 is undefined"),
            PowError::NegativeBaseFractionalExponent => {
                write!(f, "can't raise a negative number to a non-integer power")
            }
            PowError::ZeroToNegative => write!(f, "can't raise 0 to a negative power"),
        }
    }
}
