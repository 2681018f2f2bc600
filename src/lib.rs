use tracing::{debug, trace};

pub mod error;
pub mod eval;
pub mod lex;
pub mod parse;
pub mod repl;
pub mod vars;

pub use error::{CalcError, PowError};
pub use eval::evaluate;
pub use lex::{Lexer, Token, TokenKind, tokenize};
pub use parse::{Postfix, to_postfix};
pub use vars::VariableTable;

/// Tokenizes, reorders and evaluates `expression` in one go.
pub fn parse_and_evaluate(expression: &str, variables: &VariableTable) -> Result<f32, CalcError> {
    let tokens = tokenize(expression, variables)?;
    trace!(count = tokens.len(), "tokenized");

    let postfix = to_postfix(tokens)?;
    trace!(%postfix, "converted to postfix");

    let result = evaluate(&postfix)?;
    debug!(expression, result, "evaluated");
    Ok(result)
}
