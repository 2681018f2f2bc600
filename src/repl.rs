use std::io::{BufRead, Write};

use miette::{Diagnostic, Report};
use tracing::{debug, info};

use crate::{parse_and_evaluate, vars::VariableTable};

const MENU: &str = "\
##### COMMANDS #####
Type 'help' for help.
Type 'list' to view all variables.
Type 'calc <expression>' to evaluate the expression.
Type 'assign <a-z> <expression>' to assign the value of the expression to the variable.
Type 'quit' to leave.";

const HELP: &str = "\
##### HELP #####
* This is an implementation of the shunting-yard algorithm for infix expressions.
* It takes nested brackets and operator precedence into account.
* Mismatched brackets, mismatched operators, malformed numbers, division by zero
  and undefined powers are reported as errors.

##### FORMATTING #####
* Unary operators are not supported, write negative numbers as (0-x)
* Expressions must not contain spaces
* Supported operators: +, -, /, *, ^, (, )
* Supported numbers  : 0-9 with an optional decimal point
* Supported variables: a-z
* Sample expression: 9.1*(2+3)+e
  Output of above: 48.21828";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Help,
    List,
    Calc(&'a str),
    Assign { letter: &'a str, expression: &'a str },
    Quit,
    /// A known command with missing arguments; holds its usage line.
    Usage(&'static str),
    Unknown(&'a str),
}

impl<'a> Command<'a> {
    /// Parses one input line. Returns the command, whether any words were left
    /// over, or `None` for a blank line.
    pub fn parse(line: &'a str) -> Option<(Command<'a>, bool)> {
        let mut words = line.split_whitespace();
        let command = match words.next()? {
            "help" => Command::Help,
            "list" => Command::List,
            "quit" | "exit" => Command::Quit,
            "calc" => match words.next() {
                Some(expression) => Command::Calc(expression),
                None => Command::Usage("calc <expression>"),
            },
            "assign" => match (words.next(), words.next()) {
                (Some(letter), Some(expression)) => Command::Assign { letter, expression },
                _ => Command::Usage("assign <a-z> <expression>"),
            },
            other => Command::Unknown(other),
        };
        Some((command, words.next().is_some()))
    }
}

/// The interactive loop around the evaluator. Owns the variable table that
/// `assign` writes to.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub variables: VariableTable,
}

impl Session {
    pub fn new(variables: VariableTable) -> Self {
        Session { variables }
    }

    /// Reads commands until `quit` or end of input. Results go to `out`,
    /// diagnostics to `err`.
    pub fn run(
        &mut self,
        input: impl BufRead,
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> std::io::Result<()> {
        writeln!(out, "{MENU}")?;
        write!(out, ">> ")?;
        out.flush()?;

        for line in input.lines() {
            let line = line?;
            if let Some((command, extra)) = Command::parse(&line) {
                if command == Command::Quit {
                    break;
                }
                self.execute(command, out, err)?;
                if extra {
                    writeln!(out, "ignored extraneous input")?;
                }
            }
            write!(out, ">> ")?;
            out.flush()?;
        }
        writeln!(out)?;
        Ok(())
    }

    pub fn execute(
        &mut self,
        command: Command<'_>,
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> std::io::Result<()> {
        debug!(?command, "executing");
        match command {
            Command::Help => writeln!(out, "{HELP}"),
            Command::List => write!(out, "##### VARIABLES #####\n{}", self.variables),
            Command::Calc(expression) => match parse_and_evaluate(expression, &self.variables) {
                Ok(result) => writeln!(out, "= {result}"),
                Err(e) => report(err, e, expression),
            },
            Command::Assign { letter, expression } => {
                let mut chars = letter.chars();
                let (Some(name), None) = (chars.next(), chars.next()) else {
                    return writeln!(err, "Variables are single letters a-z, got '{letter}'");
                };
                if self.variables.get(name).is_none() {
                    return report(err, crate::vars::VariableError::NotALetter(name), letter);
                }
                let result = match parse_and_evaluate(expression, &self.variables) {
                    Ok(result) => result,
                    Err(e) => return report(err, e, expression),
                };
                match self.variables.set(name, result) {
                    Ok(previous) => {
                        info!(variable = %name, previous, result, "assigned");
                        writeln!(out, "{name} changed from {previous} to {result}")
                    }
                    Err(e) => report(err, e, letter),
                }
            }
            Command::Usage(usage) => writeln!(err, "Usage: {usage}"),
            Command::Unknown(word) => writeln!(err, "Unknown command '{word}'"),
            Command::Quit => Ok(()),
        }
    }
}

fn report(
    err: &mut impl Write,
    error: impl Diagnostic + Send + Sync + 'static,
    source: &str,
) -> std::io::Result<()> {
    let report = Report::new(error).with_source_code(source.to_string());
    writeln!(err, "{report:?}")
}
