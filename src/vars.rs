use std::fmt::Display;

use miette::Diagnostic;
use thiserror::Error;

const LETTERS: usize = 26;

#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum VariableError {
    #[error("'{0}' is not a variable")]
    #[diagnostic(help("variables are the lowercase letters a-z"))]
    NotALetter(char),

    #[error("expected `<letter>=<number>`, got `{0}`")]
    BadAssignment(String),
}

/// The 26 single-letter variables an expression may refer to.
///
/// Letters that were never assigned read as zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariableTable {
    values: [f32; LETTERS],
}

impl Default for VariableTable {
    fn default() -> Self {
        VariableTable {
            values: [0.0; LETTERS],
        }
    }
}

impl VariableTable {
    /// A table with the speed of light, Euler's number, standard gravity and pi
    /// preloaded as `c`, `e`, `g` and `p`.
    #[allow(clippy::approx_constant)]
    pub fn with_constants() -> Self {
        let mut table = Self::default();
        for (letter, value) in [
            (b'c', 299_792_458.0),
            (b'e', 2.71828),
            (b'g', 9.81),
            (b'p', 3.14159),
        ] {
            table.values[(letter - b'a') as usize] = value;
        }
        table
    }

    pub fn get(&self, letter: char) -> Option<f32> {
        index(letter).map(|i| self.values[i])
    }

    /// Stores `value` under `letter` and hands back what was there before.
    pub fn set(&mut self, letter: char, value: f32) -> Result<f32, VariableError> {
        let i = index(letter).ok_or(VariableError::NotALetter(letter))?;
        Ok(std::mem::replace(&mut self.values[i], value))
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, f32)> + '_ {
        ('a'..='z').zip(self.values.iter().copied())
    }
}

fn index(letter: char) -> Option<usize> {
    letter
        .is_ascii_lowercase()
        .then(|| (letter as u8 - b'a') as usize)
}

impl Display for VariableTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (letter, value) in self.iter() {
            writeln!(f, "{letter}: {value}")?;
        }
        Ok(())
    }
}

/// Parses `x=1.5` into its letter and value.
pub fn parse_assignment(input: &str) -> Result<(char, f32), VariableError> {
    let bad = || VariableError::BadAssignment(input.to_string());

    let (name, value) = input.split_once('=').ok_or_else(bad)?;
    let mut name_chars = name.trim().chars();
    let (Some(letter), None) = (name_chars.next(), name_chars.next()) else {
        return Err(bad());
    };
    if index(letter).is_none() {
        return Err(VariableError::NotALetter(letter));
    }
    let value = value.trim().parse().map_err(|_| bad())?;
    Ok((letter, value))
}
