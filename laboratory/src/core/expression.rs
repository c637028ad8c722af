//! Recursive-descent evaluator for arithmetic expressions over `f64`.
//!
//! Grammar:
//!
//! ```text
//! expression = term { ("+" | "-") term }
//! term       = factor { ("*" | "/") factor }
//! factor     = ("+" | "-") factor
//!            | ( "(" expression ")" | number | variable
//!              | function "(" expression ")" | function factor ) [ "^" factor ]
//! ```
//!
//! Trigonometric functions take degrees.

use std::collections::HashMap;
use std::f64::consts::{E, PI};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("unexpected: {0}")]
    Unexpected(char),
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("missing ')'")]
    MissingParen,
    #[error("missing ')' after argument to {0}")]
    MissingParenAfter(String),
    #[error("unknown function or variable: {0}")]
    UnknownIdentifier(String),
    #[error("invalid number: {0}")]
    InvalidNumber(String),
}

/// An expression plus the variables visible to it.
///
/// Every evaluator starts with the constants `PI`/`Pi`, `E`/`e` and
/// `phi`/`Phi`/`PHI`; registering a variable with the same name overrides them.
#[derive(Debug, Clone)]
pub struct Evaluator {
    expression: String,
    variables: HashMap<String, f64>,
}

impl Evaluator {
    pub fn new(expression: impl Into<String>) -> Self {
        let phi = 0.5 * (1.0 + 5f64.sqrt());
        let variables = [
            ("PI", PI),
            ("Pi", PI),
            ("E", E),
            ("e", E),
            ("phi", phi),
            ("Phi", phi),
            ("PHI", phi),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();
        Self {
            expression: expression.into(),
            variables,
        }
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn register_variable(&mut self, name: impl Into<String>, value: f64) {
        self.variables.insert(name.into(), value);
    }

    pub fn register_variables<I, K>(&mut self, variables: I)
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        self.variables
            .extend(variables.into_iter().map(|(name, value)| (name.into(), value)));
    }

    pub fn variable(&self, name: &str) -> Option<f64> {
        self.variables.get(name).copied()
    }

    pub fn eval(&self) -> Result<f64, EvalError> {
        Parser::new(&self.expression, &self.variables).parse()
    }
}

/// Evaluate `expression` with only the built-in constants.
pub fn eval(expression: &str) -> Result<f64, EvalError> {
    Evaluator::new(expression).eval()
}

struct Parser<'a> {
    chars: Vec<char>,
    pos: usize,
    variables: &'a HashMap<String, f64>,
}

impl<'a> Parser<'a> {
    fn new(expression: &str, variables: &'a HashMap<String, f64>) -> Self {
        Self {
            chars: expression.chars().collect(),
            pos: 0,
            variables,
        }
    }

    fn parse(mut self) -> Result<f64, EvalError> {
        let x = self.expression()?;
        match self.peek() {
            Some(c) => Err(EvalError::Unexpected(c)),
            None => Ok(x),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn eat(&mut self, expected: char) -> bool {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        if self.peek() == Some(expected) {
            self.pos += 1;
            return true;
        }
        false
    }

    fn expression(&mut self) -> Result<f64, EvalError> {
        let mut x = self.term()?;
        loop {
            if self.eat('+') {
                x += self.term()?;
            } else if self.eat('-') {
                x -= self.term()?;
            } else {
                return Ok(x);
            }
        }
    }

    fn term(&mut self) -> Result<f64, EvalError> {
        let mut x = self.factor()?;
        loop {
            if self.eat('*') {
                x *= self.factor()?;
            } else if self.eat('/') {
                x /= self.factor()?;
            } else {
                return Ok(x);
            }
        }
    }

    fn factor(&mut self) -> Result<f64, EvalError> {
        if self.eat('+') {
            return self.factor();
        }
        if self.eat('-') {
            return Ok(-self.factor()?);
        }

        let mut x = if self.eat('(') {
            let x = self.expression()?;
            if !self.eat(')') {
                return Err(EvalError::MissingParen);
            }
            x
        } else {
            match self.peek() {
                Some(c) if c.is_ascii_digit() || c == '.' => self.number()?,
                Some(c) if c.is_alphabetic() => self.identifier()?,
                Some(c) => return Err(EvalError::Unexpected(c)),
                None => return Err(EvalError::UnexpectedEnd),
            }
        };

        if self.eat('^') {
            x = x.powf(self.factor()?);
        }
        Ok(x)
    }

    fn number(&mut self) -> Result<f64, EvalError> {
        let literal = self.take_while(|c| c.is_ascii_digit() || c == '.');
        literal
            .parse()
            .map_err(|_| EvalError::InvalidNumber(literal))
    }

    fn identifier(&mut self) -> Result<f64, EvalError> {
        // Starts with a letter; digits may follow (`log10`, `x2`).
        let name = self.take_while(char::is_alphanumeric);

        if let Some(value) = self.variables.get(&name) {
            return Ok(*value);
        }

        let function = function(&name).ok_or_else(|| EvalError::UnknownIdentifier(name.clone()))?;
        let argument = if self.eat('(') {
            let x = self.expression()?;
            if !self.eat(')') {
                return Err(EvalError::MissingParenAfter(name));
            }
            x
        } else {
            self.factor()?
        };
        Ok(function(argument))
    }

    fn take_while(&mut self, predicate: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while self.peek().is_some_and(&predicate) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }
}

fn function(name: &str) -> Option<fn(f64) -> f64> {
    let f: fn(f64) -> f64 = match name {
        "sqrt" => f64::sqrt,
        "sin" => |x| x.to_radians().sin(),
        "cos" => |x| x.to_radians().cos(),
        "tan" => |x| x.to_radians().tan(),
        "asin" => |x| x.to_radians().asin(),
        "acos" => |x| x.to_radians().acos(),
        "atan" => |x| x.to_radians().atan(),
        "exp" => f64::exp,
        "toDegrees" => f64::to_degrees,
        "toRadians" => f64::to_radians,
        "log" => f64::ln,
        "log10" => f64::log10,
        "abs" => f64::abs,
        "ceil" => f64::ceil,
        "floor" => f64::floor,
        "round" => |x| (x + 0.5).floor(),
        _ => return None,
    };
    Some(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn evaluates_with_registered_variable() {
        let mut evaluator = Evaluator::new("14 * 9 + 5^x / 78.5");
        evaluator.register_variable("x", 2.0);
        assert_close(evaluator.eval().expect("eval"), 126.0 + 25.0 / 78.5);
    }

    #[test]
    fn respects_precedence_and_parentheses() {
        assert_close(eval("2 + 3 * 4").expect("eval"), 14.0);
        assert_close(eval("(2 + 3) * 4").expect("eval"), 20.0);
        assert_close(eval("10 - 4 - 3").expect("eval"), 3.0);
        assert_close(eval("12 / 3 / 2").expect("eval"), 2.0);
    }

    #[test]
    fn exponent_is_right_associative_and_binds_after_unary() {
        assert_close(eval("2^3^2").expect("eval"), 512.0);
        assert_close(eval("-2^2").expect("eval"), -4.0);
        assert_close(eval("--3").expect("eval"), 3.0);
    }

    #[test]
    fn constants_are_available() {
        assert_close(eval("PI").expect("eval"), PI);
        assert_close(eval("2 * e").expect("eval"), 2.0 * E);
        assert_close(eval("phi^2 - phi").expect("eval"), 1.0);
    }

    #[test]
    fn variables_override_constants() {
        let mut evaluator = Evaluator::new("e + 1");
        evaluator.register_variables([("e", 1.0)]);
        assert_close(evaluator.eval().expect("eval"), 2.0);
        assert_eq!(evaluator.variable("e"), Some(1.0));
    }

    #[test]
    fn functions_use_degrees() {
        assert_close(eval("sin(90)").expect("eval"), 1.0);
        assert_close(eval("cos 0").expect("eval"), 1.0);
        assert_close(eval("toDegrees(PI)").expect("eval"), 180.0);
    }

    #[test]
    fn function_argument_without_parentheses_is_a_factor() {
        assert_close(eval("sqrt 16 + 1").expect("eval"), 5.0);
        assert_close(eval("sqrt 4^2").expect("eval"), 4.0);
    }

    #[test]
    fn rounding_functions() {
        assert_close(eval("round(2.5)").expect("eval"), 3.0);
        assert_close(eval("round(-2.5)").expect("eval"), -2.0);
        assert_close(eval("floor(-1.2) + ceil(1.2)").expect("eval"), 0.0);
        assert_close(eval("abs(-3) + log10(1000) + log(e)").expect("eval"), 7.0);
    }

    #[test]
    fn division_by_zero_is_infinite() {
        assert!(eval("1 / 0").expect("eval").is_infinite());
    }

    #[test]
    fn reports_syntax_errors() {
        assert_eq!(eval("2 +"), Err(EvalError::UnexpectedEnd));
        assert_eq!(eval("(1 + 2"), Err(EvalError::MissingParen));
        assert_eq!(
            eval("sqrt(4"),
            Err(EvalError::MissingParenAfter("sqrt".to_string()))
        );
        assert_eq!(eval("1 2"), Err(EvalError::Unexpected('2')));
        assert_eq!(eval("2 * #"), Err(EvalError::Unexpected('#')));
        assert_eq!(
            eval("1.2.3"),
            Err(EvalError::InvalidNumber("1.2.3".to_string()))
        );
    }

    #[test]
    fn reports_unknown_identifier() {
        assert_eq!(
            eval("foo(2)"),
            Err(EvalError::UnknownIdentifier("foo".to_string()))
        );
    }
}
