//! Arithmetic evaluator for the chat surface.
//!
//! Accepts worded operators ("7 plus 3", "10 divided by 4") alongside
//! the usual symbols, a few math functions, and the constants pi and e.

use anyhow::{bail, Context, Result};

use super::Tool;

pub struct CalculatorTool;

impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        "Calculator"
    }

    fn describe(&self) -> &str {
        "Evaluates arithmetic expressions, including worded operators and common functions"
    }

    fn instructions(&self) -> String {
        concat!(
            "You are a calculator assistant. Evaluate the arithmetic expression the user gives you ",
            "and reply with only the numeric result. Support +, -, *, /, %, ^, parentheses, and the ",
            "functions sqrt, sin, cos, tan, log, ln, abs, floor, and ceil. If the expression is ",
            "invalid, say so briefly instead of guessing."
        )
        .to_string()
    }

    fn execute(&self, input: &str) -> Result<String> {
        let normalized = normalize_expression(input);
        if normalized.trim().is_empty() {
            bail!("Give me an expression to evaluate");
        }
        let value = ExprParser::new(&normalized).parse()?;
        Ok(format_number(value))
    }
}

/// Rewrites worded operators to symbols. Longer phrases go first so
/// "modulo" is not half-eaten by the "mod" rule.
fn normalize_expression(input: &str) -> String {
    let mut text = input.to_lowercase();
    for (phrase, symbol) in [
        ("multiplied by", "*"),
        ("divided by", "/"),
        ("to the power of", "^"),
        ("modulo", "%"),
        ("plus", "+"),
        ("minus", "-"),
        ("times", "*"),
        ("over", "/"),
        ("mod", "%"),
        (" x ", " * "),
        (",", ""),
    ] {
        text = text.replace(phrase, symbol);
    }
    text
}

/// Recursive-descent parser over the normalized expression.
struct ExprParser {
    chars: Vec<char>,
    pos: usize,
}

impl ExprParser {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    fn parse(mut self) -> Result<f64> {
        let value = self.expression()?;
        self.skip_ws();
        if self.pos < self.chars.len() {
            let rest: String = self.chars[self.pos..].iter().collect();
            bail!("Unexpected input at '{}'", rest.trim());
        }
        Ok(value)
    }

    fn expression(&mut self) -> Result<f64> {
        let mut value = self.term()?;
        loop {
            self.skip_ws();
            match self.peek() {
                Some('+') => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Some('-') => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<f64> {
        let mut value = self.unary()?;
        loop {
            self.skip_ws();
            match self.peek() {
                Some('*') => {
                    self.pos += 1;
                    value *= self.unary()?;
                }
                Some('/') => {
                    self.pos += 1;
                    let divisor = self.unary()?;
                    if divisor == 0.0 {
                        bail!("Division by zero");
                    }
                    value /= divisor;
                }
                Some('%') => {
                    self.pos += 1;
                    let divisor = self.unary()?;
                    if divisor == 0.0 {
                        bail!("Division by zero");
                    }
                    value %= divisor;
                }
                _ => return Ok(value),
            }
        }
    }

    fn unary(&mut self) -> Result<f64> {
        self.skip_ws();
        match self.peek() {
            Some('-') => {
                self.pos += 1;
                Ok(-self.unary()?)
            }
            Some('+') => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<f64> {
        let base = self.atom()?;
        self.skip_ws();
        if self.peek() == Some('^') {
            self.pos += 1;
            // Right-associative: 2^3^2 is 2^(3^2).
            let exponent = self.unary()?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<f64> {
        self.skip_ws();
        match self.peek() {
            Some('(') => {
                self.pos += 1;
                let value = self.expression()?;
                self.skip_ws();
                if self.peek() != Some(')') {
                    bail!("Expected ')'");
                }
                self.pos += 1;
                Ok(value)
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(),
            Some(c) if c.is_ascii_alphabetic() => self.identifier(),
            Some(c) => bail!("Unexpected character '{}'", c),
            None => bail!("Expression ended unexpectedly"),
        }
    }

    fn number(&mut self) -> Result<f64> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '.' {
                self.pos += 1;
            } else {
                break;
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse::<f64>()
            .with_context(|| format!("Invalid number '{}'", text))
    }

    fn identifier(&mut self) -> Result<f64> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphabetic() {
                self.pos += 1;
            } else {
                break;
            }
        }
        let name: String = self.chars[start..self.pos].iter().collect();
        match name.as_str() {
            "pi" => return Ok(std::f64::consts::PI),
            "e" => return Ok(std::f64::consts::E),
            _ => {}
        }
        self.skip_ws();
        if self.peek() != Some('(') {
            bail!("Unknown name '{}'", name);
        }
        self.pos += 1;
        let argument = self.expression()?;
        self.skip_ws();
        if self.peek() != Some(')') {
            bail!("Expected ')' after {} argument", name);
        }
        self.pos += 1;
        apply_function(&name, argument)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|c| c.is_whitespace()) {
            self.pos += 1;
        }
    }
}

fn apply_function(name: &str, argument: f64) -> Result<f64> {
    match name {
        "sqrt" => {
            if argument < 0.0 {
                bail!("Cannot take the square root of a negative number");
            }
            Ok(argument.sqrt())
        }
        "sin" => Ok(argument.sin()),
        "cos" => Ok(argument.cos()),
        "tan" => Ok(argument.tan()),
        "log" => {
            if argument <= 0.0 {
                bail!("Logarithm needs a positive argument");
            }
            Ok(argument.log10())
        }
        "ln" => {
            if argument <= 0.0 {
                bail!("Logarithm needs a positive argument");
            }
            Ok(argument.ln())
        }
        "abs" => Ok(argument.abs()),
        "floor" => Ok(argument.floor()),
        "ceil" => Ok(argument.ceil()),
        other => bail!("Unknown function '{}'", other),
    }
}

/// Whole results print without a trailing ".0".
fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
