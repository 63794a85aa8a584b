//! Row-filter mini-language.
//!
//! A small pandas-`query`-like boolean syntax over column names:
//!
//! ```text
//! price > 100 and region == 'EU'
//! (units >= 10 or priority) and not status == "closed"
//! ```
//!
//! Grammar (recursive descent, `and` binds tighter than `or`):
//!
//! ```text
//! expr       := and_expr ( OR and_expr )*
//! and_expr   := not_expr ( AND not_expr )*
//! not_expr   := NOT not_expr | "(" expr ")" | comparison
//! comparison := operand ( ">" | ">=" | "<" | "<=" | "==" | "!=" ) operand
//! operand    := identifier | number | 'string' | "string" | true | false
//! ```
//!
//! Comparisons against null cells or between incompatible types make the
//! row fail the comparison rather than erroring, so one odd cell never
//! aborts a run. Unknown column names are a hard error.

use std::cmp::Ordering;

use thiserror::Error;

use super::model::{CellValue, DataTable};

#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    #[error("unexpected character '{0}'")]
    BadChar(char),
    #[error("invalid number '{0}'")]
    BadNumber(String),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("expected {expected}, found {found}")]
    Unexpected {
        expected: &'static str,
        found: String,
    },
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("trailing input after expression")]
    TrailingInput,
    #[error("unknown column '{0}'")]
    UnknownColumn(String),
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Number(f64),
    Str(String),
    Bool(bool),
    And,
    Or,
    Not,
    Cmp(CmpOp),
    LParen,
    RParen,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Ident(s) => format!("identifier '{s}'"),
            Token::Number(n) => format!("number {n}"),
            Token::Str(s) => format!("string '{s}'"),
            Token::Bool(b) => format!("boolean {b}"),
            Token::And => "'and'".to_string(),
            Token::Or => "'or'".to_string(),
            Token::Not => "'not'".to_string(),
            Token::Cmp(op) => format!("'{}'", op.symbol()),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    fn symbol(self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, FilterError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '>' | '<' => {
                let wide = chars.get(i + 1) == Some(&'=');
                tokens.push(Token::Cmp(match (c, wide) {
                    ('>', true) => CmpOp::Ge,
                    ('>', false) => CmpOp::Gt,
                    (_, true) => CmpOp::Le,
                    (_, false) => CmpOp::Lt,
                }));
                i += if wide { 2 } else { 1 };
            }
            '=' => {
                if chars.get(i + 1) == Some(&'=') {
                    tokens.push(Token::Cmp(CmpOp::Eq));
                    i += 2;
                } else {
                    return Err(FilterError::BadChar('='));
                }
            }
            '!' => {
                if chars.get(i + 1) == Some(&'=') {
                    tokens.push(Token::Cmp(CmpOp::Ne));
                    i += 2;
                } else {
                    tokens.push(Token::Not);
                    i += 1;
                }
            }
            '&' => {
                tokens.push(Token::And);
                i += if chars.get(i + 1) == Some(&'&') { 2 } else { 1 };
            }
            '|' => {
                tokens.push(Token::Or);
                i += if chars.get(i + 1) == Some(&'|') { 2 } else { 1 };
            }
            '\'' | '"' => {
                let quote = c;
                let start = i + 1;
                let mut j = start;
                while j < chars.len() && chars[j] != quote {
                    j += 1;
                }
                if j == chars.len() {
                    return Err(FilterError::UnterminatedString);
                }
                tokens.push(Token::Str(chars[start..j].iter().collect()));
                i = j + 1;
            }
            c if c.is_ascii_digit()
                || c == '.'
                || (c == '-'
                    && chars
                        .get(i + 1)
                        .is_some_and(|n| n.is_ascii_digit() || *n == '.')) =>
            {
                let start = i;
                i += 1; // sign or first digit
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                // optional exponent
                if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        i = j;
                        while i < chars.len() && chars[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let text: String = chars[start..i].iter().collect();
                let value = text
                    .parse::<f64>()
                    .map_err(|_| FilterError::BadNumber(text.clone()))?;
                tokens.push(Token::Number(value));
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                tokens.push(match word.as_str() {
                    "and" => Token::And,
                    "or" => Token::Or,
                    "not" => Token::Not,
                    "true" | "True" => Token::Bool(true),
                    "false" | "False" => Token::Bool(false),
                    _ => Token::Ident(word),
                });
            }
            other => return Err(FilterError::BadChar(other)),
        }
    }

    Ok(tokens)
}

// ---------------------------------------------------------------------------
// AST and parser
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    And(Box<FilterExpr>, Box<FilterExpr>),
    Or(Box<FilterExpr>, Box<FilterExpr>),
    Not(Box<FilterExpr>),
    Cmp {
        lhs: Operand,
        op: CmpOp,
        rhs: Operand,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Column(String),
    Number(f64),
    Str(String),
    Bool(bool),
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Result<Token, FilterError> {
        let tok = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or(FilterError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(tok)
    }

    fn parse_or(&mut self) -> Result<FilterExpr, FilterError> {
        let mut left = self.parse_and()?;
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            let right = self.parse_and()?;
            left = FilterExpr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<FilterExpr, FilterError> {
        let mut left = self.parse_not()?;
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            let right = self.parse_not()?;
            left = FilterExpr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<FilterExpr, FilterError> {
        match self.peek() {
            Some(Token::Not) => {
                self.pos += 1;
                Ok(FilterExpr::Not(Box::new(self.parse_not()?)))
            }
            Some(Token::LParen) => {
                self.pos += 1;
                let inner = self.parse_or()?;
                match self.next()? {
                    Token::RParen => Ok(inner),
                    other => Err(FilterError::Unexpected {
                        expected: "')'",
                        found: other.describe(),
                    }),
                }
            }
            _ => self.parse_comparison(),
        }
    }

    fn parse_comparison(&mut self) -> Result<FilterExpr, FilterError> {
        let lhs = self.parse_operand()?;
        let op = match self.next()? {
            Token::Cmp(op) => op,
            other => {
                return Err(FilterError::Unexpected {
                    expected: "comparison operator",
                    found: other.describe(),
                })
            }
        };
        let rhs = self.parse_operand()?;
        Ok(FilterExpr::Cmp { lhs, op, rhs })
    }

    fn parse_operand(&mut self) -> Result<Operand, FilterError> {
        match self.next()? {
            Token::Ident(name) => Ok(Operand::Column(name)),
            Token::Number(n) => Ok(Operand::Number(n)),
            Token::Str(s) => Ok(Operand::Str(s)),
            Token::Bool(b) => Ok(Operand::Bool(b)),
            other => Err(FilterError::Unexpected {
                expected: "column, number, string, or boolean",
                found: other.describe(),
            }),
        }
    }
}

/// Parse a filter condition into an expression tree.
pub fn compile(input: &str) -> Result<FilterExpr, FilterError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_or()?;
    if parser.pos != parser.tokens.len() {
        return Err(FilterError::TrailingInput);
    }
    Ok(expr)
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Apply a compiled expression to a table, returning the rows that pass.
/// Fails up front if the expression references a column the table does
/// not have; per-row evaluation itself cannot fail.
pub fn apply(table: &DataTable, expr: &FilterExpr) -> Result<DataTable, FilterError> {
    check_columns(expr, table)?;
    let keep: Vec<bool> = table
        .rows
        .iter()
        .map(|row| eval_row(expr, table, row))
        .collect();
    Ok(table.select_rows(&keep))
}

fn check_columns(expr: &FilterExpr, table: &DataTable) -> Result<(), FilterError> {
    match expr {
        FilterExpr::And(a, b) | FilterExpr::Or(a, b) => {
            check_columns(a, table)?;
            check_columns(b, table)
        }
        FilterExpr::Not(inner) => check_columns(inner, table),
        FilterExpr::Cmp { lhs, rhs, .. } => {
            for operand in [lhs, rhs] {
                if let Operand::Column(name) = operand {
                    if table.column_index(name).is_none() {
                        return Err(FilterError::UnknownColumn(name.clone()));
                    }
                }
            }
            Ok(())
        }
    }
}

fn eval_row(expr: &FilterExpr, table: &DataTable, row: &[CellValue]) -> bool {
    match expr {
        FilterExpr::And(a, b) => eval_row(a, table, row) && eval_row(b, table, row),
        FilterExpr::Or(a, b) => eval_row(a, table, row) || eval_row(b, table, row),
        FilterExpr::Not(inner) => !eval_row(inner, table, row),
        FilterExpr::Cmp { lhs, op, rhs } => {
            let left = resolve(lhs, table, row);
            let right = resolve(rhs, table, row);
            compare(&left, *op, &right)
        }
    }
}

fn resolve(operand: &Operand, table: &DataTable, row: &[CellValue]) -> CellValue {
    match operand {
        // Column existence was verified in check_columns.
        Operand::Column(name) => match table.column_index(name) {
            Some(idx) => row[idx].clone(),
            None => CellValue::Null,
        },
        Operand::Number(n) => CellValue::Float(*n),
        Operand::Str(s) => CellValue::String(s.clone()),
        Operand::Bool(b) => CellValue::Bool(*b),
    }
}

/// Null operands and incompatible types fail every comparison.
fn compare(lhs: &CellValue, op: CmpOp, rhs: &CellValue) -> bool {
    if lhs.is_null() || rhs.is_null() {
        return false;
    }
    let ordering = match (lhs.as_f64(), rhs.as_f64()) {
        (Some(a), Some(b)) => a.partial_cmp(&b),
        _ => match (lhs, rhs) {
            (CellValue::String(a), CellValue::String(b)) => Some(a.cmp(b)),
            (CellValue::Bool(a), CellValue::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        },
    };
    let Some(ordering) = ordering else {
        return false;
    };
    match op {
        CmpOp::Eq => ordering == Ordering::Equal,
        CmpOp::Ne => ordering != Ordering::Equal,
        CmpOp::Lt => ordering == Ordering::Less,
        CmpOp::Le => ordering != Ordering::Greater,
        CmpOp::Gt => ordering == Ordering::Greater,
        CmpOp::Ge => ordering != Ordering::Less,
    }
}
