//! Recursive-descent parser producing the expression operation tree.

use serde_json::Value;

use super::error::ExprError;
use super::lexer::{Token, tokenize};

/// Compiled form of a template expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A JSON literal (`1`, `"a"`, `true`, `null`).
    Literal(Value),
    /// The `undefined` keyword.
    Undefined,
    /// A dotted identifier chain such as `user.address.city`.
    Path(Vec<String>),
    /// Member access on an arbitrary receiver (`list[0]`, `f(x).name`).
    Member {
        object: Box<Expr>,
        property: Box<Expr>,
    },
    /// Function or method call.
    Call { callee: Box<Expr>, args: Vec<Expr> },
    Unary { op: UnaryOp, operand: Box<Expr> },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    Array(Vec<Expr>),
    Object(Vec<(String, Expr)>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Negate,
    Plus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Lt,
    Le,
    Gt,
    Ge,
    LooseEq,
    LooseNe,
    StrictEq,
    StrictNe,
}

impl BinaryOp {
    pub(crate) fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::LooseEq => "==",
            Self::LooseNe => "!=",
            Self::StrictEq => "===",
            Self::StrictNe => "!==",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
    Coalesce,
}

/// Deepest operation tree the parser will build.
pub const MAX_NESTING: usize = 64;

/// Parse expression text into an [`Expr`].
///
/// Trees nested deeper than [`MAX_NESTING`] are rejected as a syntax error.
pub fn parse(source: &str) -> Result<Expr, ExprError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        end: source.len(),
        depth: 0,
    };
    let expr = parser.conditional()?;
    match parser.tokens.get(parser.pos) {
        None => Ok(expr),
        Some((offset, token)) => {
            Err(ExprError::syntax(*offset, format!("unexpected trailing token {token:?}")))
        }
    }
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    end: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |(o, _)| *o)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(_, t)| t.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, punct: &str) -> bool {
        if matches!(self.peek(), Some(Token::Punct(p)) if *p == punct) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, punct: &str) -> Result<(), ExprError> {
        if self.eat(punct) {
            Ok(())
        } else {
            Err(ExprError::syntax(self.offset(), format!("expected '{punct}'")))
        }
    }

    /// Count one more level of nesting in the tree being built.
    fn nest(&mut self) -> Result<(), ExprError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(ExprError::syntax(self.offset(), "expression nested too deep"));
        }
        Ok(())
    }

    fn conditional(&mut self) -> Result<Expr, ExprError> {
        let depth = self.depth;
        self.nest()?;
        let expr = self.ternary()?;
        self.depth = depth;
        Ok(expr)
    }

    fn ternary(&mut self) -> Result<Expr, ExprError> {
        let test = self.logical_or()?;
        if !self.eat("?") {
            return Ok(test);
        }
        let consequent = self.conditional()?;
        self.expect(":")?;
        let alternate = self.conditional()?;
        Ok(Expr::Conditional {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        })
    }

    fn logical_or(&mut self) -> Result<Expr, ExprError> {
        let mut left = self.logical_and()?;
        loop {
            let op = if self.eat("||") {
                LogicalOp::Or
            } else if self.eat("??") {
                LogicalOp::Coalesce
            } else {
                return Ok(left);
            };
            self.nest()?;
            let right = self.logical_and()?;
            left = Expr::Logical {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn logical_and(&mut self) -> Result<Expr, ExprError> {
        let mut left = self.equality()?;
        while self.eat("&&") {
            self.nest()?;
            let right = self.equality()?;
            left = Expr::Logical {
                op: LogicalOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn binary_level(
        &mut self,
        ops: &[(&str, BinaryOp)],
        next: fn(&mut Self) -> Result<Expr, ExprError>,
    ) -> Result<Expr, ExprError> {
        let mut left = next(self)?;
        'outer: loop {
            for (punct, op) in ops {
                if self.eat(punct) {
                    self.nest()?;
                    let right = next(self)?;
                    left = Expr::Binary {
                        op: *op,
                        left: Box::new(left),
                        right: Box::new(right),
                    };
                    continue 'outer;
                }
            }
            return Ok(left);
        }
    }

    fn equality(&mut self) -> Result<Expr, ExprError> {
        self.binary_level(
            &[
                ("===", BinaryOp::StrictEq),
                ("!==", BinaryOp::StrictNe),
                ("==", BinaryOp::LooseEq),
                ("!=", BinaryOp::LooseNe),
            ],
            Self::relational,
        )
    }

    fn relational(&mut self) -> Result<Expr, ExprError> {
        self.binary_level(
            &[
                ("<=", BinaryOp::Le),
                (">=", BinaryOp::Ge),
                ("<", BinaryOp::Lt),
                (">", BinaryOp::Gt),
            ],
            Self::additive,
        )
    }

    fn additive(&mut self) -> Result<Expr, ExprError> {
        self.binary_level(&[("+", BinaryOp::Add), ("-", BinaryOp::Sub)], Self::multiplicative)
    }

    fn multiplicative(&mut self) -> Result<Expr, ExprError> {
        self.binary_level(
            &[("*", BinaryOp::Mul), ("/", BinaryOp::Div), ("%", BinaryOp::Rem)],
            Self::unary,
        )
    }

    fn unary(&mut self) -> Result<Expr, ExprError> {
        let op = if self.eat("!") {
            UnaryOp::Not
        } else if self.eat("-") {
            UnaryOp::Negate
        } else if self.eat("+") {
            UnaryOp::Plus
        } else {
            return self.postfix();
        };
        self.nest()?;
        let operand = self.unary()?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn postfix(&mut self) -> Result<Expr, ExprError> {
        let mut expr = self.primary()?;
        loop {
            if matches!(self.peek(), Some(Token::Punct("." | "[" | "("))) {
                self.nest()?;
            }
            if self.eat(".") {
                let offset = self.offset();
                let name = match self.next() {
                    Some(Token::Ident(name)) => name,
                    _ => return Err(ExprError::syntax(offset, "expected property name after '.'")),
                };
                expr = match expr {
                    Expr::Path(mut segments) => {
                        segments.push(name);
                        Expr::Path(segments)
                    }
                    other => Expr::Member {
                        object: Box::new(other),
                        property: Box::new(Expr::Literal(Value::String(name))),
                    },
                };
            } else if self.eat("[") {
                let property = self.conditional()?;
                self.expect("]")?;
                expr = Expr::Member {
                    object: Box::new(expr),
                    property: Box::new(property),
                };
            } else if self.eat("(") {
                let args = self.arguments(")")?;
                expr = Expr::Call {
                    callee: Box::new(expr),
                    args,
                };
            } else {
                return Ok(expr);
            }
        }
    }

    fn arguments(&mut self, close: &str) -> Result<Vec<Expr>, ExprError> {
        let mut args = Vec::new();
        if self.eat(close) {
            return Ok(args);
        }
        loop {
            args.push(self.conditional()?);
            if self.eat(close) {
                return Ok(args);
            }
            self.expect(",")?;
            // trailing comma
            if self.eat(close) {
                return Ok(args);
            }
        }
    }

    fn primary(&mut self) -> Result<Expr, ExprError> {
        let offset = self.offset();
        match self.next() {
            Some(Token::Number(n)) => Ok(Expr::Literal(
                serde_json::Number::from_f64(n).map_or(Value::Null, |num| {
                    if n.fract() == 0.0 && n.abs() < 9.0e15 {
                        Value::from(n as i64)
                    } else {
                        Value::Number(num)
                    }
                }),
            )),
            Some(Token::Str(s)) => Ok(Expr::Literal(Value::String(s))),
            Some(Token::Ident(name)) => Ok(match name.as_str() {
                "true" => Expr::Literal(Value::Bool(true)),
                "false" => Expr::Literal(Value::Bool(false)),
                "null" => Expr::Literal(Value::Null),
                "undefined" => Expr::Undefined,
                _ => Expr::Path(vec![name]),
            }),
            Some(Token::Punct("(")) => {
                let inner = self.conditional()?;
                self.expect(")")?;
                Ok(inner)
            }
            Some(Token::Punct("[")) => Ok(Expr::Array(self.arguments("]")?)),
            Some(Token::Punct("{")) => self.object_literal(),
            Some(token) => Err(ExprError::syntax(offset, format!("unexpected token {token:?}"))),
            None => Err(ExprError::syntax(offset, "unexpected end of expression")),
        }
    }

    fn object_literal(&mut self) -> Result<Expr, ExprError> {
        let mut entries = Vec::new();
        if self.eat("}") {
            return Ok(Expr::Object(entries));
        }
        loop {
            let offset = self.offset();
            let key = match self.next() {
                Some(Token::Ident(name)) => name,
                Some(Token::Str(s)) => s,
                Some(Token::Number(n)) => serde_json::Number::from_f64(n)
                    .map_or_else(|| n.to_string(), |num| crate::codec::format_number(&num)),
                _ => return Err(ExprError::syntax(offset, "expected object key")),
            };
            self.expect(":")?;
            entries.push((key, self.conditional()?));
            if self.eat("}") {
                return Ok(Expr::Object(entries));
            }
            self.expect(",")?;
            if self.eat("}") {
                return Ok(Expr::Object(entries));
            }
        }
    }
}
