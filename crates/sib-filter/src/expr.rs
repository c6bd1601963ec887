//! Typed expression tree of a compiled filter.

use std::fmt;

use crate::error::{FilterError, Result};

/// Binary comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
}

/// Boolean connectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
    Not,
}

/// Every function keyword of the filter language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Connective(Connective),
    Comparison(Comparison),
    Between,
}

/// Allowed number of arguments for an [`Operator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(1) => f.write_str("exactly 1 argument"),
            Arity::Exactly(n) => write!(f, "exactly {n} arguments"),
            Arity::AtLeast(n) => write!(f, "at least {n} arguments"),
        }
    }
}

impl Operator {
    /// Look up a function keyword. `GLEICH` and `IDENTISCH` are synonyms.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let op = match keyword {
            "UND" => Operator::Connective(Connective::And),
            "ODER" => Operator::Connective(Connective::Or),
            "NICHT" => Operator::Connective(Connective::Not),
            "GLEICH" | "IDENTISCH" => Operator::Comparison(Comparison::Equal),
            "KLEINER" => Operator::Comparison(Comparison::LessThan),
            "KLEINERGLEICH" => Operator::Comparison(Comparison::LessOrEqual),
            "GROESSER" => Operator::Comparison(Comparison::GreaterThan),
            "GROESSERGLEICH" => Operator::Comparison(Comparison::GreaterOrEqual),
            "ZWISCHEN" => Operator::Between,
            _ => return None,
        };
        Some(op)
    }

    /// Canonical keyword used when printing an expression back as filter text.
    pub fn keyword(self) -> &'static str {
        match self {
            Operator::Connective(Connective::And) => "UND",
            Operator::Connective(Connective::Or) => "ODER",
            Operator::Connective(Connective::Not) => "NICHT",
            Operator::Comparison(Comparison::Equal) => "GLEICH",
            Operator::Comparison(Comparison::LessThan) => "KLEINER",
            Operator::Comparison(Comparison::LessOrEqual) => "KLEINERGLEICH",
            Operator::Comparison(Comparison::GreaterThan) => "GROESSER",
            Operator::Comparison(Comparison::GreaterOrEqual) => "GROESSERGLEICH",
            Operator::Between => "ZWISCHEN",
        }
    }

    pub fn arity(self) -> Arity {
        match self {
            Operator::Connective(Connective::And | Connective::Or) => Arity::AtLeast(2),
            Operator::Connective(Connective::Not) => Arity::Exactly(1),
            Operator::Comparison(_) => Arity::Exactly(2),
            Operator::Between => Arity::Exactly(3),
        }
    }
}

/// A field reference together with the property path it is rendered as.
///
/// The path equals the name unless the field is lookup-coded, in which case
/// it addresses the short-code attribute below the field element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRef {
    pub name: String,
    pub property: String,
}

impl FieldRef {
    pub fn plain(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            property: name.clone(),
            name,
        }
    }
}

/// Node of a parsed filter expression.
///
/// Operator nodes are only built through [`Expr::apply`], which enforces the
/// argument count of each operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Literal(String),
    Field(FieldRef),
    Comparison {
        op: Comparison,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Connective {
        kind: Connective,
        children: Vec<Expr>,
    },
    Between {
        field: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
    },
}

impl Expr {
    /// Build an operator node from its arguments, in argument order.
    pub fn apply(op: Operator, args: Vec<Expr>) -> Result<Expr> {
        let arity = op.arity();
        if !arity.accepts(args.len()) {
            return Err(FilterError::malformed(format!(
                "{} expects {arity}, got {}",
                op.keyword(),
                args.len()
            )));
        }
        let expr = match op {
            Operator::Connective(kind) => Expr::Connective {
                kind,
                children: args,
            },
            Operator::Comparison(op) => {
                let [left, right] = take_args(args)?;
                Expr::Comparison {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                }
            }
            Operator::Between => {
                let [field, low, high] = take_args(args)?;
                Expr::Between {
                    field: Box::new(field),
                    low: Box::new(low),
                    high: Box::new(high),
                }
            }
        };
        Ok(expr)
    }

    /// Operator of this node, `None` for literals and field references.
    pub fn operator(&self) -> Option<Operator> {
        match self {
            Expr::Literal(_) | Expr::Field(_) => None,
            Expr::Comparison { op, .. } => Some(Operator::Comparison(*op)),
            Expr::Connective { kind, .. } => Some(Operator::Connective(*kind)),
            Expr::Between { .. } => Some(Operator::Between),
        }
    }

    /// Child nodes in argument order.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::Literal(_) | Expr::Field(_) => Vec::new(),
            Expr::Comparison { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            Expr::Connective { children, .. } => children.iter().collect(),
            Expr::Between { field, low, high } => {
                vec![field.as_ref(), low.as_ref(), high.as_ref()]
            }
        }
    }

    /// Number of nested operator levels; literals and fields count zero.
    pub fn depth(&self) -> usize {
        if self.operator().is_none() {
            return 0;
        }
        1 + self.children().into_iter().map(Expr::depth).max().unwrap_or(0)
    }

    /// Every field referenced anywhere below this node, in order of appearance.
    pub fn fields(&self) -> Vec<&FieldRef> {
        match self {
            Expr::Field(field) => vec![field],
            Expr::Literal(_) => Vec::new(),
            _ => self.children().into_iter().flat_map(Expr::fields).collect(),
        }
    }
}

impl fmt::Display for Expr {
    /// Prints the expression back in filter syntax. Literals containing a
    /// double quote are printed in single quotes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(text) if text.contains('"') => write!(f, "'{text}'"),
            Expr::Literal(text) => write!(f, "\"{text}\""),
            Expr::Field(field) => f.write_str(&field.name),
            other => {
                let op = other.operator().map_or("", Operator::keyword);
                write!(f, "{op}(")?;
                for (index, child) in other.children().into_iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str(")")
            }
        }
    }
}

fn take_args<const N: usize>(args: Vec<Expr>) -> Result<[Expr; N]> {
    let count = args.len();
    args.try_into()
        .map_err(|_| FilterError::malformed(format!("expected {N} arguments, got {count}")))
}
