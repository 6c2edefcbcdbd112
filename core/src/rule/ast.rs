//! Abstract syntax tree of a parsed rule.

use std::fmt;

/// Binary operator tag. `&&` and `||` share the same node shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `&&`
    And,
    /// `||`
    Or,
}

impl BinaryOp {
    /// The operator as written in rules.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::And => "&&",
            Self::Or => "||",
        }
    }
}

/// A parsed rule expression.
///
/// Chains of the same operator are left-associative:
/// `a && b && c` parses as `(a && b) && c`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// `lhs && rhs` or `lhs || rhs`.
    Binary {
        /// Operator tag.
        op: BinaryOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },
    /// `!inner`
    Not(Box<Expr>),
    /// A leaf predicate call: ``Name(`value`)``.
    Call {
        /// Predicate identifier as written.
        name: String,
        /// The single string argument.
        arg: String,
    },
}

impl Expr {
    /// Build a binary node.
    #[must_use]
    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Self::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Build a negation node.
    #[must_use]
    pub fn not(inner: Expr) -> Self {
        Self::Not(Box::new(inner))
    }

    /// Build a call node.
    pub fn call(name: impl Into<String>, arg: impl Into<String>) -> Self {
        Self::Call {
            name: name.into(),
            arg: arg.into(),
        }
    }

    /// Operands of a same-operator chain rooted here, in source order.
    ///
    /// Walks the left spine iteratively, so long chains do not recurse.
    /// For a node that is not `Binary { op, .. }` the result is `[self]`.
    #[must_use]
    pub fn chain(&self, op: BinaryOp) -> Vec<&Expr> {
        let mut rights = Vec::new();
        let mut current = self;
        while let Expr::Binary {
            op: node_op,
            lhs,
            rhs,
        } = current
        {
            if *node_op != op {
                break;
            }
            rights.push(rhs.as_ref());
            current = lhs.as_ref();
        }
        let mut operands = Vec::with_capacity(rights.len() + 1);
        operands.push(current);
        operands.extend(rights.into_iter().rev());
        operands
    }
}

/// Renders a rule that parses back to the same tree. Every operator chain
/// sits in one pair of parentheses, operands flat inside it.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary { op, .. } => {
                f.write_str("(")?;
                for (i, operand) in self.chain(*op).into_iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", op.as_str())?;
                    }
                    write!(f, "{operand}")?;
                }
                f.write_str(")")
            }
            Self::Not(inner) => write!(f, "!{inner}"),
            Self::Call { name, arg } => write!(f, "{name}(`{arg}`)"),
        }
    }
}
