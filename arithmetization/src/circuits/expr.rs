//! Polynomial expressions over [`Variable`]s.
//!
//! Gates and lookup gates carry their constraints as [`Expr`] trees. The same
//! variable walk ([`Expr::visit_variables`]) serves both the connectedness
//! checker and the satisfiability check.

use crate::circuits::variable::Variable;
use ark_ff::Field;
use std::{
    collections::BTreeSet,
    fmt,
    ops::{Add, Mul, Neg, Sub},
};

/// An expression tree over cells of the assignment table.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expr<F> {
    Constant(F),
    Var(Variable),
    Add(Box<Expr<F>>, Box<Expr<F>>),
    Sub(Box<Expr<F>>, Box<Expr<F>>),
    Mul(Box<Expr<F>>, Box<Expr<F>>),
    Neg(Box<Expr<F>>),
}

impl<F: Field> Expr<F> {
    pub fn constant(value: F) -> Self {
        Expr::Constant(value)
    }

    pub fn var(variable: Variable) -> Self {
        Expr::Var(variable)
    }

    /// Calls `visit` on every variable occurrence, left to right.
    pub fn visit_variables<V: FnMut(&Variable)>(&self, visit: &mut V) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Expr::Constant(_) => (),
                Expr::Var(v) => visit(v),
                Expr::Add(x, y) | Expr::Sub(x, y) | Expr::Mul(x, y) => {
                    stack.push(y);
                    stack.push(x);
                }
                Expr::Neg(x) => stack.push(x),
            }
        }
    }

    /// The set of distinct variables referenced by the expression.
    pub fn variables(&self) -> BTreeSet<Variable> {
        collect_variables(std::iter::once(self))
    }

    /// Evaluates the expression, reading each variable through `value_of`.
    pub fn evaluate<G: Fn(&Variable) -> F>(&self, value_of: &G) -> F {
        match self {
            Expr::Constant(c) => *c,
            Expr::Var(v) => value_of(v),
            Expr::Add(x, y) => x.evaluate(value_of) + y.evaluate(value_of),
            Expr::Sub(x, y) => x.evaluate(value_of) - y.evaluate(value_of),
            Expr::Mul(x, y) => x.evaluate(value_of) * y.evaluate(value_of),
            Expr::Neg(x) => -x.evaluate(value_of),
        }
    }
}

/// The distinct variables referenced by a group of expressions, e.g. all the
/// constraints of one gate.
pub fn collect_variables<'a, F, I>(exprs: I) -> BTreeSet<Variable>
where
    F: Field,
    I: IntoIterator<Item = &'a Expr<F>>,
{
    let mut vars = BTreeSet::new();
    for expr in exprs {
        expr.visit_variables(&mut |v| {
            vars.insert(*v);
        });
    }
    vars
}

impl<F> From<Variable> for Expr<F> {
    fn from(v: Variable) -> Self {
        Expr::Var(v)
    }
}

impl<F> Add for Expr<F> {
    type Output = Expr<F>;

    fn add(self, other: Self) -> Self {
        Expr::Add(Box::new(self), Box::new(other))
    }
}

impl<F> Sub for Expr<F> {
    type Output = Expr<F>;

    fn sub(self, other: Self) -> Self {
        Expr::Sub(Box::new(self), Box::new(other))
    }
}

impl<F> Mul for Expr<F> {
    type Output = Expr<F>;

    fn mul(self, other: Self) -> Self {
        Expr::Mul(Box::new(self), Box::new(other))
    }
}

impl<F> Neg for Expr<F> {
    type Output = Expr<F>;

    fn neg(self) -> Self {
        Expr::Neg(Box::new(self))
    }
}

impl<F: fmt::Display> fmt::Display for Expr<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Constant(c) => write!(f, "{c}"),
            Expr::Var(v) => write!(f, "{v}"),
            Expr::Add(x, y) => write!(f, "({x} + {y})"),
            Expr::Sub(x, y) => write!(f, "({x} - {y})"),
            Expr::Mul(x, y) => write!(f, "{x} * {y}"),
            Expr::Neg(x) => write!(f, "-{x}"),
        }
    }
}
