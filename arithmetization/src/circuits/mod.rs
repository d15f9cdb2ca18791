pub mod assignment;
pub mod constraints;
pub mod expr;
pub mod gate;
pub mod satisfiability;
pub mod variable;
