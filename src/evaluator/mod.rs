pub mod evaluator;
pub mod number;
