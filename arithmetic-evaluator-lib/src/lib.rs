//! Tokenizer and recursive descent evaluator for integer arithmetic with
//! `+`, `-`, `*`, `/` and parentheses.

pub mod interpreter;
