pub mod ast;
#[cfg(feature = "cli")]
pub mod cli;
pub mod evaluator;
pub mod lexer;
pub mod optimizer;
pub mod output;
pub mod params;
pub mod parser;
pub mod schema;

pub use ast::{BinaryOp, Node, Token, UnaryOp};
pub use evaluator::{CallTrace, EvalError, Evaluator, Relation};
pub use lexer::{LexError, Lexer, tokenize};
pub use optimizer::{Optimized, Optimizer, OptimizerConfig, RewriteError, optimize};
pub use output::{to_json, to_json_pretty};
pub use parser::{ParseError, Parser, tree};
pub use schema::{Schema, SchemaError, result_format};
