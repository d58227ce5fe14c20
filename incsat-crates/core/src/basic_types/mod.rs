mod key_value_heap;
mod literal;
pub(crate) mod moving_averages;
pub(crate) mod sequence_generators;
mod solve_result;
mod variable;

pub(crate) use key_value_heap::KeyValueHeap;
pub use literal::Literal;
pub use literal::LiteralError;
pub use sequence_generators::SequenceGeneratorType;
pub use solve_result::SolveResult;
pub use variable::Variable;
