//! Narrow-purpose tools the assistants call instead of the answer provider

pub mod calculator;
pub mod capitals;
pub mod translator;

pub use calculator::{CalcError, CalculatorTool, Expression, Operation};
pub use capitals::{CapitalLookupTool, CapitalsTable};
pub use translator::{Dictionary, TranslateTool};
