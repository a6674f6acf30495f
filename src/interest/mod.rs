pub mod compound;
pub mod deduction;

pub use compound::Compounding;
pub use deduction::{DeductionEngine, TaxDeduction, TaxOverlay, DEFAULT_DEDUCTION_RATE};
