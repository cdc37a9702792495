mod traits;
pub use traits::*;

mod types;
pub use types::*;

mod processor;
pub use processor::*;

mod search;
pub use search::*;

#[cfg(test)]
mod mocks;


#[cfg(test)]
mod processor_tests;
