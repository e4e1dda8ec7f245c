mod contradiction;
pub(crate) mod moving_averages;
mod random;

pub use contradiction::*;
pub use random::Random;
#[cfg(test)]
pub(crate) use random::tests::TestRandom;
