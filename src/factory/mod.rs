//! Block factory: new blocks with values from the configured ladder.

mod generator;

pub use generator::BlockFactory;
