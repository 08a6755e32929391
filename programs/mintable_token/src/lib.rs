pub mod constants;
pub mod factory;
pub mod solidity;
pub mod token;

pub use factory::*;
pub use token::*;
