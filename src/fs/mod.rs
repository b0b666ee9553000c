pub mod binary;
pub mod counter;
pub mod scanner;
pub mod tree;
