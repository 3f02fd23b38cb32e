pub mod attachment;
pub mod candidate;
pub mod edit;
pub mod input;
pub mod mention;
