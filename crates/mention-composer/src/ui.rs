pub mod highlight;
pub mod layout;
pub mod state;
