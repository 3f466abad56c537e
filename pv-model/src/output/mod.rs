pub mod result;
pub mod yearly;
