pub mod labels;
pub mod protocol;
