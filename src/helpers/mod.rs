pub mod reader;
pub(crate) mod reference;
pub mod string;
