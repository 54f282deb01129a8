pub mod countdown;
pub mod eastern;
pub mod parser;
