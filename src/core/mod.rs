pub mod ast;
pub mod record;
