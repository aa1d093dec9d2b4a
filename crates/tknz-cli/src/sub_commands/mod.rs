pub mod prepare;
pub mod tokenize;
pub mod wake;
