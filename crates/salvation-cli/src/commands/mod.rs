pub mod check;
pub mod pattern;
