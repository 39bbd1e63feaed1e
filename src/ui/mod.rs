pub mod breakdown;
pub mod notice;
