pub mod currency;
pub mod persistence;
pub mod version;
