//! Domain model: categories, products, build slots and saved builds.

pub mod build;
pub mod category;
pub mod product;
pub mod types;
