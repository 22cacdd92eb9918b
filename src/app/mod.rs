//! 应用层

pub mod products;
