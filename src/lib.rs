pub mod config;
pub mod enrich;
pub mod geocode;
pub mod headers;
pub mod pipeline;
pub mod records;
