// Ingestion and normalization: raw rows in, canonical records out
pub mod date_coercer;
pub mod file_loader;
pub mod header_resolver;
pub mod key_normalizer;
pub mod library_store;
pub mod price_parser;
pub mod record_mapper;
