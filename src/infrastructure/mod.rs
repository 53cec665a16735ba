pub mod config;
pub mod csv;
pub mod export;
pub mod llm_clients;
pub mod xlsx;
