// Application layer - Use cases and the traits they depend on
pub mod console;
pub mod dashboard_service;
pub mod fallback;
pub mod knowledge_service;
pub mod metrics;
pub mod sources;
