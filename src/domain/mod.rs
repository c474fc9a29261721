// Domain layer - Pure data types, no I/O
pub mod format;
pub mod knowledge;
pub mod snapshot;
pub mod source_result;
pub mod sources;
pub mod view;
