// Infrastructure layer module
// Contains database adapters and local media storage
// Follows Hexagonal Architecture

pub mod media;
pub mod repositories;
