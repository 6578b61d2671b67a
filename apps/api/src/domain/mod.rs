// Domain layer module exports
// Following Hexagonal Architecture and DDD principles
// Domain is independent of infrastructure concerns

pub mod ad;
pub mod category;
pub mod pagination;
pub mod repositories;
pub mod user;
