// HTTP handlers, one module per resource

pub mod ads;
pub mod categories;
pub mod health;
pub mod users;
