// Domain layer: core models, validation errors and persistence ports.

pub mod error;
pub mod model;
pub mod ports;
