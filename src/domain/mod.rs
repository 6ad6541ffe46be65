// Domain layer: request/estimate models and the ports the pricing core depends on.

pub mod model;
pub mod ports;
