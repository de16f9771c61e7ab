// Domain layer: records, form input and the API port.

pub mod model;
pub mod ports;
