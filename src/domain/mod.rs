// Domain layer: listing records, extraction outcomes and the ports the pipeline is generic over.

pub mod markers;
pub mod model;
pub mod ports;
pub mod settings;
