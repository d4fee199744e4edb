// Domain layer: push metadata, feed state and prune results, plus the ports the engine talks through.

pub mod model;
pub mod ports;
