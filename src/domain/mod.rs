// Domain layer: records, matching policy, run report and the ports the pipeline talks through.

pub mod model;
pub mod policy;
pub mod ports;
pub mod report;
