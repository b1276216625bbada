pub mod connectivity;
pub mod index;
pub mod schema;

// Re-export for convenience
pub use connectivity::{analyze_net, unconnected_nets, NetConnectivity, COORD_TOLERANCE_MM};
pub use index::GeometryIndex;
pub use schema::*;
