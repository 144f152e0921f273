pub mod controller;
pub mod model;
pub mod resolver;
pub mod selector;

pub use controller::{ClusterController, ClusterStream, RestClusterController};
pub use model::{ClusterRecord, ClusterState};
pub use resolver::{ClusterResolver, extract_host};
pub use selector::{LabelSelector, build_filter};
