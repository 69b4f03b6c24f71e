pub mod csr;
pub mod cycle;
pub mod registry;
pub mod search;
pub mod solver;
pub mod traits;

pub use csr::GraphCSR;
pub use cycle::Cycle;
pub use registry::CycleRegistry;
pub use search::{DescentSearch, find_path_between};
pub use solver::{CycleScope, SearchConfig, SteepestDescentSolver};
pub use traits::{EnergyLandscape, PathSolver};
