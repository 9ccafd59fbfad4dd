pub mod error;
pub mod extract;
pub mod filename;
pub mod harvester;
pub mod result;

pub use error::HarvestError;
pub use extract::{Discovery, discover_candidates, normalize_candidates};
pub use filename::{filename_from_url, synthesized_filename};
pub use harvester::{Harvester, HarvestSession};
pub use result::{DownloadOutcome, HarvestReport};
