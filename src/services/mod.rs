pub mod categories;
pub mod keywords;
pub mod preferences;
pub mod providers;
pub mod recommendations;
pub mod search;

pub use preferences::PreferenceService;
pub use recommendations::RecommendationService;
pub use search::{SearchRequest, SearchResults, SearchService};
