pub mod browser_setup;
pub mod config;
pub mod deadline;
pub mod error;
pub mod extractor;
pub mod harvester;
pub mod llm;
pub mod navigation;
pub mod orchestrator;
pub mod output;
pub mod research;
pub mod session;
pub mod utils;

pub use browser_setup::{download_managed_browser, find_browser_executable, launch_browser};
pub use config::{ResearchConfig, ResearchConfigBuilder};
pub use deadline::Deadline;
pub use error::{ResearchError, ResearchResult};
pub use extractor::{ExtractionMetadata, ExtractionResult, ExtractionStrategy, extract};
pub use harvester::{Candidate, DiscoveryStrategy, LinkFilter, find_links};
pub use llm::{GenerateRequest, LlmClient, Trend};
pub use navigation::{Navigator, SearchKind, build_search_url};
pub use orchestrator::{ArticleRecord, BrowsePhase, BrowseRun, SearchRequest, browse_and_analyze};
pub use output::{ResearchLog, RunDirectory};
pub use research::DeepResearcher;
pub use session::{BrowseSession, ChromiumSession, ElementSnapshot, LaunchProfile};
pub use utils::{format_time_elapsed, truncate_text};
