//! Filesystem outputs of a research run

mod files;
mod report;
mod research_log;

pub use files::{RunDirectory, save_json, save_screenshot, save_text, write_file};
pub use report::{
    BASIC_REPORT_FILE, RESEARCH_REPORT_FILE, TOPIC_RESEARCH_FILE, local_timestamp, write_report,
};
pub use research_log::{RESEARCH_LOG_FILE, ResearchLog};
