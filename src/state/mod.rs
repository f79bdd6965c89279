//! State module for tracking crawl progress
//!
//! A run moves through a fixed sequence of phases and always ends in
//! `Done`; per-page and per-listing failures are absorbed locally and never
//! move the run off that path.

mod crawl_phase;

pub use crawl_phase::CrawlPhase;
