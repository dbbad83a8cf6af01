//! Rolls disaster/emergency reports up into a municipality -> barangay
//! summary for one province: affected people, outstanding needs, pending vs
//! resolved reports and the most recent update, ranked by people affected.
//!
//! Stages run in one forward pass: [`location`] parses the place name,
//! [`filter`] keeps the target province, [`summary`] accumulates and
//! [`ranking`] orders the result. [`feed`] is the boundary the fetcher and
//! the renderer talk to.
pub mod config;
pub mod error;
pub mod feed;
pub mod filter;
pub mod loader;
pub mod location;
pub mod output;
pub mod ranking;
pub mod summary;
pub mod types;
pub mod util;
