//! Navigation logic for a single pane.
//!
//! [`path::PathValue`] is the normalized location type, [`history`] keeps the
//! back/forward stacks, [`cache`] holds recent listings and [`filter`] shapes
//! entries for display. [`navigator::Navigator`] ties them together into the
//! generation-gated state machine a pane controller talks to.

pub mod cache;
pub mod filter;
pub mod history;
pub mod navigator;
pub mod path;

pub use cache::ListingCache;
pub use history::NavigationHistory;
pub use navigator::{
    NavSnapshot, NavState, Navigator, NavigatorBuilder, NavigatorOptions, Subscription,
};
pub use path::PathValue;
