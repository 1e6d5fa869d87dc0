//! Configuration management for panefm.
//!
//! The settings snapshot ([`settings::Config`]) is stored as a TOML file and
//! loaded once at startup; the navigator only ever reads it.

pub mod settings;
