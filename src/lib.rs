//! RideAware landing site: contact-form filter, subscriptions and newsletters.

pub mod config;
pub mod error;
pub mod filter;
pub mod mail;
pub mod store;
pub mod web;
