// Palisade: toxicity moderation decision service.
//
// This is the library root. The decision pipeline is
// validate -> moderation engine -> classifier; web is the HTTP boundary
// around it and output handles terminal display for the CLI.

pub mod classifier;
pub mod config;
pub mod moderation;
pub mod output;
pub mod validate;
pub mod web;
