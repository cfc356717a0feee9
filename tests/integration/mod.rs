//! Integration tests for the cluster generation system

mod config_integration;
mod generation_flow;
mod links_flow;
mod store_integration;
mod test_utils;
