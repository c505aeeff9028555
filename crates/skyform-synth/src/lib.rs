//! Skyform Template Synthesis
//!
//! This crate turns the typed environment configuration from
//! `skyform-config` into CloudFormation templates. Nothing here talks to
//! AWS: the output is a set of declarative template files that an external
//! provisioning engine deploys.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  Skyform CLI                     │
//! │                  (sky synth)                     │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │               skyform-synth                      │
//! │  ┌──────────────┐  ┌──────────────────────────┐ │
//! │  │ App / Stack  │  │  Resource Builders        │ │
//! │  │ (synthesis   │  │  NetworkBuilder (VPC)     │ │
//! │  │  context)    │  │  StorageBuilder (S3)      │ │
//! │  └──────┬───────┘  └──────────┬───────────────┘ │
//! │         │                     │                  │
//! │  ┌──────▼─────────────────────▼───────────────┐ │
//! │  │        Template model (CloudFormation)      │ │
//! │  └────────────────────┬───────────────────────┘ │
//! └───────────────────────┼─────────────────────────┘
//!                         │
//!              <stack>.template.json
//! ```

pub mod cidr;
pub mod error;
pub mod naming;
pub mod network;
pub mod stack;
pub mod storage;
pub mod template;

// Re-exports
pub use cidr::CidrBlock;
pub use error::{Result, SynthError};
pub use naming::logical_id;
pub use network::NetworkBuilder;
pub use stack::{App, DeployEnv, Stack};
pub use storage::StorageBuilder;
pub use template::{Output, Resource, Tag, Template};
