//! chaincall-providers — hosted gateway transports.
//!
//! A gateway transport is an HTTP transport that knows the provider's URL
//! template and how to attach its credentials.
//!
//! # Quick start
//! ```rust,no_run
//! use chaincall_core::Client;
//! use chaincall_providers::infura::{InfuraCredentials, InfuraTransport};
//!
//! let creds = InfuraCredentials::new("YOUR_PROJECT_ID");
//! let client = Client::new(InfuraTransport::new(creds, 1).unwrap()); // Ethereum mainnet
//! ```

pub mod infura;

pub use infura::{is_gateway_url, InfuraCredentials, InfuraTransport};
