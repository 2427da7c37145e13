//! # Credential Rotator
//!
//! Admission control for the quota-bound generative API. Each credential
//! keeps a sliding 60 second window of request instants; `acquire` picks
//! the next credential (round-robin from a rotating cursor) whose window
//! count is below the safe limit, a fraction of the provider's hard limit.
//!
//! ```rust
//! use chatbot_core::rotator::{Credential, CredentialRotator, RotatorConfig};
//!
//! # fn example() -> chatbot_core::Result<()> {
//! let rotator = CredentialRotator::with_system_clock(
//!     vec![
//!         Credential::new("credential_1", "key-one"),
//!         Credential::new("credential_2", "key-two"),
//!     ],
//!     RotatorConfig::builder().hard_limit(15).safe_ratio(0.8).build(),
//! )?;
//!
//! let credential = rotator.acquire();
//! println!("Using {}", credential.name);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod pool;
pub mod usage;

pub use config::{RotatorConfig, RotatorConfigBuilder};
pub use pool::{Credential, CredentialRotator, CredentialStats};
pub use usage::UsageWindow;
