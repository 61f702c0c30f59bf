//! Kadena chainweb client
//!
//! Builds Pact commands, signs them and submits them to one or more chains
//! of a chainweb network.
//!
//! # Main Components
//!
//! - **Command Types**: payload, signer, metadata and command types, plus the
//!   per-chain [`CommandBuilder`]
//! - **Envelopes**: the signed `{hash, sigs, cmd}` wire form
//! - **Client**: [`KadenaClient`] with `send`, `local`, `listen`,
//!   `run_pact` and `send_and_listen`
//! - **Transport**: the [`Transport`] seam and its `reqwest` implementation
//!
//! ```no_run
//! # async fn demo() -> kadena_client::ClientResult<()> {
//! use kadena_client::{ClientConfig, EnvData, KadenaClient};
//!
//! let client = KadenaClient::connect(ClientConfig::default()).await?;
//! let greeting = client
//!     .run_pact(r#"(format "Test {}" ["hello"])"#, EnvData::new(), "0")
//!     .await?;
//! assert_eq!(greeting, "Test hello");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod command;
pub mod config;
pub mod envelope;
pub mod error;
pub mod transport;
pub mod types;

pub use client::{
    first_request_key, local_result_data, ChainResults, KadenaClient, DEFAULT_CHAIN_ID,
};
pub use command::{
    next_nonce, Capability, ChainCommands, Command, CommandBuilder, ContMessage, EnvData,
    ExecMessage, Meta, Payload, Signer, CLOCK_SKEW_SECS,
};
pub use config::{ClientConfig, CommandOptions, KeyPairConfig};
pub use envelope::{SigEntry, SignedEnvelope};
pub use error::{ClientError, ClientResult};
pub use transport::{HttpTransport, Transport};
pub use types::{Endpoint, ListenRequest, NodeConfig, PactResult, SendRequest, SendResponse};

pub use kadena_crypto::{CryptoError, KeyPair, PactHash};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::client::*;
    pub use crate::command::*;
    pub use crate::config::*;
    pub use crate::envelope::*;
    pub use crate::error::*;
    pub use crate::transport::*;
}
