//! WebSocket client for the avatar host.
//!
//! The controller drives a Live2D model through the host's plugin API:
//! authenticate once (the host prompts the user on screen and issues a
//! session token, which is cached on disk), then push parameter values into
//! the running model. All messages travel inside a shared JSON envelope over
//! a single WebSocket.
//!
//! ```no_run
//! use mstage::{FileTokenStore, StageClient, StageConfig};
//!
//! # async fn demo() -> Result<(), mstage::StageError> {
//! let mut stage = StageClient::connect(StageConfig::new()).await?;
//! stage.authenticate(&FileTokenStore::new("stage_token.txt")).await?;
//! stage
//!     .inject_parameters(&[("PARAM_MOUTH_OPEN_Y".to_string(), 0.4)])
//!     .await?;
//! stage.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod protocol;
pub mod token;

pub mod prelude {
    pub use crate::client::{StageClient, StageConfig};
    pub use crate::error::{StageError, StageErrorKind};
    pub use crate::protocol::{DEFAULT_STAGE_URL, StageParameter};
    pub use crate::token::{FileTokenStore, InMemoryTokenStore, TokenStore};
}

pub use client::{StageClient, StageConfig};
pub use error::{StageError, StageErrorKind};
pub use protocol::{
    AuthenticationRequest, AuthenticationTokenRequest, DEFAULT_STAGE_URL,
    InjectParameterDataRequest, ParameterListData, ParameterValue, RequestEnvelope,
    ResponseEnvelope, STAGE_API_NAME, STAGE_API_VERSION, StageParameter,
};
pub use token::{FileTokenStore, InMemoryTokenStore, TokenStore};
