//! vs-core - Protocol types for Visionary Solutions encoders/decoders
//!
//! The devices accept flat `CMD=START&...&CMD=END` command strings posted to
//! `/cgi-bin/wapi.cgi` and answer with `KEY=VALUE&KEY=VALUE` bodies. This
//! crate holds everything needed to speak that protocol without any I/O:
//! command templates and intent encoding, response decoding and
//! classification, credentials and the shared error type.

pub mod codec;
pub mod command;
pub mod credentials;
pub mod error;
pub mod response;

pub use codec::{classify, decode, Status};
pub use command::{CommandKind, Intent, VideoWallLayout};
pub use credentials::Credentials;
pub use error::{CommandError, CommandResult};
pub use response::{keys, DeviceResponse};
