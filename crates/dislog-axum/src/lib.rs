#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod dispatcher;
mod error;
mod middleware;
mod response;

pub use dispatcher::ErrorDispatcher;
pub use error::{Error, ErrorKind, Result};
pub use middleware::{RecoveryConfig, RouterReportingExt, report_errors};
pub use response::ErrorBody;

pub use dislog_webhook::{ColorMap, ConfigError, DiscordNotifier, ErrorNotifier, NotifyConfig};
