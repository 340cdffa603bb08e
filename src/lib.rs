pub mod chat;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod history;
pub mod models;
pub mod modes;
pub mod protocol;
pub mod render;
pub mod schema;
pub mod service;
pub mod session;
pub mod storage;
pub mod transport;

pub use crate::config::Config;
pub use crate::error::{DeepSiloError, Result};
pub use crate::models::{ChatTurn, HistoryEntry, ModeResult};
pub use crate::modes::ResearchMode;
pub use crate::service::DeepSilo;
pub use crate::session::{Page, Screen};
