//! Engine behind the cyberfolio terminal portfolio.
//!
//! The crate owns everything that has state or rules: the timed boot sequence shown on
//! load, the immutable command registry, the per-visitor session that turns typed lines
//! into history entries, and the security-news producer that reads the proxied CVE feed.
//! Front-ends only draw what this crate hands them.
//!
//! # Layout
//!
//! - **boot**: boot lines, phases and the sequencer that paces them
//! - **commands**: the dispatch table (`Static`, `Clear`, `Async`) and its registry
//! - **content**: render-agnostic panels and the portfolio's static panels
//! - **session**: history, scroll position and `execute`
//! - **interpreter**: single-writer worker that serializes submissions for a session
//! - **news**: feed parsing, the proxy client and the `news` producer
//! - **link_preview**: client for the link-preview proxy and its panel fragment

pub mod boot;
pub mod commands;
pub mod content;
pub mod errors;
pub mod interpreter;
pub mod link_preview;
pub mod news;
pub mod session;

pub use boot::{BootLine, BootPhase, BootSequencer, BootTimings, BOOT_LINES};
pub use commands::{CommandEntry, CommandKind, CommandRegistry, ContentProducer};
pub use content::{Badge, Block, Card, Panel, Tone};
pub use errors::FolioError;
pub use interpreter::{Interpreter, InterpreterHandle, SessionEvent};
pub use link_preview::{LinkPreview, LinkPreviewClient};
pub use news::{NewsItem, NewsProducer, Severity};
pub use session::{HistoryLine, Outcome, Session};
