//! Find My Quote skill.
//!
//! Looks up movie quotes, pages through the matches one conversational turn
//! at a time, and renders each page as speech markup and card text.

pub mod dispatcher;
pub mod error;
pub mod host;
pub mod lookup;
pub mod pagination;
pub mod parser;
pub mod response;
pub mod session;

pub use dispatcher::{Dispatcher, IntentRequest, SkillRequest};
pub use error::{LookupError, SkillError};
pub use host::LocalHost;
pub use lookup::{escape_phrase, HttpQuoteLookup, QuoteLookup};
pub use pagination::{PageOutcome, PaginationEngine, PAGE_SIZE};
pub use response::{OutputMode, RenderContext, RenderedOutput, ResponseRenderer};
pub use session::{
    load_cursor, save_cursor, ConversationSession, SessionAttributes, SessionManager,
    SessionStore,
};
