//! Request dispatch.
//!
//! Routes host requests to the pagination engine and renderer, owns the
//! canned responses, and is the only place the paging cursor is moved
//! between the engine and the session.

use std::collections::HashMap;
use std::num::NonZeroUsize;

use tracing::info;

use quotefinder_core::QuoteFinderConfig;

use crate::error::SkillError;
use crate::lookup::{HttpQuoteLookup, QuoteLookup};
use crate::pagination::PaginationEngine;
use crate::response::{RenderContext, RenderedOutput, ResponseRenderer, USAGE_REPROMPT};
use crate::session::{clear_cursor, load_cursor, save_cursor, SessionStore};

pub const FIRST_MOVIE_INTENT: &str = "GetFirstMovieIntent";
pub const NEXT_MOVIE_INTENT: &str = "GetNextMovieIntent";
pub const HELP_INTENT: &str = "AMAZON.HelpIntent";
pub const STOP_INTENT: &str = "AMAZON.StopIntent";
pub const CANCEL_INTENT: &str = "AMAZON.CancelIntent";

/// Slot carrying the user's quote.
pub const SLOT_PHRASE: &str = "phrase";

const SKILL_TITLE: &str = "Find My Quote";
const WELCOME_TEXT: &str = "Find My Quote. What quote do you have in mind?";
const HELP_TEXT: &str = "With Find My Quote, you can get the movie name for your quote.";
const HELP_REPROMPT: &str = "Which phrase do you have?";
const GOODBYE_TEXT: &str = "Goodbye";
const NOT_UNDERSTOOD_TEXT: &str = "I'm sorry, I was not able to understand your quote.";

// =============================================================================
// Requests
// =============================================================================

/// A request from the host, already resolved to an intent and slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillRequest {
    Launch,
    Intent(IntentRequest),
    SessionEnded,
}

/// A named intent with its slot values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntentRequest {
    pub name: String,
    pub slots: HashMap<String, String>,
}

impl IntentRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slots: HashMap::new(),
        }
    }

    pub fn with_slot(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.slots.insert(name.into(), value.into());
        self
    }

    pub fn slot(&self, name: &str) -> Option<&str> {
        self.slots.get(name).map(String::as_str)
    }
}

#[derive(Debug)]
enum Intent<'a> {
    FindQuote(Option<&'a str>),
    NextMovie,
    Help,
    Stop,
}

impl<'a> Intent<'a> {
    fn from_request(request: &'a IntentRequest) -> Result<Self, SkillError> {
        match request.name.as_str() {
            FIRST_MOVIE_INTENT => Ok(Intent::FindQuote(request.slot(SLOT_PHRASE))),
            NEXT_MOVIE_INTENT => Ok(Intent::NextMovie),
            HELP_INTENT => Ok(Intent::Help),
            STOP_INTENT | CANCEL_INTENT => Ok(Intent::Stop),
            other => Err(SkillError::UnknownIntent(other.to_string())),
        }
    }
}

// =============================================================================
// Dispatcher
// =============================================================================

/// Entry point for every host request.
pub struct Dispatcher<L> {
    engine: PaginationEngine<L>,
    renderer: ResponseRenderer,
}

impl Dispatcher<HttpQuoteLookup> {
    /// Wire a dispatcher against the remote lookup service.
    pub fn from_config(config: &QuoteFinderConfig) -> Result<Self, SkillError> {
        let lookup = HttpQuoteLookup::new(&config.lookup)?;
        let page_size = NonZeroUsize::new(config.paging.page_size).ok_or_else(|| {
            SkillError::Config("paging.page_size must be at least 1".to_string())
        })?;
        Ok(Self::new(PaginationEngine::new(lookup, page_size)))
    }
}

impl<L: QuoteLookup> Dispatcher<L> {
    pub fn new(engine: PaginationEngine<L>) -> Self {
        Self {
            engine,
            renderer: ResponseRenderer::new(),
        }
    }

    /// Handle one host request against its session.
    ///
    /// The only error is an intent name the skill does not know.
    pub fn handle<S: SessionStore + ?Sized>(
        &self,
        request: &SkillRequest,
        session: &mut S,
    ) -> Result<RenderedOutput, SkillError> {
        match request {
            SkillRequest::Launch => {
                info!("Launch request");
                Ok(Self::welcome())
            }
            SkillRequest::SessionEnded => {
                info!("Session ended");
                clear_cursor(session);
                Ok(Self::goodbye())
            }
            SkillRequest::Intent(intent) => {
                info!(intent = %intent.name, "Intent request");
                match Intent::from_request(intent)? {
                    Intent::FindQuote(Some(phrase)) if !phrase.trim().is_empty() => {
                        self.start_search(phrase.trim(), session)
                    }
                    Intent::FindQuote(_) => Ok(Self::not_understood()),
                    Intent::NextMovie => self.continue_paging(session),
                    Intent::Help => Ok(Self::help()),
                    Intent::Stop => Ok(Self::goodbye()),
                }
            }
        }
    }

    /// Start a new search, replacing any cursor in the session.
    pub fn start_search<S: SessionStore + ?Sized>(
        &self,
        phrase: &str,
        session: &mut S,
    ) -> Result<RenderedOutput, SkillError> {
        let outcome = self.engine.start_search(phrase);
        save_cursor(session, outcome.cursor.as_ref())?;
        Ok(self
            .renderer
            .render(&outcome.page, &RenderContext::for_search(phrase)))
    }

    /// Emit the next page of the session's current search.
    pub fn continue_paging<S: SessionStore + ?Sized>(
        &self,
        session: &mut S,
    ) -> Result<RenderedOutput, SkillError> {
        let outcome = self.engine.continue_paging(load_cursor(session));
        save_cursor(session, outcome.cursor.as_ref())?;
        Ok(self
            .renderer
            .render(&outcome.page, &RenderContext::continuation()))
    }

    pub fn welcome() -> RenderedOutput {
        RenderedOutput::canned(WELCOME_TEXT, SKILL_TITLE, USAGE_REPROMPT, false)
    }

    pub fn help() -> RenderedOutput {
        RenderedOutput::canned(HELP_TEXT, SKILL_TITLE, HELP_REPROMPT, false)
    }

    pub fn goodbye() -> RenderedOutput {
        RenderedOutput::canned(GOODBYE_TEXT, SKILL_TITLE, "", true)
    }

    fn not_understood() -> RenderedOutput {
        RenderedOutput::canned(NOT_UNDERSTOOD_TEXT, SKILL_TITLE, USAGE_REPROMPT, true)
    }
}

// =============================================================================
// Tests
// =============================================================================
