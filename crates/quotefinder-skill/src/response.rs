//! Response rendering for quote pages.
//!
//! Every page is rendered twice from the same segments: once as a speech
//! markup script and once as plain card text. Only the markup differs.

use quotefinder_core::{Page, PagedItem};

/// Asked after a page when more matches remain.
pub const CONTINUATION_QUESTION: &str =
    "There are more movies with a similar quote. Would you like to get another movie?";
/// Spoken when a search found nothing (or the lookup failed).
pub const NO_RESULTS_TEXT: &str = "I could not find a movie for your quote. Sorry.";
/// Spoken when "next" arrives before any search.
pub const NO_ACTIVE_SEARCH_TEXT: &str =
    "You haven't given me a quote yet. Say a movie quote, for example, 'No, I am your father'.";
/// Spoken when every match has already been read out.
pub const ALL_CONSUMED_TEXT: &str = "There are no more matching movies for this quote.";
/// Reprompt while more matches remain.
pub const MORE_REPROMPT: &str = "Would you like to hear another movie for this quote?";
/// Reprompt explaining how to use the skill.
pub const USAGE_REPROMPT: &str = "With Find My Quote, you can get movie information for any quote you say. For example, you could say 'No, I am your father'.";
/// Card title for continuation pages.
pub const CONTINUATION_TITLE: &str = "Other movies with similar quotes";

const FIRST_ITEM_PREFIX: &str = "The quote is possibly";
const NEXT_ITEM_PREFIX: &str = "Another matching quote is";

// =============================================================================
// Types
// =============================================================================

/// Output encoding for one rendering pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Speech markup: `<speak>` root, one `<p>` per segment, escaped text.
    Speech,
    /// Plain card text.
    Plain,
}

/// Request-level facts the renderer needs besides the page.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    /// The phrase of the search that produced position 0, if this request
    /// started that search.
    pub phrase: Option<String>,
}

impl RenderContext {
    pub fn for_search(phrase: &str) -> Self {
        Self {
            phrase: Some(phrase.to_string()),
        }
    }

    pub fn continuation() -> Self {
        Self::default()
    }
}

/// Both encodings of a response plus its card title and reprompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedOutput {
    /// Speech markup, always wrapped in `<speak>`.
    pub spoken_script: String,
    /// Plain text for the visual card.
    pub visual_summary: String,
    pub card_title: String,
    pub follow_up_prompt: String,
    /// Whether the host should close the conversation after speaking.
    pub ends_session: bool,
}

impl RenderedOutput {
    /// A fixed single-sentence response.
    pub fn canned(text: &str, card_title: &str, follow_up_prompt: &str, ends_session: bool) -> Self {
        let segments = [Segment::body(text)];
        Self {
            spoken_script: format_segments(&segments, None, OutputMode::Speech),
            visual_summary: format_segments(&segments, None, OutputMode::Plain),
            card_title: card_title.to_string(),
            follow_up_prompt: follow_up_prompt.to_string(),
            ends_session,
        }
    }
}

// =============================================================================
// ResponseRenderer
// =============================================================================

/// Renders pages into spoken and visual output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseRenderer;

impl ResponseRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render a page for the current request.
    pub fn render(&self, page: &Page, context: &RenderContext) -> RenderedOutput {
        let card_title = match context.phrase.as_deref() {
            Some(phrase) => format!("Movies for {}", phrase),
            None => CONTINUATION_TITLE.to_string(),
        };

        match page {
            Page::Results { items, has_more } => {
                let segments = self.item_segments(items, context.phrase.as_deref());
                let tail = has_more.then_some(CONTINUATION_QUESTION);
                RenderedOutput {
                    spoken_script: format_segments(&segments, tail, OutputMode::Speech),
                    visual_summary: format_segments(&segments, tail, OutputMode::Plain),
                    card_title,
                    follow_up_prompt: if *has_more {
                        MORE_REPROMPT.to_string()
                    } else {
                        USAGE_REPROMPT.to_string()
                    },
                    ends_session: false,
                }
            }
            Page::NoResults => {
                RenderedOutput::canned(NO_RESULTS_TEXT, &card_title, USAGE_REPROMPT, true)
            }
            Page::NoActiveSearch => {
                RenderedOutput::canned(NO_ACTIVE_SEARCH_TEXT, &card_title, USAGE_REPROMPT, false)
            }
            Page::AllConsumed => {
                RenderedOutput::canned(ALL_CONSUMED_TEXT, &card_title, USAGE_REPROMPT, false)
            }
        }
    }

    /// One segment per item, led by "For <phrase>" when position 0 is present.
    fn item_segments(&self, items: &[PagedItem], phrase: Option<&str>) -> Vec<Segment> {
        let mut segments = Vec::with_capacity(items.len() + 1);
        for paged in items {
            if paged.position == 0 {
                if let Some(phrase) = phrase {
                    segments.push(Segment::lead(format!("For {}", phrase)));
                }
            }
            segments.push(Segment::body(item_text(paged)));
        }
        segments
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// A unit of response text.
///
/// A lead segment introduces the one after it: speech gives it its own
/// paragraph, card text runs it into the next segment after a comma.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Segment {
    text: String,
    lead: bool,
}

impl Segment {
    fn lead(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            lead: true,
        }
    }

    fn body(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            lead: false,
        }
    }
}

/// `"<prefix>, <quote>, from the movie <title>, which came out in <year>"`.
pub fn item_text(paged: &PagedItem) -> String {
    let prefix = if paged.position == 0 {
        FIRST_ITEM_PREFIX
    } else {
        NEXT_ITEM_PREFIX
    };
    format!(
        "{}, {}, from the movie {}, which came out in {}",
        prefix, paged.item.quote, paged.item.title, paged.item.year
    )
}

/// Join segments (and an optional trailing question) in one output mode.
fn format_segments(segments: &[Segment], tail: Option<&str>, mode: OutputMode) -> String {
    match mode {
        OutputMode::Speech => {
            let mut out = String::from("<speak>");
            for segment in segments {
                out.push_str("<p>");
                out.push_str(&escape_markup(&segment.text));
                out.push_str("</p>");
            }
            if let Some(tail) = tail {
                out.push_str(&escape_markup(tail));
            }
            out.push_str("</speak>");
            out
        }
        OutputMode::Plain => {
            let mut out = String::new();
            let mut after_lead = false;
            for (i, segment) in segments.iter().enumerate() {
                if i > 0 {
                    out.push_str(if after_lead { ", " } else { "\n" });
                }
                out.push_str(&segment.text);
                after_lead = segment.lead;
            }
            if let Some(tail) = tail {
                if !out.is_empty() {
                    out.push('\n');
                }
                out.push_str(tail);
            }
            out
        }
    }
}

fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use quotefinder_core::ResultItem;

    fn paged(position: usize, quote: &str, title: &str, year: i64) -> PagedItem {
        PagedItem {
            position,
            item: ResultItem::new(quote, title, year),
        }
    }

    fn renderer() -> ResponseRenderer {
        ResponseRenderer::new()
    }

    // ---- Item template ----

    #[test]
    fn test_first_item_text() {
        let text = item_text(&paged(0, "Here's Johnny", "The Shining", 1980));
        assert_eq!(
            text,
            "The quote is possibly, Here's Johnny, from the movie The Shining, which came out in 1980"
        );
    }

    #[test]
    fn test_later_item_text() {
        let text = item_text(&paged(3, "Here's Johnny", "The Shining", 1980));
        assert!(text.starts_with("Another matching quote is, Here's Johnny"));
    }

    // ---- Results pages ----

    #[test]
    fn test_fresh_search_page() {
        let page = Page::Results {
            items: vec![paged(0, "Show me the money", "Jerry Maguire", 1996)],
            has_more: true,
        };
        let out = renderer().render(&page, &RenderContext::for_search("show me the money"));

        assert_eq!(
            out.spoken_script,
            "<speak><p>For show me the money</p><p>The quote is possibly, Show me the money, \
             from the movie Jerry Maguire, which came out in 1996</p>There are more movies \
             with a similar quote. Would you like to get another movie?</speak>"
        );
        assert_eq!(
            out.visual_summary,
            "For show me the money, The quote is possibly, Show me the money, from the movie \
             Jerry Maguire, which came out in 1996\nThere are more movies with a similar quote. \
             Would you like to get another movie?"
        );
        assert_eq!(out.card_title, "Movies for show me the money");
        assert_eq!(out.follow_up_prompt, MORE_REPROMPT);
        assert!(!out.ends_session);
    }

    #[test]
    fn test_last_page_omits_continuation_question() {
        let page = Page::Results {
            items: vec![paged(2, "q", "t", 2000)],
            has_more: false,
        };
        let out = renderer().render(&page, &RenderContext::continuation());
        assert!(!out.spoken_script.contains(CONTINUATION_QUESTION));
        assert!(!out.visual_summary.contains(CONTINUATION_QUESTION));
        assert_eq!(out.follow_up_prompt, USAGE_REPROMPT);
        assert_eq!(out.card_title, CONTINUATION_TITLE);
    }

    #[test]
    fn test_continuation_page_uses_another_prefix() {
        let page = Page::Results {
            items: vec![paged(1, "q", "t", 2000)],
            has_more: true,
        };
        let out = renderer().render(&page, &RenderContext::continuation());
        assert!(out
            .spoken_script
            .starts_with("<speak><p>Another matching quote is, q"));
        assert!(out.visual_summary.starts_with("Another matching quote is, q"));
        assert!(!out.visual_summary.contains("For "));
    }

    #[test]
    fn test_multi_item_page_prefixes_by_position() {
        let page = Page::Results {
            items: vec![paged(0, "a", "A", 2001), paged(1, "b", "B", 2002)],
            has_more: false,
        };
        let out = renderer().render(&page, &RenderContext::for_search("phrase"));
        let lines: Vec<&str> = out.visual_summary.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("For phrase, The quote is possibly, a"));
        assert!(lines[1].starts_with("Another matching quote is, b"));
    }

    #[test]
    fn test_spoken_and_visual_share_content() {
        let page = Page::Results {
            items: vec![paged(0, "a", "A", 2001), paged(1, "b", "B", 2002)],
            has_more: true,
        };
        let out = renderer().render(&page, &RenderContext::for_search("phrase"));
        for text in [item_text(&page.items()[0]), item_text(&page.items()[1])] {
            assert!(out.spoken_script.contains(&text));
            assert!(out.visual_summary.contains(&text));
        }
    }

    #[test]
    fn test_speech_escapes_markup() {
        let page = Page::Results {
            items: vec![paged(0, "Rock & <roll>", "\"Quoted\"", 1999)],
            has_more: false,
        };
        let out = renderer().render(&page, &RenderContext::for_search("it's"));
        assert!(out.spoken_script.contains("For it&apos;s"));
        assert!(out.spoken_script.contains("Rock &amp; &lt;roll&gt;"));
        assert!(out.spoken_script.contains("&quot;Quoted&quot;"));
        // Plain text keeps the raw characters.
        assert!(out.visual_summary.contains("Rock & <roll>"));
    }

    // ---- Fixed pages ----

    #[test]
    fn test_no_results_page() {
        let out = renderer().render(&Page::NoResults, &RenderContext::for_search("zzz"));
        assert_eq!(
            out.spoken_script,
            "<speak><p>I could not find a movie for your quote. Sorry.</p></speak>"
        );
        assert_eq!(out.visual_summary, NO_RESULTS_TEXT);
        assert!(!out.spoken_script.contains(CONTINUATION_QUESTION));
        assert!(out.ends_session);
    }

    #[test]
    fn test_no_active_search_page() {
        let out = renderer().render(&Page::NoActiveSearch, &RenderContext::continuation());
        assert_eq!(out.visual_summary, NO_ACTIVE_SEARCH_TEXT);
        assert!(out.spoken_script.starts_with("<speak>"));
        assert!(out.spoken_script.ends_with("</speak>"));
        assert!(!out.ends_session);
    }

    #[test]
    fn test_all_consumed_page() {
        let out = renderer().render(&Page::AllConsumed, &RenderContext::continuation());
        assert_eq!(out.visual_summary, ALL_CONSUMED_TEXT);
        assert_eq!(out.card_title, CONTINUATION_TITLE);
    }

    // ---- format_segments ----

    #[test]
    fn test_format_segments_modes() {
        let segments = vec![Segment::body("one"), Segment::body("two")];
        assert_eq!(
            format_segments(&segments, Some("more?"), OutputMode::Speech),
            "<speak><p>one</p><p>two</p>more?</speak>"
        );
        assert_eq!(
            format_segments(&segments, None, OutputMode::Plain),
            "one\ntwo"
        );
    }

    #[test]
    fn test_lead_segment_runs_into_next_on_card() {
        let segments = vec![
            Segment::lead("For phrase"),
            Segment::body("first"),
            Segment::body("second"),
        ];
        assert_eq!(
            format_segments(&segments, Some("more?"), OutputMode::Plain),
            "For phrase, first\nsecond\nmore?"
        );
        assert_eq!(
            format_segments(&segments, None, OutputMode::Speech),
            "<speak><p>For phrase</p><p>first</p><p>second</p></speak>"
        );
    }

    #[test]
    fn test_fresh_search_card_starts_with_phrase_and_comma() {
        let page = Page::Results {
            items: vec![paged(0, "q", "T", 2000)],
            has_more: false,
        };
        let out = renderer().render(&page, &RenderContext::for_search("phrase"));
        assert_eq!(
            out.visual_summary,
            "For phrase, The quote is possibly, q, from the movie T, which came out in 2000"
        );
        assert!(out.spoken_script.starts_with("<speak><p>For phrase</p><p>The quote"));
    }

    #[test]
    fn test_format_segments_empty_is_still_wrapped() {
        assert_eq!(format_segments(&[], None, OutputMode::Speech), "<speak></speak>");
    }
}
