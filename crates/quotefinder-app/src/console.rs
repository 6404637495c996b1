//! Line-based conversation host.
//!
//! Maps typed utterances onto the intents a voice front end would resolve.

use std::io::{BufRead, Write};

use uuid::Uuid;

use quotefinder_skill::dispatcher::{
    CANCEL_INTENT, FIRST_MOVIE_INTENT, HELP_INTENT, NEXT_MOVIE_INTENT, SLOT_PHRASE, STOP_INTENT,
};
use quotefinder_skill::{
    IntentRequest, LocalHost, QuoteLookup, RenderedOutput, SkillError, SkillRequest,
};

/// What one typed line asks for.
#[derive(Debug, PartialEq, Eq)]
pub enum Utterance {
    Request(SkillRequest),
    Quit,
    Blank,
}

/// Resolve a typed line to a request.
pub fn interpret(line: &str) -> Utterance {
    let text = line.trim();
    let intent = match text.to_lowercase().as_str() {
        "" => return Utterance::Blank,
        "quit" | "exit" => return Utterance::Quit,
        "more" | "next" | "yes" | "another" | "tell me more" => {
            IntentRequest::new(NEXT_MOVIE_INTENT)
        }
        "help" => IntentRequest::new(HELP_INTENT),
        "stop" | "no" | "goodbye" => IntentRequest::new(STOP_INTENT),
        "cancel" => IntentRequest::new(CANCEL_INTENT),
        _ => IntentRequest::new(FIRST_MOVIE_INTENT).with_slot(SLOT_PHRASE, text),
    };
    Utterance::Request(SkillRequest::Intent(intent))
}

/// Write one response the way a card would show it.
pub fn print_output<W: Write>(out: &mut W, output: &RenderedOutput) -> std::io::Result<()> {
    tracing::debug!(ssml = %output.spoken_script, "Spoken script");
    writeln!(out, "[{}]", output.card_title)?;
    writeln!(out, "{}", output.visual_summary)?;
    writeln!(out)
}

/// Run a conversation until `quit` or end of input.
pub fn run<L, R, W>(host: &LocalHost<L>, input: R, out: &mut W) -> Result<(), SkillError>
where
    L: QuoteLookup,
    R: BufRead,
    W: Write,
{
    let io_err = |e: std::io::Error| SkillError::Session(format!("console I/O: {}", e));

    let (welcome, sid) = host.handle(&SkillRequest::Launch, None)?;
    print_output(out, &welcome).map_err(io_err)?;
    let mut session_id: Option<Uuid> = Some(sid);

    for line in input.lines() {
        let line = line.map_err(io_err)?;
        let request = match interpret(&line) {
            Utterance::Blank => continue,
            Utterance::Quit => break,
            Utterance::Request(request) => request,
        };

        match host.handle(&request, session_id) {
            Ok((output, sid)) => {
                print_output(out, &output).map_err(io_err)?;
                session_id = if output.ends_session { None } else { Some(sid) };
            }
            Err(SkillError::UnknownIntent(name)) => {
                tracing::warn!(intent = %name, "Unrecognized intent");
            }
            Err(e) => return Err(e),
        }
    }

    if let Some(sid) = session_id {
        host.end_session(sid)?;
    }
    Ok(())
}
