//! Parses one line of terminal input into a user action.

use watchdesk_core::{InputMode, LiveTarget, MessageId, Msg, Route, ScanId, WatchId};

pub const HELP: &str = "\
Navigation:  home | open <id> | live <id> | timeline <id> | go <path> | reload
URL entry:   url <text> | preview | external | monitor | blocked [reason]
Chat:        mode url|chat | ask <text> | track <message>
Watches:     delete <id> | yes | no | rescan <id> | scan | create | select <scan> | general
Other:       help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Msg),
    /// Re-enter the current route.
    Reload,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command `{0}`; type `help`")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("`{0}` is not a valid id")]
    BadId(String),
    #[error("`{0}` is not a known route")]
    BadRoute(String),
}

/// `Ok(None)` for blank lines.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let msg = match word.to_ascii_lowercase().as_str() {
        "help" | "?" => return Ok(Some(Command::Help)),
        "quit" | "exit" | "q" => return Ok(Some(Command::Quit)),
        "reload" => return Ok(Some(Command::Reload)),
        "home" => Msg::Navigate(Route::Landing),
        "open" => Msg::Navigate(Route::Detail(id_arg("open", rest)?)),
        "live" => Msg::Navigate(Route::Live(LiveTarget::Watch(id_arg("live", rest)?))),
        "timeline" => Msg::Navigate(Route::Timeline(id_arg("timeline", rest)?)),
        "go" => {
            let path = required("go", rest)?;
            Msg::Navigate(Route::parse(path).ok_or_else(|| ParseError::BadRoute(path.to_string()))?)
        }
        // The raw text goes through; validation belongs to the URL input.
        "url" => Msg::UrlInputChanged(rest.to_string()),
        "preview" => Msg::PreviewClicked,
        "external" => Msg::OpenExternalClicked,
        "monitor" => Msg::StartMonitoringClicked,
        "blocked" => Msg::PreviewSurfaceFailed {
            reason: if rest.is_empty() {
                "the page refused to load".to_string()
            } else {
                rest.to_string()
            },
        },
        "mode" => match required("mode", rest)?.to_ascii_lowercase().as_str() {
            "url" => Msg::InputModeSelected(InputMode::Url),
            "chat" => Msg::InputModeSelected(InputMode::Chat),
            other => return Err(ParseError::Unknown(format!("mode {other}"))),
        },
        "ask" => Msg::ChatSubmitted(required("ask", rest)?.to_string()),
        "track" => {
            let raw = required("track", rest)?;
            let id = raw
                .parse::<u64>()
                .map_err(|_| ParseError::BadId(raw.to_string()))?;
            Msg::TrackFoundUrl(MessageId(id))
        }
        "delete" => Msg::DeleteRequested(id_arg("delete", rest)?),
        "yes" | "y" => Msg::DeleteConfirmed,
        "no" | "n" => Msg::DeleteCancelled,
        "rescan" => Msg::RescanRequested(id_arg("rescan", rest)?),
        "scan" => Msg::TriggerScanClicked,
        "create" => Msg::CreateRequested,
        "select" => Msg::EntrySelected(scan_arg(rest)?),
        "general" => Msg::GeneralCallClicked,
        _ => return Err(ParseError::Unknown(word.to_string())),
    };
    Ok(Some(Command::Dispatch(msg)))
}

fn required<'a>(command: &'static str, rest: &'a str) -> Result<&'a str, ParseError> {
    if rest.is_empty() {
        Err(ParseError::MissingArgument(command))
    } else {
        Ok(rest)
    }
}

fn id_arg(command: &'static str, rest: &str) -> Result<WatchId, ParseError> {
    let raw = required(command, rest)?;
    WatchId::parse(raw).ok_or_else(|| ParseError::BadId(raw.to_string()))
}

fn scan_arg(rest: &str) -> Result<ScanId, ParseError> {
    let raw = required("select", rest)?;
    ScanId::parse(raw).ok_or_else(|| ParseError::BadId(raw.to_string()))
}
