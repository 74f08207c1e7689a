//! Line commands for the simulator.
//!
//! Each input line maps to one [`Command`]. Most commands become an engine
//! [`Intent`]; the rest drive the loop itself (waiting for async work,
//! printing help, quitting).

use anyhow::{Context, Result, anyhow, bail};
use nanokey_engine::{ActionMode, Intent, Selection, SettingsField};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Intent(Intent),
    /// Type each character of the argument as its own key press.
    Type(String),
    /// Block until the in-flight dispatch finishes.
    Wait,
    /// Run the connection test on the settings draft and wait for it.
    Health,
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  type TEXT                 type TEXT key by key
  space | delete | emoji | paste
  select START END | caret POS
  action reply|rewrite|translate
  wait                      wait for the pending suggestion
  pick N | copy N | dismiss candidate N (0-based)
  lang | lang next | lang pick ID | lang close
  longpress                 open the language picker
  settings open|show|set KEY VALUE|test|save|cancel
  health                    test connection and wait for the result
  show | help | quit";

pub fn parse(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim_start()),
        None => (line, ""),
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "type" => {
            if rest.is_empty() {
                bail!("usage: type TEXT");
            }
            Command::Type(rest.to_string())
        }
        "space" => Command::Intent(Intent::Key(" ".to_string())),
        "delete" | "del" | "backspace" => Command::Intent(Intent::Delete),
        "emoji" => Command::Intent(Intent::Emoji),
        "paste" => Command::Intent(Intent::Paste),
        "select" => {
            let (start, end) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| anyhow!("usage: select START END"))?;
            Command::Intent(Intent::Select(Selection::new(
                position(start)?,
                position(end)?,
            )))
        }
        "caret" => Command::Intent(Intent::Select(Selection::caret(position(rest)?))),
        "action" => Command::Intent(Intent::Action(ActionMode::parse(rest)?)),
        "reply" | "rewrite" | "translate" => Command::Intent(Intent::Action(ActionMode::parse(head)?)),
        "wait" => Command::Wait,
        "pick" => Command::Intent(Intent::SelectCandidate(position(rest)?)),
        "copy" => Command::Intent(Intent::CopyCandidate(position(rest)?)),
        "dismiss" => Command::Intent(Intent::DismissOverlay),
        "lang" => parse_lang(rest)?,
        "longpress" => Command::Intent(Intent::LongPressSpace),
        "settings" => parse_settings(rest)?,
        "health" => Command::Health,
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => bail!("unknown command '{other}' (try 'help')"),
    };
    Ok(Some(command))
}

fn parse_lang(rest: &str) -> Result<Command> {
    let mut words = rest.split_whitespace();
    let intent = match words.next() {
        None | Some("next") => Intent::CycleLanguage,
        Some("pick") => {
            let id = words.next().ok_or_else(|| anyhow!("usage: lang pick ID"))?;
            Intent::PickLanguage(id.to_ascii_lowercase())
        }
        Some("close") => Intent::ClosePicker,
        Some(other) => bail!("unknown lang command '{other}'"),
    };
    Ok(Command::Intent(intent))
}

fn parse_settings(rest: &str) -> Result<Command> {
    let (verb, args) = match rest.split_once(char::is_whitespace) {
        Some((verb, args)) => (verb, args.trim_start()),
        None => (rest, ""),
    };
    let intent = match verb {
        "" | "open" => Intent::OpenSettings,
        "show" => return Ok(Command::Show),
        "set" => {
            let (key, value) = args.split_once(char::is_whitespace).unwrap_or((args, ""));
            if key.is_empty() {
                bail!("usage: settings set KEY VALUE");
            }
            Intent::EditSetting {
                field: SettingsField::parse(key)?,
                value: value.trim().to_string(),
            }
        }
        "test" => Intent::TestConnection,
        "save" => Intent::SaveSettings,
        "cancel" => Intent::CancelSettings,
        other => bail!("unknown settings command '{other}'"),
    };
    Ok(Command::Intent(intent))
}

fn position(raw: &str) -> Result<usize> {
    let raw = raw.trim();
    raw.parse()
        .with_context(|| format!("expected a position, got '{raw}'"))
}
