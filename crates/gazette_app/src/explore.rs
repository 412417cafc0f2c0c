use std::io::{self, BufRead, Write};

use gazette_core::Msg;

use crate::app::App;
use crate::render;

pub const HELP: &str = "\
Commands:
  search <text>    filter articles by text (no text clears the search)
  keyword <k>      toggle the keyword filter (no keyword clears it)
  modal <k>        list every article tagged <k>
  close            close the keyword list
  article <id>     show one article in full
  back             close the article
  reset            drop this result and exit
  help             show this list
  quit             exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Keyword(String),
    Modal(String),
    Close,
    Article(String),
    Back,
    Reset,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command `{0}`, type `help` for the list")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
}

/// Parses one prompt line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let required = |name: &'static str| {
        if rest.is_empty() {
            Err(ParseError::MissingArgument(name))
        } else {
            Ok(rest.to_string())
        }
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "search" | "s" => Command::Search(rest.to_string()),
        "keyword" | "k" => Command::Keyword(rest.to_string()),
        "modal" | "m" => Command::Modal(required("modal")?),
        "close" => Command::Close,
        "article" | "a" => Command::Article(required("article")?),
        "back" => Command::Back,
        "reset" => Command::Reset,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => return Err(ParseError::Unknown(word.to_string())),
    };
    Ok(Some(command))
}

impl Command {
    fn into_msg(self) -> Option<Msg> {
        match self {
            Command::Search(query) => Some(Msg::SearchChanged(query)),
            Command::Keyword(keyword) => Some(Msg::KeywordToggled(keyword)),
            Command::Modal(keyword) => Some(Msg::KeywordModalOpened(keyword)),
            Command::Close => Some(Msg::KeywordModalClosed),
            Command::Article(article_id) => Some(Msg::ArticleOpened(article_id)),
            Command::Back => Some(Msg::ArticleClosed),
            Command::Reset => Some(Msg::ResetClicked),
            Command::Help | Command::Quit => None,
        }
    }
}

/// Interactive exploration of a loaded result. Returns when the input ends or
/// the user quits or resets.
pub fn run(app: &mut App, input: impl BufRead, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{HELP}")?;
    write!(out, "> ")?;
    out.flush()?;

    for line in input.lines() {
        match parse(&line?) {
            Ok(None) => {}
            Ok(Some(Command::Help)) => writeln!(out, "{HELP}")?,
            Ok(Some(Command::Quit)) => return Ok(()),
            Ok(Some(Command::Reset)) => {
                app.dispatch(Msg::ResetClicked);
                writeln!(out, "Result dropped.")?;
                return Ok(());
            }
            Ok(Some(command)) => {
                let changed = command.into_msg().and_then(|msg| app.dispatch(msg));
                match changed.as_ref().and_then(|view| view.exploration.as_ref()) {
                    Some(view) => writeln!(out, "{}", render::exploration(view))?,
                    None => writeln!(out, "Nothing changed.")?,
                }
            }
            Err(err) => writeln!(out, "{err}")?,
        }
        write!(out, "> ")?;
        out.flush()?;
    }
    Ok(())
}
