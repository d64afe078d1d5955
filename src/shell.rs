// Interactive shell: one command per line against a session

use crate::filter::Filter;
use crate::present::{Notifier, Renderer};
use crate::session::{Selector, Session};
use crate::storage::SlotStorage;
use crate::store::EditOutcome;
use crate::task::TaskId;
use eyre::{Context, Result, eyre};
use std::io::{BufRead, Write};
use tracing::{debug, warn};

pub const HELP: &str = "\
Commands:
  add <text>          add a task
  done <n>            toggle task n complete
  edit <n> <text>     replace the text of task n (blank text deletes it)
  rm <n>              delete task n
  clear               remove completed tasks
  filter <view>       show all, active or completed tasks
  list                show the current view
  sample              add sample tasks
  theme               switch between light and dark
  save                retry saving after an error
  help                show this help
  quit                leave the shell
Tasks are numbered as in the current view; use id:<ID> to address one by id.
";

/// A parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Add(String),
    Toggle(Selector),
    Edit(Selector, String),
    Delete(Selector),
    Clear,
    Filter(Filter),
    List,
    Sample,
    Theme,
    Save,
    Help,
    Quit,
    Empty,
}

impl ShellCommand {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "" => ShellCommand::Empty,
            // Blank text is passed through so the store can reject it
            "add" | "a" => ShellCommand::Add(rest.to_string()),
            "done" | "toggle" | "x" => ShellCommand::Toggle(parse_selector(rest)?),
            "edit" | "e" => {
                let (target, text) = match rest.split_once(char::is_whitespace) {
                    Some((target, text)) => (target, text),
                    None => (rest, ""),
                };
                ShellCommand::Edit(parse_selector(target)?, text.to_string())
            }
            "rm" | "delete" | "del" => ShellCommand::Delete(parse_selector(rest)?),
            "clear" => ShellCommand::Clear,
            "filter" | "f" => ShellCommand::Filter(rest.parse::<Filter>().map_err(|e| eyre!(e))?),
            "list" | "ls" => ShellCommand::List,
            "sample" => ShellCommand::Sample,
            "theme" => ShellCommand::Theme,
            "save" => ShellCommand::Save,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" | "q" => ShellCommand::Quit,
            other => return Err(eyre!("Unknown command: {} (type `help`)", other)),
        };

        Ok(command)
    }
}

/// Parse `3` as a position or `id:<ID>` as an id
pub fn parse_selector(text: &str) -> Result<Selector> {
    let text = text.trim();
    if let Some(id) = text.strip_prefix("id:") {
        if id.trim().is_empty() {
            return Err(eyre!("Missing task id after `id:`"));
        }
        let Ok(id) = id.parse::<TaskId>();
        return Ok(Selector::Id(id));
    }
    if text.is_empty() {
        return Err(eyre!("Missing task number"));
    }
    let position = text
        .parse::<usize>()
        .with_context(|| format!("Invalid task number: {}", text))?;
    Ok(Selector::Position(position))
}

/// Read commands from `input` until `quit` or end of input
///
/// Prompts, help and parse errors go to `out`; everything else goes through
/// the session's presenter.
pub fn run<S, P, R, W>(session: &mut Session<S, P>, input: R, mut out: W) -> Result<()>
where
    S: SlotStorage,
    P: Renderer + Notifier,
    R: BufRead,
    W: Write,
{
    session.render();
    write!(out, "> ")?;
    out.flush()?;

    for line in input.lines() {
        let line = line.context("Failed to read command")?;

        match ShellCommand::parse(&line) {
            Ok(ShellCommand::Quit) => break,
            Ok(command) => {
                debug!(?command, "Shell command");
                execute(session, command, &mut out)?;
            }
            Err(e) => writeln!(out, "{}", e)?,
        }

        write!(out, "> ")?;
        out.flush()?;
    }
    writeln!(out)?;

    if session.store().is_dirty() && session.flush().is_err() {
        warn!("Leaving shell with unsaved changes");
    }
    Ok(())
}

fn execute<S, P, W>(session: &mut Session<S, P>, command: ShellCommand, out: &mut W) -> Result<()>
where
    S: SlotStorage,
    P: Renderer + Notifier,
    W: Write,
{
    // Session errors were already shown by the presenter
    match command {
        ShellCommand::Add(text) => {
            let _ = session.add(&text);
        }
        ShellCommand::Toggle(selector) => {
            if let Ok(None) = session.toggle(&selector) {
                writeln!(out, "No such task")?;
            }
        }
        ShellCommand::Edit(selector, text) => {
            if let Ok(EditOutcome::NotFound) = session.edit(&selector, &text) {
                writeln!(out, "No such task")?;
            }
        }
        ShellCommand::Delete(selector) => {
            if let Ok(false) = session.delete(&selector) {
                writeln!(out, "No such task")?;
            }
        }
        ShellCommand::Clear => {
            let _ = session.clear_completed();
        }
        ShellCommand::Filter(filter) => session.set_filter(filter),
        ShellCommand::List => session.render(),
        ShellCommand::Sample => {
            let _ = session.add_samples();
        }
        ShellCommand::Theme => session.toggle_theme(),
        ShellCommand::Save => {
            let _ = session.flush();
        }
        ShellCommand::Help => write!(out, "{}", HELP)?,
        ShellCommand::Quit | ShellCommand::Empty => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::present::RecordingPresenter;
    use crate::storage::MemoryStorage;
    use crate::store::TaskStore;

    fn session() -> Session<MemoryStorage, RecordingPresenter> {
        Session::new(TaskStore::open(MemoryStorage::new()).unwrap(), RecordingPresenter::new())
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            ShellCommand::parse("add  Buy milk ").unwrap(),
            ShellCommand::Add("Buy milk".to_string())
        );
        assert_eq!(ShellCommand::parse("add").unwrap(), ShellCommand::Add(String::new()));
        assert_eq!(
            ShellCommand::parse("done 2").unwrap(),
            ShellCommand::Toggle(Selector::Position(2))
        );
        assert_eq!(
            ShellCommand::parse("edit 1 New text").unwrap(),
            ShellCommand::Edit(Selector::Position(1), "New text".to_string())
        );
        assert_eq!(
            ShellCommand::parse("edit 1").unwrap(),
            ShellCommand::Edit(Selector::Position(1), String::new())
        );
        assert_eq!(
            ShellCommand::parse("rm id:42").unwrap(),
            ShellCommand::Delete(Selector::Id(TaskId::Number(42)))
        );
        assert_eq!(
            ShellCommand::parse("filter completed").unwrap(),
            ShellCommand::Filter(Filter::Completed)
        );
        assert_eq!(ShellCommand::parse("   ").unwrap(), ShellCommand::Empty);
        assert_eq!(ShellCommand::parse("QUIT").unwrap(), ShellCommand::Quit);
    }

    #[test]
    fn test_parse_errors() {
        assert!(ShellCommand::parse("fly away").is_err());
        assert!(ShellCommand::parse("done").is_err());
        assert!(ShellCommand::parse("done two").is_err());
        assert!(ShellCommand::parse("rm id:").is_err());
        assert!(ShellCommand::parse("filter pending").is_err());
    }

    #[test]
    fn test_run_script() {
        let mut session = session();
        let script = "add A\nadd B\ndone 2\nfilter active\nedit 1 B2\nbogus\nfilter all\nquit\nadd never\n";
        let mut out = Vec::new();

        run(&mut session, script.as_bytes(), &mut out).unwrap();

        let texts: Vec<&str> = session.store().tasks().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["B2", "A"]);
        assert!(session.store().tasks()[1].completed);
        assert_eq!(session.filter(), Filter::All);

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Unknown command: bogus"));
    }

    #[test]
    fn test_run_reports_missing_task() {
        let mut session = session();
        let mut out = Vec::new();

        run(&mut session, "rm 3\n".as_bytes(), &mut out).unwrap();

        assert!(String::from_utf8(out).unwrap().contains("No such task"));
    }

    #[test]
    fn test_run_help() {
        let mut session = session();
        let mut out = Vec::new();

        run(&mut session, "help\n".as_bytes(), &mut out).unwrap();

        assert!(String::from_utf8(out).unwrap().contains("filter <view>"));
    }
}
