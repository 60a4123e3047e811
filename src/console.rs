//! Interactive line console over one open screen at a time.

use std::io::Write;
use std::str::FromStr;

use bolnica_core::{AdminError, RecordId, Removal, ScreenKind, ScreenOps, Session, Submitted};

pub const HELP: &str = "\
open <screen>          open bolnice, dijagnoze, odeljenja or pacijenti
list                   show the filtered list
filter [text]          filter the list (no text clears the filter)
reload                 fetch the list again
edit <id>              load a record into the form
set <field> [value]    change a form field
form                   show the form
submit                 create or update from the form
cancel                 clear the form and stop editing
delete <id>            delete a record after confirmation
options                show choices for reference fields
help                   show this text
quit                   leave the console";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Open(ScreenKind),
    List,
    Filter(String),
    Reload,
    Edit(RecordId),
    Set { field: String, value: String },
    Form,
    Submit,
    Cancel,
    Delete(RecordId),
    Options,
    Help,
    Quit,
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command `{0}`, type `help` for a list")]
    Unknown(String),
    #[error("`{command}` needs {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },
    #[error("invalid id `{0}`")]
    InvalidId(String),
    #[error("unknown screen `{0}`")]
    UnknownScreen(String),
}

fn parse_id(raw: &str, command: &'static str) -> Result<RecordId, CommandError> {
    if raw.is_empty() {
        return Err(CommandError::MissingArgument {
            command,
            what: "a record id",
        });
    }
    raw.parse()
        .map_err(|_| CommandError::InvalidId(raw.to_string()))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "open" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "open",
                        what: "a screen name",
                    });
                }
                rest.parse::<ScreenKind>()
                    .map(Command::Open)
                    .map_err(|_| CommandError::UnknownScreen(rest.to_string()))
            }
            "list" | "ls" => Ok(Command::List),
            "filter" => Ok(Command::Filter(rest.to_string())),
            "reload" => Ok(Command::Reload),
            "edit" => parse_id(rest, "edit").map(Command::Edit),
            "set" => {
                let (field, value) = match rest.split_once(char::is_whitespace) {
                    Some((field, value)) => (field, value.trim()),
                    None => (rest, ""),
                };
                if field.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "set",
                        what: "a field name",
                    });
                }
                Ok(Command::Set {
                    field: field.to_string(),
                    value: value.to_string(),
                })
            }
            "form" => Ok(Command::Form),
            "submit" | "save" => Ok(Command::Submit),
            "cancel" => Ok(Command::Cancel),
            "delete" | "rm" => parse_id(rest, "delete").map(Command::Delete),
            "options" => Ok(Command::Options),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Runs commands against the screen opened last.
pub struct Console<W: Write> {
    session: Session,
    screen: Option<Box<dyn ScreenOps>>,
    out: W,
}

fn active(screen: &mut Option<Box<dyn ScreenOps>>) -> anyhow::Result<&mut Box<dyn ScreenOps>> {
    screen
        .as_mut()
        .ok_or_else(|| anyhow::anyhow!("no screen open, use `open <screen>` first"))
}

fn write_rows(out: &mut impl Write, screen: &dyn ScreenOps) -> std::io::Result<()> {
    let filter = screen.filter_text();
    if !filter.trim().is_empty() {
        writeln!(out, "{} matching \"{}\":", screen.kind().title(), filter)?;
    } else {
        writeln!(out, "{}:", screen.kind().title())?;
    }

    let rows = screen.rows();
    if rows.is_empty() {
        writeln!(out, "  (no records)")?;
    }
    for row in rows {
        writeln!(out, "  {row}")?;
    }
    Ok(())
}

impl<W: Write> Console<W> {
    pub fn new(session: Session, out: W) -> Self {
        Self {
            session,
            screen: None,
            out,
        }
    }

    #[cfg(test)]
    pub fn out(&self) -> &W {
        &self.out
    }

    pub async fn execute(&mut self, command: Command) -> anyhow::Result<Flow> {
        match command {
            Command::Open(kind) => {
                let screen = self.session.open(kind).await;
                match screen.settled().await {
                    Ok(()) => write_rows(&mut self.out, &*screen)?,
                    Err(err) => writeln!(self.out, "!! {err}")?,
                }
                self.screen = Some(screen);
            }
            Command::List => {
                let screen = active(&mut self.screen)?;
                write_rows(&mut self.out, &**screen)?;
            }
            Command::Filter(text) => {
                let screen = active(&mut self.screen)?;
                screen.set_filter(&text);
                write_rows(&mut self.out, &**screen)?;
            }
            Command::Reload => {
                let screen = active(&mut self.screen)?;
                screen.reload();
                screen.settled().await?;
                write_rows(&mut self.out, &**screen)?;
            }
            Command::Edit(id) => {
                let screen = active(&mut self.screen)?;
                screen.begin_edit(id)?;
                writeln!(self.out, "{}", screen.form_summary())?;
            }
            Command::Set { field, value } => {
                let screen = active(&mut self.screen)?;
                screen.assign(&field, &value)?;
                writeln!(self.out, "{}", screen.form_summary())?;
            }
            Command::Form => {
                let screen = active(&mut self.screen)?;
                writeln!(self.out, "fields: {}", screen.fields().join(", "))?;
                writeln!(self.out, "{}", screen.form_summary())?;
            }
            Command::Submit => {
                let screen = active(&mut self.screen)?;
                match screen.submit().await {
                    Ok(Submitted::Created) => writeln!(self.out, "created {}", screen.kind())?,
                    Ok(Submitted::Updated(id)) => {
                        writeln!(self.out, "updated {} #{id}", screen.kind())?
                    }
                    Err(AdminError::Validation(_)) => {
                        writeln!(self.out, "{}", screen.form_summary())?;
                        return Ok(Flow::Continue);
                    }
                    Err(err) => return Err(err.into()),
                }
                screen.settled().await?;
                write_rows(&mut self.out, &**screen)?;
            }
            Command::Cancel => {
                let screen = active(&mut self.screen)?;
                screen.cancel_edit();
                writeln!(self.out, "form cleared")?;
            }
            Command::Delete(id) => {
                let screen = active(&mut self.screen)?;
                match screen.remove(id).await? {
                    Removal::Deleted(id) => {
                        writeln!(self.out, "deleted {} #{id}", screen.kind())?;
                        screen.settled().await?;
                        write_rows(&mut self.out, &**screen)?;
                    }
                    Removal::Declined => writeln!(self.out, "cancelled")?,
                }
            }
            Command::Options => {
                let screen = active(&mut self.screen)?;
                let options = screen.options();
                if options.is_empty() {
                    writeln!(self.out, "{} has no reference fields", screen.kind().title())?;
                }
                for field in options {
                    writeln!(self.out, "{}:", field.field)?;
                    for (id, label) in field.options {
                        writeln!(self.out, "  {id}\t{label}")?;
                    }
                }
            }
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }
}
