use anyhow::{anyhow, bail};
use sirstream::{ParamField, SessionCommand};

pub const HELP: &str = "commands: set <field> <value> | start | stop | reset | status | ping | help | quit
fields: populationSize transmissionRate recoveryRate movementSpeed duration";

/// One line of operator input.
#[derive(Debug, Clone, PartialEq)]
pub enum OperatorCommand {
    Session(SessionCommand),
    Status,
    Ping,
    Help,
    Quit,
    Empty,
}

pub fn parse_command(line: &str) -> anyhow::Result<OperatorCommand> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(OperatorCommand::Empty);
    };
    let command = match verb.to_ascii_lowercase().as_str() {
        "set" => {
            let field = words
                .next()
                .ok_or_else(|| anyhow!("usage: set <field> <value>"))?
                .parse::<ParamField>()?;
            let value = words
                .next()
                .ok_or_else(|| anyhow!("usage: set {field} <value>"))?;
            OperatorCommand::Session(SessionCommand::SetParam {
                field,
                value: value.to_string(),
            })
        }
        "start" => OperatorCommand::Session(SessionCommand::Start),
        "stop" => OperatorCommand::Session(SessionCommand::Stop),
        "reset" => OperatorCommand::Session(SessionCommand::Reset),
        "status" => OperatorCommand::Status,
        "ping" => OperatorCommand::Ping,
        "help" | "?" => OperatorCommand::Help,
        "quit" | "exit" => OperatorCommand::Quit,
        other => bail!("unknown command `{other}` (try `help`)"),
    };
    if let Some(extra) = words.next() {
        bail!("unexpected argument `{extra}`");
    }
    Ok(command)
}
