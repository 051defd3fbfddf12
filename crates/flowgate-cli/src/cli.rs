use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use flowgate_core::constants::DEFAULT_MAX_DECISION_HOPS;
use flowgate_core::{ActorId, EngineConfig, NodeId};
use serde_json::Value;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "flowgate")]
#[command(about = "Validate approval process definitions and simulate jumps through them")]
pub struct Cli {
    #[command(flatten)]
    pub engine: EngineArgs,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct EngineArgs {
    /// Maximum decision nodes traversed by a single jump
    #[arg(long, global = true, env = "FLOWGATE_MAX_DECISION_HOPS", default_value_t = DEFAULT_MAX_DECISION_HOPS)]
    pub max_hops: usize,
    /// Reject jumps whose target is not an outgoing transition of the current node
    #[arg(long, global = true, env = "FLOWGATE_ENFORCE_TRANSITIONS")]
    pub enforce_transitions: bool,
}

impl EngineArgs {
    pub fn config(&self) -> EngineConfig {
        EngineConfig { max_decision_hops: self.max_hops,
                       enforce_transitions: self.enforce_transitions }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load a definition file and report its structure and hash
    Validate {
        #[arg(long, short = 'd')]
        definition: PathBuf,
    },
    /// Start an instance and apply a sequence of jumps
    Simulate {
        #[arg(long, short = 'd')]
        definition: PathBuf,
        /// Jump as `tid:to` or `tid:to@actor` (repeatable, applied in order)
        #[arg(long = "jump", short = 'j', value_parser = parse_jump)]
        jumps: Vec<JumpSpec>,
        /// Default actor for jumps without `@actor`
        #[arg(long, default_value_t = 0)]
        actor: ActorId,
        /// Process data entry `key=value`; the value is parsed as JSON, falling back to a string
        #[arg(long = "data", value_parser = parse_data)]
        data: Vec<(String, Value)>,
        /// Persist through Postgres (DATABASE_URL) instead of memory
        #[arg(long)]
        postgres: bool,
    },
    /// Print the persisted audit records of an instance (requires DATABASE_URL)
    History {
        #[arg(long)]
        instance: Uuid,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JumpSpec {
    pub tid: String,
    pub to: NodeId,
    pub actor: Option<ActorId>,
}

pub fn parse_jump(raw: &str) -> Result<JumpSpec, String> {
    let (tid, rest) = raw.split_once(':')
                         .ok_or_else(|| format!("expected tid:to, got '{raw}'"))?;
    if tid.is_empty() {
        return Err(format!("empty transition id in '{raw}'"));
    }
    let (to, actor) = match rest.split_once('@') {
        Some((to, actor)) => (to, Some(actor.parse::<ActorId>().map_err(|e| format!("actor '{actor}': {e}"))?)),
        None => (rest, None),
    };
    let to = to.parse::<NodeId>().map_err(|e| format!("target '{to}': {e}"))?;
    Ok(JumpSpec { tid: tid.to_string(),
                  to,
                  actor })
}

pub fn parse_data(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw.split_once('=')
                          .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serde_json::json;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn jump_with_and_without_actor() {
        assert_eq!(parse_jump("submit:3").unwrap(),
                   JumpSpec { tid: "submit".into(),
                              to: 3,
                              actor: None });
        assert_eq!(parse_jump("review:6@100").unwrap().actor, Some(100));
        assert!(parse_jump("submit").is_err());
        assert!(parse_jump(":3").is_err());
        assert!(parse_jump("submit:x").is_err());
    }

    #[test]
    fn data_values_parse_as_json_or_string() {
        assert_eq!(parse_data("amount=2500").unwrap(), ("amount".into(), json!(2500)));
        assert_eq!(parse_data("approved=true").unwrap(), ("approved".into(), json!(true)));
        assert_eq!(parse_data("note=needs a second look").unwrap(),
                   ("note".into(), json!("needs a second look")));
        assert!(parse_data("=1").is_err());
    }

    #[test]
    fn simulate_arguments() {
        let cli = Cli::try_parse_from(["flowgate", "simulate", "-d", "p.json", "-j", "open:2", "-j", "submit:3",
                                       "--data", "amount=10", "--max-hops", "4"]).unwrap();
        assert_eq!(cli.engine.config().max_decision_hops, 4);
        match cli.command {
            Commands::Simulate { jumps, data, postgres, .. } => {
                assert_eq!(jumps.len(), 2);
                assert_eq!(data, vec![("amount".to_string(), json!(10))]);
                assert!(!postgres);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
