//! Interactive session: plain lines are chat messages, `/` lines are
//! session commands.

use crate::bus::summarize;
use crate::session::DemoSession;
use anyhow::Result;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{Instant, interval_at};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Route { route: String },
    /// `value: None` flips the current value.
    Flag { name: String, value: Option<bool> },
    Events,
    Actions,
    /// `target` is an intent name or a 1-based index into `/actions`.
    Act { target: String },
    Prompt,
    State,
    Notices,
    Dismiss { id: String },
    Help,
    Quit,
}

pub fn parse_command(input: &str) -> Option<ReplCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let cmd = parts.next()?.to_lowercase();
    let args = parts.next().unwrap_or("").trim();

    match cmd.as_str() {
        "/route" if !args.is_empty() => Some(ReplCommand::Route {
            route: args.to_string(),
        }),
        "/flag" => {
            let mut words = args.split_whitespace();
            let name = words.next()?.to_string();
            let value = match words.next() {
                None => None,
                Some("on" | "true" | "1") => Some(true),
                Some("off" | "false" | "0") => Some(false),
                Some(_) => return None,
            };
            Some(ReplCommand::Flag { name, value })
        }
        "/events" => Some(ReplCommand::Events),
        "/actions" => Some(ReplCommand::Actions),
        "/act" if !args.is_empty() => Some(ReplCommand::Act {
            target: args.to_string(),
        }),
        "/prompt" => Some(ReplCommand::Prompt),
        "/state" => Some(ReplCommand::State),
        "/notices" => Some(ReplCommand::Notices),
        "/dismiss" if !args.is_empty() => Some(ReplCommand::Dismiss {
            id: args.to_string(),
        }),
        "/help" | "/?" => Some(ReplCommand::Help),
        "/quit" | "/exit" => Some(ReplCommand::Quit),
        _ => None,
    }
}

const HELP: &str = "\
/route <route>          -- Switch scenario (e.g. /pitch, /medicare)
/flag <name> [on|off]   -- Set or flip a feature flag
/events                 -- Show the event feed
/actions                -- List recommended actions
/act <n|intent>         -- Run an action by number or intent
/prompt                 -- Print the compiled system prompt
/state                  -- Print the whitelisted machine state
/notices                -- List notices
/dismiss <id>           -- Dismiss a notice
/help                   -- Show this help message
/quit                   -- Leave the session";

/// Drive `session` from stdin until `/quit` or end of input. Bus events are
/// echoed as feed lines; `heartbeat` emits a `tick` on that period.
pub async fn run(mut session: DemoSession, heartbeat: Option<Duration>) -> Result<()> {
    let mut feed = session.bus().watch();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let period = heartbeat.unwrap_or(Duration::from_secs(3600));
    let start = Instant::now().checked_add(period).unwrap_or_else(Instant::now);
    let mut ticker = interval_at(start, period);

    println!(
        "Session {} on {} (type /help for commands)",
        session.id(),
        session.machine().route
    );
    print_notices(&session);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if !handle_line(&mut session, line).await? {
                    break;
                }
            }
            event = feed.recv() => match event {
                Ok(event) => println!("  · [{}] {}", event.kind, summarize(&event)),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "repl.feed_lagged"),
                Err(RecvError::Closed) => break,
            },
            _ = ticker.tick(), if heartbeat.is_some() => {
                let _ = session.heartbeat();
            }
        }
    }
    Ok(())
}

/// Returns `false` when the session should end.
async fn handle_line(session: &mut DemoSession, line: &str) -> Result<bool> {
    let Some(command) = parse_command(line) else {
        if line.starts_with('/') {
            println!("Unknown command: {line} (try /help)");
        } else {
            let reply = session.send_message(line).await?;
            println!("assistant> {}", reply.text);
            print_notices(session);
        }
        return Ok(true);
    };

    match command {
        ReplCommand::Route { route } => {
            let _ = session.change_route(&route);
            println!("Now on {}", session.machine().route);
            print_notices(session);
        }
        ReplCommand::Flag { name, value } => {
            let value = value.unwrap_or_else(|| {
                !session
                    .machine()
                    .feature_flags
                    .get(&name)
                    .copied()
                    .unwrap_or(false)
            });
            let _ = session.toggle_feature_flag(&name, value);
            print_notices(session);
        }
        ReplCommand::Events => {
            for event in session.bus().events() {
                println!("{}  {:<18} {}", event.timestamp, event.kind, summarize(&event));
            }
        }
        ReplCommand::Actions => {
            for (i, action) in session.actions().iter().enumerate() {
                let marker = match (action.primary, action.disabled) {
                    (_, true) => " (disabled)",
                    (true, false) => " *",
                    (false, false) => "",
                };
                println!("{}. {}{} -- {}", i + 1, action.label, marker, action.description);
            }
        }
        ReplCommand::Act { target } => match resolve_action(session, &target) {
            Ok(intent) => {
                let reply = session.run_action(&intent).await?;
                println!("assistant> {}", reply.text);
            }
            Err(e) => println!("{e}"),
        },
        ReplCommand::Prompt => println!("{}", session.system_prompt()),
        ReplCommand::State => {
            println!("{}", serde_json::to_string_pretty(&session.whitelisted_state())?);
        }
        ReplCommand::Notices => print_notices(session),
        ReplCommand::Dismiss { id } => match session.dismiss_notice(&id) {
            Ok(notice) => println!("Dismissed: {}", notice.title),
            Err(e) => println!("{e}"),
        },
        ReplCommand::Help => println!("{HELP}"),
        ReplCommand::Quit => return Ok(false),
    }
    Ok(true)
}

/// A number picks from the visible actions; anything else is an intent.
fn resolve_action(session: &DemoSession, target: &str) -> Result<String> {
    let Ok(index) = target.parse::<usize>() else {
        return Ok(target.to_string());
    };
    let actions = session.actions();
    let action = index
        .checked_sub(1)
        .and_then(|i| actions.get(i))
        .ok_or_else(|| anyhow::anyhow!("No action #{index} (see /actions)"))?;
    if action.disabled {
        anyhow::bail!("Action '{}' is disabled: tool budget exhausted", action.label);
    }
    Ok(action.intent.clone())
}

fn print_notices(session: &DemoSession) {
    for notice in session.notices() {
        println!(
            "! [{}/{}] {}: {} (id {})",
            notice.layer, notice.kind, notice.title, notice.message, notice.id
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_not_a_command() {
        assert_eq!(parse_command("hello there"), None);
    }

    #[test]
    fn route_requires_argument() {
        assert_eq!(parse_command("/route"), None);
        assert_eq!(
            parse_command("/ROUTE /pitch"),
            Some(ReplCommand::Route {
                route: "/pitch".into()
            })
        );
    }

    #[test]
    fn flag_values() {
        assert_eq!(
            parse_command("/flag evalMode off"),
            Some(ReplCommand::Flag {
                name: "evalMode".into(),
                value: Some(false)
            })
        );
        assert_eq!(
            parse_command("/flag darkMode"),
            Some(ReplCommand::Flag {
                name: "darkMode".into(),
                value: None
            })
        );
        assert_eq!(parse_command("/flag darkMode maybe"), None);
        assert_eq!(parse_command("/flag"), None);
    }

    #[test]
    fn act_and_dismiss_keep_arguments() {
        assert_eq!(
            parse_command("/act 2"),
            Some(ReplCommand::Act { target: "2".into() })
        );
        assert_eq!(
            parse_command("/dismiss abc123xyz"),
            Some(ReplCommand::Dismiss {
                id: "abc123xyz".into()
            })
        );
    }

    #[test]
    fn aliases() {
        assert_eq!(parse_command("/?"), Some(ReplCommand::Help));
        assert_eq!(parse_command("/exit"), Some(ReplCommand::Quit));
        assert_eq!(parse_command("/unknown"), None);
    }

    #[tokio::test]
    async fn bad_act_target_keeps_session_open() {
        use crate::bus::EventBus;
        use crate::config::ReplyDelay;

        let mut session =
            DemoSession::seeded(EventBus::new(), "/pitch", ReplyDelay::none()).unwrap();
        assert!(handle_line(&mut session, "/act 9").await.unwrap());
        assert!(handle_line(&mut session, "/act 0").await.unwrap());
        assert!(handle_line(&mut session, "/dismiss nope").await.unwrap());
        assert!(session.messages().is_empty());

        assert!(handle_line(&mut session, "/act 1").await.unwrap());
        assert_eq!(session.messages().len(), 2);
        assert!(!handle_line(&mut session, "/quit").await.unwrap());
    }

    #[tokio::test]
    async fn disabled_action_is_reported_not_run() {
        use crate::bus::EventBus;
        use crate::config::ReplyDelay;
        use crate::seed;

        let mut ps = seed::persistent();
        ps.budgets.tool_limits.insert("generate_outline".into(), 0);
        let mut session =
            DemoSession::new(EventBus::new(), ps, seed::machine_pitch(), ReplyDelay::none())
                .unwrap();
        assert!(resolve_action(&session, "1").is_err());
        assert!(handle_line(&mut session, "/act 1").await.unwrap());
        assert!(session.messages().is_empty());
    }

    #[test]
    fn resolve_action_by_index_and_intent() {
        use crate::bus::EventBus;
        use crate::config::ReplyDelay;

        let session = DemoSession::seeded(EventBus::new(), "/pitch", ReplyDelay::none()).unwrap();
        assert_eq!(resolve_action(&session, "1").unwrap(), "generate_outline");
        assert_eq!(resolve_action(&session, "call_script").unwrap(), "call_script");
        assert!(resolve_action(&session, "0").is_err());
        assert!(resolve_action(&session, "9").is_err());
    }
}
