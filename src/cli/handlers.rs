use super::{Cli, Commands, ConfigCommands, repl};
use crate::bus::{EventBus, summarize};
use crate::config::{Config, ReplyDelay};
use crate::observability::{attach, create_observer};
use crate::session::DemoSession;
use anyhow::{Context, Result, bail};
use std::sync::Arc;
use tracing::info;

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Observe { route } => {
            let session = open_session(&config, route.as_deref(), ReplyDelay::none())?;
            println!("{}", serde_json::to_string_pretty(session.derived())?);
            Ok(())
        }

        Commands::Prompt { route } => {
            let session = open_session(&config, route.as_deref(), ReplyDelay::none())?;
            println!("{}", session.system_prompt());
            Ok(())
        }

        Commands::Chat {
            route,
            message,
            no_delay,
        } => {
            let delay = if no_delay {
                ReplyDelay::none()
            } else {
                config.demo.reply_delay()
            };
            run_chat(&config, route.as_deref(), &message, delay).await
        }

        Commands::Actions { route } => {
            let session = open_session(&config, route.as_deref(), ReplyDelay::none())?;
            let actions = session.actions();
            if actions.is_empty() {
                println!("No recommended actions for {}", session.machine().route);
            }
            for action in actions {
                let mut tags = Vec::new();
                if action.primary {
                    tags.push("primary");
                }
                if action.disabled {
                    tags.push("disabled");
                }
                let tags = if tags.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", tags.join(", "))
                };
                println!(
                    "{:<22} {}{} -- {}",
                    action.intent, action.label, tags, action.description
                );
            }
            Ok(())
        }

        Commands::Repl { route } => {
            let session = open_session(&config, route.as_deref(), config.demo.reply_delay())?;
            let subscription = attach(session.bus(), create_observer(&config.observability));
            let result = repl::run(session, config.demo.heartbeat()).await;
            subscription.unsubscribe();
            result
        }

        Commands::Config { config_command } => handle_config(config_command, &config),
    }
}

fn open_session(config: &Config, route: Option<&str>, delay: ReplyDelay) -> Result<DemoSession> {
    let route = route.unwrap_or(&config.demo.default_route);
    let bus = EventBus::with_capacity(config.demo.event_history_limit);
    let session = DemoSession::seeded(bus, route, delay)
        .with_context(|| format!("Failed to start session on {route}"))?;
    Ok(session)
}

async fn run_chat(
    config: &Config,
    route: Option<&str>,
    message: &str,
    delay: ReplyDelay,
) -> Result<()> {
    let mut session = open_session(config, route, delay)?;
    let bus = Arc::clone(session.bus());
    let subscription = attach(&bus, create_observer(&config.observability));

    let reply = session.send_message(message).await?;
    subscription.unsubscribe();
    info!(session = %session.id(), "chat.done");

    println!("{}", reply.text);
    for call in reply.tool_calls() {
        println!();
        println!("tool: {}", call.tool);
        if let Some(result) = &call.result {
            println!("{}", serde_json::to_string_pretty(result)?);
        }
    }

    println!();
    println!("Event feed (newest first):");
    for event in bus.events() {
        println!("  {}", summarize(&event));
    }
    Ok(())
}

fn handle_config(command: ConfigCommands, config: &Config) -> Result<()> {
    match command {
        ConfigCommands::Init { force } => {
            let path = Config::default_path()?;
            if path.exists() && !force {
                bail!(
                    "Config already exists at {} (use --force to overwrite)",
                    path.display()
                );
            }
            let fresh = Config {
                config_path: path.clone(),
                ..Config::default()
            };
            fresh.save()?;
            println!("Wrote {}", path.display());
            Ok(())
        }
        ConfigCommands::Show => {
            let rendered = toml::to_string_pretty(config).context("Failed to serialize config")?;
            println!("# {}", config.config_path.display());
            println!("{rendered}");
            Ok(())
        }
    }
}
