use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use ixichat::channels::ChannelManager;
use ixichat::config::Config;
use ixichat::identity::generate_random_username;
use ixichat::{Error, InboundUnit, KeyPair, Message};

fn cli() -> Command {
    Command::new("ixichat")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Signed chat messages for ledger channels")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .global(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Config file (default: <config dir>/ixichat/config.toml)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("Verbose logging (-v for debug, -vv for trace)"),
        )
        .subcommand(
            Command::new("init")
                .about("Create a config with a new or imported keypair")
                .arg(
                    Arg::new("username")
                        .long("username")
                        .value_name("NAME")
                        .help("Display name (random if omitted)"),
                )
                .arg(
                    Arg::new("secret")
                        .long("secret")
                        .value_name("HEX")
                        .help("Import an existing Ed25519 secret key"),
                )
                .arg(
                    Arg::new("force")
                        .long("force")
                        .action(ArgAction::SetTrue)
                        .help("Overwrite an existing config"),
                ),
        )
        .subcommand(Command::new("whoami").about("Show username, userid and public key"))
        .subcommand(
            Command::new("contacts")
                .about("Manage trusted userids")
                .subcommand_required(true)
                .subcommand(Command::new("list").about("List contacts"))
                .subcommand(
                    Command::new("add")
                        .about("Trust a userid")
                        .arg(Arg::new("userid").required(true)),
                )
                .subcommand(
                    Command::new("remove")
                        .about("Stop trusting a userid")
                        .arg(Arg::new("userid").required(true)),
                ),
        )
        .subcommand(
            Command::new("send")
                .about("Sign a message and print the outbound unit as JSON")
                .arg(Arg::new("channel").required(true).value_name("CHANNEL"))
                .arg(
                    Arg::new("message")
                        .required(true)
                        .num_args(1..)
                        .trailing_var_arg(true)
                        .value_name("MESSAGE"),
                ),
        )
        .subcommand(
            Command::new("read")
                .about("Verify inbound units (JSON lines) and print accepted messages")
                .arg(
                    Arg::new("file")
                        .value_name("FILE")
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("Read units from FILE instead of stdin"),
                )
                .arg(
                    Arg::new("channel")
                        .short('c')
                        .long("channel")
                        .value_name("CHANNEL")
                        .help("Only print messages from this channel"),
                ),
        )
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_count("verbose"));

    let config_path = matches
        .get_one::<PathBuf>("config")
        .cloned()
        .unwrap_or_else(Config::default_path);

    match matches.subcommand() {
        Some(("init", sub)) => init(&config_path, sub).await,
        Some(("whoami", _)) => whoami(&config_path).await,
        Some(("contacts", sub)) => contacts(&config_path, sub).await,
        Some(("send", sub)) => send(&config_path, sub).await,
        Some(("read", sub)) => read(&config_path, sub).await,
        _ => unreachable!("subcommand_required is set"),
    }
}

fn init_tracing(verbosity: u8) {
    let mut filter = EnvFilter::from_default_env();

    // Only apply defaults if RUST_LOG is not set
    if std::env::var("RUST_LOG").is_err() {
        let level = match verbosity {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        if let Ok(directive) = level.parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn init(path: &Path, matches: &ArgMatches) -> Result<()> {
    if !matches.get_flag("force") && tokio::fs::try_exists(path).await? {
        bail!(
            "config already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    let keys = match matches.get_one::<String>("secret") {
        Some(secret) => KeyPair::from_secret(secret)?,
        None => KeyPair::generate(),
    };
    let username = matches
        .get_one::<String>("username")
        .cloned()
        .unwrap_or_else(generate_random_username);

    let config = Config::new(&username, &keys)?;
    config.save(path).await?;

    tracing::info!("wrote {}", path.display());
    println!("{}#{}", config.username, keys.userid());
    Ok(())
}

async fn whoami(path: &Path) -> Result<()> {
    let config = Config::load(path).await?;
    let keys = config.keypair()?;

    println!("username:   {}", config.username);
    println!("userid:     {}", keys.userid());
    println!("public key: {}", keys.public_key());
    Ok(())
}

async fn contacts(path: &Path, matches: &ArgMatches) -> Result<()> {
    let mut config = Config::load(path).await?;

    match matches.subcommand() {
        Some(("list", _)) => {
            if config.contacts.is_empty() {
                tracing::info!("no contacts");
            }
            for userid in &config.contacts {
                println!("{}", userid);
            }
        }
        Some(("add", sub)) => {
            let userid = sub
                .get_one::<String>("userid")
                .context("missing userid")?;
            if config.add_contact(userid)? {
                config.save(path).await?;
                tracing::info!("now trusting {}", userid);
            } else {
                tracing::info!("{} is already a contact", userid);
            }
        }
        Some(("remove", sub)) => {
            let userid = sub
                .get_one::<String>("userid")
                .context("missing userid")?;
            if config.remove_contact(userid) {
                config.save(path).await?;
                tracing::info!("no longer trusting {}", userid);
            } else {
                tracing::info!("{} is not a contact", userid);
            }
        }
        _ => unreachable!("subcommand_required is set"),
    }
    Ok(())
}

async fn send(path: &Path, matches: &ArgMatches) -> Result<()> {
    let config = Config::load(path).await?;
    let keys = config.keypair()?;

    let channel = matches
        .get_one::<String>("channel")
        .context("missing channel")?;
    let content = matches
        .get_many::<String>("message")
        .context("missing message")?
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");

    let message = Message::from_author(&config.username, &content, channel, &keys)?;
    let unit = match message.to_wire() {
        Ok(unit) => unit,
        Err(Error::TooLarge { len, max }) => {
            bail!(
                "message too long: the payload would be {} characters, the limit is {}; shorten it",
                len,
                max
            )
        }
        Err(e) => return Err(e.into()),
    };

    println!("{}", serde_json::to_string(&unit)?);
    Ok(())
}

async fn read(path: &Path, matches: &ArgMatches) -> Result<()> {
    let config = Config::load(path).await?;
    let own_userid = config.keypair()?.userid();
    let contacts = config.contact_set();

    let input = match matches.get_one::<PathBuf>("file") {
        Some(file) => tokio::fs::read_to_string(file)
            .await
            .with_context(|| format!("failed to read {}", file.display()))?,
        None => {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            let mut input = String::new();
            while let Some(line) = lines.next_line().await? {
                input.push_str(&line);
                input.push('\n');
            }
            input
        }
    };

    let mut manager = ChannelManager::new();
    let mut total = 0usize;
    for (number, line) in input.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        total += 1;

        let unit: InboundUnit = match serde_json::from_str(line) {
            Ok(unit) => unit,
            Err(e) => {
                tracing::warn!("line {}: not a unit: {}", number + 1, e);
                continue;
            }
        };
        match Message::from_wire(&unit, &contacts, &own_userid) {
            Ok(message) => {
                manager.add_message(message);
            }
            Err(e) => tracing::warn!("line {}: dropped: {}", number + 1, e),
        }
    }

    let filter = matches.get_one::<String>("channel");
    let mut accepted = 0usize;
    for channel in manager.list_channels() {
        if filter.map_or(false, |wanted| *wanted != channel) {
            continue;
        }
        if let Some(channel) = manager.get_channel(&channel) {
            for message in &channel.messages {
                println!("{}", serde_json::to_string(&message.to_display())?);
                accepted += 1;
            }
        }
    }

    tracing::info!("printed {} of {} units", accepted, total);
    Ok(())
}
