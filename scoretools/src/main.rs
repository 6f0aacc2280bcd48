use anyhow::Result;
use clap::{Args, Parser, Subcommand};

mod client;
mod formatting;

use client::ScoreServerClient;
use formatting::{format_match, format_matches, format_stats};

#[derive(Parser, Debug)]
#[command(version, about = "Command-line client for the football score server")]
pub struct Arguments {
    /// The score server to talk to
    #[arg(short, long, env = "SCORE_SERVER", default_value = "http://127.0.0.1:8380")]
    server: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[clap(name = "health", about = "Check that the server is up")]
    Health,
    #[clap(name = "create", about = "Register a new match")]
    Create(CreateParams),
    #[clap(name = "list", about = "List matches, most recent kick-off first")]
    List(ListParams),
    #[clap(name = "get", about = "Show a single match")]
    Get {
        id: i64,
    },
    #[clap(name = "score", about = "Set the score of a match in progress")]
    Score(ScoreParams),
    #[clap(name = "close", about = "End a match. This cannot be undone")]
    Close {
        id: i64,
    },
    #[clap(name = "delete", about = "Delete a match")]
    Delete {
        id: i64,
    },
    #[clap(name = "stats", about = "Count matches by status")]
    Stats,
}

#[derive(Debug, Args)]
pub struct CreateParams {
    /// The home side
    #[arg(short = 'a', long = "team-a")]
    team_a: String,
    /// The away side
    #[arg(short = 'b', long = "team-b")]
    team_b: String,
    /// Kick-off time, e.g. 2024-06-14T19:00:00 (UTC) or 2024-06-14T21:00:00+02:00
    #[arg(short = 't', long = "at")]
    scheduled_at: String,
}

#[derive(Debug, Args)]
pub struct ListParams {
    /// Only show matches with this status (IN_PROGRESS or CLOSED)
    #[arg(short = 's', long = "status", conflicts_with_all = ["from", "to"])]
    status: Option<String>,
    /// Start of the kick-off window, inclusive
    #[arg(short = 'f', long = "from", requires = "to")]
    from: Option<String>,
    /// End of the kick-off window, inclusive
    #[arg(short = 't', long = "to", requires = "from")]
    to: Option<String>,
}

#[derive(Debug, Args)]
pub struct ScoreParams {
    id: i64,
    /// Goals for the home side
    #[arg(short = 'a', long = "score-a")]
    score_a: i32,
    /// Goals for the away side
    #[arg(short = 'b', long = "score-b")]
    score_b: i32,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();
    let cli = Arguments::parse();
    if let Err(e) = run(cli).await {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Arguments) -> Result<()> {
    let client = ScoreServerClient::new(&cli.server)?;
    match cli.command {
        Command::Health => {
            let response = client.health().await?;
            println!("{} is up: {}", client.server(), response.trim());
        },
        Command::Create(params) => {
            let m = client.create_match(&params.team_a, &params.team_b, &params.scheduled_at).await?;
            print!("{}", format_match(&m)?);
        },
        Command::List(params) => {
            let matches =
                client.list_matches(params.status.as_deref(), params.from.as_deref(), params.to.as_deref()).await?;
            println!("{}", format_matches(&matches));
        },
        Command::Get { id } => match client.get_match(id).await? {
            Some(m) => print!("{}", format_match(&m)?),
            None => println!("Match #{id} does not exist"),
        },
        Command::Score(params) => {
            let m = client.update_score(params.id, params.score_a, params.score_b).await?;
            print!("{}", format_match(&m)?);
        },
        Command::Close { id } => {
            let m = client.close_match(id).await?;
            print!("{}", format_match(&m)?);
        },
        Command::Delete { id } => {
            client.delete_match(id).await?;
            println!("Match #{id} deleted");
        },
        Command::Stats => {
            let stats = client.stats().await?;
            println!("{}", format_stats(&stats));
        },
    }
    Ok(())
}
