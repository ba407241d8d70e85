use std::cell::RefCell;
use std::ops::ControlFlow;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use common::api::BettingApi;
use common::config::{parse_poll_secs, ClientConfig};
use common::create_user::{self, MemorySession};
use common::dashboard::{execute, Command, Dashboard, DashboardMessage};
use common::greeting::greet;
use common::network::Connection;
use common::poll::poll;
use common::{Cell, EndBetRequest, FormFields, MatchRow, PlaceBetRequest, Team};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "probe", about = "Exercise the betting API from a terminal")]
struct Cli {
    /// Backend address every endpoint path is appended to
    #[arg(long, env = "BETTING_API_BASE", default_value = "http://127.0.0.1:8000")]
    base_url: String,

    #[command(subcommand)]
    command: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Fetch the demo greeting
    Hello,
    /// List usernames
    Users,
    /// Show a user's balance
    Currency { username: String },
    /// List a user's open bets
    Bets { username: String },
    /// List upcoming matches
    Matches {
        /// Keep polling and reprint on every refresh
        #[arg(long)]
        watch: bool,
        #[arg(long, env = "BETTING_POLL_SECS", default_value = "30")]
        poll_secs: String,
    },
    /// Create a user
    CreateUser { username: String },
    /// Place a bet on a match
    PlaceBet {
        #[arg(long)]
        user: String,
        #[arg(long = "match")]
        match_id: String,
        #[arg(long)]
        amount: String,
        #[arg(long, default_value = "red")]
        team: String,
    },
    /// Settle a bet
    EndBet {
        #[arg(long)]
        user: String,
        #[arg(long = "match")]
        match_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_values(Some(cli.base_url.as_str()), None)?;
    let connection = Connection::new(config.api_base);

    match cli.command {
        Action::Hello => println!("{}", greet(&connection).await?),
        Action::Users => {
            for username in connection.get_users().await?.usernames() {
                println!("{username}");
            }
        }
        Action::Currency { username } => {
            println!("{}", connection.get_user_currency(&username).await?.label());
        }
        Action::Bets { username } => {
            for bet in connection.get_user_bets(&username).await?.into_rows()? {
                println!("{}", join_cells(bet.cells.iter().map(Cell::to_string)));
            }
        }
        Action::Matches { watch, poll_secs } => {
            let period = parse_poll_secs(&poll_secs)?;
            let mut dashboard = Dashboard::new();
            refresh_matches(&connection, &mut dashboard).await;
            if watch {
                watch_matches(period, &connection, dashboard).await;
            }
        }
        Action::CreateUser { username } => {
            let fields = FormFields::from([("Username".to_string(), username)]);
            let mut session = MemorySession::default();
            let created = create_user::submit(&connection, &mut session, &fields).await?;
            println!("{}", created.alert);
        }
        Action::PlaceBet {
            user,
            match_id,
            amount,
            team,
        } => {
            let Some(team) = Team::from_value(&team) else {
                bail!("team must be red or blue, got {team:?}");
            };
            let fields = FormFields::from([
                ("MatchID".to_string(), match_id),
                ("Amount".to_string(), amount),
            ]);
            let bet = PlaceBetRequest::compose(fields, user, team);
            let response = connection.place_bet(&bet).await.context("placing bet")?;
            println!("{}", response.message_or(common::dashboard::BET_PLACED));
        }
        Action::EndBet { user, match_id } => {
            let request = EndBetRequest {
                username: user,
                match_id: Cell::from(match_id.as_str()),
            };
            let response = connection.end_bet(&request).await.context("ending bet")?;
            println!("{}", response.message_or("Bet ended"));
        }
    }

    Ok(())
}

async fn refresh_matches(connection: &Connection, dashboard: &mut Dashboard) {
    for command in dashboard.update(DashboardMessage::PollMatches) {
        if let Some(message) = execute(connection, command).await {
            dashboard.update(message);
        }
    }
    print_matches(dashboard.matches());
}

async fn watch_matches(period: Duration, connection: &Connection, dashboard: Dashboard) {
    let state = RefCell::new(dashboard);
    let dashboard = &state;
    poll(period, tokio::time::sleep, move || {
        async move {
            let commands: Vec<Command> = dashboard.borrow_mut().update(DashboardMessage::PollMatches);
            for command in commands {
                if let Some(message) = execute(connection, command).await {
                    dashboard.borrow_mut().update(message);
                }
            }
            print_matches(dashboard.borrow().matches());
            ControlFlow::Continue(())
        }
    })
    .await;
}

fn print_matches(matches: &[MatchRow]) {
    println!("--- {} upcoming matches", matches.len());
    for row in matches {
        println!("{}", join_cells(row.display_cells().into_iter()));
    }
}

fn join_cells(cells: impl Iterator<Item = String>) -> String {
    cells.collect::<Vec<_>>().join(" | ")
}
