//! Betting dashboard: user picker, balance, open bets, upcoming matches and
//! the bet form.
//!
//! [`Dashboard`] holds what the page shows and turns each [`DashboardMessage`]
//! into the [`Command`]s that should run next. [`execute`] runs a command
//! against a [`BettingApi`] and hands back the message carrying its result, so
//! the browser component and the tests drive the same state machine.

use tracing::{error, warn};

use crate::api::BettingApi;
use crate::{BetRow, Cell, EndBetRequest, FormFields, MatchRow, PlaceBetRequest, Team};

pub const BET_PLACED: &str = "Bet placed successfully!";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BetForm {
    pub match_id: String,
    pub amount: String,
    pub team: Team,
}

impl BetForm {
    /// The named fields of the form as they would be submitted.
    pub fn fields(&self) -> FormFields {
        let mut fields = FormFields::new();
        fields.insert("MatchID".into(), self.match_id.clone());
        fields.insert("Amount".into(), self.amount.clone());
        fields
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardMessage {
    UsersLoaded(Vec<String>),
    UserSelected(String),
    CurrencyLoaded { username: String, currency: Cell },
    BetsLoaded { username: String, bets: Vec<BetRow> },
    MatchesLoaded(Vec<MatchRow>),
    PollMatches,
    MatchChosen(usize),
    AmountChanged(String),
    TeamChanged(Team),
    SubmitBet,
    BetPlaced { message: String },
    EndBet(usize),
    BetEnded { username: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    FetchUsers,
    FetchCurrency(String),
    FetchBets(String),
    FetchMatches,
    PlaceBet(PlaceBetRequest),
    EndBet(EndBetRequest),
    Alert(String),
}

#[derive(Debug, Default)]
pub struct Dashboard {
    users: Vec<String>,
    selected_user: Option<String>,
    currency: Option<String>,
    bets: Vec<BetRow>,
    bets_owner: Option<String>,
    matches: Vec<MatchRow>,
    odds_display: Option<String>,
    form: BetForm,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands to run when the page first loads.
    pub fn start() -> Vec<Command> {
        vec![Command::FetchUsers, Command::FetchMatches]
    }

    pub fn users(&self) -> &[String] {
        &self.users
    }

    pub fn selected_user(&self) -> Option<&str> {
        self.selected_user.as_deref()
    }

    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }

    pub fn bets(&self) -> &[BetRow] {
        &self.bets
    }

    pub fn matches(&self) -> &[MatchRow] {
        &self.matches
    }

    pub fn odds_display(&self) -> Option<&str> {
        self.odds_display.as_deref()
    }

    pub fn form(&self) -> &BetForm {
        &self.form
    }

    pub fn update(&mut self, message: DashboardMessage) -> Vec<Command> {
        match message {
            DashboardMessage::UsersLoaded(users) => {
                self.users = users;
                self.selected_user = self.users.first().cloned();
                match self.selected_user.clone() {
                    Some(username) if !username.is_empty() => refresh(username),
                    _ => vec![],
                }
            }
            DashboardMessage::UserSelected(username) => {
                self.selected_user = Some(username.clone());
                refresh(username)
            }
            DashboardMessage::CurrencyLoaded { username, currency } => {
                if self.is_selected(&username) {
                    self.currency = Some(format!("Currency: {currency}"));
                }
                vec![]
            }
            DashboardMessage::BetsLoaded { username, bets } => {
                if self.is_selected(&username) {
                    self.bets = bets;
                    self.bets_owner = Some(username);
                }
                vec![]
            }
            DashboardMessage::MatchesLoaded(matches) => {
                self.matches = matches;
                vec![]
            }
            DashboardMessage::PollMatches => vec![Command::FetchMatches],
            DashboardMessage::MatchChosen(index) => {
                if let Some(row) = self.matches.get(index) {
                    self.form.match_id = row.id().map(Cell::to_string).unwrap_or_default();
                    self.odds_display = Some(row.odds_display());
                }
                vec![]
            }
            DashboardMessage::AmountChanged(amount) => {
                self.form.amount = amount;
                vec![]
            }
            DashboardMessage::TeamChanged(team) => {
                self.form.team = team;
                vec![]
            }
            DashboardMessage::SubmitBet => match self.selected_user.clone() {
                Some(username) => vec![Command::PlaceBet(PlaceBetRequest::compose(
                    self.form.fields(),
                    username,
                    self.form.team,
                ))],
                None => {
                    warn!("No user selected, bet not placed");
                    vec![]
                }
            },
            DashboardMessage::BetPlaced { message } => {
                let mut commands = vec![Command::Alert(message)];
                if let Some(username) = self.selected_user.clone() {
                    commands.extend(refresh(username));
                }
                commands
            }
            DashboardMessage::EndBet(index) => {
                let request = self.bets.get(index).zip(self.bets_owner.clone()).map(
                    |(bet, username)| EndBetRequest {
                        username,
                        match_id: bet.id().cloned().unwrap_or_default(),
                    },
                );
                request.map(Command::EndBet).into_iter().collect()
            }
            DashboardMessage::BetEnded { username } => refresh(username),
        }
    }

    // Responses for a user that is no longer selected are stale.
    fn is_selected(&self, username: &str) -> bool {
        self.selected_user.as_deref() == Some(username)
    }
}

fn refresh(username: String) -> Vec<Command> {
    vec![Command::FetchCurrency(username.clone()), Command::FetchBets(username)]
}

/// Runs one network command. Failures are logged and produce no message, so
/// the page simply does not change.
pub async fn execute<A: BettingApi>(api: &A, command: Command) -> Option<DashboardMessage> {
    match command {
        Command::FetchUsers => match api.get_users().await {
            Ok(response) => Some(DashboardMessage::UsersLoaded(response.usernames())),
            Err(e) => {
                error!("Error loading users: {e}");
                None
            }
        },
        Command::FetchCurrency(username) => match api.get_user_currency(&username).await {
            Ok(response) => Some(DashboardMessage::CurrencyLoaded {
                username,
                currency: response.currency,
            }),
            Err(e) => {
                error!("Error loading user currency: {e}");
                None
            }
        },
        Command::FetchBets(username) => match api.get_user_bets(&username).await {
            Ok(response) => {
                let bets = response.into_rows().unwrap_or_else(|e| {
                    error!("{e}");
                    vec![]
                });
                Some(DashboardMessage::BetsLoaded { username, bets })
            }
            Err(e) => {
                error!("Error loading user bets: {e}");
                None
            }
        },
        Command::FetchMatches => match api.upcoming_matches().await {
            Ok(response) => {
                let matches = response.into_rows().unwrap_or_else(|e| {
                    error!("{e}");
                    vec![]
                });
                Some(DashboardMessage::MatchesLoaded(matches))
            }
            Err(e) => {
                error!("Error loading upcoming matches: {e}");
                None
            }
        },
        Command::PlaceBet(bet) => match api.place_bet(&bet).await {
            Ok(response) => Some(DashboardMessage::BetPlaced {
                message: response.message_or(BET_PLACED),
            }),
            Err(e) => {
                error!("Error placing bet: {e}");
                None
            }
        },
        Command::EndBet(request) => match api.end_bet(&request).await {
            Ok(_) => Some(DashboardMessage::BetEnded {
                username: request.username,
            }),
            Err(e) => {
                error!("Error ending bet: {e}");
                None
            }
        },
        Command::Alert(_) => None,
    }
}
