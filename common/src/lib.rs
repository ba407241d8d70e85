use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ClientError, Result};

pub mod api;
pub mod config;
pub mod create_user;
pub mod dashboard;
pub mod error;
pub mod greeting;
pub mod network;
pub mod poll;

/// Field name to value, as collected from a submitted form.
pub type FormFields = BTreeMap<String, String>;

/// A single opaque value inside a row returned by the backend.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Default)]
#[serde(transparent)]
pub struct Cell(pub Value);

impl Cell {
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_str()
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self(Value::String(value.into()))
    }
}

impl From<Value> for Cell {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

// Renders the way a browser writes the value into a table cell.
impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(&self.0, f)
    }
}

fn write_value(value: &Value, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value {
        Value::Null => Ok(()),
        Value::Bool(b) => write!(f, "{b}"),
        Value::String(s) => f.write_str(s),
        Value::Number(n) => {
            const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;
            let exact = n.as_i64().map(i64::unsigned_abs).or(n.as_u64());
            match (exact, n.as_f64()) {
                (Some(magnitude), _) if magnitude <= MAX_SAFE_INTEGER => write!(f, "{n}"),
                (_, Some(x)) => f.write_str(&number_text(x)),
                _ => write!(f, "{n}"),
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write_value(item, f)?;
            }
            Ok(())
        }
        Value::Object(_) => f.write_str("[object Object]"),
    }
}

/// Shortest round-trip digits laid out the way `Number.prototype.toString`
/// lays them out: plain decimals between 1e-7 and 1e21, exponent form outside.
fn number_text(x: f64) -> String {
    if x == 0.0 {
        return "0".to_string();
    }
    if !x.is_finite() {
        return if x.is_nan() {
            "NaN".to_string()
        } else if x > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };
    }

    let sign = if x < 0.0 { "-" } else { "" };
    let scientific = format!("{:e}", x.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let k = digits.len() as i32;
    let n = exponent + 1;

    let body = if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        format!("{}.{}", &digits[..n as usize], &digits[n as usize..])
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat((-n) as usize))
    } else {
        let exp_sign = if n - 1 < 0 { "-" } else { "+" };
        let (head, tail) = digits.split_at(1);
        let fraction = if tail.is_empty() { String::new() } else { format!(".{tail}") };
        format!("{head}{fraction}e{exp_sign}{}", (n - 1).abs())
    };
    format!("{sign}{body}")
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    #[default]
    Red,
    Blue,
}

impl Team {
    pub fn as_str(&self) -> &'static str {
        match self {
            Team::Red => "red",
            Team::Blue => "blue",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "red" => Some(Team::Red),
            "blue" => Some(Team::Blue),
            _ => None,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const ODDS_UNAVAILABLE: &str = "Odds unavailable";

/// Red/blue odds as carried in the fourth cell of a match row, e.g. `"1.5,2.0"`.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Odds {
    pub red: String,
    pub blue: String,
}

impl Odds {
    pub fn parse(cell: &Cell) -> Option<Self> {
        let raw = cell.as_str()?;
        if !raw.contains(',') {
            return None;
        }
        let mut parts = raw.split(',');
        let red = parts.next().unwrap_or_default().to_string();
        let blue = parts.next().unwrap_or_default().to_string();
        Some(Self { red, blue })
    }

    /// Text shown in the odds column of the matches table.
    pub fn cell_label(&self) -> String {
        format!("Red: {}, Blue: {}", self.red, self.blue)
    }

    /// Text shown next to the bet form once a match is chosen.
    pub fn team_label(&self) -> String {
        format!("Red Team Odds: {}, Blue Team Odds: {}", self.red, self.blue)
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(transparent)]
pub struct BetRow {
    pub cells: Vec<Cell>,
}

impl BetRow {
    /// The first cell identifies the bet.
    pub fn id(&self) -> Option<&Cell> {
        self.cells.first()
    }
}

pub const MATCH_ODDS_COLUMN: usize = 3;

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(transparent)]
pub struct MatchRow {
    pub cells: Vec<Cell>,
}

impl MatchRow {
    pub fn id(&self) -> Option<&Cell> {
        self.cells.first()
    }

    pub fn odds(&self) -> Option<Odds> {
        self.cells.get(MATCH_ODDS_COLUMN).and_then(Odds::parse)
    }

    pub fn display_cells(&self) -> Vec<String> {
        self.cells
            .iter()
            .enumerate()
            .map(|(index, cell)| match index {
                MATCH_ODDS_COLUMN => Odds::parse(cell)
                    .map(|odds| odds.cell_label())
                    .unwrap_or_else(|| cell.to_string()),
                _ => cell.to_string(),
            })
            .collect()
    }

    pub fn odds_display(&self) -> String {
        self.odds()
            .map(|odds| odds.team_label())
            .unwrap_or_else(|| ODDS_UNAVAILABLE.to_string())
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Default)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

impl MessageResponse {
    /// The server message, or `fallback` when it is absent or empty.
    pub fn message_or(&self, fallback: &str) -> String {
        self.message
            .as_deref()
            .filter(|message| !message.is_empty())
            .unwrap_or(fallback)
            .to_string()
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct GreetingResponse {
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct UsersResponse {
    pub users: Vec<Vec<Cell>>,
}

impl UsersResponse {
    /// Usernames in response order; rows without cells are skipped.
    pub fn usernames(&self) -> Vec<String> {
        self.users
            .iter()
            .filter_map(|row| row.first())
            .map(Cell::to_string)
            .collect()
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct CurrencyResponse {
    pub currency: Cell,
}

impl CurrencyResponse {
    pub fn label(&self) -> String {
        format!("Currency: {}", self.currency)
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Default)]
pub struct BetsResponse {
    #[serde(default)]
    pub bets: Value,
}

impl BetsResponse {
    pub fn into_rows(self) -> Result<Vec<BetRow>> {
        rows_of(self.bets, "bets").map(|rows| rows.into_iter().map(|cells| BetRow { cells }).collect())
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Default)]
pub struct MatchesResponse {
    #[serde(default)]
    pub matches: Value,
}

impl MatchesResponse {
    pub fn into_rows(self) -> Result<Vec<MatchRow>> {
        rows_of(self.matches, "matches")
            .map(|rows| rows.into_iter().map(|cells| MatchRow { cells }).collect())
    }
}

fn rows_of(value: Value, what: &str) -> Result<Vec<Vec<Cell>>> {
    let invalid = || ClientError::Malformed(format!("Invalid data format for {what}."));
    let Value::Array(rows) = value else {
        return Err(invalid());
    };
    rows.into_iter()
        .map(|row| match row {
            Value::Array(cells) => Ok(cells.into_iter().map(Cell).collect()),
            _ => Err(invalid()),
        })
        .collect()
}

#[derive(Serialize, Debug, PartialEq, Eq, Clone)]
pub struct PlaceBetRequest {
    #[serde(flatten)]
    pub fields: FormFields,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Amount")]
    pub amount: Option<i64>,
    #[serde(rename = "Team")]
    pub team: Team,
}

impl PlaceBetRequest {
    /// Form fields plus the selected user and team. `Amount` is read the way
    /// `parseInt` reads it and serialises as `null` when it is not a number.
    pub fn compose(mut fields: FormFields, username: impl Into<String>, team: Team) -> Self {
        let amount = fields.get("Amount").and_then(|raw| parse_int(raw));
        for key in ["Username", "Amount", "Team"] {
            fields.remove(key);
        }
        Self {
            fields,
            username: username.into(),
            amount,
            team,
        }
    }
}

#[derive(Serialize, Debug, PartialEq, Eq, Clone)]
pub struct EndBetRequest {
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "MatchID")]
    pub match_id: Cell,
}

/// Leading-integer parse: optional whitespace and sign, then decimal digits.
/// Trailing garbage is ignored; no digits at all gives `None`. A digit run
/// that overflows `i64` also gives `None` (sent as `null`) where `parseInt`
/// would produce an imprecise float.
pub fn parse_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> MatchRow {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn cells_render_like_table_text() {
        assert_eq!(Cell(json!("m1")).to_string(), "m1");
        assert_eq!(Cell(json!(100)).to_string(), "100");
        assert_eq!(Cell(json!(1.5)).to_string(), "1.5");
        assert_eq!(Cell(json!(2.0)).to_string(), "2");
        assert_eq!(Cell(json!(null)).to_string(), "");
        assert_eq!(Cell(json!(true)).to_string(), "true");
        assert_eq!(Cell(json!(["a", 1])).to_string(), "a,1");
    }

    #[test]
    fn extreme_numbers_use_browser_layout() {
        assert_eq!(Cell(json!(1e-7)).to_string(), "1e-7");
        assert_eq!(Cell(json!(0.000001)).to_string(), "0.000001");
        assert_eq!(Cell(json!(1e21)).to_string(), "1e+21");
        assert_eq!(Cell(json!(1.5e300)).to_string(), "1.5e+300");
        assert_eq!(Cell(json!(1.2345678901234568e20)).to_string(), "123456789012345680000");
        assert_eq!(Cell(json!(-2.5)).to_string(), "-2.5");
        assert_eq!(Cell(json!(123.456)).to_string(), "123.456");
        assert_eq!(Cell(json!(-0.0)).to_string(), "0");
        assert_eq!(Cell(json!(9007199254740993u64)).to_string(), "9007199254740992");
    }

    #[test]
    fn match_row_formats_odds_column() {
        let m = row(json!(["m1", "TeamA", "TeamB", "1.5,2.0"]));
        assert_eq!(m.display_cells(), vec!["m1", "TeamA", "TeamB", "Red: 1.5, Blue: 2.0"]);
        assert_eq!(m.odds_display(), "Red Team Odds: 1.5, Blue Team Odds: 2.0");
        assert_eq!(m.id(), Some(&Cell::from("m1")));
    }

    #[test]
    fn only_the_odds_column_is_split() {
        let m = row(json!(["m2", "frc1, frc2", "12:00", "n/a"]));
        assert_eq!(m.display_cells()[1], "frc1, frc2");
        assert_eq!(m.display_cells()[3], "n/a");
        assert_eq!(m.odds_display(), ODDS_UNAVAILABLE);

        let numeric = row(json!(["m3", "a", "b", 1.5]));
        assert_eq!(numeric.odds(), None);
        assert_eq!(numeric.display_cells()[3], "1.5");
    }

    #[test]
    fn odds_keep_first_two_pieces() {
        let odds = Odds::parse(&Cell::from("1.5,2.0,9")).unwrap();
        assert_eq!(odds.red, "1.5");
        assert_eq!(odds.blue, "2.0");
    }

    #[test]
    fn parse_int_follows_leading_digits() {
        assert_eq!(parse_int("42"), Some(42));
        assert_eq!(parse_int("  17abc"), Some(17));
        assert_eq!(parse_int("-5"), Some(-5));
        assert_eq!(parse_int("+8"), Some(8));
        assert_eq!(parse_int("abc"), None);
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("-"), None);
        assert_eq!(parse_int("99999999999999999999"), None);
    }

    #[test]
    fn place_bet_payload_overrides_form_values() {
        let mut fields = FormFields::new();
        fields.insert("MatchID".into(), "m1".into());
        fields.insert("Amount".into(), "50".into());
        fields.insert("Team".into(), "stale".into());

        let request = PlaceBetRequest::compose(fields, "alice", Team::Blue);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"MatchID": "m1", "Amount": 50, "Username": "alice", "Team": "blue"})
        );
    }

    #[test]
    fn unparseable_amount_is_null() {
        let mut fields = FormFields::new();
        fields.insert("Amount".into(), "lots".into());
        let request = PlaceBetRequest::compose(fields, "bob", Team::Red);
        assert_eq!(serde_json::to_value(&request).unwrap()["Amount"], Value::Null);
    }

    #[test]
    fn bets_must_be_an_array_of_rows() {
        let missing: BetsResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(missing.into_rows(), Err(ClientError::Malformed(_))));

        let scalar_row = BetsResponse { bets: json!([["m1", 10], "oops"]) };
        assert!(scalar_row.into_rows().is_err());

        let good = BetsResponse { bets: json!([["m1", 10, 1.5]]) };
        let rows = good.into_rows().unwrap();
        assert_eq!(rows[0].id(), Some(&Cell::from("m1")));
    }

    #[test]
    fn usernames_come_from_first_cell() {
        let users: UsersResponse =
            serde_json::from_value(json!({"users": [["alice", 1000], ["bob", 5], []]})).unwrap();
        assert_eq!(users.usernames(), vec!["alice", "bob"]);
    }

    #[test]
    fn empty_message_falls_back() {
        let empty = MessageResponse { message: Some(String::new()) };
        assert_eq!(empty.message_or("done"), "done");
        let set = MessageResponse { message: Some("ok".into()) };
        assert_eq!(set.message_or("done"), "ok");
    }
}
