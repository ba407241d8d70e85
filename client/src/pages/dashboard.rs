use std::rc::Rc;

use chrono::{DateTime, Local};
use common::dashboard::{Command, Dashboard, DashboardMessage};
use common::network::Connection;
use common::Team;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::browser;
use crate::pages::PageProps;
use crate::services;

pub struct DashboardView {
    dashboard: Dashboard,
    connection: Rc<Connection>,
    matches_updated: Option<DateTime<Local>>,
}

impl DashboardView {
    fn dispatch(&self, ctx: &Context<Self>, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::Alert(message) => browser::alert(&message),
                command => {
                    let data_cb = ctx.link().callback(|message: DashboardMessage| message);
                    services::run_command(self.connection.clone(), command, data_cb);
                }
            }
        }
    }

    fn users_view(&self, ctx: &Context<Self>) -> Html {
        let onchange = ctx.link().callback(|e: Event| {
            DashboardMessage::UserSelected(e.target_unchecked_into::<HtmlSelectElement>().value())
        });
        let selected = self.dashboard.selected_user();

        html!(
            <div>
                <select id="usersSelect" {onchange}>
                    { for self.dashboard.users().iter().map(|user| html!(
                        <option value={user.clone()} selected={Some(user.as_str()) == selected}>{ user.clone() }</option>
                    )) }
                </select>
                <div id="currencyDisplay">{ self.dashboard.currency().unwrap_or_default() }</div>
            </div>
        )
    }

    fn bets_view(&self, ctx: &Context<Self>) -> Html {
        html!(
            <table id="betsTable">
                <tbody>
                    { for self.dashboard.bets().iter().enumerate().map(|(index, bet)| {
                        let onclick = ctx.link().callback(move |_| DashboardMessage::EndBet(index));
                        html!(
                            <tr>
                                { for bet.cells.iter().map(|cell| html!(<td>{ cell.to_string() }</td>)) }
                                <td><button {onclick}>{ "End Bet" }</button></td>
                            </tr>
                        )
                    }) }
                </tbody>
            </table>
        )
    }

    fn matches_view(&self, ctx: &Context<Self>) -> Html {
        let updated = self
            .matches_updated
            .map(|at| format!("Updated {}", at.format("%H:%M:%S")))
            .unwrap_or_default();

        html!(
            <div>
                <table id="upcomingMatchesTable">
                    <tbody>
                        { for self.dashboard.matches().iter().enumerate().map(|(index, row)| {
                            let onclick = ctx.link().callback(move |_| DashboardMessage::MatchChosen(index));
                            html!(
                                <tr>
                                    { for row.display_cells().into_iter().map(|text| html!(<td>{ text }</td>)) }
                                    <td><button {onclick}>{ "Place Bet" }</button></td>
                                </tr>
                            )
                        }) }
                    </tbody>
                </table>
                <small>{ updated }</small>
            </div>
        )
    }

    fn bet_form_view(&self, ctx: &Context<Self>) -> Html {
        let form = self.dashboard.form();
        let onsubmit = ctx.link().callback(|e: SubmitEvent| {
            e.prevent_default();
            DashboardMessage::SubmitBet
        });
        let oninput = ctx.link().callback(|e: InputEvent| {
            DashboardMessage::AmountChanged(e.target_unchecked_into::<HtmlInputElement>().value())
        });
        let onchange = ctx.link().callback(|e: Event| {
            let value = e.target_unchecked_into::<HtmlSelectElement>().value();
            DashboardMessage::TeamChanged(Team::from_value(&value).unwrap_or_default())
        });

        html!(
            <form id="betForm" {onsubmit}>
                <input type="hidden" id="matchId" name="MatchID" value={form.match_id.clone()} />
                <input type="number" name="Amount" value={form.amount.clone()} {oninput} />
                <select id="teamSelect" {onchange}>
                    { for [Team::Red, Team::Blue].into_iter().map(|team| html!(
                        <option value={team.as_str()} selected={team == form.team}>{ team.as_str() }</option>
                    )) }
                </select>
                <div id="oddsDisplay">{ self.dashboard.odds_display().unwrap_or_default() }</div>
                <button type="submit">{ "Place Bet" }</button>
            </form>
        )
    }
}

impl Component for DashboardView {
    type Message = DashboardMessage;
    type Properties = PageProps;

    fn create(ctx: &Context<Self>) -> Self {
        let config = &ctx.props().config;
        let view = Self {
            dashboard: Dashboard::new(),
            connection: Rc::new(Connection::new(config.api_base.clone())),
            matches_updated: None,
        };
        view.dispatch(ctx, Dashboard::start());

        let poll_cb = ctx.link().callback(|_| DashboardMessage::PollMatches);
        services::poll_matches(config.poll_interval, poll_cb);
        view
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        if let DashboardMessage::MatchesLoaded(_) = msg {
            self.matches_updated = Some(Local::now());
        }
        let commands = self.dashboard.update(msg);
        self.dispatch(ctx, commands);
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html!(
            <div>
                <h2>{ "Users" }</h2>
                { self.users_view(ctx) }
                <h2>{ "Your Bets" }</h2>
                { self.bets_view(ctx) }
                <h2>{ "Upcoming Matches" }</h2>
                { self.matches_view(ctx) }
                <h2>{ "Place a Bet" }</h2>
                { self.bet_form_view(ctx) }
                <a href="/create_user">{ "Create an account" }</a>
            </div>
        )
    }
}
