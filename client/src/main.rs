mod browser;
mod pages;
mod services;

use common::config::ClientConfig;
use yew::prelude::*;

use crate::pages::create_user::CreateUserView;
use crate::pages::dashboard::DashboardView;
use crate::pages::greeting::GreetingView;

#[derive(Properties, PartialEq)]
struct AppProps {
    config: ClientConfig,
    path: String,
}

#[function_component]
fn App(props: &AppProps) -> Html {
    let config = props.config.clone();
    match props.path.trim_end_matches('/') {
        "/create_user" => html!(<CreateUserView {config} />),
        "/hello" => html!(<GreetingView {config} />),
        _ => html!(<DashboardView {config} />),
    }
}

fn main() {
    browser::init_logging();
    let config = ClientConfig::from_build_env().unwrap_or_else(|e| {
        tracing::error!("{e}, using defaults");
        ClientConfig::default()
    });
    let path = browser::current_path();
    yew::Renderer::<App>::with_props(AppProps { config, path }).render();
}
