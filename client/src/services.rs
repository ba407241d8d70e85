use std::ops::ControlFlow;
use std::rc::Rc;
use std::time::Duration;

use common::dashboard::{execute, Command, DashboardMessage};
use common::network::Connection;
use common::poll::poll;
use yew::platform::spawn_local;
use yew::platform::time::sleep;
use yew::Callback;

pub fn run_command(
    connection: Rc<Connection>,
    command: Command,
    data_callback: Callback<DashboardMessage>,
) {
    spawn_local(async move {
        if let Some(message) = execute(connection.as_ref(), command).await {
            data_callback.emit(message)
        }
    });
}

pub fn poll_matches(period: Duration, tick_callback: Callback<()>) {
    spawn_local(async move {
        poll(period, sleep, || {
            tick_callback.emit(());
            async { ControlFlow::Continue(()) }
        })
        .await;
    });
}
