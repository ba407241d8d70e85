use common::greeting::greet;
use common::network::Connection;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::browser;
use crate::pages::PageProps;

#[function_component]
pub fn GreetingView(props: &PageProps) -> Html {
    let api_base = props.config.api_base.clone();
    let onclick = move |_| {
        let connection = Connection::new(api_base.clone());
        spawn_local(async move {
            if let Ok(message) = greet(&connection).await {
                browser::alert(&message);
            }
        });
    };

    html! {
        <div>
            <button {onclick}>{ "Send Request" }</button>
        </div>
    }
}
