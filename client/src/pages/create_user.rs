use std::rc::Rc;

use common::create_user;
use common::network::Connection;
use common::FormFields;
use web_sys::HtmlInputElement;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::browser::{self, BrowserSession};
use crate::pages::PageProps;

pub struct CreateUserView {
    connection: Rc<Connection>,
    username: String,
}

pub enum CreateUserMessage {
    UsernameChanged(String),
    Submit,
}

impl CreateUserView {
    fn fields(&self) -> FormFields {
        FormFields::from([("Username".to_string(), self.username.clone())])
    }
}

impl Component for CreateUserView {
    type Message = CreateUserMessage;
    type Properties = PageProps;

    fn create(ctx: &Context<Self>) -> Self {
        Self {
            connection: Rc::new(Connection::new(ctx.props().config.api_base.clone())),
            username: String::new(),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            CreateUserMessage::UsernameChanged(username) => {
                self.username = username;
                true
            }
            CreateUserMessage::Submit => {
                let connection = self.connection.clone();
                let fields = self.fields();
                spawn_local(async move {
                    let mut session = BrowserSession;
                    // failures are already logged by the controller
                    if let Ok(created) = create_user::submit(connection.as_ref(), &mut session, &fields).await {
                        browser::alert(&created.alert);
                        if let Err(e) = browser::navigate(created.redirect) {
                            tracing::error!("Error creating user: {e}");
                        }
                    }
                });
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let onsubmit = ctx.link().callback(|e: SubmitEvent| {
            e.prevent_default();
            CreateUserMessage::Submit
        });
        let oninput = ctx.link().callback(|e: InputEvent| {
            CreateUserMessage::UsernameChanged(e.target_unchecked_into::<HtmlInputElement>().value())
        });

        html!(
            <form id="createUserForm" {onsubmit}>
                <label for="username">{ "Username" }</label>
                <input type="text" id="username" name="Username" required=true value={self.username.clone()} {oninput} />
                <button type="submit">{ "Create User" }</button>
            </form>
        )
    }
}
