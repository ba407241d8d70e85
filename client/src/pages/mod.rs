pub mod create_user;
pub mod dashboard;
pub mod greeting;

use common::config::ClientConfig;
use yew::Properties;

#[derive(Properties, PartialEq)]
pub struct PageProps {
    pub config: ClientConfig,
}
