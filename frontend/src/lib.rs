pub mod config;
pub mod pages;
pub mod storage;
pub mod styles;
pub mod sync;

use yew::prelude::*;
use yew_router::prelude::*;

use crate::pages::{picker::Picker, shared_config::SharedConfig};
use shared::session::DeviceType;
use shared::wheel_api::UpsertSessionRequest;

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/shared/:slug")]
    Shared { slug: String },
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn detect_device_type() -> DeviceType {
    let user_agent = web_sys::window()
        .and_then(|w| w.navigator().user_agent().ok())
        .unwrap_or_default();
    if user_agent.is_empty() {
        DeviceType::Unknown
    } else if user_agent.contains("Mobi") {
        DeviceType::Mobile
    } else {
        DeviceType::Desktop
    }
}

#[function_component(App)]
pub fn app() -> Html {
    // Register the session and keep the sync queue draining for the
    // lifetime of the app.
    use_effect_with((), move |_| {
        let request = UpsertSessionRequest {
            session_id: storage::session_id(),
            team_name: None,
            input_method: None,
            device_type: Some(detect_device_type()),
        };
        sync::enqueue("/sessions", &request);

        let sync_handle = sync::start();
        move || {
            drop(sync_handle);
        }
    });

    html! {
        <BrowserRouter>
            <div class="min-h-screen w-full">
                <div class="mx-auto">
                    <Switch<Route> render={switch} />
                </div>
            </div>
        </BrowserRouter>
    }
}

pub fn switch(route: Route) -> Html {
    match route {
        Route::Home => html! { <Picker /> },
        Route::Shared { slug } => html! { <SharedConfig {slug} /> },
        Route::NotFound => html! { <Picker /> },
    }
}
