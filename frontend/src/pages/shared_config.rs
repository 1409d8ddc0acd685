use gloo::net::http::Request;
use shared::constants::NETWORK_ERROR;
use shared::session::InputMethod;
use shared::wheel_api::{SharedConfigurationResponse, UpsertSessionRequest};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::{config, storage, styles, sync, Route};

#[derive(Properties, PartialEq)]
pub struct SharedConfigProps {
    pub slug: String,
}

#[function_component(SharedConfig)]
pub fn shared_config(props: &SharedConfigProps) -> Html {
    let loading = use_state(|| true);
    let error_message = use_state(String::new);
    let configuration = use_state(|| None::<SharedConfigurationResponse>);
    let navigator = use_navigator();

    {
        let slug = props.slug.clone();
        let loading = loading.clone();
        let error_message = error_message.clone();
        let configuration = configuration.clone();

        use_effect_with(slug, move |slug| {
            let slug = slug.clone();
            spawn_local(async move {
                let url = format!("{}/api/shared/{}", config::get_api_base_url(), slug);
                match Request::get(&url).send().await {
                    Ok(response) if response.ok() => {
                        match response.json::<SharedConfigurationResponse>().await {
                            Ok(body) => configuration.set(Some(body)),
                            Err(e) => {
                                log::warn!("Malformed shared configuration response: {}", e);
                                error_message.set(NETWORK_ERROR.to_string());
                            }
                        }
                    }
                    Ok(response) if response.status() == 404 => {
                        error_message
                            .set("This share link does not exist or has expired".to_string());
                    }
                    Ok(response) => {
                        log::warn!(
                            "Shared configuration fetch returned status {}",
                            response.status()
                        );
                        error_message.set(NETWORK_ERROR.to_string());
                    }
                    Err(e) => {
                        log::warn!("Shared configuration fetch failed: {}", e);
                        error_message.set(NETWORK_ERROR.to_string());
                    }
                }
                loading.set(false);
            });
            || ()
        });
    }

    let load_into_wheel = {
        let configuration = configuration.clone();
        let navigator = navigator.clone();

        Callback::from(move |_| {
            let Some(configuration) = &*configuration else {
                return;
            };
            storage::save_names(&configuration.names);
            storage::save_configuration_id(configuration.configuration_id);
            sync::enqueue(
                "/sessions",
                &UpsertSessionRequest {
                    session_id: storage::session_id(),
                    team_name: configuration.team_name.clone(),
                    input_method: Some(InputMethod::SharedLink),
                    device_type: None,
                },
            );
            if let Some(navigator) = &navigator {
                navigator.push(&Route::Home);
            }
        })
    };

    html! {
        <div class="container mx-auto px-4 py-8">
            <h1 class="text-3xl font-bold mb-6 text-center text-gray-900 dark:text-white">
                <span class="bg-clip-text text-transparent bg-gradient-to-r from-blue-400 to-purple-500">{"Shared Wheel"}</span>
            </h1>

            <div class={classes!(styles::CARD, "max-w-xl", "mx-auto")}>
                if *loading {
                    <div class="flex justify-center py-8">
                        <div class={styles::LOADING_SPINNER}></div>
                    </div>
                } else if !(*error_message).is_empty() {
                    <div class={styles::CARD_ERROR}>{&*error_message}</div>
                } else if let Some(configuration) = &*configuration {
                    <div>
                        if let Some(team_name) = &configuration.team_name {
                            <h3 class={styles::TEXT_H3}>{team_name}</h3>
                        }
                        <p class={classes!(styles::TEXT_SMALL, "mt-1")}>
                            {format!("{} names on this wheel", configuration.segment_count)}
                        </p>
                        <ul class="mt-4 space-y-1">
                            { for configuration.names.iter().map(|name| html! {
                                <li class={styles::TEXT_BODY}>{name}</li>
                            }) }
                        </ul>
                        <button
                            onclick={load_into_wheel}
                            class={classes!(styles::BUTTON_PRIMARY, "w-full", "mt-6")}
                        >
                            {"Load into wheel"}
                        </button>
                    </div>
                }
            </div>
        </div>
    }
}
