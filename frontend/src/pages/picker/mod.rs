mod wheel_canvas;
mod wheel_controls;

use std::cell::RefCell;
use std::rc::Rc;

use gloo::net::http::Request;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use shared::constants::{EMPTY_WHEEL_ERROR, INVALID_NAMES_ERROR, NETWORK_ERROR};
use shared::session::{AckMethod, InputMethod, SessionEvent};
use shared::wheel::{ease_out_quart, resolve_spin, spin_duration_ms, SpinOutcome, WheelSpec};
use shared::wheel_api::{
    AcknowledgeSpinRequest, RecordSpinRequest, SaveConfigurationRequest,
    ShareConfigurationRequest, ShareConfigurationResponse, UpsertSessionRequest,
};
use uuid::Uuid;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::config::get_share_url;
use crate::pages::picker::wheel_canvas::WheelCanvas;
use crate::pages::picker::wheel_controls::{PowerSlider, RespinPrompt, SpinButton, WinnerDisplay};
use crate::{config, storage, styles, sync};

const DEFAULT_NAMES: [&str; 4] = ["Alice", "Bob", "Charlie", "Dana"];

fn initial_labels() -> Vec<String> {
    storage::load_names()
        .filter(|names| !names.is_empty())
        .unwrap_or_else(|| DEFAULT_NAMES.iter().map(|s| s.to_string()).collect())
}

fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

fn acknowledge(
    method: AckMethod,
    last_spin_id: &UseStateHandle<Option<Uuid>>,
    show_winner: &UseStateHandle<bool>,
) {
    if let Some(spin_id) = **last_spin_id {
        storage::record_event(SessionEvent::Acknowledged {
            spin_id,
            method,
            timestamp_ms: now_ms(),
        });
        sync::enqueue(
            &format!("/spins/{}/acknowledge", spin_id),
            &AcknowledgeSpinRequest {
                method,
                timestamp_ms: now_ms(),
            },
        );
    }
    show_winner.set(false);
}

#[function_component(Picker)]
pub fn picker() -> Html {
    let labels = use_state(initial_labels);
    let names_text = use_state(|| initial_labels().join("\n"));
    let was_pasted = use_state(|| false);
    let configuration_id = use_state(storage::load_configuration_id);

    let rotation = use_state(|| 0.0_f64);
    let power = use_state(|| 0.5_f64);
    let is_spinning = use_state(|| false);
    let last_outcome = use_state(|| None::<SpinOutcome>);
    let last_spin_id = use_state(|| None::<Uuid>);
    let show_winner = use_state(|| false);
    let respin_required = use_state(|| false);
    let spin_count = use_state(|| storage::load_session_log().spin_count());

    let error_message = use_state(String::new);
    let team_name = use_state(String::new);
    let share_slug = use_state(|| None::<String>);
    let share_pending = use_state(|| false);

    let on_names_input = {
        let names_text = names_text.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlTextAreaElement>() {
                names_text.set(input.value());
            }
        })
    };

    let on_names_paste = {
        let was_pasted = was_pasted.clone();
        Callback::from(move |_: Event| {
            was_pasted.set(true);
        })
    };

    let on_team_name_input = {
        let team_name = team_name.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                team_name.set(input.value());
            }
        })
    };

    let on_power_input = {
        let power = power.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                if let Ok(percent) = input.value().parse::<f64>() {
                    power.set((percent / 100.0).clamp(0.0, 1.0));
                }
            }
        })
    };

    let apply_names = {
        let labels = labels.clone();
        let names_text = names_text.clone();
        let was_pasted = was_pasted.clone();
        let configuration_id = configuration_id.clone();
        let share_slug = share_slug.clone();
        let error_message = error_message.clone();
        let is_spinning = is_spinning.clone();

        Callback::from(move |_| {
            if *is_spinning {
                return;
            }

            let parsed: Vec<String> = names_text
                .lines()
                .map(|line| line.trim().to_string())
                .filter(|line| !line.is_empty())
                .collect();

            if parsed.is_empty() {
                error_message.set(EMPTY_WHEEL_ERROR.to_string());
                return;
            }
            if shared::validation::validate_segment_labels(&parsed).is_err() {
                error_message.set(INVALID_NAMES_ERROR.to_string());
                return;
            }
            error_message.set(String::new());

            let new_configuration_id = Uuid::new_v4();
            let session_log = storage::record_event(SessionEvent::ConfigSaved {
                configuration_id: new_configuration_id,
                names: parsed.clone(),
                segment_count: parsed.len(),
                timestamp_ms: now_ms(),
            });
            storage::save_names(&parsed);
            storage::save_configuration_id(new_configuration_id);

            sync::enqueue(
                "/configurations",
                &SaveConfigurationRequest {
                    configuration_id: new_configuration_id,
                    session_id: session_log.session_id,
                    names: parsed.clone(),
                    segment_count: parsed.len(),
                },
            );
            let input_method = if *was_pasted {
                InputMethod::Pasted
            } else {
                InputMethod::Typed
            };
            sync::enqueue(
                "/sessions",
                &UpsertSessionRequest {
                    session_id: session_log.session_id,
                    team_name: None,
                    input_method: Some(input_method),
                    device_type: None,
                },
            );

            labels.set(parsed);
            configuration_id.set(Some(new_configuration_id));
            share_slug.set(None);
            was_pasted.set(false);
        })
    };

    let on_acknowledge = {
        let last_spin_id = last_spin_id.clone();
        let show_winner = show_winner.clone();
        Callback::from(move |_| {
            acknowledge(AckMethod::Click, &last_spin_id, &show_winner);
        })
    };

    let on_respin_ready = {
        let respin_required = respin_required.clone();
        Callback::from(move |_| {
            respin_required.set(false);
        })
    };

    let start_spin = {
        let labels = labels.clone();
        let rotation = rotation.clone();
        let power = power.clone();
        let is_spinning = is_spinning.clone();
        let last_outcome = last_outcome.clone();
        let last_spin_id = last_spin_id.clone();
        let show_winner = show_winner.clone();
        let respin_required = respin_required.clone();
        let spin_count = spin_count.clone();
        let error_message = error_message.clone();
        let configuration_id = configuration_id.clone();

        Callback::from(move |_| {
            if *is_spinning {
                return;
            }

            let spec = match WheelSpec::new((*labels).clone()) {
                Ok(spec) => spec,
                Err(_) => {
                    error_message.set(EMPTY_WHEEL_ERROR.to_string());
                    return;
                }
            };

            // Starting a new spin while the previous winner is still on
            // screen counts as an implicit acknowledgement.
            if *show_winner {
                acknowledge(AckMethod::Auto, &last_spin_id, &show_winner);
            }

            error_message.set(String::new());
            respin_required.set(false);
            is_spinning.set(true);

            // The outcome is fixed before a single frame is drawn; the
            // animation only chases it.
            let mut rng = SmallRng::from_entropy();
            let outcome = resolve_spin(&spec, *power, *rotation, &mut rng);

            let spin_id = Uuid::new_v4();
            let session_log = storage::record_event(SessionEvent::Spin {
                spin_id,
                configuration_id: *configuration_id,
                winner_label: outcome.winning_label.clone(),
                is_respin: outcome.is_respin,
                power: *power,
                timestamp_ms: now_ms(),
            });
            spin_count.set(session_log.spin_count());
            last_spin_id.set(Some(spin_id));

            sync::enqueue(
                "/spins",
                &RecordSpinRequest {
                    spin_id,
                    session_id: session_log.session_id,
                    configuration_id: *configuration_id,
                    winner_label: outcome.winning_label.clone(),
                    is_respin: outcome.is_respin,
                    power: *power,
                    timestamp_ms: now_ms(),
                },
            );

            // Animate toward the resolved rotation target.
            let start_time = js_sys::Date::now();
            let duration = spin_duration_ms(*power);
            let start_rotation = *rotation;
            let rotation_change = outcome.final_rotation - start_rotation;

            let rotation = rotation.clone();
            let is_spinning = is_spinning.clone();
            let last_outcome = last_outcome.clone();
            let show_winner = show_winner.clone();
            let respin_required = respin_required.clone();

            let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
            let g = f.clone();

            *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
                let elapsed = js_sys::Date::now() - start_time;
                let progress = (elapsed / duration).min(1.0);
                let eased_progress = ease_out_quart(progress);
                rotation.set(start_rotation + rotation_change * eased_progress);

                if elapsed < duration {
                    if let Some(window) = web_sys::window() {
                        let _ = window.request_animation_frame(
                            f.borrow().as_ref().unwrap().as_ref().unchecked_ref(),
                        );
                    }
                } else {
                    // Settle exactly on the resolved target so the next spin
                    // starts from the recorded rotation.
                    rotation.set(outcome.final_rotation);
                    is_spinning.set(false);
                    if outcome.is_respin {
                        respin_required.set(true);
                    } else {
                        show_winner.set(true);
                    }
                    last_outcome.set(Some(outcome.clone()));
                }
            }) as Box<dyn FnMut()>));

            if let Some(window) = web_sys::window() {
                let _ = window.request_animation_frame(
                    g.borrow().as_ref().unwrap().as_ref().unchecked_ref(),
                );
            }
        })
    };

    let share = {
        let configuration_id = configuration_id.clone();
        let team_name = team_name.clone();
        let share_slug = share_slug.clone();
        let share_pending = share_pending.clone();
        let error_message = error_message.clone();

        Callback::from(move |_| {
            let Some(configuration_id) = *configuration_id else {
                error_message.set("Apply your name list before sharing".to_string());
                return;
            };
            if *share_pending {
                return;
            }
            share_pending.set(true);

            let trimmed = team_name.trim().to_string();
            let team_name = (!trimmed.is_empty()).then_some(trimmed);

            // The share page reads the team name off the session record.
            if team_name.is_some() {
                sync::enqueue(
                    "/sessions",
                    &UpsertSessionRequest {
                        session_id: storage::session_id(),
                        team_name: team_name.clone(),
                        input_method: None,
                        device_type: None,
                    },
                );
            }

            let request_body = ShareConfigurationRequest { team_name };

            let share_slug = share_slug.clone();
            let share_pending = share_pending.clone();
            let error_message = error_message.clone();

            spawn_local(async move {
                let url = format!(
                    "{}/api/configurations/{}/share",
                    config::get_api_base_url(),
                    configuration_id
                );
                let result = match Request::post(&url).json(&request_body) {
                    Ok(request) => request.send().await,
                    Err(e) => {
                        log::warn!("Failed to build share request: {}", e);
                        share_pending.set(false);
                        error_message.set(NETWORK_ERROR.to_string());
                        return;
                    }
                };
                match result {
                    Ok(response) if response.ok() => {
                        match response.json::<ShareConfigurationResponse>().await {
                            Ok(body) => {
                                error_message.set(String::new());
                                share_slug.set(Some(body.share_slug));
                            }
                            Err(e) => {
                                log::warn!("Malformed share response: {}", e);
                                error_message.set(NETWORK_ERROR.to_string());
                            }
                        }
                    }
                    Ok(response) => {
                        log::warn!("Share request returned status {}", response.status());
                        error_message.set(format!(
                            "Could not create a share link (status {})",
                            response.status()
                        ));
                    }
                    Err(e) => {
                        log::warn!("Share request failed: {}", e);
                        error_message.set(NETWORK_ERROR.to_string());
                    }
                }
                share_pending.set(false);
            });
        })
    };

    html! {
        <div class="container mx-auto px-4 py-8">
            <h1 class="text-3xl font-bold mb-6 text-center text-gray-900 dark:text-white">
                <span class="bg-clip-text text-transparent bg-gradient-to-r from-blue-400 to-purple-500">{"Name Wheel"}</span>
            </h1>

            <div class="grid grid-cols-1 lg:grid-cols-3 gap-6 max-w-6xl mx-auto">
                <div class={classes!(styles::CARD, "lg:col-span-2")}>
                    <div class="relative mx-auto mb-6 flex justify-center items-center">
                        <div class="w-full max-w-[450px] mx-auto">
                            <WheelCanvas
                                labels={(*labels).clone()}
                                rotation={*rotation}
                                is_spinning={*is_spinning}
                            />
                        </div>
                    </div>

                    if !(*error_message).is_empty() {
                        <div class="mb-4 text-center">
                            <p class="text-red-500 bg-red-50 dark:bg-red-900/20 p-3 rounded-lg">{&*error_message}</p>
                        </div>
                    }

                    <div class="flex flex-col items-center gap-4 mt-2">
                        <PowerSlider power={*power} disabled={*is_spinning} oninput={on_power_input} />
                        <div class="w-full max-w-[300px]">
                            <SpinButton
                                is_spinning={*is_spinning}
                                disabled={*respin_required}
                                onclick={start_spin}
                            />
                        </div>
                        <p class={styles::TEXT_SMALL}>
                            {format!("Spins this session: {}", *spin_count)}
                        </p>
                    </div>

                    <WinnerDisplay
                        outcome={(*last_outcome).clone()}
                        show={*show_winner}
                        on_acknowledge={on_acknowledge}
                    />
                    <RespinPrompt show={*respin_required} on_dismiss={on_respin_ready} />
                </div>

                <div class={styles::CARD}>
                    <h3 class={styles::TEXT_H3}>{"Names"}</h3>
                    <p class={classes!(styles::TEXT_SMALL, "mt-1")}>
                        {"One name per line. Add a line reading RESPIN for a try-again segment."}
                    </p>
                    <textarea
                        rows="10"
                        class={styles::INPUT}
                        value={(*names_text).clone()}
                        oninput={on_names_input}
                        onpaste={on_names_paste}
                        disabled={*is_spinning}
                    />
                    <button
                        onclick={apply_names}
                        disabled={*is_spinning}
                        class={classes!(styles::BUTTON_PRIMARY, "w-full", "mt-4")}
                    >
                        {"Apply names"}
                    </button>

                    <div class="mt-8">
                        <h3 class={styles::TEXT_H3}>{"Share"}</h3>
                        <label class={classes!(styles::TEXT_LABEL, "mt-2")}>{"Team name (optional)"}</label>
                        <input
                            type="text"
                            class={styles::INPUT}
                            placeholder="e.g. Platform Team"
                            value={(*team_name).clone()}
                            oninput={on_team_name_input}
                        />
                        <button
                            onclick={share}
                            disabled={*share_pending || configuration_id.is_none()}
                            class={classes!(styles::BUTTON_SECONDARY, "w-full", "mt-4")}
                        >
                            { if *share_pending { "Creating link..." } else { "Create share link" } }
                        </button>

                        if let Some(slug) = &*share_slug {
                            <div class="mt-4">
                                <label class={styles::TEXT_LABEL}>{"Share link"}</label>
                                <input
                                    type="text"
                                    readonly={true}
                                    class={styles::INPUT}
                                    value={get_share_url(slug)}
                                />
                            </div>
                        }
                    </div>
                </div>
            </div>
        </div>
    }
}
