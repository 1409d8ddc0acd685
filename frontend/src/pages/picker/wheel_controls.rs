use shared::wheel::SpinOutcome;
use yew::prelude::*;

use crate::styles;

#[derive(Properties, PartialEq)]
pub struct SpinButtonProps {
    pub is_spinning: bool,
    pub disabled: bool,
    pub onclick: Callback<MouseEvent>,
}

#[function_component(SpinButton)]
pub fn spin_button(props: &SpinButtonProps) -> Html {
    let button_text = if props.is_spinning { "Spinning..." } else { "Spin" };
    let is_disabled = props.is_spinning || props.disabled;

    let button_class = if is_disabled {
        "bg-gradient-to-r from-gray-400 to-gray-500 opacity-75 cursor-not-allowed text-white"
    } else {
        "bg-gradient-to-r from-yellow-400 to-orange-500 hover:from-yellow-500 hover:to-orange-600 text-white shadow-lg hover:shadow-xl transform hover:-translate-y-0.5 active:translate-y-0"
    };

    let spin_icon_class = if props.is_spinning {
        "inline-block mr-2 animate-spin"
    } else {
        "hidden"
    };

    html! {
        <div class={classes!(
            "relative",
            "overflow-hidden",
            "rounded-full",
            "w-full",
            button_class,
        )}>
            <button
                onclick={props.onclick.clone()}
                disabled={is_disabled}
                class="relative w-full px-8 py-4 font-bold text-lg transition-all duration-300 border-2 border-transparent hover:border-white focus:outline-none focus:ring-4 focus:ring-yellow-300 focus:ring-opacity-50 bg-transparent"
            >
                <div class="flex items-center justify-center relative z-10">
                    <svg class={spin_icon_class} xmlns="http://www.w3.org/2000/svg" width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2">
                        <circle cx="12" cy="12" r="10" />
                        <path d="M12 6v6l4 2" />
                    </svg>
                    <span>{button_text}</span>
                </div>
            </button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct PowerSliderProps {
    pub power: f64,
    pub disabled: bool,
    pub oninput: Callback<InputEvent>,
}

#[function_component(PowerSlider)]
pub fn power_slider(props: &PowerSliderProps) -> Html {
    html! {
        <div class="w-full max-w-[300px]">
            <div class="mb-1 flex justify-between items-center">
                <label class={styles::TEXT_LABEL}>{"Spin power"}</label>
                <span class="text-sm font-bold text-blue-600 dark:text-blue-400">
                    {format!("{}%", (props.power * 100.0).round() as u32)}
                </span>
            </div>
            <input
                type="range"
                min="0"
                max="100"
                step="1"
                value={((props.power * 100.0).round() as u32).to_string()}
                disabled={props.disabled}
                oninput={props.oninput.clone()}
                class="w-full h-2.5 rounded-full appearance-none cursor-pointer bg-gradient-to-r from-blue-400 to-purple-500 accent-yellow-400"
            />
            <div class="flex justify-between text-xs text-gray-500 dark:text-gray-400 mt-1">
                <span>{"Gentle (longer spin)"}</span>
                <span>{"Full power"}</span>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct WinnerDisplayProps {
    pub outcome: Option<SpinOutcome>,
    pub show: bool,
    pub on_acknowledge: Callback<MouseEvent>,
}

#[function_component(WinnerDisplay)]
pub fn winner_display(props: &WinnerDisplayProps) -> Html {
    if !props.show {
        return html! {};
    }

    let Some(outcome) = &props.outcome else {
        return html! {};
    };

    html! {
        <div class="mt-8 mb-4 flex flex-col items-center justify-center">
            <div class="flex items-center justify-center px-8 py-5 rounded-xl bg-gradient-to-r from-blue-400 to-purple-600 border-blue-300 text-white font-bold text-2xl shadow-lg border-2 transform transition-all duration-500 animate-bounce">
                <span>{format!("\u{1F389} {}", outcome.winning_label)}</span>
            </div>
            <button
                onclick={props.on_acknowledge.clone()}
                class={classes!(styles::BUTTON_PRIMARY, "mt-4")}
            >
                {"Got it"}
            </button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct RespinPromptProps {
    pub show: bool,
    pub on_dismiss: Callback<MouseEvent>,
}

#[function_component(RespinPrompt)]
pub fn respin_prompt(props: &RespinPromptProps) -> Html {
    if !props.show {
        return html! {};
    }

    html! {
        <div class="mt-8 mb-4 flex flex-col items-center justify-center">
            <div class="flex items-center justify-center px-8 py-5 rounded-xl bg-gradient-to-r from-orange-400 to-orange-600 border-orange-300 text-white font-bold text-2xl shadow-lg border-2 animate-pulse">
                <span>{"\u{1F504} Re-spin!"}</span>
            </div>
            <p class={classes!(styles::TEXT_SMALL, "mt-3")}>
                {"The wheel landed on the re-spin segment. Give it another go."}
            </p>
            <button
                onclick={props.on_dismiss.clone()}
                class={classes!(styles::BUTTON_SECONDARY, "mt-4")}
            >
                {"Ready"}
            </button>
        </div>
    }
}
