mod dom;
mod help;
mod prefs;

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::Document;
use yew::prelude::*;

use bicho_core::{HelpContext, HttpOutcomeSource, SharedSlot, Slot, SlotConfig, INITIAL_GRID};

pub use dom::{DomDisplay, DomReel, JsTimer};
pub use help::HelpModal;
pub use prefs::LocalStoragePreferences;

type WebSlot = Slot<HttpOutcomeSource, DomDisplay, DomReel, JsTimer>;

/// Bet clicks wait for the running round and apply to the next one; a spin
/// click while an autoplay chain runs is dropped.
type WebShared = Rc<SharedSlot<HttpOutcomeSource, DomDisplay, DomReel, JsTimer>>;

fn config() -> SlotConfig {
    let mut config = SlotConfig::default();
    if let Some(endpoint) = option_env!("BACKEND_URL") {
        config.endpoint = endpoint.to_string();
    }
    config
}

fn mount_slot(document: &Document, config: SlotConfig) -> Result<WebSlot, JsValue> {
    let container = document
        .get_element_by_id("slot")
        .ok_or_else(|| JsValue::from_str("missing #slot"))?;
    if config.inverted {
        container.class_list().add_1("inverted")?;
    }
    let reels = container.get_elements_by_class_name("reel");
    let mut surfaces = Vec::new();
    for i in 0..reels.length() {
        if let Some(el) = reels.item(i) {
            surfaces.push(DomReel::attach(&el, document)?);
        }
    }
    let display = DomDisplay::bind(document);
    let source = HttpOutcomeSource::new(config.endpoint.clone());
    let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
    Ok(Slot::new(config, source, display, JsTimer, surfaces, seed))
}

fn with_slot(slot: &Rc<std::cell::RefCell<Option<WebShared>>>, f: impl FnOnce(WebShared)) {
    match slot.borrow().clone() {
        Some(shared) => f(shared),
        None => tracing::debug!("slot not mounted yet"),
    }
}

#[function_component(App)]
fn app() -> Html {
    let slot = use_mut_ref(|| None::<WebShared>);
    let help_context = use_state(|| None::<HelpContext>);

    {
        let slot = slot.clone();
        let help_context = help_context.clone();
        use_effect_with((), move |_| {
            let document = web_sys::window().and_then(|w| w.document());
            match document.ok_or_else(|| JsValue::from_str("no document")).and_then(|d| mount_slot(&d, config())) {
                Ok(mounted) => {
                    help_context.set(Some(mounted.help_context()));
                    let shared = Rc::new(SharedSlot::new(mounted));
                    *slot.borrow_mut() = Some(shared.clone());
                    wasm_bindgen_futures::spawn_local(async move {
                        shared.lock().await.init().await;
                    });
                }
                Err(err) => tracing::error!(error = ?err, "cannot mount slot"),
            }
            || ()
        });
    }

    let on_spin = {
        let slot = slot.clone();
        Callback::from(move |_: MouseEvent| {
            with_slot(&slot, |shared| {
                wasm_bindgen_futures::spawn_local(async move {
                    if let Some(reports) = shared.play().await {
                        tracing::debug!(rounds = reports.len(), "spin finished");
                    }
                });
            })
        })
    };
    let on_bet_minus = {
        let slot = slot.clone();
        Callback::from(move |_: MouseEvent| {
            with_slot(&slot, |shared| {
                wasm_bindgen_futures::spawn_local(async move { shared.lock().await.bet_minus() });
            })
        })
    };
    let on_bet_plus = {
        let slot = slot.clone();
        Callback::from(move |_: MouseEvent| {
            with_slot(&slot, |shared| {
                wasm_bindgen_futures::spawn_local(async move { shared.lock().await.bet_plus() });
            })
        })
    };

    html! {
        <div class="machine">
            <div id="slot" class="slot">
                { for (0..INITIAL_GRID.len()).map(|_| html! { <div class="reel"></div> }) }
            </div>
            <div class="controls">
                <span class="label">{ "Saldo" }</span>
                <span id="balance" class="balance"></span>
                <button class="bet-minus" onclick={on_bet_minus}>{ "-" }</button>
                <span id="betValue" class="bet"></span>
                <button class="bet-plus" onclick={on_bet_plus}>{ "+" }</button>
                <button id="spin" class="spin" onclick={on_spin}>{ "GIRAR" }</button>
                <label class="autoplay">
                    <input id="autoplay" type="checkbox" />
                    { "Auto" }
                </label>
                <span id="win" class="win-amount"></span>
            </div>
            if let Some(context) = (*help_context).clone() {
                <HelpModal {context} />
            }
        </div>
    }
}

#[wasm_bindgen(start)]
pub fn run() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Debug).ok();
    yew::Renderer::<App>::new().render();
}
