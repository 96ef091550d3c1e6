use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{HtmlInputElement, KeyboardEvent};
use yew::prelude::*;

use bicho_core::{asset_url, HelpContext, HelpOverlay, HelpTab, Timer, CLOSE_ANIMATION, OPEN_ANIMATION, STARTUP_DELAY};

use crate::dom::JsTimer;
use crate::prefs::LocalStoragePreferences;

type SharedOverlay = Rc<RefCell<HelpOverlay<LocalStoragePreferences>>>;

/// `visible` drives `display`, `animated` drives the `open` class; the gap
/// between the two lets the CSS transition run.
#[derive(Clone)]
struct Modal {
    overlay: SharedOverlay,
    visible: UseStateHandle<bool>,
    animated: UseStateHandle<bool>,
    redraw: UseForceUpdateHandle,
}

impl Modal {
    fn open(&self) {
        self.overlay.borrow_mut().open();
        self.visible.set(true);
        let animated = self.animated.clone();
        wasm_bindgen_futures::spawn_local(async move {
            JsTimer.sleep(OPEN_ANIMATION).await;
            animated.set(true);
        });
    }

    fn close(&self) {
        self.overlay.borrow_mut().close();
        self.finish_close();
    }

    fn finish_close(&self) {
        self.animated.set(false);
        let visible = self.visible.clone();
        wasm_bindgen_futures::spawn_local(async move {
            JsTimer.sleep(CLOSE_ANIMATION).await;
            visible.set(false);
        });
    }

    fn escape(&self) {
        let closed = self.overlay.borrow_mut().on_escape();
        if closed {
            self.finish_close();
        }
    }

    fn switch_tab(&self, tab: HelpTab) {
        self.overlay.borrow_mut().switch_tab(tab);
        self.redraw.force_update();
    }
}

#[derive(Properties, PartialEq)]
pub struct HelpProps {
    pub context: HelpContext,
}

fn tab_title(tab: HelpTab) -> &'static str {
    match tab {
        HelpTab::Symbols => "Símbolos",
        HelpTab::Paylines => "Linhas",
        HelpTab::Rules => "Regras",
    }
}

fn tab_body(tab: HelpTab, ctx: &HelpContext) -> Html {
    match tab {
        HelpTab::Symbols => html! {
            <div class="symbol-grid">
                { for ctx.symbols.iter().map(|name| html! {
                    <div class="symbol-info">
                        if let Some(url) = asset_url(name) {
                            <img src={url} alt={name.clone()} />
                        }
                        <span class="symbol-name">{ name.clone() }</span>
                    </div>
                }) }
            </div>
        },
        HelpTab::Paylines => html! {
            <p>{ format!(
                "Combinações de {} ou mais símbolos iguais, da esquerda para a direita, em {} rolos de {} linhas.",
                ctx.min_win_length, ctx.reels, ctx.rows,
            ) }</p>
        },
        HelpTab::Rules => html! {
            <ul>
                <li>{ "Ajuste a aposta com + e -, depois gire." }</li>
                <li>{ "As combinações vencedoras ficam destacadas após o giro." }</li>
                <li>{ format!(
                    "{} ou mais Scatters dão giros grátis; ganhos multiplicados por {}.",
                    ctx.scatter_threshold, ctx.free_spin_multiplier,
                ) }</li>
                <li>{ "Com o Auto marcado a máquina continua girando até você desmarcar ou o saldo acabar." }</li>
            </ul>
        },
    }
}

/// Help button plus tabbed modal. Opens by itself on startup unless the
/// player unticked "show on startup".
#[function_component(HelpModal)]
pub fn help_modal(props: &HelpProps) -> Html {
    let overlay = {
        let context = props.context.clone();
        use_mut_ref(move || HelpOverlay::new(context, LocalStoragePreferences::new()))
    };
    let modal = Modal {
        overlay,
        visible: use_state(|| false),
        animated: use_state(|| false),
        redraw: use_force_update(),
    };

    {
        let modal = modal.clone();
        use_effect_with((), move |_| {
            if modal.overlay.borrow().show_on_startup() {
                let startup = modal.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    JsTimer.sleep(STARTUP_DELAY).await;
                    startup.open();
                });
            }

            let listener = web_sys::window().and_then(|w| w.document()).map(|document| {
                EventListener::new(&document, "keydown", move |event| {
                    let escape = event
                        .dyn_ref::<KeyboardEvent>()
                        .is_some_and(|key| key.key() == "Escape");
                    if escape {
                        modal.escape();
                    }
                })
            });
            move || drop(listener)
        });
    }

    let on_open = {
        let modal = modal.clone();
        Callback::from(move |_: MouseEvent| modal.open())
    };
    let on_close = {
        let modal = modal.clone();
        Callback::from(move |_: MouseEvent| modal.close())
    };
    let on_backdrop = {
        let modal = modal.clone();
        Callback::from(move |_: MouseEvent| modal.close())
    };
    let keep_open = Callback::from(|e: MouseEvent| e.stop_propagation());
    let on_startup_toggle = {
        let overlay = modal.overlay.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            overlay.borrow_mut().set_show_on_startup(input.checked());
        })
    };

    let (active, show_on_startup, context) = {
        let overlay = modal.overlay.borrow();
        (overlay.tab(), overlay.show_on_startup(), overlay.context().clone())
    };
    let style = if *modal.visible { "display: flex" } else { "display: none" };
    let class = classes!("help-modal", (*modal.animated).then_some("open"));

    html! {
        <>
            <div id="helpButton" class="help-button" title="Game Help" onclick={on_open}>
                <span>{ "?" }</span>
            </div>
            <div id="helpModal" {class} {style} onclick={on_backdrop}>
                <div class="help-content" onclick={keep_open}>
                    <button class="close-help" onclick={on_close}>{ "×" }</button>
                    <h2>{ "Como jogar" }</h2>
                    <div class="help-tabs">
                        { for HelpTab::ALL.into_iter().map(|tab| {
                            let modal = modal.clone();
                            let onclick = Callback::from(move |_: MouseEvent| modal.switch_tab(tab));
                            html! {
                                <button
                                    class={classes!("help-tab", (tab == active).then_some("active"))}
                                    data-tab={tab.key()}
                                    {onclick}
                                >{ tab_title(tab) }</button>
                            }
                        }) }
                    </div>
                    <div class="help-tab-content active" id={format!("{}-tab", active.key())}>
                        { tab_body(active, &context) }
                    </div>
                    <label class="show-on-startup">
                        <input type="checkbox" checked={show_on_startup} onchange={on_startup_toggle} />
                        { "Mostrar ao iniciar" }
                    </label>
                </div>
            </div>
        </>
    }
}
