use std::time::Duration;

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use gloo::events::EventListener;
use gloo::timers::future::TimeoutFuture;
use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Animation, AnimationPlayState, Document, Element, HtmlButtonElement, HtmlElement,
    HtmlImageElement, HtmlInputElement,
};

use bicho_core::{ReelSurface, SlotDisplay, SpinMotion, SymbolView, Timer, DEPOSIT_URL};

fn warn_on_err<T>(what: &str, res: Result<T, JsValue>) {
    if let Err(err) = res {
        tracing::warn!(error = ?err, "{what} failed");
    }
}

pub struct JsTimer;

impl Timer for JsTimer {
    type Sleep = TimeoutFuture;

    fn sleep(&self, duration: Duration) -> Self::Sleep {
        TimeoutFuture::new(duration.as_millis().min(u32::MAX as u128) as u32)
    }
}

/// CSS `top` at the end of a spin: `windows` visible windows up.
pub fn travel_css(windows: f64) -> String {
    format!("calc({windows} * -100%)")
}

fn keyframe(props: &[(&str, JsValue)]) -> Result<Object, JsValue> {
    let frame = Object::new();
    for (key, value) in props {
        Reflect::set(&frame, &JsValue::from_str(key), value)?;
    }
    Ok(frame)
}

/// One `.reel` column: an `.icons` strip of `<img>` nodes and the Web
/// Animations API handle that scrolls it.
pub struct DomReel {
    document: Document,
    icons: HtmlElement,
    animation: Option<Animation>,
}

impl DomReel {
    pub fn attach(container: &Element, document: &Document) -> Result<Self, JsValue> {
        let icons: HtmlElement = document.create_element("div")?.dyn_into()?;
        icons.class_list().add_1("icons")?;
        container.append_child(&icons)?;
        Ok(Self {
            document: document.clone(),
            icons,
            animation: None,
        })
    }

    fn build_animation(&self, motion: SpinMotion) -> Result<Animation, JsValue> {
        let frames = Array::new();
        frames.push(&JsValue::from(keyframe(&[
            ("top", JsValue::from_str("0")),
            ("filter", JsValue::from_str("blur(0)")),
        ])?));
        frames.push(&JsValue::from(keyframe(&[
            ("filter", JsValue::from_str("blur(2px)")),
            ("offset", JsValue::from_f64(0.5)),
        ])?));
        frames.push(&JsValue::from(keyframe(&[
            ("top", JsValue::from_str(&travel_css(motion.windows))),
            ("filter", JsValue::from_str("blur(0)")),
        ])?));

        let options = Object::new();
        Reflect::set(
            &options,
            &JsValue::from_str("duration"),
            &JsValue::from_f64(motion.duration.as_secs_f64() * 1000.0),
        )?;
        Reflect::set(&options, &JsValue::from_str("easing"), &JsValue::from_str("ease-in-out"))?;

        let animate: Function = Reflect::get(&self.icons, &JsValue::from_str("animate"))?.dyn_into()?;
        let animation: Animation = animate.call2(&self.icons, &frames, &options)?.dyn_into()?;
        animation.cancel();
        Ok(animation)
    }

    fn animation_for(&mut self, motion: SpinMotion) -> Result<Animation, JsValue> {
        if let Some(animation) = &self.animation {
            return Ok(animation.clone());
        }
        let animation = self.build_animation(motion)?;
        self.animation = Some(animation.clone());
        Ok(animation)
    }

    fn symbol_node(&self, symbol: &SymbolView) -> Result<HtmlImageElement, JsValue> {
        let img: HtmlImageElement = self.document.create_element("img")?.dyn_into()?;
        if let Some(url) = symbol.url() {
            img.set_src(url);
        }
        img.set_alt(symbol.name());
        Ok(img)
    }
}

impl ReelSurface for DomReel {
    type Settled = LocalBoxFuture<'static, ()>;

    fn append(&mut self, symbols: &[SymbolView]) {
        let fragment = self.document.create_document_fragment();
        for symbol in symbols {
            match self.symbol_node(symbol) {
                Ok(img) => warn_on_err("append symbol", fragment.append_child(&img).map(|_| ())),
                Err(err) => warn_on_err::<()>("create symbol", Err(err)),
            }
        }
        warn_on_err("append strip", self.icons.append_child(&fragment).map(|_| ()));
    }

    fn remove_leading(&mut self, count: usize) {
        for _ in 0..count {
            match self.icons.first_element_child() {
                Some(first) => first.remove(),
                None => break,
            }
        }
    }

    fn clear_highlights(&mut self) {
        let children = self.icons.children();
        for i in 0..children.length() {
            if let Some(child) = children.item(i) {
                warn_on_err("clear highlight", child.class_list().remove_1("win"));
            }
        }
    }

    fn add_highlight(&mut self, row: usize) {
        if let Some(child) = self.icons.children().item(row as u32) {
            warn_on_err("highlight", child.class_list().add_1("win"));
        }
    }

    fn cancel_animation(&mut self) {
        if let Some(animation) = &self.animation {
            animation.cancel();
        }
    }

    fn play_animation(&mut self, motion: SpinMotion) -> Self::Settled {
        // Without a handle or a finished promise only the fallback timer can
        // settle the reel.
        let animation = match self.animation_for(motion) {
            Ok(animation) => animation,
            Err(err) => {
                tracing::warn!(error = ?err, "cannot create reel animation");
                return futures::future::pending::<()>().boxed_local();
            }
        };
        warn_on_err("play", animation.play());
        match animation.finished() {
            Ok(promise) => async move {
                // Rejects when the next spin cancels this run.
                if JsFuture::from(promise).await.is_err() {
                    tracing::debug!("reel animation cancelled");
                }
            }
            .boxed_local(),
            Err(_) => futures::future::pending::<()>().boxed_local(),
        }
    }

    fn animation_finished(&self) -> bool {
        self.animation
            .as_ref()
            .map_or(true, |a| a.play_state() == AnimationPlayState::Finished)
    }

    fn finish_animation(&mut self) {
        if let Some(animation) = &self.animation {
            warn_on_err("finish", animation.finish());
        }
    }
}

/// Balance, bet and win labels plus the spin/autoplay controls, looked up by
/// id once. Any of them may be absent.
pub struct DomDisplay {
    document: Document,
    balance: Option<Element>,
    bet: Option<Element>,
    win: Option<HtmlElement>,
    spin: Option<HtmlButtonElement>,
    autoplay: Option<HtmlInputElement>,
}

impl DomDisplay {
    pub fn bind(document: &Document) -> Self {
        Self {
            document: document.clone(),
            balance: document.get_element_by_id("balance"),
            bet: document.get_element_by_id("betValue"),
            win: document
                .get_element_by_id("win")
                .and_then(|e| e.dyn_into().ok()),
            spin: document
                .get_element_by_id("spin")
                .and_then(|e| e.dyn_into().ok()),
            autoplay: document
                .get_element_by_id("autoplay")
                .and_then(|e| e.dyn_into().ok()),
        }
    }

    fn deposit_message(&self) -> Result<(), JsValue> {
        let msg: HtmlElement = self.document.create_element("div")?.dyn_into()?;
        msg.set_id("deposit-message");
        let style = msg.style();
        for (prop, value) in [
            ("position", "absolute"),
            ("top", "50%"),
            ("left", "50%"),
            ("transform", "translate(-50%, -50%)"),
            ("background", "#333"),
            ("padding", "20px"),
            ("color", "white"),
            ("border", "2px solid #000"),
            ("text-align", "center"),
            ("width", "580px"),
        ] {
            style.set_property(prop, value)?;
        }
        msg.set_inner_html(
            r#"<p>Saldo insuficiente!!</p><button id="deposit-btn">Ir para Depósitos</button>"#,
        );
        let body = self.document.body().ok_or_else(|| JsValue::from_str("no body"))?;
        body.append_child(&msg)?;

        // The prompt stays until the page navigates away.
        if let Some(button) = self.document.get_element_by_id("deposit-btn") {
            EventListener::new(&button, "click", |_| {
                if let Some(window) = web_sys::window() {
                    warn_on_err("deposit redirect", window.location().set_href(DEPOSIT_URL));
                }
            })
            .forget();
        }
        Ok(())
    }
}

impl SlotDisplay for DomDisplay {
    fn show_balance(&mut self, text: &str) {
        if let Some(el) = &self.balance {
            el.set_text_content(Some(text));
        }
    }

    fn show_bet(&mut self, text: &str) {
        if let Some(el) = &self.bet {
            el.set_text_content(Some(text));
        }
    }

    fn show_win(&mut self, text: &str, fade_after: Duration) {
        let Some(el) = self.win.clone() else {
            return;
        };
        el.set_text_content(Some(text));
        warn_on_err("win opacity", el.style().set_property("opacity", "0.5"));
        wasm_bindgen_futures::spawn_local(async move {
            JsTimer.sleep(fade_after).await;
            warn_on_err("win fade", el.style().set_property("opacity", "0"));
        });
    }

    fn show_deposit_prompt(&mut self) {
        if self.document.get_element_by_id("deposit-message").is_some() {
            return;
        }
        warn_on_err("deposit prompt", self.deposit_message());
    }

    fn set_spin_enabled(&mut self, enabled: bool) {
        if let Some(button) = &self.spin {
            button.set_disabled(!enabled);
        }
    }

    fn autoplay_enabled(&self) -> bool {
        self.autoplay.as_ref().is_some_and(|c| c.checked())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn travel_is_expressed_in_windows() {
        assert_eq!(travel_css(5.0), "calc(5 * -100%)");
        assert_eq!(travel_css(25.0), "calc(25 * -100%)");
    }
}
