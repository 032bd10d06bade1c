//! Content script: render the page and route its events into the session.

use std::cell::RefCell;
use std::time::Duration;

use beautifier_render::{
    ColorScheme, DirectSaver, FallbackSaver, Injection, RelayedSaver, RenderSession, inject,
};
use tracing::{debug, error};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Event, MediaQueryList, MediaQueryListEvent, Node, Window};

use crate::console;
use crate::page::{PageBlobDownloads, RuntimeChannel, WindowAlert};
use crate::web_dom::WebDom;

type PageSaver =
    FallbackSaver<DirectSaver<PageBlobDownloads>, RelayedSaver<RuntimeChannel, WindowAlert>>;

/// Everything a beautified page keeps alive.
struct ContentPage {
    dom: WebDom,
    session: RenderSession<Node>,
    saver: PageSaver,
}

thread_local! {
    static PAGE: RefCell<Option<ContentPage>> = const { RefCell::new(None) };
}

/// Run `f` on the page state unless it is missing or already in use.
///
/// The state is in use while a click is dispatched; clicking the temporary
/// download link re-enters the click listener.
fn with_page(f: impl FnOnce(&mut ContentPage)) {
    PAGE.with(|page| {
        if let Ok(mut page) = page.try_borrow_mut()
            && let Some(page) = page.as_mut()
        {
            f(page);
        }
    });
}

fn dark_query(window: &Window) -> Option<MediaQueryList> {
    window.match_media(ColorScheme::DARK_QUERY).ok().flatten()
}

fn on_click(event: &Event) {
    let Some(target) = event.target().and_then(|t| t.dyn_into::<Node>().ok()) else {
        return;
    };
    with_page(|page| {
        match page
            .session
            .handle_click(&mut page.dom, &target, &mut page.saver)
        {
            Ok(Some(action)) => {
                debug!(target: "beautifier::web", action = %action.kind(), "Handled click");
                event.prevent_default();
                event.stop_propagation();
            }
            Ok(None) => {}
            Err(e) => error!(target: "beautifier::web", error = %e, "Click failed"),
        }
    });
}

fn on_scheme_change(event: &MediaQueryListEvent) {
    let scheme = ColorScheme::from_prefers_dark(event.matches());
    with_page(|page| {
        if let Err(e) = page.session.set_color_scheme(&mut page.dom, scheme) {
            error!(target: "beautifier::web", error = %e, "Could not repaint");
        }
    });
}

fn listen(window: &Window, dom: &WebDom) -> Result<(), JsValue> {
    let click = Closure::wrap(Box::new(|event: Event| on_click(&event)) as Box<dyn FnMut(Event)>);
    dom.document()
        .add_event_listener_with_callback("click", click.as_ref().unchecked_ref())?;
    click.forget();

    if let Some(query) = dark_query(window) {
        let change = Closure::wrap(Box::new(|event: MediaQueryListEvent| {
            on_scheme_change(&event);
        }) as Box<dyn FnMut(MediaQueryListEvent)>);
        query.add_event_listener_with_callback("change", change.as_ref().unchecked_ref())?;
        change.forget();
    }
    Ok(())
}

/// Beautify the current page if it holds a JSON payload.
///
/// `config` is an optional JSON object overriding the renderer defaults.
#[wasm_bindgen(js_name = startContentScript)]
#[allow(clippy::needless_pass_by_value)]
pub fn start_content_script(config: Option<String>) {
    console::init();
    let config = crate::renderer_config(config.as_deref());
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    let scheme = ColorScheme::from_prefers_dark(dark_query(&window).is_some_and(|q| q.matches()));
    let mut dom = WebDom::new(document.clone());
    let cleanup_delay = Duration::from_millis(config.cleanup_delay_ms);
    let session = match inject(&mut dom, config, scheme) {
        Ok(Injection::Rendered(session)) => session,
        Ok(Injection::Skipped(_)) => return,
        Err(e) => {
            error!(target: "beautifier::web", error = %e, "Could not render the page");
            return;
        }
    };

    let saver = FallbackSaver::new(
        DirectSaver::new(PageBlobDownloads::new(window.clone(), document), cleanup_delay),
        RelayedSaver::new(RuntimeChannel, WindowAlert::new(window.clone())),
    );
    if let Err(e) = listen(&window, &dom) {
        let message = crate::chrome::message(&e);
        error!(target: "beautifier::web", error = %message, "Could not attach listeners");
    }
    PAGE.with(|page| {
        *page.borrow_mut() = Some(ContentPage {
            dom,
            session,
            saver,
        });
    });
}
