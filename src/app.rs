use leptos::prelude::*;
use leptos::web_sys::{CustomEvent, FocusEvent, KeyboardEvent, MouseEvent};
use tracing::{debug, error, info, warn};
use wasm_bindgen::prelude::*;

use crate::annotation::AnnotationStore;
use crate::config::FilterConfig;
use crate::document::DocumentSource;
use crate::dom::{self, DomDocument, DomElementSet, DomToolbar, TOOLBAR_ID};
use crate::filter_core::FilterEngine;
use crate::navigation::Direction;
use crate::toolbar::{FilterView, Toolbar};

/// Event the host page dispatches on `window` after loading, creating,
/// updating or deleting annotations.
const ANNOTATIONS_CHANGED_EVENT: &str = "annotator-annotations-changed";

type PageEngine = FilterEngine<DomElementSet, AnnotationStore, DomToolbar>;

#[component]
pub fn App(config: FilterConfig) -> impl IntoView {
    let filters = RwSignal::new(Vec::<FilterView>::new());
    let shown = RwSignal::new(0usize);

    let annotations = dom::load_annotations(&DomDocument).unwrap_or_else(|err| {
        warn!(%err, "ignoring page annotations");
        AnnotationStore::default()
    });
    let annotation_count = annotations.len();
    let highlights = DomElementSet::new(config.filter_element.clone(), config.classes.clone());
    let toolbar = DomToolbar::new(filters, &config.classes);

    let engine = match FilterEngine::new(config, highlights, annotations, toolbar) {
        Ok(engine) => engine,
        Err(err) => {
            error!(%err, "filter toolbar disabled");
            return ().into_any();
        }
    };
    info!(
        document = %DomDocument.document_metadata().title,
        annotations = annotation_count,
        filters = engine.filters().len(),
        "filter toolbar ready"
    );
    shown.set(engine.visible_highlights().len());
    let engine: StoredValue<PageEngine, LocalStorage> = StoredValue::new_local(engine);

    let closure = Closure::<dyn FnMut(CustomEvent)>::new(move |_: CustomEvent| {
        match dom::load_annotations(&DomDocument) {
            Ok(annotations) => {
                debug!(annotations = annotations.len(), "annotations reloaded");
                engine.update_value(|engine| engine.set_annotations(annotations));
            }
            Err(err) => {
                warn!(%err, "keeping previous annotations");
                engine.update_value(|engine| engine.on_annotations_changed());
            }
        }
        shown.set(engine.with_value(|engine| engine.visible_highlights().len()));
    });
    let _ = window().add_event_listener_with_callback(
        ANNOTATIONS_CHANGED_EVENT,
        closure.as_ref().unchecked_ref(),
    );
    closure.forget();

    Effect::new(move |_| {
        let height = engine.with_value(|engine| engine.toolbar().height());
        dom::insert_spacer(height);
    });
    on_cleanup(move || {
        let _ = engine.try_update_value(|engine| engine.destroy());
    });

    let navigate = move |direction: Direction| {
        engine.update_value(|engine| engine.navigate(direction));
    };

    view! {
        <div id=TOOLBAR_ID class="annotator-filter">
            <strong>"Navigate:"</strong>
            <span class="annotator-filter-navigation">
                <button
                    type="button"
                    class="annotator-filter-previous"
                    on:click=move |_: MouseEvent| navigate(Direction::Previous)
                >
                    "Previous"
                </button>
                <button
                    type="button"
                    class="annotator-filter-next"
                    on:click=move |_: MouseEvent| navigate(Direction::Next)
                >
                    "Next"
                </button>
            </span>
            <strong>"Filter by:"</strong>
            <For
                each=move || filters.get()
                key=|filter: &FilterView| filter.id.clone()
                children=move |filter: FilterView| {
                    view! { <FilterField filter=filter engine=engine shown=shown /> }
                }
            />
            <span class="annotator-filter-count">
                {move || format!("{} shown", shown.get())}
            </span>
        </div>
    }
    .into_any()
}

#[component]
fn FilterField(
    filter: FilterView,
    engine: StoredValue<PageEngine, LocalStorage>,
    shown: RwSignal<usize>,
) -> impl IntoView {
    let input_id = filter.id.to_string();
    let recount = move || {
        shown.set(engine.with_value(|engine| engine.visible_highlights().len()));
    };

    let on_focus = {
        let id = filter.id.clone();
        move |_: FocusEvent| {
            engine.update_value(|engine| engine.on_filter_focus(&id));
        }
    };
    let on_blur = {
        let id = filter.id.clone();
        move |_: FocusEvent| {
            engine.update_value(|engine| engine.on_filter_blur(&id));
        }
    };
    let on_keyup = {
        let id = filter.id.clone();
        move |ev: KeyboardEvent| {
            // Enter navigates; see on_keydown.
            if ev.key() == "Enter" {
                return;
            }
            engine.update_value(|engine| engine.on_filter_keyup(&id));
            recount();
        }
    };
    let on_keydown = move |ev: KeyboardEvent| {
        if ev.key() != "Enter" {
            return;
        }
        ev.prevent_default();
        let direction = if ev.shift_key() {
            Direction::Previous
        } else {
            Direction::Next
        };
        engine.update_value(|engine| engine.navigate(direction));
    };
    let on_clear = {
        let id = filter.id.clone();
        move |_: MouseEvent| {
            engine.update_value(|engine| engine.on_clear_click(&id));
            recount();
        }
    };

    view! {
        <span class="annotator-filter-property">
            <label for=input_id.clone()>{filter.label}</label>
            <input
                id=input_id
                placeholder=filter.placeholder
                on:focus=on_focus
                on:blur=on_blur
                on:keyup=on_keyup
                on:keydown=on_keydown
            />
            <button type="button" class="annotator-filter-clear" on:click=on_clear>
                "Clear"
            </button>
        </span>
    }
}
