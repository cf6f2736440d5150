use leptos::prelude::*;
use leptos::tachys::dom::event_target_checked;
use leptos_darkmode::Darkmode;

#[component]
pub fn Header() -> impl IntoView {
    let mut darkmode = use_context::<Darkmode>();

    view! {
        <header class="navbar">
            <a href="/" class="brand">
                <span class="brand-mark">"◆"</span>
                <span class="brand-name">"OmicsCloud"</span>
                <span class="brand-tagline">"Gene expression explorer"</span>
            </a>
            <label class="theme-toggle">
                <input
                    type="checkbox"
                    prop:checked={
                        let darkmode = darkmode.clone();
                        move || darkmode.clone().map(|v| v.get()).unwrap_or_default()
                    }
                    on:change=move |ev| {
                        let val = event_target_checked(&ev);
                        if let Some(v) = darkmode.as_mut() {
                            v.set(val);
                        }
                    }
                />
                "Dark mode"
            </label>
        </header>
    }
}
