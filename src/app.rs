use crate::components::Header;
use crate::pages::ExplorerPage;
use leptos::prelude::*;
use leptos_darkmode::Darkmode;
use leptos_meta::{Html, Title, provide_meta_context};
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

pub fn shell(options: LeptosOptions) -> impl IntoView {
    provide_meta_context();
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <AutoReload options=options.clone() />
                <HydrationScripts options />
                <link rel="stylesheet" id="leptos" href="/pkg/omicscloud.css" />
                <Title formatter=|text| format!("{} - OmicsCloud", text) text="Explorer" />
            </head>

            <body>
                <App />
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    let darkmode = Darkmode::init();
    view! {
        <Html class:dark=move || darkmode.is_dark() />
        <Router>
            <div class="page">
                <Header />
                <Routes fallback=|| "Page not found".into_view()>
                    <Route path=path!("/") view=ExplorerPage />
                </Routes>
            </div>
        </Router>
    }
}
