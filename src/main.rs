#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use std::sync::Arc;

    use anyhow::Context;
    use axum::Router;
    use clap::Parser;
    use leptos::prelude::*;
    use leptos_axum::{LeptosRoutes, generate_route_list};
    use omicscloud::app::*;
    use omicscloud::export::export_routes;
    use omicscloud::server::{AppState, Cli, GlobalAppState};
    use omicscloud_backend::logging::init_logging;
    use tower_http::compression::CompressionLayer;
    use tracing::info;

    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.log_format)?;

    let conf = get_configuration(None).map_err(|err| anyhow::anyhow!("{err}"))?;
    let addr = conf.leptos_options.site_addr;
    let leptos_options = conf.leptos_options;
    let routes = generate_route_list(App);

    let service = Arc::new(cli.storage.build_service().await?);
    let state: GlobalAppState = Arc::new(AppState {
        service: service.clone(),
        tissues: cli.storage.tissue_options(),
    });

    // The JSON API shares the service with the UI but keeps its own router state.
    let api = omicscloud_backend::api_routes(omicscloud_backend::AppState { service });

    let app = Router::new()
        .leptos_routes_with_context(
            &leptos_options,
            routes,
            {
                let state = state.clone();
                move || provide_context(state.clone())
            },
            {
                let leptos_options = leptos_options.clone();
                move || shell(leptos_options.clone())
            },
        )
        .fallback(leptos_axum::file_and_error_handler(shell))
        .with_state(leptos_options)
        .merge(export_routes(state))
        .merge(api)
        .layer(CompressionLayer::new());

    info!(event = "startup.listening", %addr, "listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(omicscloud_backend::shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

#[cfg(not(feature = "ssr"))]
pub fn main() {
    // no client-side main function
    // see lib.rs for hydration function instead
}
