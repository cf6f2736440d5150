use crate::components::{DistributionChart, FilterBar, SampleBarChart, SampleTable, SummaryCards};
use crate::services::expression_service::{LookupOutcome, lookup_expression, tissue_options};
use leptos::Params;
use leptos::either::EitherOf4;
use leptos::prelude::*;
use leptos_router::hooks::use_query;
use leptos_router::params::Params;
use omics_core::TissueFilter;

pub const DEFAULT_GENE: &str = "TP53";

#[derive(Params, PartialEq, Clone, Debug, Default)]
pub struct ExplorerParams {
    pub gene: Option<String>,
    pub tissue: Option<String>,
}

/// A missing gene falls back to the default; a present but blank one is kept
/// so the lookup can reject it.
fn resolve_params(params: Option<ExplorerParams>) -> (String, String) {
    let params = params.unwrap_or_default();
    let gene = params.gene.unwrap_or_else(|| DEFAULT_GENE.to_string());
    let tissue = params
        .tissue
        .unwrap_or_else(|| TissueFilter::ALL_LABEL.to_string());
    (gene, tissue)
}

#[component]
pub fn ExplorerPage() -> impl IntoView {
    let query = use_query::<ExplorerParams>();
    let criteria = Memo::new(move |_| resolve_params(query.get().ok()));

    let lookup = Resource::new(
        move || criteria.get(),
        |(gene, tissue)| lookup_expression(gene, tissue),
    );
    let tissues = Resource::new(|| (), |_| tissue_options());

    view! {
        <main class="explorer">
            <Suspense fallback=|| view! { <div class="filter-bar placeholder"></div> }>
                {move || {
                    tissues
                        .get()
                        .map(|res| {
                            let (gene, tissue) = criteria.get();
                            let tissues = res.unwrap_or_default();
                            view! { <FilterBar gene tissue tissues /> }
                        })
                }}
            </Suspense>
            <Suspense fallback=|| view! { <p class="loading">"Loading expression data..."</p> }>
                {move || {
                    lookup
                        .get()
                        .map(|res| match res {
                            Ok(LookupOutcome::Found(explorer)) => {
                                EitherOf4::A(
                                    view! {
                                        <SummaryCards response=explorer.response.clone() />
                                        <div class="chart-grid">
                                            <DistributionChart groups=explorer.distribution />
                                            <SampleBarChart bars=explorer.bars />
                                        </div>
                                        <SampleTable
                                            records=explorer.response.records
                                            export_href=explorer.export_href
                                        />
                                    },
                                )
                            }
                            Ok(LookupOutcome::NotFound { message }) => {
                                EitherOf4::B(
                                    view! { <p class="banner banner-warning">{message}</p> },
                                )
                            }
                            Ok(LookupOutcome::Rejected { message }) => {
                                EitherOf4::C(
                                    view! {
                                        <p class="banner banner-warning">
                                            "Check the gene symbol: " {message}
                                        </p>
                                    },
                                )
                            }
                            Err(e) => {
                                EitherOf4::D(
                                    view! {
                                        <p class="banner banner-error">
                                            "Lookup failed: " {e.to_string()}
                                        </p>
                                    },
                                )
                            }
                        })
                }}
            </Suspense>
        </main>
    }
}
