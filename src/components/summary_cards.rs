use leptos::prelude::*;
use omics_core::ExpressionResponse;
use omics_core::shaper::format_tpm;

#[component]
fn KpiCard(label: &'static str, value: String) -> impl IntoView {
    view! {
        <div class="kpi-card">
            <p class="kpi-label">{label}</p>
            <p class="kpi-value">{value}</p>
        </div>
    }
}

#[component]
pub fn SummaryCards(response: ExpressionResponse) -> impl IntoView {
    let gene = response.gene;
    let summary = response.summary;
    let chromosome = gene
        .chromosome
        .map(|c| format!("chr{c}"))
        .unwrap_or_else(|| "n/a".to_string());
    let description = gene
        .description
        .unwrap_or_else(|| "No description available.".to_string());

    view! {
        <section class="summary">
            {response
                .warning
                .map(|warning| view! { <p class="banner banner-warning">{warning}</p> })}
            <div class="kpi-grid">
                <KpiCard label="Gene ID" value=gene.gene_id />
                <KpiCard label="Chromosome" value=chromosome />
                <KpiCard label="Max TPM" value=format_tpm(summary.max_tpm) />
                <KpiCard label="Mean TPM" value=format_tpm(summary.mean_tpm) />
            </div>
            <p class="description">
                <strong>{gene.gene_symbol}</strong>
                ": "
                {description}
            </p>
        </section>
    }
}
