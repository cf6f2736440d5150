use leptos::prelude::*;
use omics_core::SampleRecord;
use omics_core::shaper::format_tpm;

#[component]
pub fn SampleTable(records: Vec<SampleRecord>, export_href: String) -> impl IntoView {
    let count = records.len();

    view! {
        <section class="panel">
            <div class="panel-header">
                <h2>"Samples"</h2>
                <span class="muted">{format!("{count} records")}</span>
                <a class="button" href=export_href rel="external">
                    "Download CSV"
                </a>
            </div>
            <div class="table-scroll">
                <table class="sample-table">
                    <thead>
                        <tr>
                            <th>"Sample"</th>
                            <th>"Tissue"</th>
                            <th>"Condition"</th>
                            <th class="numeric">"TPM"</th>
                            <th class="numeric">"Age"</th>
                            <th>"Sequenced"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {records
                            .into_iter()
                            .map(|record| {
                                view! {
                                    <tr>
                                        <td class="mono">{record.sample_id}</td>
                                        <td>{record.tissue_type}</td>
                                        <td>{record.condition}</td>
                                        <td class="numeric">{format_tpm(record.tpm_value)}</td>
                                        <td class="numeric">
                                            {record
                                                .patient_age
                                                .map(|age| age.to_string())
                                                .unwrap_or_default()}
                                        </td>
                                        <td>
                                            {record
                                                .sequencing_date
                                                .map(|d| d.format("%Y-%m-%d").to_string())
                                                .unwrap_or_default()}
                                        </td>
                                    </tr>
                                }
                            })
                            .collect_view()}
                    </tbody>
                </table>
            </div>
        </section>
    }
}
