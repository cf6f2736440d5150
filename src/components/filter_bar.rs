use leptos::prelude::*;
use leptos_router::components::Form;
use omics_core::TissueFilter;

/// Gene and tissue inputs. Submits as a GET to `/`, so the query lives in the URL.
#[component]
pub fn FilterBar(gene: String, tissue: String, tissues: Vec<String>) -> impl IntoView {
    let selected = TissueFilter::parse(&tissue);
    let options: Vec<String> = std::iter::once(TissueFilter::ALL_LABEL.to_string())
        .chain(tissues)
        .collect();

    view! {
        <Form action="/" attr:class="filter-bar">
            <label class="field">
                <span>"Gene symbol"</span>
                <input
                    type="text"
                    name="gene"
                    value=gene
                    placeholder="e.g. TP53"
                    autocomplete="off"
                    spellcheck="false"
                />
            </label>
            <label class="field">
                <span>"Tissue"</span>
                <select name="tissue">
                    {options
                        .into_iter()
                        .map(|option| {
                            let is_selected = option == selected.as_label();
                            view! {
                                <option value=option.clone() selected=is_selected>
                                    {option.clone()}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
            </label>
            <button type="submit" class="primary">"Look up"</button>
        </Form>
    }
}
