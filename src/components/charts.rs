use leptos::prelude::*;
use omics_core::charts::{ConditionDistribution, SampleBar};
use omics_core::shaper::format_tpm;

/// Position of `value` on a 0..=100 axis whose right edge is `peak`.
fn percent(value: f64, peak: f64) -> f64 {
    if peak <= 0.0 {
        return 0.0;
    }
    (value / peak * 100.0).clamp(0.0, 100.0)
}

fn span_style(from: f64, to: f64, peak: f64) -> String {
    let left = percent(from, peak);
    let width = (percent(to, peak) - left).max(0.5);
    format!("left: {left:.2}%; width: {width:.2}%;")
}

/// Box plot per (condition, tissue): whiskers span min..max, the box q1..q3.
#[component]
pub fn DistributionChart(groups: Vec<ConditionDistribution>) -> impl IntoView {
    let peak = groups.iter().map(|g| g.max).fold(0.0_f64, f64::max);

    view! {
        <section class="panel">
            <div class="panel-header">
                <h2>"Expression by condition"</h2>
                <span class="muted">{format!("axis 0 to {} TPM", format_tpm(peak))}</span>
            </div>
            <div class="box-plot">
                {groups
                    .into_iter()
                    .map(|group| {
                        let title = format!(
                            "n={} min={} q1={} median={} q3={} max={}",
                            group.count,
                            format_tpm(group.min),
                            format_tpm(group.q1),
                            format_tpm(group.median),
                            format_tpm(group.q3),
                            format_tpm(group.max),
                        );
                        view! {
                            <div class="box-row" title=title>
                                <span class="box-label">
                                    {format!("{} / {}", group.condition, group.tissue_type)}
                                </span>
                                <div class="box-track">
                                    <div
                                        class="box-whisker"
                                        style=span_style(group.min, group.max, peak)
                                    ></div>
                                    <div
                                        class="box-body"
                                        style=span_style(group.q1, group.q3, peak)
                                    ></div>
                                    <div
                                        class="box-median"
                                        style=format!("left: {:.2}%;", percent(group.median, peak))
                                    ></div>
                                </div>
                                <span class="box-value">{format_tpm(group.median)}</span>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
        </section>
    }
}

/// One horizontal bar per sample, widths relative to the highest value.
#[component]
pub fn SampleBarChart(bars: Vec<SampleBar>) -> impl IntoView {
    view! {
        <section class="panel">
            <div class="panel-header">
                <h2>"Expression by sample"</h2>
            </div>
            <div class="bar-chart">
                {bars
                    .into_iter()
                    .map(|bar| {
                        let tissue_class = format!(
                            "bar-fill tissue-{}",
                            bar.tissue_type.to_lowercase().replace(' ', "-"),
                        );
                        view! {
                            <div class="bar-row" title=bar.tissue_type.clone()>
                                <span class="bar-label mono">{bar.sample_id}</span>
                                <div class="bar-track">
                                    <div
                                        class=tissue_class
                                        style=format!("width: {:.2}%;", bar.fraction * 100.0)
                                    ></div>
                                </div>
                                <span class="bar-value">{format_tpm(bar.tpm_value)}</span>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_is_clamped_and_safe_for_zero_peak() {
        assert_eq!(percent(5.0, 10.0), 50.0);
        assert_eq!(percent(12.0, 10.0), 100.0);
        assert_eq!(percent(3.0, 0.0), 0.0);
    }

    #[test]
    fn degenerate_spans_stay_visible() {
        assert_eq!(span_style(4.0, 4.0, 8.0), "left: 50.00%; width: 0.50%;");
        assert_eq!(span_style(2.0, 6.0, 8.0), "left: 25.00%; width: 50.00%;");
    }
}
