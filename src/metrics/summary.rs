//! Labelled summary metric built on a custom collector.
//!
//! The `prometheus` crate ships counters, gauges and histograms but no
//! summary type. This collector keeps exact count/sum per label set plus a
//! bounded window of recent observations, and derives the 0.5/0.9/0.99
//! quantiles from that window at scrape time.

use prometheus::core::{Collector, Desc};
use prometheus::proto;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Observations retained per label set for quantile estimation.
const WINDOW_CAPACITY: usize = 1024;

const QUANTILES: &[f64] = &[0.5, 0.9, 0.99];

#[derive(Debug, Default)]
struct SummaryCore {
    count: u64,
    sum: f64,
    window: VecDeque<f64>,
}

impl SummaryCore {
    fn observe(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        if self.window.len() == WINDOW_CAPACITY {
            self.window.pop_front();
        }
        self.window.push_back(value);
    }

    /// Nearest-rank quantile over a sorted window.
    fn quantile(sorted: &[f64], q: f64) -> f64 {
        if sorted.is_empty() {
            return f64::NAN;
        }
        let rank = (q * (sorted.len() - 1) as f64).round() as usize;
        sorted[rank.min(sorted.len() - 1)]
    }
}

/// A summary metric with variable labels, in the spirit of `CounterVec`.
#[derive(Clone)]
pub struct SummaryVec {
    desc: Arc<Desc>,
    children: Arc<Mutex<HashMap<Vec<String>, SummaryCore>>>,
}

impl SummaryVec {
    pub fn new(name: &str, help: &str, label_names: &[&str]) -> prometheus::Result<Self> {
        let desc = Desc::new(
            name.to_string(),
            help.to_string(),
            label_names.iter().map(|s| s.to_string()).collect(),
            HashMap::new(),
        )?;
        Ok(SummaryVec {
            desc: Arc::new(desc),
            children: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Records one observation under the given label values.
    ///
    /// The number of label values must match the label names the summary
    /// was constructed with.
    pub fn observe(&self, label_values: &[&str], value: f64) {
        assert_eq!(
            label_values.len(),
            self.desc.variable_labels.len(),
            "label cardinality mismatch for {}",
            self.desc.fq_name
        );
        let key: Vec<String> = label_values.iter().map(|s| s.to_string()).collect();
        let mut children = self.children.lock().expect("summary mutex poisoned");
        children.entry(key).or_default().observe(value);
    }
}

impl Collector for SummaryVec {
    fn desc(&self) -> Vec<&Desc> {
        vec![&self.desc]
    }

    fn collect(&self) -> Vec<proto::MetricFamily> {
        let children = self.children.lock().expect("summary mutex poisoned");
        if children.is_empty() {
            return Vec::new();
        }

        let mut metrics = Vec::with_capacity(children.len());
        for (label_values, core) in children.iter() {
            let mut labels = Vec::with_capacity(label_values.len());
            for (name, value) in self.desc.variable_labels.iter().zip(label_values) {
                let mut pair = proto::LabelPair::default();
                pair.set_name(name.clone());
                pair.set_value(value.clone());
                labels.push(pair);
            }
            // Exposition convention: label pairs sorted by name.
            labels.sort_by(|a, b| a.get_name().cmp(b.get_name()));

            let mut sorted: Vec<f64> = core.window.iter().copied().collect();
            sorted.sort_by(|a, b| a.partial_cmp(b).expect("NaN observed in summary"));

            let mut quantiles = Vec::with_capacity(QUANTILES.len());
            for &q in QUANTILES {
                let mut quantile = proto::Quantile::default();
                quantile.set_quantile(q);
                quantile.set_value(SummaryCore::quantile(&sorted, q));
                quantiles.push(quantile);
            }

            let mut summary = proto::Summary::default();
            summary.set_sample_count(core.count);
            summary.set_sample_sum(core.sum);
            summary.set_quantile(quantiles.into());

            let mut metric = proto::Metric::default();
            metric.set_label(labels.into());
            metric.set_summary(summary);
            metrics.push(metric);
        }

        let mut family = proto::MetricFamily::default();
        family.set_name(self.desc.fq_name.clone());
        family.set_help(self.desc.help.clone());
        family.set_field_type(proto::MetricType::SUMMARY);
        family.set_metric(metrics.into());
        vec![family]
    }
}

#[cfg(test)]
mod tests {
    use super::{SummaryVec, WINDOW_CAPACITY};
    use prometheus::core::Collector;
    use prometheus::proto::MetricType;

    fn family_of(summary: &SummaryVec) -> prometheus::proto::MetricFamily {
        let mut families = summary.collect();
        assert_eq!(families.len(), 1);
        families.remove(0)
    }

    #[test]
    fn empty_summary_collects_nothing() {
        let summary = SummaryVec::new("sv_empty", "help", &["direction"]).unwrap();
        assert!(summary.collect().is_empty());
    }

    #[test]
    fn count_and_sum_are_exact() {
        let summary = SummaryVec::new("sv_exact", "help", &["direction"]).unwrap();
        summary.observe(&["inbound"], 1.0);
        summary.observe(&["inbound"], 2.5);
        summary.observe(&["outbound"], 4.0);

        let family = family_of(&summary);
        assert_eq!(family.get_field_type(), MetricType::SUMMARY);
        assert_eq!(family.get_metric().len(), 2);

        for metric in family.get_metric() {
            let label = &metric.get_label()[0];
            assert_eq!(label.get_name(), "direction");
            let s = metric.get_summary();
            match label.get_value() {
                "inbound" => {
                    assert_eq!(s.get_sample_count(), 2);
                    assert!((s.get_sample_sum() - 3.5).abs() < 1e-9);
                }
                "outbound" => {
                    assert_eq!(s.get_sample_count(), 1);
                    assert!((s.get_sample_sum() - 4.0).abs() < 1e-9);
                }
                other => panic!("unexpected label value {other}"),
            }
        }
    }

    #[test]
    fn quantiles_are_ordered_and_within_observed_range() {
        let summary = SummaryVec::new("sv_quantiles", "help", &["kind"]).unwrap();
        for i in 1..=100 {
            summary.observe(&["a"], i as f64);
        }

        let family = family_of(&summary);
        let s = family.get_metric()[0].get_summary();
        let values: Vec<f64> = s.get_quantile().iter().map(|q| q.get_value()).collect();
        assert_eq!(values.len(), 3);
        assert!(values[0] <= values[1] && values[1] <= values[2]);
        for v in values {
            assert!((1.0..=100.0).contains(&v));
        }
    }

    #[test]
    fn window_is_bounded_but_count_is_not() {
        let summary = SummaryVec::new("sv_window", "help", &["kind"]).unwrap();
        let total = WINDOW_CAPACITY + 500;
        for i in 0..total {
            summary.observe(&["a"], i as f64);
        }

        let family = family_of(&summary);
        let s = family.get_metric()[0].get_summary();
        assert_eq!(s.get_sample_count(), total as u64);
        // Early observations fell out of the window, so the median reflects
        // only the most recent WINDOW_CAPACITY values.
        let median = s.get_quantile()[0].get_value();
        assert!(median >= 500.0);
    }

    #[test]
    #[should_panic(expected = "label cardinality mismatch")]
    fn wrong_label_arity_panics() {
        let summary = SummaryVec::new("sv_arity", "help", &["a", "b"]).unwrap();
        summary.observe(&["only-one"], 1.0);
    }
}
