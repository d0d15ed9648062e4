//! Resolution of command-line tokens into a metric request.
//!
//! Two policies decide how tokens map to output positions:
//! - [`OrderPolicy::Positional`]: one value per recognized token, in the
//!   order given, repeats included.
//! - [`OrderPolicy::Fixed`]: one value per distinct recognized token, in
//!   [`Metric::ALL`] order.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::metric::Metric;

/// Token that requests the usage block: as the only token under the
/// positional policy, anywhere under the fixed policy.
pub const HELP_TOKEN: &str = "-h";

/// Usage block printed for the help path.
pub fn usage() -> String {
    let mut text = String::from(
        "usage: yasymon [-h] [-cp] [-cf] [-ct] [-ru] [-rt] [-rp] [-su] [-st] [-sp]\n\n\
         Reports CPU, RAM and Swap usage information for monitoring purposes.\n\
         Values are printed on one line in the order the arguments were given.\n\n\
         arguments:\n",
    );
    text.push_str(&format!(
        "  {:<12}show this help message and exit\n",
        HELP_TOKEN
    ));
    for metric in Metric::ALL {
        text.push_str(&format!("  {:<12}{}\n", metric.token(), metric.description()));
    }
    text
}

/// How requested tokens are ordered in the output line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderPolicy {
    /// Output follows token order; repeated tokens are re-evaluated.
    #[default]
    Positional,
    /// Output follows the fixed metric order; each metric at most once.
    Fixed,
}

/// Ordered list of metrics to evaluate for one report line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricRequest {
    metrics: Vec<Metric>,
}

impl MetricRequest {
    pub fn new(metrics: Vec<Metric>) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

/// What the program should do for a given set of tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Print the usage block and evaluate nothing.
    Help,
    /// Evaluate the request and print one line.
    Report(MetricRequest),
}

/// Maps raw tokens to an [`Invocation`] under the given policy.
pub fn resolve<S: AsRef<str>>(tokens: &[S], policy: OrderPolicy) -> Invocation {
    let bare_help = tokens.len() == 1 && tokens[0].as_ref().trim() == HELP_TOKEN;
    if bare_help {
        return Invocation::Help;
    }

    match policy {
        OrderPolicy::Positional => {
            if tokens.is_empty() {
                return Invocation::Help;
            }
            let metrics = tokens.iter().filter_map(|t| recognize(t.as_ref())).collect();
            Invocation::Report(MetricRequest::new(metrics))
        }
        OrderPolicy::Fixed => {
            // -h anywhere wins under the flag-style policy
            if tokens.iter().any(|t| t.as_ref().trim() == HELP_TOKEN) {
                return Invocation::Help;
            }
            let mut enabled = [false; Metric::ALL.len()];
            for token in tokens {
                if let Some(metric) = recognize(token.as_ref()) {
                    enabled[metric as usize] = true;
                }
            }
            let metrics = Metric::ALL
                .into_iter()
                .zip(enabled)
                .filter_map(|(metric, on)| on.then_some(metric))
                .collect();
            Invocation::Report(MetricRequest::new(metrics))
        }
    }
}

fn recognize(token: &str) -> Option<Metric> {
    let metric = Metric::from_token(token);
    if metric.is_none() {
        debug!("Ignoring unrecognized token {:?}", token);
    }
    metric
}
