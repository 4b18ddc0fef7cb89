use crate::FlowError;
use gfa_core::models::{InterconnectorFlow, Interval, Map, NettedFlow, NetworkConfig, RegionId};

/// Net the directional interconnector readings of one interval into at most
/// one positive flow per region pair.
///
/// For every unordered pair `{a, b}` (with `a < b`), the net is the sum of the
/// `a → b` readings less the sum of the `b → a` readings. A positive net
/// becomes `a → b`, a negative one `b → a`, and an exact zero produces no flow.
/// A direction without readings contributes 0, and signed readings are netted
/// by the same formula.
///
/// The result is sorted by `(region_from, region_to)` and every sum is taken
/// over values in a canonical order, so the output does not depend on the
/// order the reader returned rows in.
///
/// # Errors
///
/// - `NoInputData` if there are no readings but the network has interconnectors
/// - `UnknownRegion` if a reading references a region outside the network
/// - `MalformedInput` for non-finite energies, self-loops, or rows of another interval
pub fn net_flows(
    interval: &Interval,
    network: &NetworkConfig,
    flows: &[InterconnectorFlow],
) -> Result<Vec<NettedFlow>, FlowError> {
    if flows.is_empty() {
        return if network.interconnectors {
            Err(FlowError::NoInputData("interconnector"))
        } else {
            Ok(Vec::new())
        };
    }

    // Gather the readings of each pair, keyed by the ordered (low, high) regions.
    // The first vector holds low → high readings, the second high → low.
    let mut pairs: Map<(RegionId, RegionId), (Vec<f64>, Vec<f64>)> = Map::default();

    for flow in flows {
        if flow.interval != *interval {
            return Err(FlowError::MalformedInput(format!(
                "interconnector row for interval {} while netting {}",
                flow.interval, interval
            )));
        }
        for region in [&flow.region_from, &flow.region_to] {
            if !network.contains(region) {
                return Err(FlowError::UnknownRegion {
                    kind: "interconnector",
                    region: region.clone(),
                });
            }
        }
        if flow.region_from == flow.region_to {
            return Err(FlowError::MalformedInput(format!(
                "interconnector row from {} to itself",
                flow.region_from
            )));
        }
        if !flow.energy.is_finite() {
            return Err(FlowError::MalformedInput(format!(
                "non-finite interconnector energy from {} to {}",
                flow.region_from, flow.region_to
            )));
        }

        if flow.region_from < flow.region_to {
            let key = (flow.region_from.clone(), flow.region_to.clone());
            pairs.entry(key).or_default().0.push(flow.energy);
        } else {
            let key = (flow.region_to.clone(), flow.region_from.clone());
            pairs.entry(key).or_default().1.push(flow.energy);
        }
    }

    let netted = pairs
        .into_sorted()
        .into_iter()
        .filter_map(|((low, high), (forward, reverse))| {
            let net = canonical_sum(forward) - canonical_sum(reverse);
            if net > 0.0 {
                Some(NettedFlow {
                    interval: *interval,
                    region_from: low,
                    region_to: high,
                    energy: net,
                })
            } else if net < 0.0 {
                Some(NettedFlow {
                    interval: *interval,
                    region_from: high,
                    region_to: low,
                    energy: -net,
                })
            } else {
                None
            }
        })
        .collect::<Vec<_>>();

    Ok(sorted(netted))
}

// Floating point addition is not associative, so we fix the order of the terms
fn canonical_sum(mut values: Vec<f64>) -> f64 {
    values.sort_unstable_by(f64::total_cmp);
    values.into_iter().sum()
}

fn sorted(mut flows: Vec<NettedFlow>) -> Vec<NettedFlow> {
    flows.sort_unstable_by(|a, b| {
        (&a.region_from, &a.region_to).cmp(&(&b.region_from, &b.region_to))
    });
    flows
}
