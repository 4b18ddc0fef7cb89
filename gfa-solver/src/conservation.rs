use crate::FlowError;
use gfa_core::models::FlowAllocationResult;

/// Check that what the regions imported equals what they exported, for
/// energy, emissions and market value.
///
/// The tolerance is relative to the magnitude of the exports (never less than
/// an absolute `tolerance`). Non-finite totals always fail.
pub fn check_conservation(
    records: &[FlowAllocationResult],
    tolerance: f64,
) -> Result<(), FlowError> {
    let quantities: [(&'static str, fn(&FlowAllocationResult) -> (f64, f64)); 3] = [
        ("energy", |r| (r.energy_imports, r.energy_exports)),
        ("emissions", |r| (r.emissions_imports, r.emissions_exports)),
        ("market value", |r| {
            (r.market_value_imports, r.market_value_exports)
        }),
    ];

    for (quantity, select) in quantities {
        let (imports, exports) = records
            .iter()
            .map(select)
            .fold((0.0, 0.0), |(i, e), (di, de)| (i + di, e + de));

        let balanced = imports.is_finite()
            && exports.is_finite()
            && (imports - exports).abs() <= tolerance * exports.abs().max(1.0);

        if !balanced {
            return Err(FlowError::ConservationViolation {
                quantity,
                imports,
                exports,
            });
        }
    }

    Ok(())
}
