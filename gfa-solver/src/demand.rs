use gfa_core::models::{
    Interval, Map, NettedFlow, NetworkId, RegionDemand, RegionEnergyEmissions, RegionId,
    RegionImportExport,
};

/// Total the netted flows into imports and exports per region.
///
/// Every region that appears at either end of a flow gets a record; the
/// result is sorted by region. Since each flow contributes its energy once as
/// an import and once as an export, the two totals agree across the network.
pub fn region_import_export(
    interval: &Interval,
    network: &NetworkId,
    flows: &[NettedFlow],
) -> Map<RegionId, RegionImportExport> {
    let mut totals: Map<RegionId, RegionImportExport> = Map::default();

    for flow in flows {
        entry(&mut totals, interval, network, &flow.region_from).energy_exports += flow.energy;
        entry(&mut totals, interval, network, &flow.region_to).energy_imports += flow.energy;
    }

    totals.into_sorted()
}

fn entry<'a>(
    totals: &'a mut Map<RegionId, RegionImportExport>,
    interval: &Interval,
    network: &NetworkId,
    region: &RegionId,
) -> &'a mut RegionImportExport {
    totals
        .entry(region.clone())
        .or_insert_with(|| RegionImportExport {
            interval: *interval,
            network: network.clone(),
            region: region.clone(),
            energy_imports: 0.0,
            energy_exports: 0.0,
        })
}

/// Derive the demand of every generating region.
///
/// A region with generation but no interconnector activity this interval
/// simply has zero imports and exports. Regions that only appear in
/// `flows` are not part of the output.
pub fn calculate_demand(
    generation: &Map<RegionId, RegionEnergyEmissions>,
    flows: &Map<RegionId, RegionImportExport>,
) -> Map<RegionId, RegionDemand> {
    generation
        .iter()
        .map(|(region, energy)| {
            let imports_exports = flows.get(region).cloned().unwrap_or_else(|| RegionImportExport {
                interval: energy.interval,
                network: energy.network.clone(),
                region: region.clone(),
                energy_imports: 0.0,
                energy_exports: 0.0,
            });
            (region.clone(), RegionDemand::new(energy.clone(), imports_exports))
        })
        .collect::<Map<_, _>>()
        .into_sorted()
}
