use frag_algo::{
    AssetError, CapacityCdf, CapacityDistribution, ComponentError, FragilityCurve,
    FragilityModel, ModelConstants, ScoreTable, SweepConfig,
};
use frag_core::{AssetRecord, ComponentFamily, ConditionCode, Material, Mph};

fn model(as_of_year: i32) -> FragilityModel {
    FragilityModel::new(ModelConstants::default(), ScoreTable::reference(), as_of_year).unwrap()
}

fn corroded_tower(id: &str, material: Material, installed: i32) -> AssetRecord {
    let mut asset = AssetRecord::new(id, material, installed);
    asset.agriculture = Some("Prime Farmland".into());
    asset.wetland_type = Some("Freshwater Pond".into());
    asset.corrosion_zone = Some("severe".into());
    asset.splices = Some(3.0);
    asset.wear_fatigue = Some(0.1);
    asset.conditions = asset
        .conditions
        .with(ConditionCode::Anchor, 2.0)
        .with(ConditionCode::Guy, 3.0)
        .with(ConditionCode::Conductor, 4.0);
    asset
}

#[test]
fn curves_are_bounded_and_monotonic() {
    let model = model(2024);
    let assets = [
        AssetRecord::new("1", Material::Steel, 2024),
        AssetRecord::new("2", Material::Wood, 1950),
        corroded_tower("3", Material::Steel, 1960),
        corroded_tower("4", Material::Wood, 1985),
        corroded_tower("5", Material::Other, 1970),
    ];
    for asset in &assets {
        let result = model.assess(asset).unwrap();
        assert_eq!(result.curve.len(), 121);
        let mut previous = 0.0;
        for point in &result.curve.points {
            assert!((0.0..=1.0).contains(&point.probability), "{point:?}");
            assert!(point.probability >= previous, "asset {} at {:?}", asset.id, point.speed);
            previous = point.probability;
        }
    }
}

#[test]
fn strength_ratios_follow_condition_codes() {
    let mut asset = AssetRecord::new("10", Material::Steel, 2000);
    asset.conditions = asset
        .conditions
        .with(ConditionCode::Anchor, 0.0)
        .with(ConditionCode::Guy, 2.0)
        .with(ConditionCode::Ogw, 7.0);
    let result = model(2020).assess(&asset).unwrap();
    let ratio = |family| result.component(family).unwrap().strength_ratio;
    assert_eq!(ratio(ComponentFamily::Anchor), 1.0);
    assert_eq!(ratio(ComponentFamily::Guy), 0.92);
    assert!(ratio(ComponentFamily::Ogw).abs() < 1e-12);
    // unreported codes keep full strength
    assert_eq!(ratio(ComponentFamily::Conductor), 1.0);
}

#[test]
fn outage_sign_selects_the_branch() {
    let mut extended = AssetRecord::new("20", Material::Steel, 2000);
    extended.outage_designlife_mod = Some(0.1);
    let mut reduced = extended.clone();
    reduced.outage_designlife_mod = Some(-0.1);

    let model = model(2020);
    let up = model.assess(&extended).unwrap();
    let down = model.assess(&reduced).unwrap();
    let adj = |r: &frag_algo::AssetReliability| {
        r.component(ComponentFamily::Anchor)
            .unwrap()
            .design_life
            .adjustment
    };
    assert!((adj(&up) - 1.1).abs() < 1e-12);
    assert!((adj(&down) - 0.9).abs() < 1e-12);
    assert!(adj(&up) > adj(&down));
}

#[test]
fn wood_structure_code_drives_the_foundation_component() {
    let mut pole = AssetRecord::new("30", Material::Wood, 1995);
    pole.conditions = pole
        .conditions
        .with(ConditionCode::Structure, 3.0)
        .with(ConditionCode::Foundation, 6.0);
    let result = model(2020).assess(&pole).unwrap();
    let foundation = result.component(ComponentFamily::Foundation).unwrap();
    assert_eq!(foundation.code, ConditionCode::Structure);
    assert!((foundation.strength_ratio - frag_algo::strength_ratio(Some(3.0))).abs() < 1e-15);
    assert!((foundation.capacity.mean - (1.0 - 2.0 / 6.0) * 90.0).abs() < 1e-9);
}

#[test]
fn eight_identical_components_blend_exactly() {
    let dists = [CapacityDistribution {
        mean: 100.0,
        stddev: 10.0,
    }; 8];
    let curve = FragilityCurve::evaluate(&dists, &SweepConfig::default());
    let c = CapacityCdf::new(100.0, 10.0).probability(Mph(100.0));
    let expected = ((1.0 - (1.0 - c).powi(8)) + c) / 2.0;
    let p = curve.at(Mph(100.0)).unwrap();
    assert!((p - expected).abs() < 1e-12);
    assert!((p - 0.7585330676783557).abs() < 1e-9);
}

#[test]
fn zero_adjusted_life_is_an_error_not_a_nan() {
    let mut asset = AssetRecord::new("40", Material::Steel, 1990);
    asset.agriculture = Some("Water".into());
    asset.wetland_type = Some("Estuarine and Marine Wetland".into());
    // both scores are 2, so the soil factor equals the ceiling
    let constants = ModelConstants {
        r_cor: 1.0,
        ..Default::default()
    };
    let model = FragilityModel::new(constants, ScoreTable::reference(), 2020).unwrap();
    match model.assess(&asset) {
        Err(AssetError::Components { asset_id, failures }) => {
            assert_eq!(asset_id, "40");
            assert!(failures
                .iter()
                .any(|f| f.family == ComponentFamily::Anchor
                    && matches!(f.error, ComponentError::DegenerateDesignLife { .. })));
        }
        other => panic!("expected a design-life failure, got {other:?}"),
    }
}

#[test]
fn unmapped_land_use_gives_no_soil_reduction() {
    let mut asset = AssetRecord::new("50", Material::Steel, 1990);
    asset.agriculture = Some("Orchard".into());
    asset.wetland_type = Some("Lake".into());
    let result = model(2020).assess(&asset).unwrap();
    assert_eq!(result.scores.agriculture, None);
    assert_eq!(result.factors.soil_corrosivity, 0.0);
    assert_eq!(result.factors.atmospheric_corrosivity, 0.0);
}

#[test]
fn older_assets_are_more_fragile() {
    let model = model(2024);
    let young = model
        .assess(&corroded_tower("60", Material::Steel, 2015))
        .unwrap();
    let old = model
        .assess(&corroded_tower("61", Material::Steel, 1965))
        .unwrap();
    // below every component mean, where a wider spread means more failures
    let speed = Mph(40.0);
    assert!(old.curve.at(speed).unwrap() > young.curve.at(speed).unwrap());
}
