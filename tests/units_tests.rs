use habit_tracker::units::{
    self, ALL_UNITS, FALLBACK_DEFAULT_VALUE, UnitCategory, categories, custom_unit,
    default_value, format_value, habit_presets, unit_by_name, units_by_category,
};

#[test]
fn test_glasses_lookup() {
    let unit = unit_by_name("glasses").expect("glasses is a built-in unit");
    assert_eq!(unit.symbol, "gl");
    assert_eq!(unit.default_value, 8.0);
    assert_eq!(unit.category, UnitCategory::Volume);
}

#[test]
fn test_pounds_resolves_to_mass_first() {
    let unit = unit_by_name("pounds").unwrap();
    assert_eq!(unit.category, UnitCategory::Mass);
    assert_eq!(unit.symbol, "lbs");
    assert_eq!(unit.default_value, 150.0);

    // The currency entry is still listed under its own category.
    let currencies = units_by_category(UnitCategory::Currency);
    assert!(currencies.iter().any(|u| u.name == "pounds" && u.symbol == "£"));
}

#[test]
fn test_lookup_is_exact() {
    assert!(unit_by_name("Glasses").is_none());
    assert!(unit_by_name(" glasses").is_none());
    assert!(unit_by_name("").is_none());
}

#[test]
fn test_default_value_falls_back() {
    assert_eq!(default_value("minutes"), 30.0);
    assert_eq!(default_value("bitcoin"), 0.001);
    assert_eq!(default_value("pages"), FALLBACK_DEFAULT_VALUE);
    assert_eq!(FALLBACK_DEFAULT_VALUE, 1.0);
}

#[test]
fn test_table_is_ordered_by_category() {
    assert_eq!(ALL_UNITS.len(), 32);
    assert_eq!(
        categories(),
        &[
            UnitCategory::Percentage,
            UnitCategory::Duration,
            UnitCategory::Distance,
            UnitCategory::Volume,
            UnitCategory::Mass,
            UnitCategory::Energy,
            UnitCategory::Currency,
        ]
    );

    let positions: Vec<usize> = ALL_UNITS
        .iter()
        .map(|u| categories().iter().position(|c| *c == u.category).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_units_by_category_keeps_table_order() {
    let names: Vec<&str> = units_by_category(UnitCategory::Duration)
        .iter()
        .map(|u| u.name)
        .collect();
    assert_eq!(names, vec!["seconds", "minutes", "hours"]);
    assert!(units_by_category(UnitCategory::Custom).is_empty());
}

#[test]
fn test_category_parse_round_trips_names() {
    for category in categories() {
        assert_eq!(UnitCategory::parse(category.as_str()), Some(*category));
    }
    assert_eq!(UnitCategory::parse("custom"), Some(UnitCategory::Custom));
    assert_eq!(UnitCategory::parse("weight"), None);
}

#[test]
fn test_custom_unit() {
    let unit = custom_unit("pages", "p", 20.0);
    assert_eq!(unit.category, UnitCategory::Custom);
    assert_eq!(unit.symbol, "p");
    assert_eq!(unit.default_value, 20.0);
}

#[test]
fn test_format_value() {
    assert_eq!(format_value(8.0, "glasses"), "8 gl");
    assert_eq!(format_value(2.5, "liters"), "2.5 L");
    assert_eq!(format_value(3.0, "pages"), "3");
}

#[test]
fn test_presets_reference_known_units() {
    let presets = habit_presets();
    assert_eq!(presets.len(), 4);

    let water = presets.iter().find(|p| p.name == "Water Intake").unwrap();
    assert_eq!(water.unit.name, "glasses");
    assert_eq!(water.suggestions, vec![6.0, 8.0, 10.0, 12.0]);

    for preset in &presets {
        assert!(units::unit_by_name(&preset.unit.name).is_some());
    }
}

#[test]
fn test_unit_mapping_serializes_camel_case() {
    let json = serde_json::to_value(unit_by_name("calories").unwrap().to_mapping()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "name": "calories",
            "symbol": "kcal",
            "defaultValue": 300.0,
            "category": "energy"
        })
    );
}
