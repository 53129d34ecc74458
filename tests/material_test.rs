use matcap_flow::{
    config::{AnchorConfig, SceneConfig},
    error::SetupError,
    material::{MatcapId, MaterialVariant, VariantTable, classify},
};

#[test]
fn marker_match_is_a_case_sensitive_substring() {
    assert_eq!(classify("DOG_body", "DOG"), MaterialVariant::PrimaryObject);
    assert_eq!(classify("Object_DOG_2", "DOG"), MaterialVariant::PrimaryObject);
    assert_eq!(classify("dog", "DOG"), MaterialVariant::Environment);
    assert_eq!(classify("Branches", "DOG"), MaterialVariant::Environment);
    assert_eq!(classify("DOG", ""), MaterialVariant::Environment);
}

#[test]
fn default_variants_in_declaration_order() {
    let table = VariantTable::default();
    assert_eq!(table.len(), 7);
    assert_eq!(table.nth(0), Some(("tomorrowland", MatcapId(19))));
    assert_eq!(table.nth(6), Some(("opera", MatcapId(13))));
    assert_eq!(table.get("kennedy"), Some(MatcapId(8)));
    assert_eq!(table.get("navy-pier"), Some(MatcapId(8)));
    assert_eq!(table.get("Opera"), None);
}

#[test]
fn replacing_a_variant_keeps_its_position() {
    let table = VariantTable::default().with("phone", MatcapId(1));
    assert_eq!(table.len(), 7);
    assert_eq!(table.nth(3), Some(("phone", MatcapId(1))));
}

#[test]
fn matcap_paths_and_names() {
    assert_eq!(MatcapId(3).path(), "matcap/mat-3.png");
    assert_eq!(MatcapId(20).to_string(), "mat-20");
}

#[test]
fn default_config_is_valid() {
    let config = SceneConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.camera.distance, 0.45);
    assert_eq!(config.camera.fov, 75.0);
    assert_eq!(config.default_primary, MatcapId(2));
    assert_eq!(config.default_environment, MatcapId(1));
}

#[test]
fn config_rejects_matcaps_outside_the_library() {
    let config = SceneConfig {
        matcap_count: 10,
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(SetupError::UnknownMatcap(MatcapId(19)))
    ));

    let config = SceneConfig {
        default_primary: MatcapId(0),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(SetupError::UnknownMatcap(MatcapId(0)))
    ));
}

#[test]
fn hover_anchor_selector() {
    assert_eq!(
        AnchorConfig::default().hover_anchor("kikk"),
        "#section-2 a[img-title=\"kikk\"]"
    );
}
