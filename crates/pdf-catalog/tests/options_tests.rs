use pdf_catalog::*;

#[test]
fn test_validation_bad_background() {
    let options = CatalogOptions {
        background_color: "#GGHHII".into(),
        ..Default::default()
    };
    match options.validate() {
        Err(CatalogError::Config(msg)) => assert!(msg.contains("#GGHHII")),
        other => panic!("Expected Config error, got {:?}", other),
    }
}

#[test]
fn test_validation_decimal_bounds() {
    let mut options = CatalogOptions::default();
    options.price.min_decimals = 3;
    options.price.max_decimals = 2;
    assert!(matches!(options.validate(), Err(CatalogError::Config(_))));
}

#[test]
fn test_quality_names() {
    assert_eq!(Quality::from_name("HD"), Some(Quality::Hd));
    assert_eq!(Quality::from_name("bd"), Some(Quality::Bd));
    assert_eq!(Quality::from_name("ultra"), None);
    assert_eq!(Quality::Medium.dpi(), 150.0);
    assert_eq!(Quality::Medium.jpeg_quality(), 75);
}

#[tokio::test]
async fn test_save_and_load_options() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");

    let mut options = CatalogOptions {
        title: "Brocante de printemps".into(),
        cards_per_page: 3,
        quality: Quality::Medium,
        ..Default::default()
    };
    options.price.default_tax = TaxStatus::Excluded;
    options.price.conversion_rates.insert("USD".into(), 0.92);

    options.save(&path).await.unwrap();
    let loaded = CatalogOptions::load(&path).await.unwrap();
    assert_eq!(loaded, options);
}

#[tokio::test]
async fn test_partial_config_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.json");
    tokio::fs::write(&path, r#"{ "title": "Stock", "quality": "bd" }"#)
        .await
        .unwrap();

    let loaded = CatalogOptions::load(&path).await.unwrap();
    assert_eq!(loaded.title, "Stock");
    assert_eq!(loaded.quality, Quality::Bd);
    assert_eq!(loaded.cards_per_page, 4);
    assert_eq!(loaded.background_color, "#F0F0F0");
}

#[tokio::test]
async fn test_malformed_config_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    tokio::fs::write(&path, "{ not json").await.unwrap();
    assert!(matches!(
        CatalogOptions::load(&path).await,
        Err(CatalogError::Config(_))
    ));
}
