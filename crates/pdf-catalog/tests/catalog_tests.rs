use image::{Rgb, RgbImage};
use lopdf::Document;
use pdf_catalog::*;

fn sample_products(n: usize) -> Vec<Product> {
    (0..n)
        .map(|i| {
            Product::new()
                .with("Titre", format!("Jeu vidéo n°{}", i + 1))
                .with("Prix", format!("{},50 € TTC", 10 + i))
                .with("Description", "Cartouche originale, testée et fonctionnelle. Boîte et notice incluses.")
                .with("Quantité", "1")
                .with("Ref", format!("JV-{:03}", i))
        })
        .collect()
}

fn page_count(bytes: &[u8]) -> usize {
    Document::load_mem(bytes).unwrap().get_pages().len()
}

fn build(products: &[Product], options: &CatalogOptions) -> Result<Vec<u8>> {
    let mut doc = build_catalog(products, options, &NoImages, &mut NoProgress)?;
    doc.to_bytes()
}

#[test]
fn test_ten_products_four_per_page() {
    let bytes = build(&sample_products(10), &CatalogOptions::default()).unwrap();
    assert_eq!(page_count(&bytes), 4);
}

#[test]
fn test_page_count_formula() {
    for (products, per_page) in [(1, 1), (4, 4), (5, 4), (7, 3), (9, 2)] {
        let options = CatalogOptions {
            cards_per_page: per_page,
            ..Default::default()
        };
        let bytes = build(&sample_products(products), &options).unwrap();
        assert_eq!(page_count(&bytes), 1 + products.div_ceil(per_page));
    }
}

#[test]
fn test_zero_cards_per_page_uses_fallback_height() {
    let options = CatalogOptions {
        cards_per_page: 0,
        ..Default::default()
    };
    let doc = build_catalog(&sample_products(7), &options, &NoImages, &mut NoProgress).unwrap();
    let spec = LayoutSpec::compute(0);
    for slot in doc.slots() {
        assert!((slot.rect.height - spec.card_height).abs() < 0.01);
        assert!(slot.rect.y >= spec.margins.bottom - 0.01);
    }
    assert_eq!(doc.page_count(), 1 + 7usize.div_ceil(spec.slots_per_page));
}

#[test]
fn test_empty_list_is_cover_only() {
    let bytes = build(&[], &CatalogOptions::default()).unwrap();
    assert_eq!(page_count(&bytes), 1);
}

#[test]
fn test_empty_list_rejected_when_required() {
    let options = CatalogOptions {
        require_products: true,
        ..Default::default()
    };
    assert!(matches!(build(&[], &options), Err(CatalogError::NoProducts)));
}

#[test]
fn test_layout_is_deterministic() {
    let products = sample_products(9);
    let options = CatalogOptions::default();
    let first = build_catalog(&products, &options, &NoImages, &mut NoProgress).unwrap();
    let second = build_catalog(&products, &options, &NoImages, &mut NoProgress).unwrap();
    assert_eq!(first.slots(), second.slots());
}

#[test]
fn test_cards_stay_inside_margins() {
    let options = CatalogOptions {
        cards_per_page: 3,
        ..Default::default()
    };
    let doc = build_catalog(&sample_products(8), &options, &NoImages, &mut NoProgress).unwrap();
    let spec = LayoutSpec::compute(3);
    for slot in doc.slots() {
        assert!(slot.rect.y >= spec.margins.bottom - 0.01);
        assert!(slot.rect.top() <= spec.page_height - spec.margins.top + 0.01);
    }
}

#[test]
fn test_dense_pages_fall_back_to_compact() {
    let options = CatalogOptions {
        cards_per_page: 8,
        ..Default::default()
    };
    let bytes = build(&sample_products(8), &options).unwrap();
    assert_eq!(page_count(&bytes), 2);
}

#[test]
fn test_overflow_is_reported_with_dimensions() {
    let options = CatalogOptions {
        cards_per_page: 12,
        ..Default::default()
    };
    match build(&sample_products(3), &options) {
        Err(CatalogError::LayoutOverflow { cards_per_page, card_height_pt, .. }) => {
            assert_eq!(cards_per_page, 12);
            assert!(card_height_pt > 0.0);
        }
        other => panic!("expected LayoutOverflow, got {:?}", other.map(|b| b.len())),
    }
}

#[test]
fn test_overflow_message_has_guidance() {
    let options = CatalogOptions {
        cards_per_page: 20,
        ..Default::default()
    };
    let err = build(&sample_products(1), &options).unwrap_err();
    assert!(err.to_string().contains("Reduce the number of cards per page"));
}

#[test]
fn test_product_images_from_folder() {
    let dir = tempfile::tempdir().unwrap();
    RgbImage::from_pixel(64, 48, Rgb([20, 120, 200]))
        .save(dir.path().join("0_IMAGE 1_a1b2.png"))
        .unwrap();

    let resolver = LocalImageResolver::new(dir.path()).with_images_folder(dir.path());
    let options = CatalogOptions {
        quality: Quality::Bd,
        ..Default::default()
    };
    let mut doc = build_catalog(&sample_products(2), &options, &resolver, &mut NoProgress).unwrap();
    let bytes = doc.to_bytes().unwrap();

    let reloaded = Document::load_mem(&bytes).unwrap();
    let images = reloaded
        .objects
        .values()
        .filter_map(|obj| obj.as_stream().ok())
        .filter(|stream| {
            stream
                .dict
                .get(b"Subtype")
                .and_then(|s| s.as_name())
                .map(|name| name == b"Image")
                .unwrap_or(false)
        })
        .count();
    assert_eq!(images, 1);
}

#[test]
fn test_cover_and_logo_images() {
    let dir = tempfile::tempdir().unwrap();
    let cover = dir.path().join("cover.png");
    let logo = dir.path().join("logo.png");
    RgbImage::from_pixel(60, 80, Rgb([200, 200, 200])).save(&cover).unwrap();
    RgbImage::from_pixel(40, 40, Rgb([0, 0, 0])).save(&logo).unwrap();

    let options = CatalogOptions {
        cover_path: Some(cover),
        logo_path: Some(logo),
        quality: Quality::Bd,
        ..Default::default()
    };
    let bytes = build(&sample_products(1), &options).unwrap();
    assert_eq!(page_count(&bytes), 2);
}

#[test]
fn test_only_product_pages_are_numbered() {
    let bytes = build(&sample_products(1), &CatalogOptions::default()).unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    let pages = doc.get_pages();
    let content = |n: u32| String::from_utf8_lossy(&doc.get_page_content(pages[&n]).unwrap()).into_owned();

    // "Page" in WinAnsi hex
    assert!(!content(1).contains("<50616765"));
    assert!(content(2).contains("<506167652032>"));
}

#[test]
fn test_title_recorded_in_info() {
    let options = CatalogOptions {
        title: "Collection Printemps".into(),
        ..Default::default()
    };
    let bytes = build(&sample_products(1), &options).unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    let info_id = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
    let info = doc.get_dictionary(info_id).unwrap();
    assert_eq!(info.get(b"Title").unwrap().as_str().unwrap(), b"Collection Printemps");
}

#[tokio::test]
async fn test_generate_to_memory() {
    let output = generate_catalog(
        sample_products(5),
        CatalogOptions::default(),
        NoImages,
        OutputTarget::Memory,
        |_, _, _| {},
    )
    .await
    .unwrap();

    match output {
        CatalogOutput::Bytes(bytes) => assert_eq!(page_count(&bytes), 3),
        CatalogOutput::File(_) => panic!("expected bytes"),
    }
}

#[tokio::test]
async fn test_generate_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalogue.pdf");

    let output = generate_catalog(
        sample_products(2),
        CatalogOptions::default(),
        NoImages,
        OutputTarget::File(path.clone()),
        |_, _, _| {},
    )
    .await
    .unwrap();

    assert_eq!(output, CatalogOutput::File(path.clone()));
    let doc = Document::load(&path).unwrap();
    assert_eq!(doc.get_pages().len(), 2);
}

#[tokio::test]
async fn test_progress_reaches_completion() {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    generate_catalog(
        sample_products(4),
        CatalogOptions::default(),
        NoImages,
        OutputTarget::Memory,
        move |index, total, fraction| {
            let _ = tx.send((index, total, fraction));
        },
    )
    .await
    .unwrap();

    let mut last = None;
    while let Ok(update) = rx.try_recv() {
        last = Some(update);
    }
    assert_eq!(last, Some((4, 4, 1.0)));
}
