use bank_logo_studio::export::ExportResult;
use bank_logo_studio::{
    Background, DirectorySource, DirectoryTarget, ExportFormat, LogoRegistry, LogoStore,
    MemoryTarget, StaticSource, StoreConfig,
};

const ITAU: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 48 48">
  <defs>
    <style>.bg{fill:var(--itau-bg-color)}.text{fill:var(--itau-text-color, var(--itau-auto-text-color))}</style>
    <linearGradient id="unused"><stop offset="0"/></linearGradient>
  </defs>
  <rect class="bg" width="48" height="48" rx="8"/>
  <path class="text" d="M12 12h24v24H12z"/>
</svg>"#;

const BRADESCO: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path fill="currentColor" d="M2 2h20v20H2z"/></svg>"#;

fn three_entry_registry() -> LogoRegistry {
    LogoRegistry::from_json(
        r##"{
            "catalog": ["banco-itau", "banco-bradesco", "banco-sumido"],
            "displayNames": { "banco-itau": "Banco Itaú" },
            "originalColors": {
                "itau": { "primary": "#003399", "secondary": "#FFFF00" },
                "bradesco": { "primary": "#E51736" }
            },
            "regions": {
                "banco-itau": [
                    { "key": "bg", "label": "Fundo", "cssVar": "--itau-bg-color", "defaultColor": "#003399" },
                    { "key": "text", "label": "Texto", "cssVar": "--itau-text-color",
                      "autoContrastVar": "--itau-auto-text-color", "defaultColor": "auto" }
                ]
            }
        }"##,
    )
    .unwrap()
}

fn source() -> StaticSource {
    StaticSource::new()
        .with("/logos_bancos/banco-itau.svg", ITAU)
        .with("/logos_bancos/banco-bradesco.svg", BRADESCO)
}

#[tokio::test]
async fn failed_fetch_is_absent_and_first_logo_is_multi_color() {
    let registry = three_entry_registry();
    let mut store = LogoStore::new(registry.clone(), StoreConfig::default());
    store.load_all(&source(), false).await;

    assert_eq!(store.logos().len(), 2);
    assert_eq!(store.available_logos(), ["banco-itau", "banco-bradesco"]);
    assert!(store.error().is_some());

    assert!(store.select("banco-itau"));
    assert!(store.is_multi_color());

    let map_keys: Vec<_> = store.color_map().keys().collect();
    let region_keys: Vec<_> = registry
        .multi_color_config("banco-itau")
        .unwrap()
        .iter()
        .map(|region| region.key.as_str())
        .collect();
    assert_eq!(map_keys, region_keys);
}

#[tokio::test]
async fn unknown_selection_keeps_previous_state() {
    let mut store = LogoStore::new(three_entry_registry(), StoreConfig::default());
    store.load_all(&source(), true).await;
    store.set_size(80.0);
    store.set_element_color("bg", "#222222");

    let before = (
        store.selected().map(str::to_string),
        store.color().to_string(),
        store.color_map().clone(),
        store.size(),
    );
    assert!(!store.select("banco-sumido"));
    let after = (
        store.selected().map(str::to_string),
        store.color().to_string(),
        store.color_map().clone(),
        store.size(),
    );
    assert_eq!(before, after);
}

#[tokio::test]
async fn customized_export_is_self_contained() {
    let mut store = LogoStore::new(three_entry_registry(), StoreConfig::default());
    store.load_all(&source(), true).await;
    store.set_size(128.0);
    store.set_element_color("bg", "#101010");

    let webflow = store.webflow_svg().to_string();
    assert!(!webflow.contains("<style"));
    assert!(!webflow.contains("var(--"));
    assert!(!webflow.contains("class="));
    assert!(!webflow.contains("unused"));
    assert!(webflow.contains(r##"fill="#101010""##));
    assert!(webflow.contains(r#"viewBox="0 0 48 48""#));

    assert_eq!(store.effective_background(), Background::White);
    let mut target = MemoryTarget::new();
    let result = store.export_selected(&["banco-itau", "banco-bradesco"], ExportFormat::Png, &mut target);
    assert_eq!(result, ExportResult { success: true, count: 2, failed: 0 });
    assert_eq!(target.files[0].name, "logos-128px-png.zip");
}

fn store_with_itau(markup: &'static str) -> LogoStore {
    let source = StaticSource::new().with("/logos_bancos/banco-itau.svg", markup);
    let mut store = LogoStore::new(three_entry_registry(), StoreConfig::default());
    futures::executor::block_on(store.load_all(&source, true));
    assert_eq!(store.selected(), Some("banco-itau"));
    store
}

#[test]
fn auto_text_is_written_when_only_the_auto_variable_is_styled() {
    let mut store = store_with_itau(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 48 48"><style>.bg{fill:var(--itau-bg-color)}.text{fill:var(--itau-auto-text-color)}</style><rect class="bg" width="48" height="48"/><path class="text" d="M12 12h24v24H12z"/></svg>"#,
    );
    store.set_element_color("bg", "#101010");
    store.set_element_color("text", "auto");

    let webflow = store.webflow_svg().to_string();
    assert!(webflow.contains(r##"fill="#101010""##));
    assert!(webflow.contains(r#"fill="white""#));
    assert!(!webflow.contains("#000000"));
}

#[test]
fn region_colors_reach_variables_bound_in_attributes() {
    let mut store = store_with_itau(
        r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 48 48"><rect fill="var(--itau-bg-color, #003399)" width="48" height="48"/></svg>"##,
    );
    assert!(store.is_multi_color());
    store.set_element_color("bg", "#ff0000");

    assert!(store.webflow_svg().contains(r##"fill="#ff0000""##));

    let mut target = MemoryTarget::new();
    assert!(store.export_current(ExportFormat::Svg, &mut target).success);
    let exported = String::from_utf8(target.files[0].bytes.clone()).unwrap();
    assert!(exported.contains(r##"fill="#ff0000""##));
    assert!(!exported.contains("#003399"));
}

#[tokio::test]
async fn directory_assets_to_directory_exports() {
    let assets = tempfile::tempdir().unwrap();
    std::fs::create_dir(assets.path().join("logos_bancos")).unwrap();
    std::fs::write(assets.path().join("logos_bancos/banco-bradesco.svg"), BRADESCO).unwrap();

    let mut store = LogoStore::new(three_entry_registry(), StoreConfig::default());
    store.load_all(&DirectorySource::new(assets.path()), true).await;
    assert_eq!(store.selected(), Some("banco-bradesco"));

    let out = tempfile::tempdir().unwrap();
    let mut target = DirectoryTarget::new(out.path());
    assert!(store.export_current(ExportFormat::Png, &mut target).success);

    let png = std::fs::read(out.path().join("banco-bradesco-24px.png")).unwrap();
    assert_eq!(&png[..4], b"\x89PNG");
}
