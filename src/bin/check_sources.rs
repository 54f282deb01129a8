use recession_dashboard_lib::indicators::registry::{Group, Registry};
use recession_dashboard_lib::models::DataOrigin;
use recession_dashboard_lib::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    let service = config.build_service()?;
    let fetcher = service.fetcher();

    println!("🔍 Diagnostic - Source: {}", fetcher.source_name());

    let mut checked = 0;
    let mut fallbacks = 0;
    for group in [Group::Leading, Group::Lagging, Group::Component] {
        println!("\n[{:?}]", group);
        println!("{:<16} | {:<10} | {:<6} | {:<12} | {:<12} | {:<22}", "Indicator", "Series", "Count", "Latest Date", "Latest Val", "Origin");
        println!("{}", "-".repeat(94));

        for meta in Registry::by_group(group) {
            checked += 1;
            let series = fetcher.fetch(meta.id).await?;
            let origin = match series.origin {
                DataOrigin::Live => "live".to_string(),
                DataOrigin::Fallback { as_of } => {
                    fallbacks += 1;
                    format!("FALLBACK (as of {})", as_of)
                }
            };

            match series.observations.last() {
                Some(latest) => println!(
                    "{:<16} | {:<10} | {:<6} | {:<12} | {:<12.4} | {}",
                    meta.id.as_str(),
                    meta.series_id.as_str(),
                    series.observations.len(),
                    latest.date.to_string(),
                    latest.value,
                    origin
                ),
                None => println!(
                    "{:<16} | {:<10} | {:<6} | {:<12} | {:<12} | {}",
                    meta.id.as_str(),
                    meta.series_id.as_str(),
                    0,
                    "NO DATA",
                    "-",
                    origin
                ),
            }
        }
    }

    println!("\nDone. {} of {} indicators on fallback data.", fallbacks, checked);
    Ok(())
}
