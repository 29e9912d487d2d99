use std::time::Duration;

use anyhow::Result;
use lakmeteo_core::Config;
use lakmeteo_ui::{ActiveTab, WeatherModel};
use lakmeteo_weather::DerivedView;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize core
    lakmeteo_core::init()?;

    let (config, _) = Config::default()
        .validated()
        .inspect_err(|e| tracing::error!("{}", e.user_message()))?;
    let mut model = WeatherModel::from_config(&config, tokio::runtime::Handle::current())?;

    tracing::info!("LakMeteo started for {}", model.location_name());
    model.start();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = tokio::time::sleep(POLL_INTERVAL) => {
                if model.poll_channel() {
                    render(&model);
                }
            }
        }
    }

    // Graceful shutdown
    model.stop();
    tracing::info!("LakMeteo stopped");

    Ok(())
}

fn render(model: &WeatherModel) {
    if !model.error_message().is_empty() {
        println!("! {}", model.error_message());
    }

    let today = chrono::Local::now().date_naive();
    let Some(view) = model.view(today) else {
        return;
    };

    println!("\n{}{}", model.location_name(), if model.is_stale() { " (stale)" } else { "" });
    print_view(&view, model.active_tab());
}

fn print_view(view: &DerivedView, tab: ActiveTab) {
    if let Some(current) = &view.current {
        println!(
            "  {} {}°C  {}  wind {:.1} km/h  at {}",
            current.icon, current.temperature, current.description, current.wind_speed, current.time_label
        );
    }

    for (i, day) in view.day_cards.iter().enumerate() {
        let marker = if i == view.selected_day { '>' } else { ' ' };
        println!(
            " {} {} {} {:>3} / {:>3}  rain {:>3}%  {}",
            marker,
            day.label,
            day.icon,
            day.max.map_or("-".to_string(), |t| t.to_string()),
            day.min.map_or("-".to_string(), |t| t.to_string()),
            percent(day.precipitation_max),
            day.description
        );
    }

    match tab {
        ActiveTab::Hourly => {
            for hour in &view.selected_day_hourly_points {
                println!(
                    "    {:>5} {} {}",
                    hour.label,
                    hour.icon,
                    degrees(hour.entry.temperature)
                );
            }
        }
        ActiveTab::Daily => {
            for point in &view.daily_chart_points {
                println!(
                    "    {} max {} min {} rain {}%",
                    point.label,
                    degrees(point.max),
                    degrees(point.min),
                    percent(point.precipitation_max)
                );
            }
        }
    }
}

fn degrees(value: Option<f64>) -> String {
    value.map_or("-".to_string(), |t| format!("{:.1}°C", t))
}

fn percent(value: Option<f64>) -> String {
    value.map_or("-".to_string(), |p| format!("{:.0}", p))
}
