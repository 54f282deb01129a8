use crate::indicators::registry::{ChangeBasis, UnitType};

fn signed(value: f64, decimals: usize) -> String {
    let sign = if value > 0.0 { "+" } else { "" };
    // Avoid "-0.0" for tiny negatives that round away
    let rounded = format!("{:.*}", decimals, value);
    let rounded = if rounded.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        rounded.trim_start_matches('-').to_string()
    } else {
        rounded
    };
    format!("{}{}", sign, rounded)
}

/// Headline value as a card shows it.
pub fn format_value(unit: UnitType, value: f64) -> String {
    match unit {
        UnitType::Percent => format!("{:.1}%", value),
        UnitType::Spread => format!("{} bps", signed((value * 100.0).round(), 0)),
        UnitType::Index => format!("{:.1}", value),
        UnitType::Thousands => format!("{:.2}M", value / 1000.0),
        UnitType::Billions => {
            if value.abs() >= 1000.0 {
                format!("${:.1}T", value / 1000.0)
            } else {
                format!("${:.1}B", value)
            }
        }
    }
}

/// Signed headline change, e.g. "+5.8%" or "-0.3 pts".
pub fn format_change(basis: ChangeBasis, change: f64) -> String {
    match basis {
        ChangeBasis::Percent => format!("{}%", signed(change, 1)),
        ChangeBasis::Points => format!("{} pts", signed(change, 2)),
    }
}
