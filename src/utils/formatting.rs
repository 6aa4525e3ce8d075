//! Formatting utilities used for CLI and export outputs.

/// Round to two decimals (day-equivalents, hour totals).
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

pub fn mins2readable(mins: i64, want_sign: bool, short: bool) -> String {
    let abs_m = mins.abs();
    let hours = abs_m / 60;
    let minutes = abs_m % 60;

    let sign = if mins > 0 && want_sign {
        "+"
    } else if mins < 0 && want_sign {
        "-"
    } else {
        ""
    };

    if short {
        // es: +02:25 oppure -01:10
        format!("{}{:02}:{:02}", sign, hours, minutes)
    } else {
        // es: +02h 25m oppure -01h 10m
        format!("{}{:02}h {:02}m", sign, hours, minutes)
    }
}

/// Day-equivalent without trailing zeros: 5, 0.5, 0.44.
pub fn days2readable(days: f64) -> String {
    let s = format!("{:.2}", round2(days));
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
