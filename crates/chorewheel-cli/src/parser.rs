use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate};
use chrono_english::{parse_date_string, Dialect};

/// Parses a date argument: ISO dates directly, anything else through the
/// natural-language parser ("today", "tomorrow", "next monday").
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date);
    }
    parse_date_string(input, Local::now(), Dialect::Uk)
        .map(|dt| dt.date_naive())
        .map_err(|e| anyhow!("Cannot parse date '{}': {}", input, e))
}

/// Parses a comma-separated weekday list into Monday-based numbers 0-6.
pub fn parse_weekdays(input: &str) -> Result<Vec<u8>> {
    let mut days = Vec::new();
    for part in input.split(',') {
        let part = part.trim().to_lowercase();
        if part.is_empty() {
            continue;
        }
        let day = match part.as_str() {
            "mon" | "monday" => 0,
            "tue" | "tues" | "tuesday" => 1,
            "wed" | "wednesday" => 2,
            "thu" | "thur" | "thursday" => 3,
            "fri" | "friday" => 4,
            "sat" | "saturday" => 5,
            "sun" | "sunday" => 6,
            _ => {
                return Err(anyhow!(
                    "Unknown weekday '{}'. Use mon,tue,wed,thu,fri,sat,sun",
                    part
                ))
            }
        };
        if !days.contains(&day) {
            days.push(day);
        }
    }
    if days.is_empty() {
        return Err(anyhow!("No weekdays given."));
    }
    Ok(days)
}
