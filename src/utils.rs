use chrono::NaiveDate;

/// One decimal place, the way ratings appear on cards and hero banners.
pub fn rating_label(vote_average: f32) -> String {
    format!("{:.1}", vote_average)
}

/// `None` for a missing or zero runtime.
pub fn runtime_label(minutes: Option<u32>) -> Option<String> {
    minutes
        .filter(|m| *m > 0)
        .map(|m| format!("{}h {}m", m / 60, m % 60))
}

/// e.g. "July 16, 2010".
pub fn release_label(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%B %-d, %Y").to_string())
}

pub fn release_year(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%Y").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_has_one_decimal() {
        assert_eq!(rating_label(8.0), "8.0");
        assert_eq!(rating_label(8.45), "8.4");
    }

    #[test]
    fn runtime_splits_hours_and_minutes() {
        assert_eq!(runtime_label(Some(120)).as_deref(), Some("2h 0m"));
        assert_eq!(runtime_label(Some(152)).as_deref(), Some("2h 32m"));
        assert_eq!(runtime_label(Some(45)).as_deref(), Some("0h 45m"));
    }

    #[test]
    fn unknown_runtime_has_no_label() {
        assert_eq!(runtime_label(None), None);
        assert_eq!(runtime_label(Some(0)), None);
    }

    #[test]
    fn release_label_is_long_form() {
        let date = NaiveDate::from_ymd_opt(2010, 7, 6);
        assert_eq!(release_label(date).as_deref(), Some("July 6, 2010"));
        assert_eq!(release_year(date).as_deref(), Some("2010"));
        assert_eq!(release_label(None), None);
    }
}
