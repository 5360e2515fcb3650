use chrono::{DateTime, Local, NaiveDate, Utc};

/// `$12.50`, or `$40` for whole amounts.
pub fn money(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("${amount:.0}")
    } else {
        format!("${amount:.2}")
    }
}

/// Like [`money`], but a zero price reads "Free".
pub fn price(amount: f64) -> String {
    if amount <= 0.0 {
        "Free".to_string()
    } else {
        money(amount)
    }
}

pub fn departure(time: &DateTime<Utc>) -> String {
    time.with_timezone(&Local).format("%a %d %b, %H:%M").to_string()
}

pub fn date(date: &NaiveDate) -> String {
    date.format("%d %b %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money() {
        assert_eq!(money(40.0), "$40");
        assert_eq!(money(12.5), "$12.50");
        assert_eq!(price(0.0), "Free");
        assert_eq!(price(3.25), "$3.25");
    }

    #[test]
    fn test_date() {
        let d = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert_eq!(date(&d), "18 Oct 2026");
    }
}
