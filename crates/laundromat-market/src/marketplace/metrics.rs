//! Derived financial metrics shown alongside listings.
//!
//! Every helper is total: missing or non-finite inputs degrade to `$0`, `0`
//! or the `N/A` sentinel rather than producing `NaN`.

pub const NOT_AVAILABLE: &str = "N/A";

/// Formats whole US dollars with thousands separators, e.g. `$1,250,000`.
pub fn format_currency(amount: Option<f64>) -> String {
    let amount = amount.filter(|value| value.is_finite()).unwrap_or(0.0);
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if rounded < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Years to recover the asking price from monthly profit, to one decimal.
///
/// `None` when profit is missing or not positive, or the price is missing.
pub fn payback_period_years(asking_price: Option<f64>, monthly_profit: Option<f64>) -> Option<f64> {
    let price = asking_price.filter(|value| value.is_finite())?;
    let monthly = monthly_profit.filter(|value| value.is_finite() && *value > 0.0)?;
    let years = price / (monthly * 12.0);
    Some((years * 10.0).round() / 10.0)
}

/// Display form of [`payback_period_years`], `N/A` for the sentinel.
pub fn payback_period_label(asking_price: Option<f64>, monthly_profit: Option<f64>) -> String {
    match payback_period_years(asking_price, monthly_profit) {
        Some(years) => format!("{years:.1}"),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Annual return as a percentage of the asking price; `0` when the price is missing or zero.
pub fn roi_from_income(net_income_annual: Option<f64>, asking_price: Option<f64>) -> f64 {
    let price = match asking_price {
        Some(price) if price.is_finite() && price != 0.0 => price,
        _ => return 0.0,
    };
    let income = net_income_annual
        .filter(|value| value.is_finite())
        .unwrap_or(0.0);
    (income / price) * 100.0
}

pub fn price_per_square_foot(asking_price: Option<f64>, square_feet: Option<u32>) -> Option<f64> {
    let price = asking_price.filter(|value| value.is_finite())?;
    match square_feet {
        Some(feet) if feet > 0 => Some(price / f64::from(feet)),
        _ => None,
    }
}

/// Formats a percentage with one decimal, e.g. `18.5%`.
pub fn format_percent(value: Option<f64>) -> String {
    match value.filter(|value| value.is_finite()) {
        Some(value) => format!("{value:.1}%"),
        None => NOT_AVAILABLE.to_string(),
    }
}
