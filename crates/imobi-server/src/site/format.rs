//! Brazilian number formatting for prices and areas

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

/// `1234567.0` → `R$ 1.234.567,00`
pub fn brl(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!(
        "{}R$ {},{:02}",
        sign,
        group_thousands(&(cents / 100).to_string()),
        cents % 100
    )
}

/// Price label for a listing card, `Consulte` when there is no price
pub fn price_label(value: Option<f64>) -> String {
    value.map(brl).unwrap_or_else(|| "Consulte".to_string())
}

/// `85.5` → `85,5 m²`
pub fn area(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let whole = rounded.trunc() as u64;
    let fraction = ((rounded.fract()) * 100.0).round() as u64;
    let whole = group_thousands(&whole.to_string());
    match fraction {
        0 => format!("{} m²", whole),
        f if f % 10 == 0 => format!("{},{} m²", whole, f / 10),
        f => format!("{},{:02} m²", whole, f),
    }
}

/// `1 quarto`, `3 quartos`
pub fn count_label(n: u32, singular: &str, plural: &str) -> String {
    format!("{} {}", n, if n == 1 { singular } else { plural })
}
