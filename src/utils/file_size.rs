/// Human-readable size using decimal units, so the upload limit of
/// 100,000,000 bytes reads as "100.00 MB".
pub fn format_size(size: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = size as f64;
    let mut unit = 0;

    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{size} B")
    } else {
        format!("{value:.2} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::format_size;

    #[test]
    fn formats_bytes_and_decimal_units() {
        assert_eq!(format_size(10), "10 B");
        assert_eq!(format_size(1_500), "1.50 KB");
        assert_eq!(format_size(100_000_000), "100.00 MB");
        assert_eq!(format_size(2_000_000_000_000_000), "2000.00 TB");
    }
}
