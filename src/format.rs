// Human-readable rendering of raw counters

const UNIT: u64 = 1024;
const PREFIXES: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];

/// Format a byte count with binary (1024-based) units.
///
/// Values below 1024 render as an integer (`"500 B"`); anything larger is
/// scaled to the largest unit whose quotient stays below 1024 and rendered with
/// one fractional digit (`"1.0 KB"`, `"3.5 GB"`). Total over `u64`: the largest
/// value lands in the `E` bucket.
pub fn format_bytes(bytes: u64) -> String {
    if bytes < UNIT {
        return format!("{bytes} B");
    }

    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }

    format!("{:.1} {}B", bytes as f64 / div as f64, PREFIXES[exp])
}

/// CPU share with one fractional digit, e.g. `"12.5%"`.
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_rank(s: &str) -> usize {
        let suffix = s.rsplit(' ').next().unwrap_or_default();
        match suffix {
            "B" => 0,
            other => {
                let prefix = other.chars().next().unwrap();
                1 + PREFIXES.iter().position(|p| *p == prefix).unwrap()
            }
        }
    }

    #[test]
    fn format_bytes_below_one_kib_is_plain_integer() {
        for n in [0u64, 1, 500, 1023] {
            assert_eq!(format_bytes(n), format!("{n} B"));
        }
    }

    #[test]
    fn format_bytes_known_units() {
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(1024 * 1024), "1.0 MB");
        assert_eq!(format_bytes(1024 * 1024 * 1024), "1.0 GB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1024u64.pow(4)), "1.0 TB");
        assert_eq!(format_bytes(1024u64.pow(5)), "1.0 PB");
    }

    #[test]
    fn format_bytes_max_value_uses_exbibytes() {
        assert_eq!(format_bytes(u64::MAX), "16.0 EB");
    }

    #[test]
    fn format_bytes_unit_selection_is_monotonic() {
        let mut last = 0;
        let mut n: u64 = 1;
        while n < u64::MAX / 3 {
            let rank = unit_rank(&format_bytes(n));
            assert!(rank >= last, "unit went backwards at {n}");
            last = rank;
            n = n * 3 + 1;
        }
    }

    #[test]
    fn format_percent_one_digit() {
        assert_eq!(format_percent(0.0), "0.0%");
        assert_eq!(format_percent(100.0), "100.0%");
        assert_eq!(format_percent(12.345), "12.3%");
    }
}
