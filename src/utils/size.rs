const UNITS: [&str; 6] = ["K", "M", "G", "T", "P", "E"];
const STEP: f64 = 1024.0;

/// Human readable byte counts, 1024-based
pub trait PrettySize {
    fn pretty_size(self) -> String;
}

impl PrettySize for u64 {
    fn pretty_size(self) -> String {
        let mut value = self as f64;
        if value < STEP {
            return format!("{}B", self);
        }

        let mut unit = UNITS[0];
        for next in UNITS {
            unit = next;
            value /= STEP;
            if value < STEP {
                break;
            }
        }
        format!("{:.2}{}", value, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_stay_whole() {
        assert_eq!(0.pretty_size(), "0B");
        assert_eq!(1023.pretty_size(), "1023B");
    }

    #[test]
    fn scales_by_1024() {
        assert_eq!(1024.pretty_size(), "1.00K");
        assert_eq!(1536.pretty_size(), "1.50K");
        assert_eq!((5 * 1024 * 1024).pretty_size(), "5.00M");
        assert_eq!((2u64 << 30).pretty_size(), "2.00G");
        assert_eq!((3u64 << 40).pretty_size(), "3.00T");
    }

    #[test]
    fn largest_value_uses_exbibytes() {
        assert_eq!(u64::MAX.pretty_size(), "16.00E");
    }
}
