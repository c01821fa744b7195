use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

/// Whether console reporting is silenced via `KYRA_QUIET`
pub fn is_quiet() -> bool {
    *QUIET.get_or_init(|| {
        std::env::var("KYRA_QUIET")
            .map(|v| quiet_flag(&v))
            .unwrap_or(false)
    })
}

fn quiet_flag(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_flag_values() {
        assert!(quiet_flag("1"));
        assert!(quiet_flag("TRUE"));
        assert!(quiet_flag("yes"));
        assert!(!quiet_flag("0"));
        assert!(!quiet_flag(""));
    }
}
