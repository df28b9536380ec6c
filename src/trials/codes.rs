pub const TRIAL_CODE_PREFIX: &str = "TRIAL";
const TRIAL_CODE_WIDTH: usize = 4;

/// Next human-readable trial code after `last_code`.
///
/// The number is taken from the part after the first `-`. Missing codes,
/// codes without a separator and non-numeric suffixes all restart the
/// sequence at `TRIAL-0001`.
pub fn next_trial_code(last_code: Option<&str>) -> String {
    let last_number = last_code
        .and_then(|code| code.split('-').nth(1))
        .and_then(|suffix| suffix.trim().parse::<u32>().ok())
        .unwrap_or(0);

    format!(
        "{TRIAL_CODE_PREFIX}-{:0width$}",
        last_number.saturating_add(1),
        width = TRIAL_CODE_WIDTH
    )
}
