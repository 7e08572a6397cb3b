pub fn mean(data: &[f64]) -> Option<f64> {
    let sum = data.iter().sum::<f64>();
    let count = data.len();

    match count {
        positive if positive > 0 => Some(sum / count as f64),
        _ => None,
    }
}

/// Population standard deviation
pub fn std_dev(data: &[f64]) -> Option<f64> {
    match (mean(data), data.len()) {
        (Some(data_mean), count) if count > 0 => {
            let variance = data
                .iter()
                .map(|value| {
                    let diff = data_mean - *value;

                    diff * diff
                })
                .sum::<f64>()
                / count as f64;

            Some(variance.sqrt())
        }
        _ => None,
    }
}

/// Clamp a gap between two timestamps to `[floor, ceil]` milliseconds
pub fn clamp_gap_ms(from_ms: u64, to_ms: u64, floor: u64, ceil: u64) -> u64 {
    to_ms.saturating_sub(from_ms).clamp(floor, ceil)
}

/// Percent-encode the handful of characters share text can contain
pub fn encode_query(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            ' ' => "%20".to_string(),
            '%' => "%25".to_string(),
            '#' => "%23".to_string(),
            '&' => "%26".to_string(),
            '|' => "%7C".to_string(),
            ':' => "%3A".to_string(),
            '/' => "%2F".to_string(),
            '\n' => "%0A".to_string(),
            c => c.to_string(),
        })
        .collect()
}
