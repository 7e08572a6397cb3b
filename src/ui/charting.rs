/// X (sample index) and Y (latency) upper bounds for the results chart
pub fn compute_chart_params(coords: &[(f64, f64)]) -> (f64, f64) {
    let highest = coords.iter().map(|&(_, y)| y).fold(0.0, f64::max);
    let last_x = coords.last().map_or(1.0, |&(x, _)| x).max(1.0);

    (last_x, highest.round())
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}
