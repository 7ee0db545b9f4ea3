use super::*;

#[test]
fn monospace_uses_its_own_ratio() {
    let m = ApproxTextMetrics::default();
    let mono = TextStyle::default().with_font("monospace").with_size(10.0);
    let sans = TextStyle::default().with_font("sans-serif").with_size(10.0);
    assert!((m.run_width("abcd", &mono) - 24.0).abs() < 1e-9);
    assert!((m.run_width("abcd", &sans) - 22.0).abs() < 1e-9);
    assert_eq!(m.ascent(&sans), 8.0);
}
