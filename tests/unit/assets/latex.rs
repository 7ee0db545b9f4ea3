use super::*;

#[test]
fn document_uses_defaults_when_parts_are_missing() {
    let d = latex_document("$x^2$", None, None);
    assert!(d.starts_with(r"\documentclass"));
    assert!(d.ends_with(DEFAULT_LATEX_TAIL));
    assert!(d.contains("\n$x^2$\n"));

    let custom = latex_document("b", Some("a"), Some("c"));
    assert_eq!(custom, "a\nb\nc");
}

#[test]
fn missing_program_is_a_resource_error() {
    let r = CommandLatexRenderer {
        latex_program: "slidebox-no-such-latex".to_string(),
        ..CommandLatexRenderer::default()
    };
    let err = r.render("x").unwrap_err();
    assert!(matches!(err, DeckError::Resource(_)));
}
