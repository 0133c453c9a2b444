use super::*;
use crate::SourceExcerpt;
use pretty_assertions::assert_eq;

fn sample() -> Diagnostic {
    Diagnostic::new(
        "unterminated inline expression",
        SourceExcerpt::locate("a {b", 2),
    )
    .with_context("inline")
}

#[test]
fn plain_output() {
    let mut emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Never, true);
    emitter.emit(&sample());
    let output = String::from_utf8(emitter.into_inner()).unwrap_or_default();
    assert_eq!(
        output,
        "error: unterminated inline expression\n \
         --> line 1, column 3\n  |\n1 | a {b\n  |   ^\n  \
         = note: while scanning inline context\n\n"
    );
}

#[test]
fn colored_output_wraps_header() {
    let mut emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Always, false);
    emitter.emit(&sample());
    let output = String::from_utf8(emitter.into_inner()).unwrap_or_default();
    assert!(output.starts_with("\x1b[1;31merror\x1b[0m: unterminated"));
    assert!(output.contains("\x1b[1;31m  ^\x1b[0m"));
}

#[test]
fn auto_mode_follows_tty() {
    assert!(ColorMode::Auto.should_use_colors(true));
    assert!(!ColorMode::Auto.should_use_colors(false));
    assert!(ColorMode::Always.should_use_colors(false));
    assert!(!ColorMode::Never.should_use_colors(true));
}

#[test]
fn emit_all_writes_each() {
    let mut emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Never, false);
    emitter.emit_all(&[sample(), sample()]);
    let output = String::from_utf8(emitter.into_inner()).unwrap_or_default();
    assert_eq!(output.matches("error:").count(), 2);
}
