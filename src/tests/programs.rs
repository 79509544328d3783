use crate::runtime::io::StringSink;
use crate::runtime::{Interpreter, RunState};

fn run_with_input(source: &str, input: &'static str) -> (RunState, u64, String) {
    let mut interp = Interpreter::new(source, input.as_bytes(), StringSink::new());
    interp.set_max_ticks(Some(10_000));
    let state = interp.run();
    let ticks = interp.tick();
    (state, ticks, interp.into_sink().into_inner())
}

fn run(source: &str) -> (RunState, u64, String) {
    run_with_input(source, "")
}

#[test]
fn letters_set_memory_and_print_as_bytes() {
    assert_eq!(run("H;i;@"), (RunState::Halted, 5, "Hi".to_string()));
}

#[test]
fn digits_accumulate() {
    assert_eq!(run("12!@"), (RunState::Halted, 4, "12".to_string()));
    assert_eq!(run("3~!@").2, "-3");
    assert_eq!(run("(3!@").2, "-13");
}

#[test]
fn layout_whitespace_is_ignored() {
    assert_eq!(run(" H ;\n i ; @ ").2, "Hi");
    assert_eq!(run("`H`;i;@").2, "Hi");
}

#[test]
fn input_is_echoed_byte_by_byte() {
    assert_eq!(run_with_input(",;,;@", "ok").2, "ok");
    assert_eq!(run_with_input(",!@", "").2, "-1");
}

#[test]
fn integers_skip_leading_garbage() {
    assert_eq!(run_with_input("?!@", "  -42abc").2, "-42");
    assert_eq!(run_with_input("?!@", "x+7").2, "7");
    assert_eq!(run_with_input("?!@", "").2, "0");
}

#[test]
fn division_by_zero_halts() {
    let (state, ticks, output) = run(":@");
    assert_eq!(state, RunState::Halted);
    assert_eq!(ticks, 1);
    assert_eq!(output, "");
}

#[test]
fn positive_memory_takes_the_other_corner() {
    // The middle row ends on a corner: a positive edge continues on the
    // bottom row, otherwise the pointer returns to the top row.
    let mut interp = Interpreter::new("A;{10;@", &b""[..], StringSink::new());
    assert_eq!(interp.run(), RunState::Halted);
    assert_eq!(interp.tick(), 7);
    assert_eq!(interp.sink().as_str(), "A\n");
}

#[test]
fn trailing_newline_after_target_is_accepted() {
    let mut interp = Interpreter::new("A;{10;@", &b""[..], StringSink::new());
    interp.set_target(Some("A"));
    interp.run();
    assert!(interp.success());
    assert_eq!(interp.output_length(), 1);
    assert_eq!(interp.sink().as_str(), "");
}

#[test]
fn wrong_output_stops_the_program_early() {
    let mut interp = Interpreter::new("H;i;@", &b""[..], StringSink::new());
    interp.set_target(Some("Ho"));
    assert_eq!(interp.run(), RunState::Halted);
    assert!(!interp.success());
    assert_eq!(interp.tick(), 4);
}

#[test]
fn multiply_reads_both_neighbours() {
    assert_eq!(run(")*0!@"), (RunState::Halted, 5, "0".to_string()));
}
