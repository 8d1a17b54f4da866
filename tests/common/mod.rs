#![allow(dead_code)]

use rox::{run, RunConfig, RunError};

/// Runs `source` with captured output and no input.
pub fn run_capture(source: &str) -> (String, Result<(), RunError>) {
    run_full(source, &RunConfig::default(), "")
}

pub fn run_full(source: &str, config: &RunConfig, input: &str) -> (String, Result<(), RunError>) {
    let mut output: Vec<u8> = Vec::new();
    let result = run(source, config, &mut output, input.as_bytes());

    (String::from_utf8(output).expect("program output is UTF-8"), result)
}

/// Output of a program that must succeed.
pub fn output_of(source: &str) -> String {
    let (output, result) = run_capture(source);

    if let Err(e) = result {
        panic!("program failed: {}\noutput so far:\n{}", e, output);
    }

    output
}

/// The failure of a program that must fail.
pub fn error_of(source: &str) -> RunError {
    match run_capture(source) {
        (_, Err(e)) => e,
        (output, Ok(())) => panic!("program succeeded with output:\n{}", output),
    }
}

/// Message of the first diagnostic of a failing program.
pub fn first_message(source: &str) -> String {
    error_of(source).diagnostics()[0].message()
}
