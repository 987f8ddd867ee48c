#![no_main]
use actionuses_core::output::command::{error_command, escape_data};
use actionuses_core::output::writer::{format_output, heredoc_delimiter};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        assert!(!escape_data(s).contains('\n'));
        let _ = error_command(s);

        let delim = heredoc_delimiter(s);
        assert!(!s.lines().any(|line| line == delim));
        let _ = format_output("csv_result", s);
    }
});
