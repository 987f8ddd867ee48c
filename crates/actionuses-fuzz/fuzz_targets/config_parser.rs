#![no_main]
use actionuses_core::config::parse_bool_input;
use actionuses_core::{ActionConfig, ActionInputs, DedupMode};
use libfuzzer_sys::fuzz_target;
use std::borrow::Cow;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = DedupMode::parse(s);
        let _ = parse_bool_input("exclude", Some(s));

        // Split into fields so every input slot sees fuzzed text
        let mut fields = s.split('\u{0}').map(Cow::Borrowed);
        let inputs = ActionInputs {
            token: fields.next(),
            enterprise: fields.next(),
            owner: fields.next(),
            csv: fields.next(),
            md: fields.next(),
            exclude: fields.next(),
            unique: fields.next(),
            push_results_to_repo: fields.next(),
            workspace: Some(Cow::Borrowed("/work")),
            repository: fields.next(),
        };
        if let Ok(config) = ActionConfig::from_inputs(&inputs) {
            for path in config.report_paths() {
                assert!(!path.repo_path().split('/').any(|c| c == ".."));
            }
        }
    }
});
