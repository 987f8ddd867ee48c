#![no_main]
use actionuses_core::platform::PathUtil;
use libfuzzer_sys::fuzz_target;
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = PathUtil::to_posix(s);
        let _ = PathUtil::unique_sibling(s);

        if let Some(rel) = PathUtil::contained_relative(Path::new("/work"), s) {
            let full = PathUtil::normalize(&Path::new("/work").join(&rel));
            assert!(full.starts_with("/work"));
            assert_ne!(full, Path::new("/work"));
        }
    }
});
